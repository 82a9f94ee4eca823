// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Spatial-reference database queries
//!
//! Every `ctx` passed in here is the handle of a live [`Context`], or `None`
//! for the engine's default context.
//!
//! [`Context`]: crate::Context

use std::sync::Arc;

use reproj_core::{Backend, Handle};
use reproj_type::{Category, Error, ObjectType, Result};
use tracing::{debug, instrument};

use crate::{
	crs::Crs,
	errno::{describe_code, last_errno},
};

/// Point `ctx` at the database file `path`, or at the default with `None`
pub(crate) fn set_database_path(backend: &dyn Backend, ctx: Option<&Handle>, path: Option<&str>) -> Result<()> {
	// SAFETY: see module docs
	if unsafe { backend.context_set_database_path(ctx, path) }? {
		return Ok(());
	}
	let code = last_errno(backend, ctx);
	Err(Error::backend_with_code(
		backend.kind(),
		format!("database path {} rejected: {}", path.unwrap_or("<default>"), describe_code(backend, ctx, code)),
		code,
	))
}

pub(crate) fn authorities(backend: &dyn Backend, ctx: Option<&Handle>) -> Result<Vec<String>> {
	// SAFETY: see module docs
	match unsafe { backend.authorities_from_database(ctx) }? {
		Some(authorities) => Ok(authorities),
		None => {
			let code = last_errno(backend, ctx);
			Err(Error::backend_with_code(
				backend.kind(),
				format!("authority list unavailable: {}", describe_code(backend, ctx, code)),
				code,
			))
		}
	}
}

/// Codes registered under `authority`
///
/// The authority must be one the database lists (compared ignoring ASCII
/// case); a known authority without matching codes yields an empty list.
#[instrument(name = "database::codes", level = "debug", skip(backend, ctx))]
pub(crate) fn codes(
	backend: &dyn Backend,
	ctx: Option<&Handle>,
	authority: &str,
	object_type: ObjectType,
	allow_deprecated: bool,
) -> Result<Vec<String>> {
	let canonical = authorities(backend, ctx)?
		.into_iter()
		.find(|known| known.eq_ignore_ascii_case(authority))
		.ok_or_else(|| Error::UnknownAuthority(authority.to_string()))?;

	// SAFETY: see module docs
	let codes = unsafe { backend.codes_from_database(ctx, &canonical, object_type, allow_deprecated) }?
		.unwrap_or_default();
	debug!(authority = %canonical, count = codes.len(), "codes listed");
	Ok(codes)
}

#[instrument(name = "database::create_from_database", level = "debug", skip(backend, ctx))]
pub(crate) fn create_from_database<'ctx>(
	backend: Arc<dyn Backend>,
	ctx: Option<Handle>,
	authority: &str,
	code: &str,
	category: Category,
) -> Result<Crs<'ctx>> {
	// SAFETY: see module docs
	match unsafe { backend.create_from_database(ctx.as_ref(), authority, code, category) }? {
		Some(handle) => Ok(Crs::new(backend, handle, authority, code, category)),
		None => {
			let errno = last_errno(backend.as_ref(), ctx.as_ref());
			Err(Error::CrsResolution {
				crs: format!("{}:{}", authority, code),
				code: errno,
				reason: describe_code(backend.as_ref(), ctx.as_ref(), errno),
			})
		}
	}
}
