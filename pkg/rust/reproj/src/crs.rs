// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{marker::PhantomData, sync::Arc};

use reproj_core::{Backend, Handle};
use reproj_type::{BackendKind, Category, Error, Result};
use tracing::warn;

use crate::context::Context;

/// An object resolved from the spatial-reference database
///
/// Usually a CRS; other categories (datums, ellipsoids, ...) resolve to the
/// same kind of handle.
pub struct Crs<'ctx> {
	backend: Arc<dyn Backend>,
	handle: Option<Handle>,
	authority: String,
	code: String,
	category: Category,
	_ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Crs<'ctx> {
	pub(crate) fn new(backend: Arc<dyn Backend>, handle: Handle, authority: &str, code: &str, category: Category) -> Self {
		Self {
			backend,
			handle: Some(handle),
			authority: authority.to_string(),
			code: code.to_string(),
			category,
			_ctx: PhantomData,
		}
	}

	pub fn handle(&self) -> Result<Handle> {
		self.handle.ok_or_else(|| Error::InvalidArgument(format!("{} has been destroyed", self.describe())))
	}

	pub(crate) fn backend(&self) -> &Arc<dyn Backend> {
		&self.backend
	}

	pub fn backend_kind(&self) -> BackendKind {
		self.backend.kind()
	}

	pub fn authority(&self) -> &str {
		&self.authority
	}

	pub fn code(&self) -> &str {
		&self.code
	}

	pub fn category(&self) -> Category {
		self.category
	}

	/// `AUTHORITY:CODE`
	pub fn describe(&self) -> String {
		format!("{}:{}", self.authority, self.code)
	}

	/// Human-readable name recorded in the database
	pub fn name(&self) -> Result<Option<String>> {
		let handle = self.handle()?;
		// SAFETY: the handle is live until destroy() takes it
		unsafe { self.backend.name(&handle) }
	}

	pub fn destroy(&mut self) -> Result<()> {
		if let Some(handle) = self.handle.take() {
			// SAFETY: taken out of the option, so released exactly once
			unsafe { self.backend.destroy(&handle) }?;
		}
		Ok(())
	}
}

impl Drop for Crs<'_> {
	fn drop(&mut self) {
		if let Err(err) = self.destroy() {
			warn!(error = %err, crs = %self.describe(), "failed to destroy object");
		}
	}
}

impl std::fmt::Debug for Crs<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Crs")
			.field("id", &self.describe())
			.field("category", &self.category)
			.field("backend", &self.backend.kind())
			.field("handle", &self.handle)
			.finish()
	}
}
