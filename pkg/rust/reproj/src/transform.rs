// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{marker::PhantomData, sync::Arc};

use reproj_core::{Backend, CoordBuffer, Handle};
use reproj_type::{BackendKind, Direction, Error, ErrorCode, Result};
use tracing::{debug, instrument, warn};

use crate::{
	context::Context,
	crs::Crs,
	errno::{describe_code, last_errno},
};

/// A coordinate operation between two CRSs
///
/// Bound to the context it was created in, or to the engine's default context
/// when created through the runtime (`'static`). `ctx` is always a handle of
/// a live context, or `None`, so passing it to the backend is sound.
pub struct Transform<'ctx> {
	backend: Arc<dyn Backend>,
	ctx: Option<Handle>,
	handle: Option<Handle>,
	_ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Transform<'ctx> {
	fn wrap(backend: Arc<dyn Backend>, ctx: Option<Handle>, handle: Handle) -> Self {
		Self {
			backend,
			ctx,
			handle: Some(handle),
			_ctx: PhantomData,
		}
	}

	fn resolution_error(backend: &dyn Backend, ctx: Option<&Handle>, crs: String) -> Error {
		let code = last_errno(backend, ctx);
		Error::CrsResolution {
			crs,
			code,
			reason: describe_code(backend, ctx, code),
		}
	}

	#[instrument(name = "transform::create", level = "debug", skip_all, fields(source = source, target = target))]
	pub(crate) fn create(backend: Arc<dyn Backend>, ctx: Option<Handle>, source: &str, target: &str) -> Result<Self> {
		// SAFETY: see the type docs
		match unsafe { backend.create_crs_to_crs(ctx.as_ref(), source, target) }? {
			Some(handle) => Ok(Self::wrap(backend, ctx, handle)),
			None => Err(Self::resolution_error(backend.as_ref(), ctx.as_ref(), format!("{} -> {}", source, target))),
		}
	}

	#[instrument(name = "transform::create_from_resolved", level = "debug", skip_all)]
	pub(crate) fn create_from_resolved(
		backend: Arc<dyn Backend>,
		ctx: Option<Handle>,
		source: &Crs<'_>,
		target: &Crs<'_>,
	) -> Result<Self> {
		let source_handle = source.handle()?;
		let target_handle = target.handle()?;
		for (crs, handle) in [(source, &source_handle), (target, &target_handle)] {
			handle.expect_backend(backend.kind())?;
			if !same_backend(crs.backend(), &backend) {
				return Err(Error::InvalidArgument(format!(
					"{} was resolved by another {} backend instance",
					crs.describe(),
					backend.kind()
				)));
			}
		}

		// SAFETY: both handles are live objects of this very backend instance
		match unsafe { backend.create_crs_to_crs_from_pj(ctx.as_ref(), &source_handle, &target_handle) }? {
			Some(handle) => Ok(Self::wrap(backend, ctx, handle)),
			None => Err(Self::resolution_error(
				backend.as_ref(),
				ctx.as_ref(),
				format!("{} -> {}", source.describe(), target.describe()),
			)),
		}
	}

	pub fn handle(&self) -> Result<Handle> {
		self.handle.ok_or_else(|| Error::InvalidArgument("transform has been destroyed".to_string()))
	}

	pub fn backend_kind(&self) -> BackendKind {
		self.backend.kind()
	}

	/// Transform the first `count` rows of `coords` in place
	///
	/// The engine's result code is returned as is: rows it could not
	/// transform hold `HUGE_VAL` while the rest are transformed. Only failures
	/// to reach the engine are errors.
	pub fn apply(&self, coords: &mut CoordBuffer, count: usize, direction: Direction) -> Result<ErrorCode> {
		let handle = self.handle()?;
		if count > coords.len() {
			return Err(Error::OutOfBounds {
				index: count,
				len: coords.len(),
			});
		}
		let rows = &mut coords.as_ffi_mut()[..count];
		// SAFETY: the handle stays live until destroy() takes it
		let code = unsafe { self.backend.trans_array(&handle, direction, rows) }?;
		if code != 0 {
			debug!(code, rows = count, "engine reported a failed row");
		}
		Ok(ErrorCode(code))
	}

	pub fn apply_all(&self, coords: &mut CoordBuffer, direction: Direction) -> Result<ErrorCode> {
		let count = coords.len();
		self.apply(coords, count, direction)
	}

	pub fn forward(&self, coords: &mut CoordBuffer) -> Result<ErrorCode> {
		self.apply_all(coords, Direction::Forward)
	}

	pub fn inverse(&self, coords: &mut CoordBuffer) -> Result<ErrorCode> {
		self.apply_all(coords, Direction::Inverse)
	}

	/// The same operation with longitude/easting first on both ends
	pub fn normalize_for_visualization(&self) -> Result<Transform<'ctx>> {
		let handle = self.handle()?;
		// SAFETY: as in apply
		match unsafe { self.backend.normalize_for_visualization(self.ctx.as_ref(), &handle) }? {
			Some(normalized) => Ok(Self::wrap(self.backend.clone(), self.ctx, normalized)),
			None => {
				let code = last_errno(self.backend.as_ref(), self.ctx.as_ref());
				Err(Error::backend_with_code(
					self.backend.kind(),
					format!(
						"cannot normalize for visualization: {}",
						describe_code(self.backend.as_ref(), self.ctx.as_ref(), code)
					),
					code,
				))
			}
		}
	}

	pub fn name(&self) -> Result<Option<String>> {
		let handle = self.handle()?;
		// SAFETY: as in apply
		unsafe { self.backend.name(&handle) }
	}

	/// Release the engine object; later calls are no-ops
	pub fn destroy(&mut self) -> Result<()> {
		if let Some(handle) = self.handle.take() {
			// SAFETY: taken out of the option, so released exactly once
			unsafe { self.backend.destroy(&handle) }?;
		}
		Ok(())
	}
}

fn same_backend(a: &Arc<dyn Backend>, b: &Arc<dyn Backend>) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl Drop for Transform<'_> {
	fn drop(&mut self) {
		if let Err(err) = self.destroy() {
			warn!(error = %err, "failed to destroy transform");
		}
	}
}

impl std::fmt::Debug for Transform<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Transform").field("backend", &self.backend.kind()).field("handle", &self.handle).finish()
	}
}
