// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{any::Any, cell::RefCell, sync::Arc};

use reproj_core::{Backend, Handle};
use reproj_type::{BackendKind, Category, Error, ErrorCode, ObjectType, Result};
use tracing::{debug, warn};

use crate::{
	crs::Crs,
	database,
	errno::describe_code,
	transform::Transform,
};

/// An engine context and the backend that created it
///
/// A context may move between threads but cannot be shared by them. Transforms
/// and CRSs created from it borrow it, so it cannot be destroyed while they
/// are alive.
pub struct Context {
	backend: Arc<dyn Backend>,
	handle: Option<Handle>,
	database_path: RefCell<Option<String>>,
}

impl Context {
	pub(crate) fn new(backend: Arc<dyn Backend>, handle: Handle) -> Self {
		debug!(backend = %backend.kind(), handle = %handle, "context created");
		Self {
			backend,
			handle: Some(handle),
			database_path: RefCell::new(None),
		}
	}

	/// The engine handle, for identification and logging
	///
	/// Handing it back to the backend is `unsafe`: the context may be gone by
	/// the time it is used.
	///
	/// ```compile_fail
	/// # fn main() -> reproj::Result<()> {
	/// let proj = reproj::Proj::new(reproj::ProjConfig::default());
	/// let handle = proj.context_create()?.handle()?;
	/// proj.backend()?.context_destroy(&handle)?;
	/// # Ok(())
	/// # }
	/// ```
	pub fn handle(&self) -> Result<Handle> {
		self.handle.ok_or(Error::ContextDestroyed)
	}

	pub fn backend_kind(&self) -> BackendKind {
		self.backend.kind()
	}

	pub fn is_destroyed(&self) -> bool {
		self.handle.is_none()
	}

	/// The configured database path; `None` means the backend default
	pub fn database_path(&self) -> Option<String> {
		self.database_path.borrow().clone()
	}

	/// Point the context at another database, or back at the default with `None`
	pub fn set_database_path(&self, path: Option<&str>) -> Result<()> {
		database::set_database_path(self.backend.as_ref(), Some(&self.handle()?), path)?;
		*self.database_path.borrow_mut() = path.map(str::to_string);
		Ok(())
	}

	/// The database file the engine actually uses
	pub fn resolved_database_path(&self) -> Result<Option<String>> {
		let handle = self.handle()?;
		// SAFETY: the handle stays live until destroy() takes it
		unsafe { self.backend.context_get_database_path(Some(&handle)) }
	}

	pub fn errno(&self) -> Result<ErrorCode> {
		let handle = self.handle()?;
		// SAFETY: as in resolved_database_path
		Ok(ErrorCode(unsafe { self.backend.context_errno(Some(&handle)) }?))
	}

	pub fn error_code_to_string(&self, code: impl Into<ErrorCode>) -> String {
		describe_code(self.backend.as_ref(), self.handle.as_ref(), code.into().0)
	}

	pub fn create_crs_to_crs(&self, source: &str, target: &str) -> Result<Transform<'_>> {
		Transform::create(self.backend.clone(), Some(self.handle()?), source, target)
	}

	pub fn create_crs_to_crs_from_resolved(&self, source: &Crs<'_>, target: &Crs<'_>) -> Result<Transform<'_>> {
		Transform::create_from_resolved(self.backend.clone(), Some(self.handle()?), source, target)
	}

	pub fn create_from_database(&self, authority: &str, code: &str, category: Category) -> Result<Crs<'_>> {
		database::create_from_database(self.backend.clone(), Some(self.handle()?), authority, code, category)
	}

	pub fn authorities(&self) -> Result<Vec<String>> {
		database::authorities(self.backend.as_ref(), Some(&self.handle()?))
	}

	pub fn codes(&self, authority: &str) -> Result<Vec<String>> {
		self.codes_with(authority, ObjectType::Crs, false)
	}

	pub fn codes_with(&self, authority: &str, object_type: ObjectType, allow_deprecated: bool) -> Result<Vec<String>> {
		database::codes(self.backend.as_ref(), Some(&self.handle()?), authority, object_type, allow_deprecated)
	}

	/// Release the engine context; later calls are no-ops
	pub fn destroy(&mut self) -> Result<()> {
		if let Some(handle) = self.handle.take() {
			// SAFETY: taken out of the option, so released exactly once; the
			// `&mut self` borrow proves no Transform or Crs still uses it
			unsafe { self.backend.context_destroy(&handle) }?;
			debug!(handle = %handle, "context destroyed");
		}
		Ok(())
	}
}

impl Drop for Context {
	fn drop(&mut self) {
		if let Err(err) = self.destroy() {
			warn!(error = %err, "failed to destroy context");
		}
	}
}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Context")
			.field("backend", &self.backend.kind())
			.field("handle", &self.handle)
			.field("database_path", &self.database_path.borrow())
			.finish()
	}
}

/// Whether `value` is a context or a handle to one
pub fn is_context(value: &dyn Any) -> bool {
	value.is::<Context>() || value.downcast_ref::<Handle>().is_some_and(Handle::is_context)
}

#[cfg(test)]
mod tests {
	use reproj_core::testing::FakeBackend;

	use super::*;

	fn context(backend: &Arc<FakeBackend>) -> Context {
		let dyn_backend: Arc<dyn Backend> = backend.clone();
		let handle = dyn_backend.context_create().unwrap().unwrap();
		Context::new(dyn_backend, handle)
	}

	#[test]
	fn test_destroy_is_idempotent() {
		let backend = Arc::new(FakeBackend::new(BackendKind::Native));
		let mut ctx = context(&backend);
		ctx.destroy().unwrap();
		ctx.destroy().unwrap();
		drop(ctx);
		assert_eq!(backend.destroyed_contexts(), 1);
		assert_eq!(backend.live_contexts(), 0);
	}

	#[test]
	fn test_destroyed_context_refuses_work() {
		let backend = Arc::new(FakeBackend::new(BackendKind::Sandboxed));
		let mut ctx = context(&backend);
		ctx.destroy().unwrap();
		assert!(ctx.is_destroyed());
		assert!(matches!(ctx.errno(), Err(Error::ContextDestroyed)));
		assert!(matches!(ctx.create_crs_to_crs("EPSG:4326", "EPSG:3857"), Err(Error::ContextDestroyed)));
		assert!(matches!(ctx.set_database_path(None), Err(Error::ContextDestroyed)));
	}

	#[test]
	fn test_database_path_round_trip() {
		let backend = Arc::new(FakeBackend::new(BackendKind::Native));
		let ctx = context(&backend);
		assert_eq!(ctx.database_path(), None);

		ctx.set_database_path(Some("/data/proj.db")).unwrap();
		assert_eq!(ctx.database_path().as_deref(), Some("/data/proj.db"));
		assert_eq!(ctx.resolved_database_path().unwrap().as_deref(), Some("/data/proj.db"));

		ctx.set_database_path(None).unwrap();
		assert_eq!(ctx.database_path(), None);
	}

	#[test]
	fn test_rejected_database_path_keeps_previous() {
		let backend = Arc::new(FakeBackend::new(BackendKind::Native));
		let ctx = context(&backend);
		ctx.set_database_path(Some("/data/proj.db")).unwrap();

		let err = ctx.set_database_path(Some("/data/not-a-database")).unwrap_err();
		assert_eq!(err.code(), Some(1029));
		assert_eq!(ctx.database_path().as_deref(), Some("/data/proj.db"));
	}

	#[test]
	fn test_is_context() {
		let backend = Arc::new(FakeBackend::new(BackendKind::Native));
		let ctx = context(&backend);
		let handle = ctx.handle().unwrap();

		assert!(is_context(&ctx));
		assert!(is_context(&handle));
		assert!(!is_context(&"EPSG:4326"));
		assert!(!is_context(&Handle::native_object(0x10 as *mut _).unwrap()));
	}

	#[test]
	fn test_context_is_send() {
		fn assert_send<T: Send>() {}
		assert_send::<Context>();
	}
}
