// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Backend selection and the process-wide runtime

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use reproj_core::{Backend, ProjConfig, Selector};
use reproj_type::{BackendKind, Category, Error, ErrorCode, ObjectType, Result, errno::describe};
use tracing::{debug, instrument, warn};

use crate::{context::Context, crs::Crs, database, errno::describe_code, transform::Transform};

/// A backend selector plus the settings applied to new contexts
///
/// The configured database path also applies to each backend's default
/// context, which the free functions and `Proj::create_*` methods run in.
/// Objects keep the backend that created them, so switching backends never
/// invalidates existing contexts or transforms; new objects use the newly
/// selected backend.
pub struct Proj {
	selector: RwLock<Selector>,
	database_path: Option<String>,
	/// Set once the database path reached a backend's default context
	default_path: [OnceCell<()>; 2],
}

static GLOBAL: Lazy<Proj> = Lazy::new(|| match ProjConfig::from_env() {
	Ok(config) => Proj::new(config),
	Err(err) => {
		warn!(error = %err, "ignoring invalid environment configuration");
		Proj::new(ProjConfig::default())
	}
});

impl Proj {
	pub fn new(config: ProjConfig) -> Self {
		let sandbox = config.sandbox_config();
		let selector = Selector::new(
			config.backend,
			Some(reproj_native::loader(config.native)),
			Some(reproj_sandbox::loader(sandbox)),
		);
		Self {
			selector: RwLock::new(selector),
			database_path: config.database_path,
			default_path: Default::default(),
		}
	}

	pub fn from_selector(selector: Selector) -> Self {
		Self {
			selector: RwLock::new(selector),
			database_path: None,
			default_path: Default::default(),
		}
	}

	pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
		self.database_path = Some(path.into());
		self
	}

	/// The runtime configured from the environment
	pub fn global() -> &'static Proj {
		&GLOBAL
	}

	pub fn initialize(&self) -> Result<BackendKind> {
		self.selector.write().initialize()
	}

	pub fn force_native(&self) {
		self.selector.write().force(BackendKind::Native);
	}

	pub fn force_sandboxed(&self) {
		self.selector.write().force(BackendKind::Sandboxed);
	}

	pub fn toggle(&self) -> Result<BackendKind> {
		self.selector.write().toggle()
	}

	pub fn mode(&self) -> Option<BackendKind> {
		self.selector.read().mode()
	}

	pub fn is_native(&self) -> bool {
		self.selector.read().is_native()
	}

	pub fn is_sandboxed(&self) -> bool {
		self.selector.read().is_sandboxed()
	}

	/// Dispatch object of the selected backend, initializing on first use
	///
	/// The first call per backend points its default context at the
	/// configured database; a refused path is retried on the next call.
	pub fn backend(&self) -> Result<Arc<dyn Backend>> {
		let backend = self.selected()?;
		if let Some(path) = &self.database_path {
			let applied = match backend.kind() {
				BackendKind::Native => &self.default_path[0],
				BackendKind::Sandboxed => &self.default_path[1],
			};
			applied.get_or_try_init(|| {
				database::set_database_path(backend.as_ref(), None, Some(path))?;
				debug!(backend = %backend.kind(), path = %path, "default context database set");
				Ok::<_, Error>(())
			})?;
		}
		Ok(backend)
	}

	fn selected(&self) -> Result<Arc<dyn Backend>> {
		{
			let selector = self.selector.read();
			if selector.mode().is_some() {
				return selector.active();
			}
		}
		let mut selector = self.selector.write();
		selector.initialize()?;
		selector.active()
	}

	#[instrument(name = "proj::context_create", level = "debug", skip_all)]
	pub fn context_create(&self) -> Result<Context> {
		let backend = self.backend()?;
		let handle =
			backend.context_create()?.ok_or_else(|| Error::backend(backend.kind(), "engine returned no context"))?;
		let context = Context::new(backend, handle);
		if let Some(path) = &self.database_path {
			context.set_database_path(Some(path))?;
		}
		Ok(context)
	}

	/// Never empty
	///
	/// Uses the selected backend's text once that backend is loaded, and the
	/// static table before; never selects or loads a backend itself.
	pub fn error_code_to_string(&self, code: impl Into<ErrorCode>) -> String {
		let code = code.into().0;
		let backend = {
			let selector = self.selector.read();
			selector.mode().filter(|kind| selector.is_loaded(*kind)).and_then(|kind| selector.backend(kind).ok())
		};
		match backend {
			Some(backend) => describe_code(backend.as_ref(), None, code),
			None => describe(code),
		}
	}

	/// Transform in the backend's default context
	pub fn create_crs_to_crs(&self, source: &str, target: &str) -> Result<Transform<'static>> {
		Transform::create(self.backend()?, None, source, target)
	}

	pub fn create_crs_to_crs_from_resolved(&self, source: &Crs<'_>, target: &Crs<'_>) -> Result<Transform<'static>> {
		Transform::create_from_resolved(self.backend()?, None, source, target)
	}

	pub fn create_from_database(&self, authority: &str, code: &str, category: Category) -> Result<Crs<'static>> {
		database::create_from_database(self.backend()?, None, authority, code, category)
	}

	pub fn authorities(&self) -> Result<Vec<String>> {
		database::authorities(self.backend()?.as_ref(), None)
	}

	pub fn codes(&self, authority: &str) -> Result<Vec<String>> {
		self.codes_with(authority, ObjectType::Crs, false)
	}

	pub fn codes_with(&self, authority: &str, object_type: ObjectType, allow_deprecated: bool) -> Result<Vec<String>> {
		database::codes(self.backend()?.as_ref(), None, authority, object_type, allow_deprecated)
	}
}

pub fn initialize() -> Result<BackendKind> {
	Proj::global().initialize()
}

pub fn force_native() {
	Proj::global().force_native()
}

pub fn force_sandboxed() {
	Proj::global().force_sandboxed()
}

pub fn toggle() -> Result<BackendKind> {
	Proj::global().toggle()
}

pub fn mode() -> Option<BackendKind> {
	Proj::global().mode()
}

pub fn is_native() -> bool {
	Proj::global().is_native()
}

pub fn is_sandboxed() -> bool {
	Proj::global().is_sandboxed()
}

pub fn context_create() -> Result<Context> {
	Proj::global().context_create()
}

pub fn error_code_to_string(code: impl Into<ErrorCode>) -> String {
	Proj::global().error_code_to_string(code)
}

pub fn create_crs_to_crs(source: &str, target: &str) -> Result<Transform<'static>> {
	Proj::global().create_crs_to_crs(source, target)
}

pub fn create_crs_to_crs_from_resolved(source: &Crs<'_>, target: &Crs<'_>) -> Result<Transform<'static>> {
	Proj::global().create_crs_to_crs_from_resolved(source, target)
}

pub fn create_from_database(authority: &str, code: &str, category: Category) -> Result<Crs<'static>> {
	Proj::global().create_from_database(authority, code, category)
}

pub fn authorities() -> Result<Vec<String>> {
	Proj::global().authorities()
}

pub fn codes(authority: &str) -> Result<Vec<String>> {
	Proj::global().codes(authority)
}
