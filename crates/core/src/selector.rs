// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Backend selection
//!
//! The selector owns one lazily loaded slot per backend kind and the current
//! mode. Loading happens at most once per slot; a failed load is not cached
//! so a later dispatch can retry it.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use reproj_type::{BackendKind, Error, Result};
use tracing::{debug, instrument, warn};

use crate::{backend::Backend, config::BackendPreference};

pub type BackendLoader = Box<dyn Fn() -> Result<Arc<dyn Backend>> + Send + Sync>;

struct Slot {
	kind: BackendKind,
	loader: Option<BackendLoader>,
	backend: OnceCell<Arc<dyn Backend>>,
}

impl Slot {
	fn new(kind: BackendKind, loader: Option<BackendLoader>) -> Self {
		Self {
			kind,
			loader,
			backend: OnceCell::new(),
		}
	}

	fn loaded(kind: BackendKind, backend: Option<Arc<dyn Backend>>) -> Self {
		Self {
			kind,
			loader: None,
			backend: match backend {
				Some(backend) => OnceCell::with_value(backend),
				None => OnceCell::new(),
			},
		}
	}

	fn get(&self) -> Result<Arc<dyn Backend>> {
		self.backend.get_or_try_init(|| self.load()).cloned()
	}

	fn load(&self) -> Result<Arc<dyn Backend>> {
		let loader = self
			.loader
			.as_ref()
			.ok_or_else(|| Error::backend(self.kind, "backend is not available in this build"))?;

		let backend = loader().map_err(|e| as_load_failure(self.kind, e))?;
		backend.verify().map_err(|e| as_load_failure(self.kind, e))?;

		debug!(backend = %self.kind, "backend loaded");
		Ok(backend)
	}

	fn is_loaded(&self) -> bool {
		self.backend.get().is_some()
	}
}

fn as_load_failure(kind: BackendKind, err: Error) -> Error {
	match err {
		err @ Error::Backend {
			..
		} => err,
		other => Error::Backend {
			backend: kind,
			message: other.to_string(),
			code: other.code(),
		},
	}
}

pub struct Selector {
	preference: BackendPreference,
	mode: Option<BackendKind>,
	native: Slot,
	sandboxed: Slot,
}

impl Selector {
	pub fn new(preference: BackendPreference, native: Option<BackendLoader>, sandboxed: Option<BackendLoader>) -> Self {
		Self {
			preference,
			mode: None,
			native: Slot::new(BackendKind::Native, native),
			sandboxed: Slot::new(BackendKind::Sandboxed, sandboxed),
		}
	}

	/// A selector over already constructed backends
	pub fn with_backends(
		preference: BackendPreference,
		native: Option<Arc<dyn Backend>>,
		sandboxed: Option<Arc<dyn Backend>>,
	) -> Self {
		Self {
			preference,
			mode: None,
			native: Slot::loaded(BackendKind::Native, native),
			sandboxed: Slot::loaded(BackendKind::Sandboxed, sandboxed),
		}
	}

	fn slot(&self, kind: BackendKind) -> &Slot {
		match kind {
			BackendKind::Native => &self.native,
			BackendKind::Sandboxed => &self.sandboxed,
		}
	}

	pub fn preference(&self) -> BackendPreference {
		self.preference
	}

	/// Select a backend unless one is selected already
	#[instrument(name = "selector::initialize", level = "debug", skip_all)]
	pub fn initialize(&mut self) -> Result<BackendKind> {
		if let Some(mode) = self.mode {
			return Ok(mode);
		}

		let kind = match self.preference.kind() {
			Some(kind) => {
				self.slot(kind).get()?;
				kind
			}
			None => match self.native.get() {
				Ok(_) => BackendKind::Native,
				Err(native) => {
					warn!(error = %native, "native backend unavailable, falling back to sandboxed");
					match self.sandboxed.get() {
						Ok(_) => BackendKind::Sandboxed,
						Err(sandboxed) => {
							return Err(Error::backend(
								BackendKind::Sandboxed,
								format!("no backend available; native: {}; sandboxed: {}", native, sandboxed),
							));
						}
					}
				}
			},
		};

		debug!(backend = %kind, "backend selected");
		self.mode = Some(kind);
		Ok(kind)
	}

	/// Select `kind` without loading it; a load failure surfaces on first use
	pub fn force(&mut self, kind: BackendKind) {
		debug!(backend = %kind, "backend forced");
		self.mode = Some(kind);
	}

	pub fn toggle(&mut self) -> Result<BackendKind> {
		let next = self.initialize()?.flip();
		self.force(next);
		Ok(next)
	}

	pub fn mode(&self) -> Option<BackendKind> {
		self.mode
	}

	pub fn is_native(&self) -> bool {
		self.mode == Some(BackendKind::Native)
	}

	pub fn is_sandboxed(&self) -> bool {
		self.mode == Some(BackendKind::Sandboxed)
	}

	pub fn is_loaded(&self, kind: BackendKind) -> bool {
		self.slot(kind).is_loaded()
	}

	/// Dispatch object of the selected backend, loading it on first use
	pub fn active(&self) -> Result<Arc<dyn Backend>> {
		match self.mode {
			Some(kind) => self.slot(kind).get(),
			None => Err(Error::Config("no backend selected".to_string())),
		}
	}

	/// Dispatch object of a specific backend, regardless of the current mode
	pub fn backend(&self, kind: BackendKind) -> Result<Arc<dyn Backend>> {
		self.slot(kind).get()
	}
}
