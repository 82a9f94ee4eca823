// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Native backend
//!
//! Locates a platform-installed `libproj`, loads it at runtime and calls its
//! C API directly. Entry points are resolved on first use and cached for the
//! lifetime of the library.

// #![cfg_attr(not(debug_assertions), deny(warnings))]

mod backend;
mod loader;
mod marshal;
mod symbols;

use std::sync::Arc;

pub use backend::NativeBackend;
pub use loader::LibraryLoader;
use reproj_core::{Backend, BackendLoader, NativeConfig};

/// Loader for the selector's native slot
pub fn loader(config: NativeConfig) -> BackendLoader {
	Box::new(move || Ok(Arc::new(NativeBackend::load(&config)?) as Arc<dyn Backend>))
}
