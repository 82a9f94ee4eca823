// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Sandboxed backend
//!
//! Runs the engine compiled to a WASI reactor module inside a wasmtime store.
//! Host and guest share nothing but the guest's linear memory: strings,
//! string lists and coordinate batches are copied in and out of it, and
//! every engine object is a pointer into it.

// #![cfg_attr(not(debug_assertions), deny(warnings))]

mod backend;
mod guest;
mod memory;
mod paths;

use std::sync::Arc;

pub use backend::SandboxBackend;
use reproj_core::{Backend, BackendLoader, SandboxConfig};

/// Loader for the selector's sandboxed slot
pub fn loader(config: SandboxConfig) -> BackendLoader {
	Box::new(move || Ok(Arc::new(SandboxBackend::load(&config)?) as Arc<dyn Backend>))
}
