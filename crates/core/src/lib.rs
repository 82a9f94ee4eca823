// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Backend abstraction for reproj
//!
//! Everything that crosses into the engine goes through a [`Backend`] trait
//! object. Two implementations exist (native FFI and sandboxed WebAssembly,
//! in their own crates); the [`Selector`] decides which one is active.
//! Engine objects are referenced by tagged [`Handle`]s, and coordinates travel
//! in a fixed-stride [`CoordBuffer`].

// #![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod backend;
pub mod config;
pub mod coord;
pub mod handle;
pub mod operation;
pub mod selector;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::Backend;
pub use config::{BackendPreference, NativeConfig, ProjConfig, SandboxConfig};
pub use coord::CoordBuffer;
pub use handle::{Handle, HandleClass, RawHandle};
pub use operation::Operation;
pub use reproj_abi::data::PjCoordFFI;
pub use reproj_type::{BackendKind, Category, Direction, Error, ErrorCode, ObjectType, Result};
pub use selector::{BackendLoader, Selector};
