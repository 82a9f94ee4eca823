// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Coordinate transformation through PROJ
//!
//! reproj drives the PROJ engine either through a platform-installed shared
//! library or through a WebAssembly build of it running in a sandbox. Both
//! paths present the same API:
//!
//! ```no_run
//! use reproj::{CoordBuffer, Direction};
//!
//! # fn main() -> reproj::Result<()> {
//! reproj::initialize()?;
//! let ctx = reproj::context_create()?;
//! let transform = ctx.create_crs_to_crs("EPSG:4326", "EPSG:2249")?;
//!
//! let mut coords = CoordBuffer::from_coord(&[42.3603222, -71.0579667])?;
//! transform.apply(&mut coords, 1, Direction::Forward)?;
//! # Ok(())
//! # }
//! ```

// #![cfg_attr(not(debug_assertions), deny(warnings))]

mod context;
mod crs;
mod database;
mod errno;
mod runtime;
mod transform;

pub use context::{Context, is_context};
pub use crs::Crs;
pub use reproj_core::{
	Backend, BackendPreference, CoordBuffer, Handle, HandleClass, NativeConfig, Operation, ProjConfig, RawHandle,
	SandboxConfig, Selector,
};
pub use reproj_type::{BackendKind, Category, Direction, Error, ErrorCode, ObjectType, Result};
pub use runtime::{
	Proj, authorities, codes, context_create, create_crs_to_crs, create_crs_to_crs_from_resolved, create_from_database,
	error_code_to_string, force_native, force_sandboxed, initialize, is_native, is_sandboxed, mode, toggle,
};
pub use transform::Transform;
