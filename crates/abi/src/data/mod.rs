// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! FFI-safe data types exchanged with the engine

mod coord;
mod object;

pub use coord::*;
pub use object::*;
