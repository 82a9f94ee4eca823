// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Signatures of the engine entry points

mod types;

pub use types::*;
