// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! C ABI definitions for the PROJ engine boundary
//!
//! This crate mirrors the subset of the PROJ C API that reproj calls through,
//! whether the engine lives in a native shared library or in a WebAssembly
//! sandbox. Layouts here are the wire format on both sides of that boundary.

// #![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod constants;
pub mod data;
pub mod function;
