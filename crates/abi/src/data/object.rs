// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Opaque engine objects
//!
//! The engine never exposes the layout of these types; they are only ever
//! handled through pointers returned by the engine itself.

use core::marker::{PhantomData, PhantomPinned};

/// Opaque `PJ_CONTEXT`
#[repr(C)]
pub struct PjContextFFI {
	_data: [u8; 0],
	_marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque `PJ` (CRS, coordinate operation or any other database object)
#[repr(C)]
pub struct PjFFI {
	_data: [u8; 0],
	_marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque `PJ_AREA`; reproj always passes NULL
#[repr(C)]
pub struct PjAreaFFI {
	_data: [u8; 0],
	_marker: PhantomData<(*mut u8, PhantomPinned)>,
}
