// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversions between Rust values and the C representations the engine expects

use std::{
	ffi::{CStr, CString, c_char},
	ptr,
};

use reproj_abi::{
	data::{PjContextFFI, PjFFI},
	function::StringListFFI,
};
use reproj_core::{Handle, HandleClass};
use reproj_type::{Error, Result};

pub(crate) fn c_string(value: &str) -> Result<CString> {
	CString::new(value).map_err(|e| Error::InvalidArgument(format!("{:?} contains a NUL byte at {}", value, e.nul_position())))
}

/// Pointer of an optional `CString`, NULL when absent
pub(crate) fn c_ptr(value: &Option<CString>) -> *const c_char {
	value.as_ref().map_or(ptr::null(), |s| s.as_ptr())
}

/// NULL selects the engine's default context
pub(crate) fn context_ptr(ctx: Option<&Handle>) -> Result<*mut PjContextFFI> {
	match ctx {
		None => Ok(ptr::null_mut()),
		Some(handle) => {
			handle.expect_class(HandleClass::Context)?;
			Ok(handle.native_addr()? as *mut PjContextFFI)
		}
	}
}

pub(crate) fn object_ptr(handle: &Handle) -> Result<*mut PjFFI> {
	handle.expect_class(HandleClass::Object)?;
	Ok(handle.native_addr()? as *mut PjFFI)
}

/// Copy a C string owned by the engine
///
/// # Safety
/// `value` must be NULL or point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub(crate) unsafe fn read_c_str(value: *const c_char) -> Option<String> {
	if value.is_null() {
		return None;
	}
	Some(unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned())
}

/// Copy a NULL-terminated string list without releasing it
///
/// # Safety
/// `list` must be NULL or a NULL-terminated array of valid C strings.
pub(crate) unsafe fn read_string_list(list: StringListFFI) -> Option<Vec<String>> {
	if list.is_null() {
		return None;
	}
	let mut result = Vec::new();
	let mut cursor = list;
	loop {
		let item = unsafe { *cursor };
		if item.is_null() {
			break;
		}
		if let Some(value) = unsafe { read_c_str(item) } {
			result.push(value);
		}
		cursor = unsafe { cursor.add(1) };
	}
	Some(result)
}
