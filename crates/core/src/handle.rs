// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Tagged opaque handles
//!
//! A handle is the engine's own reference to a context or object. Its
//! representation depends on the backend that produced it: an address in this
//! process for the native backend, a pointer into guest linear memory for the
//! sandboxed backend. The representation doubles as the tag, so a handle can
//! never be silently reinterpreted by the other backend.

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use reproj_abi::data::{PjContextFFI, PjFFI};
use reproj_type::{BackendKind, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleClass {
	/// `PJ_CONTEXT`
	Context,
	/// `PJ`: CRS, coordinate operation or other database object
	Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawHandle {
	/// Address of the engine object in this process
	Native(usize),
	/// Offset of the engine object in guest linear memory
	Sandboxed(u32),
}

impl RawHandle {
	pub const fn backend(self) -> BackendKind {
		match self {
			RawHandle::Native(_) => BackendKind::Native,
			RawHandle::Sandboxed(_) => BackendKind::Sandboxed,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
	class: HandleClass,
	raw: RawHandle,
}

impl Handle {
	/// Wrap a raw handle; `None` when the engine returned NULL
	pub fn new(class: HandleClass, raw: RawHandle) -> Option<Self> {
		let null = match raw {
			RawHandle::Native(addr) => addr == 0,
			RawHandle::Sandboxed(ptr) => ptr == 0,
		};
		if null {
			None
		} else {
			Some(Self {
				class,
				raw,
			})
		}
	}

	pub fn native_context(ptr: *mut PjContextFFI) -> Option<Self> {
		Self::new(HandleClass::Context, RawHandle::Native(ptr as usize))
	}

	pub fn native_object(ptr: *mut PjFFI) -> Option<Self> {
		Self::new(HandleClass::Object, RawHandle::Native(ptr as usize))
	}

	pub fn sandboxed_context(ptr: u32) -> Option<Self> {
		Self::new(HandleClass::Context, RawHandle::Sandboxed(ptr))
	}

	pub fn sandboxed_object(ptr: u32) -> Option<Self> {
		Self::new(HandleClass::Object, RawHandle::Sandboxed(ptr))
	}

	pub const fn class(&self) -> HandleClass {
		self.class
	}

	pub const fn raw(&self) -> RawHandle {
		self.raw
	}

	pub const fn backend(&self) -> BackendKind {
		self.raw.backend()
	}

	pub fn is_context(&self) -> bool {
		self.class == HandleClass::Context
	}

	pub fn is_object(&self) -> bool {
		self.class == HandleClass::Object
	}

	/// Address of a native handle
	pub fn native_addr(&self) -> Result<usize> {
		match self.raw {
			RawHandle::Native(addr) => Ok(addr),
			RawHandle::Sandboxed(_) => Err(Error::BackendMismatch {
				expected: BackendKind::Native,
				found: BackendKind::Sandboxed,
			}),
		}
	}

	/// Guest pointer of a sandboxed handle
	pub fn guest_ptr(&self) -> Result<u32> {
		match self.raw {
			RawHandle::Sandboxed(ptr) => Ok(ptr),
			RawHandle::Native(_) => Err(Error::BackendMismatch {
				expected: BackendKind::Sandboxed,
				found: BackendKind::Native,
			}),
		}
	}

	/// Fail unless this handle has the given class
	pub fn expect_class(&self, class: HandleClass) -> Result<&Self> {
		if self.class == class {
			Ok(self)
		} else {
			Err(Error::InvalidArgument(format!("expected a {:?} handle, got {}", class, self)))
		}
	}

	/// Fail unless this handle was produced by the given backend
	pub fn expect_backend(&self, backend: BackendKind) -> Result<&Self> {
		if self.backend() == backend {
			Ok(self)
		} else {
			Err(Error::BackendMismatch {
				expected: backend,
				found: self.backend(),
			})
		}
	}
}

impl Display for Handle {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let class = match self.class {
			HandleClass::Context => "context",
			HandleClass::Object => "object",
		};
		match self.raw {
			RawHandle::Native(addr) => write!(f, "native {}@{:#x}", class, addr),
			RawHandle::Sandboxed(ptr) => write!(f, "sandboxed {}@{:#x}", class, ptr),
		}
	}
}
