// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::mem::{align_of, size_of};

/// Number of components every coordinate carries (x, y, z, t)
pub const COORD_COMPONENTS: usize = 4;

/// Size in bytes of one coordinate on both sides of the boundary
pub const COORD_STRIDE: usize = COORD_COMPONENTS * size_of::<f64>();

/// FFI-safe coordinate, layout compatible with PROJ's `PJ_COORD` union
///
/// `PJ_COORD` is a union of several four-double views; only the generic
/// `xyzt` view is used here, so a plain struct of four doubles has the same
/// size, alignment and field order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PjCoordFFI {
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub t: f64,
}

const _: () = assert!(size_of::<PjCoordFFI>() == COORD_STRIDE);
const _: () = assert!(align_of::<PjCoordFFI>() == align_of::<f64>());

impl PjCoordFFI {
	pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

	pub const fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
		Self {
			x,
			y,
			z,
			t,
		}
	}

	pub const fn from_array(v: [f64; COORD_COMPONENTS]) -> Self {
		Self::new(v[0], v[1], v[2], v[3])
	}

	pub const fn to_array(self) -> [f64; COORD_COMPONENTS] {
		[self.x, self.y, self.z, self.t]
	}

	/// Component by column index (0 = x, 1 = y, 2 = z, 3 = t)
	pub fn get(&self, column: usize) -> Option<f64> {
		match column {
			0 => Some(self.x),
			1 => Some(self.y),
			2 => Some(self.z),
			3 => Some(self.t),
			_ => None,
		}
	}

	/// Mutable component by column index
	pub fn get_mut(&mut self, column: usize) -> Option<&mut f64> {
		match column {
			0 => Some(&mut self.x),
			1 => Some(&mut self.y),
			2 => Some(&mut self.z),
			3 => Some(&mut self.t),
			_ => None,
		}
	}

	/// Encode as little-endian bytes, the byte order of WebAssembly linear memory
	pub fn to_le_bytes(&self) -> [u8; COORD_STRIDE] {
		let mut out = [0u8; COORD_STRIDE];
		for (i, value) in self.to_array().iter().enumerate() {
			out[i * 8..(i + 1) * 8].copy_from_slice(&value.to_le_bytes());
		}
		out
	}

	/// Decode from little-endian bytes
	///
	/// `bytes` must hold at least [`COORD_STRIDE`] bytes; extra bytes are ignored.
	pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
		if bytes.len() < COORD_STRIDE {
			return None;
		}
		let mut v = [0f64; COORD_COMPONENTS];
		for (i, slot) in v.iter_mut().enumerate() {
			let mut raw = [0u8; 8];
			raw.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
			*slot = f64::from_le_bytes(raw);
		}
		Some(Self::from_array(v))
	}
}
