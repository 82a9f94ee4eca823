// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Copying values in and out of guest linear memory
//!
//! Guest pointers are 32-bit offsets. Everything is little-endian, and a
//! coordinate row occupies [`COORD_STRIDE`] bytes exactly as on the host.

use reproj_abi::data::{COORD_STRIDE, PjCoordFFI};
use reproj_type::{Error, Result};
use tracing::trace;

use crate::guest::{FREE, Guest, MALLOC, sandbox_error};

const POINTER_SIZE: usize = size_of::<u32>();

impl Guest {
	pub(crate) fn malloc(&mut self, len: usize) -> Result<u32> {
		let size = u32::try_from(len).map_err(|_| sandbox_error(format!("{} bytes exceed guest address space", len)))?;
		let ptr = self.call::<u32, u32>(MALLOC, size)?;
		if ptr == 0 {
			return Err(sandbox_error(format!("guest allocation of {} bytes failed", len)));
		}
		Ok(ptr)
	}

	pub(crate) fn free(&mut self, ptr: u32) -> Result<()> {
		if ptr == 0 {
			return Ok(());
		}
		self.call::<u32, ()>(FREE, ptr)
	}

	pub(crate) fn write(&mut self, ptr: u32, bytes: &[u8]) -> Result<()> {
		self.memory
			.write(&mut self.store, ptr as usize, bytes)
			.map_err(|_| sandbox_error(format!("write of {} bytes at {:#x} is out of guest memory", bytes.len(), ptr)))
	}

	pub(crate) fn read(&self, ptr: u32, len: usize) -> Result<&[u8]> {
		let start = ptr as usize;
		self.memory
			.data(&self.store)
			.get(start..start.saturating_add(len))
			.ok_or_else(|| sandbox_error(format!("read of {} bytes at {:#x} is out of guest memory", len, ptr)))
	}

	/// Copy a string into a fresh guest allocation, NUL-terminated
	pub(crate) fn write_c_str(&mut self, value: &str) -> Result<u32> {
		if value.as_bytes().contains(&0) {
			return Err(Error::InvalidArgument(format!("{:?} contains a NUL byte", value)));
		}
		let ptr = self.malloc(value.len() + 1)?;
		let mut bytes = Vec::with_capacity(value.len() + 1);
		bytes.extend_from_slice(value.as_bytes());
		bytes.push(0);
		if let Err(err) = self.write(ptr, &bytes) {
			self.free(ptr)?;
			return Err(err);
		}
		Ok(ptr)
	}

	/// Copy a guest string that the engine still owns
	pub(crate) fn read_c_str(&self, ptr: u32) -> Result<Option<String>> {
		if ptr == 0 {
			return Ok(None);
		}
		let tail = self
			.memory
			.data(&self.store)
			.get(ptr as usize..)
			.ok_or_else(|| sandbox_error(format!("string at {:#x} is out of guest memory", ptr)))?;
		let len = tail
			.iter()
			.position(|b| *b == 0)
			.ok_or_else(|| sandbox_error(format!("string at {:#x} is not terminated", ptr)))?;
		Ok(Some(String::from_utf8_lossy(&tail[..len]).into_owned()))
	}

	/// Copy a NULL-terminated array of guest string pointers
	pub(crate) fn read_string_list(&self, ptr: u32) -> Result<Option<Vec<String>>> {
		if ptr == 0 {
			return Ok(None);
		}
		let mut values = Vec::new();
		let mut cursor = ptr;
		loop {
			let raw = self.read(cursor, POINTER_SIZE)?;
			let item = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
			if item == 0 {
				break;
			}
			if let Some(value) = self.read_c_str(item)? {
				values.push(value);
			}
			cursor = cursor
				.checked_add(POINTER_SIZE as u32)
				.ok_or_else(|| sandbox_error("string list runs past guest memory"))?;
		}
		Ok(Some(values))
	}

	/// Guest region large enough for `rows` coordinates, reused across calls
	pub(crate) fn scratch(&mut self, rows: usize) -> Result<u32> {
		let needed = rows.checked_mul(COORD_STRIDE).ok_or_else(|| sandbox_error("coordinate batch too large"))?;
		if let Some((ptr, capacity)) = self.scratch {
			if capacity as usize >= needed {
				return Ok(ptr);
			}
			self.scratch = None;
			self.free(ptr)?;
		}
		let capacity = needed.next_power_of_two().max(COORD_STRIDE * 16);
		let ptr = self.malloc(capacity)?;
		trace!(ptr, capacity, "scratch region grown");
		self.scratch = Some((ptr, capacity as u32));
		Ok(ptr)
	}

	pub(crate) fn write_coords(&mut self, ptr: u32, coords: &[PjCoordFFI]) -> Result<()> {
		let mut bytes = Vec::with_capacity(coords.len() * COORD_STRIDE);
		for row in coords {
			bytes.extend_from_slice(&row.to_le_bytes());
		}
		self.write(ptr, &bytes)
	}

	pub(crate) fn read_coords(&self, ptr: u32, coords: &mut [PjCoordFFI]) -> Result<()> {
		let bytes = self.read(ptr, coords.len() * COORD_STRIDE)?;
		for (row, chunk) in coords.iter_mut().zip(bytes.chunks_exact(COORD_STRIDE)) {
			if let Some(value) = PjCoordFFI::from_le_bytes(chunk) {
				*row = value;
			}
		}
		Ok(())
	}
}
