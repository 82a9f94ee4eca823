// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Fixed-stride coordinate storage
//!
//! A [`CoordBuffer`] holds `N` rows of four doubles in the exact layout of the
//! engine's `PJ_COORD`, so a batch can be handed to the native library
//! without copying and to the sandbox with a single memcpy.

use reproj_abi::data::{COORD_COMPONENTS, PjCoordFFI};
use reproj_type::{Error, Result};

/// Pad a 1 to 4 component coordinate to a full row
///
/// Missing components are 0.0; the engine relies on z and t being zero for
/// 2D input.
pub fn pad(values: &[f64]) -> Result<PjCoordFFI> {
	if values.is_empty() || values.len() > COORD_COMPONENTS {
		return Err(Error::InvalidDimension(values.len()));
	}
	let mut row = [0.0; COORD_COMPONENTS];
	row[..values.len()].copy_from_slice(values);
	Ok(PjCoordFFI::from_array(row))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordBuffer {
	rows: Vec<PjCoordFFI>,
}

impl CoordBuffer {
	/// `n` zeroed rows
	pub fn new(n: usize) -> Self {
		Self {
			rows: vec![PjCoordFFI::ZERO; n],
		}
	}

	/// A single-row buffer
	pub fn from_coord(values: &[f64]) -> Result<Self> {
		Ok(Self {
			rows: vec![pad(values)?],
		})
	}

	pub fn from_coords<C: AsRef<[f64]>>(coords: &[C]) -> Result<Self> {
		let rows = coords.iter().map(|c| pad(c.as_ref())).collect::<Result<Vec<_>>>()?;
		Ok(Self {
			rows,
		})
	}

	pub fn from_rows(rows: Vec<PjCoordFFI>) -> Self {
		Self {
			rows,
		}
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Overwrite rows starting at 0, growing the buffer when more rows are
	/// given than it holds. Rows past the input are left untouched.
	pub fn set_coords<C: AsRef<[f64]>>(&mut self, coords: &[C]) -> Result<()> {
		let padded = coords.iter().map(|c| pad(c.as_ref())).collect::<Result<Vec<_>>>()?;
		if padded.len() > self.rows.len() {
			self.rows.resize(padded.len(), PjCoordFFI::ZERO);
		}
		self.rows[..padded.len()].copy_from_slice(&padded);
		Ok(())
	}

	pub fn set_coord(&mut self, index: usize, values: &[f64]) -> Result<()> {
		let len = self.rows.len();
		let padded = pad(values)?;
		let row = self.rows.get_mut(index).ok_or(Error::OutOfBounds {
			index,
			len,
		})?;
		*row = padded;
		Ok(())
	}

	pub fn coord(&self, index: usize) -> Result<[f64; COORD_COMPONENTS]> {
		self.rows.get(index).map(|row| row.to_array()).ok_or(Error::OutOfBounds {
			index,
			len: self.rows.len(),
		})
	}

	/// Write `values` into column `column` of rows `0..values.len()`
	///
	/// Other columns are not touched. Writing more values than there are rows
	/// fails without modifying the buffer.
	pub fn set_col(&mut self, column: usize, values: &[f64]) -> Result<()> {
		if column >= COORD_COMPONENTS {
			return Err(Error::OutOfBounds {
				index: column,
				len: COORD_COMPONENTS,
			});
		}
		if values.len() > self.rows.len() {
			return Err(Error::OutOfBounds {
				index: values.len() - 1,
				len: self.rows.len(),
			});
		}
		for (row, value) in self.rows.iter_mut().zip(values) {
			if let Some(slot) = row.get_mut(column) {
				*slot = *value;
			}
		}
		Ok(())
	}

	pub fn set_xcol(&mut self, values: &[f64]) -> Result<()> {
		self.set_col(0, values)
	}

	pub fn set_ycol(&mut self, values: &[f64]) -> Result<()> {
		self.set_col(1, values)
	}

	pub fn set_zcol(&mut self, values: &[f64]) -> Result<()> {
		self.set_col(2, values)
	}

	pub fn set_tcol(&mut self, values: &[f64]) -> Result<()> {
		self.set_col(3, values)
	}

	pub fn col(&self, column: usize) -> Result<Vec<f64>> {
		if column >= COORD_COMPONENTS {
			return Err(Error::OutOfBounds {
				index: column,
				len: COORD_COMPONENTS,
			});
		}
		Ok(self.rows.iter().filter_map(|row| row.get(column)).collect())
	}

	pub fn rows(&self) -> &[PjCoordFFI] {
		&self.rows
	}

	/// Rows as the engine sees them
	pub fn as_ffi_mut(&mut self) -> &mut [PjCoordFFI] {
		&mut self.rows
	}

	pub fn to_vec(&self) -> Vec<[f64; COORD_COMPONENTS]> {
		self.rows.iter().map(|row| row.to_array()).collect()
	}
}
