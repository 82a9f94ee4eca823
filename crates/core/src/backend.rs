// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use reproj_abi::data::PjCoordFFI;
use reproj_type::{BackendKind, Category, Direction, Error, ObjectType, Result};

use crate::{handle::Handle, operation::Operation};

/// The single dispatch object behind every engine call
///
/// Methods mirror the engine's C API closely: an absent context means the
/// engine's default context, NULL results come back as `None` and string
/// lists are copied out and released before returning. Mapping NULL to a
/// meaningful error is left to the caller, which knows what was asked for.
///
/// Implementations must reject handles produced by another backend with
/// [`Error::BackendMismatch`].
///
/// # Safety
///
/// Every method taking a [`Handle`] is `unsafe`: the native backend turns the
/// handle back into an engine pointer. Callers must pass only handles this
/// backend returned and has not released yet, with the context outliving the
/// objects created in it. `reproj`'s `Context`, `Transform` and `Crs` hold
/// that contract through ownership and borrows.
pub trait Backend: Send + Sync {
	fn kind(&self) -> BackendKind;

	/// Resolve every required entry point, failing on the first missing one
	fn verify(&self) -> Result<()> {
		Ok(())
	}

	fn context_create(&self) -> Result<Option<Handle>>;

	unsafe fn context_destroy(&self, ctx: &Handle) -> Result<()>;

	/// `None` resets to the engine default; returns whether the engine accepted it
	unsafe fn context_set_database_path(&self, ctx: Option<&Handle>, path: Option<&str>) -> Result<bool>;

	unsafe fn context_get_database_path(&self, ctx: Option<&Handle>) -> Result<Option<String>>;

	unsafe fn context_errno(&self, ctx: Option<&Handle>) -> Result<i32>;

	unsafe fn context_errno_string(&self, _ctx: Option<&Handle>, _code: i32) -> Result<Option<String>> {
		Err(self.unsupported(Operation::ContextErrnoString))
	}

	unsafe fn create_crs_to_crs(&self, ctx: Option<&Handle>, source: &str, target: &str) -> Result<Option<Handle>>;

	unsafe fn create_crs_to_crs_from_pj(
		&self,
		ctx: Option<&Handle>,
		source: &Handle,
		target: &Handle,
	) -> Result<Option<Handle>>;

	unsafe fn create_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		code: &str,
		category: Category,
	) -> Result<Option<Handle>>;

	/// Transform `coords` in place; returns the engine's result code
	unsafe fn trans_array(&self, pj: &Handle, direction: Direction, coords: &mut [PjCoordFFI]) -> Result<i32>;

	unsafe fn authorities_from_database(&self, ctx: Option<&Handle>) -> Result<Option<Vec<String>>>;

	unsafe fn codes_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		object_type: ObjectType,
		allow_deprecated: bool,
	) -> Result<Option<Vec<String>>>;

	unsafe fn normalize_for_visualization(&self, _ctx: Option<&Handle>, _pj: &Handle) -> Result<Option<Handle>> {
		Err(self.unsupported(Operation::NormalizeForVisualization))
	}

	unsafe fn name(&self, _pj: &Handle) -> Result<Option<String>> {
		Err(self.unsupported(Operation::GetName))
	}

	unsafe fn destroy(&self, pj: &Handle) -> Result<()>;

	fn unsupported(&self, operation: Operation) -> Error {
		Error::Resolution {
			operation: operation.symbol(),
			backend: self.kind(),
		}
	}
}
