// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	path::{Path, PathBuf},
	ptr,
};

use libloading::Library;
use reproj_abi::{
	constants::{PROJ_FALSE, PROJ_TRUE},
	data::PjCoordFFI,
	function::StringListFFI,
};
use reproj_core::{Backend, Handle, NativeConfig};
use reproj_type::{BackendKind, Category, Direction, ObjectType, Result};
use tracing::{debug, instrument, trace};

use crate::{
	loader::LibraryLoader,
	marshal::{c_ptr, c_string, context_ptr, object_ptr, read_c_str, read_string_list},
	symbols::Symbols,
};

/// Engine calls made directly against a runtime-loaded `libproj`
pub struct NativeBackend {
	path: PathBuf,
	symbols: Symbols,
}

impl NativeBackend {
	#[instrument(name = "native::load", level = "debug", skip_all)]
	pub fn load(config: &NativeConfig) -> Result<Self> {
		let (library, path) = LibraryLoader::new(config).load()?;
		let backend = Self::from_library(library, path);
		backend.verify()?;
		Ok(backend)
	}

	/// Wrap an already opened library; entry points resolve on first use
	pub fn from_library(library: Library, path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			symbols: Symbols::new(library),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Copy out and release a string list returned by the engine
	fn take_string_list(&self, list: StringListFFI) -> Result<Option<Vec<String>>> {
		if list.is_null() {
			return Ok(None);
		}
		let values = unsafe { read_string_list(list) };
		let destroy = self.symbols.string_list_destroy()?;
		unsafe { destroy(list) };
		Ok(values)
	}
}

impl Backend for NativeBackend {
	fn kind(&self) -> BackendKind {
		BackendKind::Native
	}

	fn verify(&self) -> Result<()> {
		self.symbols.verify()?;
		debug!(path = %self.path.display(), "required symbols resolved");
		Ok(())
	}

	fn context_create(&self) -> Result<Option<Handle>> {
		let create = self.symbols.context_create()?;
		Ok(Handle::native_context(unsafe { create() }))
	}

	unsafe fn context_destroy(&self, ctx: &Handle) -> Result<()> {
		let ctx = context_ptr(Some(ctx))?;
		let destroy = self.symbols.context_destroy()?;
		unsafe { destroy(ctx) };
		Ok(())
	}

	unsafe fn context_set_database_path(&self, ctx: Option<&Handle>, path: Option<&str>) -> Result<bool> {
		let ctx = context_ptr(ctx)?;
		let path = path.map(c_string).transpose()?;
		let set = self.symbols.context_set_database_path()?;
		let accepted = unsafe { set(ctx, c_ptr(&path), ptr::null(), ptr::null()) };
		Ok(accepted == PROJ_TRUE)
	}

	unsafe fn context_get_database_path(&self, ctx: Option<&Handle>) -> Result<Option<String>> {
		let ctx = context_ptr(ctx)?;
		let get = self.symbols.context_get_database_path()?;
		Ok(unsafe { read_c_str(get(ctx)) })
	}

	unsafe fn context_errno(&self, ctx: Option<&Handle>) -> Result<i32> {
		let ctx = context_ptr(ctx)?;
		let errno = self.symbols.context_errno()?;
		Ok(unsafe { errno(ctx) })
	}

	unsafe fn context_errno_string(&self, ctx: Option<&Handle>, code: i32) -> Result<Option<String>> {
		let ctx = context_ptr(ctx)?;
		let errno_string = self.symbols.context_errno_string()?;
		Ok(unsafe { read_c_str(errno_string(ctx, code)) })
	}

	unsafe fn create_crs_to_crs(&self, ctx: Option<&Handle>, source: &str, target: &str) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let source = c_string(source)?;
		let target = c_string(target)?;
		let create = self.symbols.create_crs_to_crs()?;
		let pj = unsafe { create(ctx, source.as_ptr(), target.as_ptr(), ptr::null_mut()) };
		Ok(Handle::native_object(pj))
	}

	unsafe fn create_crs_to_crs_from_pj(
		&self,
		ctx: Option<&Handle>,
		source: &Handle,
		target: &Handle,
	) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let source = object_ptr(source)?;
		let target = object_ptr(target)?;
		let create = self.symbols.create_crs_to_crs_from_pj()?;
		let pj = unsafe { create(ctx, source, target, ptr::null_mut(), ptr::null()) };
		Ok(Handle::native_object(pj))
	}

	unsafe fn create_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		code: &str,
		category: Category,
	) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let authority = c_string(authority)?;
		let code = c_string(code)?;
		let create = self.symbols.create_from_database()?;
		let pj = unsafe {
			create(ctx, authority.as_ptr(), code.as_ptr(), category.code(), PROJ_FALSE, ptr::null())
		};
		Ok(Handle::native_object(pj))
	}

	unsafe fn trans_array(&self, pj: &Handle, direction: Direction, coords: &mut [PjCoordFFI]) -> Result<i32> {
		let pj = object_ptr(pj)?;
		let trans = self.symbols.trans_array()?;
		if coords.is_empty() {
			return Ok(0);
		}
		trace!(rows = coords.len(), direction = %direction, "trans_array");
		// PjCoordFFI has the layout of PJ_COORD, so rows are transformed in place.
		Ok(unsafe { trans(pj, direction.code(), coords.len(), coords.as_mut_ptr()) })
	}

	unsafe fn authorities_from_database(&self, ctx: Option<&Handle>) -> Result<Option<Vec<String>>> {
		let ctx = context_ptr(ctx)?;
		let get = self.symbols.get_authorities_from_database()?;
		let list = unsafe { get(ctx) };
		self.take_string_list(list)
	}

	unsafe fn codes_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		object_type: ObjectType,
		allow_deprecated: bool,
	) -> Result<Option<Vec<String>>> {
		let ctx = context_ptr(ctx)?;
		let authority = c_string(authority)?;
		let get = self.symbols.get_codes_from_database()?;
		let allow_deprecated = if allow_deprecated {
			PROJ_TRUE
		} else {
			PROJ_FALSE
		};
		let list = unsafe { get(ctx, authority.as_ptr(), object_type.code(), allow_deprecated) };
		self.take_string_list(list)
	}

	unsafe fn normalize_for_visualization(&self, ctx: Option<&Handle>, pj: &Handle) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let pj = object_ptr(pj)?;
		let normalize = self.symbols.normalize_for_visualization()?;
		Ok(Handle::native_object(unsafe { normalize(ctx, pj) }))
	}

	unsafe fn name(&self, pj: &Handle) -> Result<Option<String>> {
		let pj = object_ptr(pj)?;
		let get_name = self.symbols.get_name()?;
		Ok(unsafe { read_c_str(get_name(pj)) })
	}

	unsafe fn destroy(&self, pj: &Handle) -> Result<()> {
		let pj = object_ptr(pj)?;
		let destroy = self.symbols.destroy()?;
		unsafe { destroy(pj) };
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn installed() -> Option<NativeBackend> {
		NativeBackend::load(&NativeConfig::default()).ok()
	}

	#[test]
	fn test_sandboxed_handles_are_rejected_before_any_call() {
		unsafe {
			let Some(backend) = installed() else {
				return;
			};
			let foreign = Handle::sandboxed_object(64).unwrap();
			assert!(backend.destroy(&foreign).is_err());
			assert!(backend.name(&foreign).is_err());
		}
	}

	#[test]
	fn test_installed_library_round_trip() {
		unsafe {
			let Some(backend) = installed() else {
				return;
			};
			let ctx = backend.context_create().unwrap().unwrap();
			let pj = backend.create_crs_to_crs(Some(&ctx), "EPSG:4326", "EPSG:3857").unwrap().unwrap();

			let mut coords = [PjCoordFFI::new(0.0, 0.0, 0.0, 0.0)];
			assert_eq!(backend.trans_array(&pj, Direction::Forward, &mut coords).unwrap(), 0);
			assert!(coords[0].x.abs() < 1e-6);

			let authorities = backend.authorities_from_database(Some(&ctx)).unwrap().unwrap();
			assert!(authorities.iter().any(|a| a == "EPSG"));

			backend.destroy(&pj).unwrap();
			backend.context_destroy(&ctx).unwrap();
		}
	}
}
