// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fs;

use parking_lot::Mutex;
use reproj_abi::{
	constants::{PROJ_FALSE, PROJ_TRUE},
	data::PjCoordFFI,
};
use reproj_core::{Backend, Handle, HandleClass, Operation, SandboxConfig};
use reproj_type::{BackendKind, Category, Direction, ObjectType, Result};
use tracing::{debug, instrument, trace};

use crate::{
	guest::{FREE, Guest, MALLOC, sandbox_error},
	paths::GuestPaths,
};

/// Engine calls executed inside a wasmtime sandbox
///
/// The store is single-threaded, so every call takes the guest lock. Database
/// paths are translated between host and guest mounts.
pub struct SandboxBackend {
	guest: Mutex<Guest>,
	paths: GuestPaths,
}

fn context_ptr(ctx: Option<&Handle>) -> Result<u32> {
	match ctx {
		None => Ok(0),
		Some(handle) => handle.expect_class(HandleClass::Context)?.guest_ptr(),
	}
}

fn object_ptr(handle: &Handle) -> Result<u32> {
	handle.expect_class(HandleClass::Object)?.guest_ptr()
}

fn flag(value: bool) -> i32 {
	if value {
		PROJ_TRUE
	} else {
		PROJ_FALSE
	}
}

impl SandboxBackend {
	#[instrument(name = "sandbox::load", level = "debug", skip_all)]
	pub fn load(config: &SandboxConfig) -> Result<Self> {
		let path = config.module.as_ref().ok_or_else(|| sandbox_error("no WebAssembly module configured"))?;
		let bytes = fs::read(path).map_err(|e| sandbox_error(format!("cannot read {}: {}", path.display(), e)))?;
		debug!(path = %path.display(), size = bytes.len(), "engine module read");
		Self::from_bytes(&bytes, config)
	}

	/// Instantiate an engine module held in memory and check its exports
	pub fn from_bytes(bytes: &[u8], config: &SandboxConfig) -> Result<Self> {
		let backend = Self {
			guest: Mutex::new(Guest::instantiate(bytes, config)?),
			paths: GuestPaths::new(config),
		};
		backend.verify()?;
		Ok(backend)
	}

	/// Run `f` with guest strings for `values`, freeing them afterwards
	fn with_strings<R>(
		guest: &mut Guest,
		values: &[Option<&str>],
		f: impl FnOnce(&mut Guest, &[u32]) -> Result<R>,
	) -> Result<R> {
		let mut ptrs = Vec::with_capacity(values.len());
		for value in values {
			let ptr = match value {
				Some(value) => match guest.write_c_str(value) {
					Ok(ptr) => ptr,
					Err(err) => {
						for ptr in ptrs {
							guest.free(ptr)?;
						}
						return Err(err);
					}
				},
				None => 0,
			};
			ptrs.push(ptr);
		}
		let result = f(guest, &ptrs);
		for ptr in ptrs {
			guest.free(ptr)?;
		}
		result
	}

	fn take_string_list(guest: &mut Guest, list: u32) -> Result<Option<Vec<String>>> {
		let values = guest.read_string_list(list)?;
		if list != 0 {
			guest.call::<u32, ()>(Operation::StringListDestroy.symbol(), list)?;
		}
		Ok(values)
	}

	#[cfg(test)]
	fn scratch_capacity(&self) -> Option<u32> {
		self.guest.lock().scratch.map(|(_, capacity)| capacity)
	}
}

impl Backend for SandboxBackend {
	fn kind(&self) -> BackendKind {
		BackendKind::Sandboxed
	}

	fn verify(&self) -> Result<()> {
		let mut guest = self.guest.lock();
		guest.func(MALLOC)?;
		guest.func(FREE)?;
		for op in Operation::REQUIRED {
			guest.func(op.symbol())?;
		}
		Ok(())
	}

	fn context_create(&self) -> Result<Option<Handle>> {
		let ctx = self.guest.lock().call::<(), u32>(Operation::ContextCreate.symbol(), ())?;
		Ok(Handle::sandboxed_context(ctx))
	}

	unsafe fn context_destroy(&self, ctx: &Handle) -> Result<()> {
		let ctx = context_ptr(Some(ctx))?;
		self.guest.lock().call::<u32, ()>(Operation::ContextDestroy.symbol(), ctx)
	}

	unsafe fn context_set_database_path(&self, ctx: Option<&Handle>, path: Option<&str>) -> Result<bool> {
		let ctx = context_ptr(ctx)?;
		let path = path.map(|host| self.paths.to_guest(host));
		if let Some(path) = &path {
			trace!(path = %path, "database path in guest");
		}
		let mut guest = self.guest.lock();
		let accepted = Self::with_strings(&mut guest, &[path.as_deref()], |guest, ptrs| {
			guest.call::<(u32, u32, u32, u32), i32>(Operation::ContextSetDatabasePath.symbol(), (ctx, ptrs[0], 0, 0))
		})?;
		Ok(accepted == PROJ_TRUE)
	}

	unsafe fn context_get_database_path(&self, ctx: Option<&Handle>) -> Result<Option<String>> {
		let ctx = context_ptr(ctx)?;
		let mut guest = self.guest.lock();
		let path = guest.call::<u32, u32>(Operation::ContextGetDatabasePath.symbol(), ctx)?;
		Ok(guest.read_c_str(path)?.map(|path| self.paths.to_host(&path)))
	}

	unsafe fn context_errno(&self, ctx: Option<&Handle>) -> Result<i32> {
		let ctx = context_ptr(ctx)?;
		self.guest.lock().call::<u32, i32>(Operation::ContextErrno.symbol(), ctx)
	}

	unsafe fn context_errno_string(&self, ctx: Option<&Handle>, code: i32) -> Result<Option<String>> {
		let ctx = context_ptr(ctx)?;
		let mut guest = self.guest.lock();
		let text = guest.call::<(u32, i32), u32>(Operation::ContextErrnoString.symbol(), (ctx, code))?;
		guest.read_c_str(text)
	}

	unsafe fn create_crs_to_crs(&self, ctx: Option<&Handle>, source: &str, target: &str) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let mut guest = self.guest.lock();
		let pj = Self::with_strings(&mut guest, &[Some(source), Some(target)], |guest, ptrs| {
			guest.call::<(u32, u32, u32, u32), u32>(Operation::CreateCrsToCrs.symbol(), (ctx, ptrs[0], ptrs[1], 0))
		})?;
		Ok(Handle::sandboxed_object(pj))
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
		let pj = self.guest.lock().call::<(u32, u32, u32, u32, u32), u32>(
			Operation::CreateCrsToCrsFromPj.symbol(),
			(ctx, source, target, 0, 0),
		)?;
		Ok(Handle::sandboxed_object(pj))
	}

	unsafe fn create_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		code: &str,
		category: Category,
	) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let mut guest = self.guest.lock();
		let pj = Self::with_strings(&mut guest, &[Some(authority), Some(code)], |guest, ptrs| {
			guest.call::<(u32, u32, u32, i32, i32, u32), u32>(
				Operation::CreateFromDatabase.symbol(),
				(ctx, ptrs[0], ptrs[1], category.code(), PROJ_FALSE, 0),
			)
		})?;
		Ok(Handle::sandboxed_object(pj))
	}

	unsafe fn trans_array(&self, pj: &Handle, direction: Direction, coords: &mut [PjCoordFFI]) -> Result<i32> {
		let pj = object_ptr(pj)?;
		let mut guest = self.guest.lock();
		guest.func(Operation::TransArray.symbol())?;
		if coords.is_empty() {
			return Ok(0);
		}
		let rows = u32::try_from(coords.len()).map_err(|_| sandbox_error("coordinate batch too large"))?;

		let buffer = guest.scratch(coords.len())?;
		guest.write_coords(buffer, coords)?;
		trace!(rows, direction = %direction, "trans_array");
		let code = guest.call::<(u32, i32, u32, u32), i32>(
			Operation::TransArray.symbol(),
			(pj, direction.code(), rows, buffer),
		)?;
		guest.read_coords(buffer, coords)?;
		Ok(code)
	}

	unsafe fn authorities_from_database(&self, ctx: Option<&Handle>) -> Result<Option<Vec<String>>> {
		let ctx = context_ptr(ctx)?;
		let mut guest = self.guest.lock();
		let list = guest.call::<u32, u32>(Operation::GetAuthoritiesFromDatabase.symbol(), ctx)?;
		Self::take_string_list(&mut guest, list)
	}

	unsafe fn codes_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		object_type: ObjectType,
		allow_deprecated: bool,
	) -> Result<Option<Vec<String>>> {
		let ctx = context_ptr(ctx)?;
		let mut guest = self.guest.lock();
		let list = Self::with_strings(&mut guest, &[Some(authority)], |guest, ptrs| {
			guest.call::<(u32, u32, i32, i32), u32>(
				Operation::GetCodesFromDatabase.symbol(),
				(ctx, ptrs[0], object_type.code(), flag(allow_deprecated)),
			)
		})?;
		Self::take_string_list(&mut guest, list)
	}

	unsafe fn normalize_for_visualization(&self, ctx: Option<&Handle>, pj: &Handle) -> Result<Option<Handle>> {
		let ctx = context_ptr(ctx)?;
		let pj = object_ptr(pj)?;
		let normalized =
			self.guest.lock().call::<(u32, u32), u32>(Operation::NormalizeForVisualization.symbol(), (ctx, pj))?;
		Ok(Handle::sandboxed_object(normalized))
	}

	unsafe fn name(&self, pj: &Handle) -> Result<Option<String>> {
		let pj = object_ptr(pj)?;
		let mut guest = self.guest.lock();
		let name = guest.call::<u32, u32>(Operation::GetName.symbol(), pj)?;
		guest.read_c_str(name)
	}

	unsafe fn destroy(&self, pj: &Handle) -> Result<()> {
		let pj = object_ptr(pj)?;
		self.guest.lock().call::<u32, u32>(Operation::Destroy.symbol(), pj)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use reproj_type::Error;

	use super::*;

	/// A stand-in engine module exporting the entry points with the engine's
	/// signatures. Transforms scale x by 2 forward and by 0.5 inverse.
	const ENGINE: &str = r#"
(module
  (memory (export "memory") 2)
  (global $heap (mut i32) (i32.const 1024))
  (global $errno (mut i32) (i32.const 0))
  (global $lists_released (export "lists_released") (mut i32) (i32.const 0))
  (global $db_path (export "db_path") (mut i32) (i32.const 16))

  (data (i32.const 16) "/proj/proj.db\00")
  (data (i32.const 32) "EPSG\00")
  (data (i32.const 40) "PROJ\00")
  (data (i32.const 48) "\20\00\00\00\28\00\00\00\00\00\00\00")

  (func $malloc (export "malloc") (param $size i32) (result i32)
    (local $ptr i32)
    global.get $heap
    local.set $ptr
    global.get $heap
    local.get $size
    i32.const 7
    i32.add
    i32.const -8
    i32.and
    i32.add
    global.set $heap
    local.get $ptr)

  (func (export "free") (param i32))

  (func (export "proj_context_create") (result i32)
    CONTEXT_CREATE_BODY)

  (func (export "proj_context_destroy") (param i32))

  (func (export "proj_context_set_database_path") (param i32 i32 i32 i32) (result i32)
    local.get 1
    i32.eqz
    if (result i32)
      i32.const 0
    else
      local.get 1
      global.set $db_path
      i32.const 1
    end)

  (func (export "proj_context_get_database_path") (param i32) (result i32)
    global.get $db_path)

  (func (export "proj_context_errno") (param i32) (result i32)
    global.get $errno)

  (func (export "proj_create_crs_to_crs") (param $ctx i32) (param $src i32) (param $dst i32) (param $area i32) (result i32)
    local.get $src
    i32.load8_u
    i32.const 69
    i32.eq
    if (result i32)
      i32.const 8
      call $malloc
    else
      i32.const 1027
      global.set $errno
      i32.const 0
    end)

  (func (export "proj_create_crs_to_crs_from_pj") (param i32 i32 i32 i32 i32) (result i32)
    i32.const 8
    call $malloc)

  (func (export "proj_create_from_database") (param i32 i32 i32 i32 i32 i32) (result i32)
    i32.const 8
    call $malloc)

  (func (export "proj_trans_array") (param $p i32) (param $dir i32) (param $n i32) (param $coord i32) (result i32)
    (local $i i32)
    (local $addr i32)
    (local $factor f64)
    local.get $dir
    i32.eqz
    if
      i32.const 0
      return
    end
    f64.const 2
    f64.const 0.5
    local.get $dir
    i32.const 1
    i32.eq
    select
    local.set $factor
    (block $done
      (loop $next
        local.get $i
        local.get $n
        i32.ge_u
        br_if $done
        local.get $coord
        local.get $i
        i32.const 32
        i32.mul
        i32.add
        local.set $addr
        local.get $addr
        local.get $addr
        f64.load
        local.get $factor
        f64.mul
        f64.store
        local.get $i
        i32.const 1
        i32.add
        local.set $i
        br $next))
    i32.const 0)

  (func (export "proj_get_authorities_from_database") (param i32) (result i32)
    i32.const 48)

  (func (export "proj_get_codes_from_database") (param i32 i32 i32 i32) (result i32)
    i32.const 0)

  (func (export "proj_string_list_destroy") (param i32)
    global.get $lists_released
    i32.const 1
    i32.add
    global.set $lists_released)

  (func (export "proj_destroy") (param i32) (result i32)
    i32.const 0)
)
"#;

	fn engine(context_create: &str) -> Vec<u8> {
		wat::parse_str(ENGINE.replace("CONTEXT_CREATE_BODY", context_create)).unwrap()
	}

	fn backend() -> SandboxBackend {
		SandboxBackend::from_bytes(&engine("i32.const 16 call $malloc"), &SandboxConfig::default()).unwrap()
	}

	#[test]
	fn test_context_lifecycle() {
		unsafe {
			let backend = backend();
			let ctx = backend.context_create().unwrap().unwrap();
			assert_eq!(ctx.backend(), BackendKind::Sandboxed);
			assert!(ctx.is_context());
			assert_eq!(backend.context_errno(Some(&ctx)).unwrap(), 0);
			assert_eq!(backend.context_get_database_path(Some(&ctx)).unwrap().as_deref(), Some("/proj/proj.db"));
			assert!(backend.context_set_database_path(Some(&ctx), Some("/proj/other.db")).unwrap());
			assert!(!backend.context_set_database_path(Some(&ctx), None).unwrap());
			backend.context_destroy(&ctx).unwrap();
		}
	}

	#[test]
	fn test_unknown_crs_returns_null_and_errno() {
		unsafe {
			let backend = backend();
			assert!(backend.create_crs_to_crs(None, "INVALID:999999", "EPSG:4326").unwrap().is_none());
			assert_eq!(backend.context_errno(None).unwrap(), 1027);
			assert!(backend.create_crs_to_crs(None, "EPSG:4326", "EPSG:2249").unwrap().is_some());
		}
	}

	#[test]
	fn test_trans_array_round_trips_through_guest_memory() {
		unsafe {
			let backend = backend();
			let pj = backend.create_crs_to_crs(None, "EPSG:4326", "EPSG:3857").unwrap().unwrap();
			let mut coords = [PjCoordFFI::new(1.5, 2.0, 3.0, 4.0), PjCoordFFI::new(-8.0, 0.0, 0.0, 0.0)];

			assert_eq!(backend.trans_array(&pj, Direction::Forward, &mut coords).unwrap(), 0);
			assert_eq!(coords[0], PjCoordFFI::new(3.0, 2.0, 3.0, 4.0));
			assert_eq!(coords[1], PjCoordFFI::new(-16.0, 0.0, 0.0, 0.0));

			backend.trans_array(&pj, Direction::Inverse, &mut coords).unwrap();
			assert_eq!(coords[0], PjCoordFFI::new(1.5, 2.0, 3.0, 4.0));

			backend.trans_array(&pj, Direction::Identity, &mut coords).unwrap();
			assert_eq!(coords[1], PjCoordFFI::new(-8.0, 0.0, 0.0, 0.0));
		}
	}

	#[test]
	fn test_scratch_region_grows_only() {
		unsafe {
			let backend = backend();
			let pj = backend.create_crs_to_crs(None, "EPSG:4326", "EPSG:3857").unwrap().unwrap();

			let mut small = vec![PjCoordFFI::new(1.0, 0.0, 0.0, 0.0); 4];
			backend.trans_array(&pj, Direction::Forward, &mut small).unwrap();
			let initial = backend.scratch_capacity().unwrap();

			let mut large = vec![PjCoordFFI::new(1.0, 0.0, 0.0, 0.0); 100];
			backend.trans_array(&pj, Direction::Forward, &mut large).unwrap();
			let grown = backend.scratch_capacity().unwrap();
			assert!(grown > initial);
			assert!(large.iter().all(|row| row.x == 2.0));

			backend.trans_array(&pj, Direction::Forward, &mut small).unwrap();
			assert_eq!(backend.scratch_capacity().unwrap(), grown);
			assert!(small.iter().all(|row| row.x == 4.0));
		}
	}

	#[test]
	fn test_string_lists_are_copied_and_released() {
		unsafe {
			let backend = backend();
			let authorities = backend.authorities_from_database(None).unwrap().unwrap();
			assert_eq!(authorities, vec!["EPSG".to_string(), "PROJ".to_string()]);

			let mut guest = backend.guest.lock();
			let released = guest.instance_global("lists_released");
			assert_eq!(released, Some(1));
			drop(guest);

			assert_eq!(backend.codes_from_database(None, "PROJ", ObjectType::Crs, false).unwrap(), None);
		}
	}

	#[test]
	fn test_optional_exports_are_resolution_errors() {
		unsafe {
			let backend = backend();
			let pj = backend.create_from_database(None, "EPSG", "4326", Category::Crs).unwrap().unwrap();
			assert!(matches!(
				backend.name(&pj),
				Err(Error::Resolution {
					operation: "proj_get_name",
					backend: BackendKind::Sandboxed
				})
			));
			assert!(backend.normalize_for_visualization(None, &pj).unwrap_err().is_resolution());
			assert!(backend.context_errno_string(None, 1027).unwrap_err().is_resolution());
		}
	}

	#[test]
	fn test_native_handles_are_rejected() {
		unsafe {
			let backend = backend();
			let foreign = Handle::native_object(0x1000 as *mut _).unwrap();
			assert!(matches!(backend.destroy(&foreign), Err(Error::BackendMismatch { .. })));
			let mut coords = [PjCoordFFI::ZERO];
			assert!(backend.trans_array(&foreign, Direction::Forward, &mut coords).is_err());
		}
	}

	#[test]
	fn test_interior_nul_is_rejected() {
		unsafe {
			let backend = backend();
			assert!(matches!(backend.create_crs_to_crs(None, "EPSG:\04326", "EPSG:3857"), Err(Error::InvalidArgument(_))));
		}
	}

	#[test]
	fn test_database_paths_are_translated_to_guest_mounts() {
		let root = std::env::temp_dir().join(format!("reproj-sandbox-mounts-{}", std::process::id()));
		let data = root.join("share");
		let databases = root.join("databases");
		fs::create_dir_all(&data).unwrap();
		fs::create_dir_all(&databases).unwrap();

		let config = SandboxConfig::default().with_data_dir(&data).with_database_dir(&databases);
		let backend = SandboxBackend::from_bytes(&engine("i32.const 16 call $malloc"), &config).unwrap();
		let host = databases.join("proj.db").display().to_string();

		unsafe {
			assert_eq!(
				backend.context_get_database_path(None).unwrap(),
				Some(data.join("proj.db").display().to_string())
			);

			assert!(backend.context_set_database_path(None, Some(&host)).unwrap());
			let mut guest = backend.guest.lock();
			let seen = guest.instance_global("db_path").unwrap() as u32;
			assert_eq!(guest.read_c_str(seen).unwrap().as_deref(), Some("/proj-db/proj.db"));
			drop(guest);

			assert_eq!(backend.context_get_database_path(None).unwrap(), Some(host.clone()));
		}

		fs::remove_dir_all(&root).unwrap();
	}

	#[test]
	fn test_missing_required_export_fails_verification() {
		let bytes = wat::parse_str(
			r#"(module
				(memory (export "memory") 1)
				(func (export "malloc") (param i32) (result i32) i32.const 8)
				(func (export "free") (param i32)))"#,
		)
		.unwrap();
		let err = SandboxBackend::from_bytes(&bytes, &SandboxConfig::default()).err().unwrap();
		assert!(err.is_resolution());
	}

	#[test]
	fn test_trap_is_backend_error() {
		let backend = SandboxBackend::from_bytes(&engine("unreachable"), &SandboxConfig::default()).unwrap();
		assert!(matches!(
			backend.context_create(),
			Err(Error::Backend {
				backend: BackendKind::Sandboxed,
				..
			})
		));
	}

	#[test]
	fn test_fuel_bounds_guest_execution() {
		let config = SandboxConfig::default().with_max_fuel(10_000);
		let spinning = SandboxBackend::from_bytes(&engine("(loop $spin (br $spin)) unreachable"), &config).unwrap();
		assert!(matches!(spinning.context_create(), Err(Error::Backend { .. })));

		let fuelled = SandboxBackend::from_bytes(&engine("i32.const 16 call $malloc"), &config).unwrap();
		for _ in 0..10 {
			assert!(fuelled.context_create().unwrap().is_some());
		}
	}

	#[test]
	fn test_missing_module_is_backend_error() {
		let config = SandboxConfig::default().with_module("/nonexistent/proj.wasm");
		assert!(matches!(SandboxBackend::load(&config), Err(Error::Backend { .. })));
		assert!(SandboxBackend::load(&SandboxConfig::default()).is_err());
	}
}
