// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory backend for tests
//!
//! [`FakeBackend`] follows the engine's calling conventions (NULL results,
//! per-context errno, `HUGE_VAL` rows, last-error return of array transforms)
//! over a tiny catalogue: EPSG:4326, EPSG:4979 and EPSG:3857. It can pose as
//! either backend kind and can hide entry points to simulate an engine build
//! that lacks them.

mod crs;

use std::{
	collections::{HashMap, HashSet},
	sync::atomic::{AtomicUsize, Ordering},
};

pub use crs::{EARTH_RADIUS, FakeCrs, convert};
use parking_lot::Mutex;
use reproj_abi::{
	constants::{
		PROJ_ERR_INVALID_OP_FILE_NOT_FOUND_OR_INVALID, PROJ_ERR_INVALID_OP_ILLEGAL_ARG_VALUE,
		PROJ_ERR_OTHER_API_MISUSE,
	},
	data::PjCoordFFI,
};
use reproj_type::{BackendKind, Category, Direction, Error, ObjectType, Result, errno::describe};

use crate::{
	backend::Backend,
	handle::{Handle, HandleClass, RawHandle},
	operation::Operation,
};

pub const DEFAULT_DATABASE: &str = "/usr/share/proj/proj.db";
pub const AUTHORITIES: [&str; 3] = ["EPSG", "ESRI", "PROJ"];

const HANDLE_ALIGN: u32 = 8;

#[derive(Debug, Default)]
struct FakeContext {
	database_path: Option<String>,
	errno: i32,
}

#[derive(Debug, Clone, Copy)]
enum FakeObject {
	Crs(FakeCrs),
	Operation {
		ctx: Option<u32>,
		source: FakeCrs,
		target: FakeCrs,
		lon_first: bool,
	},
}

impl FakeObject {
	fn name(&self) -> String {
		match self {
			FakeObject::Crs(crs) => crs.name().to_string(),
			FakeObject::Operation {
				source,
				target,
				..
			} => format!("{} to {}", source.name(), target.name()),
		}
	}
}

#[derive(Debug, Default)]
struct FakeState {
	next_id: u32,
	default: FakeContext,
	contexts: HashMap<u32, FakeContext>,
	objects: HashMap<u32, FakeObject>,
}

impl FakeState {
	fn allocate(&mut self) -> u32 {
		self.next_id += 1;
		self.next_id
	}
}

pub struct FakeBackend {
	kind: BackendKind,
	missing: HashSet<Operation>,
	refuse_contexts: bool,
	state: Mutex<FakeState>,
	destroyed_objects: AtomicUsize,
	destroyed_contexts: AtomicUsize,
}

impl FakeBackend {
	pub fn new(kind: BackendKind) -> Self {
		Self {
			kind,
			missing: HashSet::new(),
			refuse_contexts: false,
			state: Mutex::new(FakeState::default()),
			destroyed_objects: AtomicUsize::new(0),
			destroyed_contexts: AtomicUsize::new(0),
		}
	}

	/// Hide an entry point, as if the engine build did not export it
	pub fn without(mut self, operation: Operation) -> Self {
		self.missing.insert(operation);
		self
	}

	/// Make context creation return NULL
	pub fn refusing_contexts(mut self) -> Self {
		self.refuse_contexts = true;
		self
	}

	pub fn live_objects(&self) -> usize {
		self.state.lock().objects.len()
	}

	pub fn live_contexts(&self) -> usize {
		self.state.lock().contexts.len()
	}

	pub fn destroyed_objects(&self) -> usize {
		self.destroyed_objects.load(Ordering::SeqCst)
	}

	pub fn destroyed_contexts(&self) -> usize {
		self.destroyed_contexts.load(Ordering::SeqCst)
	}

	fn require(&self, operation: Operation) -> Result<()> {
		if self.missing.contains(&operation) {
			Err(self.unsupported(operation))
		} else {
			Ok(())
		}
	}

	fn handle(&self, class: HandleClass, id: u32) -> Option<Handle> {
		let raw = match self.kind {
			BackendKind::Native => RawHandle::Native((id * HANDLE_ALIGN) as usize),
			BackendKind::Sandboxed => RawHandle::Sandboxed(id * HANDLE_ALIGN),
		};
		Handle::new(class, raw)
	}

	fn id(&self, handle: &Handle, class: HandleClass) -> Result<u32> {
		handle.expect_backend(self.kind)?.expect_class(class)?;
		let raw = match handle.raw() {
			RawHandle::Native(addr) => addr as u64,
			RawHandle::Sandboxed(ptr) => ptr as u64,
		};
		Ok((raw / HANDLE_ALIGN as u64) as u32)
	}

	fn context_id(&self, ctx: Option<&Handle>) -> Result<Option<u32>> {
		ctx.map(|h| self.id(h, HandleClass::Context)).transpose()
	}

	fn context<'a>(&self, state: &'a mut FakeState, ctx: Option<u32>) -> Result<&'a mut FakeContext> {
		match ctx {
			None => Ok(&mut state.default),
			Some(id) => state
				.contexts
				.get_mut(&id)
				.ok_or_else(|| Error::backend(self.kind, format!("context {} does not exist", id))),
		}
	}

	fn fail(&self, state: &mut FakeState, ctx: Option<u32>, code: i32) -> Result<()> {
		self.context(state, ctx)?.errno = code;
		Ok(())
	}

	fn insert(&self, state: &mut FakeState, object: FakeObject) -> Option<Handle> {
		let id = state.allocate();
		state.objects.insert(id, object);
		self.handle(HandleClass::Object, id)
	}

	fn crs(&self, state: &FakeState, handle: &Handle) -> Result<Option<FakeCrs>> {
		let id = self.id(handle, HandleClass::Object)?;
		match state.objects.get(&id) {
			Some(FakeObject::Crs(crs)) => Ok(Some(*crs)),
			Some(_) => Ok(None),
			None => Err(Error::backend(self.kind, format!("object {} does not exist", id))),
		}
	}
}

impl Backend for FakeBackend {
	fn kind(&self) -> BackendKind {
		self.kind
	}

	fn verify(&self) -> Result<()> {
		Operation::REQUIRED.iter().try_for_each(|op| self.require(*op))
	}

	fn context_create(&self) -> Result<Option<Handle>> {
		self.require(Operation::ContextCreate)?;
		if self.refuse_contexts {
			return Ok(None);
		}
		let mut state = self.state.lock();
		let id = state.allocate();
		state.contexts.insert(id, FakeContext::default());
		Ok(self.handle(HandleClass::Context, id))
	}

	unsafe fn context_destroy(&self, ctx: &Handle) -> Result<()> {
		self.require(Operation::ContextDestroy)?;
		let id = self.id(ctx, HandleClass::Context)?;
		let mut state = self.state.lock();
		state.contexts.remove(&id).ok_or_else(|| Error::backend(self.kind, format!("context {} destroyed twice", id)))?;
		self.destroyed_contexts.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	unsafe fn context_set_database_path(&self, ctx: Option<&Handle>, path: Option<&str>) -> Result<bool> {
		self.require(Operation::ContextSetDatabasePath)?;
		let ctx = self.context_id(ctx)?;
		let mut state = self.state.lock();
		let context = self.context(&mut state, ctx)?;
		match path {
			None => {
				context.database_path = None;
				Ok(true)
			}
			Some(path) if path.ends_with(".db") => {
				context.database_path = Some(path.to_string());
				Ok(true)
			}
			Some(_) => {
				context.errno = PROJ_ERR_INVALID_OP_FILE_NOT_FOUND_OR_INVALID;
				Ok(false)
			}
		}
	}

	unsafe fn context_get_database_path(&self, ctx: Option<&Handle>) -> Result<Option<String>> {
		self.require(Operation::ContextGetDatabasePath)?;
		let ctx = self.context_id(ctx)?;
		let mut state = self.state.lock();
		let context = self.context(&mut state, ctx)?;
		Ok(Some(context.database_path.clone().unwrap_or_else(|| DEFAULT_DATABASE.to_string())))
	}

	unsafe fn context_errno(&self, ctx: Option<&Handle>) -> Result<i32> {
		self.require(Operation::ContextErrno)?;
		let ctx = self.context_id(ctx)?;
		let mut state = self.state.lock();
		Ok(self.context(&mut state, ctx)?.errno)
	}

	unsafe fn context_errno_string(&self, ctx: Option<&Handle>, code: i32) -> Result<Option<String>> {
		self.require(Operation::ContextErrnoString)?;
		self.context_id(ctx)?;
		Ok(Some(describe(code)))
	}

	unsafe fn create_crs_to_crs(&self, ctx: Option<&Handle>, source: &str, target: &str) -> Result<Option<Handle>> {
		self.require(Operation::CreateCrsToCrs)?;
		let ctx = self.context_id(ctx)?;
		let mut state = self.state.lock();
		match (FakeCrs::parse(source), FakeCrs::parse(target)) {
			(Some(source), Some(target)) => Ok(self.insert(
				&mut state,
				FakeObject::Operation {
					ctx,
					source,
					target,
					lon_first: false,
				},
			)),
			_ => {
				self.fail(&mut state, ctx, PROJ_ERR_INVALID_OP_ILLEGAL_ARG_VALUE)?;
				Ok(None)
			}
		}
	}

	unsafe fn create_crs_to_crs_from_pj(
		&self,
		ctx: Option<&Handle>,
		source: &Handle,
		target: &Handle,
	) -> Result<Option<Handle>> {
		self.require(Operation::CreateCrsToCrsFromPj)?;
		let ctx = self.context_id(ctx)?;
		let mut state = self.state.lock();
		match (self.crs(&state, source)?, self.crs(&state, target)?) {
			(Some(source), Some(target)) => Ok(self.insert(
				&mut state,
				FakeObject::Operation {
					ctx,
					source,
					target,
					lon_first: false,
				},
			)),
			_ => {
				self.fail(&mut state, ctx, PROJ_ERR_INVALID_OP_ILLEGAL_ARG_VALUE)?;
				Ok(None)
			}
		}
	}

	unsafe fn create_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		code: &str,
		category: Category,
	) -> Result<Option<Handle>> {
		self.require(Operation::CreateFromDatabase)?;
		let ctx = self.context_id(ctx)?;
		let mut state = self.state.lock();
		let found = if authority.eq_ignore_ascii_case("EPSG") && category == Category::Crs {
			FakeCrs::from_code(code)
		} else {
			None
		};
		match found {
			Some(crs) => Ok(self.insert(&mut state, FakeObject::Crs(crs))),
			None => {
				self.fail(&mut state, ctx, PROJ_ERR_INVALID_OP_ILLEGAL_ARG_VALUE)?;
				Ok(None)
			}
		}
	}

	unsafe fn trans_array(&self, pj: &Handle, direction: Direction, coords: &mut [PjCoordFFI]) -> Result<i32> {
		self.require(Operation::TransArray)?;
		let id = self.id(pj, HandleClass::Object)?;
		let mut state = self.state.lock();
		let object = *state
			.objects
			.get(&id)
			.ok_or_else(|| Error::backend(self.kind, format!("object {} does not exist", id)))?;

		let FakeObject::Operation {
			ctx,
			source,
			target,
			lon_first,
		} = object
		else {
			self.fail(&mut state, None, PROJ_ERR_OTHER_API_MISUSE)?;
			return Ok(PROJ_ERR_OTHER_API_MISUSE);
		};

		let (from, to) = match direction {
			Direction::Forward => (source, target),
			Direction::Inverse => (target, source),
			Direction::Identity => return Ok(0),
		};

		let mut last = 0;
		for row in coords.iter_mut() {
			if let Some(code) = convert(from, to, lon_first, row) {
				last = code;
			}
		}
		if last != 0 {
			self.fail(&mut state, ctx, last)?;
		}
		Ok(last)
	}

	unsafe fn authorities_from_database(&self, ctx: Option<&Handle>) -> Result<Option<Vec<String>>> {
		self.require(Operation::GetAuthoritiesFromDatabase)?;
		self.context_id(ctx)?;
		Ok(Some(AUTHORITIES.iter().map(|a| a.to_string()).collect()))
	}

	unsafe fn codes_from_database(
		&self,
		ctx: Option<&Handle>,
		authority: &str,
		object_type: ObjectType,
		allow_deprecated: bool,
	) -> Result<Option<Vec<String>>> {
		self.require(Operation::GetCodesFromDatabase)?;
		self.context_id(ctx)?;
		if authority != "EPSG" {
			return Ok(None);
		}
		let mut codes: Vec<String> =
			FakeCrs::ALL.into_iter().filter(|crs| crs.matches(object_type)).map(|crs| crs.code().to_string()).collect();
		if allow_deprecated && FakeCrs::WebMercator.matches(object_type) {
			codes.push(FakeCrs::DEPRECATED_WEB_MERCATOR.to_string());
		}
		codes.sort();
		Ok(Some(codes))
	}

	unsafe fn normalize_for_visualization(&self, ctx: Option<&Handle>, pj: &Handle) -> Result<Option<Handle>> {
		self.require(Operation::NormalizeForVisualization)?;
		let ctx = self.context_id(ctx)?;
		let id = self.id(pj, HandleClass::Object)?;
		let mut state = self.state.lock();
		match state.objects.get(&id).copied() {
			Some(FakeObject::Operation {
				source,
				target,
				..
			}) => Ok(self.insert(
				&mut state,
				FakeObject::Operation {
					ctx,
					source,
					target,
					lon_first: true,
				},
			)),
			Some(FakeObject::Crs(_)) => {
				self.fail(&mut state, ctx, PROJ_ERR_OTHER_API_MISUSE)?;
				Ok(None)
			}
			None => Err(Error::backend(self.kind, format!("object {} does not exist", id))),
		}
	}

	unsafe fn name(&self, pj: &Handle) -> Result<Option<String>> {
		self.require(Operation::GetName)?;
		let id = self.id(pj, HandleClass::Object)?;
		Ok(self.state.lock().objects.get(&id).map(FakeObject::name))
	}

	unsafe fn destroy(&self, pj: &Handle) -> Result<()> {
		self.require(Operation::Destroy)?;
		let id = self.id(pj, HandleClass::Object)?;
		self.state
			.lock()
			.objects
			.remove(&id)
			.ok_or_else(|| Error::backend(self.kind, format!("object {} destroyed twice", id)))?;
		self.destroyed_objects.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}
