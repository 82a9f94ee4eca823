// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A single instantiated engine module and its store

use std::collections::HashMap;

use reproj_core::SandboxConfig;
use reproj_type::{BackendKind, Error, Result};
use tracing::{debug, instrument, trace};
use wasmtime::{
	Config, Engine, Func, Instance, Linker, Memory, Module, Store, StoreLimits, StoreLimitsBuilder, WasmParams,
	WasmResults,
};
use wasmtime_wasi::{
	DirPerms, FilePerms, WasiCtxBuilder,
	p1::{self, WasiP1Ctx},
};

use crate::paths::{GUEST_DATA_DIR, GuestPaths};

pub(crate) const MALLOC: &str = "malloc";
pub(crate) const FREE: &str = "free";
const MEMORY: &str = "memory";
const INITIALIZE: &str = "_initialize";

pub(crate) struct SandboxState {
	wasi: WasiP1Ctx,
	limits: StoreLimits,
}

pub(crate) fn sandbox_error(message: impl Into<String>) -> Error {
	Error::backend(BackendKind::Sandboxed, message)
}

pub(crate) struct Guest {
	pub(crate) store: Store<SandboxState>,
	pub(crate) memory: Memory,
	instance: Instance,
	exports: HashMap<&'static str, Func>,
	max_fuel: Option<u64>,
	/// Reusable allocation for coordinate batches: pointer and capacity in bytes
	pub(crate) scratch: Option<(u32, u32)>,
}

impl Guest {
	#[instrument(name = "sandbox::instantiate", level = "debug", skip_all)]
	pub(crate) fn instantiate(bytes: &[u8], config: &SandboxConfig) -> Result<Self> {
		let mut engine_config = Config::new();
		engine_config.consume_fuel(config.max_fuel.is_some());
		let engine = Engine::new(&engine_config).map_err(|e| sandbox_error(format!("engine: {}", e)))?;
		let module = Module::new(&engine, bytes).map_err(|e| sandbox_error(format!("invalid module: {}", e)))?;

		let mut wasi = WasiCtxBuilder::new();
		wasi.env("PROJ_DATA", GUEST_DATA_DIR);
		if config.inherit_stdio {
			wasi.inherit_stdio();
		}
		for (dir, guest) in GuestPaths::new(config).mounts() {
			wasi.preopened_dir(dir, guest, DirPerms::READ, FilePerms::READ)
				.map_err(|e| sandbox_error(format!("cannot expose {}: {}", dir.display(), e)))?;
		}

		let state = SandboxState {
			wasi: wasi.build_p1(),
			limits: StoreLimitsBuilder::new().memory_size(config.max_memory_bytes).build(),
		};
		let mut store = Store::new(&engine, state);
		store.limiter(|state| &mut state.limits);

		let mut linker: Linker<SandboxState> = Linker::new(&engine);
		p1::add_to_linker_sync(&mut linker, |state: &mut SandboxState| &mut state.wasi)
			.map_err(|e| sandbox_error(format!("wasi: {}", e)))?;

		if let Some(fuel) = config.max_fuel {
			store.set_fuel(fuel).map_err(|e| sandbox_error(e.to_string()))?;
		}
		let instance =
			linker.instantiate(&mut store, &module).map_err(|e| sandbox_error(format!("instantiation: {}", e)))?;
		let memory = instance
			.get_memory(&mut store, MEMORY)
			.ok_or_else(|| sandbox_error("module does not export its linear memory"))?;

		let mut guest = Self {
			store,
			memory,
			instance,
			exports: HashMap::new(),
			max_fuel: config.max_fuel,
			scratch: None,
		};

		if guest.instance.get_func(&mut guest.store, INITIALIZE).is_some() {
			debug!("running reactor initializer");
			guest.call::<(), ()>(INITIALIZE, ())?;
		}

		Ok(guest)
	}

	/// Look up an export, caching it for later calls
	pub(crate) fn func(&mut self, name: &'static str) -> Result<Func> {
		if let Some(func) = self.exports.get(name) {
			return Ok(*func);
		}
		let func = self.instance.get_func(&mut self.store, name).ok_or(Error::Resolution {
			operation: name,
			backend: BackendKind::Sandboxed,
		})?;
		trace!(export = name, "export resolved");
		self.exports.insert(name, func);
		Ok(func)
	}

	pub(crate) fn call<P, R>(&mut self, name: &'static str, params: P) -> Result<R>
	where
		P: WasmParams,
		R: WasmResults,
	{
		let func = self.func(name)?;
		let typed = func
			.typed::<P, R>(&self.store)
			.map_err(|e| sandbox_error(format!("export `{}` has an unexpected signature: {}", name, e)))?;
		if let Some(fuel) = self.max_fuel {
			self.store.set_fuel(fuel).map_err(|e| sandbox_error(e.to_string()))?;
		}
		typed.call(&mut self.store, params).map_err(|e| sandbox_error(format!("`{}` trapped: {}", name, e)))
	}

	#[cfg(test)]
	pub(crate) fn instance_global(&mut self, name: &str) -> Option<i32> {
		let global = self.instance.get_global(&mut self.store, name)?;
		global.get(&mut self.store).i32()
	}
}
