// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env,
	path::{Path, PathBuf},
	str::FromStr,
};

use reproj_type::{BackendKind, Error, Result};
use serde::{Deserialize, Serialize};

pub const ENV_BACKEND: &str = "REPROJ_BACKEND";
pub const ENV_LIBRARY: &str = "REPROJ_LIBRARY";
pub const ENV_LIBRARY_PATH: &str = "REPROJ_LIBRARY_PATH";
pub const ENV_WASM_MODULE: &str = "REPROJ_WASM_MODULE";
pub const ENV_DATABASE: &str = "REPROJ_DATABASE";
pub const ENV_SANDBOX_FUEL: &str = "REPROJ_SANDBOX_FUEL";
pub const ENV_PROJ_DATA: &str = "PROJ_DATA";
pub const ENV_PROJ_LIB: &str = "PROJ_LIB";

/// Which backend `initialize` should pick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
	/// Native when it loads, sandboxed otherwise
	#[default]
	Auto,
	Native,
	Sandboxed,
}

impl BackendPreference {
	pub fn kind(self) -> Option<BackendKind> {
		match self {
			BackendPreference::Auto => None,
			BackendPreference::Native => Some(BackendKind::Native),
			BackendPreference::Sandboxed => Some(BackendKind::Sandboxed),
		}
	}
}

impl From<BackendKind> for BackendPreference {
	fn from(kind: BackendKind) -> Self {
		match kind {
			BackendKind::Native => BackendPreference::Native,
			BackendKind::Sandboxed => BackendPreference::Sandboxed,
		}
	}
}

impl FromStr for BackendPreference {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		if s.trim().eq_ignore_ascii_case("auto") {
			return Ok(BackendPreference::Auto);
		}
		BackendKind::from_str(s.trim()).map(BackendPreference::from)
	}
}

/// Where to find the native engine library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
	/// Explicit library path; skips discovery when set
	pub library: Option<PathBuf>,
	/// Directories searched before the platform defaults
	pub search_paths: Vec<PathBuf>,
}

impl NativeConfig {
	pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
		self.library = Some(library.into());
		self
	}

	pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.search_paths.push(path.into());
		self
	}
}

/// Limits and inputs for the WebAssembly engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
	/// Path of the compiled engine module
	pub module: Option<PathBuf>,
	/// Host directory holding `proj.db` and grids, preopened read-only as `/proj`
	pub data_dir: Option<PathBuf>,
	/// Host directory preopened read-only as `/proj-db`, for a database kept outside `data_dir`
	pub database_dir: Option<PathBuf>,
	/// Fuel granted to each guest call; unlimited when `None`
	pub max_fuel: Option<u64>,
	/// Upper bound on guest linear memory
	pub max_memory_bytes: usize,
	/// Forward guest stdout and stderr to the host
	pub inherit_stdio: bool,
}

impl Default for SandboxConfig {
	fn default() -> Self {
		Self {
			module: None,
			data_dir: None,
			database_dir: None,
			max_fuel: None,
			max_memory_bytes: 512 * 1024 * 1024,
			inherit_stdio: false,
		}
	}
}

impl SandboxConfig {
	pub fn with_module(mut self, module: impl Into<PathBuf>) -> Self {
		self.module = Some(module.into());
		self
	}

	pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.data_dir = Some(dir.into());
		self
	}

	pub fn with_database_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.database_dir = Some(dir.into());
		self
	}

	/// Whether `path` lies in a host directory the guest can see
	pub fn exposes(&self, path: &Path) -> bool {
		[&self.data_dir, &self.database_dir].into_iter().flatten().any(|dir| path.starts_with(dir))
	}

	pub fn with_max_fuel(mut self, fuel: u64) -> Self {
		self.max_fuel = Some(fuel);
		self
	}

	pub fn with_max_memory_bytes(mut self, bytes: usize) -> Self {
		self.max_memory_bytes = bytes;
		self
	}

	pub fn with_inherit_stdio(mut self, inherit: bool) -> Self {
		self.inherit_stdio = inherit;
		self
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjConfig {
	pub backend: BackendPreference,
	pub native: NativeConfig,
	pub sandbox: SandboxConfig,
	/// Database applied to every context created by the runtime
	pub database_path: Option<String>,
}

impl ProjConfig {
	pub fn with_backend(mut self, backend: BackendPreference) -> Self {
		self.backend = backend;
		self
	}

	pub fn with_native(mut self, native: NativeConfig) -> Self {
		self.native = native;
		self
	}

	pub fn with_sandbox(mut self, sandbox: SandboxConfig) -> Self {
		self.sandbox = sandbox;
		self
	}

	pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
		self.database_path = Some(path.into());
		self
	}

	/// Sandbox settings with the configured database's directory exposed to the guest
	pub fn sandbox_config(&self) -> SandboxConfig {
		let mut sandbox = self.sandbox.clone();
		if let Some(path) = self.database_path.as_deref().map(Path::new) {
			if sandbox.database_dir.is_none() && !sandbox.exposes(path) {
				sandbox.database_dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).map(Path::to_path_buf);
			}
		}
		sandbox
	}

	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Build a configuration from an arbitrary variable source
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
		let mut config = ProjConfig::default();

		if let Some(backend) = get(ENV_BACKEND) {
			config.backend = backend.parse()?;
		}

		if let Some(library) = get(ENV_LIBRARY) {
			config.native.library = Some(PathBuf::from(library));
		}
		if let Some(paths) = get(ENV_LIBRARY_PATH) {
			config.native.search_paths = env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()).collect();
		}

		if let Some(module) = get(ENV_WASM_MODULE) {
			config.sandbox.module = Some(PathBuf::from(module));
		}
		if let Some(dir) = get(ENV_PROJ_DATA).or_else(|| get(ENV_PROJ_LIB)) {
			config.sandbox.data_dir = env::split_paths(&dir).next();
		}
		if let Some(fuel) = get(ENV_SANDBOX_FUEL) {
			let fuel = fuel
				.trim()
				.parse::<u64>()
				.map_err(|e| Error::Config(format!("{} must be an integer: {}", ENV_SANDBOX_FUEL, e)))?;
			config.sandbox.max_fuel = Some(fuel);
		}

		config.database_path = get(ENV_DATABASE);

		Ok(config)
	}
}
