// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Discovery and loading of the engine's shared library

use std::path::{Path, PathBuf};

use libloading::Library;
use reproj_core::NativeConfig;
use reproj_type::{BackendKind, Error, Result};
use tracing::{debug, trace};

/// File names tried in every search directory, most specific first
#[cfg(target_os = "linux")]
const LIBRARY_NAMES: &[&str] = &["libproj.so", "libproj.so.25", "libproj.so.22"];
#[cfg(target_os = "macos")]
const LIBRARY_NAMES: &[&str] = &["libproj.dylib", "libproj.25.dylib", "libproj.22.dylib"];
#[cfg(target_os = "windows")]
const LIBRARY_NAMES: &[&str] = &["proj.dll", "proj_9.dll", "proj_9_4.dll"];
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const LIBRARY_NAMES: &[&str] = &["libproj.so"];

pub struct LibraryLoader {
	library: Option<PathBuf>,
	search_paths: Vec<PathBuf>,
}

impl LibraryLoader {
	/// Configured directories are searched before the platform defaults
	pub fn new(config: &NativeConfig) -> Self {
		let mut search_paths = config.search_paths.clone();
		for path in Self::default_search_paths() {
			if !search_paths.contains(&path) {
				search_paths.push(path);
			}
		}
		Self {
			library: config.library.clone(),
			search_paths,
		}
	}

	fn default_search_paths() -> Vec<PathBuf> {
		let mut paths = Vec::new();

		#[cfg(target_os = "linux")]
		{
			paths.push(PathBuf::from("/usr/local/lib"));
			paths.push(PathBuf::from("/usr/lib"));
			if cfg!(target_pointer_width = "64") {
				paths.push(PathBuf::from("/usr/lib/x86_64-linux-gnu"));
				paths.push(PathBuf::from("/usr/lib/aarch64-linux-gnu"));
				paths.push(PathBuf::from("/usr/lib64"));
			}
			paths.push(PathBuf::from("/lib"));
		}

		#[cfg(target_os = "macos")]
		{
			paths.push(PathBuf::from("/opt/homebrew/lib"));
			paths.push(PathBuf::from("/usr/local/lib"));
			paths.push(PathBuf::from("/opt/local/lib"));
		}

		#[cfg(target_os = "windows")]
		{
			if let Ok(prefix) = std::env::var("OSGEO4W_ROOT") {
				paths.push(PathBuf::from(prefix).join("bin"));
			}
		}

		paths
	}

	pub fn library_names() -> &'static [&'static str] {
		LIBRARY_NAMES
	}

	pub fn search_paths(&self) -> &[PathBuf] {
		&self.search_paths
	}

	/// Existing files that look like the engine library, in search order
	pub fn candidates(&self) -> Vec<PathBuf> {
		self.search_paths
			.iter()
			.flat_map(|dir| LIBRARY_NAMES.iter().map(move |name| dir.join(name)))
			.filter(|path| path.is_file())
			.collect()
	}

	/// Load the configured library, or the first candidate that loads,
	/// falling back to the system loader's own lookup by bare name
	pub fn load(&self) -> Result<(Library, PathBuf)> {
		if let Some(path) = &self.library {
			return open(path).map(|library| (library, path.clone()));
		}

		let mut failures = Vec::new();
		let bare = LIBRARY_NAMES.iter().map(PathBuf::from);
		for path in self.candidates().into_iter().chain(bare) {
			match open(&path) {
				Ok(library) => {
					debug!(path = %path.display(), "engine library loaded");
					return Ok((library, path));
				}
				Err(err) => {
					trace!(path = %path.display(), error = %err, "candidate rejected");
					failures.push(err.to_string());
				}
			}
		}

		Err(Error::backend(
			BackendKind::Native,
			format!(
				"engine library not found in {} director{} ({})",
				self.search_paths.len(),
				if self.search_paths.len() == 1 {
					"y"
				} else {
					"ies"
				},
				failures.join("; ")
			),
		))
	}
}

fn open(path: &Path) -> Result<Library> {
	// Loading runs the library's initializers; the engine library is trusted.
	unsafe { Library::new(path) }
		.map_err(|e| Error::backend(BackendKind::Native, format!("failed to load {}: {}", path.display(), e)))
}
