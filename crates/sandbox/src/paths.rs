// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Host directories visible to the guest, and path translation across them
//!
//! The guest filesystem holds nothing but preopened directories. A host path
//! handed to the engine must be rewritten onto the mount that exposes it, and
//! a path the engine reports back is rewritten onto the host again.

use std::path::{Component, Path, PathBuf};

use reproj_core::SandboxConfig;

/// Mount point of [`SandboxConfig::data_dir`]
pub(crate) const GUEST_DATA_DIR: &str = "/proj";

/// Mount point of [`SandboxConfig::database_dir`]
pub(crate) const GUEST_DATABASE_DIR: &str = "/proj-db";

pub(crate) struct GuestPaths {
	mounts: Vec<(PathBuf, &'static str)>,
}

impl GuestPaths {
	pub(crate) fn new(config: &SandboxConfig) -> Self {
		let mut mounts = Vec::new();
		if let Some(dir) = &config.data_dir {
			mounts.push((dir.clone(), GUEST_DATA_DIR));
		}
		if let Some(dir) = &config.database_dir {
			mounts.push((dir.clone(), GUEST_DATABASE_DIR));
		}
		Self {
			mounts,
		}
	}

	pub(crate) fn mounts(&self) -> impl Iterator<Item = (&Path, &'static str)> {
		self.mounts.iter().map(|(dir, guest)| (dir.as_path(), *guest))
	}

	/// Guest view of a host path; paths outside every mount pass through
	pub(crate) fn to_guest(&self, host: &str) -> String {
		let path = Path::new(host);
		for (dir, guest) in self.mounts() {
			if let Ok(rest) = path.strip_prefix(dir) {
				return join(guest, rest);
			}
		}
		host.to_string()
	}

	/// Host view of a path reported by the guest
	pub(crate) fn to_host(&self, guest_path: &str) -> String {
		for (dir, guest) in self.mounts() {
			match guest_path.strip_prefix(guest) {
				Some("") => return dir.display().to_string(),
				Some(rest) if rest.starts_with('/') => {
					return dir.join(rest.trim_start_matches('/')).display().to_string();
				}
				_ => continue,
			}
		}
		guest_path.to_string()
	}
}

fn join(mount: &str, rest: &Path) -> String {
	let mut guest = mount.to_string();
	for component in rest.components() {
		if let Component::Normal(part) = component {
			guest.push('/');
			guest.push_str(&part.to_string_lossy());
		}
	}
	guest
}
