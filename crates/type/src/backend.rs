// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Execution path servicing engine calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
	/// Platform-installed shared library called through FFI
	Native,
	/// Engine compiled to WebAssembly, executed inside a sandbox
	Sandboxed,
}

impl BackendKind {
	/// The other backend
	pub const fn flip(self) -> Self {
		match self {
			BackendKind::Native => BackendKind::Sandboxed,
			BackendKind::Sandboxed => BackendKind::Native,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			BackendKind::Native => "native",
			BackendKind::Sandboxed => "sandboxed",
		}
	}
}

impl Display for BackendKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BackendKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"native" | "ffi" => Ok(BackendKind::Native),
			"sandboxed" | "sandbox" | "wasm" => Ok(BackendKind::Sandboxed),
			other => Err(Error::Config(format!("unknown backend `{}`", other))),
		}
	}
}
