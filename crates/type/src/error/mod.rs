// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::BackendKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("operation `{operation}` is not exposed by the {backend} backend")]
	Resolution {
		operation: &'static str,
		backend: BackendKind,
	},

	#[error("{backend} backend failure: {message}")]
	Backend {
		backend: BackendKind,
		message: String,
		code: Option<i32>,
	},

	#[error("could not resolve `{crs}`: {reason} (code {code})")]
	CrsResolution {
		crs: String,
		code: i32,
		reason: String,
	},

	#[error("unknown authority `{0}`")]
	UnknownAuthority(String),

	#[error("handle belongs to the {found} backend but was passed to the {expected} backend")]
	BackendMismatch {
		expected: BackendKind,
		found: BackendKind,
	},

	#[error("context has been destroyed")]
	ContextDestroyed,

	#[error("coordinate has {0} components, expected between 1 and 4")]
	InvalidDimension(usize),

	#[error("index {index} out of bounds for length {len}")]
	OutOfBounds {
		index: usize,
		len: usize,
	},

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("invalid configuration: {0}")]
	Config(String),
}

impl Error {
	pub fn backend(backend: BackendKind, message: impl Into<String>) -> Self {
		Error::Backend {
			backend,
			message: message.into(),
			code: None,
		}
	}

	pub fn backend_with_code(backend: BackendKind, message: impl Into<String>, code: i32) -> Self {
		Error::Backend {
			backend,
			message: message.into(),
			code: Some(code),
		}
	}

	/// Engine error code carried by this error, if any
	pub fn code(&self) -> Option<i32> {
		match self {
			Error::Backend {
				code,
				..
			} => *code,
			Error::CrsResolution {
				code,
				..
			} => Some(*code),
			_ => None,
		}
	}

	pub fn is_resolution(&self) -> bool {
		matches!(self, Error::Resolution { .. })
	}
}
