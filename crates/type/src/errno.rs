// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Engine error codes and their descriptions
//!
//! Descriptions follow the engine's own wording so that text produced from
//! this table is indistinguishable from text produced by the engine lookup.

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use reproj_abi::constants::*;

pub const SUCCESS_DESCRIPTION: &str = "Success";

/// Integer result of an engine call; 0 denotes success
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
	pub const SUCCESS: ErrorCode = ErrorCode(0);

	pub const fn is_success(self) -> bool {
		self.0 == 0
	}

	/// Description from the static table; never empty
	pub fn description(self) -> String {
		describe(self.0)
	}
}

impl From<i32> for ErrorCode {
	fn from(code: i32) -> Self {
		ErrorCode(code)
	}
}

impl From<ErrorCode> for i32 {
	fn from(code: ErrorCode) -> Self {
		code.0
	}
}

impl Display for ErrorCode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.0, describe(self.0))
	}
}

/// Static description of an engine error code
pub fn describe(code: i32) -> String {
	if code == 0 {
		return SUCCESS_DESCRIPTION.to_string();
	}

	let known = match code {
		PROJ_ERR_INVALID_OP_WRONG_SYNTAX => Some("Invalid PROJ string syntax"),
		PROJ_ERR_INVALID_OP_MISSING_ARG => Some("Missing argument"),
		PROJ_ERR_INVALID_OP_ILLEGAL_ARG_VALUE => Some("Invalid value for an argument"),
		PROJ_ERR_INVALID_OP_MUTUALLY_EXCLUSIVE_ARGS => Some("Mutually exclusive arguments"),
		PROJ_ERR_INVALID_OP_FILE_NOT_FOUND_OR_INVALID => Some("File not found or invalid"),
		PROJ_ERR_COORD_TRANSFM_INVALID_COORD => Some("Invalid coordinate"),
		PROJ_ERR_COORD_TRANSFM_OUTSIDE_PROJECTION_DOMAIN => Some("Point outside of projection domain"),
		PROJ_ERR_COORD_TRANSFM_NO_OPERATION => Some("No operation matching criteria found for coordinate"),
		PROJ_ERR_COORD_TRANSFM_OUTSIDE_GRID => Some("Coordinate to transform falls outside grid"),
		PROJ_ERR_COORD_TRANSFM_GRID_AT_NODATA => {
			Some("Coordinate to transform falls into a grid cell that evaluates to nodata")
		}
		PROJ_ERR_COORD_TRANSFM_NO_CONVERGENCE => Some("Iterative method fails to converge on coordinate to transform"),
		PROJ_ERR_COORD_TRANSFM_MISSING_TIME => Some("Coordinate to transform lacks time"),
		PROJ_ERR_OTHER_API_MISUSE => Some("API misuse"),
		PROJ_ERR_OTHER_NO_INVERSE_OP => Some("No inverse operation"),
		PROJ_ERR_OTHER_NETWORK_ERROR => Some("Network error when accessing a remote resource"),
		_ => None,
	};

	if let Some(text) = known {
		return text.to_string();
	}

	// Codes are grouped in bit ranges; unknown members fall back to their group.
	match code {
		c if (PROJ_ERR_INVALID_OP..PROJ_ERR_COORD_TRANSFM).contains(&c) => {
			"Unspecified error related to coordinate operation initialization".to_string()
		}
		c if (PROJ_ERR_COORD_TRANSFM..PROJ_ERR_OTHER).contains(&c) => {
			"Unspecified error related to coordinate transformation".to_string()
		}
		c => format!("Unknown error (code {})", c),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_success_is_described() {
		assert!(ErrorCode::SUCCESS.is_success());
		assert_eq!(ErrorCode::SUCCESS.description(), "Success");
	}

	#[test]
	fn test_known_codes() {
		assert_eq!(describe(2050), "Point outside of projection domain");
		assert_eq!(describe(1027), "Invalid value for an argument");
	}

	#[test]
	fn test_group_fallback() {
		assert_eq!(describe(1024), "Unspecified error related to coordinate operation initialization");
		assert_eq!(describe(2048), "Unspecified error related to coordinate transformation");
	}

	#[test]
	fn test_unknown_code_is_never_empty() {
		for code in [-7, 1, 99, 4096, 9999] {
			assert!(!describe(code).is_empty());
		}
		assert_eq!(describe(9999), "Unknown error (code 9999)");
	}

	#[test]
	fn test_display() {
		assert_eq!(ErrorCode(2049).to_string(), "2049 (Invalid coordinate)");
	}
}
