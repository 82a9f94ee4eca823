// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

/// Engine entry points reachable through a backend
///
/// The symbol name is identical for the native library and the WebAssembly
/// module, so one catalogue serves both resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
	ContextCreate,
	ContextDestroy,
	ContextSetDatabasePath,
	ContextGetDatabasePath,
	ContextErrno,
	ContextErrnoString,
	CreateCrsToCrs,
	CreateCrsToCrsFromPj,
	CreateFromDatabase,
	TransArray,
	GetAuthoritiesFromDatabase,
	GetCodesFromDatabase,
	StringListDestroy,
	Destroy,
	NormalizeForVisualization,
	GetName,
}

impl Operation {
	pub const ALL: [Operation; 16] = [
		Operation::ContextCreate,
		Operation::ContextDestroy,
		Operation::ContextSetDatabasePath,
		Operation::ContextGetDatabasePath,
		Operation::ContextErrno,
		Operation::ContextErrnoString,
		Operation::CreateCrsToCrs,
		Operation::CreateCrsToCrsFromPj,
		Operation::CreateFromDatabase,
		Operation::TransArray,
		Operation::GetAuthoritiesFromDatabase,
		Operation::GetCodesFromDatabase,
		Operation::StringListDestroy,
		Operation::Destroy,
		Operation::NormalizeForVisualization,
		Operation::GetName,
	];

	/// Entry points a backend must expose before it can be selected
	pub const REQUIRED: [Operation; 13] = [
		Operation::ContextCreate,
		Operation::ContextDestroy,
		Operation::ContextSetDatabasePath,
		Operation::ContextGetDatabasePath,
		Operation::ContextErrno,
		Operation::CreateCrsToCrs,
		Operation::CreateCrsToCrsFromPj,
		Operation::CreateFromDatabase,
		Operation::TransArray,
		Operation::GetAuthoritiesFromDatabase,
		Operation::GetCodesFromDatabase,
		Operation::StringListDestroy,
		Operation::Destroy,
	];

	pub const fn symbol(self) -> &'static str {
		match self {
			Operation::ContextCreate => "proj_context_create",
			Operation::ContextDestroy => "proj_context_destroy",
			Operation::ContextSetDatabasePath => "proj_context_set_database_path",
			Operation::ContextGetDatabasePath => "proj_context_get_database_path",
			Operation::ContextErrno => "proj_context_errno",
			Operation::ContextErrnoString => "proj_context_errno_string",
			Operation::CreateCrsToCrs => "proj_create_crs_to_crs",
			Operation::CreateCrsToCrsFromPj => "proj_create_crs_to_crs_from_pj",
			Operation::CreateFromDatabase => "proj_create_from_database",
			Operation::TransArray => "proj_trans_array",
			Operation::GetAuthoritiesFromDatabase => "proj_get_authorities_from_database",
			Operation::GetCodesFromDatabase => "proj_get_codes_from_database",
			Operation::StringListDestroy => "proj_string_list_destroy",
			Operation::Destroy => "proj_destroy",
			Operation::NormalizeForVisualization => "proj_normalize_for_visualization",
			Operation::GetName => "proj_get_name",
		}
	}

	pub fn is_required(self) -> bool {
		Self::REQUIRED.contains(&self)
	}

	pub fn from_symbol(symbol: &str) -> Option<Operation> {
		Self::ALL.into_iter().find(|op| op.symbol() == symbol)
	}
}

impl Display for Operation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn test_symbols_are_unique() {
		let symbols: HashSet<_> = Operation::ALL.iter().map(|op| op.symbol()).collect();
		assert_eq!(symbols.len(), Operation::ALL.len());
	}

	#[test]
	fn test_symbol_round_trip() {
		for op in Operation::ALL {
			assert_eq!(Operation::from_symbol(op.symbol()), Some(op));
		}
		assert_eq!(Operation::from_symbol("proj_trans"), None);
	}

	#[test]
	fn test_optional_operations() {
		let optional: Vec<_> = Operation::ALL.into_iter().filter(|op| !op.is_required()).collect();
		assert_eq!(
			optional,
			vec![Operation::ContextErrnoString, Operation::NormalizeForVisualization, Operation::GetName]
		);
	}
}
