// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Lazily resolved entry points of a loaded engine library

use libloading::Library;
use once_cell::sync::OnceCell;
use reproj_abi::function::*;
use reproj_core::Operation;
use reproj_type::{BackendKind, Error, Result};
use tracing::{debug, trace};

macro_rules! symbols {
	($($field:ident: $ty:ty => $op:path),* $(,)?) => {
		/// One cell per entry point, filled on first use
		pub(crate) struct Symbols {
			library: Library,
			$($field: OnceCell<$ty>,)*
		}

		impl Symbols {
			pub(crate) fn new(library: Library) -> Self {
				Self {
					library,
					$($field: OnceCell::new(),)*
				}
			}

			$(
				pub(crate) fn $field(&self) -> Result<$ty> {
					self.$field.get_or_try_init(|| self.bind::<$ty>($op)).copied()
				}
			)*

			/// Resolve `operation` without calling it
			pub(crate) fn resolve(&self, operation: Operation) -> Result<()> {
				match operation {
					$($op => self.$field().map(|_| ()),)*
				}
			}
		}
	};
}

symbols! {
	context_create: ContextCreateFnFFI => Operation::ContextCreate,
	context_destroy: ContextDestroyFnFFI => Operation::ContextDestroy,
	context_set_database_path: ContextSetDatabasePathFnFFI => Operation::ContextSetDatabasePath,
	context_get_database_path: ContextGetDatabasePathFnFFI => Operation::ContextGetDatabasePath,
	context_errno: ContextErrnoFnFFI => Operation::ContextErrno,
	context_errno_string: ContextErrnoStringFnFFI => Operation::ContextErrnoString,
	create_crs_to_crs: CreateCrsToCrsFnFFI => Operation::CreateCrsToCrs,
	create_crs_to_crs_from_pj: CreateCrsToCrsFromPjFnFFI => Operation::CreateCrsToCrsFromPj,
	create_from_database: CreateFromDatabaseFnFFI => Operation::CreateFromDatabase,
	trans_array: TransArrayFnFFI => Operation::TransArray,
	get_authorities_from_database: GetAuthoritiesFromDatabaseFnFFI => Operation::GetAuthoritiesFromDatabase,
	get_codes_from_database: GetCodesFromDatabaseFnFFI => Operation::GetCodesFromDatabase,
	string_list_destroy: StringListDestroyFnFFI => Operation::StringListDestroy,
	destroy: DestroyFnFFI => Operation::Destroy,
	normalize_for_visualization: NormalizeForVisualizationFnFFI => Operation::NormalizeForVisualization,
	get_name: GetNameFnFFI => Operation::GetName,
}

impl Symbols {
	fn bind<T: Copy>(&self, operation: Operation) -> Result<T> {
		// The function pointer types mirror the engine's published prototypes.
		let symbol = unsafe { self.library.get::<T>(operation.symbol().as_bytes()) }.map_err(|e| {
			debug!(symbol = operation.symbol(), error = %e, "symbol not exported");
			Error::Resolution {
				operation: operation.symbol(),
				backend: BackendKind::Native,
			}
		})?;
		trace!(symbol = operation.symbol(), "symbol resolved");
		Ok(*symbol)
	}

	pub(crate) fn verify(&self) -> Result<()> {
		Operation::REQUIRED.iter().try_for_each(|op| self.resolve(*op))
	}
}
