// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::{c_char, c_int};

use crate::data::{PjAreaFFI, PjContextFFI, PjCoordFFI, PjFFI};

/// NULL-terminated array of NULL-terminated strings, released with `proj_string_list_destroy`
pub type StringListFFI = *mut *mut c_char;

/// NULL-terminated array of option strings (`KEY=VALUE`)
pub type OptionsFFI = *const *const c_char;

/// `PJ_CONTEXT *proj_context_create(void)`
pub type ContextCreateFnFFI = unsafe extern "C" fn() -> *mut PjContextFFI;

/// `void proj_context_destroy(PJ_CONTEXT *ctx)`
pub type ContextDestroyFnFFI = unsafe extern "C" fn(ctx: *mut PjContextFFI);

/// `int proj_context_set_database_path(PJ_CONTEXT *ctx, const char *dbPath, const char *const *auxDbPaths, const char *const *options)`
///
/// Returns [`crate::constants::PROJ_TRUE`] on success.
pub type ContextSetDatabasePathFnFFI = unsafe extern "C" fn(
	ctx: *mut PjContextFFI,
	db_path: *const c_char,
	aux_db_paths: OptionsFFI,
	options: OptionsFFI,
) -> c_int;

/// `const char *proj_context_get_database_path(PJ_CONTEXT *ctx)`
pub type ContextGetDatabasePathFnFFI = unsafe extern "C" fn(ctx: *mut PjContextFFI) -> *const c_char;

/// `int proj_context_errno(PJ_CONTEXT *ctx)`
pub type ContextErrnoFnFFI = unsafe extern "C" fn(ctx: *mut PjContextFFI) -> c_int;

/// `const char *proj_context_errno_string(PJ_CONTEXT *ctx, int err)`
pub type ContextErrnoStringFnFFI = unsafe extern "C" fn(ctx: *mut PjContextFFI, err: c_int) -> *const c_char;

/// `PJ *proj_create_crs_to_crs(PJ_CONTEXT *ctx, const char *source_crs, const char *target_crs, PJ_AREA *area)`
pub type CreateCrsToCrsFnFFI = unsafe extern "C" fn(
	ctx: *mut PjContextFFI,
	source_crs: *const c_char,
	target_crs: *const c_char,
	area: *mut PjAreaFFI,
) -> *mut PjFFI;

/// `PJ *proj_create_crs_to_crs_from_pj(PJ_CONTEXT *ctx, const PJ *source_crs, const PJ *target_crs, PJ_AREA *area, const char *const *options)`
pub type CreateCrsToCrsFromPjFnFFI = unsafe extern "C" fn(
	ctx: *mut PjContextFFI,
	source_crs: *const PjFFI,
	target_crs: *const PjFFI,
	area: *mut PjAreaFFI,
	options: OptionsFFI,
) -> *mut PjFFI;

/// `PJ *proj_create_from_database(PJ_CONTEXT *ctx, const char *auth_name, const char *code, PJ_CATEGORY category, int usePROJAlternativeGridNames, const char *const *options)`
pub type CreateFromDatabaseFnFFI = unsafe extern "C" fn(
	ctx: *mut PjContextFFI,
	auth_name: *const c_char,
	code: *const c_char,
	category: c_int,
	use_proj_alternative_grid_names: c_int,
	options: OptionsFFI,
) -> *mut PjFFI;

/// `int proj_trans_array(PJ *P, PJ_DIRECTION direction, size_t n, PJ_COORD *coord)`
pub type TransArrayFnFFI =
	unsafe extern "C" fn(p: *mut PjFFI, direction: c_int, n: usize, coord: *mut PjCoordFFI) -> c_int;

/// `PROJ_STRING_LIST proj_get_authorities_from_database(PJ_CONTEXT *ctx)`
pub type GetAuthoritiesFromDatabaseFnFFI = unsafe extern "C" fn(ctx: *mut PjContextFFI) -> StringListFFI;

/// `PROJ_STRING_LIST proj_get_codes_from_database(PJ_CONTEXT *ctx, const char *auth_name, PJ_TYPE type, int allow_deprecated)`
pub type GetCodesFromDatabaseFnFFI = unsafe extern "C" fn(
	ctx: *mut PjContextFFI,
	auth_name: *const c_char,
	object_type: c_int,
	allow_deprecated: c_int,
) -> StringListFFI;

/// `void proj_string_list_destroy(PROJ_STRING_LIST list)`
pub type StringListDestroyFnFFI = unsafe extern "C" fn(list: StringListFFI);

/// `PJ *proj_destroy(PJ *P)`; always returns NULL
pub type DestroyFnFFI = unsafe extern "C" fn(p: *mut PjFFI) -> *mut PjFFI;

/// `PJ *proj_normalize_for_visualization(PJ_CONTEXT *ctx, const PJ *obj)`
pub type NormalizeForVisualizationFnFFI = unsafe extern "C" fn(ctx: *mut PjContextFFI, obj: *const PjFFI) -> *mut PjFFI;

/// `const char *proj_get_name(const PJ *obj)`
pub type GetNameFnFFI = unsafe extern "C" fn(obj: *const PjFFI) -> *const c_char;
