// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Integer constants shared with the PROJ C API

/// C boolean `TRUE` as returned by `proj_context_set_database_path`
pub const PROJ_TRUE: i32 = 1;
/// C boolean `FALSE`
pub const PROJ_FALSE: i32 = 0;

/// `PJ_DIRECTION` values
pub const PJ_FWD: i32 = 1;
pub const PJ_IDENT: i32 = 0;
pub const PJ_INV: i32 = -1;

/// `PJ_CATEGORY` values accepted by `proj_create_from_database`
pub const PJ_CATEGORY_ELLIPSOID: i32 = 0;
pub const PJ_CATEGORY_PRIME_MERIDIAN: i32 = 1;
pub const PJ_CATEGORY_DATUM: i32 = 2;
pub const PJ_CATEGORY_CRS: i32 = 3;
pub const PJ_CATEGORY_COORDINATE_OPERATION: i32 = 4;
pub const PJ_CATEGORY_DATUM_ENSEMBLE: i32 = 5;

/// `PJ_TYPE` values accepted by `proj_get_codes_from_database`
pub const PJ_TYPE_UNKNOWN: i32 = 0;
pub const PJ_TYPE_ELLIPSOID: i32 = 1;
pub const PJ_TYPE_PRIME_MERIDIAN: i32 = 2;
pub const PJ_TYPE_GEODETIC_REFERENCE_FRAME: i32 = 3;
pub const PJ_TYPE_VERTICAL_REFERENCE_FRAME: i32 = 5;
pub const PJ_TYPE_DATUM_ENSEMBLE: i32 = 7;
pub const PJ_TYPE_CRS: i32 = 8;
pub const PJ_TYPE_GEODETIC_CRS: i32 = 9;
pub const PJ_TYPE_GEOCENTRIC_CRS: i32 = 10;
pub const PJ_TYPE_GEOGRAPHIC_CRS: i32 = 11;
pub const PJ_TYPE_GEOGRAPHIC_2D_CRS: i32 = 12;
pub const PJ_TYPE_GEOGRAPHIC_3D_CRS: i32 = 13;
pub const PJ_TYPE_VERTICAL_CRS: i32 = 14;
pub const PJ_TYPE_PROJECTED_CRS: i32 = 15;
pub const PJ_TYPE_COMPOUND_CRS: i32 = 16;
pub const PJ_TYPE_CONVERSION: i32 = 21;
pub const PJ_TYPE_TRANSFORMATION: i32 = 22;

/// Error codes reported through `proj_context_errno` and `proj_trans_array`
pub const PROJ_ERR_INVALID_OP: i32 = 1024;
pub const PROJ_ERR_INVALID_OP_WRONG_SYNTAX: i32 = PROJ_ERR_INVALID_OP + 1;
pub const PROJ_ERR_INVALID_OP_MISSING_ARG: i32 = PROJ_ERR_INVALID_OP + 2;
pub const PROJ_ERR_INVALID_OP_ILLEGAL_ARG_VALUE: i32 = PROJ_ERR_INVALID_OP + 3;
pub const PROJ_ERR_INVALID_OP_MUTUALLY_EXCLUSIVE_ARGS: i32 = PROJ_ERR_INVALID_OP + 4;
pub const PROJ_ERR_INVALID_OP_FILE_NOT_FOUND_OR_INVALID: i32 = PROJ_ERR_INVALID_OP + 5;

pub const PROJ_ERR_COORD_TRANSFM: i32 = 2048;
pub const PROJ_ERR_COORD_TRANSFM_INVALID_COORD: i32 = PROJ_ERR_COORD_TRANSFM + 1;
pub const PROJ_ERR_COORD_TRANSFM_OUTSIDE_PROJECTION_DOMAIN: i32 = PROJ_ERR_COORD_TRANSFM + 2;
pub const PROJ_ERR_COORD_TRANSFM_NO_OPERATION: i32 = PROJ_ERR_COORD_TRANSFM + 3;
pub const PROJ_ERR_COORD_TRANSFM_OUTSIDE_GRID: i32 = PROJ_ERR_COORD_TRANSFM + 4;
pub const PROJ_ERR_COORD_TRANSFM_GRID_AT_NODATA: i32 = PROJ_ERR_COORD_TRANSFM + 5;
pub const PROJ_ERR_COORD_TRANSFM_NO_CONVERGENCE: i32 = PROJ_ERR_COORD_TRANSFM + 6;
pub const PROJ_ERR_COORD_TRANSFM_MISSING_TIME: i32 = PROJ_ERR_COORD_TRANSFM + 7;

pub const PROJ_ERR_OTHER: i32 = 4096;
pub const PROJ_ERR_OTHER_API_MISUSE: i32 = PROJ_ERR_OTHER + 1;
pub const PROJ_ERR_OTHER_NO_INVERSE_OP: i32 = PROJ_ERR_OTHER + 2;
pub const PROJ_ERR_OTHER_NETWORK_ERROR: i32 = PROJ_ERR_OTHER + 3;

/// Value PROJ writes into every component of a coordinate it failed to transform
pub const HUGE_VAL: f64 = f64::INFINITY;
