// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use reproj_abi::constants::*;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Object category passed to database object creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
	Ellipsoid,
	PrimeMeridian,
	Datum,
	#[default]
	Crs,
	CoordinateOperation,
	DatumEnsemble,
}

impl Category {
	pub const ALL: [Category; 6] = [
		Category::Ellipsoid,
		Category::PrimeMeridian,
		Category::Datum,
		Category::Crs,
		Category::CoordinateOperation,
		Category::DatumEnsemble,
	];

	pub const fn code(self) -> i32 {
		match self {
			Category::Ellipsoid => PJ_CATEGORY_ELLIPSOID,
			Category::PrimeMeridian => PJ_CATEGORY_PRIME_MERIDIAN,
			Category::Datum => PJ_CATEGORY_DATUM,
			Category::Crs => PJ_CATEGORY_CRS,
			Category::CoordinateOperation => PJ_CATEGORY_COORDINATE_OPERATION,
			Category::DatumEnsemble => PJ_CATEGORY_DATUM_ENSEMBLE,
		}
	}
}

impl TryFrom<i32> for Category {
	type Error = Error;

	fn try_from(code: i32) -> Result<Self, Self::Error> {
		Category::ALL
			.into_iter()
			.find(|c| c.code() == code)
			.ok_or_else(|| Error::InvalidArgument(format!("unknown category code {}", code)))
	}
}

impl Display for Category {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Category::Ellipsoid => f.write_str("ellipsoid"),
			Category::PrimeMeridian => f.write_str("prime meridian"),
			Category::Datum => f.write_str("datum"),
			Category::Crs => f.write_str("CRS"),
			Category::CoordinateOperation => f.write_str("coordinate operation"),
			Category::DatumEnsemble => f.write_str("datum ensemble"),
		}
	}
}

/// Object type filter for listing database codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
	Unknown,
	Ellipsoid,
	PrimeMeridian,
	GeodeticReferenceFrame,
	VerticalReferenceFrame,
	DatumEnsemble,
	/// Any kind of CRS
	#[default]
	Crs,
	GeodeticCrs,
	GeocentricCrs,
	GeographicCrs,
	Geographic2dCrs,
	Geographic3dCrs,
	VerticalCrs,
	ProjectedCrs,
	CompoundCrs,
	Conversion,
	Transformation,
}

impl ObjectType {
	pub const fn code(self) -> i32 {
		match self {
			ObjectType::Unknown => PJ_TYPE_UNKNOWN,
			ObjectType::Ellipsoid => PJ_TYPE_ELLIPSOID,
			ObjectType::PrimeMeridian => PJ_TYPE_PRIME_MERIDIAN,
			ObjectType::GeodeticReferenceFrame => PJ_TYPE_GEODETIC_REFERENCE_FRAME,
			ObjectType::VerticalReferenceFrame => PJ_TYPE_VERTICAL_REFERENCE_FRAME,
			ObjectType::DatumEnsemble => PJ_TYPE_DATUM_ENSEMBLE,
			ObjectType::Crs => PJ_TYPE_CRS,
			ObjectType::GeodeticCrs => PJ_TYPE_GEODETIC_CRS,
			ObjectType::GeocentricCrs => PJ_TYPE_GEOCENTRIC_CRS,
			ObjectType::GeographicCrs => PJ_TYPE_GEOGRAPHIC_CRS,
			ObjectType::Geographic2dCrs => PJ_TYPE_GEOGRAPHIC_2D_CRS,
			ObjectType::Geographic3dCrs => PJ_TYPE_GEOGRAPHIC_3D_CRS,
			ObjectType::VerticalCrs => PJ_TYPE_VERTICAL_CRS,
			ObjectType::ProjectedCrs => PJ_TYPE_PROJECTED_CRS,
			ObjectType::CompoundCrs => PJ_TYPE_COMPOUND_CRS,
			ObjectType::Conversion => PJ_TYPE_CONVERSION,
			ObjectType::Transformation => PJ_TYPE_TRANSFORMATION,
		}
	}
}
