// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use reproj_abi::{
	constants::{HUGE_VAL, PROJ_ERR_COORD_TRANSFM_INVALID_COORD, PROJ_ERR_COORD_TRANSFM_OUTSIDE_PROJECTION_DOMAIN},
	data::PjCoordFFI,
};
use reproj_type::ObjectType;

/// Sphere radius of the popular visualisation projection
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// The handful of CRSs the in-memory engine knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeCrs {
	/// EPSG:4326, latitude then longitude in degrees
	Wgs84,
	/// EPSG:4979, latitude, longitude, ellipsoidal height
	Wgs84Height,
	/// EPSG:3857, easting then northing in metres
	WebMercator,
}

impl FakeCrs {
	pub const ALL: [FakeCrs; 3] = [FakeCrs::Wgs84, FakeCrs::Wgs84Height, FakeCrs::WebMercator];

	pub const DEPRECATED_WEB_MERCATOR: &'static str = "3785";

	pub fn code(self) -> &'static str {
		match self {
			FakeCrs::Wgs84 => "4326",
			FakeCrs::Wgs84Height => "4979",
			FakeCrs::WebMercator => "3857",
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			FakeCrs::Wgs84 => "WGS 84",
			FakeCrs::Wgs84Height => "WGS 84",
			FakeCrs::WebMercator => "WGS 84 / Pseudo-Mercator",
		}
	}

	pub fn is_geographic(self) -> bool {
		!matches!(self, FakeCrs::WebMercator)
	}

	pub fn matches(self, object_type: ObjectType) -> bool {
		match object_type {
			ObjectType::Crs => true,
			ObjectType::GeodeticCrs | ObjectType::GeographicCrs => self.is_geographic(),
			ObjectType::Geographic2dCrs => self == FakeCrs::Wgs84,
			ObjectType::Geographic3dCrs => self == FakeCrs::Wgs84Height,
			ObjectType::ProjectedCrs => self == FakeCrs::WebMercator,
			_ => false,
		}
	}

	pub fn from_code(code: &str) -> Option<FakeCrs> {
		FakeCrs::ALL.into_iter().find(|crs| crs.code() == code.trim())
	}

	/// Parse `EPSG:<code>` in any letter case
	pub fn parse(definition: &str) -> Option<FakeCrs> {
		let (authority, code) = definition.trim().split_once(':')?;
		if !authority.eq_ignore_ascii_case("EPSG") {
			return None;
		}
		Self::from_code(code)
	}
}

/// Convert one row in place, returning the engine error code on failure
///
/// `lon_first` selects the visualisation axis order for geographic CRSs.
pub fn convert(source: FakeCrs, target: FakeCrs, lon_first: bool, row: &mut PjCoordFFI) -> Option<i32> {
	if !row.x.is_finite() || !row.y.is_finite() {
		*row = PjCoordFFI::new(HUGE_VAL, HUGE_VAL, HUGE_VAL, HUGE_VAL);
		return Some(PROJ_ERR_COORD_TRANSFM_INVALID_COORD);
	}

	match (source.is_geographic(), target.is_geographic()) {
		(true, true) | (false, false) => None,
		(true, false) => {
			let (lat, lon) = if lon_first {
				(row.y, row.x)
			} else {
				(row.x, row.y)
			};
			if lat.abs() >= 90.0 {
				*row = PjCoordFFI::new(HUGE_VAL, HUGE_VAL, HUGE_VAL, HUGE_VAL);
				return Some(PROJ_ERR_COORD_TRANSFM_OUTSIDE_PROJECTION_DOMAIN);
			}
			row.x = EARTH_RADIUS * lon.to_radians();
			row.y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
			None
		}
		(false, true) => {
			let lon = (row.x / EARTH_RADIUS).to_degrees();
			let lat = (2.0 * (row.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
			if lon_first {
				row.x = lon;
				row.y = lat;
			} else {
				row.x = lat;
				row.y = lon;
			}
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse() {
		assert_eq!(FakeCrs::parse("EPSG:4326"), Some(FakeCrs::Wgs84));
		assert_eq!(FakeCrs::parse("epsg:3857"), Some(FakeCrs::WebMercator));
		assert_eq!(FakeCrs::parse("EPSG:2249"), None);
		assert_eq!(FakeCrs::parse("INVALID:999999"), None);
		assert_eq!(FakeCrs::parse("4326"), None);
	}

	#[test]
	fn test_origin_maps_to_origin() {
		let mut row = PjCoordFFI::new(0.0, 0.0, 12.5, 0.0);
		assert_eq!(convert(FakeCrs::Wgs84, FakeCrs::WebMercator, false, &mut row), None);
		assert!(row.x.abs() < 1e-9);
		assert!(row.y.abs() < 1e-9);
		assert_eq!(row.z, 12.5);
	}

	#[test]
	fn test_antimeridian() {
		let mut row = PjCoordFFI::new(0.0, 180.0, 0.0, 0.0);
		convert(FakeCrs::Wgs84, FakeCrs::WebMercator, false, &mut row);
		assert!((row.x - 20_037_508.342_789_244).abs() < 1e-6);
	}

	#[test]
	fn test_pole_is_outside_domain() {
		let mut row = PjCoordFFI::new(90.0, 0.0, 0.0, 0.0);
		let code = convert(FakeCrs::Wgs84, FakeCrs::WebMercator, false, &mut row);
		assert_eq!(code, Some(PROJ_ERR_COORD_TRANSFM_OUTSIDE_PROJECTION_DOMAIN));
		assert_eq!(row.to_array(), [HUGE_VAL; 4]);
	}

	#[test]
	fn test_axis_order() {
		let mut lat_first = PjCoordFFI::new(42.0, -71.0, 0.0, 0.0);
		let mut lon_first = PjCoordFFI::new(-71.0, 42.0, 0.0, 0.0);
		convert(FakeCrs::Wgs84, FakeCrs::WebMercator, false, &mut lat_first);
		convert(FakeCrs::Wgs84, FakeCrs::WebMercator, true, &mut lon_first);
		assert_eq!(lat_first, lon_first);
	}
}
