// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Scenarios against a real engine
//!
//! These run against whichever backend the environment provides and are
//! skipped when neither a native library nor a WebAssembly module is found.

use reproj::{Category, CoordBuffer, Direction, Error, Proj, ProjConfig};

fn engine() -> Option<Proj> {
	reproj_sub_tracing::init_for_tests();
	let proj = Proj::new(ProjConfig::from_env().ok()?);
	match proj.initialize() {
		Ok(kind) => {
			eprintln!("running against the {} backend", kind);
			Some(proj)
		}
		Err(err) => {
			eprintln!("skipping: {}", err);
			None
		}
	}
}

#[test]
fn test_wgs84_to_massachusetts_state_plane() {
	let Some(proj) = engine() else {
		return;
	};
	let ctx = proj.context_create().unwrap();
	let transform = ctx.create_crs_to_crs("EPSG:4326", "EPSG:2249").unwrap();

	let mut coords = CoordBuffer::from_coord(&[42.3603222, -71.0579667]).unwrap();
	let code = transform.apply(&mut coords, 1, Direction::Forward).unwrap();
	assert!(code.is_success());

	let [x, y, z, t] = coords.coord(0).unwrap();
	assert!((770_000.0..780_000.0).contains(&x), "x = {}", x);
	assert!((2_950_000.0..2_965_000.0).contains(&y), "y = {}", y);
	assert_eq!(z, 0.0);
	assert_eq!(t, 0.0);
}

#[test]
fn test_resolved_crs_match_crs_strings() {
	let Some(proj) = engine() else {
		return;
	};
	let ctx = proj.context_create().unwrap();
	let wgs84 = ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
	let state_plane = ctx.create_from_database("EPSG", "2249", Category::Crs).unwrap();
	let resolved = ctx.create_crs_to_crs_from_resolved(&wgs84, &state_plane).unwrap();
	let by_name = ctx.create_crs_to_crs("EPSG:4326", "EPSG:2249").unwrap();

	let input = [[42.3603222, -71.0579667], [42.0, -72.0]];
	let mut a = CoordBuffer::from_coords(&input).unwrap();
	let mut b = CoordBuffer::from_coords(&input).unwrap();
	assert!(resolved.forward(&mut a).unwrap().is_success());
	assert!(by_name.forward(&mut b).unwrap().is_success());
	for row in 0..input.len() {
		let (x, y) = (a.coord(row).unwrap(), b.coord(row).unwrap());
		assert!((x[0] - y[0]).abs() < 1e-6, "row {}: {} vs {}", row, x[0], y[0]);
		assert!((x[1] - y[1]).abs() < 1e-6, "row {}: {} vs {}", row, x[1], y[1]);
	}
	let [x, y, ..] = a.coord(0).unwrap();
	assert!((770_000.0..780_000.0).contains(&x), "x = {}", x);
	assert!((2_950_000.0..2_965_000.0).contains(&y), "y = {}", y);
}

#[test]
fn test_invalid_crs_is_resolution_error() {
	let Some(proj) = engine() else {
		return;
	};
	let ctx = proj.context_create().unwrap();
	match ctx.create_crs_to_crs("INVALID:999999", "EPSG:4326") {
		Err(Error::CrsResolution {
			crs,
			..
		}) => assert!(crs.contains("INVALID:999999")),
		other => panic!("unexpected {:?}", other.map(|_| ())),
	}
}

#[test]
fn test_database_lookups() {
	let Some(proj) = engine() else {
		return;
	};
	let ctx = proj.context_create().unwrap();
	let authorities = ctx.authorities().unwrap();
	assert!(authorities.iter().any(|a| a == "EPSG"));

	let codes = ctx.codes("EPSG").unwrap();
	assert!(codes.iter().any(|c| c == "4326"));
	assert!(matches!(ctx.codes("NOT-AN-AUTHORITY"), Err(Error::UnknownAuthority(_))));

	let crs = ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
	assert_eq!(crs.name().unwrap().as_deref(), Some("WGS 84"));
}

#[test]
fn test_round_trip_and_padding() {
	let Some(proj) = engine() else {
		return;
	};
	let transform = proj.create_crs_to_crs("EPSG:4326", "EPSG:3857").unwrap();
	let mut coords = CoordBuffer::from_coords(&[&[42.0, -71.0][..], &[10.0, 20.0, 5.0][..]]).unwrap();
	transform.forward(&mut coords).unwrap();
	transform.inverse(&mut coords).unwrap();

	let first = coords.coord(0).unwrap();
	assert!((first[0] - 42.0).abs() < 1e-8);
	assert!((first[1] + 71.0).abs() < 1e-8);
	assert_eq!(coords.coord(1).unwrap()[3], 0.0);
	assert_eq!(proj.error_code_to_string(0), "Success");
}
