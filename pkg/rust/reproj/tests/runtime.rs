// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use reproj::{
	Backend, BackendKind, BackendPreference, Category, CoordBuffer, Direction, Error, Proj, Selector, is_context,
};
use reproj_core::{
	BackendLoader, Operation,
	testing::{DEFAULT_DATABASE, EARTH_RADIUS, FakeBackend},
};

struct Fixture {
	native: Arc<FakeBackend>,
	sandboxed: Arc<FakeBackend>,
	proj: Proj,
}

fn fixture(preference: BackendPreference) -> Fixture {
	reproj_sub_tracing::init_for_tests();
	let native = Arc::new(FakeBackend::new(BackendKind::Native));
	let sandboxed = Arc::new(FakeBackend::new(BackendKind::Sandboxed));
	let selector = Selector::with_backends(
		preference,
		Some(native.clone() as Arc<dyn Backend>),
		Some(sandboxed.clone() as Arc<dyn Backend>),
	);
	Fixture {
		native,
		sandboxed,
		proj: Proj::from_selector(selector),
	}
}

#[test]
fn test_first_use_initializes() {
	let f = fixture(BackendPreference::Auto);
	assert_eq!(f.proj.mode(), None);
	let ctx = f.proj.context_create().unwrap();
	assert!(f.proj.is_native());
	assert_eq!(ctx.backend_kind(), BackendKind::Native);
	assert_eq!(f.native.live_contexts(), 1);
}

#[test]
fn test_toggle_leaves_existing_objects_on_their_backend() {
	let f = fixture(BackendPreference::Native);
	let ctx = f.proj.context_create().unwrap();
	let transform = ctx.create_crs_to_crs("EPSG:4326", "EPSG:3857").unwrap();

	assert_eq!(f.proj.toggle().unwrap(), BackendKind::Sandboxed);
	assert!(f.proj.is_sandboxed());

	let mut coords = CoordBuffer::from_coord(&[0.0, 0.0]).unwrap();
	assert!(transform.forward(&mut coords).unwrap().is_success());
	assert_eq!(transform.backend_kind(), BackendKind::Native);

	let fresh = f.proj.context_create().unwrap();
	assert_eq!(fresh.backend_kind(), BackendKind::Sandboxed);
	assert_eq!(f.sandboxed.live_contexts(), 1);
}

#[test]
fn test_force_overrides_preference() {
	let f = fixture(BackendPreference::Native);
	f.proj.force_sandboxed();
	assert!(f.proj.is_sandboxed());
	assert_eq!(f.proj.initialize().unwrap(), BackendKind::Sandboxed);
	f.proj.force_native();
	assert!(f.proj.is_native());
}

#[test]
fn test_handles_stay_with_their_backend() {
	let f = fixture(BackendPreference::Native);
	let native_ctx = f.proj.context_create().unwrap();
	let wgs84 = native_ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
	let mercator = native_ctx.create_from_database("EPSG", "3857", Category::Crs).unwrap();

	f.proj.force_sandboxed();
	let sandboxed_ctx = f.proj.context_create().unwrap();

	assert!(matches!(
		sandboxed_ctx.create_crs_to_crs_from_resolved(&wgs84, &mercator),
		Err(Error::BackendMismatch {
			expected: BackendKind::Sandboxed,
			found: BackendKind::Native
		})
	));
	assert!(native_ctx.create_crs_to_crs_from_resolved(&wgs84, &mercator).is_ok());
}

#[test]
fn test_resolved_transform_matches_string_transform() {
	let f = fixture(BackendPreference::Native);
	let ctx = f.proj.context_create().unwrap();
	let wgs84 = ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
	let mercator = ctx.create_from_database("EPSG", "3857", Category::Crs).unwrap();
	let resolved = ctx.create_crs_to_crs_from_resolved(&wgs84, &mercator).unwrap();
	let by_name = ctx.create_crs_to_crs("EPSG:4326", "EPSG:3857").unwrap();

	let input = [[42.3603222, -71.0579667], [-33.8688, 151.2093], [0.0, 0.0]];
	let mut a = CoordBuffer::from_coords(&input).unwrap();
	let mut b = CoordBuffer::from_coords(&input).unwrap();
	assert!(resolved.forward(&mut a).unwrap().is_success());
	assert!(by_name.forward(&mut b).unwrap().is_success());
	assert_eq!(a, b);
	assert!((a.coord(0).unwrap()[0] - EARTH_RADIUS * (-71.0579667f64).to_radians()).abs() < 1e-6);
}

#[test]
fn test_resolved_crs_from_another_runtime_is_rejected() {
	let f = fixture(BackendPreference::Native);
	let other = fixture(BackendPreference::Native);
	let ctx = f.proj.context_create().unwrap();
	let other_ctx = other.proj.context_create().unwrap();
	let foreign = other_ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
	let mercator = ctx.create_from_database("EPSG", "3857", Category::Crs).unwrap();

	assert!(matches!(
		ctx.create_crs_to_crs_from_resolved(&foreign, &mercator),
		Err(Error::InvalidArgument(_))
	));
	assert_eq!(f.native.live_objects(), 1);
}

#[test]
fn test_every_object_is_released_once() {
	let f = fixture(BackendPreference::Native);
	{
		let mut ctx = f.proj.context_create().unwrap();
		{
			let a = ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
			let b = ctx.create_from_database("EPSG", "3857", Category::Crs).unwrap();
			let mut t = ctx.create_crs_to_crs_from_resolved(&a, &b).unwrap();
			let _normalized = t.normalize_for_visualization().unwrap();
			t.destroy().unwrap();
		}
		ctx.destroy().unwrap();
	}
	assert_eq!(f.native.destroyed_objects(), 4);
	assert_eq!(f.native.destroyed_contexts(), 1);
	assert_eq!(f.native.live_objects(), 0);
	assert_eq!(f.native.live_contexts(), 0);
}

#[test]
fn test_database_path_applied_to_new_contexts() {
	let f = fixture(BackendPreference::Native);
	let proj = f.proj.with_database_path("/srv/proj/proj.db");
	let ctx = proj.context_create().unwrap();
	assert_eq!(ctx.database_path().as_deref(), Some("/srv/proj/proj.db"));
	assert_eq!(ctx.resolved_database_path().unwrap().as_deref(), Some("/srv/proj/proj.db"));
}

#[test]
fn test_database_path_applied_to_default_context() {
	let f = fixture(BackendPreference::Native);
	let proj = f.proj.with_database_path("/srv/proj/proj.db");
	let native: Arc<dyn Backend> = f.native.clone();
	let sandboxed: Arc<dyn Backend> = f.sandboxed.clone();

	proj.create_crs_to_crs("EPSG:4326", "EPSG:3857").unwrap();
	assert_eq!(
		unsafe { native.context_get_database_path(None) }.unwrap().as_deref(),
		Some("/srv/proj/proj.db")
	);
	assert_eq!(
		unsafe { sandboxed.context_get_database_path(None) }.unwrap().as_deref(),
		Some(DEFAULT_DATABASE)
	);

	proj.toggle().unwrap();
	assert!(proj.authorities().unwrap().contains(&"EPSG".to_string()));
	assert_eq!(
		unsafe { sandboxed.context_get_database_path(None) }.unwrap().as_deref(),
		Some("/srv/proj/proj.db")
	);
}

#[test]
fn test_rejected_default_database_path_fails_every_call() {
	let f = fixture(BackendPreference::Native);
	let proj = f.proj.with_database_path("/srv/proj/readme.txt");
	for _ in 0..2 {
		match proj.authorities() {
			Err(err) => assert_eq!(err.code(), Some(1029)),
			Ok(authorities) => panic!("unexpected {:?}", authorities),
		}
	}
	assert_eq!(proj.error_code_to_string(1029), "File not found or invalid");
}

#[test]
fn test_null_context_is_backend_error() {
	let backend: Arc<dyn Backend> = Arc::new(FakeBackend::new(BackendKind::Sandboxed).refusing_contexts());
	let proj = Proj::from_selector(Selector::with_backends(BackendPreference::Auto, None, Some(backend)));
	assert!(matches!(
		proj.context_create(),
		Err(Error::Backend {
			backend: BackendKind::Sandboxed,
			..
		})
	));
}

#[test]
fn test_error_code_to_string() {
	let f = fixture(BackendPreference::Auto);
	assert_eq!(f.proj.error_code_to_string(0), "Success");
	assert_eq!(f.proj.error_code_to_string(2050), "Point outside of projection domain");
	assert!(!f.proj.error_code_to_string(123456).is_empty());
}

#[test]
fn test_error_code_to_string_without_backend() {
	let proj = Proj::from_selector(Selector::with_backends(BackendPreference::Auto, None, None));
	assert_eq!(proj.error_code_to_string(1027), "Invalid value for an argument");
}

#[test]
fn test_error_code_to_string_loads_nothing() {
	let loads = Arc::new(AtomicUsize::new(0));
	let loader = |kind: BackendKind| -> BackendLoader {
		let loads = loads.clone();
		Box::new(move || {
			loads.fetch_add(1, Ordering::SeqCst);
			Ok(Arc::new(FakeBackend::new(kind)) as Arc<dyn Backend>)
		})
	};
	let proj = Proj::from_selector(Selector::new(
		BackendPreference::Auto,
		Some(loader(BackendKind::Native)),
		Some(loader(BackendKind::Sandboxed)),
	));

	assert_eq!(proj.error_code_to_string(2050), "Point outside of projection domain");
	assert_eq!(proj.mode(), None);

	proj.force_sandboxed();
	assert_eq!(proj.error_code_to_string(1027), "Invalid value for an argument");
	assert_eq!(loads.load(Ordering::SeqCst), 0);

	proj.context_create().unwrap();
	assert_eq!(loads.load(Ordering::SeqCst), 1);
	assert_eq!(proj.error_code_to_string(1027), "Invalid value for an argument");
	assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_error_strings_without_engine_text() {
	let backend: Arc<dyn Backend> =
		Arc::new(FakeBackend::new(BackendKind::Sandboxed).without(Operation::ContextErrnoString));
	let proj = Proj::from_selector(Selector::with_backends(BackendPreference::Sandboxed, None, Some(backend)));
	assert_eq!(proj.error_code_to_string(1025), "Invalid PROJ string syntax");
}

#[test]
fn test_database_queries() {
	let f = fixture(BackendPreference::Native);
	assert_eq!(f.proj.authorities().unwrap(), vec!["EPSG", "ESRI", "PROJ"]);
	assert!(f.proj.codes("EPSG").unwrap().contains(&"4326".to_string()));
	assert!(f.proj.codes("PROJ").unwrap().is_empty());
	assert!(matches!(f.proj.codes("NOPE"), Err(Error::UnknownAuthority(_))));
}

#[test]
fn test_crs_to_crs_in_default_context() {
	let f = fixture(BackendPreference::Sandboxed);
	let transform = f.proj.create_crs_to_crs("EPSG:4326", "EPSG:3857").unwrap();
	let mut coords = CoordBuffer::from_coords(&[[0.0, 180.0], [0.0, -180.0]]).unwrap();
	transform.apply(&mut coords, 2, Direction::Forward).unwrap();
	assert!((coords.col(0).unwrap()[0] - 20_037_508.342_789_244).abs() < 1e-6);
	assert!((coords.col(0).unwrap()[1] + 20_037_508.342_789_244).abs() < 1e-6);

	let err = f.proj.create_crs_to_crs("EPSG:4326", "EPSG:2249").unwrap_err();
	assert!(matches!(err, Error::CrsResolution { .. }));
}

#[test]
fn test_context_type_discrimination() {
	let f = fixture(BackendPreference::Native);
	let ctx = f.proj.context_create().unwrap();
	let crs = ctx.create_from_database("EPSG", "4326", Category::Crs).unwrap();
	assert!(is_context(&ctx));
	assert!(is_context(&ctx.handle().unwrap()));
	assert!(!is_context(&crs.handle().unwrap()));
	assert!(ctx.handle().unwrap().is_context());
}

#[test]
fn test_context_moves_between_threads() {
	let f = fixture(BackendPreference::Native);
	let ctx = f.proj.context_create().unwrap();
	let errno = std::thread::spawn(move || ctx.errno().unwrap()).join().unwrap();
	assert!(errno.is_success());
}
