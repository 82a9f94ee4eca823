// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Subscriber setup for reproj
//!
//! Libraries only emit `tracing` events; binaries and test suites install a
//! subscriber through [`TracingBuilder`].

// #![cfg_attr(not(debug_assertions), deny(warnings))]

mod builder;

pub use builder::{Format, TracingBuilder, TracingError};

/// Install a test-friendly subscriber once per process
///
/// Honours `RUST_LOG` and writes through the test harness's capture.
pub fn init_for_tests() {
	let _ = TracingBuilder::new().with_level("warn").with_test_writer(true).try_init();
}
