// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
	EnvFilter,
	filter::{Directive, ParseError},
	fmt,
	prelude::*,
	util::TryInitError,
};

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
	#[error("invalid tracing level `{level}`: {source}")]
	InvalidLevel {
		level: String,
		source: ParseError,
	},

	#[error("invalid tracing directive `{directive}`: {source}")]
	InvalidDirective {
		directive: String,
		source: ParseError,
	},

	#[error(transparent)]
	Init(#[from] TryInitError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
	#[default]
	Pretty,
	Compact,
	Json,
}

/// Builder for the process-wide tracing subscriber
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	level: String,
	directives: Vec<String>,
	format: Format,
	with_target: bool,
	with_ansi: bool,
	test_writer: bool,
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			level: LevelFilter::INFO.to_string(),
			directives: Vec::new(),
			format: Format::default(),
			with_target: true,
			with_ansi: true,
			test_writer: false,
		}
	}

	/// Default level when `RUST_LOG` is not set
	pub fn with_level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	/// Extra filter directive such as `reproj_sandbox=trace`
	pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
		self.directives.push(directive.into());
		self
	}

	pub fn with_format(mut self, format: Format) -> Self {
		self.format = format;
		self
	}

	pub fn with_target(mut self, with_target: bool) -> Self {
		self.with_target = with_target;
		self
	}

	pub fn with_ansi(mut self, with_ansi: bool) -> Self {
		self.with_ansi = with_ansi;
		self
	}

	pub fn with_test_writer(mut self, test_writer: bool) -> Self {
		self.test_writer = test_writer;
		self
	}

	/// `RUST_LOG`, or the configured level, plus every extra directive
	pub fn filter(&self) -> Result<EnvFilter, TracingError> {
		let mut filter = match EnvFilter::try_from_default_env() {
			Ok(filter) => filter,
			Err(_) => EnvFilter::try_new(&self.level).map_err(|source| TracingError::InvalidLevel {
				level: self.level.clone(),
				source,
			})?,
		};
		for directive in &self.directives {
			let parsed = directive.parse::<Directive>().map_err(|source| TracingError::InvalidDirective {
				directive: directive.clone(),
				source,
			})?;
			filter = filter.add_directive(parsed);
		}
		Ok(filter)
	}

	/// Install the subscriber; fails on a malformed filter or when one is
	/// already installed
	pub fn try_init(self) -> Result<(), TracingError> {
		let filter = self.filter()?;
		let installed = match (self.format, self.test_writer) {
			(Format::Json, true) => tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_target(self.with_target).with_test_writer())
				.try_init(),
			(Format::Json, false) => tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_target(self.with_target))
				.try_init(),
			(Format::Compact, true) => tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_target(self.with_target).with_ansi(self.with_ansi).with_test_writer())
				.try_init(),
			(Format::Compact, false) => tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_target(self.with_target).with_ansi(self.with_ansi))
				.try_init(),
			(Format::Pretty, true) => tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_target(self.with_target).with_ansi(self.with_ansi).with_test_writer())
				.try_init(),
			(Format::Pretty, false) => tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_target(self.with_target).with_ansi(self.with_ansi))
				.try_init(),
		};
		Ok(installed?)
	}
}
