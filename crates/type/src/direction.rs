// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use reproj_abi::constants::{PJ_FWD, PJ_IDENT, PJ_INV};

use crate::Error;

/// Direction of a single apply call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
	#[default]
	Forward,
	Identity,
	Inverse,
}

impl Direction {
	pub const fn code(self) -> i32 {
		match self {
			Direction::Forward => PJ_FWD,
			Direction::Identity => PJ_IDENT,
			Direction::Inverse => PJ_INV,
		}
	}

	/// The direction that undoes this one
	pub const fn reverse(self) -> Self {
		match self {
			Direction::Forward => Direction::Inverse,
			Direction::Identity => Direction::Identity,
			Direction::Inverse => Direction::Forward,
		}
	}
}

impl From<Direction> for i32 {
	fn from(direction: Direction) -> Self {
		direction.code()
	}
}

impl TryFrom<i32> for Direction {
	type Error = Error;

	fn try_from(code: i32) -> Result<Self, Self::Error> {
		match code {
			PJ_FWD => Ok(Direction::Forward),
			PJ_IDENT => Ok(Direction::Identity),
			PJ_INV => Ok(Direction::Inverse),
			other => Err(Error::InvalidArgument(format!("unknown direction code {}", other))),
		}
	}
}

impl Display for Direction {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Direction::Forward => f.write_str("forward"),
			Direction::Identity => f.write_str("identity"),
			Direction::Inverse => f.write_str("inverse"),
		}
	}
}
