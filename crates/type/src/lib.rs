// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Value types shared by every reproj crate: backend kinds, transformation
//! directions, database categories, engine error codes and the error taxonomy.

// #![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod backend;
pub mod category;
pub mod direction;
pub mod errno;
pub mod error;

pub use backend::BackendKind;
pub use category::{Category, ObjectType};
pub use direction::Direction;
pub use errno::ErrorCode;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
