//! Core values, type descriptions, and error vocabulary for sieve.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value type that validation consumes and produces
//! - [`Type`] - Explicit type-description trees for declared fields
//! - [`Error`] - Schema-definition errors and validator faults
//! - [`ValidationError`] - Location-tagged, recoverable per-input errors
//! - Persistent collections ([`SvVec`], [`SvSet`], [`SvMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod failure;
pub mod json;
pub mod types;
pub mod value;

pub use collections::{SvMap, SvSet, SvVec};
pub use error::{Error, ErrorContext, ErrorKind};
pub use failure::{
    LocItem, Location, StepError, StepResult, ValidationError, ValueErrorKind,
};
pub use types::{Constraints, CustomFn, CustomType, NumConstraints, StrConstraints, Type};
pub use value::Value;

/// Result type for sieve operations.
pub type Result<T> = std::result::Result<T, Error>;
