//! Field descriptors and value validation for sieve.
//!
//! This crate provides:
//! - [`Config`] - Schema-wide validation settings
//! - [`Validator`] - Validation steps and their calling conventions
//! - [`FieldDecl`] - Declarations turned into descriptors
//! - [`Descriptor`] - Resolved fields with shapes, sub-fields and pipelines
//! - [`Outcome`] - Coerced values with location-tagged errors
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sieve_fields::{Config, FieldDecl, Values};
//! use sieve_foundation::{Type, Value};
//!
//! let field = FieldDecl::required("scores", Type::list(Type::Int))
//!     .build(Arc::new(Config::default()))
//!     .unwrap();
//!
//! let outcome = field
//!     .validate_field(Value::list(["1", "x"]), &Values::new(), None)
//!     .unwrap();
//! assert_eq!(outcome.errors[0].loc.to_string(), "scores -> 1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtins;
pub mod config;
pub mod decl;
pub mod descriptor;
pub mod pipeline;
pub mod shape;
pub mod signature;
pub mod validate;

pub use builtins::{NOT_NONE, find_validators};
pub use config::{Config, FieldOverride};
pub use decl::{ClassValidator, FieldDecl};
pub use descriptor::{Descriptor, build_descriptor};
pub use pipeline::{Pipeline, Step};
pub use shape::Shape;
pub use signature::{
    Callable, Context, Convention, Invocation, Owner, Param, Validator, Values, classify,
};
pub use validate::{Outcome, validate};
