//! Sieve - Field descriptor and validation engine
//!
//! This crate re-exports all layers of the sieve system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: sieve_fields     — Config, validators, shape resolution, pipelines, validation
//! Layer 0: sieve_foundation — Core types (Value, Type, Error, ValidationError)
//! ```

pub use sieve_fields as fields;
pub use sieve_foundation as foundation;
