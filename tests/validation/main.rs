//! Integration tests for value validation
//!
//! Tests coercion, constraint checks, collection walking, alternatives,
//! mappings, JSON payloads, and location-tagged error reporting.

mod alternatives;
mod collections;
mod json;
mod singletons;
