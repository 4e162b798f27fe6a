//! Integration tests for Layer 1: Fields
//!
//! Tests for descriptor construction: signatures, shapes, pipelines, and config.

mod config;
