//! Integration tests for configuration-driven behavior
//!
//! Tests arbitrary types, string normalization, aliases, and depth limits.

use std::sync::Arc;

use sieve_fields::{Config, FieldDecl, FieldOverride, Values};
use sieve_foundation::{CustomType, ErrorKind, Type, Value};

#[test]
fn named_type_rejected_by_default() {
    let err = FieldDecl::required("conn", Type::named("Socket"))
        .build(Arc::new(Config::default()))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedType(ref t) if t == "Socket"));
}

#[test]
fn named_type_passes_through_when_allowed() {
    let d = FieldDecl::required("conn", Type::named("Socket"))
        .build(Arc::new(Config::permissive()))
        .unwrap();
    let raw = Value::map([("fd", 3)]);
    let outcome = d.validate_field(raw.clone(), &Values::new(), None).unwrap();
    assert_eq!(outcome.into_result(), Ok(raw));
}

#[test]
fn custom_type_without_validators_is_arbitrary() {
    let ty = Type::custom(CustomType::new("Opaque"));
    assert!(
        FieldDecl::required("o", ty.clone())
            .build(Arc::new(Config::default()))
            .is_err()
    );
    assert!(
        FieldDecl::required("o", ty)
            .build(Arc::new(Config::permissive()))
            .is_ok()
    );
}

#[test]
fn strip_whitespace_from_config() {
    let d = FieldDecl::required("name", Type::Str)
        .build(Arc::new(Config::strict()))
        .unwrap();
    let outcome = d
        .validate_field(Value::from("  ada  "), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.value, Value::from("ada"));
}

#[test]
fn string_length_limits_from_config() {
    let config = Arc::new(Config::default().with_anystr_length(Some(2), Some(4)));
    let d = FieldDecl::required("code", Type::Str).build(config).unwrap();

    let values = Values::new();
    let short = d.validate_field(Value::from("a"), &values, None).unwrap();
    assert_eq!(short.errors[0].code(), "value_error.any_str.min_length");
    let long = d.validate_field(Value::from("abcde"), &values, None).unwrap();
    assert_eq!(long.errors[0].code(), "value_error.any_str.max_length");
    assert!(d.validate_field(Value::from("abc"), &values, None).unwrap().is_valid());
}

#[test]
fn length_counts_characters() {
    let config = Arc::new(Config::default().with_anystr_length(None, Some(3)));
    let d = FieldDecl::required("code", Type::Str).build(config).unwrap();
    assert!(
        d.validate_field(Value::from("äöü"), &Values::new(), None)
            .unwrap()
            .is_valid()
    );
}

#[test]
fn alias_and_description_overrides() {
    let config = Arc::new(Config::default().with_field(
        "created_at",
        FieldOverride::alias("createdAt").with_description("creation time"),
    ));
    let d = FieldDecl::required("created_at", Type::Int)
        .build(config)
        .unwrap();
    assert_eq!(d.alias(), "createdAt");
    assert!(d.alt_alias());
    assert_eq!(d.description(), Some("creation time"));

    let outcome = d.validate_field(Value::from("x"), &Values::new(), None).unwrap();
    assert_eq!(outcome.errors[0].loc.to_string(), "createdAt");
}

#[test]
fn explicit_alias_wins_over_config() {
    let config = Arc::new(Config::default().with_field("id", FieldOverride::alias("ID")));
    let d = FieldDecl::required("id", Type::Int)
        .with_alias("identifier")
        .build(config)
        .unwrap();
    assert_eq!(d.alias(), "identifier");
}

#[test]
fn max_depth_bounds_nesting() {
    let ty = Type::list(Type::list(Type::list(Type::Int)));
    let shallow = Arc::new(Config::default().with_max_depth(1));
    let err = FieldDecl::required("cube", ty.clone()).build(shallow).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DepthExceeded { limit: 1 }));

    let enough = Arc::new(Config::default().with_max_depth(2));
    assert!(FieldDecl::required("cube", ty).build(enough).is_ok());
}
