//! Integration tests for JSON-encoded fields

use std::sync::Arc;

use sieve_fields::{Config, Descriptor, FieldDecl, Values};
use sieve_foundation::{Type, Value, ValueErrorKind};

fn field(ty: Type) -> Descriptor {
    FieldDecl::required("payload", Type::json(ty))
        .build(Arc::new(Config::default()))
        .unwrap()
}

#[test]
fn decodes_then_validates() {
    let d = field(Type::list(Type::Int));
    let outcome = d
        .validate_field(Value::from("[1, \"2\", 3]"), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.into_result(), Ok(Value::list([1, 2, 3])));
}

#[test]
fn decoded_elements_are_checked() {
    let d = field(Type::list(Type::Int));
    let outcome = d
        .validate_field(Value::from("[1, \"x\"]"), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].loc.to_string(), "payload -> 1");
}

#[test]
fn malformed_payload_is_single_error() {
    let d = field(Type::map(Type::Str, Type::Int));
    let raw = Value::from("{\"a\": ");
    let outcome = d.validate_field(raw.clone(), &Values::new(), None).unwrap();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code(), "value_error.json");
    assert_eq!(outcome.value, raw);
}

#[test]
fn non_string_payload_is_type_error() {
    let d = field(Type::Int);
    let outcome = d.validate_field(Value::Int(1), &Values::new(), None).unwrap();
    assert_eq!(outcome.errors[0].kind, ValueErrorKind::JsonType);
}

#[test]
fn optional_json_accepts_nil_without_decoding() {
    let d = FieldDecl::optional_nil("payload", Type::json(Type::Any))
        .build(Arc::new(Config::default()))
        .unwrap();
    assert!(d.validate_field(Value::Nil, &Values::new(), None).unwrap().is_valid());
}
