//! Integration tests for union (alternatives) validation

use std::sync::Arc;

use sieve_fields::{Config, Descriptor, FieldDecl, Values};
use sieve_foundation::{Type, Value, ValueErrorKind};

fn field(ty: Type) -> Descriptor {
    FieldDecl::required("u", ty)
        .build(Arc::new(Config::default()))
        .unwrap()
}

#[test]
fn first_matching_alternative_wins() {
    let d = field(Type::union([Type::Int, Type::Str]));
    let values = Values::new();
    assert_eq!(
        d.validate_field(Value::from("42"), &values, None).unwrap().value,
        Value::Int(42)
    );

    let reversed = field(Type::union([Type::Str, Type::Int]));
    assert_eq!(
        reversed.validate_field(Value::from("42"), &values, None).unwrap().value,
        Value::from("42")
    );
}

#[test]
fn all_alternatives_failing_reports_each() {
    let d = field(Type::union([Type::Int, Type::Float]));
    let outcome = d
        .validate_field(Value::from("nope"), &Values::new(), None)
        .unwrap();
    let kinds: Vec<_> = outcome.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(kinds, vec![ValueErrorKind::Integer, ValueErrorKind::Float]);
    assert!(outcome.errors.iter().all(|e| e.loc.to_string() == "u"));
    assert_eq!(outcome.value, Value::from("nope"));
}

#[test]
fn optional_union_accepts_nil() {
    let d = field(Type::optional(Type::union([Type::Int, Type::list(Type::Int)])));
    let values = Values::new();
    assert!(d.validate_field(Value::Nil, &values, None).unwrap().is_valid());
    assert_eq!(
        d.validate_field(Value::list(["1"]), &values, None).unwrap().value,
        Value::list([1])
    );
}

#[test]
fn single_alternative_after_none_is_plain_field() {
    let d = field(Type::union([Type::None, Type::Float]));
    assert!(d.sub_fields().is_empty());
    assert_eq!(
        d.validate_field(Value::Int(1), &Values::new(), None).unwrap().value,
        Value::Float(1.0)
    );
}

#[test]
fn collection_alternative_reports_element_locations() {
    let d = field(Type::union([Type::list(Type::Int), Type::Int]));
    let outcome = d
        .validate_field(Value::list(["x"]), &Values::new(), None)
        .unwrap();
    let locs: Vec<_> = outcome.errors.iter().map(|e| e.loc.to_string()).collect();
    assert_eq!(locs, vec!["u -> 0", "u"]);
}
