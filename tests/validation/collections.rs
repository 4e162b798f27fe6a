//! Integration tests for list, set and tuple validation

use std::sync::Arc;

use sieve_fields::{Config, Descriptor, FieldDecl, Values};
use sieve_foundation::{Location, Type, Value, ValueErrorKind};

fn field(name: &str, ty: Type) -> Descriptor {
    FieldDecl::required(name, ty)
        .build(Arc::new(Config::default()))
        .unwrap()
}

fn locs(d: &Descriptor, raw: Value) -> Vec<String> {
    d.validate_field(raw, &Values::new(), None)
        .unwrap()
        .errors
        .iter()
        .map(|e| e.loc.to_string())
        .collect()
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn list_coerces_each_element() {
    let d = field("xs", Type::list(Type::Int));
    let outcome = d
        .validate_field(Value::list(["1", "2", "3"]), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.into_result(), Ok(Value::list([1, 2, 3])));
}

#[test]
fn list_accepts_tuple_and_set_input() {
    let d = field("xs", Type::list(Type::Int));
    let values = Values::new();
    let from_tuple = d.validate_field(Value::tuple([1, 2]), &values, None).unwrap();
    assert_eq!(from_tuple.value, Value::list([1, 2]));
    let from_set = d.validate_field(Value::set([2, 1]), &values, None).unwrap();
    assert_eq!(from_set.value, Value::list([1, 2]));
}

#[test]
fn list_reports_every_bad_index() {
    let d = field("xs", Type::list(Type::Int));
    let raw = Value::list([Value::from("a"), Value::Int(1), Value::from("b")]);
    assert_eq!(locs(&d, raw.clone()), vec!["xs -> 0", "xs -> 2"]);

    let outcome = d.validate_field(raw.clone(), &Values::new(), None).unwrap();
    assert_eq!(outcome.value, raw);
}

#[test]
fn non_sequence_is_list_error() {
    let d = field("xs", Type::list(Type::Int));
    let outcome = d.validate_field(Value::from("1,2"), &Values::new(), None).unwrap();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].kind, ValueErrorKind::List);
    assert_eq!(outcome.errors[0].loc, Location::from("xs"));
}

#[test]
fn nested_list_locations() {
    let d = field("grid", Type::list(Type::list(Type::Int)));
    let raw = Value::list([Value::list([1, 2]), Value::list([Value::Int(3), Value::from("x")])]);
    assert_eq!(locs(&d, raw), vec!["grid -> 1 -> 1"]);
}

#[test]
fn list_of_optional_allows_nil_elements() {
    let d = field("xs", Type::list(Type::optional(Type::Int)));
    let outcome = d
        .validate_field(Value::list([Value::Int(1), Value::Nil]), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.into_result(), Ok(Value::list([Value::Int(1), Value::Nil])));
}

#[test]
fn list_of_int_rejects_nil_elements() {
    let d = field("xs", Type::list(Type::Int));
    let outcome = d
        .validate_field(Value::list([Value::Nil]), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.errors[0].kind, ValueErrorKind::NoneNotAllowed);
    assert_eq!(outcome.errors[0].loc.to_string(), "xs -> 0");
}

// =============================================================================
// Sets
// =============================================================================

#[test]
fn set_deduplicates_after_coercion() {
    let d = field("ids", Type::set(Type::Int));
    let outcome = d
        .validate_field(Value::list([Value::from("1"), Value::Int(1), Value::Int(2)]), &Values::new(), None)
        .unwrap();
    assert_eq!(outcome.into_result(), Ok(Value::set([1, 2])));
}

#[test]
fn set_rejects_scalar() {
    let d = field("ids", Type::set(Type::Int));
    let outcome = d.validate_field(Value::Int(1), &Values::new(), None).unwrap();
    assert_eq!(outcome.errors[0].kind, ValueErrorKind::Set);
}

// =============================================================================
// Tuples
// =============================================================================

#[test]
fn tuple_validates_positions() {
    let d = field("point", Type::tuple([Type::Int, Type::Float]));
    let outcome = d
        .validate_field(Value::list(["1", "2.5"]), &Values::new(), None)
        .unwrap();
    assert_eq!(
        outcome.into_result(),
        Ok(Value::tuple([Value::Int(1), Value::Float(2.5)]))
    );
}

#[test]
fn tuple_position_errors() {
    let d = field("point", Type::tuple([Type::Int, Type::Int]));
    assert_eq!(locs(&d, Value::list(["a", "b"])), vec!["point -> 0", "point -> 1"]);
}

#[test]
fn tuple_length_mismatch_short() {
    let d = field("point", Type::tuple([Type::Int, Type::Int]));
    let outcome = d.validate_field(Value::list([1]), &Values::new(), None).unwrap();
    assert_eq!(
        outcome.errors,
        vec![sieve_foundation::ValidationError::new(
            ValueErrorKind::TupleLength {
                expected_length: 2,
                actual_length: 1,
            },
            Location::from("point"),
        )]
    );
}

#[test]
fn tuple_rejects_non_sequence() {
    let d = field("point", Type::tuple([Type::Int]));
    let outcome = d.validate_field(Value::Int(1), &Values::new(), None).unwrap();
    assert_eq!(outcome.errors[0].kind, ValueErrorKind::Tuple);
}
