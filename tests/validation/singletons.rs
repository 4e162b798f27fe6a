//! Integration tests for singleton validation

use std::sync::Arc;

use sieve_fields::{Config, Descriptor, FieldDecl, Values};
use sieve_foundation::{Constraints, CustomType, StepError, Type, Value, ValueErrorKind};

fn field(ty: Type) -> Descriptor {
    FieldDecl::required("v", ty)
        .build(Arc::new(Config::default()))
        .unwrap()
}

fn check(d: &Descriptor, raw: Value) -> Result<Value, Vec<ValueErrorKind>> {
    d.validate_field(raw, &Values::new(), None)
        .unwrap()
        .into_result()
        .map_err(|errors| errors.into_iter().map(|e| e.kind).collect())
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn int_coercion() {
    let d = field(Type::Int);
    assert_eq!(check(&d, Value::from("12")), Ok(Value::Int(12)));
    assert_eq!(check(&d, Value::Float(7.8)), Ok(Value::Int(7)));
    assert_eq!(check(&d, Value::Bool(false)), Ok(Value::Int(0)));
    assert_eq!(check(&d, Value::from("1.5")), Err(vec![ValueErrorKind::Integer]));
    assert_eq!(check(&d, Value::list([1])), Err(vec![ValueErrorKind::Integer]));
}

#[test]
fn float_coercion() {
    let d = field(Type::Float);
    assert_eq!(check(&d, Value::Int(2)), Ok(Value::Float(2.0)));
    assert_eq!(check(&d, Value::from(" 2.5 ")), Ok(Value::Float(2.5)));
    assert_eq!(check(&d, Value::from("two")), Err(vec![ValueErrorKind::Float]));
}

#[test]
fn bool_coercion() {
    let d = field(Type::Bool);
    for truthy in ["yes", "On", "TRUE", "1", "t", "y"] {
        assert_eq!(check(&d, Value::from(truthy)), Ok(Value::Bool(true)), "{truthy}");
    }
    for falsy in ["no", "off", "False", "0", "f", "n"] {
        assert_eq!(check(&d, Value::from(falsy)), Ok(Value::Bool(false)), "{falsy}");
    }
    assert_eq!(check(&d, Value::Int(1)), Ok(Value::Bool(true)));
    assert_eq!(check(&d, Value::Int(2)), Err(vec![ValueErrorKind::Bool]));
    assert_eq!(check(&d, Value::from("maybe")), Err(vec![ValueErrorKind::Bool]));
}

#[test]
fn str_coercion() {
    let d = field(Type::Str);
    assert_eq!(check(&d, Value::Int(5)), Ok(Value::from("5")));
    assert_eq!(check(&d, Value::Float(1.0)), Ok(Value::from("1.0")));
    assert_eq!(check(&d, Value::from(" padded ")), Ok(Value::from(" padded ")));
    assert_eq!(check(&d, Value::Bool(true)), Err(vec![ValueErrorKind::Str]));
}

#[test]
fn any_accepts_everything() {
    let d = field(Type::Any);
    let raw = Value::map([("nested", Value::list([1, 2]))]);
    assert_eq!(check(&d, raw.clone()), Ok(raw));
    assert_eq!(check(&d, Value::Nil), Ok(Value::Nil));
}

#[test]
fn required_field_rejects_nil() {
    let d = field(Type::Int);
    assert_eq!(check(&d, Value::Nil), Err(vec![ValueErrorKind::NoneNotAllowed]));
}

#[test]
fn optional_field_accepts_nil() {
    let d = FieldDecl::optional_nil("v", Type::Int)
        .build(Arc::new(Config::default()))
        .unwrap();
    assert_eq!(check(&d, Value::Nil), Ok(Value::Nil));
    assert_eq!(check(&d, Value::from("3")), Ok(Value::Int(3)));
}

#[test]
fn none_type_only_accepts_nil() {
    let d = field(Type::None);
    assert_eq!(check(&d, Value::Nil), Ok(Value::Nil));
    assert!(check(&d, Value::Int(0)).is_err());
}

// =============================================================================
// Constraints
// =============================================================================

#[test]
fn number_bounds() {
    let d = FieldDecl::required("pct", Type::Float)
        .with_constraints(Constraints::new().ge(0.0).lt(100.0))
        .build(Arc::new(Config::default()))
        .unwrap();
    assert_eq!(check(&d, Value::Int(0)), Ok(Value::Float(0.0)));
    assert_eq!(
        check(&d, Value::Float(-0.5)),
        Err(vec![ValueErrorKind::NotGe { limit_value: 0.0 }])
    );
    assert_eq!(
        check(&d, Value::Int(100)),
        Err(vec![ValueErrorKind::NotLt { limit_value: 100.0 }])
    );
}

#[test]
fn exclusive_lower_and_inclusive_upper() {
    let d = FieldDecl::required("n", Type::Int)
        .with_constraints(Constraints::new().gt(0.0).le(10.0))
        .build(Arc::new(Config::default()))
        .unwrap();
    assert_eq!(
        check(&d, Value::Int(0)),
        Err(vec![ValueErrorKind::NotGt { limit_value: 0.0 }])
    );
    assert_eq!(check(&d, Value::Int(10)), Ok(Value::Int(10)));
    assert_eq!(
        check(&d, Value::Int(11)),
        Err(vec![ValueErrorKind::NotLe { limit_value: 10.0 }])
    );
}

#[test]
fn regex_matches_from_start() {
    let d = FieldDecl::required("sku", Type::Str)
        .with_constraints(Constraints::new().regex("[A-Z]{3}-[0-9]+"))
        .build(Arc::new(Config::default()))
        .unwrap();
    assert!(check(&d, Value::from("ABC-123")).is_ok());
    assert!(check(&d, Value::from("ABC-123 trailing")).is_ok());
    assert_eq!(
        check(&d, Value::from("x ABC-123")),
        Err(vec![ValueErrorKind::Regex {
            pattern: "[A-Z]{3}-[0-9]+".to_string()
        }])
    );
}

#[test]
fn length_constraints_override_config() {
    let config = Arc::new(Config::default().with_anystr_length(Some(10), None));
    let d = FieldDecl::required("code", Type::Str)
        .with_constraints(Constraints::new().min_length(2).max_length(3))
        .build(config)
        .unwrap();
    assert!(check(&d, Value::from("ab")).is_ok());
    assert_eq!(
        check(&d, Value::from("abcd")),
        Err(vec![ValueErrorKind::MaxLength { limit_value: 3 }])
    );
}

// =============================================================================
// Custom types
// =============================================================================

#[test]
fn custom_constructors_dispatch_on_input() {
    let money = CustomType::new("Money")
        .from_string(|v: Value| match v.as_str().and_then(|s| s.strip_prefix('$')) {
            Some(amount) => amount
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| StepError::value("bad amount")),
            None => Err(StepError::value("missing currency symbol")),
        })
        .from_number(|v: Value| Ok(Value::Float(v.as_number().unwrap_or_default())));
    let d = field(Type::custom(money));

    assert_eq!(check(&d, Value::from("$4.50")), Ok(Value::Float(4.5)));
    assert_eq!(check(&d, Value::Int(3)), Ok(Value::Float(3.0)));
    assert_eq!(
        check(&d, Value::list([1])),
        Err(vec![ValueErrorKind::Arbitrary {
            expected: "Money".to_string()
        }])
    );
}

#[test]
fn custom_fault_aborts_validation() {
    let flaky = CustomType::new("Flaky").with_validator("explode", |_| {
        Err(StepError::fault("backend unavailable"))
    });
    let d = field(Type::custom(flaky));
    let err = d
        .validate_field(Value::Int(1), &Values::new(), None)
        .unwrap_err();
    assert!(!err.is_configuration());
    assert!(err.to_string().contains("explode"));
}
