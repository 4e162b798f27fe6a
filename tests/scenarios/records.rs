//! Validating a multi-field record
//!
//! Fields are validated in declaration order; each validated value is made
//! available to later fields' context validators.

use std::sync::Arc;

use sieve_fields::{
    ClassValidator, Config, Descriptor, FieldDecl, FieldOverride, Owner, Param, Validator, Values,
};
use sieve_foundation::{Constraints, StepError, Type, ValidationError, Value};

struct Record {
    owner: Owner,
    fields: Vec<Descriptor>,
}

impl Record {
    fn validate(&self, input: &[(&str, Value)]) -> (Values, Vec<ValidationError>) {
        let mut values = Values::new();
        let mut errors = Vec::new();
        for field in &self.fields {
            let raw = input
                .iter()
                .find(|(k, _)| *k == field.alias())
                .map(|(_, v)| v.clone());
            let raw = match raw {
                Some(raw) => raw,
                None if field.required() => {
                    errors.push(ValidationError::new(
                        sieve_foundation::ValueErrorKind::Value {
                            message: "field required".to_string(),
                        },
                        field.location(),
                    ));
                    continue;
                }
                None if !field.validate_always() => {
                    let default = field.default().cloned().unwrap_or(Value::Nil);
                    values = values.insert(Arc::from(field.name()), default);
                    continue;
                }
                None => field.default().cloned().unwrap_or(Value::Nil),
            };
            let outcome = field
                .validate_field(raw, &values, Some(&self.owner))
                .unwrap();
            if outcome.is_valid() {
                values = values.insert(Arc::from(field.name()), outcome.value);
            } else {
                errors.extend(outcome.errors);
            }
        }
        (values, errors)
    }
}

fn signup() -> Record {
    let config = Arc::new(
        Config::strict().with_field("email", FieldOverride::alias("emailAddress")),
    );

    let passwords_match = Validator::declared(
        "passwords_match",
        [Param::named("v"), Param::named("values"), Param::Rest],
        |inv| {
            let ctx = inv.context.ok_or_else(|| StepError::fault("no context"))?;
            match ctx.values.get(&Arc::from("password")) {
                Some(password) if *password == inv.value => Ok(inv.value),
                _ => Err(StepError::value("passwords do not match")),
            }
        },
    );
    let lowercase = Validator::owner("lowercase", |owner, v: Value| {
        assert_eq!(owner.map(Owner::name), Some("Signup"));
        Ok(v.as_str().map_or(v.clone(), |s| Value::from(s.to_lowercase())))
    });

    let fields = vec![
        FieldDecl::required("username", Type::Str)
            .with_constraints(Constraints::new().min_length(3).regex("[a-z0-9_]+"))
            .with_validator(ClassValidator::new(lowercase).pre()),
        FieldDecl::required("email", Type::Str),
        FieldDecl::required("password", Type::Str)
            .with_constraints(Constraints::new().min_length(8)),
        FieldDecl::required("password2", Type::Str)
            .with_validator(ClassValidator::new(passwords_match)),
        FieldDecl::inferred("retries", Value::Int(3)),
        FieldDecl::optional_nil("referrer", Type::optional(Type::Str)),
    ]
    .into_iter()
    .map(|decl| decl.build(Arc::clone(&config)).unwrap())
    .collect();

    Record {
        owner: Owner::new("Signup"),
        fields,
    }
}

#[test]
fn valid_signup() {
    let record = signup();
    let (values, errors) = record.validate(&[
        ("username", Value::from("  Ada_L ")),
        ("emailAddress", Value::from("ada@example.com")),
        ("password", Value::from("correct horse")),
        ("password2", Value::from("correct horse")),
        ("retries", Value::from("5")),
    ]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(values.get(&Arc::from("username")), Some(&Value::from("ada_l")));
    assert_eq!(values.get(&Arc::from("retries")), Some(&Value::Int(5)));
    assert_eq!(values.get(&Arc::from("referrer")), Some(&Value::Nil));
}

#[test]
fn invalid_signup_collects_every_field() {
    let record = signup();
    let (_, errors) = record.validate(&[
        ("username", Value::from("a!")),
        ("password", Value::from("short")),
        ("password2", Value::from("different")),
        ("retries", Value::from("many")),
    ]);
    let locs: Vec<_> = errors.iter().map(|e| e.loc.to_string()).collect();
    assert_eq!(
        locs,
        vec!["username", "emailAddress", "password", "password2", "retries"]
    );
    assert_eq!(errors[0].code(), "value_error.any_str.min_length");
    assert_eq!(errors[3].kind.to_string(), "passwords do not match");
}

#[test]
fn default_applies_when_absent() {
    let record = signup();
    let (values, _) = record.validate(&[]);
    assert_eq!(values.get(&Arc::from("retries")), Some(&Value::Int(3)));
}

#[test]
fn finalize_config_applies_late_aliases() {
    let mut field = FieldDecl::required("created_at", Type::Int)
        .build(Arc::new(Config::default()))
        .unwrap();
    assert_eq!(field.location().to_string(), "created_at");

    field.finalize_config(Arc::new(
        Config::default().with_field("created_at", FieldOverride::alias("createdAt")),
    ));
    assert_eq!(field.location().to_string(), "createdAt");
}
