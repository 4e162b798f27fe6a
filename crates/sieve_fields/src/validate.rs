//! Value validation against a descriptor tree.
//!
//! Validation never stops at the first failing element: every element of a
//! list, set, tuple or mapping is visited and all failures are reported,
//! depth-first, in index or key order. Only a validator fault aborts the
//! walk.

use sieve_foundation::{
    Error, LocItem, Location, Result, StepError, SvMap, ValidationError, Value, ValueErrorKind,
    json,
};
use tracing::trace;

use crate::descriptor::Descriptor;
use crate::pipeline::Step;
use crate::shape::Shape;
use crate::signature::{Context, Owner, Values};

/// The coerced value and the errors collected while producing it.
///
/// When `errors` is non-empty, `value` is the input as it stood when
/// validation failed.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// The validated value.
    pub value: Value,
    /// Location-tagged errors, empty on success.
    pub errors: Vec<ValidationError>,
}

impl Outcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn valid(value: Value) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn invalid(value: Value, errors: Vec<ValidationError>) -> Self {
        Self { value, errors }
    }

    fn error(value: Value, kind: ValueErrorKind, loc: &Location) -> Self {
        Self::invalid(value, vec![ValidationError::new(kind, loc.clone())])
    }

    /// Returns true if no error was collected.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into the value or the errors.
    ///
    /// # Errors
    ///
    /// Returns the collected errors if there are any.
    pub fn into_result(self) -> std::result::Result<Value, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(self.errors)
        }
    }
}

/// Validates a raw value against a descriptor.
///
/// # Errors
///
/// Returns [`sieve_foundation::ErrorKind::ValidatorFault`] if a validator
/// fails outside the value-error vocabulary. Invalid input is reported in
/// the [`Outcome`], never as an error.
pub fn validate(
    descriptor: &Descriptor,
    value: Value,
    values: &Values,
    loc: &Location,
    owner: Option<&Owner>,
) -> Result<Outcome> {
    descriptor.validate(value, values, loc, owner)
}

impl Descriptor {
    /// Validates a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`sieve_foundation::ErrorKind::ValidatorFault`] if a
    /// validator fails outside the value-error vocabulary.
    pub fn validate(
        &self,
        value: Value,
        values: &Values,
        loc: &Location,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        if self.nullable() && value.is_nil() {
            return Ok(Outcome::valid(value));
        }

        let mut value = value;
        if self.parse_json() {
            value = match json::decode(&value) {
                Ok(decoded) => decoded,
                Err(kind) => return Ok(Outcome::error(value, kind, loc)),
            };
        }

        if !self.pipeline().whole_pre().is_empty() {
            let outcome = self.apply(self.pipeline().whole_pre(), value, values, loc, owner)?;
            if !outcome.is_valid() {
                return Ok(outcome);
            }
            value = outcome.value;
        }

        trace!(field = %self.name(), shape = %self.shape(), loc = %loc, "validating");
        let outcome = match self.shape() {
            Shape::Singleton => self.validate_singleton(value, values, loc, owner)?,
            Shape::List | Shape::Set => self.validate_list_set(value, values, loc, owner)?,
            Shape::Tuple => self.validate_tuple(value, values, loc, owner)?,
            Shape::Mapping => self.validate_mapping(value, values, loc, owner)?,
        };

        if outcome.is_valid() && !self.pipeline().whole_post().is_empty() {
            return self.apply(self.pipeline().whole_post(), outcome.value, values, loc, owner);
        }
        Ok(outcome)
    }

    /// Validates the input against this field's own location.
    ///
    /// # Errors
    ///
    /// Returns [`sieve_foundation::ErrorKind::ValidatorFault`] if a
    /// validator fails outside the value-error vocabulary.
    pub fn validate_field(
        &self,
        value: Value,
        values: &Values,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        self.validate(value, values, &self.location(), owner)
    }

    fn validate_singleton(
        &self,
        value: Value,
        values: &Values,
        loc: &Location,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        if self.sub_fields().is_empty() {
            return self.apply(self.pipeline().validators(), value, values, loc, owner);
        }

        let mut errors = Vec::new();
        for field in self.sub_fields() {
            let outcome = field.validate(value.clone(), values, loc, owner)?;
            if outcome.is_valid() {
                return Ok(outcome);
            }
            errors.extend(outcome.errors);
        }
        Ok(Outcome::invalid(value, errors))
    }

    fn validate_list_set(
        &self,
        value: Value,
        values: &Values,
        loc: &Location,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        let Some(items) = value.elements() else {
            let kind = if self.shape() == Shape::Set {
                ValueErrorKind::Set
            } else {
                ValueErrorKind::List
            };
            return Ok(Outcome::error(value, kind, loc));
        };

        let mut result = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            let outcome = self.validate_singleton(item.clone(), values, &loc.child(i), owner)?;
            if outcome.is_valid() {
                result.push(outcome.value);
            } else {
                errors.extend(outcome.errors);
            }
        }

        if !errors.is_empty() {
            return Ok(Outcome::invalid(value, errors));
        }
        let validated = if self.shape() == Shape::Set {
            Value::Set(result.into_iter().collect())
        } else {
            Value::List(result.into_iter().collect())
        };
        Ok(Outcome::valid(validated))
    }

    fn validate_tuple(
        &self,
        value: Value,
        values: &Values,
        loc: &Location,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        let Some(items) = value.elements() else {
            return Ok(Outcome::error(value, ValueErrorKind::Tuple, loc));
        };

        let expected_length = self.sub_fields().len();
        let actual_length = items.len();
        if actual_length != expected_length {
            let kind = ValueErrorKind::TupleLength {
                expected_length,
                actual_length,
            };
            return Ok(Outcome::error(value, kind, loc));
        }

        let mut result = Vec::with_capacity(actual_length);
        let mut errors = Vec::new();
        for (i, (item, field)) in items.into_iter().zip(self.sub_fields()).enumerate() {
            let outcome = field.validate(item.clone(), values, &loc.child(i), owner)?;
            if outcome.is_valid() {
                result.push(outcome.value);
            } else {
                errors.extend(outcome.errors);
            }
        }

        if !errors.is_empty() {
            return Ok(Outcome::invalid(value, errors));
        }
        Ok(Outcome::valid(Value::Tuple(result.into_iter().collect())))
    }

    fn validate_mapping(
        &self,
        value: Value,
        values: &Values,
        loc: &Location,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        let Some(entries) = mapping_entries(&value) else {
            return Ok(Outcome::error(value, ValueErrorKind::Dict, loc));
        };

        let mut result = SvMap::new();
        let mut errors = Vec::new();
        for (key, item) in entries {
            let key_outcome = match self.key_field() {
                Some(key_field) => {
                    let key_loc = loc.child(LocItem::KeyMarker);
                    key_field.validate(key.clone(), values, &key_loc, owner)?
                }
                None => Outcome::valid(key.clone()),
            };
            if !key_outcome.is_valid() {
                errors.extend(key_outcome.errors);
                continue;
            }

            let item_loc = loc.child(LocItem::Key(key.clone()));
            let item_outcome = self.validate_singleton(item.clone(), values, &item_loc, owner)?;
            if !item_outcome.is_valid() {
                errors.extend(item_outcome.errors);
                continue;
            }

            result = result.insert(key_outcome.value, item_outcome.value);
        }

        if !errors.is_empty() {
            return Ok(Outcome::invalid(value, errors));
        }
        Ok(Outcome::valid(Value::Map(result)))
    }

    /// Runs steps in order; the first failing step stops the chain.
    fn apply(
        &self,
        steps: &[Step],
        value: Value,
        values: &Values,
        loc: &Location,
        owner: Option<&Owner>,
    ) -> Result<Outcome> {
        let context = Context {
            values,
            config: self.config(),
            field: self,
        };
        let mut value = value;
        for step in steps {
            match step
                .validator()
                .call(step.convention(), owner, value.clone(), &context)
            {
                Ok(next) => value = next,
                Err(StepError::Invalid(kind)) => return Ok(Outcome::error(value, kind, loc)),
                Err(StepError::Fault(message)) => {
                    return Err(Error::validator_fault(step.name(), message)
                        .in_field(self.name().to_string()));
                }
            }
        }
        Ok(Outcome::valid(value))
    }
}

/// Entries of a map, or of a list-like value whose elements are all
/// 2-element lists or tuples.
fn mapping_entries(value: &Value) -> Option<Vec<(&Value, &Value)>> {
    if let Some(map) = value.as_map() {
        return Some(map.iter().collect());
    }
    value
        .elements()?
        .into_iter()
        .map(|pair| match pair.as_seq() {
            Some(items) if items.len() == 2 => Some((items.get(0)?, items.get(1)?)),
            _ => None,
        })
        .collect()
}
