//! Built-in validator chains for base types.
//!
//! [`find_validators`] maps a resolved base type to its ordered chain.
//! Chains for plain scalars start with the shared [`NOT_NONE`] step, which
//! the pipeline builder drops for nullable descriptors.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use sieve_foundation::{
    CustomType, Error, ErrorKind, NumConstraints, Result, StepError, StepResult, StrConstraints,
    Type, Value, ValueErrorKind,
};
use tracing::warn;

use crate::config::Config;
use crate::signature::{Context, Validator};

/// Rejects null. Omitted from the pipeline of nullable descriptors.
pub static NOT_NONE: LazyLock<Arc<Validator>> =
    LazyLock::new(|| Arc::new(Validator::new("not_none", not_none)));

const BOOL_TRUE: [&str; 6] = ["1", "on", "t", "true", "y", "yes"];
const BOOL_FALSE: [&str; 6] = ["0", "off", "f", "false", "n", "no"];

/// Returns the built-in chain for a resolved base type.
///
/// # Errors
///
/// Returns [`ErrorKind::UnresolvedType`] if the type has no chain and
/// arbitrary types are not allowed, and [`ErrorKind::InvalidPattern`] if a
/// string pattern does not compile.
pub fn find_validators(ty: &Type, config: &Config) -> Result<Vec<Arc<Validator>>> {
    let chain = match ty {
        Type::Any => Vec::new(),
        Type::None => vec![step("none", none)],
        Type::Bool => vec![NOT_NONE.clone(), step("bool", bool_validator)],
        Type::Int => vec![NOT_NONE.clone(), step("int", int_validator)],
        Type::Float => vec![NOT_NONE.clone(), step("float", float_validator)],
        Type::AnyTuple => vec![NOT_NONE.clone(), step("tuple", tuple_validator)],
        Type::Str => vec![
            NOT_NONE.clone(),
            step("str", str_validator),
            Arc::new(strip_whitespace(false)),
            Arc::new(anystr_length(None, None)),
        ],
        Type::ConStr(limits) => constr_chain(limits)?,
        Type::ConInt(bounds) => vec![
            NOT_NONE.clone(),
            step("int", int_validator),
            Arc::new(number_size(*bounds)),
        ],
        Type::ConFloat(bounds) => vec![
            NOT_NONE.clone(),
            step("float", float_validator),
            Arc::new(number_size(*bounds)),
        ],
        Type::Custom(custom) if !custom.validators().is_empty() => custom
            .validators()
            .iter()
            .map(|(name, f)| {
                let f = Arc::clone(f);
                Arc::new(Validator::new(Arc::clone(name), move |v| f(v)))
            })
            .collect(),
        Type::Custom(custom) if custom.has_constructor() => vec![Arc::new(construct(custom))],
        other => vec![arbitrary(other, config)?],
    };
    Ok(chain)
}

fn step(name: &str, f: fn(Value) -> StepResult) -> Arc<Validator> {
    Arc::new(Validator::new(name, f))
}

fn arbitrary(ty: &Type, config: &Config) -> Result<Arc<Validator>> {
    if !config.arbitrary_types_allowed {
        return Err(Error::unresolved_type(ty));
    }
    warn!(ty = %ty, "no validators for type, accepting values unchecked");
    Ok(Arc::new(Validator::new(format!("arbitrary_{ty}"), Ok)))
}

fn not_none(value: Value) -> StepResult {
    if value.is_nil() {
        Err(ValueErrorKind::NoneNotAllowed.into())
    } else {
        Ok(value)
    }
}

fn none(value: Value) -> StepResult {
    if value.is_nil() {
        Ok(value)
    } else {
        Err(ValueErrorKind::Arbitrary {
            expected: "none".to_string(),
        }
        .into())
    }
}

fn str_validator(value: Value) -> StepResult {
    match value {
        Value::Str(_) => Ok(value),
        Value::Int(n) => Ok(Value::from(n.to_string())),
        Value::Float(n) => Ok(Value::from(format!("{n:?}"))),
        _ => Err(ValueErrorKind::Str.into()),
    }
}

fn tuple_validator(value: Value) -> StepResult {
    match value {
        Value::Tuple(_) => Ok(value),
        Value::List(items) => Ok(Value::Tuple(items)),
        Value::Set(items) => Ok(Value::Tuple(items.iter().cloned().collect())),
        _ => Err(ValueErrorKind::Tuple.into()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn int_validator(value: Value) -> StepResult {
    match value {
        Value::Int(_) => Ok(value),
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Float(n) if n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64 => {
            Ok(Value::Int(n.trunc() as i64))
        }
        Value::Str(ref s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ValueErrorKind::Integer.into()),
        _ => Err(ValueErrorKind::Integer.into()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn float_validator(value: Value) -> StepResult {
    match value {
        Value::Float(_) => Ok(value),
        Value::Int(n) => Ok(Value::Float(n as f64)),
        Value::Bool(b) => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
        Value::Str(ref s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ValueErrorKind::Float.into()),
        _ => Err(ValueErrorKind::Float.into()),
    }
}

#[allow(clippy::float_cmp)]
fn bool_validator(value: Value) -> StepResult {
    let parsed = match &value {
        Value::Bool(b) => Some(*b),
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::Float(n) if *n == 0.0 => Some(false),
        Value::Float(n) if *n == 1.0 => Some(true),
        Value::Str(s) => {
            let lowered = s.to_lowercase();
            if BOOL_TRUE.contains(&lowered.as_str()) {
                Some(true)
            } else if BOOL_FALSE.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };
    parsed
        .map(Value::Bool)
        .ok_or_else(|| ValueErrorKind::Bool.into())
}

/// Strips surrounding whitespace when forced or enabled in the config.
fn strip_whitespace(force: bool) -> Validator {
    Validator::with_context("strip_whitespace", move |value, ctx: &Context<'_>| {
        if !(force || ctx.config.anystr_strip_whitespace) {
            return Ok(value);
        }
        let stripped = match value.as_str() {
            Some(s) if s.trim().len() != s.len() => Some(Value::from(s.trim())),
            _ => None,
        };
        Ok(stripped.unwrap_or(value))
    })
}

/// Checks string length, in characters. Limits not given fall back to the
/// config's `min_anystr_length` and `max_anystr_length`.
fn anystr_length(min: Option<usize>, max: Option<usize>) -> Validator {
    Validator::with_context("anystr_length", move |value, ctx: &Context<'_>| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if let Some(limit) = min.or(ctx.config.min_anystr_length) {
                if len < limit {
                    return Err(ValueErrorKind::MinLength { limit_value: limit }.into());
                }
            }
            if let Some(limit) = max.or(ctx.config.max_anystr_length) {
                if len > limit {
                    return Err(ValueErrorKind::MaxLength { limit_value: limit }.into());
                }
            }
        }
        Ok(value)
    })
}

fn constr_chain(limits: &StrConstraints) -> Result<Vec<Arc<Validator>>> {
    let mut chain = vec![
        NOT_NONE.clone(),
        step("str", str_validator),
        Arc::new(strip_whitespace(limits.strip_whitespace)),
        Arc::new(anystr_length(limits.min_length, limits.max_length)),
    ];
    if let Some(pattern) = &limits.regex {
        chain.push(Arc::new(regex_validator(pattern)?));
    }
    Ok(chain)
}

/// Matches from the start of the string.
fn regex_validator(pattern: &str) -> Result<Validator> {
    let invalid = |e: regex::Error| {
        Error::new(ErrorKind::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
    };
    Regex::new(pattern).map_err(invalid)?;
    let anchored = Regex::new(&format!("^(?:{pattern})")).map_err(invalid)?;
    let pattern = pattern.to_string();
    Ok(Validator::new("regex", move |value| match value.as_str() {
        Some(s) if !anchored.is_match(s) => Err(ValueErrorKind::Regex {
            pattern: pattern.clone(),
        }
        .into()),
        _ => Ok(value),
    }))
}

fn number_size(bounds: NumConstraints) -> Validator {
    Validator::new("number_size", move |value| {
        let Some(n) = value.as_number() else {
            return Ok(value);
        };
        if let Some(limit) = bounds.gt {
            if n <= limit {
                return Err(ValueErrorKind::NotGt { limit_value: limit }.into());
            }
        }
        if let Some(limit) = bounds.ge {
            if n < limit {
                return Err(ValueErrorKind::NotGe { limit_value: limit }.into());
            }
        }
        if let Some(limit) = bounds.lt {
            if n >= limit {
                return Err(ValueErrorKind::NotLt { limit_value: limit }.into());
            }
        }
        if let Some(limit) = bounds.le {
            if n > limit {
                return Err(ValueErrorKind::NotLe { limit_value: limit }.into());
            }
        }
        Ok(value)
    })
}

/// Dispatches to the custom type's constructor for the input's kind.
fn construct(custom: &Arc<CustomType>) -> Validator {
    let custom = Arc::clone(custom);
    Validator::new(format!("construct_{}", custom.name()), move |value| {
        let constructor = match value {
            Value::Str(_) => custom.str_constructor(),
            Value::Int(_) | Value::Float(_) => custom.number_constructor(),
            Value::Map(_) => custom.map_constructor(),
            _ => None,
        };
        match constructor {
            Some(f) => f(value),
            None => Err(StepError::Invalid(ValueErrorKind::Arbitrary {
                expected: custom.name().to_string(),
            })),
        }
    })
}
