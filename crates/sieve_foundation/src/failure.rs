//! Value-error vocabulary and location paths.
//!
//! A [`ValidationError`] is a routine, recoverable report that one input
//! failed one check. It is distinct from [`crate::Error`], which signals a
//! broken schema or a broken validator.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::collections::SvVec;
use crate::value::Value;

/// Result of a single validation step.
pub type StepResult = std::result::Result<Value, StepError>;

/// Failure raised by a validation step.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StepError {
    /// The input is invalid. Collected into the error report.
    #[error(transparent)]
    Invalid(#[from] ValueErrorKind),

    /// The validator itself is broken. Never folded into the report.
    #[error("validator fault: {0}")]
    Fault(String),
}

impl StepError {
    /// Creates a generic value error with a message.
    #[must_use]
    pub fn value(message: impl Into<String>) -> Self {
        Self::Invalid(ValueErrorKind::Value {
            message: message.into(),
        })
    }

    /// Creates a generic type error with a message.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Invalid(ValueErrorKind::Type {
            message: message.into(),
        })
    }

    /// Creates a fault.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }
}

/// Kinds of value errors, with the structured context a renderer needs.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValueErrorKind {
    /// Null given where a value is required.
    #[error("none is not an allowed value")]
    NoneNotAllowed,

    /// Input is not a valid string.
    #[error("str type expected")]
    Str,

    /// Input is not a valid integer.
    #[error("value is not a valid integer")]
    Integer,

    /// Input is not a valid float.
    #[error("value is not a valid float")]
    Float,

    /// Input is not a valid boolean.
    #[error("value could not be parsed to a boolean")]
    Bool,

    /// Input is not mapping-coercible.
    #[error("value is not a valid dict")]
    Dict,

    /// Input is not list-like where a list is expected.
    #[error("value is not a valid list")]
    List,

    /// Input is not list-like where a set is expected.
    #[error("value is not a valid set")]
    Set,

    /// Input is not list-like where a tuple is expected.
    #[error("value is not a valid tuple")]
    Tuple,

    /// Tuple input has the wrong number of elements.
    #[error("wrong tuple length {actual_length}, expected {expected_length}")]
    TupleLength {
        /// Declared arity.
        expected_length: usize,
        /// Length of the input.
        actual_length: usize,
    },

    /// String shorter than the minimum length.
    #[error("ensure this value has at least {limit_value} characters")]
    MinLength {
        /// Minimum length.
        limit_value: usize,
    },

    /// String longer than the maximum length.
    #[error("ensure this value has at most {limit_value} characters")]
    MaxLength {
        /// Maximum length.
        limit_value: usize,
    },

    /// String does not match the pattern.
    #[error("string does not match regex \"{pattern}\"")]
    Regex {
        /// The pattern.
        pattern: String,
    },

    /// Number not greater than the exclusive lower bound.
    #[error("ensure this value is greater than {limit_value}")]
    NotGt {
        /// The bound.
        limit_value: f64,
    },

    /// Number not greater than or equal to the inclusive lower bound.
    #[error("ensure this value is greater than or equal to {limit_value}")]
    NotGe {
        /// The bound.
        limit_value: f64,
    },

    /// Number not less than the exclusive upper bound.
    #[error("ensure this value is less than {limit_value}")]
    NotLt {
        /// The bound.
        limit_value: f64,
    },

    /// Number not less than or equal to the inclusive upper bound.
    #[error("ensure this value is less than or equal to {limit_value}")]
    NotLe {
        /// The bound.
        limit_value: f64,
    },

    /// JSON payload could not be decoded.
    #[error("invalid json: {reason}")]
    Json {
        /// Decoder message.
        reason: String,
    },

    /// JSON payload was not a string.
    #[error("JSON object must be str")]
    JsonType,

    /// Input could not be turned into a custom or named type.
    #[error("instance of {expected} expected")]
    Arbitrary {
        /// Name of the expected type.
        expected: String,
    },

    /// Generic value error raised by a user validator.
    #[error("{message}")]
    Value {
        /// Validator message.
        message: String,
    },

    /// Generic type error raised by a user validator.
    #[error("{message}")]
    Type {
        /// Validator message.
        message: String,
    },
}

impl ValueErrorKind {
    /// Returns the stable failure-kind identifier.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoneNotAllowed => "type_error.none.not_allowed",
            Self::Str => "type_error.str",
            Self::Integer => "type_error.integer",
            Self::Float => "type_error.float",
            Self::Bool => "type_error.bool",
            Self::Dict => "type_error.dict",
            Self::List => "type_error.list",
            Self::Set => "type_error.set",
            Self::Tuple => "type_error.tuple",
            Self::TupleLength { .. } => "value_error.tuple.length",
            Self::MinLength { .. } => "value_error.any_str.min_length",
            Self::MaxLength { .. } => "value_error.any_str.max_length",
            Self::Regex { .. } => "value_error.str.regex",
            Self::NotGt { .. } => "value_error.number.not_gt",
            Self::NotGe { .. } => "value_error.number.not_ge",
            Self::NotLt { .. } => "value_error.number.not_lt",
            Self::NotLe { .. } => "value_error.number.not_le",
            Self::Json { .. } => "value_error.json",
            Self::JsonType => "type_error.json",
            Self::Arbitrary { .. } => "type_error.arbitrary_type",
            Self::Value { .. } => "value_error",
            Self::Type { .. } => "type_error",
        }
    }
}

/// One step in a location path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum LocItem {
    /// A named field.
    Field(Arc<str>),
    /// A sequence position.
    Index(usize),
    /// A mapping key (the value stored under it is being validated).
    Key(Value),
    /// The key itself of a mapping entry is being validated.
    KeyMarker,
}

impl fmt::Debug for LocItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for LocItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{name}"),
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(key) => write!(f, "{key}"),
            Self::KeyMarker => write!(f, "__key__"),
        }
    }
}

impl From<&str> for LocItem {
    fn from(name: &str) -> Self {
        Self::Field(name.into())
    }
}

impl From<Arc<str>> for LocItem {
    fn from(name: Arc<str>) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for LocItem {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Path from the record root to the value being validated.
///
/// Extending a location shares structure with its parent, so building a
/// child location per element is cheap.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Location(SvVec<LocItem>);

impl Location {
    /// Creates an empty (root) location.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new location with `item` appended.
    #[must_use]
    pub fn child(&self, item: impl Into<LocItem>) -> Self {
        Self(self.0.push_back(item.into()))
    }

    /// Returns the path items from the root.
    pub fn items(&self) -> impl Iterator<Item = &LocItem> {
        self.0.iter()
    }

    /// Returns the number of path items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root location.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the innermost path item.
    #[must_use]
    pub fn last(&self) -> Option<&LocItem> {
        self.0.last()
    }
}

impl From<&str> for Location {
    fn from(name: &str) -> Self {
        Self::root().child(name)
    }
}

impl<T: Into<LocItem>> FromIterator<T> for Location {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items()).finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// A value error tagged with where it occurred.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{loc}: {kind}")]
pub struct ValidationError {
    /// What went wrong.
    pub kind: ValueErrorKind,
    /// Where it went wrong.
    pub loc: Location,
}

impl ValidationError {
    /// Creates an error at a location.
    #[must_use]
    pub fn new(kind: ValueErrorKind, loc: Location) -> Self {
        Self { kind, loc }
    }

    /// Returns the failure-kind identifier.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}
