//! Type descriptions for declared fields.
//!
//! A [`Type`] is an explicit tree: container element types are child nodes
//! built with the constructor functions (`Type::list(Type::Int)`), never
//! discovered at run time.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::failure::StepResult;
use crate::value::Value;

/// Declared type of a field or nested element.
#[derive(Clone, PartialEq)]
pub enum Type {
    /// Any value, accepted unchanged.
    Any,
    /// The null type. Only meaningful as an alternative of a union.
    None,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    Str,
    /// String refined with length and pattern limits.
    ConStr(StrConstraints),
    /// Integer refined with numeric bounds.
    ConInt(NumConstraints),
    /// Float refined with numeric bounds.
    ConFloat(NumConstraints),
    /// Homogeneous variable-length sequence.
    List(Box<Type>),
    /// Homogeneous unique-element collection.
    Set(Box<Type>),
    /// Mapping from key type to value type.
    Map(Box<Type>, Box<Type>),
    /// Fixed-arity positional sequence.
    Tuple(Vec<Type>),
    /// Sequence of any length and element types, coerced to a tuple.
    AnyTuple,
    /// Ordered alternatives; may include [`Type::None`].
    Union(Vec<Type>),
    /// Shorthand for a union of the inner type and `None`.
    Optional(Box<Type>),
    /// String-encoded JSON payload decoded before validating the inner type.
    Json(Box<Type>),
    /// Application type carrying its own validators or constructors.
    Custom(Arc<CustomType>),
    /// Arbitrary type known only by name, with no validators.
    Named(Arc<str>),
}

impl Type {
    /// Creates a list type with the given element type.
    #[must_use]
    pub fn list(element: Type) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates a set type with the given element type.
    #[must_use]
    pub fn set(element: Type) -> Self {
        Self::Set(Box::new(element))
    }

    /// Creates a map type with the given key and value types.
    #[must_use]
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Creates a tuple type from positional element types.
    #[must_use]
    pub fn tuple(elements: impl IntoIterator<Item = Type>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    /// Creates a union of ordered alternatives.
    #[must_use]
    pub fn union(alternatives: impl IntoIterator<Item = Type>) -> Self {
        Self::Union(alternatives.into_iter().collect())
    }

    /// Creates an optional type.
    #[must_use]
    pub fn optional(inner: Type) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates a JSON payload type decoding into `inner`.
    #[must_use]
    pub fn json(inner: Type) -> Self {
        Self::Json(Box::new(inner))
    }

    /// Creates an arbitrary named type.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a custom type.
    #[must_use]
    pub fn custom(custom: CustomType) -> Self {
        Self::Custom(Arc::new(custom))
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true for parameterized types that decompose into sub-fields.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::List(_)
                | Self::Set(_)
                | Self::Map(_, _)
                | Self::Tuple(_)
                | Self::Union(_)
                | Self::Optional(_)
                | Self::Json(_)
        )
    }

    /// Refines a plain `Str`, `Int` or `Float` with declared constraints.
    ///
    /// Other types, and constraint sets that do not apply to the type, are
    /// returned unchanged. `Bool` is never refined.
    #[must_use]
    pub fn refine(self, constraints: &Constraints) -> Self {
        match self {
            Self::Str if constraints.has_str_limits() => Self::ConStr(StrConstraints {
                min_length: constraints.min_length,
                max_length: constraints.max_length,
                regex: constraints.regex.clone(),
                strip_whitespace: false,
            }),
            Self::Int if constraints.has_num_limits() => Self::ConInt(constraints.num_limits()),
            Self::Float if constraints.has_num_limits() => {
                Self::ConFloat(constraints.num_limits())
            }
            other => other,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::None => write!(f, "none"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::ConStr(_) => write!(f, "constr"),
            Self::ConInt(_) => write!(f, "conint"),
            Self::ConFloat(_) => write!(f, "confloat"),
            Self::List(t) => write!(f, "list<{t:?}>"),
            Self::Set(t) => write!(f, "set<{t:?}>"),
            Self::Map(k, v) => write!(f, "map<{k:?}, {v:?}>"),
            Self::Tuple(items) => write_joined(f, "tuple", items),
            Self::AnyTuple => write!(f, "tuple"),
            Self::Union(items) => write_joined(f, "union", items),
            Self::Optional(t) => write!(f, "optional<{t:?}>"),
            Self::Json(t) => write!(f, "json<{t:?}>"),
            Self::Custom(c) => write!(f, "{}", c.name()),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, head: &str, items: &[Type]) -> fmt::Result {
    write!(f, "{head}<")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item:?}")?;
    }
    write!(f, ">")
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Constraints declared on a field, applied to `Str`, `Int` and `Float`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraints {
    /// Exclusive lower bound.
    pub gt: Option<f64>,
    /// Inclusive lower bound.
    pub ge: Option<f64>,
    /// Exclusive upper bound.
    pub lt: Option<f64>,
    /// Inclusive upper bound.
    pub le: Option<f64>,
    /// Minimum string length, in characters.
    pub min_length: Option<usize>,
    /// Maximum string length, in characters.
    pub max_length: Option<usize>,
    /// Pattern the string must match.
    pub regex: Option<String>,
}

impl Constraints {
    /// Creates an empty constraint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exclusive lower bound.
    #[must_use]
    pub fn gt(mut self, limit: f64) -> Self {
        self.gt = Some(limit);
        self
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn ge(mut self, limit: f64) -> Self {
        self.ge = Some(limit);
        self
    }

    /// Sets the exclusive upper bound.
    #[must_use]
    pub fn lt(mut self, limit: f64) -> Self {
        self.lt = Some(limit);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub fn le(mut self, limit: f64) -> Self {
        self.le = Some(limit);
        self
    }

    /// Sets the minimum string length.
    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Sets the maximum string length.
    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Sets the pattern.
    #[must_use]
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Returns true if no constraint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_str_limits() && !self.has_num_limits()
    }

    /// Returns true if some constraint would be dropped by [`Type::refine`]
    /// on `ty`.
    #[must_use]
    pub fn ignored_by(&self, ty: &Type) -> bool {
        let str_applies = matches!(ty, Type::Str);
        let num_applies = matches!(ty, Type::Int | Type::Float);
        (self.has_str_limits() && !str_applies) || (self.has_num_limits() && !num_applies)
    }

    fn has_str_limits(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some() || self.regex.is_some()
    }

    fn has_num_limits(&self) -> bool {
        self.gt.is_some() || self.ge.is_some() || self.lt.is_some() || self.le.is_some()
    }

    fn num_limits(&self) -> NumConstraints {
        NumConstraints {
            gt: self.gt,
            ge: self.ge,
            lt: self.lt,
            le: self.le,
        }
    }
}

/// Refinements of a string type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrConstraints {
    /// Minimum length, in characters.
    pub min_length: Option<usize>,
    /// Maximum length, in characters.
    pub max_length: Option<usize>,
    /// Pattern the whole string must match from its start.
    pub regex: Option<String>,
    /// Strip surrounding whitespace before length checks.
    pub strip_whitespace: bool,
}

/// Numeric bounds of a refined integer or float type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumConstraints {
    /// Exclusive lower bound.
    pub gt: Option<f64>,
    /// Inclusive lower bound.
    pub ge: Option<f64>,
    /// Exclusive upper bound.
    pub lt: Option<f64>,
    /// Inclusive upper bound.
    pub le: Option<f64>,
}

/// A coercion or check supplied by a custom type.
pub type CustomFn = Arc<dyn Fn(Value) -> StepResult + Send + Sync>;

/// An application-defined type.
///
/// Either supplies its own ordered validator chain, or one or more
/// capability constructors that build the value from a string, a number or
/// a mapping. The chain takes precedence when both are present.
#[derive(Clone)]
pub struct CustomType {
    name: Arc<str>,
    validators: Vec<(Arc<str>, CustomFn)>,
    from_str: Option<CustomFn>,
    from_number: Option<CustomFn>,
    from_map: Option<CustomFn>,
    validate_always: bool,
}

impl CustomType {
    /// Creates a custom type with no validators or constructors.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            validators: Vec::new(),
            from_str: None,
            from_number: None,
            from_map: None,
            validate_always: false,
        }
    }

    /// Appends a step to the type's own validator chain.
    #[must_use]
    pub fn with_validator(
        mut self,
        name: impl Into<Arc<str>>,
        f: impl Fn(Value) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        self.validators.push((name.into(), Arc::new(f)));
        self
    }

    /// Declares the type constructible from a string.
    #[must_use]
    pub fn from_string(mut self, f: impl Fn(Value) -> StepResult + Send + Sync + 'static) -> Self {
        self.from_str = Some(Arc::new(f));
        self
    }

    /// Declares the type constructible from a number.
    #[must_use]
    pub fn from_number(
        mut self,
        f: impl Fn(Value) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        self.from_number = Some(Arc::new(f));
        self
    }

    /// Declares the type constructible from a mapping.
    #[must_use]
    pub fn from_mapping(mut self, f: impl Fn(Value) -> StepResult + Send + Sync + 'static) -> Self {
        self.from_map = Some(Arc::new(f));
        self
    }

    /// Requests validation even when the field value is absent.
    #[must_use]
    pub fn always(mut self) -> Self {
        self.validate_always = true;
        self
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type's own validator chain.
    #[must_use]
    pub fn validators(&self) -> &[(Arc<str>, CustomFn)] {
        &self.validators
    }

    /// Returns the string constructor, if any.
    #[must_use]
    pub fn str_constructor(&self) -> Option<&CustomFn> {
        self.from_str.as_ref()
    }

    /// Returns the number constructor, if any.
    #[must_use]
    pub fn number_constructor(&self) -> Option<&CustomFn> {
        self.from_number.as_ref()
    }

    /// Returns the mapping constructor, if any.
    #[must_use]
    pub fn map_constructor(&self) -> Option<&CustomFn> {
        self.from_map.as_ref()
    }

    /// Returns true if any capability constructor is declared.
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.from_str.is_some() || self.from_number.is_some() || self.from_map.is_some()
    }

    /// Returns true if the type must be validated even when absent.
    #[must_use]
    pub const fn validate_always(&self) -> bool {
        self.validate_always
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .field("validators", &self.validators.len())
            .field("constructors", &self.has_constructor())
            .finish()
    }
}
