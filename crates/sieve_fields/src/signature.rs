//! Validator calling conventions.
//!
//! A validator comes in one of four shapes:
//!
//! - **Just value** - `(value)`
//! - **Value with context** - `(value, *, values, config, field)`
//! - **Owner, just value** - `(owner, value)`
//! - **Owner with context** - `(owner, value, *, values, config, field)`
//!
//! Closures built with the typed constructors carry their convention in
//! their type. Validators built from a declared parameter list are
//! classified on first use; the result is cached on the validator, so a
//! validator shared by several fields is classified once.

use std::fmt;
use std::sync::{Arc, OnceLock};

use sieve_foundation::{Error, Result, StepResult, SvMap, Value};
use tracing::trace;

use crate::config::Config;
use crate::descriptor::Descriptor;

/// Values of the record's already-validated fields, keyed by field name.
pub type Values = SvMap<Arc<str>, Value>;

/// How a validator must be invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Convention {
    /// Receives only the value.
    JustValue,
    /// Receives the value and the validation context.
    ValueContext,
    /// Receives the owner and the value.
    OwnerJustValue,
    /// Receives the owner, the value, and the validation context.
    OwnerValueContext,
}

impl Convention {
    /// Returns true if the owner is passed.
    #[must_use]
    pub const fn takes_owner(self) -> bool {
        matches!(self, Self::OwnerJustValue | Self::OwnerValueContext)
    }

    /// Returns true if the context is passed.
    #[must_use]
    pub const fn takes_context(self) -> bool {
        matches!(self, Self::ValueContext | Self::OwnerValueContext)
    }
}

/// The record type a field belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Owner {
    name: Arc<str>,
}

impl Owner {
    /// Creates an owner with the given type name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the owner's type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Everything a context-taking validator may read.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Already-validated sibling values.
    pub values: &'a Values,
    /// Schema configuration.
    pub config: &'a Config,
    /// The descriptor currently validating.
    pub field: &'a Descriptor,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", self.values)
            .field("field", &self.field.name())
            .finish_non_exhaustive()
    }
}

/// One declared parameter of a validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// The owning record type. Only valid in first position.
    Owner,
    /// A named parameter.
    Named(Arc<str>),
    /// Catch-all for keyword arguments.
    Rest,
}

impl Param {
    /// Creates a named parameter.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Rest => write!(f, "**kwargs"),
        }
    }
}

/// Keyword arguments supplied to context-taking validators.
const CONTEXT_KEYWORDS: [&str; 3] = ["values", "config", "field"];

/// Arguments handed to a validator built from a declared parameter list.
///
/// Only the arguments its convention binds are present.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// The owner, for owner conventions.
    pub owner: Option<&'a Owner>,
    /// The value under validation.
    pub value: Value,
    /// The context, for context conventions.
    pub context: Option<&'a Context<'a>>,
}

type ValueFn = dyn Fn(Value) -> StepResult + Send + Sync;
type ValueContextFn = dyn Fn(Value, &Context<'_>) -> StepResult + Send + Sync;
type OwnerFn = dyn Fn(Option<&Owner>, Value) -> StepResult + Send + Sync;
type OwnerContextFn = dyn Fn(Option<&Owner>, Value, &Context<'_>) -> StepResult + Send + Sync;
type DeclaredFn = dyn Fn(Invocation<'_>) -> StepResult + Send + Sync;

/// The callable behind a validator, tagged by its shape.
#[derive(Clone)]
pub enum Callable {
    /// `(value)`
    Value(Arc<ValueFn>),
    /// `(value, *, values, config, field)`
    ValueContext(Arc<ValueContextFn>),
    /// `(owner, value)`
    Owner(Arc<OwnerFn>),
    /// `(owner, value, *, values, config, field)`
    OwnerContext(Arc<OwnerContextFn>),
    /// A parameter list classified on first use.
    Declared {
        /// Declared parameters, in order.
        params: Vec<Param>,
        /// The function, given whatever the classified convention binds.
        func: Arc<DeclaredFn>,
    },
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => write!(f, "Value"),
            Self::ValueContext(_) => write!(f, "ValueContext"),
            Self::Owner(_) => write!(f, "Owner"),
            Self::OwnerContext(_) => write!(f, "OwnerContext"),
            Self::Declared { params, .. } => write!(f, "Declared{}", render(params)),
        }
    }
}

/// A named validation step.
pub struct Validator {
    name: Arc<str>,
    callable: Callable,
    convention: OnceLock<Convention>,
}

impl Validator {
    /// Creates a validator taking only the value.
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        f: impl Fn(Value) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_callable(name, Callable::Value(Arc::new(f)))
    }

    /// Creates a validator taking the value and the context.
    #[must_use]
    pub fn with_context(
        name: impl Into<Arc<str>>,
        f: impl Fn(Value, &Context<'_>) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_callable(name, Callable::ValueContext(Arc::new(f)))
    }

    /// Creates a validator taking the owner and the value.
    #[must_use]
    pub fn owner(
        name: impl Into<Arc<str>>,
        f: impl Fn(Option<&Owner>, Value) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_callable(name, Callable::Owner(Arc::new(f)))
    }

    /// Creates a validator taking the owner, the value, and the context.
    #[must_use]
    pub fn owner_with_context(
        name: impl Into<Arc<str>>,
        f: impl Fn(Option<&Owner>, Value, &Context<'_>) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_callable(name, Callable::OwnerContext(Arc::new(f)))
    }

    /// Creates a validator from a declared parameter list.
    ///
    /// The list is classified when the validator first enters a pipeline.
    #[must_use]
    pub fn declared(
        name: impl Into<Arc<str>>,
        params: impl IntoIterator<Item = Param>,
        f: impl Fn(Invocation<'_>) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_callable(
            name,
            Callable::Declared {
                params: params.into_iter().collect(),
                func: Arc::new(f),
            },
        )
    }

    /// Creates a validator from any callable.
    #[must_use]
    pub fn from_callable(name: impl Into<Arc<str>>, callable: Callable) -> Self {
        Self {
            name: name.into(),
            callable,
            convention: OnceLock::new(),
        }
    }

    /// Returns the validator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the callable.
    #[must_use]
    pub const fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Returns the convention if it has already been determined.
    #[must_use]
    pub fn cached_convention(&self) -> Option<Convention> {
        self.convention.get().copied()
    }

    /// Returns the validator's convention, classifying it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`sieve_foundation::ErrorKind::InvalidSignature`] if a
    /// declared parameter list binds none of the four forms.
    pub fn convention(&self) -> Result<Convention> {
        if let Some(convention) = self.convention.get() {
            return Ok(*convention);
        }
        let convention = classify(self)?;
        trace!(validator = %self.name, ?convention, "validator classified");
        Ok(*self.convention.get_or_init(|| convention))
    }

    /// Invokes the validator with the arguments its convention binds.
    pub(crate) fn call(
        &self,
        convention: Convention,
        owner: Option<&Owner>,
        value: Value,
        context: &Context<'_>,
    ) -> StepResult {
        match &self.callable {
            Callable::Value(f) => f(value),
            Callable::ValueContext(f) => f(value, context),
            Callable::Owner(f) => f(owner, value),
            Callable::OwnerContext(f) => f(owner, value, context),
            Callable::Declared { func, .. } => func(Invocation {
                owner: if convention.takes_owner() { owner } else { None },
                value,
                context: convention.takes_context().then_some(context),
            }),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("callable", &self.callable)
            .field("convention", &self.convention.get())
            .finish()
    }
}

/// Determines which of the four forms a validator accepts.
///
/// # Errors
///
/// Returns [`sieve_foundation::ErrorKind::InvalidSignature`] naming the
/// validator and its parameter list if no form binds.
pub fn classify(validator: &Validator) -> Result<Convention> {
    match &validator.callable {
        Callable::Value(_) => Ok(Convention::JustValue),
        Callable::ValueContext(_) => Ok(Convention::ValueContext),
        Callable::Owner(_) => Ok(Convention::OwnerJustValue),
        Callable::OwnerContext(_) => Ok(Convention::OwnerValueContext),
        Callable::Declared { params, .. } => classify_params(params)
            .ok_or_else(|| Error::invalid_signature(validator.name(), render(params))),
    }
}

fn classify_params(params: &[Param]) -> Option<Convention> {
    let (takes_owner, rest) = match params.split_first() {
        Some((Param::Owner, rest)) => (true, rest),
        _ => (false, params),
    };
    let (value, extras) = rest.split_first()?;
    if !matches!(value, Param::Named(_)) {
        return None;
    }
    if extras.is_empty() {
        return Some(if takes_owner {
            Convention::OwnerJustValue
        } else {
            Convention::JustValue
        });
    }
    if !binds_context(extras) {
        return None;
    }
    Some(if takes_owner {
        Convention::OwnerValueContext
    } else {
        Convention::ValueContext
    })
}

/// Every context keyword must find a parameter, and every parameter must
/// receive a keyword.
fn binds_context(extras: &[Param]) -> bool {
    let mut seen = [false; CONTEXT_KEYWORDS.len()];
    let mut has_rest = false;
    for param in extras {
        match param {
            Param::Owner => return false,
            Param::Rest => has_rest = true,
            Param::Named(name) => {
                let Some(i) = CONTEXT_KEYWORDS.iter().position(|k| **k == **name) else {
                    return false;
                };
                if seen[i] {
                    return false;
                }
                seen[i] = true;
            }
        }
    }
    has_rest || seen.iter().all(|s| *s)
}

fn render(params: &[Param]) -> String {
    let items: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("({})", items.join(", "))
}
