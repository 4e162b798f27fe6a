//! Field declarations.
//!
//! A [`FieldDecl`] collects what a schema builder knows about one field
//! before it is turned into a [`Descriptor`].

use std::sync::Arc;

use sieve_foundation::{Constraints, Result, Type, Value};

use crate::config::Config;
use crate::descriptor::Descriptor;
use crate::signature::Validator;

/// A validator registered for a field, with its placement flags.
#[derive(Clone, Debug)]
pub struct ClassValidator {
    /// The validator. Shared so its convention is classified once.
    pub validator: Arc<Validator>,
    /// Runs before the built-in chain instead of after it.
    pub pre: bool,
    /// Runs on the undissected value instead of per element.
    pub whole: bool,
    /// Requests validation even when the field is absent.
    pub always: bool,
}

impl ClassValidator {
    /// Creates a per-element post validator.
    #[must_use]
    pub fn new(validator: Validator) -> Self {
        Self::shared(Arc::new(validator))
    }

    /// Creates a per-element post validator from a shared validator.
    #[must_use]
    pub fn shared(validator: Arc<Validator>) -> Self {
        Self {
            validator,
            pre: false,
            whole: false,
            always: false,
        }
    }

    /// Places the validator before the built-in chain.
    #[must_use]
    pub fn pre(mut self) -> Self {
        self.pre = true;
        self
    }

    /// Applies the validator to the whole value.
    #[must_use]
    pub fn whole(mut self) -> Self {
        self.whole = true;
        self
    }

    /// Marks the validator as always applicable.
    #[must_use]
    pub fn always(mut self) -> Self {
        self.always = true;
        self
    }
}

/// Declaration of one field.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    /// Declared name.
    pub name: Arc<str>,
    /// Declared type. Inferred from the default when absent.
    pub ty: Option<Type>,
    /// Default value.
    pub default: Option<Value>,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Registered validators, in declaration order.
    pub validators: Vec<ClassValidator>,
    /// Refinements for `Str`, `Int` and `Float` types.
    pub constraints: Constraints,
    /// Explicit external name.
    pub alias: Option<Arc<str>>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl FieldDecl {
    /// Declares a required field with no default.
    #[must_use]
    pub fn required(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            default: None,
            required: true,
            validators: Vec::new(),
            constraints: Constraints::default(),
            alias: None,
            description: None,
        }
    }

    /// Declares an optional field with a default value.
    #[must_use]
    pub fn optional(name: impl Into<Arc<str>>, ty: Type, default: Value) -> Self {
        Self {
            default: Some(default),
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Declares an optional field with no default (will be nullable).
    #[must_use]
    pub fn optional_nil(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Declares an optional field whose type is taken from its default.
    #[must_use]
    pub fn inferred(name: impl Into<Arc<str>>, default: Value) -> Self {
        Self {
            ty: None,
            ..Self::optional(name, Type::Any, default)
        }
    }

    /// Adds a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: ClassValidator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Sets the constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the external name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<Arc<str>>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the type cannot be inferred or
    /// resolved, a validator signature is invalid, or a pattern does not
    /// compile.
    pub fn build(self, config: Arc<Config>) -> Result<Descriptor> {
        Descriptor::declare(self, config)
    }
}
