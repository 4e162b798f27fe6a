//! Error types for schema-definition defects and validator faults.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Per-input failures are not errors in this sense; see [`crate::failure`].

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for sieve operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the enclosing field, outermost last.
    #[must_use]
    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(field));
        self
    }

    /// Creates an unresolved type error.
    #[must_use]
    pub fn unresolved_type(ty: &Type) -> Self {
        Self::new(ErrorKind::UnresolvedType(ty.to_string()))
    }

    /// Creates an invalid validator signature error.
    #[must_use]
    pub fn invalid_signature(validator: impl Into<String>, signature: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSignature {
            validator: validator.into(),
            signature: signature.into(),
        })
    }

    /// Creates a validator fault error.
    #[must_use]
    pub fn validator_fault(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidatorFault {
            validator: validator.into(),
            message: message.into(),
        })
    }

    /// Returns true if this error was raised while building a descriptor.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        !matches!(self.kind, ErrorKind::ValidatorFault { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No built-in validator exists for the type and arbitrary types are
    /// not allowed.
    #[error("no validator found for {0}, see `arbitrary_types_allowed` in Config")]
    UnresolvedType(String),

    /// A validator's declared parameters match none of the accepted forms.
    #[error(
        "invalid signature for validator {validator}: {signature}, should be: \
         (value) or (value, *, values, config, field) or for owner validators \
         (owner, value) or (owner, value, *, values, config, field)"
    )]
    InvalidSignature {
        /// The validator name.
        validator: String,
        /// The declared parameter list.
        signature: String,
    },

    /// Neither a type nor a default was declared for a field.
    #[error("unable to infer type for attribute \"{0}\"")]
    UninferableType(String),

    /// A tuple type was declared with no positions.
    #[error("tuple type for \"{0}\" must declare at least one position")]
    InvalidArity(String),

    /// Type nesting exceeded the configured maximum depth.
    #[error("type nesting deeper than {limit} levels")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A string pattern does not compile.
    #[error("invalid regex \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A validator failed outside the value-error vocabulary.
    #[error("validator {validator} failed: {message}")]
    ValidatorFault {
        /// The validator name.
        validator: String,
        /// Fault message.
        message: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Enclosing fields, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in ")?;
        for (i, frame) in self.stack.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}
