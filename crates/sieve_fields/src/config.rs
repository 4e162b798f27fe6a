//! Configuration shared by every descriptor of a schema.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default bound on type nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Schema-wide configuration consumed by descriptors.
///
/// Read-only once descriptors are built; shared through an `Arc`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Accept types with no built-in validator, passing values through.
    pub arbitrary_types_allowed: bool,

    /// Strip surrounding whitespace from every string.
    pub anystr_strip_whitespace: bool,

    /// Minimum length of every string.
    pub min_anystr_length: Option<usize>,

    /// Maximum length of every string.
    pub max_anystr_length: Option<usize>,

    /// Maximum type nesting depth.
    pub max_depth: usize,

    /// Per-field alias and description overrides, keyed by field name.
    pub fields: HashMap<String, FieldOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arbitrary_types_allowed: false,
            anystr_strip_whitespace: false,
            min_anystr_length: None,
            max_anystr_length: None,
            max_depth: DEFAULT_MAX_DEPTH,
            fields: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates a configuration that rejects unknown types and normalizes
    /// strings.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            anystr_strip_whitespace: true,
            ..Self::default()
        }
    }

    /// Creates a configuration that passes unknown types through.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            arbitrary_types_allowed: true,
            ..Self::default()
        }
    }

    /// Builder method to allow arbitrary types.
    #[must_use]
    pub fn with_arbitrary_types(mut self, allowed: bool) -> Self {
        self.arbitrary_types_allowed = allowed;
        self
    }

    /// Builder method to strip whitespace from strings.
    #[must_use]
    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.anystr_strip_whitespace = strip;
        self
    }

    /// Builder method to set string length limits.
    #[must_use]
    pub fn with_anystr_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_anystr_length = min;
        self.max_anystr_length = max;
        self
    }

    /// Builder method to set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to add a field override.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: FieldOverride) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Returns the override declared for a field, if any.
    #[must_use]
    pub fn field_override(&self, name: &str) -> Option<&FieldOverride> {
        self.fields.get(name)
    }
}

/// Alias and description declared for a field outside its definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldOverride {
    /// External name of the field.
    pub alias: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl FieldOverride {
    /// Creates an override with an alias.
    #[must_use]
    pub fn alias(alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            description: None,
        }
    }

    /// Builder method to set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
