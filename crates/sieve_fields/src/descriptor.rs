//! Field descriptors.
//!
//! A [`Descriptor`] is the fully resolved, immutable form of one declared
//! field: its shape, its owned sub-descriptors, and its composed pipeline.
//! Descriptors are built once, eagerly, and shared read-only.

use std::fmt;
use std::sync::Arc;

use sieve_foundation::{Constraints, Error, ErrorKind, Location, Result, Type, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::decl::{ClassValidator, FieldDecl};
use crate::pipeline::{self, Pipeline};
use crate::shape::{self, Shape};

/// Attributes a descriptor is built from. Sub-fields receive a copy with
/// their own name and type.
#[derive(Clone, Debug)]
pub(crate) struct Blueprint {
    pub name: Arc<str>,
    pub ty: Type,
    pub default: Option<Value>,
    pub required: bool,
    pub nullable: bool,
    pub validators: Vec<ClassValidator>,
    pub config: Arc<Config>,
    pub depth: usize,
}

impl Blueprint {
    /// Blueprint for a sub-field one level deeper. Whole-value validators
    /// stay with the parent.
    pub fn child(&self, name: String, ty: Type, required: bool, nullable: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            default: self.default.clone(),
            required,
            nullable,
            validators: self
                .validators
                .iter()
                .filter(|v| !v.whole)
                .cloned()
                .collect(),
            config: Arc::clone(&self.config),
            depth: self.depth + 1,
        }
    }
}

/// A resolved field.
pub struct Descriptor {
    name: Arc<str>,
    alias: Arc<str>,
    has_alias: bool,
    declared: Type,
    ty: Type,
    shape: Shape,
    sub_fields: Vec<Descriptor>,
    key_field: Option<Box<Descriptor>>,
    default: Option<Value>,
    required: bool,
    nullable: bool,
    validate_always: bool,
    parse_json: bool,
    description: Option<String>,
    class_validators: Vec<ClassValidator>,
    pipeline: Pipeline,
    config: Arc<Config>,
}

/// Builds a descriptor from its declared attributes.
///
/// The type is inferred from the default when absent. Constraints refine a
/// plain `Str`, `Int` or `Float` type.
///
/// # Errors
///
/// Returns a configuration error if the type cannot be inferred or
/// resolved, a validator signature is invalid, a pattern does not compile,
/// a tuple has no positions, or nesting exceeds `config.max_depth`.
pub fn build_descriptor(
    name: &str,
    ty: Option<Type>,
    default: Option<Value>,
    required: bool,
    validators: &[ClassValidator],
    config: Arc<Config>,
    constraints: &Constraints,
) -> Result<Descriptor> {
    let decl = FieldDecl {
        name: name.into(),
        ty,
        default,
        required,
        validators: validators.to_vec(),
        constraints: constraints.clone(),
        alias: None,
        description: None,
    };
    Descriptor::declare(decl, config)
}

impl Descriptor {
    pub(crate) fn declare(decl: FieldDecl, config: Arc<Config>) -> Result<Self> {
        let ty = match (decl.ty, &decl.default) {
            (Some(ty), _) => ty,
            (None, Some(default)) if !default.is_nil() => default.value_type(),
            (None, _) => {
                return Err(Error::new(ErrorKind::UninferableType(decl.name.to_string())));
            }
        };
        if decl.constraints.ignored_by(&ty) {
            warn!(
                field = %decl.name,
                ty = %ty,
                "constraints do not apply to the declared type and are ignored"
            );
        }
        let field_override = config.field_override(&decl.name);
        let alias = decl.alias.or_else(|| {
            field_override
                .and_then(|o| o.alias.as_deref())
                .map(Arc::from)
        });
        let description = decl
            .description
            .or_else(|| field_override.and_then(|o| o.description.clone()));

        let mut descriptor = Self::from_blueprint(Blueprint {
            name: decl.name,
            ty: ty.refine(&decl.constraints),
            default: decl.default,
            required: decl.required,
            nullable: false,
            validators: decl.validators,
            config,
            depth: 0,
        })?;
        if let Some(alias) = alias {
            descriptor.alias = alias;
            descriptor.has_alias = true;
        }
        descriptor.description = description;
        Ok(descriptor)
    }

    pub(crate) fn from_blueprint(bp: Blueprint) -> Result<Self> {
        let name = Arc::clone(&bp.name);
        Self::assemble(bp).map_err(|e| e.in_field(name.to_string()))
    }

    fn assemble(mut bp: Blueprint) -> Result<Self> {
        if bp.depth > bp.config.max_depth {
            return Err(Error::new(ErrorKind::DepthExceeded {
                limit: bp.config.max_depth,
            }));
        }

        let validate_always = bp.validators.iter().any(|v| v.always)
            || matches!(&bp.ty, Type::Custom(custom) if custom.validate_always());
        if !bp.required && !validate_always && bp.default.as_ref().is_none_or(Value::is_nil) {
            bp.nullable = true;
        }

        let resolved = shape::resolve(&bp)?;
        let pipeline = pipeline::build(
            &resolved.ty,
            !resolved.sub_fields.is_empty(),
            resolved.nullable,
            &bp.validators,
            &bp.config,
        )?;

        debug!(
            field = %bp.name,
            ty = %bp.ty,
            shape = %resolved.shape,
            nullable = resolved.nullable,
            sub_fields = resolved.sub_fields.len(),
            "descriptor built"
        );

        Ok(Self {
            alias: Arc::clone(&bp.name),
            name: bp.name,
            has_alias: false,
            declared: bp.ty,
            ty: resolved.ty,
            shape: resolved.shape,
            sub_fields: resolved.sub_fields,
            key_field: resolved.key_field,
            default: bp.default,
            required: resolved.required,
            nullable: resolved.nullable,
            validate_always,
            parse_json: resolved.parse_json,
            description: None,
            class_validators: bp.validators,
            pipeline,
            config: bp.config,
        })
    }

    /// Applies configuration that became available after the descriptor
    /// was built.
    ///
    /// The configuration's alias and description overrides for this field
    /// are used unless the field declared its own alias. Must be called
    /// before any validation.
    pub fn finalize_config(&mut self, config: Arc<Config>) {
        if let Some(field_override) = config.field_override(&self.name) {
            if !self.has_alias {
                if let Some(alias) = &field_override.alias {
                    self.alias = Arc::from(alias.as_str());
                    self.has_alias = true;
                }
            }
            if self.description.is_none() {
                self.description.clone_from(&field_override.description);
            }
        }
        self.set_config(&config);
    }

    fn set_config(&mut self, config: &Arc<Config>) {
        self.config = Arc::clone(config);
        for sub_field in &mut self.sub_fields {
            sub_field.set_config(config);
        }
        if let Some(key_field) = &mut self.key_field {
            key_field.set_config(config);
        }
    }

    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the external name.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns true if the external name was set explicitly or by config.
    #[must_use]
    pub const fn has_alias(&self) -> bool {
        self.has_alias
    }

    /// Returns true if the external name differs from the declared name.
    #[must_use]
    pub fn alt_alias(&self) -> bool {
        self.name != self.alias
    }

    /// Returns the location of this field in a record.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::root().child(Arc::clone(&self.alias))
    }

    /// Returns the type as declared, after refinement.
    #[must_use]
    pub const fn declared_type(&self) -> &Type {
        &self.declared
    }

    /// Returns the base element type.
    #[must_use]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the shape.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns true for a singleton with several alternatives.
    #[must_use]
    pub fn is_alternatives(&self) -> bool {
        self.shape == Shape::Singleton && self.sub_fields.len() >= 2
    }

    /// Returns the owned sub-descriptors.
    #[must_use]
    pub fn sub_fields(&self) -> &[Descriptor] {
        &self.sub_fields
    }

    /// Returns the key descriptor of a mapping.
    #[must_use]
    pub fn key_field(&self) -> Option<&Descriptor> {
        self.key_field.as_deref()
    }

    /// Returns the default value.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns true if a value must be supplied.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Returns true if null is accepted without validation.
    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    /// Returns true if the field must be validated even when absent.
    #[must_use]
    pub const fn validate_always(&self) -> bool {
        self.validate_always
    }

    /// Returns true if string input is decoded as JSON first.
    #[must_use]
    pub const fn parse_json(&self) -> bool {
        self.parse_json
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the validators registered for this field.
    #[must_use]
    pub fn class_validators(&self) -> &[ClassValidator] {
        &self.class_validators
    }

    /// Returns the composed pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("ty", &self.ty)
            .field("shape", &self.shape)
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("sub_fields", &self.sub_fields)
            .field("key_field", &self.key_field)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} type={}", self.name, self.declared)?;
        if self.required {
            write!(f, " required")?;
        } else {
            match &self.default {
                Some(default) => write!(f, " default={default:?}")?,
                None => write!(f, " default=None")?,
            }
        }
        if self.alt_alias() {
            write!(f, " alias={}", self.alias)?;
        }
        Ok(())
    }
}
