//! Pipeline composition.
//!
//! A descriptor without sub-fields validates each element through
//!
//! 1. per-element pre validators, in declaration order
//! 2. the built-in chain for its base type
//! 3. per-element post validators, in declaration order
//!
//! Whole-value validators are kept apart and run on the undissected value.

use std::sync::Arc;

use sieve_foundation::{Result, Type};

use crate::builtins::{NOT_NONE, find_validators};
use crate::config::Config;
use crate::decl::ClassValidator;
use crate::signature::{Convention, Validator};

/// A validator paired with the convention it is invoked with.
#[derive(Clone, Debug)]
pub struct Step {
    convention: Convention,
    validator: Arc<Validator>,
}

impl Step {
    /// Classifies a validator into a step.
    ///
    /// # Errors
    ///
    /// Returns [`sieve_foundation::ErrorKind::InvalidSignature`] if the
    /// validator cannot be classified.
    pub fn new(validator: Arc<Validator>) -> Result<Self> {
        let convention = validator.convention()?;
        Ok(Self {
            convention,
            validator,
        })
    }

    /// Returns the convention.
    #[must_use]
    pub const fn convention(&self) -> Convention {
        self.convention
    }

    /// Returns the validator.
    #[must_use]
    pub const fn validator(&self) -> &Arc<Validator> {
        &self.validator
    }

    /// Returns the validator name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.validator.name()
    }
}

/// The composed validator lists of one descriptor.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    validators: Vec<Step>,
    whole_pre: Vec<Step>,
    whole_post: Vec<Step>,
}

impl Pipeline {
    /// Returns the per-element steps. Empty when the descriptor has
    /// sub-fields.
    #[must_use]
    pub fn validators(&self) -> &[Step] {
        &self.validators
    }

    /// Returns the steps run before dissecting the value.
    #[must_use]
    pub fn whole_pre(&self) -> &[Step] {
        &self.whole_pre
    }

    /// Returns the steps run on the assembled result.
    #[must_use]
    pub fn whole_post(&self) -> &[Step] {
        &self.whole_post
    }

    /// Returns the per-element step names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(Step::name)
    }
}

/// Builds the pipeline for a resolved base type.
///
/// # Errors
///
/// Returns a configuration error if a validator cannot be classified, the
/// base type has no validators, or a string pattern does not compile.
pub fn build(
    ty: &Type,
    has_sub_fields: bool,
    nullable: bool,
    class_validators: &[ClassValidator],
    config: &Config,
) -> Result<Pipeline> {
    let mut pipeline = Pipeline::default();

    if !has_sub_fields {
        let pre = class_validators
            .iter()
            .filter(|v| !v.whole && v.pre)
            .map(|v| Arc::clone(&v.validator));
        let post = class_validators
            .iter()
            .filter(|v| !v.whole && !v.pre)
            .map(|v| Arc::clone(&v.validator));
        let builtin = find_validators(ty, config)?;
        pipeline.validators = prepare(pre.chain(builtin).chain(post), nullable)?;
    }

    pipeline.whole_pre = prepare(
        class_validators
            .iter()
            .filter(|v| v.whole && v.pre)
            .map(|v| Arc::clone(&v.validator)),
        nullable,
    )?;
    pipeline.whole_post = prepare(
        class_validators
            .iter()
            .filter(|v| v.whole && !v.pre)
            .map(|v| Arc::clone(&v.validator)),
        nullable,
    )?;

    Ok(pipeline)
}

fn prepare(
    validators: impl IntoIterator<Item = Arc<Validator>>,
    nullable: bool,
) -> Result<Vec<Step>> {
    validators
        .into_iter()
        .filter(|v| !(nullable && Arc::ptr_eq(v, &NOT_NONE)))
        .map(Step::new)
        .collect()
}
