//! Shape resolution: decomposing a declared type into a descriptor tree.

use std::fmt;

use sieve_foundation::{Error, ErrorKind, Result, Type};

use crate::descriptor::{Blueprint, Descriptor};

/// How a descriptor's value is dissected before its elements are validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// One value; with two or more sub-fields, one of several alternatives.
    Singleton,
    /// Variable-length homogeneous sequence.
    List,
    /// Deduplicated homogeneous collection.
    Set,
    /// Key/value entries; the descriptor's own type is the value type.
    Mapping,
    /// Fixed-arity positional sequence.
    Tuple,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Singleton => "singleton",
            Self::List => "list",
            Self::Set => "set",
            Self::Mapping => "mapping",
            Self::Tuple => "tuple",
        };
        write!(f, "{name}")
    }
}

/// Result of resolving a blueprint's type.
#[derive(Debug)]
pub(crate) struct Resolution {
    /// Base element type once containers are unwrapped.
    pub ty: Type,
    pub shape: Shape,
    pub sub_fields: Vec<Descriptor>,
    pub key_field: Option<Box<Descriptor>>,
    pub required: bool,
    pub nullable: bool,
    pub parse_json: bool,
}

/// Resolves the blueprint's type into a shape and owned sub-descriptors.
///
/// `Json` and single-alternative unions are unwrapped in place; every other
/// composite type produces sub-descriptors one level deeper.
pub(crate) fn resolve(bp: &Blueprint) -> Result<Resolution> {
    let mut res = Resolution {
        ty: bp.ty.clone(),
        shape: Shape::Singleton,
        sub_fields: Vec::new(),
        key_field: None,
        required: bp.required,
        nullable: bp.nullable,
        parse_json: false,
    };

    loop {
        let ty = std::mem::replace(&mut res.ty, Type::Any);
        match ty {
            Type::Json(inner) => {
                res.parse_json = true;
                res.ty = *inner;
            }
            Type::Optional(inner) => {
                res.ty = Type::Union(vec![*inner, Type::None]);
            }
            Type::Union(alternatives) => {
                let mut remaining = Vec::with_capacity(alternatives.len());
                for alternative in alternatives {
                    if alternative == Type::None {
                        res.nullable = true;
                        res.required = false;
                    } else {
                        remaining.push(alternative);
                    }
                }
                if remaining.len() < 2 {
                    res.ty = remaining.pop().unwrap_or(Type::None);
                    continue;
                }
                let mut sub_fields = Vec::with_capacity(remaining.len());
                for alternative in &remaining {
                    let name = format!("{}_{alternative}", bp.name);
                    sub_fields.push(sub_field(bp, &res, alternative.clone(), name)?);
                }
                res.sub_fields = sub_fields;
                res.ty = Type::Union(remaining);
                return Ok(res);
            }
            Type::Tuple(positions) => {
                if positions.is_empty() {
                    return Err(Error::new(ErrorKind::InvalidArity(bp.name.to_string())));
                }
                let mut sub_fields = Vec::with_capacity(positions.len());
                for (i, position) in positions.iter().enumerate() {
                    let name = format!("{}_{i}", bp.name);
                    sub_fields.push(sub_field(bp, &res, position.clone(), name)?);
                }
                res.shape = Shape::Tuple;
                res.sub_fields = sub_fields;
                res.ty = Type::Tuple(positions);
                return Ok(res);
            }
            Type::List(element) => {
                res.shape = Shape::List;
                return nest(bp, res, *element);
            }
            Type::Set(element) => {
                res.shape = Shape::Set;
                return nest(bp, res, *element);
            }
            Type::Map(key, value) => {
                let key_name = format!("key_{}", bp.name);
                res.key_field = Some(Box::new(sub_field(bp, &res, *key, key_name)?));
                res.shape = Shape::Mapping;
                return nest(bp, res, *value);
            }
            other => {
                res.ty = other;
                return Ok(res);
            }
        }
    }
}

/// Makes `element` the base type, recursing through one sub-field if it is
/// itself composite.
fn nest(bp: &Blueprint, mut res: Resolution, element: Type) -> Result<Resolution> {
    if element.is_composite() {
        let name = format!("_{}", bp.name);
        res.sub_fields = vec![sub_field(bp, &res, element.clone(), name)?];
    }
    res.ty = element;
    Ok(res)
}

fn sub_field(bp: &Blueprint, res: &Resolution, ty: Type, name: String) -> Result<Descriptor> {
    Descriptor::from_blueprint(bp.child(name, ty, res.required, res.nullable))
}
