//! # schemacast-coerce
//!
//! The coercion engine: raw model output in, schema-typed values out.
//!
//! The entry points combine the payload extractor with the recursive
//! [`Coercer`]:
//!
//! - [`coerce_text`]: strict coercion of a complete response
//! - [`coerce_raw`]: strict coercion of an already-extracted value
//! - [`coerce_partial_text`]: lenient coercion of a still-growing
//!   buffer, used by the streaming layer
//!
//! Coercion is pure computation: no I/O, no blocking, no shared mutable
//! state. The sealed [`CoercionEnv`] may be shared across any number of
//! concurrent calls.
//!
//! ## Example
//!
//! ```rust
//! use schemacast_coerce::{coerce_text, CoercionEnv};
//! use schemacast_schema::{FieldSchema, ObjectSchema, SchemaType};
//!
//! let target = SchemaType::object(
//!     ObjectSchema::new("Point")
//!         .with_field("x", FieldSchema::new(SchemaType::integer()))
//!         .with_field("y", FieldSchema::new(SchemaType::integer())),
//! );
//!
//! let env = CoercionEnv::default();
//! let typed = coerce_text(&env, r#"Here you go: {"x": 1, "y": 2} and that's it."#, &target)?;
//! assert_eq!(typed.to_json(), serde_json::json!({"x": 1, "y": 2}));
//! # Ok::<(), schemacast_core::CoercionError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod array;
mod coercer;
mod enums;
mod env;
mod object;
mod primitive;
mod union;

use std::collections::HashSet;

use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue};
use schemacast_extract::{extract_partial_payload, extract_payload, scalar_payload};
use schemacast_schema::SchemaType;

pub use coercer::{Coercer, CoercionMode};
pub use env::CoercionEnv;

/// Strict coercion of an already-extracted raw value.
///
/// # Errors
///
/// Returns a [`CoercionError`] localized to the failing path.
pub fn coerce_raw(
    env: &CoercionEnv,
    raw: &RawValue,
    target: &SchemaType,
) -> CoercionResult<TypedValue> {
    Coercer::new(env.clone()).coerce(raw, target)
}

/// Strict coercion of a complete model response.
///
/// Runs payload extraction first. When nothing structured parses and the
/// target's root is a primitive or enum, the trimmed whole text is
/// treated as the answer; when the target is optional, the result is
/// null; otherwise the call fails with
/// [`CoercionError::NoPayloadFound`].
///
/// # Errors
///
/// Returns a [`CoercionError`] localized to the failing path.
pub fn coerce_text(
    env: &CoercionEnv,
    text: &str,
    target: &SchemaType,
) -> CoercionResult<TypedValue> {
    tracing::debug!(bytes = text.len(), target_type = %target, "coercing response text");
    if let Some(raw) = extract_payload(text) {
        return coerce_raw(env, &raw, target);
    }
    let shape = root_shape(env, target)?;
    if shape.scalar {
        return coerce_raw(env, &scalar_payload(text), target);
    }
    if shape.optional {
        return Ok(TypedValue::Null);
    }
    Err(CoercionError::NoPayloadFound)
}

/// Lenient coercion of a still-growing buffer.
///
/// The partial extractor tolerates the truncated tail and the lenient
/// coercer degrades unresolved fields to null, so the result is always a
/// value, possibly `Null` when nothing is resolvable yet.
///
/// # Errors
///
/// Only configuration errors ([`CoercionError::UnknownType`]) surface;
/// incomplete or malformed model output never fails here.
pub fn coerce_partial_text(
    env: &CoercionEnv,
    text: &str,
    target: &SchemaType,
) -> CoercionResult<TypedValue> {
    let coercer = Coercer::lenient(env.clone());
    if let Some(raw) = extract_partial_payload(text) {
        return coercer.coerce(&raw, target);
    }
    let shape = root_shape(env, target)?;
    if shape.scalar {
        return coercer.coerce(&scalar_payload(text), target);
    }
    Ok(TypedValue::Null)
}

struct RootShape {
    scalar: bool,
    optional: bool,
}

/// What the target's root accepts when no structured payload parses.
fn root_shape(env: &CoercionEnv, target: &SchemaType) -> CoercionResult<RootShape> {
    let mut seen = HashSet::new();
    analyze_root(env, target, &mut seen)
}

fn analyze_root(
    env: &CoercionEnv,
    target: &SchemaType,
    seen: &mut HashSet<String>,
) -> CoercionResult<RootShape> {
    Ok(match target {
        SchemaType::Primitive(_) | SchemaType::Enum(_) => RootShape {
            scalar: true,
            optional: false,
        },
        SchemaType::Object(_) | SchemaType::Array(_) => RootShape {
            scalar: false,
            optional: false,
        },
        SchemaType::Optional(inner) => {
            let inner = analyze_root(env, inner, seen)?;
            RootShape {
                scalar: inner.scalar,
                optional: true,
            }
        }
        SchemaType::Union(arms) => {
            let mut shape = RootShape {
                scalar: false,
                optional: false,
            };
            for arm in arms {
                let arm_shape = analyze_root(env, arm, seen)?;
                shape.scalar |= arm_shape.scalar;
                shape.optional |= arm_shape.optional;
            }
            shape
        }
        SchemaType::Reference(name) => {
            if !seen.insert(name.clone()) {
                RootShape {
                    scalar: false,
                    optional: false,
                }
            } else {
                let resolved = env.registry().resolve(name)?;
                analyze_root(env, resolved, seen)?
            }
        }
    })
}
