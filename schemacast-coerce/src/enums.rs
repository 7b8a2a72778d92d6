//! Enum coercion: matching observed text to canonical constants.

use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue, ValuePath};
use schemacast_schema::{AliasMap, EnumSchema};

/// Coerce a raw value to an enum constant.
///
/// Matching precedence, first hit wins:
///
/// 1. exact canonical constant (case-sensitive, trimmed)
/// 2. exact alias from the enum's table
/// 3. alias contained in the observed text, in registration order
/// 4. canonical constant contained in the observed text, in declaration
///    order
/// 5. case-insensitive canonical constant
///
/// Containment matching supports the common pattern where a model echoes
/// a whole descriptive label ("k1: User is angry") around the token it
/// was asked for. The precedence is fixed policy: same input and same
/// table always resolve to the same constant, independent of call order.
pub(crate) fn coerce(
    raw: &RawValue,
    schema: &EnumSchema,
    aliases: &AliasMap,
    path: &ValuePath,
) -> CoercionResult<TypedValue> {
    let rendered;
    let text = match raw {
        RawValue::String(s) => s.as_str(),
        RawValue::Int(_) | RawValue::Float(_) | RawValue::Bool(_) => {
            rendered = raw.to_string();
            rendered.as_str()
        }
        other => {
            return Err(CoercionError::type_mismatch(
                path.clone(),
                format!("enum {}", schema.name),
                other,
            ))
        }
    };
    let observed = text.trim();

    if let Some(variant) = schema.variants.iter().find(|v| *v == observed) {
        return Ok(resolved(schema, variant));
    }

    if let Some(table) = aliases.table(&schema.name) {
        if let Some(canonical) = table.lookup_exact(observed) {
            return Ok(resolved(schema, canonical));
        }
        if let Some(canonical) = table.lookup_contains(observed) {
            tracing::trace!(enum_name = %schema.name, canonical, "alias containment match");
            return Ok(resolved(schema, canonical));
        }
    }

    if let Some(variant) = schema
        .variants
        .iter()
        .find(|v| !v.is_empty() && observed.contains(v.as_str()))
    {
        tracing::trace!(enum_name = %schema.name, %variant, "constant containment match");
        return Ok(resolved(schema, variant));
    }

    if let Some(variant) = schema
        .variants
        .iter()
        .find(|v| v.eq_ignore_ascii_case(observed))
    {
        return Ok(resolved(schema, variant));
    }

    Err(CoercionError::enum_mismatch(
        path.clone(),
        schema.name.clone(),
        truncate(observed),
    ))
}

fn resolved(schema: &EnumSchema, variant: &str) -> TypedValue {
    TypedValue::Enum {
        enum_name: schema.name.clone(),
        variant: variant.to_string(),
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 80;
    if s.chars().count() <= MAX {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(MAX).collect();
        format!("{prefix}…")
    }
}
