//! Primitive coercion rules.

use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue, ValuePath};
use schemacast_schema::PrimitiveKind;

/// Coerce a raw value to a primitive kind.
///
/// Exact matches pass through; the remaining rules cover the small lies
/// models tell: numbers and booleans as strings, integers where floats
/// were declared, thousands separators inside numerals.
pub(crate) fn coerce(
    raw: &RawValue,
    kind: PrimitiveKind,
    path: &ValuePath,
) -> CoercionResult<TypedValue> {
    match kind {
        PrimitiveKind::String => coerce_string(raw, path),
        PrimitiveKind::Integer => coerce_integer(raw, path),
        PrimitiveKind::Float => coerce_float(raw, path),
        PrimitiveKind::Boolean => coerce_boolean(raw, path),
    }
}

fn coerce_string(raw: &RawValue, path: &ValuePath) -> CoercionResult<TypedValue> {
    match raw {
        RawValue::String(s) => Ok(TypedValue::String(s.clone())),
        RawValue::Int(i) => Ok(TypedValue::String(i.to_string())),
        RawValue::Float(f) => Ok(TypedValue::String(f.to_string())),
        RawValue::Bool(b) => Ok(TypedValue::String(b.to_string())),
        other => Err(CoercionError::type_mismatch(path.clone(), "string", other)),
    }
}

fn coerce_integer(raw: &RawValue, path: &ValuePath) -> CoercionResult<TypedValue> {
    match raw {
        RawValue::Int(i) => Ok(TypedValue::Int(*i)),
        RawValue::Float(f) => float_to_int(*f)
            .map(TypedValue::Int)
            .ok_or_else(|| CoercionError::type_mismatch(path.clone(), "integer", raw)),
        RawValue::String(s) => parse_number(s)
            .and_then(|parsed| match parsed {
                Parsed::Int(i) => Some(i),
                Parsed::Float(f) => float_to_int(f),
            })
            .map(TypedValue::Int)
            .ok_or_else(|| CoercionError::type_mismatch(path.clone(), "integer", raw)),
        other => Err(CoercionError::type_mismatch(path.clone(), "integer", other)),
    }
}

fn coerce_float(raw: &RawValue, path: &ValuePath) -> CoercionResult<TypedValue> {
    match raw {
        RawValue::Float(f) => Ok(TypedValue::Float(*f)),
        RawValue::Int(i) => Ok(TypedValue::Float(*i as f64)),
        RawValue::String(s) => parse_number(s)
            .map(|parsed| match parsed {
                Parsed::Int(i) => TypedValue::Float(i as f64),
                Parsed::Float(f) => TypedValue::Float(f),
            })
            .ok_or_else(|| CoercionError::type_mismatch(path.clone(), "float", raw)),
        other => Err(CoercionError::type_mismatch(path.clone(), "float", other)),
    }
}

fn coerce_boolean(raw: &RawValue, path: &ValuePath) -> CoercionResult<TypedValue> {
    match raw {
        RawValue::Bool(b) => Ok(TypedValue::Bool(*b)),
        RawValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(TypedValue::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(TypedValue::Bool(false))
            } else {
                Err(CoercionError::type_mismatch(path.clone(), "boolean", raw))
            }
        }
        other => Err(CoercionError::type_mismatch(path.clone(), "boolean", other)),
    }
}

enum Parsed {
    Int(i64),
    Float(f64),
}

/// Parse a numeric string, tolerating surrounding whitespace and
/// thousands separators.
fn parse_number(s: &str) -> Option<Parsed> {
    let mut cleaned = s.trim().to_string();
    if cleaned.contains(',') {
        cleaned = cleaned.replace(',', "");
    }
    if let Ok(i) = cleaned.parse::<i64>() {
        return Some(Parsed::Int(i));
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(Parsed::Float(f)),
        _ => None,
    }
}

/// Integral floats convert losslessly; anything else is refused.
fn float_to_int(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
