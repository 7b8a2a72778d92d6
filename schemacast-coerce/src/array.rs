//! Array coercion.

use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue};
use schemacast_schema::SchemaType;

use crate::coercer::{Coercer, Scope};

/// Coerce a raw sequence to an array of the item type.
///
/// Items coerce independently; one failing item fails the whole array
/// unless the item type is optional, which degrades that index to null
/// without dropping it. A non-sequence raw value that itself coerces to
/// the item type is wrapped into a one-element array; models answer
/// "give me a list" with a bare value often enough to warrant it.
pub(crate) fn coerce<'a>(
    coercer: &'a Coercer,
    raw: &RawValue,
    item: &'a SchemaType,
    scope: &mut Scope<'a>,
) -> CoercionResult<TypedValue> {
    match raw {
        RawValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item_raw) in items.iter().enumerate() {
                scope.push_index(index);
                let result = coercer.coerce_child(item_raw, item, scope);
                scope.pop();
                out.push(result?);
            }
            Ok(TypedValue::Array(out))
        }
        RawValue::Null => Err(CoercionError::type_mismatch(
            scope.path().clone(),
            "array",
            raw,
        )),
        singular => {
            scope.push_index(0);
            let attempt = coercer.coerce_value(singular, item, scope);
            scope.pop();
            match attempt {
                Ok(value) => {
                    tracing::trace!(path = %scope.path(), "wrapped singular value into array");
                    Ok(TypedValue::Array(vec![value]))
                }
                Err(err) if err.is_configuration_error() => Err(err),
                Err(_) => Err(CoercionError::type_mismatch(
                    scope.path().clone(),
                    "array",
                    raw,
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::CoercionEnv;
    use pretty_assertions::assert_eq;

    fn coerce_raw(raw: serde_json::Value, item: SchemaType) -> CoercionResult<TypedValue> {
        Coercer::new(CoercionEnv::default())
            .coerce(&RawValue::from(raw), &SchemaType::array(item))
    }

    #[test]
    fn test_items_coerce_independently() {
        let typed = coerce_raw(serde_json::json!([1, "2", 3.0]), SchemaType::integer()).unwrap();
        assert_eq!(
            typed,
            TypedValue::Array(vec![
                TypedValue::Int(1),
                TypedValue::Int(2),
                TypedValue::Int(3)
            ])
        );
    }

    #[test]
    fn test_failing_item_fails_the_array() {
        let err = coerce_raw(serde_json::json!([1, "nope"]), SchemaType::integer()).unwrap_err();
        let CoercionError::TypeMismatch { path, .. } = &err else {
            panic!("expected type mismatch, got {err}");
        };
        assert_eq!(path.to_string(), "root[1]");
    }

    #[test]
    fn test_optional_item_degrades_to_null_in_place() {
        let typed = coerce_raw(
            serde_json::json!([1, "nope", 3]),
            SchemaType::optional(SchemaType::integer()),
        )
        .unwrap();
        assert_eq!(
            typed,
            TypedValue::Array(vec![
                TypedValue::Int(1),
                TypedValue::Null,
                TypedValue::Int(3)
            ])
        );
    }

    #[test]
    fn test_singular_value_wraps() {
        let typed = coerce_raw(serde_json::json!(5), SchemaType::integer()).unwrap();
        assert_eq!(typed, TypedValue::Array(vec![TypedValue::Int(5)]));
    }

    #[test]
    fn test_unwrappable_singular_fails_as_array_mismatch() {
        let err = coerce_raw(serde_json::json!("words"), SchemaType::integer()).unwrap_err();
        let CoercionError::TypeMismatch { expected, .. } = &err else {
            panic!("expected type mismatch, got {err}");
        };
        assert_eq!(expected, "array");
    }
}
