//! Object coercion: declared fields against an observed mapping.

use indexmap::IndexMap;
use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue};
use schemacast_schema::{AliasTable, ObjectSchema, SchemaType};

use crate::coercer::{Coercer, Scope};

/// Coerce a raw mapping to an object schema.
///
/// Each declared field is looked up by canonical name, then through the
/// object's alias table, then case-insensitively. Absent fields fall back
/// to the declared default, then to null when the field is optional.
/// Unknown raw keys are ignored: models add explanatory keys freely and
/// their presence is never an error.
pub(crate) fn coerce<'a>(
    coercer: &'a Coercer,
    raw: &RawValue,
    schema: &'a ObjectSchema,
    scope: &mut Scope<'a>,
) -> CoercionResult<TypedValue> {
    let Some(entries) = raw.as_object() else {
        return Err(CoercionError::type_mismatch(
            scope.path().clone(),
            format!("object {}", schema.name),
            raw,
        ));
    };
    let table = coercer.env().aliases().table(&schema.name);

    let mut fields = IndexMap::with_capacity(schema.fields().len());
    for (name, field) in schema.fields() {
        let value = match find_entry(entries, name, table) {
            Some(raw_field) => {
                scope.push_field(name);
                let result = coercer.coerce_child(raw_field, &field.ty, scope);
                scope.pop();
                result?
            }
            None => match &field.default {
                Some(default) => {
                    scope.push_field(name);
                    let result = coercer.coerce_child(default, &field.ty, scope);
                    scope.pop();
                    result?
                }
                None if !field.required || is_optional_type(coercer, &field.ty) => {
                    TypedValue::Null
                }
                None if coercer.is_lenient() => TypedValue::Null,
                None => {
                    return Err(CoercionError::missing_field(scope.path().clone(), name));
                }
            },
        };
        fields.insert(name.clone(), value);
    }

    Ok(TypedValue::Object {
        class_name: schema.name.clone(),
        fields,
    })
}

/// Whether a field type is optional, following reference chains.
fn is_optional_type(coercer: &Coercer, ty: &SchemaType) -> bool {
    let mut current = ty;
    let mut hops = 0;
    while let SchemaType::Reference(name) = current {
        hops += 1;
        if hops > 16 {
            return false;
        }
        match coercer.env().registry().resolve(name) {
            Ok(resolved) => current = resolved,
            Err(_) => return false,
        }
    }
    current.is_optional()
}

/// Locate the raw entry backing a declared field.
fn find_entry<'r>(
    entries: &'r IndexMap<String, RawValue>,
    name: &str,
    table: Option<&AliasTable>,
) -> Option<&'r RawValue> {
    if let Some(value) = entries.get(name) {
        return Some(value);
    }
    if let Some(table) = table {
        for alias in table.aliases_for(name) {
            if let Some(value) = entries.get(alias) {
                tracing::trace!(field = name, alias, "field resolved through alias");
                return Some(value);
            }
        }
    }
    entries
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::CoercionEnv;
    use pretty_assertions::assert_eq;
    use schemacast_core::ValuePath;
    use schemacast_schema::{
        AliasMap, FieldSchema, ObjectSchema, SchemaRegistry, SchemaType,
    };

    fn answer_schema() -> ObjectSchema {
        ObjectSchema::new("Answer")
            .with_field("prop1", FieldSchema::new(SchemaType::string()))
            .with_field("prop2", FieldSchema::new(SchemaType::string()))
    }

    fn aliased_env() -> CoercionEnv {
        let mut aliases = AliasMap::new();
        aliases.add_alias("Answer", "REASONING", "prop1");
        aliases.add_alias("Answer", "ANSWER", "prop2");
        CoercionEnv::new(SchemaRegistry::empty(), aliases)
    }

    fn coerce_raw(env: CoercionEnv, raw: serde_json::Value, schema: &ObjectSchema) -> CoercionResult<TypedValue> {
        Coercer::new(env).coerce(&RawValue::from(raw), &SchemaType::Object(schema.clone()))
    }

    #[test]
    fn test_aliased_keys_resolve_to_canonical_fields() {
        let typed = coerce_raw(
            aliased_env(),
            serde_json::json!({"REASONING": "x", "ANSWER": "y"}),
            &answer_schema(),
        )
        .unwrap();

        assert_eq!(typed.field("prop1"), Some(&TypedValue::String("x".into())));
        assert_eq!(typed.field("prop2"), Some(&TypedValue::String("y".into())));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let typed = coerce_raw(
            aliased_env(),
            serde_json::json!({"prop1": "x", "prop2": "y", "commentary": "extra"}),
            &answer_schema(),
        )
        .unwrap();
        assert_eq!(typed.to_json(), serde_json::json!({"prop1": "x", "prop2": "y"}));
    }

    #[test]
    fn test_case_insensitive_key_fallback() {
        let typed = coerce_raw(
            aliased_env(),
            serde_json::json!({"Prop1": "x", "PROP2": "y"}),
            &answer_schema(),
        )
        .unwrap();
        assert_eq!(typed.field("prop1"), Some(&TypedValue::String("x".into())));
    }

    #[test]
    fn test_missing_required_field_names_path() {
        let err = coerce_raw(
            aliased_env(),
            serde_json::json!({"prop1": "x"}),
            &answer_schema(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoercionError::missing_field(ValuePath::root(), "prop2")
        );
    }

    #[test]
    fn test_default_and_optional_fallbacks() {
        let schema = ObjectSchema::new("Config")
            .with_field(
                "retries",
                FieldSchema::new(SchemaType::integer()).with_default(RawValue::Int(3)),
            )
            .with_field("label", FieldSchema::optional(SchemaType::string()));

        let typed = coerce_raw(
            CoercionEnv::default(),
            serde_json::json!({}),
            &schema,
        )
        .unwrap();
        assert_eq!(typed.field("retries"), Some(&TypedValue::Int(3)));
        assert_eq!(typed.field("label"), Some(&TypedValue::Null));
    }

    #[test]
    fn test_non_mapping_raw_fails() {
        let err = coerce_raw(
            aliased_env(),
            serde_json::json!([1, 2]),
            &answer_schema(),
        )
        .unwrap_err();
        assert!(matches!(err, CoercionError::TypeMismatch { .. }));
    }
}
