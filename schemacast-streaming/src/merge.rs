//! The monotonic merge between successive partial emissions.

use schemacast_core::TypedValue;

/// Merge a freshly computed partial value over the previous emission.
///
/// The invariant this enforces: once a field or element has resolved to a
/// non-null value, a later emission for the same logical instance may
/// keep or refine it but never regress it to null. The fresh value wins
/// everywhere it is non-null; where it is null, the previous resolution
/// is kept.
pub fn merge_partial(previous: &TypedValue, fresh: TypedValue) -> TypedValue {
    match (previous, fresh) {
        (_, TypedValue::Null) => previous.clone(),
        (
            TypedValue::Object {
                fields: previous_fields,
                ..
            },
            TypedValue::Object { class_name, mut fields },
        ) => {
            for (name, previous_value) in previous_fields {
                match fields.get_mut(name) {
                    Some(fresh_value) => {
                        let merged =
                            merge_partial(previous_value, std::mem::replace(fresh_value, TypedValue::Null));
                        *fresh_value = merged;
                    }
                    None => {
                        fields.insert(name.clone(), previous_value.clone());
                    }
                }
            }
            TypedValue::Object { class_name, fields }
        }
        (TypedValue::Array(previous_items), TypedValue::Array(mut items)) => {
            for (index, item) in items.iter_mut().enumerate() {
                if let Some(previous_item) = previous_items.get(index) {
                    let merged =
                        merge_partial(previous_item, std::mem::replace(item, TypedValue::Null));
                    *item = merged;
                }
            }
            // A shorter fresh pass never drops elements already seen.
            if previous_items.len() > items.len() {
                items.extend(previous_items[items.len()..].iter().cloned());
            }
            TypedValue::Array(items)
        }
        (_, fresh) => fresh,
    }
}
