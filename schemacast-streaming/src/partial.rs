//! Incremental coercion over a growing text buffer.

use schemacast_coerce::{coerce_partial_text, coerce_raw, coerce_text, CoercionEnv};
use schemacast_core::{CoercionError, CoercionResult, TypedValue};
use schemacast_extract::extract_partial_payload;
use schemacast_schema::SchemaType;

use crate::merge::merge_partial;

/// Drives coercion over an append-only text buffer.
///
/// Each [`push`](PartialCoercer::push) re-runs extraction and lenient
/// coercion against the whole buffer and merges the result over the
/// previous emission, so snapshots only ever keep or refine resolved
/// fields. [`finalize`](PartialCoercer::finalize) runs the strict coercer
/// once over the complete buffer; that result is authoritative and may
/// fail where every partial snapshot degraded.
#[derive(Debug, Clone)]
pub struct PartialCoercer {
    env: CoercionEnv,
    target: SchemaType,
    buffer: String,
    current: TypedValue,
}

impl PartialCoercer {
    /// Create a coercer for one streaming response.
    #[must_use]
    pub fn new(env: CoercionEnv, target: SchemaType) -> Self {
        Self {
            env,
            target,
            buffer: String::new(),
            current: TypedValue::Null,
        }
    }

    /// Append a chunk and recompute the partial value.
    ///
    /// # Errors
    ///
    /// Only configuration errors surface; incomplete model output never
    /// fails a push.
    pub fn push(&mut self, chunk: &str) -> CoercionResult<&TypedValue> {
        self.buffer.push_str(chunk);
        let fresh = coerce_partial_text(&self.env, &self.buffer, &self.target)?;
        self.current = merge_partial(&self.current, fresh);
        tracing::trace!(
            buffer_bytes = self.buffer.len(),
            resolved = !self.current.is_null(),
            "partial snapshot"
        );
        Ok(&self.current)
    }

    /// The latest partial value.
    #[must_use]
    pub fn current(&self) -> &TypedValue {
        &self.current
    }

    /// The accumulated buffer.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Finish the stream: strict coercion of the full buffer.
    ///
    /// A stream that ended mid-payload still gets a precise diagnostic:
    /// the received prefix is coerced strictly, so a field that never
    /// arrived fails as a missing field rather than as a missing payload.
    ///
    /// # Errors
    ///
    /// Returns the strict coercer's failure, including required fields
    /// that never arrived.
    pub fn finalize(self) -> CoercionResult<TypedValue> {
        match coerce_text(&self.env, &self.buffer, &self.target) {
            Err(CoercionError::NoPayloadFound) => {
                match extract_partial_payload(&self.buffer) {
                    Some(raw) => coerce_raw(&self.env, &raw, &self.target),
                    None => Err(CoercionError::NoPayloadFound),
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemacast_schema::{AliasMap, FieldSchema, ObjectSchema, SchemaRegistry};

    fn answer_target() -> SchemaType {
        SchemaType::object(
            ObjectSchema::new("Answer")
                .with_field("reasoning", FieldSchema::new(SchemaType::string()))
                .with_field("answer", FieldSchema::new(SchemaType::string())),
        )
    }

    fn env() -> CoercionEnv {
        CoercionEnv::new(SchemaRegistry::empty(), AliasMap::new())
    }

    #[test]
    fn test_snapshots_grow_monotonically() {
        let mut partial = PartialCoercer::new(env(), answer_target());

        let first = partial.push(r#"{"reasoning": "because"#).unwrap().clone();
        assert_eq!(
            first.to_json(),
            serde_json::json!({"reasoning": "because", "answer": null})
        );

        let second = partial
            .push(r#" it is prime", "answer": "ye"#)
            .unwrap()
            .clone();
        assert_eq!(
            second.to_json(),
            serde_json::json!({"reasoning": "because it is prime", "answer": "ye"})
        );

        let third = partial.push(r#"s"}"#).unwrap().clone();
        assert_eq!(
            third.to_json(),
            serde_json::json!({"reasoning": "because it is prime", "answer": "yes"})
        );
    }

    #[test]
    fn test_resolved_field_never_regresses() {
        let mut partial = PartialCoercer::new(env(), answer_target());
        partial.push(r#"{"reasoning": "done", "answer": "x"}"#).unwrap();
        let before = partial.current().clone();

        // Further prose after the payload changes nothing resolved.
        let after = partial.push(" Hope that helps!").unwrap();
        assert_eq!(*after, before);
    }

    #[test]
    fn test_finalize_is_strict() {
        let mut partial = PartialCoercer::new(env(), answer_target());
        partial.push(r#"{"reasoning": "only this arrived"#).unwrap();

        // Partial snapshots degraded the missing field; the final pass
        // does not.
        let err = partial.finalize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required field `answer` at root"
        );
    }

    #[test]
    fn test_scalar_root_refines_as_prefix() {
        let mut partial = PartialCoercer::new(env(), SchemaType::string());
        assert_eq!(
            partial.push("Hel").unwrap(),
            &TypedValue::String("Hel".into())
        );
        assert_eq!(
            partial.push("lo").unwrap(),
            &TypedValue::String("Hello".into())
        );
        assert_eq!(partial.finalize().unwrap(), TypedValue::String("Hello".into()));
    }
}
