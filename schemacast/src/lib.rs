//! # schemacast
//!
//! Schema-driven coercion of language-model output into typed values.
//!
//! Models rarely emit byte-perfect structured output: the payload hides
//! in prose, keys come back renamed, enum constants arrive as full
//! descriptive labels, and mid-stream the text is simply incomplete.
//! schemacast takes that text plus a previously compiled schema and
//! produces either a value conforming to the schema or a precise,
//! localized failure: permissive about how the model phrased it, strict
//! about what callers receive.
//!
//! ## Core Concepts
//!
//! - **[`SchemaType`]**: the closed set of target types (primitives,
//!   enums, objects, arrays, unions, optionals, references)
//! - **[`SchemaRegistry`]** / **[`AliasMap`]**: the sealed tables an
//!   external compiler emits, loaded once per process
//! - **[`extract_payload`]**: locates the structured payload inside
//!   surrounding prose
//! - **[`coerce_text`]** / **[`Coercer`]**: converts the extracted raw
//!   value into a [`TypedValue`] or a [`CoercionError`] with a path
//! - **[`PartialCoercer`]** / **[`CoerceStreamExt`]**: partial results
//!   over a growing stream, monotonically refined, finalized strictly
//!
//! ## Example
//!
//! ```rust
//! use schemacast::prelude::*;
//!
//! let mut builder = SchemaRegistryBuilder::new();
//! builder.register(
//!     "Answer",
//!     SchemaType::object(
//!         ObjectSchema::new("Answer")
//!             .with_field("reasoning", FieldSchema::new(SchemaType::string()))
//!             .with_field("answer", FieldSchema::new(SchemaType::string())),
//!     ),
//! )?;
//!
//! let mut aliases = AliasMap::new();
//! aliases.add_alias("Answer", "REASONING", "reasoning");
//! aliases.add_alias("Answer", "ANSWER", "answer");
//!
//! let env = CoercionEnv::new(builder.build(), aliases);
//! let text = r#"Sure! {"REASONING": "7 is prime", "ANSWER": "yes"} Hope that helps."#;
//! let typed = coerce_text(&env, text, &SchemaType::reference("Answer"))?;
//! assert_eq!(
//!     typed.to_json(),
//!     serde_json::json!({"reasoning": "7 is prime", "answer": "yes"})
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-exports
pub use schemacast_core::{
    CoercionError, CoercionResult, PathSegment, RawValue, TypedValue, ValuePath,
};
pub use schemacast_schema::{
    load_document, AliasMap, AliasTable, CompiledDocument, EnumSchema, FieldSchema, ObjectSchema,
    PrimitiveKind, SchemaError, SchemaRegistry, SchemaRegistryBuilder, SchemaType,
};
pub use schemacast_extract::{extract_partial_payload, extract_payload, scalar_payload};
pub use schemacast_coerce::{
    coerce_partial_text, coerce_raw, coerce_text, Coercer, CoercionEnv, CoercionMode,
};
pub use schemacast_streaming::{
    merge_partial, CoerceStreamExt, CoercedStream, CoercionEvent, PartialCoercer,
};

/// Prelude for common imports.
///
/// ```rust
/// use schemacast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        coerce_partial_text, coerce_raw, coerce_text, extract_payload, load_document, AliasMap,
        CoerceStreamExt, Coercer, CoercionEnv, CoercionError, CoercionEvent, CoercionResult,
        EnumSchema, FieldSchema, ObjectSchema, PartialCoercer, PrimitiveKind, RawValue,
        SchemaError, SchemaRegistry, SchemaRegistryBuilder, SchemaType, TypedValue, ValuePath,
    };
}
