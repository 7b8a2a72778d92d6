//! # schemacast-streaming
//!
//! Incremental partial coercion of streaming model output.
//!
//! While a response is still arriving, callers want to render what has
//! resolved so far. This crate re-runs extraction and lenient coercion on
//! every growth of the text buffer and emits *partial* typed values:
//! unresolved fields are null, and a field that has resolved to a
//! non-null value never regresses to null in a later emission. It may
//! only be kept or refined, the way a string field is replaced by a
//! longer prefix of itself.
//!
//! When the source signals completion, the strict coercer runs once over
//! the full buffer; that final result is authoritative and may fail where
//! the partial snapshots degraded.
//!
//! Two surfaces:
//!
//! - [`PartialCoercer`]: push chunks by hand, read snapshots, finalize.
//! - [`CoercedStream`] / [`CoerceStreamExt`]: wrap any
//!   `Stream<Item = String>` into a stream of [`CoercionEvent`]s.
//!
//! ## Example
//!
//! ```rust
//! use schemacast_coerce::CoercionEnv;
//! use schemacast_schema::{FieldSchema, ObjectSchema, SchemaType};
//! use schemacast_streaming::PartialCoercer;
//!
//! let target = SchemaType::object(
//!     ObjectSchema::new("Answer")
//!         .with_field("answer", FieldSchema::new(SchemaType::string())),
//! );
//!
//! let mut partial = PartialCoercer::new(CoercionEnv::default(), target);
//! let snapshot = partial.push(r#"{"answer": "par"#)?;
//! assert_eq!(snapshot.to_json(), serde_json::json!({"answer": "par"}));
//!
//! partial.push(r#"tial"}"#)?;
//! let final_value = partial.finalize()?;
//! assert_eq!(final_value.to_json(), serde_json::json!({"answer": "partial"}));
//! # Ok::<(), schemacast_core::CoercionError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod merge;
pub mod partial;
pub mod stream;

// Re-exports
pub use merge::merge_partial;
pub use partial::PartialCoercer;
pub use stream::{CoerceStreamExt, CoercedStream, CoercionEvent};
