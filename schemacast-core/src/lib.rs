//! # schemacast-core
//!
//! Value trees, paths, and error types for the schemacast coercion engine.
//!
//! This crate holds the types every other schemacast crate speaks:
//!
//! - **[`RawValue`]**: the untyped tree a payload extractor produces
//! - **[`TypedValue`]**: the schema-conformant tree coercion produces
//! - **[`ValuePath`]**: a path into a value tree, for localized diagnostics
//! - **[`CoercionError`]**: the closed failure taxonomy of the engine
//!
//! ## Example
//!
//! ```rust
//! use schemacast_core::{CoercionError, RawValue, ValuePath};
//!
//! let raw = RawValue::from(serde_json::json!({"answer": 42}));
//! assert_eq!(raw.as_object().unwrap()["answer"], RawValue::Int(42));
//!
//! let err = CoercionError::missing_field(ValuePath::root().with_field("user"), "name");
//! assert_eq!(err.to_string(), "missing required field `name` at root.user");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod path;
pub mod raw;
pub mod typed;

// Re-exports
pub use error::{CoercionError, CoercionResult};
pub use path::{PathSegment, ValuePath};
pub use raw::RawValue;
pub use typed::TypedValue;
