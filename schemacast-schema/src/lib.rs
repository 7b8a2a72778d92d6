//! # schemacast-schema
//!
//! Schema types, registry, and alias tables for the schemacast coercion
//! engine.
//!
//! A coercion target is a [`SchemaType`]: a closed variant set of
//! primitives, enums, objects, arrays, unions, optionals, and references.
//! Named types live in a [`SchemaRegistry`], sealed once at compile time;
//! observed-text vocabularies live in an [`AliasMap`] alongside it. Both
//! are read-only for the lifetime of a coercion session and may be shared
//! across threads freely.
//!
//! ## Example
//!
//! ```rust
//! use schemacast_schema::{
//!     AliasMap, FieldSchema, ObjectSchema, SchemaRegistryBuilder, SchemaType,
//! };
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
//! let registry = builder.build();
//!
//! let mut aliases = AliasMap::new();
//! aliases.add_alias("Answer", "REASONING", "reasoning");
//!
//! assert!(registry.contains("Answer"));
//! # Ok::<(), schemacast_schema::SchemaError>(())
//! ```
//!
//! Production deployments usually skip the builder and load the compiled
//! document an external compiler emitted; see [`load_document`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod alias;
pub mod document;
pub mod error;
pub mod registry;
pub mod types;

// Re-exports
pub use alias::{AliasMap, AliasTable};
pub use document::{load_document, CompiledDocument, FieldDef, TypeDef};
pub use error::SchemaError;
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use types::{EnumSchema, FieldSchema, ObjectSchema, PrimitiveKind, SchemaType};
