//! The closed set of schema types the coercer understands.

use indexmap::IndexMap;
use schemacast_core::RawValue;
use std::fmt;

/// The primitive kinds a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Boolean.
    Boolean,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        };
        write!(f, "{name}")
    }
}

/// A named enum type with its legal constants in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// The enum's name, also the key for its alias table.
    pub name: String,
    /// Legal constants, declaration order preserved.
    pub variants: Vec<String>,
}

impl EnumSchema {
    /// Create an enum schema from its name and constants.
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single declared field of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// The field's type.
    pub ty: SchemaType,
    /// Whether the field must resolve for coercion to succeed.
    pub required: bool,
    /// Raw value used when the field is absent from the payload.
    pub default: Option<RawValue>,
}

impl FieldSchema {
    /// A required field with no default.
    #[must_use]
    pub fn new(ty: SchemaType) -> Self {
        Self {
            ty,
            required: true,
            default: None,
        }
    }

    /// An optional field: absence coerces to null instead of failing.
    #[must_use]
    pub fn optional(ty: SchemaType) -> Self {
        Self {
            ty,
            required: false,
            default: None,
        }
    }

    /// Attach a default used when the field is absent.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<RawValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A named object type with its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// The object's name, also the key for its alias table.
    pub name: String,
    fields: IndexMap<String, FieldSchema>,
}

impl ObjectSchema {
    /// Create an empty object schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Declare a field.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same name is already declared; duplicate
    /// field names are forbidden by the data model.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        let name = name.into();
        if self.fields.contains_key(&name) {
            panic!("field '{}' is already declared on '{}'", name, self.name);
        }
        self.fields.insert(name, field);
        self
    }

    /// The declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, FieldSchema> {
        &self.fields
    }
}

/// A schema type the coercer can target.
///
/// This is a closed variant set; recursive shapes are expressed through
/// [`SchemaType::Reference`] and resolved against the registry at coercion
/// time.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// A named enum.
    Enum(EnumSchema),
    /// A named object.
    Object(ObjectSchema),
    /// An array of a single item type.
    Array(Box<SchemaType>),
    /// A union of arms tried in declaration order.
    Union(Vec<SchemaType>),
    /// A type whose absence or failure coerces to null.
    Optional(Box<SchemaType>),
    /// A reference to a named type in the registry.
    Reference(String),
}

impl SchemaType {
    /// Shorthand for `Primitive(PrimitiveKind::String)`.
    #[must_use]
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    /// Shorthand for `Primitive(PrimitiveKind::Integer)`.
    #[must_use]
    pub fn integer() -> Self {
        Self::Primitive(PrimitiveKind::Integer)
    }

    /// Shorthand for `Primitive(PrimitiveKind::Float)`.
    #[must_use]
    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    /// Shorthand for `Primitive(PrimitiveKind::Boolean)`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    /// Wrap a schema type into an enum variant.
    #[must_use]
    pub fn r#enum(schema: EnumSchema) -> Self {
        Self::Enum(schema)
    }

    /// Wrap an object schema.
    #[must_use]
    pub fn object(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }

    /// An array of `item`.
    #[must_use]
    pub fn array(item: SchemaType) -> Self {
        Self::Array(Box::new(item))
    }

    /// A union of the given arms, tried in order.
    #[must_use]
    pub fn union(arms: impl IntoIterator<Item = SchemaType>) -> Self {
        Self::Union(arms.into_iter().collect())
    }

    /// An optional wrapper around `inner`.
    #[must_use]
    pub fn optional(inner: SchemaType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// A reference to a registered type name.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Whether the outermost layer is `Optional`.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Enum(e) => write!(f, "enum {}", e.name),
            Self::Object(o) => write!(f, "object {}", o.name),
            Self::Array(item) => write!(f, "{item}[]"),
            Self::Union(arms) => {
                let rendered: Vec<String> = arms.iter().map(ToString::to_string).collect();
                write!(f, "({})", rendered.join(" | "))
            }
            Self::Optional(inner) => write!(f, "{inner}?"),
            Self::Reference(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_object_fields_keep_declaration_order() {
        let schema = ObjectSchema::new("Person")
            .with_field("name", FieldSchema::new(SchemaType::string()))
            .with_field("age", FieldSchema::new(SchemaType::integer()));

        let names: Vec<&String> = schema.fields().keys().collect();
        assert_eq!(names, ["name", "age"]);
    }

    #[test]
    #[should_panic(expected = "already declared")]
    fn test_duplicate_field_panics() {
        let _ = ObjectSchema::new("Person")
            .with_field("name", FieldSchema::new(SchemaType::string()))
            .with_field("name", FieldSchema::new(SchemaType::string()));
    }

    #[test]
    fn test_display_renders_compound_types() {
        let ty = SchemaType::union([
            SchemaType::string(),
            SchemaType::optional(SchemaType::array(SchemaType::integer())),
        ]);
        assert_eq!(ty.to_string(), "(string | integer[]?)");
    }

    #[test]
    fn test_field_default_marks_value() {
        let field = FieldSchema::optional(SchemaType::integer())
            .with_default(schemacast_core::RawValue::Int(3));
        assert!(!field.required);
        assert_eq!(field.default, Some(schemacast_core::RawValue::Int(3)));
    }
}
