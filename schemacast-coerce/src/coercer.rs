//! The recursive coercion driver.

use std::collections::HashMap;

use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue, ValuePath};
use schemacast_schema::{SchemaRegistry, SchemaType};

use crate::env::CoercionEnv;
use crate::{array, enums, object, primitive, union};

/// Upper bound on schema descent for one coercion call.
///
/// Legitimate recursive structures terminate because the raw tree is
/// finite; this bound catches reference cycles that never consume raw
/// input.
pub(crate) const MAX_DEPTH: usize = 128;

/// How failures below the root are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionMode {
    /// Failures surface as errors. The mode for final results.
    Strict,
    /// Field- and item-level failures degrade to null. The mode the
    /// streaming layer uses while the payload is still arriving.
    Lenient,
}

/// Per-call state: the current path, the recursion guard, and the memo of
/// resolved references.
pub(crate) struct Scope<'a> {
    path: ValuePath,
    depth: usize,
    resolved: HashMap<String, &'a SchemaType>,
}

impl<'a> Scope<'a> {
    fn new() -> Self {
        Self {
            path: ValuePath::root(),
            depth: 0,
            resolved: HashMap::new(),
        }
    }

    pub(crate) fn path(&self) -> &ValuePath {
        &self.path
    }

    pub(crate) fn push_field(&mut self, name: &str) {
        self.path.push_field(name);
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.path.push_index(index);
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    /// Resolve a reference chain to its target type, memoized per call.
    ///
    /// A chain that revisits a name without ever reaching a non-reference
    /// type is a pure alias cycle and trips the recursion guard.
    fn resolve(
        &mut self,
        registry: &'a SchemaRegistry,
        name: &str,
    ) -> CoercionResult<&'a SchemaType> {
        if let Some(ty) = self.resolved.get(name) {
            return Ok(*ty);
        }
        let mut chain: Vec<&str> = Vec::new();
        let mut current = name;
        loop {
            if chain.contains(&current) {
                return Err(CoercionError::RecursionLimitExceeded {
                    path: self.path.clone(),
                });
            }
            chain.push(current);
            match registry.resolve(current)? {
                SchemaType::Reference(next) => current = next,
                ty => {
                    for visited in chain {
                        self.resolved.insert(visited.to_string(), ty);
                    }
                    return Ok(ty);
                }
            }
        }
    }
}

/// Converts raw values into schema-typed values.
///
/// A coercer is cheap to construct and holds nothing but the shared
/// environment and a mode; each [`Coercer::coerce`] call is pure
/// computation with its own scope.
#[derive(Debug, Clone)]
pub struct Coercer {
    env: CoercionEnv,
    mode: CoercionMode,
}

impl Coercer {
    /// A strict coercer: failures surface as typed errors.
    #[must_use]
    pub fn new(env: CoercionEnv) -> Self {
        Self {
            env,
            mode: CoercionMode::Strict,
        }
    }

    /// A lenient coercer: field/item failures degrade to null.
    #[must_use]
    pub fn lenient(env: CoercionEnv) -> Self {
        Self {
            env,
            mode: CoercionMode::Lenient,
        }
    }

    /// The environment this coercer reads.
    #[must_use]
    pub fn env(&self) -> &CoercionEnv {
        &self.env
    }

    /// The failure mode.
    #[must_use]
    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    pub(crate) fn is_lenient(&self) -> bool {
        self.mode == CoercionMode::Lenient
    }

    /// Coerce a raw value to the target type.
    ///
    /// # Errors
    ///
    /// Returns a [`CoercionError`] localized to the failing path. In
    /// lenient mode only configuration errors surface; everything else
    /// degrades to null.
    pub fn coerce(&self, raw: &RawValue, target: &SchemaType) -> CoercionResult<TypedValue> {
        tracing::debug!(target_type = %target, raw_shape = raw.type_name(), "coercing");
        let mut scope = Scope::new();
        let result = self.coerce_value(raw, target, &mut scope);
        match result {
            Err(err) if self.is_lenient() && !err.is_configuration_error() => {
                Ok(TypedValue::Null)
            }
            other => other,
        }
    }

    /// One step of recursive coercion.
    pub(crate) fn coerce_value<'a>(
        &'a self,
        raw: &RawValue,
        target: &'a SchemaType,
        scope: &mut Scope<'a>,
    ) -> CoercionResult<TypedValue> {
        if scope.depth >= MAX_DEPTH {
            return Err(CoercionError::RecursionLimitExceeded {
                path: scope.path.clone(),
            });
        }
        scope.depth += 1;
        let result = match target {
            SchemaType::Primitive(kind) => primitive::coerce(raw, *kind, scope.path()),
            SchemaType::Enum(schema) => {
                enums::coerce(raw, schema, self.env.aliases(), scope.path())
            }
            SchemaType::Object(schema) => object::coerce(self, raw, schema, scope),
            SchemaType::Array(item) => array::coerce(self, raw, item, scope),
            SchemaType::Union(arms) => union::coerce(self, raw, arms, scope),
            SchemaType::Optional(inner) => self.coerce_optional(raw, inner, scope),
            SchemaType::Reference(name) => {
                match scope.resolve(self.env.registry(), name) {
                    Ok(resolved) => self.coerce_value(raw, resolved, scope),
                    Err(err) => Err(err),
                }
            }
        };
        scope.depth -= 1;
        result
    }

    /// Optional semantics: null in, or any non-configuration failure,
    /// yields null.
    fn coerce_optional<'a>(
        &'a self,
        raw: &RawValue,
        inner: &'a SchemaType,
        scope: &mut Scope<'a>,
    ) -> CoercionResult<TypedValue> {
        if raw.is_null() {
            return Ok(TypedValue::Null);
        }
        match self.coerce_value(raw, inner, scope) {
            Ok(value) => Ok(value),
            Err(err) if err.is_configuration_error() => Err(err),
            Err(_) => Ok(TypedValue::Null),
        }
    }

    /// Coerce one field or item, applying the lenient degrade rule.
    pub(crate) fn coerce_child<'a>(
        &'a self,
        raw: &RawValue,
        target: &'a SchemaType,
        scope: &mut Scope<'a>,
    ) -> CoercionResult<TypedValue> {
        match self.coerce_value(raw, target, scope) {
            Err(err) if self.is_lenient() && !err.is_configuration_error() => {
                tracing::trace!(path = %scope.path(), %err, "degrading failed field to null");
                Ok(TypedValue::Null)
            }
            other => other,
        }
    }
}
