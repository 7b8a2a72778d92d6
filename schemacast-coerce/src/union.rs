//! Union coercion: first declared arm that succeeds wins.

use schemacast_core::{CoercionError, CoercionResult, RawValue, TypedValue};
use schemacast_schema::SchemaType;

use crate::coercer::{Coercer, Scope};

/// Try union arms in declaration order and keep the first success.
///
/// When several arms would independently succeed the earliest declared
/// one wins. That bias is fixed policy, not an accident: callers order
/// arms by preference and the engine never second-guesses them with a
/// specificity heuristic.
pub(crate) fn coerce<'a>(
    coercer: &'a Coercer,
    raw: &RawValue,
    arms: &'a [SchemaType],
    scope: &mut Scope<'a>,
) -> CoercionResult<TypedValue> {
    for arm in arms {
        match coercer.coerce_value(raw, arm, scope) {
            Ok(value) => {
                tracing::trace!(arm = %arm, "union arm matched");
                return Ok(value);
            }
            Err(err) if err.is_configuration_error() => return Err(err),
            Err(_) => continue,
        }
    }
    Err(CoercionError::type_mismatch(
        scope.path().clone(),
        render_arms(arms),
        raw,
    ))
}

fn render_arms(arms: &[SchemaType]) -> String {
    let rendered: Vec<String> = arms.iter().map(ToString::to_string).collect();
    format!("({})", rendered.join(" | "))
}
