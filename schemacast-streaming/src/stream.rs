//! Stream adaptor: text chunks in, coercion events out.

use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use schemacast_coerce::CoercionEnv;
use schemacast_core::{CoercionResult, TypedValue};
use schemacast_schema::SchemaType;

use crate::partial::PartialCoercer;

/// One emission of a coerced stream.
#[derive(Debug, Clone)]
pub enum CoercionEvent {
    /// A partial value computed from the buffer so far. Unresolved parts
    /// are null; resolved parts never regress in later events.
    Partial(TypedValue),
    /// The authoritative result, emitted once when the source ends.
    Final(CoercionResult<TypedValue>),
}

impl CoercionEvent {
    /// The value carried by this event, if it succeeded.
    #[must_use]
    pub fn value(&self) -> Option<&TypedValue> {
        match self {
            Self::Partial(value) => Some(value),
            Self::Final(Ok(value)) => Some(value),
            Self::Final(Err(_)) => None,
        }
    }

    /// Whether this is the final event.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }
}

pin_project! {
    /// Wraps a text stream and emits one [`CoercionEvent::Partial`] per
    /// chunk, then one [`CoercionEvent::Final`] when the source ends.
    pub struct CoercedStream<S> {
        #[pin]
        inner: S,
        state: Option<PartialCoercer>,
    }
}

impl<S> CoercedStream<S> {
    /// Wrap a text stream.
    #[must_use]
    pub fn new(inner: S, env: CoercionEnv, target: SchemaType) -> Self {
        Self {
            inner,
            state: Some(PartialCoercer::new(env, target)),
        }
    }
}

impl<S> Stream for CoercedStream<S>
where
    S: Stream<Item = String> + Unpin,
{
    type Item = CoercionEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        let Some(partial) = this.state.as_mut() else {
            // Final event already emitted.
            return Poll::Ready(None);
        };

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(chunk)) => {
                let event = match partial.push(&chunk) {
                    Ok(snapshot) => CoercionEvent::Partial(snapshot.clone()),
                    // Configuration errors end the stream immediately.
                    Err(err) => {
                        this.state.take();
                        return Poll::Ready(Some(CoercionEvent::Final(Err(err))));
                    }
                };
                Poll::Ready(Some(event))
            }
            Poll::Ready(None) => match this.state.take() {
                Some(partial) => Poll::Ready(Some(CoercionEvent::Final(partial.finalize()))),
                None => Poll::Ready(None),
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Extension trait attaching coercion to any text stream.
pub trait CoerceStreamExt: Stream<Item = String> {
    /// Coerce this stream's accumulated text against a target type.
    fn coerce_typed(self, env: CoercionEnv, target: SchemaType) -> CoercedStream<Self>
    where
        Self: Sized,
    {
        CoercedStream::new(self, env, target)
    }
}

impl<S: Stream<Item = String>> CoerceStreamExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use pretty_assertions::assert_eq;
    use schemacast_schema::{AliasMap, FieldSchema, ObjectSchema, SchemaRegistry};

    fn env() -> CoercionEnv {
        CoercionEnv::new(SchemaRegistry::empty(), AliasMap::new())
    }

    fn target() -> SchemaType {
        SchemaType::object(
            ObjectSchema::new("Answer")
                .with_field("answer", FieldSchema::new(SchemaType::string())),
        )
    }

    #[tokio::test]
    async fn test_emits_partials_then_final() {
        let chunks = vec![
            r#"{"ans"#.to_string(),
            r#"wer": "for"#.to_string(),
            r#"ty-two"}"#.to_string(),
        ];
        let events: Vec<CoercionEvent> = stream::iter(chunks)
            .coerce_typed(env(), target())
            .collect()
            .await;

        assert_eq!(events.len(), 4);
        assert!(events[..3].iter().all(|e| !e.is_final()));

        let CoercionEvent::Final(Ok(final_value)) = &events[3] else {
            panic!("expected successful final event");
        };
        assert_eq!(
            final_value.to_json(),
            serde_json::json!({"answer": "forty-two"})
        );
    }

    #[tokio::test]
    async fn test_partials_never_regress() {
        let chunks = vec![
            r#"{"answer": "ab"#.to_string(),
            r#"c""#.to_string(),
            "}".to_string(),
        ];
        let events: Vec<CoercionEvent> = stream::iter(chunks)
            .coerce_typed(env(), target())
            .collect()
            .await;

        let mut last_len = 0usize;
        for event in &events {
            if let Some(value) = event.value() {
                if let Some(TypedValue::String(s)) =
                    value.field("answer").filter(|v| !v.is_null())
                {
                    assert!(s.len() >= last_len, "string field regressed");
                    last_len = s.len();
                }
            }
        }
        assert_eq!(last_len, 3);
    }

    #[tokio::test]
    async fn test_empty_stream_fails_final_only() {
        let events: Vec<CoercionEvent> = stream::iter(Vec::<String>::new())
            .coerce_typed(env(), target())
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        let CoercionEvent::Final(Err(err)) = &events[0] else {
            panic!("expected failing final event");
        };
        assert_eq!(err.to_string(), "no structured payload found in model output");
    }
}
