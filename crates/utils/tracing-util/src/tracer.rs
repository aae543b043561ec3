use std::future::Future;
use std::pin::Pin;

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::{get_active_span, FutureExt, SpanRef, Tracer as _};
use opentelemetry::{Key, KeyValue};

use crate::traceable::{ErrorVisibility, Traceable, TraceableError};

#[derive(Clone, Copy, Debug, derive_more::Display)]
pub enum SpanVisibility {
    #[display(fmt = "internal")]
    Internal,
    #[display(fmt = "user")]
    User,
}

#[derive(Clone, Copy, Debug)]
pub enum AttributeVisibility {
    Default,
    Internal,
}

fn attribute_key(visibility: AttributeVisibility, key: &'static str) -> Key {
    match visibility {
        AttributeVisibility::Default => Key::from_static_str(key),
        AttributeVisibility::Internal => Key::from(format!("internal.{key}")),
    }
}

fn set_attribute_on_span<V>(
    span: &SpanRef,
    visibility: AttributeVisibility,
    key: &'static str,
    value: V,
) where
    V: Into<opentelemetry::Value>,
{
    span.set_attribute(KeyValue::new(attribute_key(visibility, key), value));
}

fn record_result<R>(span: &SpanRef, visibility: SpanVisibility, result: &R)
where
    R: Traceable,
{
    set_attribute_on_span(
        span,
        AttributeVisibility::Internal,
        "visibility",
        visibility.to_string(),
    );

    if let Some(error) = result.get_error() {
        // internal errors are only described in full on internal spans
        let censored = matches!(error.visibility(), ErrorVisibility::Internal)
            && matches!(visibility, SpanVisibility::User);
        let description = if censored {
            "Internal error".to_string()
        } else {
            error.description()
        };
        span.set_status(opentelemetry::trace::Status::error(description));
        set_attribute_on_span(
            span,
            AttributeVisibility::Internal,
            "error_description",
            error.description(),
        );
        set_attribute_on_span(
            span,
            AttributeVisibility::Internal,
            "error_details",
            error.details(),
        );
    }
}

/// Sets an attribute on the active span, prefixing the `key` with `internal.` if `visibility` is
/// `Internal`.
pub fn set_attribute_on_active_span<V>(visibility: AttributeVisibility, key: &'static str, value: V)
where
    V: Into<opentelemetry::Value>,
{
    get_active_span(|span| set_attribute_on_span(&span, visibility, key, value));
}

/// Adds an event with the given `name` and string attributes on the active span.
pub fn add_event_on_active_span(name: String, attributes: Vec<(&'static str, String)>) {
    let attributes = attributes
        .into_iter()
        .map(|(key, value)| KeyValue::new(key, value))
        .collect();
    get_active_span(|span| span.add_event(name, attributes));
}

/// Wrapper around the OpenTelemetry tracer with helpers for running closures and futures in spans.
pub struct Tracer {
    tracer: BoxedTracer,
}

impl Tracer {
    pub(crate) fn new(tracer: BoxedTracer) -> Self {
        Self { tracer }
    }

    /// Runs the future returned by `f` in a new span called `name`. The span records
    /// `display_name`, its visibility and the error of the result, if any. The future is polled
    /// with the new span as its active context, so nested spans and events attach to it.
    pub async fn in_span_async<'a, R, F>(
        &'a self,
        name: &'static str,
        display_name: impl Into<String>,
        visibility: SpanVisibility,
        f: F,
    ) -> R
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = R> + 'a + Send>>,
        R: Traceable,
    {
        let display_name = display_name.into();
        self.tracer
            .in_span(name, |cx| {
                async move {
                    let result = f().await;
                    get_active_span(|span| {
                        set_attribute_on_span(
                            &span,
                            AttributeVisibility::Default,
                            "display.name",
                            display_name,
                        );
                        record_result(&span, visibility, &result);
                    });
                    result
                }
                .with_context(cx)
            })
            .await
    }
}

/// The tracer registered with the global tracer provider.
pub fn global_tracer() -> Tracer {
    Tracer::new(global::tracer("set-query-tracing-util"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Successful;

    #[test]
    fn test_attribute_key_prefix() {
        assert_eq!(
            attribute_key(AttributeVisibility::Internal, "set.name").as_str(),
            "internal.set.name"
        );
        assert_eq!(
            attribute_key(AttributeVisibility::Default, "set.name").as_str(),
            "set.name"
        );
    }

    #[tokio::test]
    async fn test_in_span_async_returns_future_result() {
        let result = global_tracer()
            .in_span_async("test", "Test", SpanVisibility::User, || {
                Box::pin(async { Successful::new("done") })
            })
            .await;
        assert_eq!(result.into_inner(), "done");
    }
}
