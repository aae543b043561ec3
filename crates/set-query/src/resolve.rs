//! Validating a raw `setQuery` value, invoking the requested sets' resolvers, and merging what
//! they return.
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::future::join_all;
use futures_util::FutureExt;
use indexmap::IndexSet;
use serde_json::Value;
use tracing_util::{set_attribute_on_active_span, AttributeVisibility, SpanVisibility};

use crate::coerce::object_ids_from_value;
use crate::constants::item;
use crate::error::ResolutionFailure;
use crate::registry::SetRegistry;
use crate::types::{ObjectId, Relation, SetQueryItem};

/// Whether a raw input value counts as "no input". Mirrors the loose emptiness check of the hosts
/// this argument originates from: null, `false`, zero, `""`, `"0"` and empty collections.
pub(crate) fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(elements) => elements.is_empty(),
        Value::Object(members) => members.is_empty(),
    }
}

/// Keep the items naming a registered set and fill in their defaults.
///
/// Anything malformed is dropped: non-object items, a missing or non-string `set`, or a name the
/// registry does not know. Nothing here fails.
pub(crate) fn validate_set_query<'r>(
    raw: &Value,
    registry: &'r SetRegistry,
) -> Vec<SetQueryItem<'r>> {
    let raw_items: Vec<&Value> = match raw {
        Value::Array(elements) => elements.iter().collect(),
        Value::Object(members) => members.values().collect(),
        _ => {
            tracing::debug!("ignoring setQuery value that is not a list");
            Vec::new()
        }
    };

    raw_items
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw_item)| {
            let validated = validate_set_query_item(raw_item, registry);
            if validated.is_none() {
                tracing::debug!(index, "dropping setQuery item without a registered set");
            }
            validated
        })
        .collect()
}

fn validate_set_query_item<'r>(
    raw_item: &Value,
    registry: &'r SetRegistry,
) -> Option<SetQueryItem<'r>> {
    let members = raw_item.as_object()?;
    let set = members
        .get(item::SET)
        .and_then(Value::as_str)
        .and_then(|name| registry.get(name))?;

    let arguments = match members.get(item::ARGS) {
        Some(Value::Array(arguments)) => arguments.clone(),
        _ => Vec::new(),
    };

    // only a union is implemented, so anything but OR is read as OR too
    let relation = match members.get(item::RELATION) {
        None | Some(Value::Null) => Relation::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|_| {
            tracing::debug!(set = %set.name, relation = %value, "unsupported relation, using OR");
            Relation::default()
        }),
    };

    Some(SetQueryItem {
        set,
        arguments,
        relation,
    })
}

/// Resolve every item, keeping item order. An item whose resolver fails, panics, times out or
/// returns nothing usable contributes the exclude-all sentinel; the others are unaffected.
pub(crate) async fn resolve_set_query(
    items: &[SetQueryItem<'_>],
    timeout: Option<Duration>,
) -> Vec<Vec<ObjectId>> {
    join_all(items.iter().map(|item| resolve_item(item, timeout))).await
}

async fn resolve_item(item: &SetQueryItem<'_>, timeout: Option<Duration>) -> Vec<ObjectId> {
    let tracer = tracing_util::global_tracer();
    let result = tracer
        .in_span_async(
            "resolve_set",
            format!("Resolve set {}", item.set.name),
            SpanVisibility::Internal,
            || {
                Box::pin(async move {
                    set_attribute_on_active_span(
                        AttributeVisibility::Default,
                        "set.name",
                        item.set.name.to_string(),
                    );
                    let result = invoke_resolver(item, timeout).await;
                    if let Err(failure) = &result {
                        report_exclusion(item, failure);
                    }
                    result
                })
            },
        )
        .await;
    result.unwrap_or_else(|_| vec![ObjectId::EXCLUDE_ALL])
}

/// Must be called with the item's `resolve_set` span active.
fn report_exclusion(item: &SetQueryItem<'_>, failure: &ResolutionFailure) {
    tracing::warn!(set = %item.set.name, error = %failure, "set excludes all objects");
    tracing_util::add_event_on_active_span(
        "set excluded all objects".to_string(),
        vec![
            ("set.name", item.set.name.to_string()),
            ("reason", failure.to_string()),
        ],
    );
}

async fn invoke_resolver(
    item: &SetQueryItem<'_>,
    timeout: Option<Duration>,
) -> Result<Vec<ObjectId>, ResolutionFailure> {
    let call = AssertUnwindSafe(item.set.resolver.resolve(&item.arguments)).catch_unwind();
    let outcome = match timeout {
        Some(duration) => tokio::time::timeout(duration, call)
            .await
            .map_err(|_| ResolutionFailure::TimedOut(duration))?,
        None => call.await,
    };
    let members = outcome.map_err(|_| ResolutionFailure::Panicked)??;
    object_ids_from_value(&members)
}

/// Concatenate the contributions and drop repeated identifiers, keeping first occurrences.
pub(crate) fn merge(contributions: Vec<Vec<ObjectId>>) -> Vec<ObjectId> {
    contributions
        .into_iter()
        .flatten()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
