use std::sync::Arc;

use serde_json::Value;
use tracing_util::{SpanVisibility, Successful};

use crate::configuration::{Configuration, NoValidSets};
use crate::constants::SET_QUERY_FIELD;
use crate::registry::SetRegistry;
use crate::resolve::{is_empty_input, merge, resolve_set_query, validate_set_query};
use crate::types::{InputArguments, ObjectId, QueryArguments};

/// Maps the `setQuery` input argument onto the underlying query engine's arguments.
#[derive(Debug, Clone)]
pub struct SetQueryResolver {
    registry: Arc<SetRegistry>,
    configuration: Configuration,
}

impl SetQueryResolver {
    pub fn new(registry: Arc<SetRegistry>, configuration: Configuration) -> Self {
        SetQueryResolver {
            registry,
            configuration,
        }
    }

    /// Install the inclusion list for the sets named in `input_args` into `query_args`.
    ///
    /// This must run after the raw input arguments have been copied into `query_args`, since it
    /// removes the raw `setQuery` argument from them. It never fails: requests naming unknown sets
    /// or whose resolvers fail get fewer (or no) results instead of an error.
    pub async fn transform(
        &self,
        query_args: QueryArguments,
        input_args: &InputArguments,
    ) -> QueryArguments {
        let raw_set_query = match input_args.get(SET_QUERY_FIELD) {
            Some(raw) if !is_empty_input(raw) => raw,
            _ => return query_args,
        };

        let tracer = tracing_util::global_tracer();
        tracer
            .in_span_async(
                "set_query_transform",
                "Map set query to query arguments",
                SpanVisibility::Internal,
                || {
                    Box::pin(async move {
                        Successful::new(self.apply_set_query(query_args, raw_set_query).await)
                    })
                },
            )
            .await
            .into_inner()
    }

    async fn apply_set_query(
        &self,
        mut query_args: QueryArguments,
        raw_set_query: &Value,
    ) -> QueryArguments {
        let items = validate_set_query(raw_set_query, &self.registry);
        query_args.remove(SET_QUERY_FIELD);

        if items.is_empty() && self.configuration.no_valid_sets == NoValidSets::OmitFilter {
            tracing::debug!("setQuery names no registered set, leaving query arguments unfiltered");
            return query_args;
        }

        let contributions =
            resolve_set_query(&items, self.configuration.resolver_timeout()).await;
        let object_ids = merge(contributions);
        tracing::debug!(
            sets = items.len(),
            object_ids = object_ids.len(),
            "resolved set query"
        );
        self.install_inclusion_list(&mut query_args, &object_ids);
        query_args
    }

    fn install_inclusion_list(&self, query_args: &mut QueryArguments, object_ids: &[ObjectId]) {
        query_args.insert(
            self.configuration.inclusion_list_key.clone(),
            Value::Array(object_ids.iter().map(|id| Value::from(id.0)).collect()),
        );
        query_args.insert(
            self.configuration.order_by_key.clone(),
            Value::String(self.configuration.order_by_inclusion_value.clone()),
        );
    }
}
