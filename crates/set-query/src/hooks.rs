//! The filter chain a connection query runs through: field contributors extend the schema's
//! query-argument fields, input-field mappers turn the caller's input into query arguments.
//!
//! Both kinds of hook run in ascending priority. Hooks with the same priority run in the order
//! they were added.
use std::sync::Arc;

use async_trait::async_trait;
use tracing_util::{set_attribute_on_active_span, AttributeVisibility, SpanVisibility, Successful};

use crate::configuration::Configuration;
use crate::registry::SetRegistry;
use crate::schema::{contribute_fields, register_set_values, types::QueryArgsFields};
use crate::transform::SetQueryResolver;
use crate::types::{InputArguments, QueryArguments};

pub type Priority = i32;

/// Priority of the base mapper that copies input arguments into the query arguments.
pub const COPY_INPUT_FIELDS_PRIORITY: Priority = 0;
/// Priority of the set query hooks. The mapper must run after [`CopyInputFields`].
pub const SET_QUERY_PRIORITY: Priority = 10;
/// Priority of the `set` enum registration, after the enum has been contributed.
pub const SET_VALUES_PRIORITY: Priority = 20;

pub trait FieldsContributor: Send + Sync {
    fn name(&self) -> &str;
    fn contribute(&self, fields: QueryArgsFields) -> QueryArgsFields;
}

#[async_trait]
pub trait InputFieldMapper: Send + Sync {
    fn name(&self) -> &str;
    async fn map_input_fields(
        &self,
        query_args: QueryArguments,
        input_args: &InputArguments,
    ) -> QueryArguments;
}

/// Copies every input argument into the query arguments under the same key.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyInputFields;

#[async_trait]
impl InputFieldMapper for CopyInputFields {
    fn name(&self) -> &str {
        "copy_input_fields"
    }

    async fn map_input_fields(
        &self,
        mut query_args: QueryArguments,
        input_args: &InputArguments,
    ) -> QueryArguments {
        for (key, value) in input_args {
            query_args.insert(key.clone(), value.clone());
        }
        query_args
    }
}

/// Contributes the `setQuery` field and its input types.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetQueryFields;

impl FieldsContributor for SetQueryFields {
    fn name(&self) -> &str {
        "set_query_fields"
    }

    fn contribute(&self, fields: QueryArgsFields) -> QueryArgsFields {
        contribute_fields(fields)
    }
}

/// Lists the registered sets as values of the `set` enum.
#[derive(Debug, Clone)]
pub struct SetValuesRegistration {
    registry: Arc<SetRegistry>,
}

impl SetValuesRegistration {
    pub fn new(registry: Arc<SetRegistry>) -> Self {
        SetValuesRegistration { registry }
    }
}

impl FieldsContributor for SetValuesRegistration {
    fn name(&self) -> &str {
        "set_values_registration"
    }

    fn contribute(&self, fields: QueryArgsFields) -> QueryArgsFields {
        register_set_values(fields, &self.registry)
    }
}

#[async_trait]
impl InputFieldMapper for SetQueryResolver {
    fn name(&self) -> &str {
        "set_query"
    }

    async fn map_input_fields(
        &self,
        query_args: QueryArguments,
        input_args: &InputArguments,
    ) -> QueryArguments {
        self.transform(query_args, input_args).await
    }
}

struct Hook<H: ?Sized> {
    priority: Priority,
    hook: Arc<H>,
}

fn insert_by_priority<H: ?Sized>(hooks: &mut Vec<Hook<H>>, priority: Priority, hook: Arc<H>) {
    let position = hooks.partition_point(|existing| existing.priority <= priority);
    hooks.insert(position, Hook { priority, hook });
}

/// The registered hooks. A new chain holds only the [`CopyInputFields`] base mapper.
pub struct Hooks {
    fields_contributors: Vec<Hook<dyn FieldsContributor>>,
    input_mappers: Vec<Hook<dyn InputFieldMapper>>,
}

impl Default for Hooks {
    fn default() -> Self {
        let mut hooks = Hooks {
            fields_contributors: Vec::new(),
            input_mappers: Vec::new(),
        };
        hooks.add_input_mapper(COPY_INPUT_FIELDS_PRIORITY, Arc::new(CopyInputFields));
        hooks
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fields_contributor(
        &mut self,
        priority: Priority,
        contributor: Arc<dyn FieldsContributor>,
    ) -> &mut Self {
        insert_by_priority(&mut self.fields_contributors, priority, contributor);
        self
    }

    pub fn add_input_mapper(
        &mut self,
        priority: Priority,
        mapper: Arc<dyn InputFieldMapper>,
    ) -> &mut Self {
        insert_by_priority(&mut self.input_mappers, priority, mapper);
        self
    }

    /// Run every field contributor over `fields`.
    pub fn build_query_args_fields(&self, fields: QueryArgsFields) -> QueryArgsFields {
        self.fields_contributors
            .iter()
            .fold(fields, |fields, entry| entry.hook.contribute(fields))
    }

    /// Run every input-field mapper in turn, starting from empty query arguments.
    pub async fn map_input_fields(&self, input_args: &InputArguments) -> QueryArguments {
        self.map_input_fields_onto(QueryArguments::new(), input_args)
            .await
    }

    /// Run every input-field mapper in turn, starting from `query_args`.
    pub async fn map_input_fields_onto(
        &self,
        mut query_args: QueryArguments,
        input_args: &InputArguments,
    ) -> QueryArguments {
        let tracer = tracing_util::global_tracer();
        for entry in &self.input_mappers {
            query_args = tracer
                .in_span_async(
                    "map_input_fields",
                    format!("Run input field mapper {}", entry.hook.name()),
                    SpanVisibility::Internal,
                    || {
                        Box::pin(async move {
                            set_attribute_on_active_span(
                                AttributeVisibility::Default,
                                "hook.name",
                                entry.hook.name().to_string(),
                            );
                            set_attribute_on_active_span(
                                AttributeVisibility::Default,
                                "hook.priority",
                                entry.priority.to_string(),
                            );
                            Successful::new(
                                entry.hook.map_input_fields(query_args, input_args).await,
                            )
                        })
                    },
                )
                .await
                .into_inner();
        }
        query_args
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |priority: Priority, name: &str| format!("{priority}:{name}");
        f.debug_struct("Hooks")
            .field(
                "fields_contributors",
                &self
                    .fields_contributors
                    .iter()
                    .map(|entry| names(entry.priority, entry.hook.name()))
                    .collect::<Vec<_>>(),
            )
            .field(
                "input_mappers",
                &self
                    .input_mappers
                    .iter()
                    .map(|entry| names(entry.priority, entry.hook.name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Install the set query into `hooks`: the schema fields, the `set` enum values and the input
/// mapper backed by `registry`.
pub fn install(hooks: &mut Hooks, registry: Arc<SetRegistry>, configuration: Configuration) {
    tracing::debug!(sets = registry.len(), "installing set query hooks");
    hooks
        .add_fields_contributor(SET_QUERY_PRIORITY, Arc::new(SetQueryFields))
        .add_fields_contributor(
            SET_VALUES_PRIORITY,
            Arc::new(SetValuesRegistration::new(registry.clone())),
        )
        .add_input_mapper(
            SET_QUERY_PRIORITY,
            Arc::new(SetQueryResolver::new(registry, configuration)),
        );
}
