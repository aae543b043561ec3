use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the transformation patches the query arguments.
///
/// The defaults target a WordPress-style query engine, where `post__in` is the inclusion list and
/// `orderby: "post__in"` keeps the inclusion list's order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
#[schemars(title = "SetQueryConfiguration")]
#[schemars(example = "Configuration::example")]
pub struct Configuration {
    /// The query argument receiving the merged identifier list.
    pub inclusion_list_key: String,
    /// The query argument receiving the ordering directive.
    pub order_by_key: String,
    /// The ordering directive meaning "use the inclusion list's order".
    pub order_by_inclusion_value: String,
    /// Upper bound on a single resolver call, in milliseconds. A resolver that takes longer
    /// contributes the exclude-all sentinel.
    pub resolver_timeout_ms: Option<u64>,
    /// What to install when no set query item survives validation.
    pub no_valid_sets: NoValidSets,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            inclusion_list_key: "post__in".to_string(),
            order_by_key: "orderby".to_string(),
            order_by_inclusion_value: "post__in".to_string(),
            resolver_timeout_ms: None,
            no_valid_sets: NoValidSets::default(),
        }
    }
}

impl Configuration {
    pub fn resolver_timeout(&self) -> Option<Duration> {
        self.resolver_timeout_ms.map(Duration::from_millis)
    }

    fn example() -> Self {
        serde_json::from_str(
            r#"{
                "inclusionListKey": "post__in",
                "orderByKey": "orderby",
                "orderByInclusionValue": "post__in",
                "resolverTimeoutMs": 2000,
                "noValidSets": "omitFilter"
            }"#,
        )
        .unwrap()
    }
}

/// Behaviour when a `setQuery` names no registered set at all.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum NoValidSets {
    /// Remove the raw `setQuery` argument and install nothing else.
    #[default]
    OmitFilter,
    /// Install an empty inclusion list and the ordering directive. Only use this with engines
    /// that treat an empty inclusion list as "match nothing".
    EmptyList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_are_missing() {
        let configuration: Configuration =
            serde_json::from_str(r#"{"resolverTimeoutMs": 250}"#).unwrap();
        assert_eq!(configuration.inclusion_list_key, "post__in");
        assert_eq!(configuration.order_by_key, "orderby");
        assert_eq!(configuration.no_valid_sets, NoValidSets::OmitFilter);
        assert_eq!(
            configuration.resolver_timeout(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<Configuration, _> = serde_json::from_str(r#"{"postIn": "ids"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_example_parses() {
        let example = Configuration::example();
        assert_eq!(example.resolver_timeout_ms, Some(2000));
    }
}
