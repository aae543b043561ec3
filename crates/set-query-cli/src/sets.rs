//! Sets defined by data rather than code, loaded from a JSON file mapping set names to
//! definitions.
use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use set_query::{ObjectId, RegisteredSet, ResolverError, SetRegistry, SetResolver};

const DEFAULT_SETS_JSON: &str = include_str!("../data/sets.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum SetDefinition {
    /// Always the same members.
    Static(StaticSet),
    /// Members looked up by the set query's arguments.
    Keyed(KeyedSet),
}

impl SetDefinition {
    fn description(&self) -> Option<&str> {
        match self {
            SetDefinition::Static(set) => set.description.as_deref(),
            SetDefinition::Keyed(set) => set.description.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StaticSet {
    pub ids: Vec<ObjectId>,
    #[serde(default)]
    pub description: Option<String>,
}

#[async_trait]
impl SetResolver for StaticSet {
    async fn resolve(&self, _arguments: &[Value]) -> Result<Value, ResolverError> {
        Ok(Value::from_iter(self.ids.iter().map(|id| id.0)))
    }
}

/// Members are the concatenated entries for each argument, in argument order. Numeric arguments
/// are looked up by their decimal form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KeyedSet {
    pub entries: BTreeMap<String, Vec<ObjectId>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[async_trait]
impl SetResolver for KeyedSet {
    async fn resolve(&self, arguments: &[Value]) -> Result<Value, ResolverError> {
        let mut members = Vec::new();
        for argument in arguments {
            let key = match argument {
                Value::String(key) => key.clone(),
                Value::Number(key) => key.to_string(),
                other => {
                    return Err(ResolverError::new("set arguments must be strings or numbers")
                        .with_details(other.clone()))
                }
            };
            if let Some(ids) = self.entries.get(&key) {
                members.extend(ids.iter().map(|id| id.0));
            }
        }
        Ok(Value::from(members))
    }
}

fn parse_sets(json: &str) -> anyhow::Result<BTreeMap<String, SetDefinition>> {
    Ok(serde_json::from_str(json)?)
}

fn build_registry(definitions: BTreeMap<String, SetDefinition>) -> anyhow::Result<SetRegistry> {
    let mut builder = SetRegistry::builder();
    for (name, definition) in definitions {
        let description = definition.description().map(ToString::to_string);
        let mut set = match definition {
            SetDefinition::Static(set) => RegisteredSet::new(&name, set)?,
            SetDefinition::Keyed(set) => RegisteredSet::new(&name, set)?,
        };
        if let Some(description) = description {
            set = set.with_description(description);
        }
        builder.add(set)?;
    }
    Ok(builder.build())
}

/// Load the sets defined in `path`, or the bundled sample sets when no path is given.
pub fn read_sets(path: Option<&Path>) -> anyhow::Result<SetRegistry> {
    let definitions = match path {
        Some(path) => {
            let raw_sets = std::fs::read_to_string(path)?;
            parse_sets(&raw_sets)?
        }
        None => parse_sets(DEFAULT_SETS_JSON)?,
    };
    let registry = build_registry(definitions)?;
    tracing::info!(sets = registry.len(), "loaded set definitions");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_sets() {
        let registry = read_sets(None).unwrap();
        let names: Vec<_> = registry.iter().map(|set| set.name.as_str()).collect();
        assert_eq!(names, vec!["curated_authors", "featured"]);
        assert_eq!(
            registry.get("featured").unwrap().description.as_deref(),
            Some("Posts picked for the front page")
        );
    }

    #[tokio::test]
    async fn test_keyed_set_concatenates_entries() {
        let set: KeyedSet = serde_json::from_value(json!({
            "entries": {"alice": [3, 1], "7": [9]}
        }))
        .unwrap();
        assert_eq!(
            set.resolve(&[json!("alice"), json!("nobody"), json!(7)])
                .await
                .unwrap(),
            json!([3, 1, 9])
        );
        assert_eq!(set.resolve(&[]).await.unwrap(), json!([]));
        assert!(set.resolve(&[json!({"login": "alice"})]).await.is_err());
    }

    #[tokio::test]
    async fn test_static_set_ignores_arguments() {
        let set: StaticSet = serde_json::from_value(json!({"ids": [4, 2]})).unwrap();
        assert_eq!(set.resolve(&[json!("x")]).await.unwrap(), json!([4, 2]));
    }

    #[test]
    fn test_invalid_definitions_are_rejected() {
        let unknown_kind = parse_sets(r#"{"a": {"dynamic": {}}}"#);
        assert!(unknown_kind.is_err());

        let bad_name = parse_sets(r#"{"not-a-name": {"static": {"ids": [1]}}}"#)
            .and_then(build_registry);
        assert!(bad_name.is_err());
    }
}
