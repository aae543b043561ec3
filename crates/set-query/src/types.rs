use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::registry::RegisteredSet;

/// A content object identifier, as understood by the downstream query engine.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct ObjectId(pub i64);

impl ObjectId {
    /// Matches no content object. A set that cannot be resolved contributes only this identifier.
    pub const EXCLUDE_ALL: ObjectId = ObjectId(0);
}

/// How a set query item combines with the others. Only a union is supported.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Relation {
    #[default]
    #[serde(rename = "OR")]
    Or,
}

/// A validated entry of the caller's `setQuery` list.
#[derive(Clone)]
pub struct SetQueryItem<'r> {
    pub set: &'r RegisteredSet,
    pub arguments: Vec<serde_json::Value>,
    pub relation: Relation,
}

impl std::fmt::Debug for SetQueryItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetQueryItem")
            .field("set", &self.set.name)
            .field("arguments", &self.arguments)
            .field("relation", &self.relation)
            .finish()
    }
}

macro_rules! argument_map {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
        #[serde(transparent)]
        pub struct $name(IndexMap<String, serde_json::Value>);

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
                self.0.get(key)
            }

            pub fn contains_key(&self, key: &str) -> bool {
                self.0.contains_key(key)
            }

            pub fn insert(
                &mut self,
                key: impl Into<String>,
                value: serde_json::Value,
            ) -> Option<serde_json::Value> {
                self.0.insert(key.into(), value)
            }

            /// Removes `key`, keeping the order of the remaining arguments.
            pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
                self.0.shift_remove(key)
            }

            pub fn iter(&self) -> indexmap::map::Iter<'_, String, serde_json::Value> {
                self.0.iter()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<IndexMap<String, serde_json::Value>> for $name {
            fn from(arguments: IndexMap<String, serde_json::Value>) -> Self {
                Self(arguments)
            }
        }

        impl<K: Into<String>> FromIterator<(K, serde_json::Value)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, serde_json::Value)>>(iter: I) -> Self {
                Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = (&'a String, &'a serde_json::Value);
            type IntoIter = indexmap::map::Iter<'a, String, serde_json::Value>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

argument_map!(
    QueryArguments,
    "Arguments for the underlying query engine, keyed by engine-specific names."
);
argument_map!(
    InputArguments,
    "The caller's parsed input arguments, keyed by schema field name."
);
