//! The registry of named sets and the resolvers backing them.
//!
//! Sets are registered once at startup through a [`SetRegistryBuilder`]. The built
//! [`SetRegistry`] is immutable and is shared between the schema (which lists the set names in
//! the `set` enum) and the query resolver (which looks the requested names up).
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::constants::RESERVED_ENUM_VALUES;
use crate::error::{RegistryError, ResolverError};
use crate::schema::ast::Name;
use crate::schema::types::DeprecationStatus;

/// The name of a registered set. It doubles as a value of the schema's `set` enum, so it must be
/// a valid GraphQL enum value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display)]
pub struct SetName(Name);

impl SetName {
    pub fn new(name: &str) -> Result<SetName, RegistryError> {
        if RESERVED_ENUM_VALUES.contains(&name) {
            return Err(RegistryError::InvalidSetName {
                name: name.to_string(),
                reason: "the name is reserved by GraphQL".to_string(),
            });
        }
        Name::new(name)
            .map(SetName)
            .map_err(|error| RegistryError::InvalidSetName {
                name: name.to_string(),
                reason: error.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_name(&self) -> &Name {
        &self.0
    }
}

impl FromStr for SetName {
    type Err = RegistryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SetName::new(s)
    }
}

impl Borrow<str> for SetName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Produces the members of a set for a list of caller-supplied arguments.
///
/// The return value is loose: any JSON list is accepted and its elements are coerced
/// to identifiers. Anything else, including an empty list, means the set contributes nothing.
#[async_trait]
pub trait SetResolver: Send + Sync {
    async fn resolve(
        &self,
        arguments: &[serde_json::Value],
    ) -> Result<serde_json::Value, ResolverError>;
}

/// A [`SetResolver`] backed by a synchronous closure. Build one with [`resolver_fn`].
pub struct FnResolver<F>(F);

/// Wrap a closure as a [`SetResolver`]. The closure may return any serializable value, typically
/// a `Vec` of integers or numeric strings.
pub fn resolver_fn<F, T, E>(f: F) -> FnResolver<F>
where
    F: Fn(&[serde_json::Value]) -> Result<T, E> + Send + Sync,
    T: Serialize,
    E: Display,
{
    FnResolver(f)
}

#[async_trait]
impl<F, T, E> SetResolver for FnResolver<F>
where
    F: Fn(&[serde_json::Value]) -> Result<T, E> + Send + Sync,
    T: Serialize,
    E: Display,
{
    async fn resolve(
        &self,
        arguments: &[serde_json::Value],
    ) -> Result<serde_json::Value, ResolverError> {
        let members = (self.0)(arguments).map_err(|error| ResolverError::new(error.to_string()))?;
        serde_json::to_value(members).map_err(|error| {
            ResolverError::new(format!("set members could not be serialized: {error}"))
        })
    }
}

/// A set known to the registry.
#[derive(Clone)]
pub struct RegisteredSet {
    pub name: SetName,
    pub description: Option<String>,
    pub deprecation_status: DeprecationStatus,
    pub resolver: Arc<dyn SetResolver>,
}

impl RegisteredSet {
    pub fn new(name: &str, resolver: impl SetResolver + 'static) -> Result<Self, RegistryError> {
        Ok(RegisteredSet {
            name: SetName::new(name)?,
            description: None,
            deprecation_status: DeprecationStatus::NotDeprecated,
            resolver: Arc::new(resolver),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::new_deprecated(reason);
        self
    }
}

impl std::fmt::Debug for RegisteredSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSet")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("deprecation_status", &self.deprecation_status)
            .finish_non_exhaustive()
    }
}

#[derive(Default, Debug)]
pub struct SetRegistryBuilder {
    sets: BTreeMap<SetName, RegisteredSet>,
}

impl SetRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set under `name` with no description.
    pub fn register(
        &mut self,
        name: &str,
        resolver: impl SetResolver + 'static,
    ) -> Result<&mut Self, RegistryError> {
        self.add(RegisteredSet::new(name, resolver)?)
    }

    pub fn add(&mut self, set: RegisteredSet) -> Result<&mut Self, RegistryError> {
        if self.sets.contains_key(&set.name) {
            return Err(RegistryError::DuplicateSet { name: set.name });
        }
        self.sets.insert(set.name.clone(), set);
        Ok(self)
    }

    pub fn build(self) -> SetRegistry {
        SetRegistry { sets: self.sets }
    }
}

/// The frozen mapping from set name to resolver.
#[derive(Default)]
pub struct SetRegistry {
    sets: BTreeMap<SetName, RegisteredSet>,
}

impl SetRegistry {
    pub fn builder() -> SetRegistryBuilder {
        SetRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredSet> {
        self.sets.get(name)
    }

    /// Registered sets, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSet> {
        self.sets.values()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl std::fmt::Debug for SetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sets.keys()).finish()
    }
}
