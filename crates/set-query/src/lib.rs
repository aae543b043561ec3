//! Query content objects by membership in named, externally defined sets.
//!
//! Sets are registered in a [`SetRegistry`]. The schema gains a `setQuery` argument listing the
//! sets to query, and [`SetQueryResolver::transform`] turns that argument into an inclusion list
//! on the underlying query engine's arguments. [`hooks::install`] wires both into a [`Hooks`]
//! chain.
mod coerce;
pub mod configuration;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod registry;
mod resolve;
pub mod schema;
mod transform;
pub mod types;

pub use coerce::to_object_id;
pub use configuration::{Configuration, NoValidSets};
pub use error::{RegistryError, ResolverError};
pub use hooks::{install, CopyInputFields, FieldsContributor, Hooks, InputFieldMapper};
pub use registry::{
    resolver_fn, FnResolver, RegisteredSet, SetName, SetRegistry, SetRegistryBuilder, SetResolver,
};
pub use schema::{contribute_fields, generate_sdl, register_set_values};
pub use transform::SetQueryResolver;
pub use types::{InputArguments, ObjectId, QueryArguments, Relation, SetQueryItem};
