//! The schema side of the set query: the `setQuery` argument field, the `setArray` input object
//! and the `set` enum listing the registered sets.
pub mod ast;
mod sdl;
pub mod types;

pub use sdl::generate_sdl;

use crate::constants::{descriptions, item, SET_ENUM_TYPE, SET_QUERY_FIELD, SET_QUERY_INPUT_TYPE};
use crate::registry::SetRegistry;
use ast::{mk_name, Type, TypeName};
use types::{Enum, EnumValue, InputField, InputObject, QueryArgsFields, TypeInfo};

fn set_query_input_type_name() -> TypeName {
    TypeName(mk_name!("setArray"))
}

fn set_enum_type_name() -> TypeName {
    TypeName(mk_name!("set"))
}

/// Add the `setQuery` field and the input types it references to `fields`.
///
/// Existing fields and types are kept. An already contributed `set` enum keeps its values, so the
/// contribution may run before or after [`register_set_values`] and any number of times.
pub fn contribute_fields(mut fields: QueryArgsFields) -> QueryArgsFields {
    debug_assert_eq!(set_query_input_type_name().as_str(), SET_QUERY_INPUT_TYPE);
    debug_assert_eq!(set_enum_type_name().as_str(), SET_ENUM_TYPE);

    let set_query_field = InputField::new(
        mk_name!("setQuery"),
        Some(descriptions::SET_QUERY_INPUT),
        Type::list_null(Type::named_null(set_query_input_type_name())),
    );
    debug_assert_eq!(set_query_field.name.as_str(), SET_QUERY_FIELD);
    fields
        .fields
        .insert(set_query_field.name.clone(), set_query_field);

    fields
        .types
        .entry(set_query_input_type_name())
        .or_insert_with(|| TypeInfo::InputObject(set_query_input_object()));
    fields
        .types
        .entry(set_enum_type_name())
        .or_insert_with(|| {
            TypeInfo::Enum(Enum {
                name: set_enum_type_name(),
                description: Some(descriptions::SET_ENUM.to_string()),
                values: Default::default(),
            })
        });
    fields
}

fn set_query_input_object() -> InputObject {
    let set_field = InputField::new(
        mk_name!("set"),
        Some(descriptions::SET_ENUM),
        Type::named_null(set_enum_type_name()),
    );
    let args_field = InputField::new(
        mk_name!("args"),
        Some(descriptions::SET_ARGS),
        Type::list_null(Type::named_null(TypeName(mk_name!("String")))),
    );
    debug_assert_eq!(set_field.name.as_str(), item::SET);
    debug_assert_eq!(args_field.name.as_str(), item::ARGS);

    InputObject {
        name: set_query_input_type_name(),
        description: Some(descriptions::SET_QUERY_INPUT.to_string()),
        fields: [set_field, args_field]
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect(),
    }
}

/// Populate the `set` enum with one value per registered set.
///
/// Values are only ever added. If the enum has not been contributed yet, `fields` is returned
/// as is.
pub fn register_set_values(mut fields: QueryArgsFields, registry: &SetRegistry) -> QueryArgsFields {
    let Some(TypeInfo::Enum(set_enum)) = fields.types.get_mut(&set_enum_type_name()) else {
        tracing::debug!("no set enum to register values on");
        return fields;
    };
    for set in registry.iter() {
        set_enum
            .values
            .entry(set.name.as_name().clone())
            .or_insert_with(|| EnumValue {
                value: set.name.as_name().clone(),
                description: set.description.clone(),
                deprecation_status: set.deprecation_status.clone(),
            });
    }
    fields
}
