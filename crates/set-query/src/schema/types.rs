use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ast::{Name, Type, TypeName};

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub enum DeprecationStatus {
    #[default]
    NotDeprecated,
    Deprecated {
        reason: Option<String>,
    },
}

impl DeprecationStatus {
    pub fn new_deprecated(reason: Option<&str>) -> Self {
        DeprecationStatus::Deprecated {
            reason: reason.map(ToString::to_string),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct InputField {
    pub name: Name,
    pub description: Option<String>,
    pub field_type: Type,
    pub deprecation_status: DeprecationStatus,
}

impl InputField {
    pub fn new(name: Name, description: Option<&str>, field_type: Type) -> Self {
        InputField {
            name,
            description: description.map(ToString::to_string),
            field_type,
            deprecation_status: DeprecationStatus::NotDeprecated,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct InputObject {
    pub name: TypeName,
    pub description: Option<String>,
    pub fields: BTreeMap<Name, InputField>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct EnumValue {
    pub value: Name,
    pub description: Option<String>,
    pub deprecation_status: DeprecationStatus,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Enum {
    pub name: TypeName,
    pub description: Option<String>,
    pub values: BTreeMap<Name, EnumValue>,
}

/// An input type definition referenced by query-argument fields.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub enum TypeInfo {
    InputObject(InputObject),
    Enum(Enum),
}

/// The arguments accepted by a connection query: its fields and the input types they reference.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct QueryArgsFields {
    pub fields: BTreeMap<Name, InputField>,
    pub types: BTreeMap<TypeName, TypeInfo>,
}

impl QueryArgsFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: InputField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn get_enum(&self, type_name: &TypeName) -> Option<&Enum> {
        match self.types.get(type_name) {
            Some(TypeInfo::Enum(enum_info)) => Some(enum_info),
            _ => None,
        }
    }
}
