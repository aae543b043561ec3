use std::fmt::{self, Display, Formatter, Write};

use super::ast::TypeName;
use super::types::{DeprecationStatus, Enum, InputField, InputObject, QueryArgsFields, TypeInfo};

/// Render query-argument fields as GraphQL SDL: an input object named `parent` holding the fields,
/// followed by every type they reference.
pub fn generate_sdl(fields: &QueryArgsFields, parent: &TypeName) -> String {
    Sdl { fields, parent }.to_string()
}

struct Sdl<'a> {
    fields: &'a QueryArgsFields,
    parent: &'a TypeName,
}

impl Display for Sdl<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let parent_object = InputObject {
            name: self.parent.clone(),
            description: None,
            fields: self.fields.fields.clone(),
        };
        write_input_object(f, &parent_object)?;
        for type_info in self.fields.types.values() {
            f.write_char('\n')?;
            match type_info {
                TypeInfo::InputObject(input_object) => write_input_object(f, input_object)?,
                TypeInfo::Enum(enum_info) => write_enum(f, enum_info)?,
            }
        }
        Ok(())
    }
}

fn write_input_object(f: &mut Formatter<'_>, input_object: &InputObject) -> fmt::Result {
    write_description(f, "", input_object.description.as_deref())?;
    writeln!(f, "input {} {{", input_object.name)?;
    for field in input_object.fields.values() {
        write_input_field(f, field)?;
    }
    f.write_str("}\n")
}

fn write_input_field(f: &mut Formatter<'_>, field: &InputField) -> fmt::Result {
    write_description(f, "  ", field.description.as_deref())?;
    write!(f, "  {}: {}", field.name, field.field_type)?;
    write_deprecation(f, &field.deprecation_status)?;
    f.write_char('\n')
}

fn write_enum(f: &mut Formatter<'_>, enum_info: &Enum) -> fmt::Result {
    write_description(f, "", enum_info.description.as_deref())?;
    write!(f, "enum {}", enum_info.name)?;
    // an enum without values is still being populated
    if enum_info.values.is_empty() {
        return f.write_char('\n');
    }
    f.write_str(" {\n")?;
    for value in enum_info.values.values() {
        write_description(f, "  ", value.description.as_deref())?;
        write!(f, "  {}", value.value)?;
        write_deprecation(f, &value.deprecation_status)?;
        f.write_char('\n')?;
    }
    f.write_str("}\n")
}

fn write_description(
    f: &mut Formatter<'_>,
    indent: &str,
    description: Option<&str>,
) -> fmt::Result {
    match description {
        Some(description) => writeln!(f, "{indent}{}", Quoted(description)),
        None => Ok(()),
    }
}

fn write_deprecation(f: &mut Formatter<'_>, deprecation_status: &DeprecationStatus) -> fmt::Result {
    match deprecation_status {
        DeprecationStatus::NotDeprecated => Ok(()),
        DeprecationStatus::Deprecated { reason: None } => f.write_str(" @deprecated"),
        DeprecationStatus::Deprecated {
            reason: Some(reason),
        } => write!(f, " @deprecated(reason: {})", Quoted(reason)),
    }
}

/// A GraphQL string literal.
struct Quoted<'a>(&'a str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() => write!(f, "\\u{:04X}", u32::from(c))?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolverError;
    use crate::registry::{resolver_fn, RegisteredSet, SetRegistry};
    use crate::schema::ast::{mk_name, Type};
    use crate::schema::{contribute_fields, register_set_values};
    use serde_json::Value;

    fn parent() -> TypeName {
        TypeName(mk_name!("RootQueryToPostConnectionWhereArgs"))
    }

    fn base_fields() -> QueryArgsFields {
        QueryArgsFields::new().with_field(InputField::new(
            mk_name!("search"),
            Some("Show Posts based on a keyword search"),
            Type::named_null(TypeName(mk_name!("String"))),
        ))
    }

    #[test]
    fn test_sdl_before_registration() {
        let fields = contribute_fields(base_fields());
        insta::assert_snapshot!(generate_sdl(&fields, &parent()), @r###"
        input RootQueryToPostConnectionWhereArgs {
          "Show Posts based on a keyword search"
          search: String
          "Query objects based on user-defined sets"
          setQuery: [setArray]
        }

        "User-defined sets"
        enum set

        "Query objects based on user-defined sets"
        input setArray {
          "A list of arguments passed to the user-defined set function"
          args: [String]
          "User-defined sets"
          set: set
        }
        "###);
    }

    #[test]
    fn test_sdl_with_registered_sets() {
        let members = || resolver_fn(|_arguments: &[Value]| Ok::<_, ResolverError>(vec![1]));
        let mut builder = SetRegistry::builder();
        builder
            .add(
                RegisteredSet::new("curated_authors", members())
                    .unwrap()
                    .with_description("Posts by \"curated\" authors"),
            )
            .unwrap()
            .add(
                RegisteredSet::new("legacy_picks", members())
                    .unwrap()
                    .deprecated(Some("Use curated_authors")),
            )
            .unwrap();
        let fields =
            register_set_values(contribute_fields(QueryArgsFields::new()), &builder.build());

        insta::assert_snapshot!(generate_sdl(&fields, &parent()), @r###"
        input RootQueryToPostConnectionWhereArgs {
          "Query objects based on user-defined sets"
          setQuery: [setArray]
        }

        "User-defined sets"
        enum set {
          "Posts by \"curated\" authors"
          curated_authors
          legacy_picks @deprecated(reason: "Use curated_authors")
        }

        "Query objects based on user-defined sets"
        input setArray {
          "A list of arguments passed to the user-defined set function"
          args: [String]
          "User-defined sets"
          set: set
        }
        "###);
    }

    #[test]
    fn test_string_literals_are_escaped() {
        let description = "Tab\there, \"quoted\" C:\\path\nbell\u{7}";
        assert_eq!(
            Quoted(description).to_string(),
            r#""Tab\there, \"quoted\" C:\\path\nbell\u0007""#
        );

        let fields = QueryArgsFields::new().with_field(InputField::new(
            mk_name!("legacy"),
            Some(description),
            Type::named_null(TypeName(mk_name!("String"))),
        ));
        let sdl = generate_sdl(&fields, &parent());
        assert!(sdl.contains(&format!("  {}\n  legacy: String\n", Quoted(description))));
    }
}
