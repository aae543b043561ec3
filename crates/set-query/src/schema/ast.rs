use serde::{Deserialize, Deserializer, Serialize};
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a valid GraphQL name")]
pub struct InvalidGraphQlName(pub String);

#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(s: &str) -> Result<Name, InvalidGraphQlName> {
        Name::from_str(s)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Name {
    type Err = InvalidGraphQlName;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_graphql_name(s) {
            Ok(Name(SmolStr::new(s)))
        } else {
            Err(InvalidGraphQlName(s.into()))
        }
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Name::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn match_first(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn match_body(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn is_valid_graphql_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(match_first) && chars.all(match_body)
}

/// Build a name from a literal known to be valid.
macro_rules! mk_name {
    ($name:literal) => {
        $crate::schema::ast::Name::new($name).unwrap()
    };
}
pub(crate) use mk_name;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(pub Name);

impl TypeName {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A GraphQL type reference, for example `String` or `[setArray]`.
#[derive(Serialize, Deserialize, Hash, Debug, PartialEq, Eq, Clone)]
pub struct Type {
    pub base: BaseType,
    pub nullable: bool,
}

#[derive(Serialize, Deserialize, Hash, Debug, PartialEq, Eq, Clone)]
pub enum BaseType {
    Named(TypeName),
    List(Box<Type>),
}

impl Type {
    pub fn named_null(name: TypeName) -> Type {
        Type {
            base: BaseType::Named(name),
            nullable: true,
        }
    }

    pub fn list_null(element_type: Type) -> Type {
        Type {
            base: BaseType::List(Box::new(element_type)),
            nullable: true,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.base {
            BaseType::Named(name) => name.fmt(f)?,
            BaseType::List(element_type) => write!(f, "[{element_type}]")?,
        }
        if !self.nullable {
            f.write_char('!')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_compliant_name() -> anyhow::Result<()> {
        let name: Name = serde_json::from_str("\"setQuery\"")?;
        assert_eq!(name.as_str(), "setQuery");

        for valid in ["_foo", "Foo1", "foo_1", "featured_authors"] {
            assert!(Name::new(valid).is_ok(), "{valid} should be valid");
        }

        for invalid in ["", "1foo", "-foo", "foo bar", "foo-bar", "résumé"] {
            assert!(Name::new(invalid).is_err(), "{invalid} should be invalid");
        }

        let name: Result<Name, _> = serde_json::from_str("\"foo-bar\"");
        assert!(name.is_err());
        Ok(())
    }

    #[test]
    fn test_type_display() {
        let string = TypeName(mk_name!("String"));
        assert_eq!(Type::named_null(string.clone()).to_string(), "String");
        let non_null = Type {
            base: BaseType::Named(string),
            nullable: false,
        };
        assert_eq!(Type::list_null(non_null).to_string(), "[String!]");
    }
}
