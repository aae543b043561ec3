//! Names the set query adds to a connection query's schema and arguments.

/// The query-argument field holding the caller's list of set queries.
pub const SET_QUERY_FIELD: &str = "setQuery";

/// The input object describing one set query.
pub const SET_QUERY_INPUT_TYPE: &str = "setArray";

/// The enum listing the registered sets.
pub const SET_ENUM_TYPE: &str = "set";

/// Members of a single set query item.
pub mod item {
    pub const SET: &str = "set";
    pub const ARGS: &str = "args";
    pub const RELATION: &str = "relation";
}

/// Descriptions attached to the contributed schema types and fields.
pub mod descriptions {
    pub const SET_QUERY_INPUT: &str = "Query objects based on user-defined sets";
    pub const SET_ENUM: &str = "User-defined sets";
    pub const SET_ARGS: &str = "A list of arguments passed to the user-defined set function";
}

/// Enum values that GraphQL reserves and which can never name a set.
pub const RESERVED_ENUM_VALUES: [&str; 3] = ["true", "false", "null"];
