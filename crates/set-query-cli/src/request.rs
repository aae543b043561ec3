use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use set_query::{InputArguments, QueryArguments};

/// A connection query's arguments before the input-field mappers have run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformRequest {
    #[serde(default)]
    pub query_args: QueryArguments,
    #[serde(default)]
    pub input_args: InputArguments,
}

/// Read a request from `path`, or from stdin when no path is given.
pub fn read_request(path: Option<&Path>) -> anyhow::Result<TransformRequest> {
    let raw_request = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut raw_request = String::new();
            std::io::stdin().read_to_string(&mut raw_request)?;
            raw_request
        }
    };
    parse_request(&raw_request)
}

fn parse_request(raw_request: &str) -> anyhow::Result<TransformRequest> {
    if raw_request.trim().is_empty() {
        anyhow::bail!(
            "the request is empty; expected {{\"queryArgs\": {{...}}, \"inputArgs\": {{...}}}}"
        );
    }
    Ok(serde_json::from_str(raw_request)?)
}
