//! Runs every `fixtures/*/request.json` through a hook chain with the set query installed and
//! compares the resulting query arguments with the `expected.json` next to it.
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use set_query::{
    install, resolver_fn, Configuration, Hooks, InputArguments, QueryArguments, ResolverError,
    SetRegistry,
};

/// A set whose behaviour is fixed by the fixture.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
enum FixtureSet {
    /// Always returns this value, whatever the arguments.
    Returns(Value),
    /// Always fails with this message.
    Fails(String),
    /// Returns its arguments.
    EchoArguments,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FixtureRequest {
    #[serde(default)]
    configuration: Configuration,
    sets: BTreeMap<String, FixtureSet>,
    #[serde(default)]
    query_args: QueryArguments,
    input_args: InputArguments,
}

fn build_registry(sets: BTreeMap<String, FixtureSet>) -> anyhow::Result<SetRegistry> {
    let mut builder = SetRegistry::builder();
    for (name, set) in sets {
        match set {
            FixtureSet::Returns(members) => builder.register(
                &name,
                resolver_fn(move |_arguments: &[Value]| Ok::<_, ResolverError>(members.clone())),
            )?,
            FixtureSet::Fails(message) => builder.register(
                &name,
                resolver_fn(move |_arguments: &[Value]| {
                    Err::<Value, _>(ResolverError::new(message.clone()))
                }),
            )?,
            FixtureSet::EchoArguments => builder.register(
                &name,
                resolver_fn(|arguments: &[Value]| Ok::<_, ResolverError>(arguments.to_vec())),
            )?,
        };
    }
    Ok(builder.build())
}

async fn run_fixture(request_path: &Path) -> anyhow::Result<(Value, Value)> {
    let directory = request_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("fixture has no directory"))?;
    let request: FixtureRequest = serde_json::from_str(&std::fs::read_to_string(request_path)?)?;
    let expected: Value =
        serde_json::from_str(&std::fs::read_to_string(directory.join("expected.json"))?)?;

    let mut hooks = Hooks::new();
    install(
        &mut hooks,
        Arc::new(build_registry(request.sets)?),
        request.configuration,
    );
    let query_args = hooks
        .map_input_fields_onto(request.query_args, &request.input_args)
        .await;
    Ok((serde_json::to_value(query_args)?, expected))
}

#[test]
fn test_set_query_fixtures() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    insta::glob!("fixtures/*/request.json", |path| {
        let (actual, expected) = runtime
            .block_on(run_fixture(path))
            .unwrap_or_else(|error| panic!("{}: {error}", path.display()));
        assert_eq!(actual, expected, "{}", path.display());
    });
}
