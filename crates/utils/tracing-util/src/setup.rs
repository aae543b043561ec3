use opentelemetry::{global, trace::TraceError, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_semantic_conventions as semcov;
use tracing_subscriber::EnvFilter;

/// Whether finished spans are also printed. They are written to stderr, which leaves stdout to the
/// application's own output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExportTracesStdout {
    Enable,
    Disable,
}

/// Initialize logging and tracing.
///
/// Log events go to stderr, filtered by `RUST_LOG`. Spans are exported over OTLP when an
/// `endpoint` is given, and printed to stderr when `export_traces_stdout` is enabled. With
/// neither, the global tracer provider keeps its no-op default and spans cost next to nothing.
pub fn initialize_tracing(
    endpoint: Option<&str>,
    service_name: String,
    service_version: Option<&'static str>,
    export_traces_stdout: ExportTracesStdout,
) -> Result<(), TraceError> {
    // a subscriber may already be installed by the embedding application
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    if endpoint.is_none() && export_traces_stdout == ExportTracesStdout::Disable {
        return Ok(());
    }

    global::set_text_map_propagator(TraceContextPropagator::new());

    let mut resource_entries = vec![KeyValue::new(semcov::resource::SERVICE_NAME, service_name)];
    if let Some(service_version) = service_version {
        resource_entries.push(KeyValue::new(
            semcov::resource::SERVICE_VERSION,
            service_version,
        ));
    }
    let config = opentelemetry_sdk::trace::Config::default()
        .with_resource(opentelemetry_sdk::Resource::new(resource_entries));

    let mut tracer_provider_builder = TracerProvider::builder().with_config(config);

    if let Some(endpoint) = endpoint {
        let otlp_exporter = opentelemetry_otlp::SpanExporterBuilder::Tonic(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .build_span_exporter()?;
        tracer_provider_builder = tracer_provider_builder
            .with_batch_exporter(otlp_exporter, opentelemetry_sdk::runtime::Tokio);
    }

    if export_traces_stdout == ExportTracesStdout::Enable {
        tracer_provider_builder = tracer_provider_builder
            .with_simple_exporter(
                opentelemetry_stdout::SpanExporter::builder()
                    .with_writer(std::io::stderr())
                    .build(),
            );
    }

    global::set_tracer_provider(tracer_provider_builder.build());
    Ok(())
}

/// Flush and shut down the global tracer provider.
pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}
