mod setup;
mod traceable;
mod tracer;

pub use setup::{initialize_tracing, shutdown_tracer, ExportTracesStdout};
pub use traceable::{ErrorVisibility, Successful, Traceable, TraceableError};
pub use tracer::{
    add_event_on_active_span, global_tracer, set_attribute_on_active_span, AttributeVisibility,
    SpanVisibility, Tracer,
};

// re-export things from OpenTelemetry to avoid library users importing their own version and
// risking mismatches and multiple globals
pub use opentelemetry::trace::get_active_span;
pub use opentelemetry::trace::FutureExt;
pub use opentelemetry::Context;
