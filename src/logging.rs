use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, field, info, warn};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-rest";

/// OTLP endpoints for span and metric export
pub struct OtelEndpoints {
    pub traces: String,
    pub metrics: String,
}

impl OtelEndpoints {
    /// Reads [app_env::OTEL_SPAN_EXPORT_URL] and [app_env::OTEL_METRIC_EXPORT_URL]. Exporting is
    /// only turned on when both are present.
    pub fn from_env() -> Option<Self> {
        let traces = std::env::var(app_env::OTEL_SPAN_EXPORT_URL).ok()?;
        let metrics = std::env::var(app_env::OTEL_METRIC_EXPORT_URL).ok()?;

        Some(OtelEndpoints { traces, metrics })
    }
}

/// Owns the OpenTelemetry providers so buffered spans and metrics can be flushed on the way out
pub struct Telemetry {
    tracer_provider: TracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Telemetry {
    /// Builds batch exporters that push to the given OTLP gRPC endpoints in the background
    pub fn connect(endpoints: &OtelEndpoints) -> Result<Self, anyhow::Error> {
        let resource = Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);

        let span_export = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoints.traces)
            .build()
            .context("building the span exporter")?;
        let tracer_provider = TracerProvider::builder()
            .with_batch_exporter(span_export, runtime::Tokio)
            .with_resource(resource.clone())
            .build();

        let metric_export = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoints.metrics)
            .build()
            .context("building the metric exporter")?;
        let meter_provider = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(metric_export, runtime::Tokio).build())
            .with_resource(resource)
            .build();

        Ok(Telemetry {
            tracer_provider,
            meter_provider,
        })
    }

    /// Flushes and stops both exporters. Failures are logged, there's nothing left to retry.
    pub fn shutdown(self) {
        info!("Flushing telemetry");
        if let Err(err) = self.tracer_provider.shutdown() {
            warn!("Span exporter did not shut down cleanly: {err}");
        }
        if let Err(err) = self.meter_provider.shutdown() {
            warn!("Metric exporter did not shut down cleanly: {err}");
        }
    }
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> Result<EnvFilter, anyhow::Error> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .context("building the logging filter")
}

/// Installs the global subscriber. Logs go to stdout as JSON, filtered by `env_filter`. With
/// `telemetry` present, spans and metrics at debug and above are also exported.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, telemetry: Option<&Telemetry>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let otel_layer = telemetry.map(|telemetry| {
        OpenTelemetryLayer::new(telemetry.tracer_provider.tracer(SERVICE_NAME))
            .with_filter(LevelFilter::DEBUG)
    });
    let metrics_layer = telemetry.map(|telemetry| {
        MetricsLayer::new(telemetry.meter_provider.clone()).with_filter(LevelFilter::DEBUG)
    });

    registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_filter(env_filter),
        )
        .with(otel_layer)
        .with(metrics_layer)
        .init();
}

/// Wraps the router so every request runs inside a "request" span. The span's parent comes from
/// incoming W3C trace context headers.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(record_response),
    )
}

fn request_span(request: &Request<Body>) -> Span {
    let span = debug_span!(
        "request",
        method = request.method().as_str(),
        path = request.uri().path(),
        response_status = field::Empty,
    );

    let parent_cxt = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    span.set_parent(parent_cxt);

    span
}

fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("response_status", field::display(response.status()));
    debug!(latency_ms = latency.as_millis(), "request processing complete");
}
