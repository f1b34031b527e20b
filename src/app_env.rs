/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Address the HTTP server binds to, in "host:port" form. Defaults to [DEFAULT_SERVER_ADDRESS].
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
/// Log level configuration for the application. Uses [EnvFilter](tracing_subscriber::EnvFilter) directive syntax,
/// i.e. "info" or "todo_rest=debug,sqlx=warn"
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
