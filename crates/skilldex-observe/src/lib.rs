//! Observability setup for Skilldex: tracing subscriber initialization
//! with structured logging and optional OpenTelemetry trace export.

pub mod tracing_setup;
