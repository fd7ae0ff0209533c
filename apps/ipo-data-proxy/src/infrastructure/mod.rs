//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer, plus the HTTP surfaces.

/// Configuration loading.
pub mod config;

/// Health check HTTP endpoint.
pub mod health;

/// Public HTTP API.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Tracing subscriber and OpenTelemetry integration.
pub mod telemetry;

/// Upstream market data provider client.
pub mod upstream;
