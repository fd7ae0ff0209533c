//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the proxy service and the port interfaces that
//! define how it reaches the upstream provider.

/// Port interfaces for external systems.
pub mod ports;

/// Application services: cache proxy and IPO calendar.
pub mod services;
