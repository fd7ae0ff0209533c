//! Configuration Module
//!
//! Configuration loading for the proxy service.

mod settings;

pub use settings::{
    CacheSettings, ConfigError, Credentials, DEFAULT_UPSTREAM_BASE_URL, ProxyConfig,
    ServerSettings, UpstreamSettings,
};
