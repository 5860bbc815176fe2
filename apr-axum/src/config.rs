//! Configuration types for the Axum HTTP server.
//!
//! This module provides configuration options for the REST API server,
//! including network binding, page size bounds and the public address used
//! in pagination links.

use apr_core::models::{DEFAULT_LIMIT, LimitPolicy, MAX_LIMIT};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the Axum HTTP server.
///
/// # Examples
///
/// ```
/// use apr_axum::config::AxumConfig;
///
/// // Use default configuration
/// let config = AxumConfig::default();
///
/// // Custom configuration
/// let config = AxumConfig {
///     bind_address: "127.0.0.1:3000".parse().unwrap(),
///     page_limit: 50,
///     max_page_limit: 500,
///     base_url: Some("https://reports.example.com".to_string()),
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AxumConfig {
    /// The address to bind the server to
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Page size used when a request does not give a numeric `limit`
    #[serde(default = "default_page_limit")]
    pub page_limit: i64,

    /// Requests for larger pages are clamped to this size
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: i64,

    /// Scheme and authority used in pagination links, e.g. `https://reports.example.com`.
    /// When unset, links are built from the request's `Host` header, or left relative.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl AxumConfig {
    /// The page size bounds applied while resolving requests
    pub fn limit_policy(&self) -> LimitPolicy {
        LimitPolicy {
            default: self.page_limit,
            max: self.max_page_limit,
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_page_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_max_page_limit() -> i64 {
    MAX_LIMIT
}

impl Default for AxumConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
            base_url: None,
        }
    }
}
