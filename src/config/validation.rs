//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is reported,
//! not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("store.base_url: {0}")]
    InvalidStoreUrl(String),

    #[error("listener.route must start with '/', got '{0}'")]
    InvalidRoute(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(
        "timeouts.request_secs ({request_secs}) must exceed twice store.timeout_secs ({store_secs})"
    )]
    RequestTimeoutTooShort { request_secs: u64, store_secs: u64 },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if !config.listener.route.starts_with('/') {
        errors.push(ValidationError::InvalidRoute(config.listener.route.clone()));
    }

    match Url::parse(&config.store.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::InvalidStoreUrl(format!(
                    "unsupported scheme '{}'",
                    url.scheme()
                )));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::InvalidStoreUrl(
                    "must not carry a query or fragment".to_string(),
                ));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidStoreUrl(e.to_string())),
    }

    if config.store.timeout_secs == 0 {
        errors.push(ValidationError::Zero("store.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    // An add or remove makes two sequential store calls.
    if config.store.timeout_secs > 0
        && config.timeouts.request_secs > 0
        && config.timeouts.request_secs <= config.store.timeout_secs.saturating_mul(2)
    {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            store_secs: config.store.timeout_secs,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
