//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment processor and the server configuration.

use anyhow::Context;
use axum::http::HeaderValue;
use pay_core::BoxedPaymentProcessor;
use pay_stripe::StripeClient;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Value of `Access-Control-Allow-Origin` ("*" allows any origin)
    pub allowed_origin: HeaderValue,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {}", p))?,
            None => 8080,
        };

        let origin = lookup("FRONTEND_URL")
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| "*".to_string());
        let allowed_origin = HeaderValue::from_str(origin.trim())
            .with_context(|| format!("Invalid FRONTEND_URL: {}", origin))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            allowed_origin,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origin == "*"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            allowed_origin: HeaderValue::from_static("*"),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor (Stripe in production)
    pub processor: BoxedPaymentProcessor,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let stripe = StripeClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        if !stripe.config().is_test_mode() && !config.is_production() {
            tracing::warn!("Live Stripe key in use outside production");
        }

        Ok(Self::with_processor(config, Arc::new(stripe)))
    }

    /// Create state around an existing processor
    pub fn with_processor(config: AppConfig, processor: BoxedPaymentProcessor) -> Self {
        Self { processor, config }
    }
}
