//! # pay-api
//!
//! HTTP API layer for intent-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The payment intent endpoint
//! - CORS handling for browser clients
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/pay` | Create customer + payment intent |
//! | OPTIONS | `/api/pay` | CORS pre-flight |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
