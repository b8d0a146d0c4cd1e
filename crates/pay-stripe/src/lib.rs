//! # pay-stripe
//!
//! Stripe implementation of `pay_core::PaymentProcessor`.
//!
//! `StripeClient` talks to the Stripe REST API directly over `reqwest`:
//! - `POST /v1/customers` - customer record keyed by email
//! - `POST /v1/payment_intents` - intent with either automatic payment
//!   methods or a card-only restriction
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_core::{NewCustomer, PaymentProcessor};
//! use pay_stripe::StripeClient;
//!
//! // Create client from environment (STRIPE_SECRET_KEY)
//! let stripe = StripeClient::from_env()?;
//!
//! let customer = stripe.create_customer(&NewCustomer::for_email("a@b.com")).await?;
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::StripeClient;
pub use config::StripeConfig;
