//! # pay-core
//!
//! Core types and traits for the intent-relay payment endpoint.
//!
//! This crate provides:
//! - `PaymentRequest` validation for inbound requests
//! - `PaymentProcessor` trait for the external processor
//! - `open_payment_intent`, the customer-then-intent flow
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{open_payment_intent, PaymentRequest, RawPaymentRequest};
//!
//! let request = PaymentRequest::from_raw(raw)?;
//! let created = open_payment_intent(processor.as_ref(), request).await?;
//!
//! // Hand created.client_secret to the browser
//! ```

pub mod error;
pub mod intent;
pub mod payment;
pub mod processor;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use intent::open_payment_intent;
pub use payment::{
    CustomerRef, NewCustomer, NewPaymentIntent, PaymentIntentCreated, PaymentIntentRef,
    PaymentMethodConfig, PaymentRequest, RawPaymentRequest, CUSTOMER_EMAIL_METADATA_KEY,
    DEFAULT_CURRENCY,
};
pub use processor::{BoxedPaymentProcessor, PaymentProcessor};
