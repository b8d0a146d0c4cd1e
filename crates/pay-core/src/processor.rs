//! # Payment Processor Trait
//!
//! The seam between the HTTP handler and the external payment processor.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          PaymentProcessor (trait)           │
//! │  ├── create_customer()                      │
//! │  ├── create_payment_intent()                │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!               ┌───────┴───────┐
//!               │ StripeClient  │
//!               └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::payment::{CustomerRef, NewCustomer, NewPaymentIntent, PaymentIntentRef};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations the endpoint needs from a payment processor.
///
/// Implementations make a single attempt per call. Transport, retries and
/// authentication are their own concern.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a customer record.
    ///
    /// # Arguments
    /// * `customer` - Email and description for the new record
    async fn create_customer(&self, customer: &NewCustomer) -> PaymentResult<CustomerRef>;

    /// Create a payment intent for an existing customer.
    ///
    /// # Returns
    /// The intent id and the client secret the caller completes payment with.
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> PaymentResult<PaymentIntentRef>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type BoxedPaymentProcessor = Arc<dyn PaymentProcessor>;
