//! # Payment Types
//!
//! Request and response shapes for a single payment intent round trip.
//! Nothing here outlives one request/response cycle.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Currency used when the caller does not name one
pub const DEFAULT_CURRENCY: &str = "usd";

/// Metadata key under which the customer's email is attached to the intent
pub const CUSTOMER_EMAIL_METADATA_KEY: &str = "customer_email";

/// Inbound payment request body, as sent by the client
///
/// Every field is an untyped JSON value at this stage so a wrongly typed
/// field never masks an earlier validation error; `PaymentRequest::from_raw`
/// enforces the invariants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaymentRequest {
    /// Amount in minor units; a JSON number or a numeric string
    #[serde(default)]
    pub amount: Option<Value>,
    /// ISO currency code (defaults to "usd")
    #[serde(default)]
    pub currency: Option<Value>,
    /// Customer email
    #[serde(default)]
    pub email: Option<Value>,
    /// Let the processor choose payment methods instead of card-only
    #[serde(default)]
    pub automatic_payment_methods: Option<Value>,
}

/// A validated payment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount in minor units, always > 0
    pub amount: i64,
    /// Lowercase currency code
    pub currency: String,
    /// Customer email as received, never blank
    pub email: String,
    /// Whether automatic payment methods were requested
    pub automatic_payment_methods: bool,
}

impl PaymentRequest {
    /// Validate a raw request.
    ///
    /// The amount is checked before the email, so a request with both wrong
    /// reports the amount.
    pub fn from_raw(raw: RawPaymentRequest) -> PaymentResult<Self> {
        let amount = coerce_amount(raw.amount.as_ref()).ok_or(PaymentError::InvalidAmount)?;

        let email = match raw.email {
            Some(Value::String(email)) if !email.trim().is_empty() => email,
            _ => return Err(PaymentError::EmailRequired),
        };

        let currency = match raw.currency.as_ref() {
            Some(Value::String(c)) if !c.trim().is_empty() => c.trim().to_lowercase(),
            _ => DEFAULT_CURRENCY.to_string(),
        };

        Ok(Self {
            amount,
            currency,
            email,
            automatic_payment_methods: is_truthy(raw.automatic_payment_methods.as_ref()),
        })
    }

    /// Payment method mode for the intent
    pub fn payment_methods(&self) -> PaymentMethodConfig {
        PaymentMethodConfig::from_flag(self.automatic_payment_methods)
    }
}

/// Coerce a JSON amount to a positive integer, truncating fractions.
fn coerce_amount(value: Option<&Value>) -> Option<i64> {
    let amount = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };

    amount.filter(|a| *a > 0)
}

/// Flag semantics for loosely typed clients: `true`, non-zero numbers,
/// non-empty strings, arrays and objects all count as set.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// How the processor should pick payment methods for an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethodConfig {
    /// Processor-managed payment methods
    Automatic,
    /// Card payments only
    CardOnly,
}

impl PaymentMethodConfig {
    pub fn from_flag(automatic: bool) -> Self {
        if automatic {
            PaymentMethodConfig::Automatic
        } else {
            PaymentMethodConfig::CardOnly
        }
    }
}

/// Parameters for creating a customer record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub email: String,
    pub description: String,
}

impl NewCustomer {
    /// Customer record described after its email
    pub fn for_email(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            description: format!("Customer for {}", email),
            email,
        }
    }
}

/// Customer created by the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: String,
}

/// Parameters for creating a payment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentIntent {
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    /// Customer the intent belongs to
    pub customer_id: String,
    /// Sorted so form encoding is stable
    pub metadata: BTreeMap<String, String>,
    pub payment_methods: PaymentMethodConfig,
}

impl NewPaymentIntent {
    /// Build the intent parameters for a validated request and its customer
    pub fn for_customer(request: &PaymentRequest, customer: &CustomerRef) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            CUSTOMER_EMAIL_METADATA_KEY.to_string(),
            request.email.clone(),
        );

        Self {
            amount: request.amount,
            currency: request.currency.clone(),
            customer_id: customer.id.clone(),
            metadata,
            payment_methods: request.payment_methods(),
        }
    }
}

/// Payment intent created by the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRef {
    pub id: String,
    pub client_secret: String,
}

/// Result of a successful round trip, returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentCreated {
    pub client_secret: String,
    pub customer_id: String,
    pub payment_intent_id: String,
}

impl PaymentIntentCreated {
    pub fn new(customer: CustomerRef, intent: PaymentIntentRef) -> Self {
        Self {
            client_secret: intent.client_secret,
            customer_id: customer.id,
            payment_intent_id: intent.id,
        }
    }
}
