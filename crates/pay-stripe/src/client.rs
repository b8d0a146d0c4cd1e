//! # Stripe Customers & Payment Intents
//!
//! Implementation of the two Stripe API calls the endpoint needs:
//! `POST /v1/customers` and `POST /v1/payment_intents`.

use crate::config::StripeConfig;
use async_trait::async_trait;
use pay_core::{
    CustomerRef, NewCustomer, NewPaymentIntent, PaymentError, PaymentIntentRef,
    PaymentMethodConfig, PaymentProcessor, PaymentResult,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Request timeout for every Stripe call
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Stripe REST client
///
/// One attempt per call; failures are surfaced to the caller unchanged.
pub struct StripeClient {
    config: StripeConfig,
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Configuration in use
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// POST a form to the Stripe API and decode the JSON reply
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form_params: &[(String, String)],
    ) -> PaymentResult<T> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(form_params)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    #[instrument(skip(self, customer))]
    async fn create_customer(&self, customer: &NewCustomer) -> PaymentResult<CustomerRef> {
        let form_params = customer_form_params(customer);

        let response: StripeCustomerResponse =
            self.post_form("/v1/customers", &form_params).await?;

        info!("Created Stripe customer: id={}", response.id);

        Ok(CustomerRef { id: response.id })
    }

    #[instrument(skip(self, intent), fields(customer = %intent.customer_id, amount = intent.amount))]
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> PaymentResult<PaymentIntentRef> {
        let form_params = payment_intent_form_params(intent);

        debug!(
            "Creating Stripe payment intent: currency={}, mode={:?}",
            intent.currency, intent.payment_methods
        );

        let response: StripePaymentIntentResponse =
            self.post_form("/v1/payment_intents", &form_params).await?;

        let client_secret = response.client_secret.ok_or_else(|| {
            PaymentError::Serialization(format!(
                "Payment intent {} returned without a client_secret",
                response.id
            ))
        })?;

        info!("Created Stripe payment intent: id={}", response.id);

        Ok(PaymentIntentRef {
            id: response.id,
            client_secret,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Form Encoding
// =============================================================================

fn customer_form_params(customer: &NewCustomer) -> Vec<(String, String)> {
    vec![
        ("email".to_string(), customer.email.clone()),
        ("description".to_string(), customer.description.clone()),
    ]
}

fn payment_intent_form_params(intent: &NewPaymentIntent) -> Vec<(String, String)> {
    let mut form_params: Vec<(String, String)> = vec![
        ("amount".to_string(), intent.amount.to_string()),
        ("currency".to_string(), intent.currency.clone()),
        ("customer".to_string(), intent.customer_id.clone()),
    ];

    for (key, value) in &intent.metadata {
        form_params.push((format!("metadata[{}]", key), value.clone()));
    }

    match intent.payment_methods {
        PaymentMethodConfig::Automatic => {
            form_params.push((
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ));
        }
        PaymentMethodConfig::CardOnly => {
            form_params.push(("payment_method_types[0]".to_string(), "card".to_string()));
        }
    }

    form_params
}

/// Turn a non-2xx Stripe reply into a provider error
fn provider_error(status: u16, body: &str) -> PaymentError {
    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(StripeErrorResponse { error: err }) => {
            error!(
                "Stripe API error: status={}, type={:?}, code={:?}, decline_code={:?}, param={:?}",
                status, err.error_type, err.code, err.decline_code, err.param
            );
            let message = err
                .message
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
            PaymentError::provider(Some(status), message)
        }
        Err(_) => {
            error!("Stripe API error: status={}, body={}", status, body);
            PaymentError::provider(Some(status), format!("HTTP {}: {}", status, body))
        }
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCustomerResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    decline_code: Option<String>,
    #[serde(default)]
    param: Option<String>,
}
