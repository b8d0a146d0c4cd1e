//! # Request Handlers
//!
//! Axum request handlers for the payment API.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use pay_core::{
    open_payment_intent, PaymentError, PaymentIntentCreated, PaymentRequest, RawPaymentRequest,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Log the error by kind and turn it into a JSON error reply
fn payment_error_to_response(err: PaymentError) -> ApiError {
    if err.is_client_error() {
        warn!("Rejected payment request: {}", err);
    } else {
        error!(status = err.status_code(), "Payment processor error: {}", err);
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "intent-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a customer and a payment intent, returning the client secret
#[instrument(skip(state, payload), fields(provider = state.processor.provider_name()))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<RawPaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentIntentCreated>, ApiError> {
    let Json(raw) = payload.map_err(|rejection| {
        payment_error_to_response(PaymentError::MalformedRequest(rejection.body_text()))
    })?;

    let request = PaymentRequest::from_raw(raw).map_err(payment_error_to_response)?;

    info!(
        "Creating payment intent: amount={}, currency={}, automatic_payment_methods={}",
        request.amount, request.currency, request.automatic_payment_methods
    );

    let created = open_payment_intent(state.processor.as_ref(), request)
        .await
        .map_err(payment_error_to_response)?;

    Ok(Json(created))
}

/// Any verb other than POST (and the OPTIONS pre-flight) on the payment route
#[instrument(skip_all, fields(method = %method))]
pub async fn method_not_allowed(method: Method) -> ApiError {
    payment_error_to_response(PaymentError::MethodNotAllowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error");
        assert_eq!(err.error, "Test error");
    }

    #[test]
    fn test_payment_error_conversion() {
        let (status, Json(body)) = payment_error_to_response(PaymentError::InvalidAmount);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid amount");

        let (status, Json(body)) =
            payment_error_to_response(PaymentError::provider(Some(402), "Card declined"));
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body.error, "Card declined");

        let (status, _) = payment_error_to_response(PaymentError::provider(None, "boom"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
