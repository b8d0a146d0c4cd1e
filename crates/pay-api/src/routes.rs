//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::{AppConfig, AppState};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - POST /api/pay - Create customer + payment intent
///   - GET  /health  - Health check
///
/// Every response carries the CORS headers; an OPTIONS pre-flight is
/// answered by the CORS layer before any handler runs.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new().route(
        "/pay",
        post(handlers::create_payment_intent).fallback(handlers::method_not_allowed),
    );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

/// CORS policy: configured origin, `GET,POST,OPTIONS`, `Content-Type, Authorization`
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(config.allowed_origin.clone())
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::{HeaderValue, StatusCode};
    use axum_test::TestServer;
    use pay_core::{
        CustomerRef, NewCustomer, NewPaymentIntent, PaymentError, PaymentIntentRef,
        PaymentMethodConfig, PaymentProcessor, PaymentResult,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockProcessor {
        customers: Mutex<Vec<NewCustomer>>,
        intents: Mutex<Vec<NewPaymentIntent>>,
        intent_error: Option<(u16, &'static str)>,
    }

    impl MockProcessor {
        fn calls(&self) -> usize {
            self.customers.lock().unwrap().len() + self.intents.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PaymentProcessor for MockProcessor {
        async fn create_customer(&self, customer: &NewCustomer) -> PaymentResult<CustomerRef> {
            self.customers.lock().unwrap().push(customer.clone());
            Ok(CustomerRef {
                id: "cus_123".to_string(),
            })
        }

        async fn create_payment_intent(
            &self,
            intent: &NewPaymentIntent,
        ) -> PaymentResult<PaymentIntentRef> {
            self.intents.lock().unwrap().push(intent.clone());
            if let Some((status, message)) = self.intent_error {
                return Err(PaymentError::provider(Some(status), message));
            }
            Ok(PaymentIntentRef {
                id: "pi_456".to_string(),
                client_secret: "pi_456_secret_789".to_string(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    fn server_with(processor: Arc<MockProcessor>, config: AppConfig) -> TestServer {
        let state = AppState::with_processor(config, processor);
        TestServer::new(create_router(state)).unwrap()
    }

    fn server(processor: Arc<MockProcessor>) -> TestServer {
        server_with(processor, AppConfig::default())
    }

    #[tokio::test]
    async fn test_health() {
        let server = server(Arc::new(MockProcessor::default()));

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_valid_request() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        let response = server
            .post("/api/pay")
            .json(&json!({ "amount": 1000, "currency": "usd", "email": "a@b.com" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "client_secret": "pi_456_secret_789",
                "customer_id": "cus_123",
                "payment_intent_id": "pi_456"
            })
        );

        let customers = processor.customers.lock().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "a@b.com");

        let intents = processor.intents.lock().unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].amount, 1000);
        assert_eq!(intents[0].currency, "usd");
        assert_eq!(intents[0].customer_id, "cus_123");
        assert_eq!(
            intents[0].metadata.get("customer_email").map(String::as_str),
            Some("a@b.com")
        );
        assert_eq!(intents[0].payment_methods, PaymentMethodConfig::CardOnly);
    }

    #[tokio::test]
    async fn test_automatic_payment_methods() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        let response = server
            .post("/api/pay")
            .json(&json!({
                "amount": 1000,
                "email": "a@b.com",
                "automatic_payment_methods": true
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let intents = processor.intents.lock().unwrap();
        assert_eq!(intents[0].payment_methods, PaymentMethodConfig::Automatic);
    }

    #[tokio::test]
    async fn test_invalid_amounts() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        for body in [
            json!({ "amount": 0, "email": "a@b.com" }),
            json!({ "amount": -100, "email": "a@b.com" }),
            json!({ "email": "a@b.com" }),
            json!({ "amount": null, "email": "a@b.com" }),
        ] {
            let response = server.post("/api/pay").json(&body).await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>(), json!({ "error": "Invalid amount" }));
        }

        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn test_wrongly_typed_field_still_reports_amount() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        for body in [
            json!({ "amount": 0, "email": 5 }),
            json!({ "amount": 0, "currency": 1, "email": "a@b.com" }),
        ] {
            let response = server.post("/api/pay").json(&body).await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>(), json!({ "error": "Invalid amount" }));
        }

        let response = server
            .post("/api/pay")
            .json(&json!({ "amount": 1000, "email": 5 }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Email is required" })
        );

        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn test_email_required() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        for body in [
            json!({ "amount": 1000 }),
            json!({ "amount": 1000, "email": "" }),
        ] {
            let response = server.post("/api/pay").json(&body).await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.json::<Value>(),
                json!({ "error": "Email is required" })
            );
        }

        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        for response in [
            server.get("/api/pay").await,
            server.put("/api/pay").await,
            server.delete("/api/pay").await,
        ] {
            assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                response.json::<Value>(),
                json!({ "error": "Method not allowed" })
            );
        }

        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn test_processor_error_status_passthrough() {
        let processor = Arc::new(MockProcessor {
            intent_error: Some((402, "Card declined")),
            ..Default::default()
        });
        let server = server(processor.clone());

        let response = server
            .post("/api/pay")
            .json(&json!({ "amount": 1000, "email": "a@b.com" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(response.json::<Value>(), json!({ "error": "Card declined" }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        let response = server.post("/api/pay").text("{not json").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn test_preflight() {
        let processor = Arc::new(MockProcessor::default());
        let server = server(processor.clone());

        let response = server.method(Method::OPTIONS, "/api/pay").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().is_empty());

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("*"))
        );

        let methods = headers
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        for method in ["GET", "POST", "OPTIONS"] {
            assert!(methods.contains(method), "allow-methods: {}", methods);
        }

        let allowed_headers = headers
            .get("access-control-allow-headers")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(allowed_headers.contains("content-type"));
        assert!(allowed_headers.contains("authorization"));

        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn test_configured_origin() {
        let config = AppConfig {
            allowed_origin: HeaderValue::from_static("https://shop.example.com"),
            ..Default::default()
        };
        let server = server_with(Arc::new(MockProcessor::default()), config);

        let response = server
            .post("/api/pay")
            .json(&json!({ "amount": 0, "email": "a@b.com" }))
            .await;

        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("https://shop.example.com"))
        );
    }

    #[tokio::test]
    async fn test_preflight_with_configured_origin() {
        let processor = Arc::new(MockProcessor::default());
        let config = AppConfig {
            allowed_origin: HeaderValue::from_static("https://shop.example.com"),
            ..Default::default()
        };
        let server = server_with(processor.clone(), config);

        let response = server.method(Method::OPTIONS, "/api/pay").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().is_empty());
        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("https://shop.example.com"))
        );
        assert_eq!(processor.calls(), 0);
    }
}
