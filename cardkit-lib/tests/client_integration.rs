//! Integration tests for the HTTP client session.
//!
//! These tests run the session against a mock client API server.
//!
//! ```bash
//! cargo test -p cardkit-lib --features http-client --test client_integration
//! ```

#![cfg(feature = "http-client")]

use cardkit_lib::client::Session;
use cardkit_lib::config::SessionConfig;
use cardkit_lib::context::PaymentContext;
use cardkit_lib::iin::IinStatus;
use cardkit_lib::request::PaymentRequest;
use cardkit_lib::test_utils::{fixtures, TestKeyPair};
use cardkit_lib::{CardkitErrorCode, PaymentProductId};
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const AUTH: &str = "GCS v1Client:session-abc";

fn session(server: &MockServer) -> Session<cardkit_lib::client::HttpTransport> {
    let config = SessionConfig::new("session-abc", "1234", server.uri()).with_timeout(5);
    Session::connect(config).unwrap()
}

fn context() -> PaymentContext {
    PaymentContext::new(1298, "EUR", "NL")
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_products_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/client/v1/1234/products"))
        .and(header("Authorization", AUTH))
        .and(query_param("countryCode", "NL"))
        .and(query_param("currencyCode", "EUR"))
        .and(query_param("amount", "1298"))
        .and(query_param("isRecurring", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::product_list_json()))
        .expect(1)
        .mount(&server)
        .await;

    let products = session(&server)
        .basic_payment_products(&context())
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    let order: Vec<PaymentProductId> = products.in_display_order().iter().map(|p| p.id).collect();
    assert_eq!(order, vec![PaymentProductId(1), PaymentProductId(3)]);
    assert_eq!(products.accounts_on_file().len(), 1);
}

#[tokio::test]
async fn test_product_with_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/client/v1/1234/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::visa_product_json()))
        .mount(&server)
        .await;

    let product = session(&server)
        .payment_product(PaymentProductId(1), &context())
        .await
        .unwrap();

    let ids: Vec<&str> = product
        .fields_in_display_order()
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(ids, vec!["cardNumber", "expiryDate", "cvv", "cardholderName"]);
}

#[tokio::test]
async fn test_unauthorized_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/client/v1/1234/products"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errorId": "c1b3b2a0",
            "errors": [{ "id": "ACCESS_TO_MERCHANT_NOT_ALLOWED", "message": "session expired" }]
        })))
        .mount(&server)
        .await;

    let err = session(&server)
        .basic_payment_products(&context())
        .await
        .unwrap_err();
    assert_eq!(err.code(), CardkitErrorCode::Auth);
    assert!(err.to_string().contains("session expired"));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/client/v1/1234/products"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = session(&server)
        .basic_payment_products(&context())
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.retry_after_ms(), Some(5000));
}

// ============================================================================
// IIN details
// ============================================================================

#[tokio::test]
async fn test_iin_details_sends_prefix_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/client/v1/1234/services/getIINdetails"))
        .and(body_partial_json(serde_json::json!({
            "bin": "45673500",
            "paymentContext": { "countryCode": "NL" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paymentProductId": 1,
            "countryCode": "NL",
            "isAllowedInContext": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let details = session(&server)
        .iin_details("4567 3500 0042 7977", &context())
        .await
        .unwrap();
    assert_eq!(details.status, IinStatus::Supported);
}

#[tokio::test]
async fn test_iin_details_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/client/v1/1234/services/getIINdetails"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "errors": [{ "id": "IIN_NOT_FOUND" }]
        })))
        .mount(&server)
        .await;

    let details = session(&server)
        .iin_details("999999", &context())
        .await
        .unwrap();
    assert_eq!(details.status, IinStatus::Unknown);
}

// ============================================================================
// Public key and preparation
// ============================================================================

#[tokio::test]
async fn test_prepare_fetches_public_key_once() {
    let server = MockServer::start().await;
    let keys = TestKeyPair::generate("86b64e4e-f43e-4a27-9863-9bbd5b499f82");

    Mock::given(method("GET"))
        .and(path("/client/v1/1234/crypto/publickey"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(keys.public_key()))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server);
    let mut request = PaymentRequest::new(fixtures::visa_product());
    request.set_value("cardNumber", fixtures::VISA_CARD_NUMBER).unwrap();
    request.set_value("expiryDate", "12/49").unwrap();
    request.set_value("cvv", "123").unwrap();

    for _ in 0..2 {
        let prepared = session.prepare_payment_request(&request).await.unwrap();
        let input: serde_json::Value =
            serde_json::from_slice(&keys.open(&prepared.encrypted_customer_input).unwrap())
                .unwrap();
        assert_eq!(input["clientSessionId"], "session-abc");
    }
}
