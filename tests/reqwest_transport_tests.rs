//! `ReqwestTransport` exercised against a local mock HTTP server, end to end
//! through `ChatModel::call`.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemini_chat::{
    BasicRequestValidator, ChatModel, ChatRequest, MapOutcome, ReqwestTransport, RequestBody,
};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn model() -> ChatModel {
    ChatModel::new(
        Arc::new(ReqwestTransport::new()),
        Arc::new(BasicRequestValidator),
    )
}

fn request_against(server: &MockServer) -> ChatRequest {
    ChatRequest::new(
        format!("{}{}", server.uri(), GENERATE_PATH),
        RequestBody::from_text("What is 2 + 2?"),
    )
}

#[tokio::test]
async fn maps_a_successful_upstream_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-served-by", "mock-upstream")
                .set_body_raw(
                    r#"{
                        "candidates": [{"content": {"parts": [{"text": "4"}]}}],
                        "usageMetadata": {"promptTokenCount": 5},
                        "model": "gemini-2.0-flash"
                    }"#,
                    "application/json",
                ),
        )
        .mount(&server)
        .await;

    let response = model().call(&request_against(&server)).await.unwrap();

    assert!(response.is_successful());
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get("x-served-by").map(String::as_str),
        Some("mock-upstream")
    );
    assert_eq!(response.text().as_deref(), Some("4"));
    assert_eq!(response.body().model_version(), "gemini-2.0-flash");
    assert_eq!(
        response.body().usage_metadata().and_then(|u| u.get("promptTokenCount")),
        Some(5)
    );
}

#[tokio::test]
async fn sends_the_expected_outbound_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let request = request_against(&server)
        .with_api_key("test-key")
        .with_header("Authorization", "Bearer leaked")
        .with_header("X-Custom", "Y");
    model().call(&request).await.unwrap();

    let received = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(received.len(), 1);
    let sent = &received[0];

    assert_eq!(sent.url.path(), GENERATE_PATH);
    assert_eq!(sent.url.query(), Some("key=test-key"));
    assert!(sent.headers.get("authorization").is_none());
    assert_eq!(
        sent.headers.get("x-custom").and_then(|v| v.to_str().ok()),
        Some("Y")
    );
    assert_eq!(
        sent.headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let body: serde_json::Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"contents": [{"parts": [{"text": "What is 2 + 2?"}]}]})
    );
}

#[tokio::test]
async fn non_2xx_upstream_status_is_not_successful() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string(r#"{"error": {"message": "quota exceeded"}}"#),
        )
        .mount(&server)
        .await;

    let response = model().call(&request_against(&server)).await.unwrap();

    assert!(!response.is_successful());
    assert_eq!(response.status_code(), 429);
    assert!(response.error_message().unwrap().contains("quota exceeded"));
    assert!(response.body().candidates().is_empty());
}

#[tokio::test]
async fn connection_failure_synthesizes_an_error_response() {
    // Grab a port from a throwaway listener, then release it so the
    // connection is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("read local addr");
    drop(listener);
    let dead_endpoint = format!("http://{addr}{GENERATE_PATH}");

    let request = ChatRequest::new(dead_endpoint, RequestBody::from_text("hi"));
    let response = model()
        .call(&request)
        .await
        .expect("network failure must not surface as an error");

    assert!(!response.is_successful());
    assert_eq!(response.status_code(), 500);
    assert_eq!(response.body().outcome(), MapOutcome::Synthesized);
    assert_eq!(response.body().model_version(), "gemini-flash-1.5");
    assert_eq!(response.body().candidates().len(), 1);
    assert!(!response.body().candidates()[0].text().is_empty());
}
