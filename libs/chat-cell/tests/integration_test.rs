use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_cell::models::ChatTokenClaims;
use chat_cell::router::chat_routes;
use shared_config::AppConfig;
use shared_utils::jwt::verify_hs256;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};

fn app(config: &AppConfig) -> Router {
    chat_routes(std::sync::Arc::new(config.clone()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, json)
}

fn request(method: &str, uri: &str, bearer: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_token_is_signed_for_caller() {
    let config = TestConfig::default().to_app_config();
    let patient = TestUser::patient("patient@example.com");

    let (status, body) = send(app(&config), request("POST", "/token", &JwtTestUtils::bearer(&patient, &config))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiKey"], "test-chat-key");
    assert_eq!(body["userId"], patient.id.as_str());

    let payload = verify_hs256(body["token"].as_str().unwrap(), &config.chat_api_secret).unwrap();
    let claims: ChatTokenClaims = serde_json::from_slice(&payload).unwrap();
    assert_eq!(claims.user_id, patient.id);
}

#[tokio::test]
async fn test_token_without_chat_config() {
    let mut config = TestConfig::default().to_app_config();
    config.chat_api_key = String::new();
    let patient = TestUser::patient("patient@example.com");

    let (status, body) = send(app(&config), request("POST", "/token", &JwtTestUtils::bearer(&patient, &config))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Chat service not configured");
}

#[tokio::test]
async fn test_appointment_channel_for_participants() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_backend(mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");

    Mock::given(method("GET"))
        .and(path("/appointments/apt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointment_response(
            "apt-1",
            &patient.id,
            "doc-1",
            Utc::now() + Duration::days(1),
            "UPCOMING",
        )))
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        app(&config),
        request("GET", "/channels/appointment/apt-1", &JwtTestUtils::bearer(&patient, &config)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["channelId"], "appointment-apt-1");
    assert_eq!(body["channelType"], "messaging");
    assert_eq!(body["members"][0], patient.id.as_str());
    assert_eq!(body["members"][1], "doc-1");

    let stranger = TestUser::patient("stranger@example.com");
    let (status, _) = send(
        app(&config),
        request("GET", "/channels/appointment/apt-1", &JwtTestUtils::bearer(&stranger, &config)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_is_public() {
    let config = TestConfig::default().to_app_config();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app(&config), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], true);
}
