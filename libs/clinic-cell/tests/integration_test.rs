use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clinic_cell::router::{clinic_routes, question_routes, tag_routes};
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};

fn app(config: &AppConfig) -> Router {
    let state = std::sync::Arc::new(config.clone());
    Router::new()
        .nest("/clinics", clinic_routes(state.clone()))
        .nest("/tags", tag_routes(state.clone()))
        .nest("/questions", question_routes(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, json)
}

fn request(method: &str, uri: &str, bearer: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_list_clinics_with_search() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_backend(mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");

    Mock::given(method("GET"))
        .and(path("/clinics"))
        .and(query_param("search", "city"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::list_response(
            vec![MockBackendResponses::clinic_response("c-1", "City Clinic")],
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bearer = JwtTestUtils::bearer(&patient, &config);
    let (status, body) = send(app(&config), request("GET", "/clinics?search=city&limit=5", &bearer, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "City Clinic");
    assert_eq!(body["limit"], 5);
}

#[tokio::test]
async fn test_writes_require_admin() {
    let config = TestConfig::default().to_app_config();
    let desk = TestUser::receptionist("desk@example.com");
    let bearer = JwtTestUtils::bearer(&desk, &config);

    let (status, _) = send(
        app(&config),
        request("POST", "/tags", &bearer, Some(json!({ "name": "Cardiology" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app(&config), request("DELETE", "/clinics/c-1", &bearer, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blank_names_are_rejected() {
    let config = TestConfig::default().to_app_config();
    let admin = TestUser::admin("admin@example.com");
    let bearer = JwtTestUtils::bearer(&admin, &config);

    let (status, body) = send(
        app(&config),
        request("POST", "/clinics", &bearer, Some(json!({ "name": "   " }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Clinic name is required");

    let (status, body) = send(
        app(&config),
        request("POST", "/questions", &bearer, Some(json!({ "content": "Any allergies?", "tagIds": [] }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A question must have at least one tag");
}

#[tokio::test]
async fn test_admin_creates_question() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_backend(mock_server.uri()).to_app_config();
    let admin = TestUser::admin("admin@example.com");

    Mock::given(method("POST"))
        .and(path("/questions"))
        .and(body_json(json!({
            "content": "Any allergies?",
            "tagIds": ["t-1"],
            "status": "ACTIVE"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockBackendResponses::question_response("q-1", "Any allergies?", &["t-1"]),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bearer = JwtTestUtils::bearer(&admin, &config);
    let (status, body) = send(
        app(&config),
        request("POST", "/questions", &bearer, Some(json!({ "content": "Any allergies?", "tagIds": ["t-1"] }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "q-1");
    assert_eq!(body["data"]["tagIds"][0], "t-1");
}

#[tokio::test]
async fn test_update_and_missing_record() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_backend(mock_server.uri()).to_app_config();
    let admin = TestUser::admin("admin@example.com");

    Mock::given(method("PUT"))
        .and(path("/tags/t-1"))
        .and(body_json(json!({ "status": "INACTIVE" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t-1", "name": "Cardiology", "status": "INACTIVE"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/clinics/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(MockBackendResponses::error_response("Not found", 404)))
        .mount(&mock_server)
        .await;

    let bearer = JwtTestUtils::bearer(&admin, &config);
    let (status, body) = send(
        app(&config),
        request("PUT", "/tags/t-1", &bearer, Some(json!({ "status": "INACTIVE" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "INACTIVE");

    let (status, body) = send(app(&config), request("GET", "/clinics/missing", &bearer, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Clinic not found");
}

#[tokio::test]
async fn test_status_labels() {
    let config = TestConfig::default().to_app_config();
    let admin = TestUser::admin("admin@example.com");

    let (status, body) = send(
        app(&config),
        request("GET", "/tags/statuses", &JwtTestUtils::bearer(&admin, &config), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statuses"][0]["key"], "ACTIVE");
    assert_eq!(body["statuses"][1]["label"], "Inactive");
}
