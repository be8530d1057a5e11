mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{profile, ProfileBehaviour, RecordingGateway, TestApp, TEST_ORIGIN};
use serde_json::json;
use service_core::middleware::REQUEST_ID_HEADER;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_needs_no_credentials() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "status": "healthy" }));
    assert!(app.verifier.seen().is_empty());
}

#[tokio::test]
async fn phrase_request_flows_through_every_stage() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let (status, body) = app
        .post(
            "/api/random-phrase",
            Some("Bearer abc123"),
            r#"{"words":["sun","run"]}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["words"], json!(["sun", "run"]));
    assert!(body["phrase"].as_str().unwrap().contains("sun"));

    assert_eq!(app.verifier.seen(), vec!["abc123"]);
    assert_eq!(
        app.profiles.calls(),
        vec![("u1".to_string(), "abc123".to_string())]
    );

    let calls = app.gateway.phrase_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].words, vec!["sun", "run"]);
    assert_eq!(calls[0].user_context, "");
}

#[tokio::test]
async fn phrase_uses_profile_context() {
    let app = TestApp::new(ProfileBehaviour::Present(profile(
        "I am a chef",
        "English",
        "French",
    )));

    let (status, _) = app
        .post("/api/random-phrase", Some("Bearer abc123"), r#"{"words":["knife"]}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.gateway.phrase_calls()[0].user_context, "I am a chef");
}

#[tokio::test]
async fn header_without_scheme_is_used_whole() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let (status, _) = app
        .post("/api/random-phrase", Some("abc123"), r#"{"words":["sun"]}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.verifier.seen(), vec!["abc123"]);
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let (status, body) = app
        .post("/api/random-phrase", None, r#"{"words":["sun"]}"#)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header is required");
    assert!(app.verifier.seen().is_empty());
    assert!(app.gateway.phrase_calls().is_empty());
}

#[tokio::test]
async fn rejected_token_is_unauthorized_and_stops_the_pipeline() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let (status, body) = app
        .post(
            "/api/translate",
            Some("Bearer not-a-token"),
            r#"{"word":"hello"}"#,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("invalid JWT"));
    assert!(app.profiles.calls().is_empty());
    assert!(app.gateway.translate_calls().is_empty());
}

#[tokio::test]
async fn malformed_phrase_bodies_are_bad_requests_without_external_calls() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    for body in [
        r#"{"words":[]}"#,
        r#"{"words":"x"}"#,
        r#"{"words":[""]}"#,
        r#"{}"#,
        "not json",
        "",
    ] {
        let (status, response) = app
            .post("/api/random-phrase", Some("Bearer abc123"), body)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(response["error"].is_string(), "body: {body}");
    }

    assert!(app.verifier.seen().is_empty());
    assert!(app.profiles.calls().is_empty());
    assert!(app.gateway.phrase_calls().is_empty());
}

#[tokio::test]
async fn malformed_translate_bodies_are_bad_requests() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    for body in [r#"{"word":""}"#, r#"{}"#, r#"{"word":42}"#] {
        let (status, _) = app
            .post("/api/translate", Some("Bearer abc123"), body)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }

    assert!(app.verifier.seen().is_empty());
    assert!(app.gateway.translate_calls().is_empty());
}

#[tokio::test]
async fn translation_languages_come_from_profile() {
    let app = TestApp::new(ProfileBehaviour::Present(profile(
        "Loves football",
        "French",
        "German",
    )));

    let (status, body) = app
        .post("/api/translate", Some("Bearer abc123"), r#"{"word":"ball"}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_language"], "French");
    assert_eq!(body["target_language"], "German");

    let call = &app.gateway.translate_calls()[0];
    assert_eq!(call.word, "ball");
    assert_eq!(call.source_language, "French");
    assert_eq!(call.target_language, "German");
    assert_eq!(call.user_context, "Loves football");
}

#[tokio::test]
async fn translation_defaults_without_profile() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let (status, body) = app
        .post("/api/translate", Some("Bearer abc123"), r#"{"word":"hi"}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    let call = &app.gateway.translate_calls()[0];
    assert_eq!(call.source_language, "English");
    assert_eq!(call.target_language, "Spanish");

    assert_eq!(body["primary_translation"], "hola");
    assert_eq!(body["alternative_translations"], json!(["buenas"]));
    assert_eq!(body["examples"][0]["translation"], "Hello, how are you?");
    assert_eq!(body["notes"], "");
}

#[tokio::test]
async fn explicit_language_overrides_profile() {
    let app = TestApp::new(ProfileBehaviour::Present(profile("", "French", "German")));

    let (status, _) = app
        .post(
            "/api/translate",
            Some("Bearer abc123"),
            r#"{"word":"hi","target_language":"Italian"}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let call = &app.gateway.translate_calls()[0];
    assert_eq!(call.source_language, "French");
    assert_eq!(call.target_language, "Italian");
}

#[tokio::test]
async fn profile_store_failure_degrades_to_defaults() {
    let app = TestApp::new(ProfileBehaviour::Failing);

    let (status, body) = app
        .post("/api/translate", Some("Bearer abc123"), r#"{"word":"hi"}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_language"], "English");
    assert_eq!(body["target_language"], "Spanish");
    assert_eq!(app.profiles.calls().len(), 1);
    assert_eq!(app.gateway.translate_calls()[0].user_context, "");
}

#[tokio::test]
async fn generation_failure_is_a_server_error() {
    let app = TestApp::with_gateway(
        ProfileBehaviour::Absent,
        RecordingGateway::failing("model overloaded"),
    );

    let (status, body) = app
        .post("/api/random-phrase", Some("Bearer abc123"), r#"{"words":["sun"]}"#)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("An error occurred"));
    assert!(message.contains("model overloaded"));
    assert!(body.get("phrase").is_none());
}

#[tokio::test]
async fn cors_preflight_is_answered_without_credentials() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/translate")
                .header("origin", TEST_ORIGIN)
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "authorization,content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        TEST_ORIGIN
    );
    assert_eq!(
        response.headers()["access-control-allow-credentials"],
        "true"
    );
    assert!(app.verifier.seen().is_empty());
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = TestApp::new(ProfileBehaviour::Absent);

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
