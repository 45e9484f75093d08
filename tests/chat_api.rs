// tests/chat_api.rs
// End-to-end behaviour of POST /api/chat and GET /health against a scripted backend


use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use folio_relay::persona::PersonaOverlay;
use folio_relay::relay::SAFETY_APOLOGY;
use test_helpers::{app, get, post_chat, settings, ScriptedBackend, Step};

fn ordered_backend() -> ScriptedBackend {
    // override "o", preferred p1 (unavailable) and p2, remaining r1
    ScriptedBackend::new(&["p2", "r1"])
}

#[tokio::test]
async fn test_invalid_bodies_never_reach_the_model() {
    let backend = Arc::new(ScriptedBackend::new(&["m"]).otherwise(Step::Text("hi")));
    let app = app(backend.clone(), settings(None, &["m"]), false);

    for body in [
        r#"{}"#,
        r#"{"message": ""}"#,
        r#"{"message": "   \n\t"}"#,
        r#"{"message": 7}"#,
        r#"{"message": null}"#,
        r#"["message"]"#,
        r#"{not:json"#,
    ] {
        let (status, json) = post_chat(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json, json!({"error": "Invalid message"}), "body {body}");
    }

    assert_eq!(backend.total_remote_calls(), 0);
}

#[tokio::test]
async fn test_single_character_message_is_accepted() {
    let backend = Arc::new(ScriptedBackend::new(&["m"]).on("m", Step::Text("pong")));
    let app = app(backend.clone(), settings(None, &["m"]), false);

    let (status, json) = post_chat(&app, r#"{"message": " ? "}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"reply": "pong"}));
    assert_eq!(backend.calls(), vec!["m"]);
}

#[tokio::test]
async fn test_falls_back_past_not_found_in_order() {
    let backend = Arc::new(
        ordered_backend()
            .on("o", Step::NotFound)
            .on("p2", Step::Fail(400, "Model is not supported for generateContent"))
            .on("r1", Step::Text("third time lucky")),
    );
    let app = app(backend.clone(), settings(Some("o"), &["p1", "p2"]), false);

    let (status, json) = post_chat(&app, r#"{"message": "hello"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "third time lucky");
    assert_eq!(backend.calls(), vec!["o", "p2", "r1"]);
}

#[tokio::test]
async fn test_non_not_found_error_stops_immediately() {
    let backend = Arc::new(
        ordered_backend()
            .on("o", Step::Fail(429, "Resource has been exhausted"))
            .otherwise(Step::Text("never used")),
    );
    let app = app(backend.clone(), settings(Some("o"), &["p1", "p2"]), false);

    let (status, json) = post_chat(&app, r#"{"message": "hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("Tried models: o"), "{error}");
    assert!(error.contains("429"), "{error}");
    assert_eq!(backend.calls(), vec!["o"]);
}

#[tokio::test]
async fn test_production_hides_error_detail() {
    let backend = Arc::new(ordered_backend().otherwise(Step::Fail(403, "API key not valid")));
    let app = app(backend.clone(), settings(None, &["p2"]), true);

    let (status, json) = post_chat(&app, r#"{"message": "hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Something went wrong"}));
}

#[tokio::test]
async fn test_safety_block_returns_apology_without_more_calls() {
    let backend = Arc::new(
        ordered_backend()
            .on("p2", Step::Blocked)
            .otherwise(Step::Text("should not be reached")),
    );
    let app = app(backend.clone(), settings(None, &["p2"]), false);

    let (status, json) = post_chat(&app, r#"{"message": "something rude"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], SAFETY_APOLOGY);
    assert_eq!(backend.calls(), vec!["p2"]);
}

#[tokio::test]
async fn test_all_empty_is_bad_gateway() {
    let backend = Arc::new(ordered_backend().otherwise(Step::Empty));
    let app = app(backend.clone(), settings(None, &["p2"]), false);

    let (status, json) = post_chat(&app, r#"{"message": "hello"}"#).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json, json!({"error": "Empty response from model"}));
    assert_eq!(backend.calls(), vec!["p2", "r1"]);
}

#[tokio::test]
async fn test_exhausted_candidates_reports_every_failure() {
    let backend = Arc::new(
        ordered_backend()
            .on("p2", Step::Empty)
            .on("r1", Step::NotFound),
    );
    let app = app(backend.clone(), settings(None, &["p2"]), false);

    let (status, json) = post_chat(&app, r#"{"message": "hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("p2: empty response"), "{error}");
    assert!(error.contains("r1: 404"), "{error}");
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let backend = Arc::new(
        ordered_backend()
            .on("o", Step::NotFound)
            .on("p2", Step::Text("steady")),
    );
    let app = app(backend.clone(), settings(Some("o"), &["p2"]), false);

    let first = post_chat(&app, r#"{"message": "same"}"#).await;
    let calls_after_first = backend.calls();
    let second = post_chat(&app, r#"{"message": "same"}"#).await;
    let all_calls = backend.calls();

    assert_eq!(first, second);
    assert_eq!(calls_after_first, vec!["o", "p2"]);
    assert_eq!(&all_calls[2..], calls_after_first.as_slice());
    // Discovery is cached after the first request
    assert_eq!(backend.list_calls(), 1);
}

#[tokio::test]
async fn test_failed_discovery_uses_preferred_list() {
    let backend = Arc::new(
        ScriptedBackend::failing_discovery()
            .on("p1", Step::NotFound)
            .on("p2", Step::Text("from preferred")),
    );
    let app = app(backend.clone(), settings(None, &["p1", "p2"]), false);

    let (status, json) = post_chat(&app, r#"{"message": "hello"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "from preferred");
    assert_eq!(backend.calls(), vec!["p1", "p2"]);
}

#[tokio::test]
async fn test_persona_answers_in_first_person() {
    let backend = Arc::new(ScriptedBackend::new(&["m"]).otherwise(Step::EchoPersona));
    let mut persona = settings(None, &["m"]);
    persona.template.system_instruction = PersonaOverlay::Portfolio.prompt().map(Arc::from);
    let app = app(backend.clone(), persona, false);

    let (status, json) = post_chat(&app, r#"{"message": "What did you build at Claro AI?"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let reply = json["reply"].as_str().unwrap();
    assert!(reply.starts_with("I built"), "{reply}");
    assert!(reply.contains("Claro AI"));
}

#[tokio::test]
async fn test_plain_mode_has_no_persona() {
    let backend = Arc::new(ScriptedBackend::new(&["m"]).otherwise(Step::EchoPersona));
    let app = app(backend.clone(), settings(None, &["m"]), false);

    let (_, json) = post_chat(&app, r#"{"message": "What did you build at Claro AI?"}"#).await;

    assert!(json["reply"].as_str().unwrap().starts_with("The portfolio owner"));
}

#[tokio::test]
async fn test_health_lists_models() {
    let backend = Arc::new(ScriptedBackend::new(&["gemini-1.5-flash", "gemini-pro"]));
    let app = app(backend.clone(), settings(None, &[]), false);

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"ok": true, "models": ["gemini-1.5-flash", "gemini-pro"]}));
}

#[tokio::test]
async fn test_health_reports_discovery_failure() {
    let backend = Arc::new(ScriptedBackend::failing_discovery());
    let app = app(backend.clone(), settings(None, &[]), false);

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().starts_with("ListModels failed"));
}
