use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_test::TestServer;
use chat_widget::AppState;
use chat_widget::config::{AppConfig, KnowledgeConfig, ServerConfig, WidgetConfig};
use chat_widget::knowledge::{ChatReply, KnowledgeBase, Responder};
use chat_widget::knowledge::responder::{DISCLAIMER_NOTE, EMPTY_MESSAGE_REPLY, NO_MATCH_REPLY};
use chat_widget::widget::HtmlPolicy;
use serde_json::json;
use tower::ServiceExt;

fn write_fixture(dir: &Path) {
    fs::write(
        dir.join("dataset.csv"),
        "Disease,Symptom_1,Symptom_2,Symptom_3\n\
         Migraine, headache, blurred_and_distorted_vision, nausea\n\
         Common Cold, continuous_sneezing, chills, headache\n\
         Common Cold, runny_nose, chills,\n",
    )
    .unwrap();
    fs::write(
        dir.join("symptom_Description.csv"),
        "Disease,Description\n\
         Migraine,\"A headache, often one-sided.\"\n\
         Common Cold,A viral infection of the nose and throat.\n",
    )
    .unwrap();
    fs::write(
        dir.join("symptom_precaution.csv"),
        "Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4\n\
         Migraine,meditation,reduce stress,,\n",
    )
    .unwrap();
    fs::write(
        dir.join("Symptom-severity.csv"),
        "Symptom,weight\n\
         headache,3\n\
         blurred_and_distorted_vision,5\n\
         nausea,5\n\
         continuous_sneezing,4\n\
         chills,3\n\
         runny_nose,5\n",
    )
    .unwrap();
}

fn test_config(data_dir: PathBuf, html_policy: HtmlPolicy) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".into(),
            static_dir: "static".into(),
            timeout_disabled: false,
            request_timeout_secs: 30,
        },
        widget: WidgetConfig {
            endpoint_url: "http://127.0.0.1:3000/chat".into(),
            page_endpoint_url: "/api/chat".into(),
            reply_delay_min_ms: 250,
            reply_delay_max_ms: 750,
            html_policy,
            composer_max_height_px: None,
        },
        knowledge: KnowledgeConfig { data_dir },
    }
}

fn state_for(config: AppConfig) -> AppState {
    let kb = KnowledgeBase::load_or_empty(&config.knowledge.data_dir);
    AppState {
        responder: Arc::new(Responder::new(kb)),
        config: Arc::new(config),
    }
}

fn server_for(config: AppConfig) -> TestServer {
    TestServer::new(chat_widget::server::build_router(state_for(config))).unwrap()
}

fn fixture_server() -> (TestServer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let server = server_for(test_config(dir.path().to_path_buf(), HtmlPolicy::Verbatim));
    (server, dir)
}

#[tokio::test]
async fn test_index_serves_widget_page() {
    let (server, _dir) = fixture_server();

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains(r#"data-chat-url="/api/chat""#));
    assert!(html.contains(r#"data-reply-delay-min="250""#));
    assert!(html.contains(r#"data-reply-delay-max="750""#));
    assert!(html.contains(r#"data-html-policy="verbatim""#));
    assert!(html.contains(r#"id="chat-box""#));
    assert!(html.contains(r#"id="user-input""#));
    assert!(html.contains(r#"id="send-btn""#));
    assert!(html.contains(r#"id="typing-indicator""#));
}

#[tokio::test]
async fn test_chat_matches_condition() {
    let (server, _dir) = fixture_server();

    let response = server
        .post("/chat")
        .json(&json!({ "message": "I have a headache and nausea" }))
        .await;
    response.assert_status_ok();
    let reply: ChatReply = response.json();

    assert_eq!(reply.top_disease_suggestion.as_deref(), Some("Migraine"));
    assert!(reply.reply.contains("<strong>Migraine</strong>"));
    assert!(reply.reply.contains("A headache, often one-sided."));
    assert!(reply.reply.contains("<li>meditation</li><li>reduce stress</li>"));
    assert!(reply.reply.ends_with(DISCLAIMER_NOTE));
}

#[tokio::test]
async fn test_chat_greeting() {
    let (server, _dir) = fixture_server();

    let reply: ChatReply = server
        .post("/chat")
        .json(&json!({ "message": "Hello" }))
        .await
        .json();

    assert!(reply.reply.starts_with("Hello! How can I help you today?"));
    assert_eq!(reply.top_disease_suggestion, None);
}

#[tokio::test]
async fn test_chat_without_message_field() {
    let (server, _dir) = fixture_server();

    let reply: ChatReply = server.post("/chat").json(&json!({})).await.json();
    assert_eq!(reply.reply, EMPTY_MESSAGE_REPLY);
}

#[tokio::test]
async fn test_chat_no_match() {
    let (server, _dir) = fixture_server();

    let reply: ChatReply = server
        .post("/chat")
        .json(&json!({ "message": "my elbow clicks" }))
        .await
        .json();

    assert!(reply.reply.starts_with(NO_MATCH_REPLY));
    assert_eq!(reply.top_disease_suggestion, None);
}

#[tokio::test]
async fn test_missing_data_dir_serves_empty_knowledge_base() {
    let dir = tempfile::tempdir().unwrap();
    let server = server_for(test_config(dir.path().join("absent"), HtmlPolicy::Verbatim));

    let reply: ChatReply = server
        .post("/chat")
        .json(&json!({ "message": "headache" }))
        .await
        .json();
    assert!(reply.reply.starts_with(NO_MATCH_REPLY));
}

#[tokio::test]
async fn test_chat_rejects_non_json_body() {
    let (server, _dir) = fixture_server();

    let response = server.post("/chat").text("headache").expect_failure().await;
    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_page_reflects_html_policy() {
    let dir = tempfile::tempdir().unwrap();
    let server = server_for(test_config(dir.path().to_path_buf(), HtmlPolicy::EscapeAll));

    let html = server.get("/").await.text();
    assert!(html.contains(r#"data-html-policy="escape_all""#));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = chat_widget::server::build_router(state_for(test_config(
        dir.path().to_path_buf(),
        HtmlPolicy::Verbatim,
    )));

    let body = json!({ "message": "a".repeat(128 * 1024) }).to_string();
    let response = app
        .oneshot(
            Request::post("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_page_posts_to_configured_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path().to_path_buf(), HtmlPolicy::Verbatim);
    config.widget.page_endpoint_url = "https://api.example.com/v1/chat?a=1&b=2".into();
    let server = server_for(config);

    let html = server.get("/").await.text();
    assert!(html.contains(r#"data-chat-url="https://api.example.com/v1/chat?a=1&amp;b=2""#));
    assert!(!html.contains(r#"data-chat-url="/chat""#));
}
