use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use chat_widget::AppState;
use chat_widget::config::AppConfig;
use chat_widget::error::ChatError;
use chat_widget::knowledge::Responder;
use chat_widget::widget::message::fallback_bubble;
use chat_widget::widget::{
    ChatEndpoint, ChatWidget, DomModel, HttpChatEndpoint, Sender, SendOutcome, WidgetOptions,
};
use serde_json::{Value, json};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "not json" })));
    }
    let message = body["message"].as_str().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({ "reply": format!("<b>{message}</b>"), "extra": true })),
    )
}

fn stub_app() -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route(
            "/fail",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/wrong-shape",
            post(|| async { Json(json!({ "answer": "hi" })) }),
        )
        .route("/not-json", post(|| async { "plain text" }))
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "reply": "late" }))
            }),
        )
}

fn endpoint(addr: SocketAddr, path: &str) -> HttpChatEndpoint {
    HttpChatEndpoint::new(url::Url::parse(&format!("http://{addr}{path}")).unwrap())
}

#[tokio::test]
async fn test_posts_json_and_reads_reply() {
    let addr = spawn(stub_app()).await;

    let reply = endpoint(addr, "/echo").send("hi there").await.unwrap();
    assert_eq!(reply, "<b>hi there</b>");
}

#[tokio::test]
async fn test_non_success_status_is_server_error() {
    let addr = spawn(stub_app()).await;

    let err = endpoint(addr, "/fail").send("hi").await.unwrap_err();
    assert_eq!(err, ChatError::ServerError { status: 500 });

    let err = endpoint(addr, "/missing").send("hi").await.unwrap_err();
    assert_eq!(err, ChatError::ServerError { status: 404 });
}

#[tokio::test]
async fn test_unexpected_body_is_malformed() {
    let addr = spawn(stub_app()).await;

    let err = endpoint(addr, "/wrong-shape").send("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::MalformedResponse(_)));

    let err = endpoint(addr, "/not-json").send("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = endpoint(addr, "/chat").send("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::NetworkFailure(_)));
}

#[tokio::test]
async fn test_timeout_is_network_failure() {
    let addr = spawn(stub_app()).await;
    let url = url::Url::parse(&format!("http://{addr}/slow")).unwrap();

    let endpoint = HttpChatEndpoint::with_timeout(url, Duration::from_millis(100)).unwrap();
    let err = endpoint.send("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::NetworkFailure(_)));
}

#[tokio::test]
async fn test_widget_renders_fallback_on_http_500() {
    let addr = spawn(stub_app()).await;
    let widget = ChatWidget::new(
        DomModel::new(),
        endpoint(addr, "/fail"),
        WidgetOptions::immediate(),
    );
    widget.mount();
    widget.on_input("anyone there?");

    let outcome = widget.send_message().await;
    assert_eq!(
        outcome,
        SendOutcome::Failed(ChatError::ServerError { status: 500 })
    );
    widget.with_view(|dom| {
        assert_eq!(dom.rows().len(), 2);
        assert_eq!(dom.last_row().unwrap().bubble, fallback_bubble());
        assert!(!dom.typing_visible());
    });
}

#[tokio::test]
async fn test_widget_against_chat_server() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from_args([
        "chat-widget",
        "--data-dir",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();
    let state = AppState {
        responder: Arc::new(Responder::default()),
        config: Arc::new(config),
    };
    let addr = spawn(chat_widget::server::build_router(state)).await;

    let widget = ChatWidget::new(
        DomModel::new(),
        endpoint(addr, "/chat"),
        WidgetOptions::immediate(),
    );
    widget.mount();
    widget.on_input("hi");

    assert_eq!(widget.send_message().await, SendOutcome::Replied);
    widget.with_view(|dom| {
        let bot = dom.rows_from(Sender::Bot).last().unwrap();
        assert!(bot.bubble.starts_with("Hello! How can I help you today?"));
    });
}
