use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::knowledge::{ChatReply, KnowledgeBase, Responder};
use crate::ui::{self, PageContext};
use crate::widget::endpoint::ChatRequest;
use crate::widget::message::current_time;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let responder = Responder::new(KnowledgeBase::load_or_empty(&config.knowledge.data_dir));
    let conditions = responder.knowledge_base().len();
    if responder.knowledge_base().is_empty() {
        tracing::warn!("Chatbot starting with an empty knowledge base");
    }

    let state = AppState {
        responder: Arc::new(responder),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        conditions,
        page_endpoint = %config.widget.page_endpoint_url,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Routes, static assets and middleware.
pub fn build_router(state: AppState) -> Router {
    // A disabled timeout becomes a very long one so the layer stack keeps
    // one type.
    let timeout_duration = if state.config.server.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(state.config.server.request_timeout_secs)
    };

    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .nest_service("/static", ServeDir::new(&state.config.server.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Chat page with the greeting stamped server-side.
async fn index(State(state): State<AppState>) -> Html<String> {
    let widget = &state.config.widget;
    let ctx = PageContext {
        chat_url: widget.page_endpoint_url.clone(),
        reply_delay: widget.options().reply_delay,
        html_policy: widget.html_policy,
        timestamp: current_time(),
    };
    Html(ui::render_index(&ctx))
}

/// POST /chat - Reply to one user message.
async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatReply> {
    tracing::info!(
        message_length = req.message.len(),
        "Received chat request"
    );

    let reply = state.responder.reply(&req.message);

    tracing::debug!(
        top_disease_suggestion = ?reply.top_disease_suggestion,
        reply_length = reply.reply.len(),
        "Chat reply composed"
    );

    Json(reply)
}
