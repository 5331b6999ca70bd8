//! Chat Widget
//!
//! A chat panel that appends user and bot bubbles, grows its input to fit,
//! shows a typing indicator and posts each message to a single JSON chat
//! endpoint, plus the symptom-checker server that answers it.
//!
//! # Architecture
//!
//! - **Widget**: [`widget::ChatWidget`] controller over a [`widget::ChatView`]
//!   (the DOM contract) and a [`widget::ChatEndpoint`] (the network seam)
//! - **Server**: Axum app serving the chat page and `POST /chat`
//! - **Knowledge**: CSV-backed conditions, symptom matching and replies
//! - **Console**: terminal binding of the widget
//!
//! # Modules
//!
//! - [`widget`]: controller, messages, composer, view and endpoint
//! - [`knowledge`]: knowledge base and responder
//! - [`server`]: router and handlers
//! - [`ui`]: server-rendered page
//! - [`console`]: terminal front-end

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod console;
pub mod error;
pub mod knowledge;
pub mod server;
pub mod telemetry;
pub mod ui;
pub mod widget;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::knowledge::Responder;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Symptom-checker answering `/chat`.
    pub responder: Arc<Responder>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
