//! Chat widget controller.
//!
//! [`ChatWidget`] owns the composer state and drives a [`ChatView`] (the
//! message list, input, send control and typing indicator) plus a
//! [`ChatEndpoint`] for the network round-trip. Both are passed in at
//! construction; the widget holds no global state.
//!
//! # Send cycle
//!
//! `Idle → Sending → (Replied | Failed) → Idle`. Only one cycle may be in
//! flight: the widget claims an atomic flag before touching the view and
//! releases it when the cycle ends, so a send control re-enabled from the
//! outside cannot start a second request.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::widget::{ChatWidget, DomModel, KeyPress, SendOutcome, WidgetOptions};
//! use chat_widget::widget::endpoint::ChatEndpoint;
//! use chat_widget::error::ChatError;
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl ChatEndpoint for Echo {
//!     async fn send(&self, message: &str) -> Result<String, ChatError> {
//!         Ok(format!("<p>{message}</p>"))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let widget = ChatWidget::new(DomModel::new(), Echo, WidgetOptions::immediate());
//! widget.mount();
//! widget.on_input("hello");
//! let outcome = widget.on_key(KeyPress::enter()).await;
//! assert!(matches!(outcome.sent(), Some(SendOutcome::Replied)));
//! # }
//! ```

pub mod composer;
pub mod delay;
pub mod endpoint;
pub mod message;
pub mod view;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Deserialize;

use crate::error::ChatError;

pub use composer::{Composer, ComposerMetrics};
pub use delay::ReplyDelay;
pub use endpoint::{ChatEndpoint, HttpChatEndpoint};
pub use message::{FALLBACK_REPLY, Message, MessageRow, Sender};
pub use view::{ChatView, DomModel, DomRow};

/// How message text is treated before insertion into the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlPolicy {
    /// Insert user and bot text as-is.
    #[default]
    Verbatim,
    /// Escape the user's draft; bot replies stay HTML.
    EscapeUserInput,
    /// Escape both.
    EscapeAll,
}

impl HtmlPolicy {
    fn user_text(self, text: &str) -> String {
        match self {
            Self::Verbatim => text.to_string(),
            Self::EscapeUserInput | Self::EscapeAll => message::escape_html(text),
        }
    }

    fn bot_text(self, text: String) -> String {
        match self {
            Self::EscapeAll => message::escape_html(&text),
            Self::Verbatim | Self::EscapeUserInput => text,
        }
    }
}

/// Tunables for a [`ChatWidget`].
#[derive(Debug, Clone, Default)]
pub struct WidgetOptions {
    /// Pause before a successful reply is shown.
    pub reply_delay: ReplyDelay,
    pub html_policy: HtmlPolicy,
    /// Upper bound for the composer height; `None` grows without limit.
    pub composer_max_height_px: Option<u32>,
}

impl WidgetOptions {
    /// Defaults without the reply pause.
    pub fn immediate() -> Self {
        Self {
            reply_delay: ReplyDelay::none(),
            ..Self::default()
        }
    }
}

/// Result of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Draft was empty after trimming; nothing happened.
    Skipped,
    /// Another send is still in flight; nothing happened.
    Busy,
    /// The reply was rendered.
    Replied,
    /// The fallback bubble was rendered.
    Failed(ChatError),
}

/// Keys the composer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// A key press in the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            key: Key::Enter,
            shift: true,
        }
    }

    pub fn char(c: char) -> Self {
        Self {
            key: Key::Char(c),
            shift: false,
        }
    }
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Enter submitted the draft.
    Submitted(SendOutcome),
    /// Shift+Enter added a line break to the draft.
    NewlineInserted,
    /// A character was typed into the draft.
    Typed,
    Ignored,
}

impl KeyOutcome {
    /// The send outcome if the key submitted.
    pub fn sent(&self) -> Option<&SendOutcome> {
        match self {
            Self::Submitted(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Inner<V> {
    view: V,
    composer: Composer,
}

impl<V: ChatView> Inner<V> {
    fn append(&mut self, text: String, sender: Sender) {
        let row = MessageRow::new(Message::new(text, sender));
        self.view.append_row(&row);
        self.view.scroll_to_bottom();
    }

    fn fit_composer(&mut self, max: Option<u32>) {
        self.view.reset_composer_height();
        let content = self.view.composer_content_height();
        let height = max.map_or(content, |max| content.min(max));
        self.view.set_composer_height(height);
    }

    fn refresh_send_control(&mut self) {
        let enabled = self.composer.can_send();
        self.view.set_send_enabled(enabled);
    }

    fn set_typing(&mut self, visible: bool) {
        self.view.set_typing_visible(visible);
        if visible {
            self.view.scroll_to_bottom();
        }
    }
}

/// Releases the in-flight flag when the send cycle ends, including when the
/// future is dropped mid-request.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// View-plus-controller for one chat panel.
#[derive(Debug)]
pub struct ChatWidget<V, E> {
    inner: Mutex<Inner<V>>,
    endpoint: E,
    options: WidgetOptions,
    in_flight: AtomicBool,
}

impl<V: ChatView, E: ChatEndpoint> ChatWidget<V, E> {
    pub fn new(view: V, endpoint: E, options: WidgetOptions) -> Self {
        Self {
            inner: Mutex::new(Inner {
                view,
                composer: Composer::new(),
            }),
            endpoint,
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load-time setup: disable sending, stamp the greeting, fit the input.
    pub fn mount(&self) {
        let mut inner = self.lock();
        inner.view.stamp_initial_message(&message::current_time());
        inner.refresh_send_control();
        inner.fit_composer(self.options.composer_max_height_px);
    }

    /// Append a message row and scroll to it.
    pub fn append_message(&self, text: impl Into<String>, sender: Sender) {
        self.lock().append(text.into(), sender);
    }

    /// Resize the input to fit its content.
    pub fn adjust_composer_height(&self) {
        self.lock()
            .fit_composer(self.options.composer_max_height_px);
    }

    /// Enable the send control iff `draft` has non-whitespace content.
    pub fn set_send_enabled(&self, draft: &str) {
        self.lock()
            .view
            .set_send_enabled(composer::can_send(draft));
    }

    pub fn show_typing(&self) {
        self.lock().set_typing(true);
    }

    pub fn hide_typing(&self) {
        self.lock().set_typing(false);
    }

    /// Input event: the control's value is now `text`.
    pub fn on_input(&self, text: &str) {
        let mut inner = self.lock();
        inner.composer.set_draft(text);
        inner.view.set_draft(text);
        inner.fit_composer(self.options.composer_max_height_px);
        inner.refresh_send_control();
    }

    /// Key press in the composer. Enter submits, Shift+Enter inserts a line
    /// break.
    pub async fn on_key(&self, key: KeyPress) -> KeyOutcome {
        match key.key {
            Key::Enter if !key.shift => KeyOutcome::Submitted(self.send_message().await),
            Key::Enter => {
                let mut inner = self.lock();
                inner.composer.push_newline();
                let draft = inner.composer.draft().to_string();
                inner.view.set_draft(&draft);
                inner.fit_composer(self.options.composer_max_height_px);
                inner.refresh_send_control();
                KeyOutcome::NewlineInserted
            }
            Key::Char(c) => {
                let mut draft = self.draft();
                draft.push(c);
                self.on_input(&draft);
                KeyOutcome::Typed
            }
            Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Send control clicked.
    pub async fn click_send(&self) -> SendOutcome {
        self.send_message().await
    }

    /// Run one send cycle for the current draft.
    pub async fn send_message(&self) -> SendOutcome {
        let Some(message) = self.lock().composer.trimmed().map(str::to_string) else {
            return SendOutcome::Skipped;
        };

        let Some(_in_flight) = InFlight::claim(&self.in_flight) else {
            tracing::debug!("Send ignored while a reply is pending");
            return SendOutcome::Busy;
        };

        {
            let mut inner = self.lock();
            let bubble = message::user_bubble(&self.options.html_policy.user_text(&message));
            inner.append(bubble, Sender::User);
            inner.composer.clear();
            inner.view.set_draft("");
            inner.refresh_send_control();
            inner.fit_composer(self.options.composer_max_height_px);
            inner.set_typing(true);
        }

        tracing::info!(
            name: "chat.send.started",
            message_length = message.len(),
            "Sending chat message"
        );

        match self.endpoint.send(&message).await {
            Ok(reply) => {
                self.options.reply_delay.wait().await;
                let mut inner = self.lock();
                inner.set_typing(false);
                inner.append(self.options.html_policy.bot_text(reply), Sender::Bot);
                tracing::debug!(name: "chat.send.replied", "Reply rendered");
                SendOutcome::Replied
            }
            Err(error) => {
                tracing::warn!(
                    name: "chat.send.failed",
                    error = %error,
                    "Chat round-trip failed"
                );
                let mut inner = self.lock();
                inner.set_typing(false);
                inner.append(message::fallback_bubble(), Sender::Bot);
                SendOutcome::Failed(error)
            }
        }
    }

    /// Current draft text.
    pub fn draft(&self) -> String {
        self.lock().composer.draft().to_string()
    }

    /// `true` while a send cycle is in flight.
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Inspect the view.
    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.lock().view)
    }

    /// Mutate the view directly, bypassing the controller.
    pub fn with_view_mut<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.lock().view)
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }
}
