//! Chat messages and their row markup.

use std::fmt;

use chrono::{Local, NaiveTime, Timelike};

/// Bubble shown when a round-trip fails for any reason.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an issue reaching the server. Please try again later.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS-facing name (`user` / `bot`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::User => "fa-user",
            Self::Bot => "fa-robot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered chat message. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Bubble content, inserted as HTML.
    pub text: String,
    pub sender: Sender,
    /// Local wall-clock time as `HH:MM`.
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: current_time(),
        }
    }
}

/// Current local time formatted as `HH:MM`.
pub fn current_time() -> String {
    format_time(Local::now().time())
}

/// Format a wall-clock time as zero-padded `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Wrap a trimmed draft for display: newlines become `<br>` inside a `<p>`.
///
/// No other escaping happens here; see [`HtmlPolicy`](super::HtmlPolicy).
pub fn user_bubble(draft: &str) -> String {
    format!("<p>{}</p>", draft.replace('\n', "<br>"))
}

/// Bubble HTML for [`FALLBACK_REPLY`].
pub fn fallback_bubble() -> String {
    format!("<p>{FALLBACK_REPLY}</p>")
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// A message laid out for the list.
///
/// Bot rows put the avatar first; user rows are mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    /// Element id, unique per row.
    pub id: String,
    pub message: Message,
}

impl MessageRow {
    pub fn new(message: Message) -> Self {
        Self {
            id: format!("msg-{}", uuid::Uuid::new_v4().simple()),
            message,
        }
    }

    pub fn sender(&self) -> Sender {
        self.message.sender
    }

    /// Render the row as an HTML fragment.
    pub fn to_html(&self) -> String {
        render_row(
            Some(&self.id),
            self.message.sender,
            &self.message.text,
            &self.message.timestamp,
        )
    }
}

/// Render row markup for any sender, bubble and timestamp.
///
/// Shared by [`MessageRow::to_html`] and the server-rendered page so both
/// produce identical structure.
pub fn render_row(id: Option<&str>, sender: Sender, bubble: &str, timestamp: &str) -> String {
    let avatar = format!(
        r#"<div class="avatar-placeholder {sender}-avatar-chat"><i class="fas {icon}"></i></div>"#,
        icon = sender.icon(),
    );
    let content = format!(
        r#"<div class="message-content"><div class="message-bubble">{bubble}</div><span class="timestamp">{timestamp}</span></div>"#
    );
    let id_attr = id.map(|id| format!(r#" id="{id}""#)).unwrap_or_default();
    let (first, second) = match sender {
        Sender::Bot => (avatar, content),
        Sender::User => (content, avatar),
    };
    format!(r#"<div{id_attr} class="message {sender}-message">{first}{second}</div>"#)
}
