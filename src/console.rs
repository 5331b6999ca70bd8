//! Terminal binding of the chat widget.
//!
//! Rows are printed as `[HH:MM] Bot: text` with markup reduced to plain
//! text. Input is line based: a line ending in `\` continues the draft on a
//! new line (Shift+Enter), any other line submits it (Enter).

use std::fmt;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::widget::{ChatEndpoint, ChatView, ChatWidget, KeyPress, MessageRow, Sender};

/// Command that ends the console loop.
pub const QUIT_COMMAND: &str = "/quit";

/// [`ChatView`] that prints to a writer.
pub struct ConsoleView<W> {
    out: W,
    greeting: Option<String>,
    typing: bool,
}

impl<W> fmt::Debug for ConsoleView<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleView")
            .field("greeting", &self.greeting)
            .field("typing", &self.typing)
            .finish()
    }
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            greeting: None,
            typing: false,
        }
    }

    /// Bot greeting printed when the widget mounts.
    pub fn with_greeting(mut self, bubble: impl Into<String>) -> Self {
        self.greeting = Some(bubble.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_row(&mut self, sender: Sender, bubble: &str, timestamp: &str) {
        let label = match sender {
            Sender::User => "You",
            Sender::Bot => "Bot",
        };
        if let Err(e) = writeln!(self.out, "[{timestamp}] {label}: {}", to_plain_text(bubble))
            .and_then(|()| self.out.flush())
        {
            tracing::warn!(error = %e, "Failed to write chat row");
        }
    }
}

impl<W: Write + Send> ChatView for ConsoleView<W> {
    fn append_row(&mut self, row: &MessageRow) {
        self.print_row(row.sender(), &row.message.text, &row.message.timestamp);
    }

    fn scroll_to_bottom(&mut self) {}

    fn set_draft(&mut self, _text: &str) {}

    fn set_send_enabled(&mut self, _enabled: bool) {}

    fn reset_composer_height(&mut self) {}

    fn composer_content_height(&self) -> u32 {
        0
    }

    fn set_composer_height(&mut self, _px: u32) {}

    fn set_typing_visible(&mut self, visible: bool) {
        if visible
            && !self.typing
            && let Err(e) = writeln!(self.out, "Bot is typing...")
        {
            tracing::warn!(error = %e, "Failed to write typing indicator");
        }
        self.typing = visible;
    }

    fn stamp_initial_message(&mut self, timestamp: &str) {
        if let Some(greeting) = self.greeting.take() {
            self.print_row(Sender::Bot, &greeting, timestamp);
        }
    }
}

/// Drive `widget` from line-based `input` until EOF or [`QUIT_COMMAND`].
pub async fn run_console<V, E, R>(widget: &ChatWidget<V, E>, input: R) -> std::io::Result<()>
where
    V: ChatView,
    E: ChatEndpoint,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }
        let (text, continued) = match line.strip_suffix('\\') {
            Some(text) => (text, true),
            None => (line.as_str(), false),
        };
        let draft = format!("{}{text}", widget.draft());
        widget.on_input(&draft);

        let key = if continued {
            KeyPress::shift_enter()
        } else {
            KeyPress::enter()
        };
        let outcome = widget.on_key(key).await;
        tracing::debug!(outcome = ?outcome, "Console key handled");
    }
    Ok(())
}

/// Reduce bubble HTML to readable plain text.
pub fn to_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }
        let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let closing = tag.starts_with('/');
        match (name.as_str(), closing) {
            ("br" | "ul", _) | ("p" | "li", true) => out.push('\n'),
            ("li", false) => out.push_str("- "),
            _ => {}
        }
    }

    let decoded = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    let mut lines: Vec<&str> = Vec::new();
    for line in decoded.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
