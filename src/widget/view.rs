//! The DOM contract the widget drives, and an in-memory implementation.

use super::composer::ComposerMetrics;
use super::message::{Message, MessageRow, Sender};

/// Elements the widget needs: a message list, a text input, a send control
/// and a typing indicator.
///
/// Implementations only render; all decisions live in
/// [`ChatWidget`](super::ChatWidget).
pub trait ChatView: Send {
    /// Append a row at the end of the message list.
    fn append_row(&mut self, row: &MessageRow);

    /// Force the message list's scroll position to the bottom.
    fn scroll_to_bottom(&mut self);

    /// Replace the input control's value.
    fn set_draft(&mut self, text: &str);

    fn set_send_enabled(&mut self, enabled: bool);

    /// Collapse the input to its natural height (`height: auto`).
    fn reset_composer_height(&mut self);

    /// Height the current content needs, in pixels (`scrollHeight`).
    fn composer_content_height(&self) -> u32;

    fn set_composer_height(&mut self, px: u32);

    fn set_typing_visible(&mut self, visible: bool);

    /// Fill in the timestamp of a pre-rendered greeting, if one exists.
    fn stamp_initial_message(&mut self, timestamp: &str);
}

/// A row held by [`DomModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomRow {
    pub id: Option<String>,
    pub sender: Sender,
    /// Bubble HTML, exactly as inserted.
    pub bubble: String,
    /// `None` until stamped (pre-rendered greeting only).
    pub timestamp: Option<String>,
    /// Full row markup.
    pub html: String,
}

/// Retained, in-memory rendition of the widget's elements.
#[derive(Debug, Clone)]
pub struct DomModel {
    rows: Vec<DomRow>,
    draft: String,
    send_enabled: bool,
    typing_visible: bool,
    composer_height: Option<u32>,
    metrics: ComposerMetrics,
    row_height_px: u32,
    viewport_height_px: u32,
    scroll_top: u32,
}

impl Default for DomModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DomModel {
    /// Empty list, send control enabled until the widget mounts.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            draft: String::new(),
            send_enabled: true,
            typing_visible: false,
            composer_height: None,
            metrics: ComposerMetrics::default(),
            row_height_px: 64,
            viewport_height_px: 480,
            scroll_top: 0,
        }
    }

    /// Seed the list with an unstamped bot greeting.
    pub fn with_initial_bot_message(mut self, bubble: impl Into<String>) -> Self {
        let bubble = bubble.into();
        self.rows.push(DomRow {
            id: None,
            sender: Sender::Bot,
            html: super::message::render_row(None, Sender::Bot, &bubble, ""),
            bubble,
            timestamp: None,
        });
        self
    }

    pub fn with_metrics(mut self, metrics: ComposerMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn rows(&self) -> &[DomRow] {
        &self.rows
    }

    pub fn rows_from(&self, sender: Sender) -> impl Iterator<Item = &DomRow> {
        self.rows.iter().filter(move |r| r.sender == sender)
    }

    pub fn last_row(&self) -> Option<&DomRow> {
        self.rows.last()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn typing_visible(&self) -> bool {
        self.typing_visible
    }

    /// Explicit inline height, `None` while collapsed to `auto`.
    pub fn composer_height(&self) -> Option<u32> {
        self.composer_height
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    /// Total height of the list content.
    pub fn scroll_height(&self) -> u32 {
        let rows = u32::try_from(self.rows.len()).unwrap_or(u32::MAX);
        let typing = u32::from(self.typing_visible);
        rows.saturating_add(typing).saturating_mul(self.row_height_px)
    }

    /// `true` when the last row is in view.
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll_top + self.viewport_height_px >= self.scroll_height()
    }

    /// Simulate the user scrolling back to the top.
    pub fn scroll_to_top(&mut self) {
        self.scroll_top = 0;
    }
}

impl ChatView for DomModel {
    fn append_row(&mut self, row: &MessageRow) {
        let Message {
            text,
            sender,
            timestamp,
        } = &row.message;
        self.rows.push(DomRow {
            id: Some(row.id.clone()),
            sender: *sender,
            bubble: text.clone(),
            timestamp: Some(timestamp.clone()),
            html: row.to_html(),
        });
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.scroll_height().saturating_sub(self.viewport_height_px);
    }

    fn set_draft(&mut self, text: &str) {
        text.clone_into(&mut self.draft);
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }

    fn reset_composer_height(&mut self) {
        self.composer_height = None;
    }

    fn composer_content_height(&self) -> u32 {
        self.metrics.content_height(&self.draft)
    }

    fn set_composer_height(&mut self, px: u32) {
        self.composer_height = Some(px);
    }

    fn set_typing_visible(&mut self, visible: bool) {
        self.typing_visible = visible;
    }

    fn stamp_initial_message(&mut self, timestamp: &str) {
        if let Some(row) = self
            .rows
            .iter_mut()
            .find(|r| r.sender == Sender::Bot && r.timestamp.is_none())
        {
            row.timestamp = Some(timestamp.to_string());
            row.html = super::message::render_row(None, Sender::Bot, &row.bubble, timestamp);
        }
    }
}
