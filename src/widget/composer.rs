//! Composer state: the draft text and whether it may be sent.

/// Draft mirror of the input control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    draft: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Insert a literal newline, as Shift+Enter does.
    pub fn push_newline(&mut self) {
        self.draft.push('\n');
    }

    /// `true` iff the draft has non-whitespace content.
    pub fn can_send(&self) -> bool {
        can_send(&self.draft)
    }

    /// The trimmed draft, or `None` when there is nothing to send.
    pub fn trimmed(&self) -> Option<&str> {
        let trimmed = self.draft.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }
}

/// Send-control rule: enabled iff the trimmed draft is non-empty.
pub fn can_send(draft: &str) -> bool {
    !draft.trim().is_empty()
}

/// Geometry used to compute the composer's content height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerMetrics {
    /// Height of one text line in pixels.
    pub line_height_px: u32,
    /// Combined top and bottom padding in pixels.
    pub padding_px: u32,
}

impl Default for ComposerMetrics {
    fn default() -> Self {
        Self {
            line_height_px: 24,
            padding_px: 20,
        }
    }
}

impl ComposerMetrics {
    /// Height needed to show `text` without scrolling. An empty draft still
    /// occupies one line.
    pub fn content_height(&self, text: &str) -> u32 {
        let lines = u32::try_from(text.split('\n').count()).unwrap_or(u32::MAX);
        lines
            .max(1)
            .saturating_mul(self.line_height_px)
            .saturating_add(self.padding_px)
    }
}
