//! Server-rendered HTML for the chat page.
//!
//! # Structure
//!
//! - [`shell`]: document skeleton
//! - [`chat`]: the widget panel, row templates and its client binding

pub mod chat;
pub mod shell;

use crate::widget::message::escape_html;
use crate::widget::{HtmlPolicy, ReplyDelay};

/// Values the page needs at render time.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// URL the browser posts messages to.
    pub chat_url: String,
    pub reply_delay: ReplyDelay,
    pub html_policy: HtmlPolicy,
    /// `HH:MM` stamped onto the greeting.
    pub timestamp: String,
}

/// Render the full chat page.
pub fn render_index(ctx: &PageContext) -> String {
    let body_attrs = format!(
        r#"data-chat-url="{url}" data-reply-delay-min="{min}" data-reply-delay-max="{max}" data-html-policy="{policy}""#,
        url = escape_html(&ctx.chat_url),
        min = ctx.reply_delay.min().as_millis(),
        max = ctx.reply_delay.max().as_millis(),
        policy = policy_name(ctx.html_policy),
    );
    shell::html_shell("Health Assistant", &body_attrs, &chat::chat_panel(&ctx.timestamp))
}

fn policy_name(policy: HtmlPolicy) -> &'static str {
    match policy {
        HtmlPolicy::Verbatim => "verbatim",
        HtmlPolicy::EscapeUserInput => "escape_user_input",
        HtmlPolicy::EscapeAll => "escape_all",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PageContext {
        PageContext {
            chat_url: "/chat?a=1&b=2".into(),
            reply_delay: ReplyDelay::from_millis(1000, 2000),
            html_policy: HtmlPolicy::EscapeUserInput,
            timestamp: "08:15".into(),
        }
    }

    #[test]
    fn page_carries_dom_contract() {
        let html = render_index(&ctx());
        for id in [
            r#"id="chat-box""#,
            r#"id="user-input""#,
            r#"id="send-btn""#,
            r#"id="typing-indicator""#,
        ] {
            assert!(html.contains(id), "missing {id}");
        }
    }

    #[test]
    fn body_carries_settings() {
        let html = render_index(&ctx());
        assert!(html.contains(r#"data-chat-url="/chat?a=1&amp;b=2""#));
        assert!(html.contains(r#"data-reply-delay-min="1000""#));
        assert!(html.contains(r#"data-reply-delay-max="2000""#));
        assert!(html.contains(r#"data-html-policy="escape_user_input""#));
    }

    #[test]
    fn greeting_is_stamped() {
        let html = render_index(&ctx());
        assert!(html.contains(r#"<span class="timestamp">08:15</span>"#));
    }
}
