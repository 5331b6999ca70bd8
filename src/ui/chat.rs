//! Chat widget panel.
//!
//! The markup mirrors what [`ChatWidget`](crate::widget::ChatWidget) drives
//! through [`ChatView`](crate::widget::ChatView): a message list
//! (`#chat-box`), a typing indicator, a textarea (`#user-input`) and a send
//! button (`#send-btn`). Row templates come from the same renderer the
//! widget uses, so browser-appended rows match server-rendered ones.

use crate::widget::message::{FALLBACK_REPLY, render_row};
use crate::widget::Sender;

/// Greeting pre-rendered in the message list.
pub const GREETING: &str = "<p>Hello! I'm your health assistant. Describe how you feel and I'll suggest what it could be.</p>";

/// Render the panel with the greeting stamped at `timestamp`.
pub fn chat_panel(timestamp: &str) -> String {
    let greeting = render_row(None, Sender::Bot, GREETING, timestamp);
    let bot_template = render_row(None, Sender::Bot, "", "");
    let user_template = render_row(None, Sender::User, "", "");

    format!(
        r#"
    <div class="chat-container" x-data="chatWidget()" x-init="init()">
        <header class="chat-header">
            <div class="avatar-placeholder bot-avatar-header"><i class="fas fa-robot"></i></div>
            <h2>Health Assistant</h2>
        </header>

        <div id="chat-box" class="chat-box" x-ref="box" aria-live="polite" aria-label="Chat messages">
            {greeting}
        </div>

        <div id="typing-indicator" class="typing-indicator" x-show="typing" style="display: none;">
            <div class="avatar-placeholder bot-avatar-chat"><i class="fas fa-robot"></i></div>
            <div class="typing-dots"><span></span><span></span><span></span></div>
        </div>

        <div class="chat-input-area">
            <textarea
                id="user-input"
                x-ref="input"
                placeholder="Describe your symptoms..."
                rows="1"
                x-model="draft"
                x-on:input="fit()"
                x-on:keydown.enter="if (!$event.shiftKey) {{ $event.preventDefault(); send(); }}"
            ></textarea>
            <button id="send-btn" type="button" disabled x-bind:disabled="!canSend" x-on:click="send()" aria-label="Send">
                <i class="fas fa-paper-plane"></i>
            </button>
        </div>
        <p class="chat-hint">Press Enter to send, Shift+Enter for new line</p>

        <template id="bot-row-template">{bot_template}</template>
        <template id="user-row-template">{user_template}</template>
    </div>
    <script>
    const FALLBACK_REPLY = "<p>{FALLBACK_REPLY}</p>";
    {WIDGET_SCRIPT}
    </script>
"#
    )
}

const WIDGET_SCRIPT: &str = r"
    function escapeHtml(text) {
        return text.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
            .replace(/\x22/g, '&quot;').replace(/'/g, '&#39;');
    }

    function chatWidget() {
        const cfg = document.body.dataset;
        const minDelay = Number(cfg.replyDelayMin || 0);
        const maxDelay = Number(cfg.replyDelayMax || 0);
        const policy = cfg.htmlPolicy || 'verbatim';
        return {
            draft: '',
            typing: false,
            sending: false,
            get canSend() { return this.draft.trim() !== ''; },
            init() { this.fit(); this.scroll(); },
            now() {
                const d = new Date();
                return String(d.getHours()).padStart(2, '0') + ':' + String(d.getMinutes()).padStart(2, '0');
            },
            fit() {
                const el = this.$refs.input;
                el.style.height = 'auto';
                el.style.height = el.scrollHeight + 'px';
            },
            scroll() { this.$refs.box.scrollTop = this.$refs.box.scrollHeight; },
            append(html, sender) {
                const tpl = document.getElementById(sender + '-row-template');
                const row = tpl.content.firstElementChild.cloneNode(true);
                row.querySelector('.message-bubble').innerHTML = html;
                row.querySelector('.timestamp').textContent = this.now();
                this.$refs.box.appendChild(row);
                this.scroll();
            },
            async send() {
                const text = this.draft.trim();
                if (text === '' || this.sending) return;
                this.sending = true;
                const shown = policy === 'verbatim' ? text : escapeHtml(text);
                this.append('<p>' + shown.replace(/\n/g, '<br>') + '</p>', 'user');
                this.draft = '';
                this.$nextTick(() => this.fit());
                this.typing = true;
                this.scroll();
                try {
                    const res = await fetch(cfg.chatUrl, {
                        method: 'POST',
                        headers: { 'Content-Type': 'application/json' },
                        body: JSON.stringify({ message: text }),
                    });
                    if (!res.ok) throw new Error('HTTP ' + res.status);
                    const data = await res.json();
                    if (typeof data.reply !== 'string') throw new Error('reply missing');
                    const delay = minDelay + Math.random() * (maxDelay - minDelay);
                    await new Promise((resolve) => setTimeout(resolve, delay));
                    this.typing = false;
                    this.append(policy === 'escape_all' ? escapeHtml(data.reply) : data.reply, 'bot');
                } catch (err) {
                    console.error('Chat request failed:', err);
                    this.typing = false;
                    this.append(FALLBACK_REPLY, 'bot');
                } finally {
                    this.sending = false;
                }
            },
        };
    }
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_button_starts_disabled() {
        let html = chat_panel("12:00");
        assert!(html.contains(r#"<button id="send-btn" type="button" disabled"#));
    }

    #[test]
    fn templates_use_row_markup() {
        let html = chat_panel("12:00");
        assert!(html.contains(r#"<template id="bot-row-template"><div class="message bot-message">"#));
        assert!(html.contains(r#"<template id="user-row-template"><div class="message user-message">"#));
    }

    #[test]
    fn enter_binding_respects_shift() {
        let html = chat_panel("12:00");
        assert!(html.contains("if (!$event.shiftKey) { $event.preventDefault(); send(); }"));
    }
}
