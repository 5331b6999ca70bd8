//! Turns a user message into a reply bubble.

use serde::{Deserialize, Serialize};

use super::base::KnowledgeBase;
use super::matcher::find_matches;
use super::text::tokenize_user_input;

const GREETINGS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "sup",
    "yo",
];

pub const EMPTY_MESSAGE_REPLY: &str = "I didn't receive a message.";
pub const UNDERSTOOD_NOTHING_REPLY: &str =
    "I couldn't understand your symptoms. Please describe your symptoms more clearly.";
pub const NO_MATCH_REPLY: &str =
    "I couldn't find a clear match for your symptoms in my current knowledge base.";
pub const DISCLAIMER_NOTE: &str = "<small><strong>Note:</strong> I am an AI assistant. The information provided is based on general patterns and should not be considered a medical diagnosis. Always consult a qualified healthcare provider for medical concerns.</small>";

/// Body returned by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Reply bubble HTML.
    pub reply: String,
    /// Best matching condition, if any.
    pub top_disease_suggestion: Option<String>,
}

impl ChatReply {
    fn plain(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            top_disease_suggestion: None,
        }
    }
}

/// Symptom-checker backed by a [`KnowledgeBase`].
#[derive(Debug, Clone, Default)]
pub struct Responder {
    kb: KnowledgeBase,
}

impl Responder {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Compose the reply for one message.
    pub fn reply(&self, message: &str) -> ChatReply {
        let message = message.trim();
        if message.is_empty() {
            return ChatReply::plain(EMPTY_MESSAGE_REPLY);
        }

        if GREETINGS.contains(&message.to_lowercase().as_str()) {
            return ChatReply::plain(format!(
                "Hello! How can I help you today? Please describe your symptoms.<br>{DISCLAIMER_NOTE}"
            ));
        }

        let tokens = tokenize_user_input(message);
        tracing::debug!(tokens = ?tokens, "Processed user message");
        if tokens.is_empty() {
            return ChatReply::plain(UNDERSTOOD_NOTHING_REPLY);
        }

        let matches = find_matches(&tokens, &self.kb);
        let (mut reply, top) = match matches.first() {
            Some(best) => {
                let condition = best.condition;
                let symptoms = best
                    .matched
                    .iter()
                    .map(|s| format!("<em>'{s}'</em>"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut reply = format!(
                    "Based on symptoms like {symptoms}, one possibility could be <strong>{}</strong>. <br><br>\
                     <strong>Description:</strong> {}<br><br>",
                    condition.name, condition.description
                );
                if !condition.precautions.is_empty() {
                    reply.push_str("<strong>Some general precautions include:</strong><ul>");
                    for precaution in &condition.precautions {
                        reply.push_str(&format!("<li>{precaution}</li>"));
                    }
                    reply.push_str("</ul>");
                }
                (reply, Some(condition.name.clone()))
            }
            None => (NO_MATCH_REPLY.to_string(), None),
        };

        reply.push_str("<br><br>");
        reply.push_str(DISCLAIMER_NOTE);

        ChatReply {
            reply,
            top_disease_suggestion: top,
        }
    }
}
