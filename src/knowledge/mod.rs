//! Symptom knowledge base served behind the chat endpoint.
//!
//! # Structure
//!
//! - [`csv`]: reader for the data files
//! - [`text`]: tokenising, stopwords and lemmatising
//! - [`base`]: [`KnowledgeBase`] loading and lookup
//! - [`matcher`]: weighted symptom matching
//! - [`responder`]: reply composition

pub mod base;
pub mod csv;
pub mod matcher;
pub mod responder;
pub mod text;

pub use base::{Condition, KnowledgeBase, SymptomPhrase};
pub use matcher::{ConditionMatch, find_matches};
pub use responder::{ChatReply, Responder};
