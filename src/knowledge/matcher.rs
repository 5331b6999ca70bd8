//! Weighted symptom matching.

use std::collections::HashSet;

use super::base::{Condition, KnowledgeBase};

/// A condition that shares at least one symptom phrase with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionMatch<'a> {
    pub condition: &'a Condition,
    /// Sum of the severity weights of the matched phrases.
    pub score: u64,
    /// Matched phrases, sorted.
    pub matched: Vec<&'a str>,
}

/// Rank conditions by how well `tokens` cover their symptom phrases.
///
/// A phrase matches when every one of its content tokens is present. Ties
/// keep knowledge base order.
pub fn find_matches<'a, S: AsRef<str>>(
    tokens: &[S],
    kb: &'a KnowledgeBase,
) -> Vec<ConditionMatch<'a>> {
    let user: HashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();

    let mut matches: Vec<ConditionMatch<'a>> = kb
        .conditions()
        .iter()
        .filter_map(|condition| {
            let mut matched: Vec<&str> = condition
                .symptoms
                .iter()
                .filter(|phrase| {
                    !phrase.tokens.is_empty()
                        && phrase.tokens.iter().all(|t| user.contains(t.as_str()))
                })
                .map(|phrase| phrase.text.as_str())
                .collect();
            if matched.is_empty() {
                return None;
            }
            matched.sort_unstable();
            matched.dedup();
            let score = matched.iter().map(|p| u64::from(kb.weight(p))).sum();
            Some(ConditionMatch {
                condition,
                score,
                matched,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));

    for (rank, m) in matches.iter().take(3).enumerate() {
        tracing::debug!(
            rank = rank + 1,
            condition = %m.condition.name,
            score = m.score,
            matched = ?m.matched,
            "Candidate condition"
        );
    }

    matches
}
