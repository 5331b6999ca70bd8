//! Text normalisation shared by user input and knowledge base phrases.

use std::collections::HashSet;
use std::sync::LazyLock;

const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// English stopword check (lowercase input).
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Lowercase, drop punctuation, turn underscores into spaces and split.
fn raw_tokens(text: &str) -> impl Iterator<Item = String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '_' => Some(' '),
            c if c.is_alphanumeric() || c.is_whitespace() => Some(c),
            _ => None,
        })
        .collect();
    cleaned
        .split_whitespace()
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}

/// Tokens worth matching on: no stopwords, no single characters.
fn is_content(word: &str) -> bool {
    word.chars().count() > 1 && !is_stopword(word)
}

/// Normalise a user's message into lemmatised content tokens.
pub fn tokenize_user_input(text: &str) -> Vec<String> {
    raw_tokens(text)
        .filter(|w| is_content(w))
        .map(|w| lemmatize(&w))
        .collect()
}

/// Normalise a knowledge base symptom entry, e.g. `" skin_rashes"` →
/// `"skin rash"`. Stopwords are kept so the phrase stays readable.
pub fn normalize_phrase(text: &str) -> String {
    raw_tokens(text.trim())
        .map(|w| lemmatize(&w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Content tokens of an already normalised phrase.
pub fn content_tokens(phrase: &str) -> impl Iterator<Item = &str> {
    phrase.split_whitespace().filter(|w| is_content(w))
}

/// Rule-based noun singularisation.
///
/// Applied identically to user input and knowledge base phrases, so only
/// consistency matters, not dictionary accuracy.
pub fn lemmatize(word: &str) -> String {
    if word.chars().count() <= 3 || !word.is_ascii() {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "shes", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if stem.len() >= 3 => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_input_is_cleaned() {
        assert_eq!(
            tokenize_user_input("I have a Headache, and SKIN_RASHES!!"),
            ["headache", "skin", "rash"]
        );
    }

    #[test]
    fn single_letters_and_stopwords_dropped() {
        assert!(tokenize_user_input("I am a x").is_empty());
        assert!(tokenize_user_input("?!...").is_empty());
    }

    #[test]
    fn phrases_keep_stopwords() {
        assert_eq!(normalize_phrase(" loss_of_appetite "), "loss of appetite");
        assert_eq!(normalize_phrase("toxic_look_(typhos)"), "toxic look typho");
        assert_eq!(
            content_tokens("loss of appetite").collect::<Vec<_>>(),
            ["loss", "appetite"]
        );
    }

    #[test]
    fn lemmatizer_rules() {
        assert_eq!(lemmatize("bodies"), "body");
        assert_eq!(lemmatize("rashes"), "rash");
        assert_eq!(lemmatize("headaches"), "headache");
        assert_eq!(lemmatize("chills"), "chill");
        assert_eq!(lemmatize("loss"), "loss");
        assert_eq!(lemmatize("mucus"), "mucus");
        assert_eq!(lemmatize("psoriasis"), "psoriasis");
        assert_eq!(lemmatize("gas"), "gas");
        assert_eq!(lemmatize("boxes"), "box");
    }
}
