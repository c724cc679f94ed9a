use std::sync::OnceLock;

use regex::Regex;

fn non_word_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\W+").expect("static regex is valid"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Lowercases and replaces every run of non-word characters with a single space.
/// Idempotent.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    non_word_runs()
        .replace_all(&lowered, " ")
        .trim()
        .to_string()
}

/// Collapses whitespace runs (including newlines) to single spaces and trims.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_runs().replace_all(text, " ").trim().to_string()
}
