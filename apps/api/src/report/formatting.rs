//! Local formatting checks over the line-preserving resume text.

use crate::scoring::heuristics::count_bullet_markers;

const MIN_BULLETS: usize = 3;
const ALL_CAPS_MIN_CHARS: usize = 10;
const LONG_LINE_CHARS: usize = 160;

/// Returns human-readable formatting issues. Empty means the formatting looks clean.
pub fn check_formatting(text: &str) -> Vec<String> {
    let mut issues = Vec::new();

    if count_bullet_markers(text) < MIN_BULLETS {
        issues.push("Use more bullet points for better readability.".to_string());
    }

    if text
        .lines()
        .any(|line| is_all_caps(line) && line.chars().count() > ALL_CAPS_MIN_CHARS)
    {
        issues.push("Avoid using ALL CAPS excessively.".to_string());
    }

    let long_lines = text
        .lines()
        .filter(|line| line.chars().count() > LONG_LINE_CHARS)
        .count();
    match long_lines {
        0 => {}
        1 => issues.push("1 line is too long. Try breaking it up.".to_string()),
        n => issues.push(format!("{n} lines are too long. Try breaking them up.")),
    }

    issues
}

/// At least one uppercase letter and no lowercase ones. Digits and punctuation are ignored.
fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}
