//! Heuristic resume scores. Each is a pure function of text, returning 0–100.

use crate::scoring::percent;

/// Canonical resume sections looked for by `section_score`.
pub const CANONICAL_SECTIONS: [&str; 6] = [
    "education",
    "experience",
    "skills",
    "projects",
    "summary",
    "certifications",
];

/// Job-description tokens must be longer than this (in chars) to count as ATS keywords.
const MIN_KEYWORD_CHARS: usize = 4;

/// Counts "•" characters plus "- " dash-bullet prefixes.
pub fn count_bullet_markers(text: &str) -> usize {
    text.matches('•').count() + text.matches("- ").count()
}

/// Step function over bullet density: ≥10 → 100, ≥5 → 75, ≥3 → 50, else 25.
pub fn style_score(text: &str) -> u8 {
    style_score_for_bullets(count_bullet_markers(text))
}

pub fn style_score_for_bullets(bullets: usize) -> u8 {
    match bullets {
        n if n >= 10 => 100,
        n if n >= 5 => 75,
        n if n >= 3 => 50,
        _ => 25,
    }
}

/// Job-description words longer than four characters. Not deduplicated: a word
/// repeated in the job description is weighted by its frequency.
pub fn ats_keywords(job_description: &str) -> Vec<String> {
    job_description
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS)
        .map(String::from)
        .collect()
}

/// Share of job keywords (by occurrence) found as substrings of the resume.
pub fn ats_score(resume_text: &str, job_description: &str) -> u8 {
    let keywords = ats_keywords(job_description);
    let resume = resume_text.to_lowercase();
    let hits = keywords.iter().filter(|k| resume.contains(k.as_str())).count();
    percent(hits, keywords.len())
}

/// Canonical section names present in the text (case-insensitive substring).
pub fn present_sections(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    CANONICAL_SECTIONS
        .iter()
        .copied()
        .filter(|s| lower.contains(s))
        .collect()
}

pub fn section_score(text: &str) -> u8 {
    percent(present_sections(text).len(), CANONICAL_SECTIONS.len())
}
