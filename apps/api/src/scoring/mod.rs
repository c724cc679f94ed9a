// Scoring: text preprocessing, skill matching, semantic similarity, heuristic scores.
// Every function here is pure except `similarity::compute_similarity`, which calls
// the injected TextEncoder.

pub mod fuzzy;
pub mod heuristics;
pub mod preprocess;
pub mod similarity;
pub mod skills;

/// `part / whole` as a 0–100 integer, rounding half to even. 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let ratio = part as f64 / whole as f64;
    (ratio * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}
