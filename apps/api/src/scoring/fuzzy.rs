//! Typo-tolerant substring similarity.
//!
//! `partial_ratio` slides the shorter string across the longer one and keeps the
//! best optimal-string-alignment similarity, so a swapped pair of adjacent letters
//! costs one edit. Windows one character shorter and longer than the needle are
//! tried too, so a dropped or doubled letter also costs one edit. Windows are only
//! anchored where the longer string has a character that occurs in the needle.

use strsim::osa_distance;

/// Similarity of `a` found inside `b` (or `b` inside `a`), on a 0–100 scale.
///
/// 100 when the shorter string occurs verbatim in the longer one; 0 when either is empty.
/// Cost grows with the longer string's length times the square of the shorter
/// one's, so callers bound the needle length.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let (needle, haystack) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let needle_chars: Vec<char> = needle.chars().collect();
    let needle_len = needle_chars.len();
    if needle_len == 0 {
        return 0;
    }
    if haystack.contains(needle) {
        return 100;
    }

    // Byte offset of every char boundary, so each window is a borrowed slice.
    let bounds: Vec<usize> = haystack
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(haystack.len()))
        .collect();
    let hay_len = bounds.len() - 1;
    let widths = [needle_len, needle_len + 1, needle_len.saturating_sub(1)];

    let mut best = 0.0_f64;
    for (start, c) in haystack.chars().enumerate() {
        if !needle_chars.contains(&c) {
            continue;
        }
        for width in widths {
            if width == 0 || start + width > hay_len {
                continue;
            }
            let window = &haystack[bounds[start]..bounds[start + width]];
            let distance = osa_distance(needle, window);
            let sim = 1.0 - distance as f64 / needle_len.max(width) as f64;
            if sim > best {
                best = sim;
            }
        }
    }

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}
