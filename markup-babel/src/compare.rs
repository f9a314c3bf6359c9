//! Round-trip comparison of Markdown text
//!
//! [`is_equivalent`] is the strict check used to validate a parse → serialize round trip: line
//! endings, trailing whitespace and blank lines are normalized away, everything else must match.
//! [`similarity`] is a separate fuzzy score for reporting how far two texts drifted.

use std::collections::HashMap;

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split('\n')
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether two Markdown texts are equal once line endings, trailing whitespace and blank lines
/// are normalized
pub fn is_equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Sørensen–Dice coefficient over character bigrams, ignoring whitespace
///
/// Returns a score in `0.0..=1.0`; `1.0` for texts equal after whitespace removal.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut counts: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *counts.entry((pair[0], pair[1])).or_default() += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = counts.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2 * intersection) as f64 / ((a.len() - 1) + (b.len() - 1)) as f64
}
