//! Mark set operations
//!
//! Mark sets are ordered outer to inner. All comparisons are structural: two marks are the same
//! mark when their kind and attrs are equal.

use super::nodes::{MarkKind, MarkupMark};

/// Add `mark` to the end of `set` unless an equal mark is already present.
pub fn add_to_set(mark: &MarkupMark, set: &[MarkupMark]) -> Vec<MarkupMark> {
    let mut result = set.to_vec();
    if !is_in_set(mark, set) {
        result.push(mark.clone());
    }
    result
}

/// Remove every mark of `kind` from `set`.
pub fn remove_from_set(kind: &MarkKind, set: &[MarkupMark]) -> Vec<MarkupMark> {
    set.iter().filter(|m| &m.kind != kind).cloned().collect()
}

pub fn is_in_set(mark: &MarkupMark, set: &[MarkupMark]) -> bool {
    set.iter().any(|m| m == mark)
}

/// Same marks in the same order. An absent set differs from an empty one.
pub fn same_set(a: Option<&[MarkupMark]>, b: Option<&[MarkupMark]>) -> bool {
    a == b
}
