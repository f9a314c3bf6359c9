//! Comparator properties

use markup_babel::{is_equivalent, similarity};
use proptest::prelude::*;

#[test]
fn test_equivalence_is_line_based() {
    assert!(is_equivalent("a\n\n\nb\n", "a\r\nb"));
    assert!(!is_equivalent("a b", "a  b"));
}

proptest! {
    #[test]
    fn equivalence_is_reflexive(text in "[a-z \\n*#-]{0,40}") {
        prop_assert!(is_equivalent(&text, &text));
    }

    #[test]
    fn blank_lines_do_not_matter(lines in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let tight = lines.join("\n");
        let loose = lines.join("\n\n  \n");
        prop_assert!(is_equivalent(&tight, &loose));
    }

    #[test]
    fn similarity_is_symmetric_and_bounded(a in "[a-d ]{0,12}", b in "[a-d ]{0,12}") {
        let ab = similarity(&a, &b);
        let ba = similarity(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn similarity_of_identical_text_is_one(a in "[a-z]{0,12}") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }
}
