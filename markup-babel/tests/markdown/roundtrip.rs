//! Markdown → Markup → Markdown round trips

use crate::common::{parse, roundtrip};
use markup_babel::markup::MarkupNode;
use markup_babel::{is_equivalent, NodeKind};
use proptest::prelude::*;

const CASES: &[&str] = &[
    "# Title\n\nSome **bold** and *em* text.\n",
    "* one\n* two\n  * nested\n",
    "1. first\n2. second\n",
    "- [ ] open\n- [x] done\n",
    "- [ ] <!-- todoid=t1,userid=u1 -->tracked\n",
    "- a\n- [ ] b\n",
    "> quoted\n>\n> again\n",
    "```rust\nfn main() {}\n```\n",
    "Visit <https://example.com> now\n",
    "[Doc](ref://?_class=doc&_id=42&label=Doc)\n",
    "![pic](http://localhost/files?file=abc&width=320)\n",
    "Line one\\\nline two\n",
    "~~gone~~ and `code`\n",
    "_under_ and __strong__\n",
    "[site](https://example.com \"Home\")\n",
    "---\n",
    "* [ ] Take\n* [ ] Do\n\n",
    "<!-- Do not erase me -->",
    "<sub>View in Huly <a href=\"http://localhost:8080/guest/github?token=token\">TSK-50</a></sub>",
];

/// Longer documents, checked for equivalence only
const DOCUMENTS: &[&str] = &[
    // Bullet markers and emphasis delimiters of both kinds in one document
    concat!(
        "Asterisks bulleted list:\r\n",
        "* Asterisks: *Italic* and  **Bold*** Underscores: _Italic_ and __Bold__\r\n",
        "\r\n",
        "Dash bulleted list:\r\n",
        "- Asterisks: *Italic* and  **Bold**\r\n",
        "- Underscores: _Italic_ and __Bold__\r\n",
        "-",
    ),
    // A comment spanning blank lines and a code fence, quoted and with CRLF endings
    concat!(
        "\"<!--\r\n",
        "\r\n",
        "Please title your PR as follows: `module: description` (e.g. `time: fix date format`).\r\n",
        "Always start with the thing you are fixing, then describe the fix.\r\n",
        "Don't use past tense (e.g. \"fixed foo bar\").\r\n",
        "\r\n",
        "Explain what your PR does and why.\r\n",
        "\r\n",
        "If you are adding a new function, please document it and add tests:\r\n",
        "\r\n",
        "```\r\n",
        "// foo does foo and bar\r\n",
        "fn foo() {\r\n",
        "\r\n",
        "// file_test.v\r\n",
        "fn test_foo() {\r\n",
        "    assert foo() == ...\r\n",
        "    ...\r\n",
        "}\r\n",
        "```\r\n",
        "\r\n",
        "If you are fixing a bug, please add a test that covers it.\r\n",
        "\r\n",
        "Before submitting a PR, please run `v test-all` .\r\n",
        "See also `TESTS.md`.\r\n",
        "\r\n",
        "I try to process PRs as soon as possible. They should be handled within 24 hours.\r\n",
        "\r\n",
        "Applying labels to PRs is not needed.\r\n",
        "\r\n",
        "Thanks a lot for your contribution!\r\n",
        "\r\n",
        "-->\r\n",
        "\r\n",
        "This PR fix issue #22424\r\n",
        "\r\n",
        "\r\n",
        "\"",
    ),
];

/// Inputs whose output is a normalized spelling of the same document
const REWRITES: &[(&str, &str)] = &[
    (
        "See [link](<https://example.com/with spaces>)",
        "See [link](https://example.com/with%20spaces)",
    ),
    (
        "See [link](<https://example.com/\\<with spaces\\>>)",
        "See [link](https://example.com/%3Cwith%20spaces%3E)",
    ),
    (
        "<img width=\"320\" height=\"160\" src=\"http://example.com/image\" alt=\"image\">",
        "<img width=\"320\" height=\"160\" src=\"http://example.com/image\" alt=\"image\">",
    ),
];

#[test]
fn test_round_trips_are_equivalent() {
    for case in CASES {
        let output = roundtrip(case);
        assert!(
            is_equivalent(case, &output),
            "round trip changed {case:?} into {output:?}"
        );
    }
}

#[test]
fn test_documents_round_trip() {
    for doc in DOCUMENTS {
        let output = roundtrip(doc);
        assert!(
            is_equivalent(doc, &output),
            "round trip changed {doc:?} into {output:?}"
        );
    }
}

#[test]
fn test_round_trips_normalize() {
    for (input, expected) in REWRITES {
        let output = roundtrip(input);
        assert!(
            is_equivalent(expected, &output),
            "{input:?} became {output:?}, expected {expected:?}"
        );
    }
}

#[test]
fn test_round_trips_are_stable() {
    for case in CASES {
        let once = parse(case);
        let twice = parse(&roundtrip(case));
        assert_eq!(once, twice, "tree changed for {case:?}");
    }
}

#[test]
fn test_table_becomes_html_island() {
    let md = "| a | b |\n| --- | --- |\n| 1 | 2 |\n";
    let output = roundtrip(md);
    assert_eq!(
        output,
        "<table><tbody><tr><th><p>a</p></th><th><p>b</p></th></tr>\
         <tr><td><p>1</p></td><td><p>2</p></td></tr></tbody></table>"
    );

    let table = &parse(&output).content[0];
    assert_eq!(table.kind, NodeKind::Table);
    assert_eq!(table.content.len(), 2);
    assert_eq!(table.content[0].content[0].kind, NodeKind::TableHeader);
    assert_eq!(roundtrip(&output), output);
}

fn no_adjacent_mergeable_text(node: &MarkupNode) -> bool {
    let siblings_ok = node.content.windows(2).all(|pair| {
        !(pair[0].is_text() && pair[1].is_text() && pair[0].mark_list() == pair[1].mark_list())
    });
    siblings_ok && node.content.iter().all(no_adjacent_mergeable_text)
}

fn styled_word() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", 0..4u8).prop_map(|(word, style)| match style {
        0 => word,
        1 => format!("**{word}**"),
        2 => format!("*{word}*"),
        _ => format!("~~{word}~~"),
    })
}

proptest! {
    #[test]
    fn styled_paragraphs_round_trip(words in prop::collection::vec(styled_word(), 1..8)) {
        let md = words.join(" ");
        let output = roundtrip(&md);
        prop_assert!(is_equivalent(&md, &output), "{:?} became {:?}", md, output);
    }

    #[test]
    fn parsed_text_is_merged(words in prop::collection::vec(styled_word(), 1..8)) {
        let doc = parse(&words.join(" "));
        prop_assert!(no_adjacent_mergeable_text(&doc));
    }
}
