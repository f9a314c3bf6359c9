//! Export tests for Markdown format (Markup → Markdown)

use crate::common::{item, marked, render, text};
use insta::assert_snapshot;
use markup_babel::{
    markup_to_markdown, ConvertOptions, FormatError, MarkKind, MarkupMark, MarkupNode, NodeKind,
};

fn bullet_list(items: Vec<MarkupNode>) -> MarkupNode {
    MarkupNode::new(NodeKind::BulletList).with_content(items)
}

#[test]
fn test_nested_tight_list() {
    let doc = MarkupNode::doc(vec![bullet_list(vec![MarkupNode::new(NodeKind::ListItem)
        .with_content(vec![
            MarkupNode::paragraph(vec![text("a")]),
            bullet_list(vec![item(NodeKind::ListItem, "b")]),
        ])])]);
    assert_eq!(render(&doc), "* a\n  * b");
}

#[test]
fn test_loose_lists_option() {
    let doc = MarkupNode::doc(vec![bullet_list(vec![
        item(NodeKind::ListItem, "a"),
        item(NodeKind::ListItem, "b"),
    ])]);
    let options = ConvertOptions::default().with_tight_lists(false);
    assert_eq!(markup_to_markdown(&doc, &options).unwrap(), "* a\n\n* b");
}

#[test]
fn test_bullet_option_and_attr() {
    let doc = MarkupNode::doc(vec![bullet_list(vec![item(NodeKind::ListItem, "a")])]);
    let options = ConvertOptions::default().with_bullet("-");
    assert_eq!(markup_to_markdown(&doc, &options).unwrap(), "- a");

    let doc = MarkupNode::doc(vec![bullet_list(vec![item(NodeKind::ListItem, "a")])
        .with_attr("bullet", "+")]);
    assert_eq!(render(&doc), "+ a");
}

#[test]
fn test_code_block_inside_list_item() {
    let doc = MarkupNode::doc(vec![bullet_list(vec![MarkupNode::new(NodeKind::ListItem)
        .with_content(vec![
            MarkupNode::new(NodeKind::CodeBlock).with_content(vec![text("x")]),
        ])])]);
    assert_eq!(render(&doc), "* ```\n  x\n  ```");
}

#[test]
fn test_inline_nodes() {
    let doc = MarkupNode::doc(vec![
        MarkupNode::paragraph(vec![
            text("see "),
            MarkupNode::new(NodeKind::Image)
                .with_attr("src", "a.png")
                .with_attr("alt", "A"),
            text(" here"),
        ]),
        MarkupNode::paragraph(vec![MarkupNode::new(NodeKind::Embed)
            .with_attr("src", "https://v.io/1")]),
        MarkupNode::paragraph(vec![MarkupNode::new(NodeKind::Comment)
            .with_content(vec![text(" note ")])]),
    ]);
    assert_snapshot!(render(&doc), @r#"
see ![A](a.png) here

<a href="https://v.io/1" data-type="embed">https://v.io/1</a>

<!-- note -->
"#);
}

#[test]
fn test_code_mark_inside_strike() {
    let doc = MarkupNode::doc(vec![MarkupNode::paragraph(vec![marked(
        "x",
        &[MarkKind::Strike, MarkKind::Code],
    )])]);
    assert_eq!(render(&doc), "~~`x`~~");
}

#[test]
fn test_link_around_bold() {
    let doc = MarkupNode::doc(vec![MarkupNode::paragraph(vec![MarkupNode::text(
        "a",
        vec![
            MarkupMark::new(MarkKind::Link).with_attr("href", "http://h"),
            MarkupMark::new(MarkKind::Bold),
        ],
    )])]);
    assert_eq!(render(&doc), "[**a**](http://h)");
}

#[test]
fn test_mermaid_fence() {
    let doc = MarkupNode::doc(vec![
        MarkupNode::new(NodeKind::Mermaid).with_content(vec![text("graph TD")])
    ]);
    assert_eq!(render(&doc), "```mermaid\ngraph TD\n```");
}

#[test]
fn test_unknown_mark_in_tree() {
    let doc = MarkupNode::doc(vec![MarkupNode::paragraph(vec![MarkupNode::text(
        "x",
        vec![MarkupMark::new(MarkKind::Extension("spoiler".into()))],
    )])]);
    assert_eq!(
        markup_to_markdown(&doc, &ConvertOptions::default()),
        Err(FormatError::UnknownMarkKind("spoiler".into()))
    );
}

#[test]
fn test_document() {
    let doc = MarkupNode::doc(vec![
        MarkupNode::new(NodeKind::Heading)
            .with_attr("level", 1)
            .with_content(vec![text("Plan")]),
        MarkupNode::paragraph(vec![
            text("Ship "),
            marked("soon", &[MarkKind::Bold]),
            text("."),
        ]),
        MarkupNode::new(NodeKind::TodoList).with_content(vec![
            item(NodeKind::TodoItem, "write").with_attr("checked", true),
            item(NodeKind::TodoItem, "review").with_attr("checked", false),
        ]),
        MarkupNode::new(NodeKind::Blockquote)
            .with_content(vec![MarkupNode::paragraph(vec![text("done")])]),
        MarkupNode::new(NodeKind::HorizontalRule),
    ]);
    assert_snapshot!(render(&doc), @r#"
# Plan

Ship **soon**.

* [x] write
* [ ] review

> done

---
"#);
}
