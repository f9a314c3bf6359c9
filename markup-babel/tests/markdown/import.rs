//! Import tests for Markdown format (Markdown → Markup)

use crate::common::{block_kinds, marked, parse, text};
use markup_babel::format::Format;
use markup_babel::formats::markdown::MarkdownFormat;
use markup_babel::{
    markdown_to_markup, AttrValue, ConvertOptions, Extensions, FormatError, MarkKind, MarkupNode,
    NodeKind,
};

#[test]
fn test_paragraph_with_marks() {
    let doc = parse("Hello **bold** and *em*\n");
    assert_eq!(
        doc,
        MarkupNode::doc(vec![MarkupNode::paragraph(vec![
            text("Hello "),
            marked("bold", &[MarkKind::Bold]),
            text(" and "),
            marked("em", &[MarkKind::Em]),
        ])])
    );
}

#[test]
fn test_underscore_emphasis_keeps_marker() {
    let doc = parse("_a_ and __b__\n");
    let content = &doc.content[0].content;
    assert_eq!(content[0].mark_list()[0].attr_str("marker"), Some("_"));
    assert_eq!(content[2].mark_list()[0].kind, MarkKind::Bold);
    assert_eq!(content[2].mark_list()[0].attr_str("marker"), Some("__"));
}

#[test]
fn test_heading_level() {
    let doc = parse("### Three\n");
    let heading = &doc.content[0];
    assert_eq!(heading.kind, NodeKind::Heading);
    assert_eq!(heading.attr("level"), Some(&AttrValue::Int(3)));
    assert_eq!(heading.content, vec![text("Three")]);
}

#[test]
fn test_ordered_list_start() {
    let doc = parse("3. a\n4. b\n");
    let list = &doc.content[0];
    assert_eq!(list.kind, NodeKind::OrderedList);
    assert_eq!(list.attr("order"), Some(&AttrValue::Int(3)));
    assert_eq!(list.content.len(), 2);
    assert!(list.content.iter().all(|i| i.kind == NodeKind::ListItem));
}

#[test]
fn test_code_fence() {
    let doc = parse("```rust\nfn main() {}\n```\n");
    assert_eq!(
        doc.content[0],
        MarkupNode::new(NodeKind::CodeBlock)
            .with_attr("language", "rust")
            .with_content(vec![text("fn main() {}")])
    );
}

#[test]
fn test_mermaid_fence_depends_on_extension() {
    let md = "```mermaid\ngraph TD\n```\n";
    assert_eq!(parse(md).content[0].kind, NodeKind::Mermaid);

    let options = ConvertOptions::default()
        .with_extensions(Extensions::all().without_node(&NodeKind::Mermaid));
    let doc = markdown_to_markup(md, &options).unwrap();
    assert_eq!(doc.content[0].kind, NodeKind::CodeBlock);
}

#[test]
fn test_link_mark() {
    let doc = parse("[site](https://example.com \"Home\")\n");
    let node = &doc.content[0].content[0];
    assert_eq!(node.text_str(), "site");
    let link = &node.mark_list()[0];
    assert_eq!(link.kind, MarkKind::Link);
    assert_eq!(link.attr_str("href"), Some("https://example.com"));
    assert_eq!(link.attr_str("title"), Some("Home"));
}

#[test]
fn test_reference_node() {
    let doc = parse("See [Doc](ref://?_class=doc&_id=42&label=Doc) now\n");
    let content = &doc.content[0].content;
    assert_eq!(content.len(), 3);
    let reference = &content[1];
    assert_eq!(reference.kind, NodeKind::Reference);
    assert_eq!(reference.attr_str("id"), Some("42"));
    assert_eq!(reference.attr_str("objectclass"), Some("doc"));
    assert_eq!(reference.attr_str("label"), Some("Doc"));
    assert_eq!(content[2], text(" now"));
}

#[test]
fn test_stored_image() {
    let doc = parse("![pic](http://localhost/files?file=abc&width=320)\n");
    let image = &doc.content[0].content[0];
    assert_eq!(image.kind, NodeKind::Image);
    assert_eq!(image.attr_str("file-id"), Some("abc"));
    assert_eq!(image.attr_str("width"), Some("320"));
    assert_eq!(image.attr_str("alt"), Some("pic"));
}

#[test]
fn test_custom_url_prefixes() {
    let options = ConvertOptions::new("app://ref", "https://cdn.test/blob?file=");
    let doc = markdown_to_markup(
        "[T](app://ref?_id=7&_class=task&label=T) ![x](https://cdn.test/blob?file=q1)\n",
        &options,
    )
    .unwrap();
    let content = &doc.content[0].content;
    assert_eq!(content[0].kind, NodeKind::Reference);
    assert_eq!(content[0].attr_str("id"), Some("7"));
    assert_eq!(content[2].attr_str("file-id"), Some("q1"));
}

#[test]
fn test_inline_html_becomes_marks() {
    let doc = parse("a <ins>b</ins> c\n");
    assert_eq!(
        doc.content[0].content,
        vec![text("a "), marked("b", &[MarkKind::Underline]), text(" c")]
    );
}

#[test]
fn test_unconvertible_html_is_kept_as_text() {
    let doc = parse("a <sup>x</sup> b\n");
    assert_eq!(doc.content[0].content, vec![text("a <sup>x</sup> b")]);
}

#[test]
fn test_html_comment_block() {
    let doc = parse("<!-- note -->\n");
    assert_eq!(block_kinds(&doc), vec![NodeKind::Paragraph]);
    let comment = &doc.content[0].content[0];
    assert_eq!(comment.kind, NodeKind::Comment);
    assert_eq!(comment.text_content(), " note ");
}

#[test]
fn test_disabled_kind_is_rejected() {
    let options = ConvertOptions::default()
        .with_extensions(Extensions::all().without_node(&NodeKind::Blockquote));
    assert_eq!(
        markdown_to_markup("> quoted\n", &options),
        Err(FormatError::UnsupportedToken("blockquote_open".to_string()))
    );
}

#[test]
fn test_format_trait_parse() {
    let format = MarkdownFormat::default();
    assert!(format.supports_parsing());
    let doc = format.parse("plain\n").unwrap();
    assert_eq!(doc, MarkupNode::doc(vec![MarkupNode::paragraph(vec![text("plain")])]));
}
