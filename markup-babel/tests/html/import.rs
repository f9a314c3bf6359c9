//! HTML format import and export

use crate::common::{marked, text};
use markup_babel::format::Format;
use markup_babel::formats::html::HtmlFormat;
use markup_babel::{AttrValue, Extensions, FormatError, MarkKind, MarkupNode, NodeKind};

#[test]
fn test_paragraph_with_marks() {
    let doc = HtmlFormat::default()
        .parse("<p>a <strong>b</strong> <i>c</i></p>")
        .unwrap();
    assert_eq!(
        doc,
        MarkupNode::doc(vec![MarkupNode::paragraph(vec![
            text("a "),
            marked("b", &[MarkKind::Bold]),
            text(" "),
            marked("c", &[MarkKind::Em]),
        ])])
    );
}

#[test]
fn test_todo_list() {
    let doc = HtmlFormat::default()
        .parse(
            "<ul data-type=\"todoList\"><li data-type=\"todoItem\" data-checked=\"true\" \
             data-todoid=\"t1\"><p>x</p></li></ul>",
        )
        .unwrap();
    let list = &doc.content[0];
    assert_eq!(list.kind, NodeKind::TodoList);
    let item = &list.content[0];
    assert_eq!(item.kind, NodeKind::TodoItem);
    assert_eq!(item.attr("checked").and_then(AttrValue::as_bool), Some(true));
    assert_eq!(item.attr_str("todoid"), Some("t1"));
}

#[test]
fn test_unsupported_element() {
    let err = HtmlFormat::default().parse("<marquee>x</marquee>").unwrap_err();
    match err {
        FormatError::ParseError(message) => assert!(message.contains("marquee")),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_disabled_mark() {
    let format = HtmlFormat::new(Extensions::all().without_mark(&MarkKind::Underline));
    assert!(format.parse("<p><u>x</u></p>").is_err());
}

#[test]
fn test_serialize_document() {
    let doc = MarkupNode::doc(vec![
        MarkupNode::new(NodeKind::Heading)
            .with_attr("level", 2)
            .with_content(vec![text("T")]),
        MarkupNode::paragraph(vec![marked("b", &[MarkKind::Bold])]),
    ]);
    assert_eq!(
        HtmlFormat::default().serialize(&doc).unwrap(),
        "<h2>T</h2>\n<p><strong>b</strong></p>\n"
    );
}
