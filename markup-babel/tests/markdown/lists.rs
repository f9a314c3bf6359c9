//! Todo detection and list splitting

use crate::common::{block_kinds, parse};
use markup_babel::{markdown_to_markup, AttrValue, ConvertOptions, Extensions, NodeKind};

#[test]
fn test_todo_items() {
    let doc = parse("- [ ] open\n- [x] <!-- todoid=t1,userid=u1 -->done\n");
    assert_eq!(block_kinds(&doc), vec![NodeKind::TodoList]);

    let list = &doc.content[0];
    assert_eq!(list.attr_str("bullet"), Some("-"));

    let open = &list.content[0];
    assert_eq!(open.kind, NodeKind::TodoItem);
    assert_eq!(open.attr("checked"), Some(&AttrValue::Bool(false)));
    assert_eq!(open.text_content(), "open");

    let done = &list.content[1];
    assert_eq!(done.attr("checked"), Some(&AttrValue::Bool(true)));
    assert_eq!(done.attr_str("todoid"), Some("t1"));
    assert_eq!(done.attr_str("userid"), Some("u1"));
    assert_eq!(done.text_content(), "done");
}

#[test]
fn test_mixed_list_is_split_into_runs() {
    let doc = parse("* a\n* [ ] b\n* [x] c\n* d\n");
    assert_eq!(
        block_kinds(&doc),
        vec![NodeKind::BulletList, NodeKind::TodoList, NodeKind::BulletList]
    );
    assert_eq!(doc.content[1].content.len(), 2);
}

#[test]
fn test_alternating_items_become_singletons() {
    let doc = parse("* [ ] a\n* b\n* [ ] c\n");
    assert_eq!(
        block_kinds(&doc),
        vec![NodeKind::TodoList, NodeKind::BulletList, NodeKind::TodoList]
    );
    assert!(doc.content.iter().all(|list| list.content.len() == 1));
}

#[test]
fn test_nested_todo_list() {
    let doc = parse("* parent\n  * [ ] child\n");
    assert_eq!(block_kinds(&doc), vec![NodeKind::BulletList]);
    let item = &doc.content[0].content[0];
    assert_eq!(item.content[1].kind, NodeKind::TodoList);
}

#[test]
fn test_ordered_list_items_are_not_todos() {
    let doc = parse("1. [ ] a\n");
    assert_eq!(block_kinds(&doc), vec![NodeKind::OrderedList]);
    assert_eq!(doc.content[0].text_content(), "[ ] a");
}

#[test]
fn test_todo_detection_needs_todo_kinds() {
    let options = ConvertOptions::default()
        .with_extensions(Extensions::all().without_node(&NodeKind::TodoItem));
    let doc = markdown_to_markup("* [ ] a\n", &options).unwrap();
    assert_eq!(block_kinds(&doc), vec![NodeKind::BulletList]);
    assert_eq!(doc.content[0].text_content(), "[ ] a");
}
