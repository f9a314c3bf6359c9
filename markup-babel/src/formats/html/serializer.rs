//! HTML serialization (Markup → HTML export)
//!
//! Pipeline: Markup nodes → RcDom handles → HTML string.
//! Output is a bare fragment (no document wrapper), one top-level element after another. Marks are
//! nested outer→inner around each text node.

use crate::error::FormatError;
use crate::markup::{AttrValue, MarkKind, MarkupMark, MarkupNode, NodeKind};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

/// Serialize a sequence of nodes as one HTML fragment
pub fn serialize_nodes(nodes: &[MarkupNode]) -> Result<String, FormatError> {
    let mut handles = Vec::new();
    for node in nodes {
        handles.extend(build_node(node)?);
    }
    serialize_handles(&handles)
}

/// Serialize a `doc` node, top-level blocks separated by newlines
pub fn serialize_document(doc: &MarkupNode) -> Result<String, FormatError> {
    let mut blocks = Vec::new();
    for node in &doc.content {
        blocks.push(serialize_nodes(std::slice::from_ref(node))?);
    }
    let mut html = blocks.join("\n");
    if !html.is_empty() {
        html.push('\n');
    }
    Ok(html)
}

fn build_node(node: &MarkupNode) -> Result<Vec<Handle>, FormatError> {
    let element = match &node.kind {
        NodeKind::Doc => return build_children(node),
        NodeKind::Text => return Ok(vec![build_marked_text(node)]),
        NodeKind::Paragraph => create_element("p", vec![]),
        NodeKind::Heading => {
            let level = node
                .attr("level")
                .and_then(AttrValue::as_int)
                .unwrap_or(1)
                .clamp(1, 6);
            create_element(&format!("h{level}"), vec![])
        }
        NodeKind::Blockquote => create_element("blockquote", vec![]),
        NodeKind::BulletList => create_element("ul", vec![]),
        NodeKind::TodoList => create_element("ul", vec![("data-type", "todoList")]),
        NodeKind::TaskList => create_element("ul", vec![("data-type", "taskList")]),
        NodeKind::OrderedList => {
            let start = node.attr_string("order").unwrap_or_else(|| "1".to_string());
            if start == "1" {
                create_element("ol", vec![])
            } else {
                create_element("ol", vec![("start", start.as_str())])
            }
        }
        NodeKind::ListItem => create_element("li", vec![]),
        NodeKind::TodoItem | NodeKind::TaskItem => {
            let data_type = if node.kind == NodeKind::TodoItem {
                "todoItem"
            } else {
                "taskItem"
            };
            let checked = node
                .attr("checked")
                .and_then(AttrValue::as_bool)
                .unwrap_or(false)
                .to_string();
            let todoid = node.attr_string("todoid");
            let userid = node.attr_string("userid");
            let mut attrs = vec![("data-type", data_type), ("data-checked", checked.as_str())];
            if let Some(todoid) = &todoid {
                attrs.push(("data-todoid", todoid.as_str()));
            }
            if let Some(userid) = &userid {
                attrs.push(("data-userid", userid.as_str()));
            }
            create_element("li", attrs)
        }
        NodeKind::CodeBlock | NodeKind::Mermaid => {
            let language = node.attr_string("language").unwrap_or_default();
            let class = format!("language-{language}");
            let code = if language.is_empty() {
                create_element("code", vec![])
            } else {
                create_element("code", vec![("class", class.as_str())])
            };
            let mut text = node.text_content();
            text.push('\n');
            append(&code, create_text(&text));
            let pre = create_element("pre", vec![]);
            append(&pre, code);
            return Ok(vec![pre]);
        }
        NodeKind::HorizontalRule => return Ok(vec![create_element("hr", vec![])]),
        NodeKind::HardBreak => {
            return Ok(vec![wrap_marks(create_element("br", vec![]), node.mark_list())])
        }
        NodeKind::Image => {
            let values: Vec<(&str, String)> = ["src", "alt", "title", "width", "height"]
                .into_iter()
                .filter_map(|key| node.attr_string(key).map(|value| (key, value)))
                .collect();
            let attrs = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
            return Ok(vec![wrap_marks(create_element("img", attrs), node.mark_list())]);
        }
        NodeKind::Reference => {
            let id = node.attr_string("id").unwrap_or_default();
            let objectclass = node.attr_string("objectclass").unwrap_or_default();
            let label = node.attr_string("label").unwrap_or_default();
            let anchor = create_element(
                "a",
                vec![
                    ("data-type", "reference"),
                    ("data-id", id.as_str()),
                    ("data-objectclass", objectclass.as_str()),
                    ("data-label", label.as_str()),
                ],
            );
            if node.content.is_empty() {
                append(&anchor, create_text(&label));
            } else {
                for child in build_children(node)? {
                    append(&anchor, child);
                }
            }
            return Ok(vec![wrap_marks(anchor, node.mark_list())]);
        }
        NodeKind::Embed => {
            let src = node.attr_string("src").unwrap_or_default();
            let anchor = create_element("a", vec![("href", src.as_str()), ("data-type", "embed")]);
            append(&anchor, create_text(&src));
            return Ok(vec![anchor]);
        }
        NodeKind::Comment => return Ok(vec![create_comment(&node.text_content())]),
        NodeKind::SubLink => {
            let sub = create_element("sub", vec![]);
            for child in build_children(node)? {
                append(&sub, child);
            }
            return Ok(vec![wrap_marks(sub, node.mark_list())]);
        }
        NodeKind::Table => {
            let table = create_element("table", vec![]);
            let body = create_element("tbody", vec![]);
            for child in build_children(node)? {
                append(&body, child);
            }
            append(&table, body);
            return Ok(vec![table]);
        }
        NodeKind::TableRow => create_element("tr", vec![]),
        NodeKind::TableHeader | NodeKind::TableCell => {
            let tag = if node.kind == NodeKind::TableHeader {
                "th"
            } else {
                "td"
            };
            let colspan = node.attr_string("colspan").unwrap_or_else(|| "1".into());
            let rowspan = node.attr_string("rowspan").unwrap_or_else(|| "1".into());
            let colwidth = node.attr_string("colwidth");
            let mut attrs = Vec::new();
            if colspan != "1" {
                attrs.push(("colspan", colspan.as_str()));
            }
            if rowspan != "1" {
                attrs.push(("rowspan", rowspan.as_str()));
            }
            if let Some(colwidth) = &colwidth {
                attrs.push(("colwidth", colwidth.as_str()));
            }
            create_element(tag, attrs)
        }
        NodeKind::Extension(name) => return Err(FormatError::UnknownNodeKind(name.clone())),
    };

    for child in build_children(node)? {
        append(&element, child);
    }
    Ok(vec![element])
}

fn build_children(node: &MarkupNode) -> Result<Vec<Handle>, FormatError> {
    let mut handles = Vec::new();
    for child in &node.content {
        handles.extend(build_node(child)?);
    }
    Ok(handles)
}

fn build_marked_text(node: &MarkupNode) -> Handle {
    wrap_marks(create_text(node.text_str()), node.mark_list())
}

/// Nest `inner` in one element per mark, innermost mark closest to the content
fn wrap_marks(inner: Handle, marks: &[MarkupMark]) -> Handle {
    let mut handle = inner;
    for mark in marks.iter().rev() {
        let wrapper = match &mark.kind {
            MarkKind::Bold => create_element("strong", vec![]),
            MarkKind::Em => create_element("em", vec![]),
            MarkKind::Code => create_element("code", vec![]),
            MarkKind::Strike => create_element("s", vec![]),
            MarkKind::Underline => create_element("u", vec![]),
            MarkKind::Link => {
                let mut attrs = Vec::new();
                if let Some(href) = mark.attr_str("href") {
                    attrs.push(("href", href));
                }
                if let Some(title) = mark.attr_str("title") {
                    attrs.push(("title", title));
                }
                create_element("a", attrs)
            }
            MarkKind::Extension(name) => create_element("span", vec![("data-mark", name.as_str())]),
        };
        append(&wrapper, handle);
        handle = wrapper;
    }
    handle
}

fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

fn create_comment(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Comment {
            contents: text.to_string().into(),
        },
    })
}

fn serialize_handles(handles: &[Handle]) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for handle in handles {
        let serializable = SerializableHandle::from(handle.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
