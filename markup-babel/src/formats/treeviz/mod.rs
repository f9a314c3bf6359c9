//! Treeviz formatter for Markup trees
//!
//! One line per node, nesting drawn with box connectors:
//!
//! ```text
//! ⧉ doc (2 blocks)
//! ├─ § heading
//! │ └─ ◦ "Title"
//! └─ ☰ bulletList (2 items)
//!   ├─ • listItem
//!   ...
//! ```
//!
//! Text labels are truncated to 30 characters. The `attrs` and `marks` parameters add node
//! attributes and text marks to the labels.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::Format;
use crate::markup::{MarkupNode, NodeKind};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, Default)]
struct Params {
    show_attrs: bool,
    show_marks: bool,
}

fn format_node(node: &MarkupNode, prefix: &str, is_last: bool, params: Params) -> String {
    let connector = if is_last { "└─" } else { "├─" };
    let mut output = format!(
        "{prefix}{connector} {} {}\n",
        get_icon(&node.kind),
        label(node, params)
    );
    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    output.push_str(&format_children(&node.content, &child_prefix, params));
    output
}

fn format_children(children: &[MarkupNode], prefix: &str, params: Params) -> String {
    let mut output = String::new();
    for (i, child) in children.iter().enumerate() {
        output.push_str(&format_node(child, prefix, i == children.len() - 1, params));
    }
    output
}

fn label(node: &MarkupNode, params: Params) -> String {
    let mut label = match node.kind {
        NodeKind::Text => format!("{:?}", truncate(node.text_str())),
        NodeKind::BulletList | NodeKind::OrderedList | NodeKind::TodoList | NodeKind::TaskList => {
            format!("{} ({} items)", node.kind, node.content.len())
        }
        _ => node.kind.to_string(),
    };

    if params.show_attrs && !node.attrs.is_empty() {
        let attrs: Vec<String> = node
            .attrs
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        label.push_str(&format!(" {{{}}}", attrs.join(", ")));
    }

    if params.show_marks && !node.mark_list().is_empty() {
        let marks: Vec<&str> = node.mark_list().iter().map(|m| m.kind.as_str()).collect();
        label.push_str(&format!(" [{}]", marks.join(", ")));
    }

    label
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= LABEL_WIDTH {
        return text.to_string();
    }
    let mut out: String = text.chars().take(LABEL_WIDTH - 1).collect();
    out.push('…');
    out
}

pub fn to_treeviz_str(doc: &MarkupNode) -> String {
    to_treeviz_str_with_params(doc, &HashMap::new())
}

/// Render a tree with optional parameters
///
/// # Parameters
///
/// - `"attrs"`: `"true"` appends node attributes as `{key=value, ...}`
/// - `"marks"`: `"true"` appends text marks as `[bold, link]`
pub fn to_treeviz_str_with_params(doc: &MarkupNode, params: &HashMap<String, String>) -> String {
    let flag = |key: &str| {
        params
            .get(key)
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false)
    };
    let params = Params {
        show_attrs: flag("attrs"),
        show_marks: flag("marks"),
    };

    let mut output = if doc.kind == NodeKind::Doc {
        format!("{} doc ({} blocks)\n", get_icon(&doc.kind), doc.content.len())
    } else {
        format!("{} {}\n", get_icon(&doc.kind), label(doc, params))
    };
    output.push_str(&format_children(&doc.content, "", params));
    output
}

/// Format implementation for treeviz format
#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with box connectors and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &MarkupNode) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }
}
