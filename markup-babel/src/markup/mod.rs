//! The Markup document model
//!
//! A tree of [`MarkupNode`]s with inline [`MarkupMark`]s, shared by the Markdown parser, the
//! Markdown serializer and the HTML collaborator.

pub mod marks;
pub mod nodes;

pub use nodes::{AttrValue, Attrs, MarkKind, MarkupMark, MarkupNode, NodeKind};

/// Append `node` to `content`, merging it into the previous sibling when both carry text with the
/// same marks.
///
/// A reference only carries text when it was built with a `text` field; references produced by
/// the parser keep their label in attrs and never absorb following text.
pub fn push_merged(content: &mut Vec<MarkupNode>, node: MarkupNode) {
    if let Some(last) = content.last_mut() {
        if node.is_text() {
            if is_empty_placeholder(last) {
                *last = node;
                return;
            }
            if is_text_bearing(last)
                && marks::same_set(last.marks.as_deref(), node.marks.as_deref())
            {
                let text = last.text.get_or_insert_with(String::new);
                text.push_str(node.text_str());
                return;
            }
        }
    }
    content.push(node);
}

fn is_text_bearing(node: &MarkupNode) -> bool {
    match node.kind {
        NodeKind::Text => true,
        NodeKind::Reference => node.text.is_some(),
        _ => false,
    }
}

fn is_empty_placeholder(node: &MarkupNode) -> bool {
    node.is_text() && node.text_str().is_empty() && node.mark_list().is_empty()
}
