//! Icon mapping for the tree visualization format

use crate::markup::NodeKind;

/// Get the Unicode icon for a node kind
pub fn get_icon(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Doc => "⧉",
        NodeKind::Paragraph => "¶",
        NodeKind::Heading => "§",
        NodeKind::Blockquote => "❝",
        NodeKind::BulletList | NodeKind::OrderedList => "☰",
        NodeKind::TodoList | NodeKind::TaskList => "☑",
        NodeKind::ListItem => "•",
        NodeKind::TodoItem | NodeKind::TaskItem => "☐",
        NodeKind::CodeBlock => "𝒱",
        NodeKind::Mermaid => "⋈",
        NodeKind::Text => "◦",
        NodeKind::HardBreak => "↵",
        NodeKind::HorizontalRule => "⎯",
        NodeKind::Image => "▣",
        NodeKind::Reference => "⊕",
        NodeKind::Embed => "⧈",
        NodeKind::SubLink => "₋",
        NodeKind::Comment => "\"",
        NodeKind::Table => "▦",
        NodeKind::TableRow => "═",
        NodeKind::TableCell | NodeKind::TableHeader => "▢",
        NodeKind::Extension(_) => "○",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_mappings() {
        assert_eq!(get_icon(&NodeKind::Doc), "⧉");
        assert_eq!(get_icon(&NodeKind::Paragraph), "¶");
        assert_eq!(get_icon(&NodeKind::BulletList), "☰");
        assert_eq!(get_icon(&NodeKind::OrderedList), "☰");
        assert_eq!(get_icon(&NodeKind::TodoItem), "☐");
        assert_eq!(get_icon(&NodeKind::Text), "◦");
    }

    #[test]
    fn test_extension_kind() {
        assert_eq!(get_icon(&NodeKind::Extension("emoji".into())), "○");
    }
}
