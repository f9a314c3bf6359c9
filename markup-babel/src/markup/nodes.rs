//! Markup tree node types
//!
//! The tree mirrors the JSON shape used by the editor: every node has a `type`, and optionally
//! `content`, `marks`, `attrs` and `text`. Kinds serialize with their camelCase editor names.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map shared by nodes and marks. Ordered so that equality and output are stable.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Null,
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(value) => Some(*value),
            AttrValue::Str(value) => match value.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Integer view; numeric strings are accepted since HTML and query attrs arrive as text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(value) => Some(*value),
            AttrValue::Str(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::Str(value) => f.write_str(value),
            AttrValue::Null => Ok(()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

macro_rules! named_kinds {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)*
            /// Kind supplied by a deployment's extension set, opaque to the converter
            Extension(String),
        }

        impl $name {
            /// Every builtin kind, in declaration order
            pub const BUILTIN: &'static [$name] = &[$($name::$variant,)*];

            /// Editor name of this kind
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)*
                    $name::Extension(name) => name,
                }
            }

            /// Resolve an editor name; unknown names become [`Self::Extension`]
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($label => $name::$variant,)*
                    other => $name::Extension(other.to_string()),
                }
            }

            pub fn is_builtin(&self) -> bool {
                !matches!(self, $name::Extension(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                if name.is_empty() {
                    return Err(de::Error::custom(concat!("empty ", stringify!($name))));
                }
                Ok($name::from_name(&name))
            }
        }
    };
}

named_kinds! {
    /// Node kinds known to the converter
    pub enum NodeKind {
        Doc => "doc",
        Paragraph => "paragraph",
        Blockquote => "blockquote",
        Heading => "heading",
        CodeBlock => "codeBlock",
        Text => "text",
        Image => "image",
        Reference => "reference",
        HardBreak => "hardBreak",
        OrderedList => "orderedList",
        BulletList => "bulletList",
        ListItem => "listItem",
        TaskList => "taskList",
        TaskItem => "taskItem",
        TodoList => "todoList",
        TodoItem => "todoItem",
        Table => "table",
        TableRow => "tableRow",
        TableCell => "tableCell",
        TableHeader => "tableHeader",
        HorizontalRule => "horizontalRule",
        Comment => "comment",
        Embed => "embed",
        SubLink => "subLink",
        Mermaid => "mermaid",
    }
}

named_kinds! {
    /// Inline mark kinds known to the converter
    pub enum MarkKind {
        Link => "link",
        Em => "em",
        Bold => "bold",
        Code => "code",
        Strike => "strike",
        Underline => "underline",
    }
}

/// Inline formatting annotation. Equality is structural (kind and attrs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkupMark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl MarkupMark {
    pub fn new(kind: MarkKind) -> Self {
        MarkupMark {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key).filter(|value| !value.is_null())
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }
}

/// A node of the Markup tree
///
/// `marks` is `Some` for every text node the parser builds (possibly empty) and for other nodes
/// only when they carry marks. That distinction keeps a reference node from ever merging with the
/// plain text that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<MarkupNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<MarkupMark>>,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl MarkupNode {
    pub fn new(kind: NodeKind) -> Self {
        MarkupNode {
            kind,
            content: Vec::new(),
            marks: None,
            attrs: Attrs::new(),
            text: None,
        }
    }

    pub fn doc(content: Vec<MarkupNode>) -> Self {
        MarkupNode::new(NodeKind::Doc).with_content(content)
    }

    pub fn paragraph(content: Vec<MarkupNode>) -> Self {
        MarkupNode::new(NodeKind::Paragraph).with_content(content)
    }

    /// Text node carrying the given marks
    pub fn text(text: impl Into<String>, marks: Vec<MarkupMark>) -> Self {
        MarkupNode {
            kind: NodeKind::Text,
            content: Vec::new(),
            marks: Some(marks),
            attrs: Attrs::new(),
            text: Some(text.into()),
        }
    }

    pub fn with_content(mut self, content: Vec<MarkupNode>) -> Self {
        self.content = content;
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_marks(mut self, marks: Vec<MarkupMark>) -> Self {
        self.marks = Some(marks);
        self
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key).filter(|value| !value.is_null())
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }

    /// Attribute rendered as text regardless of its scalar type
    pub fn attr_string(&self, key: &str) -> Option<String> {
        self.attr(key).map(|value| value.to_string())
    }

    /// Marks as a slice (absent marks read as empty)
    pub fn mark_list(&self) -> &[MarkupMark] {
        self.marks.as_deref().unwrap_or(&[])
    }

    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &MarkupNode, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.content {
        collect_text(child, out);
    }
}
