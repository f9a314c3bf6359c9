//! Flat Markdown token stream
//!
//! Tokens follow the markdown-it shape: block structure is a flat sequence of open/close pairs,
//! and each `inline` token carries the inline tokens of its paragraph, heading or cell as
//! children.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    TodoList,
    TodoItem,
    CodeBlock,
    Fence,
    Hr,
    Table,
    Thead,
    Tbody,
    Tr,
    Th,
    Td,
    Inline,
    Text,
    Softbreak,
    Hardbreak,
    Em,
    Strong,
    S,
    U,
    CodeInline,
    Link,
    Image,
    HtmlInline,
    HtmlBlock,
    /// Construct the tokenizer recognized but no rule covers
    Unknown(String),
}

impl TokenKind {
    pub fn as_str(&self) -> &str {
        match self {
            TokenKind::Paragraph => "paragraph",
            TokenKind::Heading => "heading",
            TokenKind::Blockquote => "blockquote",
            TokenKind::BulletList => "bullet_list",
            TokenKind::OrderedList => "ordered_list",
            TokenKind::ListItem => "list_item",
            TokenKind::TodoList => "todo_list",
            TokenKind::TodoItem => "todo_item",
            TokenKind::CodeBlock => "code_block",
            TokenKind::Fence => "fence",
            TokenKind::Hr => "hr",
            TokenKind::Table => "table",
            TokenKind::Thead => "thead",
            TokenKind::Tbody => "tbody",
            TokenKind::Tr => "tr",
            TokenKind::Th => "th",
            TokenKind::Td => "td",
            TokenKind::Inline => "inline",
            TokenKind::Text => "text",
            TokenKind::Softbreak => "softbreak",
            TokenKind::Hardbreak => "hardbreak",
            TokenKind::Em => "em",
            TokenKind::Strong => "strong",
            TokenKind::S => "s",
            TokenKind::U => "u",
            TokenKind::CodeInline => "code_inline",
            TokenKind::Link => "link",
            TokenKind::Image => "image",
            TokenKind::HtmlInline => "html_inline",
            TokenKind::HtmlBlock => "html_block",
            TokenKind::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub nesting: Nesting,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub markup: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Token>,
}

impl Token {
    fn new(kind: TokenKind, nesting: Nesting) -> Self {
        Token {
            kind,
            nesting,
            attrs: Vec::new(),
            content: String::new(),
            markup: String::new(),
            info: String::new(),
            children: Vec::new(),
        }
    }

    pub fn open(kind: TokenKind) -> Self {
        Token::new(kind, Nesting::Open)
    }

    pub fn close(kind: TokenKind) -> Self {
        Token::new(kind, Nesting::Close)
    }

    pub fn leaf(kind: TokenKind, content: impl Into<String>) -> Self {
        let mut token = Token::new(kind, Nesting::Leaf);
        token.content = content.into();
        token
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn is_open(&self, kind: &TokenKind) -> bool {
        self.nesting == Nesting::Open && &self.kind == kind
    }

    pub fn is_close(&self, kind: &TokenKind) -> bool {
        self.nesting == Nesting::Close && &self.kind == kind
    }

    /// markdown-it style name, e.g. `paragraph_open`, `text`, `em_close`
    pub fn name(&self) -> String {
        match self.nesting {
            Nesting::Open => format!("{}_open", self.kind.as_str()),
            Nesting::Close => format!("{}_close", self.kind.as_str()),
            Nesting::Leaf => self.kind.as_str().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
