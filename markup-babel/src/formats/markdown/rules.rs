//! Token → tree rule tables
//!
//! Each token kind resolves to one [`Rule`] describing how the parse state handles it:
//!
//! | Category | Token kinds                                              | Effect                          |
//! |----------|----------------------------------------------------------|---------------------------------|
//! | Block    | paragraph, blockquote, heading, lists, items, table, tr, th, td, code_block | open/close a node; a single leaf token builds node + text |
//! | Node     | image, hardbreak, hr                                     | push a leaf node                |
//! | Mark     | em, strong, s, u, code_inline                            | open/close a mark; a leaf token wraps its text |
//! | Special  | link, fence                                              | kind decided per token (reference vs link, mermaid vs code) |
//! | Ignore   | thead, tbody                                             | nothing                         |
//!
//! Text-level tokens (text, inline, softbreak, html_inline, html_block) have fixed handlers.
//! The table is built once from an [`Extensions`] value; kinds that are not enabled get no rule.

use super::token::{Token, TokenKind};
use crate::extensions::Extensions;
use crate::markup::{AttrValue, Attrs, MarkKind, NodeKind};
use std::collections::HashMap;
use url::Url;

/// URL prefixes that steer attribute extraction
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub ref_url: &'a str,
    pub image_url: &'a str,
}

pub type AttrGetter = fn(&Token, &RuleContext<'_>) -> Attrs;

#[derive(Debug, Clone)]
pub struct BlockRule {
    pub node: NodeKind,
    pub attrs: Option<AttrGetter>,
    /// Wrap the node's content in a paragraph (table cells)
    pub wrap_content: bool,
}

#[derive(Debug, Clone)]
pub struct NodeRule {
    pub node: NodeKind,
    pub attrs: Option<AttrGetter>,
}

#[derive(Debug, Clone)]
pub struct MarkRule {
    pub mark: MarkKind,
    pub attrs: Option<AttrGetter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialRule {
    /// `reference` node when the href carries the reference prefix, `link` mark otherwise
    Link { references: bool, links: bool },
    /// `mermaid` node for mermaid fences when enabled, `codeBlock` otherwise
    Fence { mermaid: bool, code: bool },
}

#[derive(Debug, Clone)]
pub enum Rule {
    Block(BlockRule),
    Node(NodeRule),
    Mark(MarkRule),
    Special(SpecialRule),
    Ignore,
    Text,
    Inline,
    Softbreak,
    HtmlInline,
    HtmlBlock,
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<TokenKind, Rule>,
}

impl RuleTable {
    pub fn new(extensions: &Extensions) -> Self {
        let mut table = RuleTable {
            rules: HashMap::new(),
        };

        table.block(extensions, TokenKind::Blockquote, NodeKind::Blockquote, None);
        table.block(extensions, TokenKind::Paragraph, NodeKind::Paragraph, None);
        table.block(extensions, TokenKind::ListItem, NodeKind::ListItem, None);
        table.block(extensions, TokenKind::BulletList, NodeKind::BulletList, Some(bullet_attrs));
        table.block(extensions, TokenKind::TodoList, NodeKind::TodoList, Some(bullet_attrs));
        table.block(extensions, TokenKind::TodoItem, NodeKind::TodoItem, Some(todo_item_attrs));
        table.block(
            extensions,
            TokenKind::OrderedList,
            NodeKind::OrderedList,
            Some(ordered_list_attrs),
        );
        table.block(extensions, TokenKind::Heading, NodeKind::Heading, Some(heading_attrs));
        table.block(extensions, TokenKind::CodeBlock, NodeKind::CodeBlock, Some(code_attrs));
        table.block(extensions, TokenKind::Table, NodeKind::Table, None);
        table.block(extensions, TokenKind::Tr, NodeKind::TableRow, None);
        table.cell(extensions, TokenKind::Th, NodeKind::TableHeader);
        table.cell(extensions, TokenKind::Td, NodeKind::TableCell);

        table.node(extensions, TokenKind::Hr, NodeKind::HorizontalRule, None);
        table.node(extensions, TokenKind::Image, NodeKind::Image, Some(image_attrs));
        table.node(extensions, TokenKind::Hardbreak, NodeKind::HardBreak, None);

        table.mark(extensions, TokenKind::Em, MarkKind::Em, Some(marker_attrs));
        table.mark(extensions, TokenKind::Strong, MarkKind::Bold, Some(marker_attrs));
        table.mark(extensions, TokenKind::S, MarkKind::Strike, None);
        table.mark(extensions, TokenKind::U, MarkKind::Underline, None);
        table.mark(extensions, TokenKind::CodeInline, MarkKind::Code, None);

        let references = extensions.has_node(&NodeKind::Reference);
        let links = extensions.has_mark(&MarkKind::Link);
        if references || links {
            table.insert(TokenKind::Link, Rule::Special(SpecialRule::Link { references, links }));
        }
        let mermaid = extensions.has_node(&NodeKind::Mermaid);
        let code = extensions.has_node(&NodeKind::CodeBlock);
        if mermaid || code {
            table.insert(TokenKind::Fence, Rule::Special(SpecialRule::Fence { mermaid, code }));
        }

        table.insert(TokenKind::Thead, Rule::Ignore);
        table.insert(TokenKind::Tbody, Rule::Ignore);

        if extensions.has_node(&NodeKind::Text) {
            table.insert(TokenKind::Text, Rule::Text);
            table.insert(TokenKind::Softbreak, Rule::Softbreak);
            table.insert(TokenKind::HtmlInline, Rule::HtmlInline);
            table.insert(TokenKind::HtmlBlock, Rule::HtmlBlock);
        }
        table.insert(TokenKind::Inline, Rule::Inline);

        table
    }

    pub fn get(&self, kind: &TokenKind) -> Option<&Rule> {
        self.rules.get(kind)
    }

    fn insert(&mut self, kind: TokenKind, rule: Rule) {
        self.rules.insert(kind, rule);
    }

    fn block(
        &mut self,
        extensions: &Extensions,
        kind: TokenKind,
        node: NodeKind,
        attrs: Option<AttrGetter>,
    ) {
        if extensions.has_node(&node) {
            self.insert(
                kind,
                Rule::Block(BlockRule {
                    node,
                    attrs,
                    wrap_content: false,
                }),
            );
        }
    }

    fn cell(&mut self, extensions: &Extensions, kind: TokenKind, node: NodeKind) {
        if extensions.has_node(&node) {
            self.insert(
                kind,
                Rule::Block(BlockRule {
                    node,
                    attrs: Some(cell_attrs),
                    wrap_content: true,
                }),
            );
        }
    }

    fn node(
        &mut self,
        extensions: &Extensions,
        kind: TokenKind,
        node: NodeKind,
        attrs: Option<AttrGetter>,
    ) {
        if extensions.has_node(&node) {
            self.insert(kind, Rule::Node(NodeRule { node, attrs }));
        }
    }

    fn mark(
        &mut self,
        extensions: &Extensions,
        kind: TokenKind,
        mark: MarkKind,
        attrs: Option<AttrGetter>,
    ) {
        if extensions.has_mark(&mark) {
            self.insert(kind, Rule::Mark(MarkRule { mark, attrs }));
        }
    }
}

fn set(attrs: &mut Attrs, key: &str, value: impl Into<AttrValue>) {
    attrs.insert(key.to_string(), value.into());
}

fn int_attr(token: &Token, key: &str) -> Option<i64> {
    token.attr(key).and_then(|v| v.trim().parse().ok())
}

fn heading_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    set(&mut attrs, "level", int_attr(token, "level").unwrap_or(1));
    attrs
}

fn ordered_list_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    set(&mut attrs, "order", int_attr(token, "start").unwrap_or(1));
    attrs
}

fn bullet_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    if !token.markup.is_empty() {
        set(&mut attrs, "bullet", token.markup.as_str());
    }
    attrs
}

fn todo_item_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    set(&mut attrs, "checked", token.attr("checked") == Some("true"));
    for key in ["todoid", "userid"] {
        if let Some(value) = token.attr(key) {
            set(&mut attrs, key, value);
        }
    }
    attrs
}

pub(crate) fn code_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    set(&mut attrs, "language", token.info.as_str());
    attrs
}

fn cell_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    set(&mut attrs, "colspan", int_attr(token, "colspan").unwrap_or(1));
    set(&mut attrs, "rowspan", int_attr(token, "rowspan").unwrap_or(1));
    attrs
}

/// `_`-delimited emphasis keeps its delimiter so it serializes back the same way
fn marker_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    if token.markup.starts_with('_') {
        set(&mut attrs, "marker", token.markup.as_str());
    }
    attrs
}

fn image_attrs(token: &Token, ctx: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    let src = token.attr("src").unwrap_or_default();
    set(&mut attrs, "src", src);

    let alt = match token.attr("alt") {
        Some(alt) if !alt.is_empty() => alt,
        _ => token.content.as_str(),
    };
    set(&mut attrs, "alt", alt);
    if let Some(title) = token.attr("title") {
        set(&mut attrs, "title", title);
    }

    if !ctx.image_url.is_empty() && src.starts_with(ctx.image_url) {
        if let Ok(url) = Url::parse(src) {
            set(&mut attrs, "data-type", "image");
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "file" => set(&mut attrs, "file-id", value.as_ref()),
                    "width" => set(&mut attrs, "width", value.as_ref()),
                    "height" => set(&mut attrs, "height", value.as_ref()),
                    _ => {}
                }
            }
        }
    }
    attrs
}

pub(crate) fn link_attrs(token: &Token, _: &RuleContext<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    if let Some(href) = token.attr("href") {
        set(&mut attrs, "href", href);
    }
    if let Some(title) = token.attr("title") {
        set(&mut attrs, "title", title);
    }
    attrs
}

/// Reference attrs come from the query of the reference URL: `_id`, `_class` and `label`.
pub(crate) fn reference_attrs(token: &Token, ctx: &RuleContext<'_>) -> Attrs {
    let href = token.attr("href").unwrap_or_default();
    if href.starts_with(ctx.ref_url) {
        if let Ok(url) = Url::parse(href) {
            let mut attrs = Attrs::new();
            set(&mut attrs, "label", "");
            set(&mut attrs, "id", "");
            set(&mut attrs, "objectclass", "");
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "label" => set(&mut attrs, "label", value.as_ref()),
                    "_id" => set(&mut attrs, "id", value.as_ref()),
                    "_class" => set(&mut attrs, "objectclass", value.as_ref()),
                    _ => {}
                }
            }
            return attrs;
        }
    }
    link_attrs(token, ctx)
}
