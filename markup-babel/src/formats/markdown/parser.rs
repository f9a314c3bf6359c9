//! Markdown parsing (Markdown → Markup import)
//!
//! Pipeline: Markdown string → comrak tokens → todo list post-processing → [`ParseState`] → `doc`.
//!
//! The parse state is a stack of open frames plus the currently active marks. Tokens are
//! dispatched through the [`RuleTable`] built for the parser's extension set; a token without a
//! rule aborts the parse with [`FormatError::UnsupportedToken`].

use super::lists::process_todo_lists;
use super::rules::{
    code_attrs, link_attrs, reference_attrs, Rule, RuleContext, RuleTable, SpecialRule,
};
use super::token::{Nesting, Token, TokenKind};
use super::tokenizer::tokenize;
use crate::error::FormatError;
use crate::formats::html::{HtmlImporter, HtmlToMarkup};
use crate::markup::marks::{add_to_set, remove_from_set};
use crate::markup::{push_merged, Attrs, MarkKind, MarkupMark, MarkupNode, NodeKind};
use crate::options::ConvertOptions;
use tracing::{debug, warn};

struct Frame {
    kind: NodeKind,
    attrs: Attrs,
    content: Vec<MarkupNode>,
}

/// Stack-based tree builder
///
/// Starts with an open `doc` frame. Closing a node resets the active marks, so marks never leak
/// across a block boundary; pushing text merges it into an equally-marked previous sibling.
pub struct ParseState {
    stack: Vec<Frame>,
    marks: Vec<MarkupMark>,
}

impl ParseState {
    pub fn new() -> Self {
        ParseState {
            stack: vec![Frame {
                kind: NodeKind::Doc,
                attrs: Attrs::new(),
                content: Vec::new(),
            }],
            marks: Vec::new(),
        }
    }

    pub fn top_kind(&self) -> Option<&NodeKind> {
        self.stack.last().map(|frame| &frame.kind)
    }

    pub fn active_marks(&self) -> &[MarkupMark] {
        &self.marks
    }

    pub fn open_node(&mut self, kind: NodeKind, attrs: Attrs) {
        self.stack.push(Frame {
            kind,
            attrs,
            content: Vec::new(),
        });
    }

    /// Close the top frame and append it to its parent. The root frame is only closed by
    /// [`ParseState::finish`].
    pub fn close_node(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let node = self.build(frame);
            self.push(node);
        }
    }

    /// Append a node to the current frame, merging adjacent text with equal marks
    pub fn push(&mut self, node: MarkupNode) {
        if let Some(frame) = self.stack.last_mut() {
            push_merged(&mut frame.content, node);
        }
    }

    /// Push a leaf node carrying the active marks
    pub fn add_node(&mut self, kind: NodeKind, attrs: Attrs) {
        let mut node = MarkupNode::new(kind);
        node.attrs = attrs;
        if !self.marks.is_empty() {
            node.marks = Some(self.marks.clone());
        }
        self.push(node);
    }

    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let node = MarkupNode::text(text, self.marks.clone());
        self.push(node);
    }

    pub fn open_mark(&mut self, mark: MarkupMark) {
        self.marks = add_to_set(&mark, &self.marks);
    }

    pub fn close_mark(&mut self, kind: &MarkKind) {
        self.marks = remove_from_set(kind, &self.marks);
    }

    /// Close every open frame and return the root `doc` node
    pub fn finish(mut self) -> MarkupNode {
        while self.stack.len() > 1 {
            self.close_node();
        }
        match self.stack.pop() {
            Some(frame) => self.build(frame),
            None => MarkupNode::doc(Vec::new()),
        }
    }

    fn build(&mut self, frame: Frame) -> MarkupNode {
        let marks = std::mem::take(&mut self.marks);
        let mut node = MarkupNode::new(frame.kind).with_content(frame.content);
        node.attrs = frame.attrs;
        if !marks.is_empty() {
            node.marks = Some(marks);
        }
        node
    }
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new()
    }
}

/// Markdown → Markup parser for one extension set
pub struct MarkdownParser {
    rules: RuleTable,
    ref_url: String,
    image_url: String,
    todo_lists: bool,
    paragraphs: bool,
    html: Box<dyn HtmlToMarkup>,
}

impl MarkdownParser {
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            rules: RuleTable::new(&options.extensions),
            ref_url: options.ref_url.clone(),
            image_url: options.image_url.clone(),
            todo_lists: options.extensions.has_todo_lists(),
            paragraphs: options.extensions.has_node(&NodeKind::Paragraph),
            html: Box::new(HtmlImporter::new(options.extensions.clone())),
        }
    }

    /// Replace the converter used for embedded HTML
    pub fn with_html_converter(mut self, html: Box<dyn HtmlToMarkup>) -> Self {
        self.html = html;
        self
    }

    /// Token stream after todo list post-processing
    pub fn tokens(&self, source: &str) -> Vec<Token> {
        let tokens = tokenize(source);
        if self.todo_lists {
            process_todo_lists(tokens)
        } else {
            tokens
        }
    }

    pub fn parse(&self, source: &str) -> Result<MarkupNode, FormatError> {
        let tokens = self.tokens(source);
        debug!(tokens = tokens.len(), "tokenized markdown");

        let mut builder = Builder {
            parser: self,
            state: ParseState::new(),
            links: Vec::new(),
        };
        for token in tokens {
            builder.handle(token)?;
        }
        let doc = builder.state.finish();
        debug!(blocks = doc.content.len(), "built markup tree");
        Ok(doc)
    }

    fn context(&self) -> RuleContext<'_> {
        RuleContext {
            ref_url: &self.ref_url,
            image_url: &self.image_url,
        }
    }
}

struct Builder<'p> {
    parser: &'p MarkdownParser,
    state: ParseState,
    /// One entry per open link token: `true` when it opened a reference node
    links: Vec<bool>,
}

impl Builder<'_> {
    fn handle(&mut self, token: Token) -> Result<(), FormatError> {
        let parser = self.parser;
        let ctx = parser.context();
        let rule = parser
            .rules
            .get(&token.kind)
            .ok_or_else(|| FormatError::UnsupportedToken(token.name()))?;

        match rule {
            Rule::Block(rule) => match token.nesting {
                Nesting::Open => {
                    let attrs = rule.attrs.map(|get| get(&token, &ctx)).unwrap_or_default();
                    self.state.open_node(rule.node.clone(), attrs);
                    if rule.wrap_content {
                        self.state.open_node(NodeKind::Paragraph, Attrs::new());
                    }
                }
                Nesting::Close => {
                    if rule.wrap_content {
                        self.state.close_node();
                    }
                    self.state.close_node();
                }
                Nesting::Leaf => {
                    let attrs = rule.attrs.map(|get| get(&token, &ctx)).unwrap_or_default();
                    self.state.open_node(rule.node.clone(), attrs);
                    self.state.add_text(&token.content);
                    self.state.close_node();
                }
            },
            Rule::Node(rule) => {
                let attrs = rule.attrs.map(|get| get(&token, &ctx)).unwrap_or_default();
                self.state.add_node(rule.node.clone(), attrs);
            }
            Rule::Mark(rule) => {
                let attrs = rule.attrs.map(|get| get(&token, &ctx)).unwrap_or_default();
                let mark = MarkupMark {
                    kind: rule.mark.clone(),
                    attrs,
                };
                match token.nesting {
                    Nesting::Open => self.state.open_mark(mark),
                    Nesting::Close => self.state.close_mark(&rule.mark),
                    Nesting::Leaf => {
                        self.state.open_mark(mark);
                        self.state.add_text(&token.content);
                        self.state.close_mark(&rule.mark);
                    }
                }
            }
            Rule::Special(SpecialRule::Link { references, links }) => {
                self.link(&token, *references, *links)?
            }
            Rule::Special(SpecialRule::Fence { mermaid, code }) => {
                let is_mermaid =
                    *mermaid && token.info.split_whitespace().next() == Some("mermaid");
                let kind = if is_mermaid {
                    NodeKind::Mermaid
                } else if *code {
                    NodeKind::CodeBlock
                } else {
                    return Err(FormatError::UnsupportedToken(token.name()));
                };
                self.state.open_node(kind, code_attrs(&token, &ctx));
                self.state.add_text(&token.content);
                self.state.close_node();
            }
            Rule::Ignore => {}
            Rule::Text => self.state.add_text(&token.content),
            Rule::Softbreak => self.state.add_text("\n"),
            Rule::Inline => {
                for child in merge_html_runs(token.children) {
                    self.handle(child)?;
                }
            }
            Rule::HtmlInline => self.html_inline(&token.content),
            Rule::HtmlBlock => self.html_block(&token.content),
        }
        Ok(())
    }

    fn link(&mut self, token: &Token, references: bool, links: bool) -> Result<(), FormatError> {
        let ctx = self.parser.context();
        match token.nesting {
            Nesting::Open => {
                let href = token.attr("href").unwrap_or_default();
                let ref_url = &self.parser.ref_url;
                let as_reference = references
                    && ((!ref_url.is_empty() && href.starts_with(ref_url.as_str()))
                        || self.state.top_kind() == Some(&NodeKind::Reference));
                if as_reference {
                    self.state
                        .open_node(NodeKind::Reference, reference_attrs(token, &ctx));
                } else if links {
                    self.state.open_mark(MarkupMark {
                        kind: MarkKind::Link,
                        attrs: link_attrs(token, &ctx),
                    });
                } else {
                    return Err(FormatError::UnsupportedToken(token.name()));
                }
                self.links.push(as_reference);
            }
            _ => match self.links.pop() {
                Some(true) => self.state.close_node(),
                Some(false) => self.state.close_mark(&MarkKind::Link),
                None => {}
            },
        }
        Ok(())
    }

    fn html_inline(&mut self, html: &str) {
        match self.parser.html.to_markup(html) {
            Ok(doc) => {
                let unwrap = doc.content.len() == 1
                    && doc.content[0].kind == NodeKind::Paragraph
                    && matches!(
                        self.state.top_kind(),
                        Some(NodeKind::Paragraph | NodeKind::Heading)
                    );
                let content = match doc.content.into_iter().next() {
                    Some(paragraph) if unwrap => paragraph.content,
                    Some(first) => vec![first],
                    None => Vec::new(),
                };
                for node in content {
                    let node = if unwrap {
                        self.with_active_marks(node)
                    } else {
                        node
                    };
                    self.state.push(node);
                }
            }
            Err(err) => {
                warn!(error = %err, html, "keeping inline HTML as text");
                self.state.add_text(html);
            }
        }
    }

    fn html_block(&mut self, html: &str) {
        match self.parser.html.to_markup(html) {
            Ok(doc) => {
                for node in doc.content {
                    self.state.push(node);
                }
            }
            Err(err) => {
                warn!(error = %err, html, "keeping HTML block as text");
                let text = html.trim_end_matches('\n');
                if self.parser.paragraphs && self.state.top_kind() != Some(&NodeKind::Paragraph)
                {
                    self.state.open_node(NodeKind::Paragraph, Attrs::new());
                    self.state.add_text(text);
                    self.state.close_node();
                } else {
                    self.state.add_text(text);
                }
            }
        }
    }

    /// Inline content imported from HTML sits inside whatever marks are open around it
    fn with_active_marks(&self, mut node: MarkupNode) -> MarkupNode {
        let active = self.state.active_marks();
        if active.is_empty() {
            return node;
        }
        let mut marks = active.to_vec();
        for mark in node.mark_list() {
            marks = add_to_set(mark, &marks);
        }
        node.marks = Some(marks);
        node
    }
}

/// Join an opening inline tag, the text up to its matching closing tag and the closer into a
/// single `html_inline` token.
fn merge_html_runs(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        match html_run_end(&tokens, i) {
            Some(end) => {
                let mut merged = tokens[i].clone();
                merged.content = tokens[i..=end].iter().map(html_source).collect();
                out.push(merged);
                i = end + 1;
            }
            None => {
                out.push(tokens[i].clone());
                i += 1;
            }
        }
    }
    out
}

fn html_run_end(tokens: &[Token], start: usize) -> Option<usize> {
    let first = &tokens[start];
    if first.kind != TokenKind::HtmlInline {
        return None;
    }
    let tag = opening_tag(&first.content)?;
    let mut depth = 1;
    for (offset, token) in tokens[start + 1..].iter().enumerate() {
        match token.kind {
            TokenKind::HtmlInline => {
                if opening_tag(&token.content).as_deref() == Some(tag.as_str()) {
                    depth += 1;
                } else if closing_tag(&token.content).as_deref() == Some(tag.as_str()) {
                    depth -= 1;
                    if depth == 0 {
                        return Some(start + 1 + offset);
                    }
                }
            }
            TokenKind::Text | TokenKind::Softbreak => {}
            _ => return None,
        }
    }
    None
}

fn opening_tag(html: &str) -> Option<String> {
    let html = html.trim();
    let rest = html.strip_prefix('<')?;
    if !html.ends_with('>') || html.ends_with("/>") {
        return None;
    }
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

fn closing_tag(html: &str) -> Option<String> {
    let name = html.trim().strip_prefix("</")?.strip_suffix('>')?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

fn html_source(token: &Token) -> String {
    match token.kind {
        TokenKind::Text => token
            .content
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
        TokenKind::Softbreak => "\n".to_string(),
        _ => token.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::Extensions;
    use crate::markup::AttrValue;

    fn parse(source: &str) -> MarkupNode {
        MarkdownParser::new(&ConvertOptions::default())
            .parse(source)
            .unwrap()
    }

    fn bold() -> MarkupMark {
        MarkupMark::new(MarkKind::Bold)
    }

    #[test]
    fn test_state_merges_text_with_same_marks() {
        let mut state = ParseState::new();
        state.open_node(NodeKind::Paragraph, Attrs::new());
        state.add_text("a");
        state.open_mark(bold());
        state.open_mark(bold());
        state.add_text("b");
        state.add_text("c");
        state.add_text("");
        state.close_mark(&MarkKind::Bold);
        state.add_text("d");
        state.close_node();
        let doc = state.finish();
        assert_eq!(
            doc,
            MarkupNode::doc(vec![MarkupNode::paragraph(vec![
                MarkupNode::text("a", vec![]),
                MarkupNode::text("bc", vec![bold()]),
                MarkupNode::text("d", vec![]),
            ])])
        );
    }

    #[test]
    fn test_state_close_resets_marks() {
        let mut state = ParseState::new();
        state.open_node(NodeKind::Paragraph, Attrs::new());
        state.open_mark(bold());
        state.add_text("x");
        state.close_node();
        assert!(state.active_marks().is_empty());
        let doc = state.finish();
        assert_eq!(doc.content[0].marks, Some(vec![bold()]));
    }

    #[test]
    fn test_finish_closes_open_frames() {
        let mut state = ParseState::new();
        state.open_node(NodeKind::Blockquote, Attrs::new());
        state.open_node(NodeKind::Paragraph, Attrs::new());
        state.add_text("x");
        let doc = state.finish();
        assert_eq!(doc.kind, NodeKind::Doc);
        assert_eq!(doc.content[0].kind, NodeKind::Blockquote);
        assert_eq!(doc.text_content(), "x");
    }

    #[test]
    fn test_todo_document() {
        let doc = parse("# TODO\n- [ ] todo 1\n- [x] todo 2\n");
        let item = |text: &str, checked: bool| {
            MarkupNode::new(NodeKind::TodoItem)
                .with_attr("checked", checked)
                .with_content(vec![MarkupNode::paragraph(vec![MarkupNode::text(
                    text,
                    vec![],
                )])])
        };
        assert_eq!(
            doc,
            MarkupNode::doc(vec![
                MarkupNode::new(NodeKind::Heading)
                    .with_attr("level", 1)
                    .with_content(vec![MarkupNode::text("TODO", vec![])]),
                MarkupNode::new(NodeKind::TodoList)
                    .with_attr("bullet", "-")
                    .with_content(vec![item("todo 1", false), item("todo 2", true)]),
            ])
        );
    }

    #[test]
    fn test_reference_link_becomes_node() {
        let doc = parse("See [Doc](ref://?_class=doc&_id=42&label=Doc) now\n");
        let paragraph = &doc.content[0];
        assert_eq!(paragraph.content.len(), 3);
        let reference = &paragraph.content[1];
        assert_eq!(reference.kind, NodeKind::Reference);
        assert_eq!(reference.attr_str("id"), Some("42"));
        assert_eq!(reference.attr_str("objectclass"), Some("doc"));
        assert_eq!(paragraph.content[2], MarkupNode::text(" now", vec![]));
    }

    #[test]
    fn test_plain_link_is_mark() {
        let doc = parse("[site](https://example.com \"T\")\n");
        let text = &doc.content[0].content[0];
        assert_eq!(
            text.marks,
            Some(vec![MarkupMark::new(MarkKind::Link)
                .with_attr("href", "https://example.com")
                .with_attr("title", "T")])
        );
    }

    #[test]
    fn test_inline_code_and_fence() {
        let doc = parse("use `x`\n\n```rust\nfn a() {}\n```\n");
        let code = &doc.content[0].content[1];
        assert_eq!(code.text_str(), "x");
        assert_eq!(code.marks, Some(vec![MarkupMark::new(MarkKind::Code)]));
        let block = &doc.content[1];
        assert_eq!(block.kind, NodeKind::CodeBlock);
        assert_eq!(block.attr_str("language"), Some("rust"));
        assert_eq!(block.text_content(), "fn a() {}");
    }

    #[test]
    fn test_mermaid_fence() {
        let doc = parse("```mermaid\ngraph TD;\n```\n");
        assert_eq!(doc.content[0].kind, NodeKind::Mermaid);
    }

    #[test]
    fn test_table_cells_wrap_paragraphs() {
        let doc = parse("| a |\n|---|\n| 1 |\n");
        let table = &doc.content[0];
        assert_eq!(table.kind, NodeKind::Table);
        let header = &table.content[0].content[0];
        assert_eq!(header.kind, NodeKind::TableHeader);
        assert_eq!(header.attr("colspan"), Some(&AttrValue::Int(1)));
        assert_eq!(header.content[0].kind, NodeKind::Paragraph);
    }

    #[test]
    fn test_disabled_node_is_unsupported_token() {
        let options = ConvertOptions::default()
            .with_extensions(Extensions::all().without_node(&NodeKind::Blockquote));
        let err = MarkdownParser::new(&options).parse("> quote\n").unwrap_err();
        assert_eq!(err, FormatError::UnsupportedToken("blockquote_open".into()));
    }

    #[test]
    fn test_inline_html_run_is_converted() {
        let doc = parse("a <u>b</u> c\n");
        assert_eq!(
            doc.content[0].content,
            vec![
                MarkupNode::text("a ", vec![]),
                MarkupNode::text("b", vec![MarkupMark::new(MarkKind::Underline)]),
                MarkupNode::text(" c", vec![]),
            ]
        );
    }

    #[test]
    fn test_unsupported_inline_html_kept_as_text() {
        let doc = parse("x<sup>2</sup>\n");
        assert_eq!(doc.content[0].text_content(), "x<sup>2</sup>");
    }

    #[test]
    fn test_html_comment_block() {
        let doc = parse("<!-- note -->\n");
        let paragraph = &doc.content[0];
        assert_eq!(paragraph.content[0].kind, NodeKind::Comment);
    }

    #[test]
    fn test_opening_and_closing_tags() {
        assert_eq!(opening_tag("<sub>"), Some("sub".into()));
        assert_eq!(opening_tag("<span class=\"x\">"), Some("span".into()));
        assert_eq!(opening_tag("<br/>"), None);
        assert_eq!(opening_tag("</b>"), None);
        assert_eq!(opening_tag("<!-- c -->"), None);
        assert_eq!(closing_tag("</B>"), Some("b".into()));
    }
}
