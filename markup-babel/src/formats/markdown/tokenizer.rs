//! Comrak AST → flat token stream
//!
//! comrak does the CommonMark work (block structure, emphasis resolution, link parsing). This
//! module only flattens its tree into [`Token`]s. Constructs that have no token kind become
//! `Unknown` tokens carrying comrak's node name so the parser can reject them by name.

use super::token::{Token, TokenKind};
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Tokenize Markdown source into a flat block token stream.
pub fn tokenize(source: &str) -> Vec<Token> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut tokenizer = Tokenizer {
        source: SourceIndex::new(source),
        tokens: Vec::new(),
    };
    for child in root.children() {
        tokenizer.block(child);
    }
    tokenizer.tokens
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options
}

/// Byte lookup by comrak's 1-based line/column source positions
struct SourceIndex<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> SourceIndex<'s> {
    fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        SourceIndex {
            source,
            line_starts,
        }
    }

    fn byte_at(&self, line: usize, column: usize) -> Option<u8> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        self.source
            .as_bytes()
            .get(start + column.checked_sub(1)?)
            .copied()
    }
}

struct Tokenizer<'s> {
    source: SourceIndex<'s>,
    tokens: Vec<Token>,
}

impl Tokenizer<'_> {
    fn block<'a>(&mut self, node: &'a AstNode<'a>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Paragraph => {
                self.tokens.push(Token::open(TokenKind::Paragraph));
                let inline = self.inline_token(node);
                self.tokens.push(inline);
                self.tokens.push(Token::close(TokenKind::Paragraph));
            }
            NodeValue::Heading(heading) => {
                let markup = "#".repeat(heading.level as usize);
                self.tokens.push(
                    Token::open(TokenKind::Heading)
                        .with_attr("level", heading.level.to_string())
                        .with_markup(markup.clone()),
                );
                let inline = self.inline_token(node);
                self.tokens.push(inline);
                self.tokens
                    .push(Token::close(TokenKind::Heading).with_markup(markup));
            }
            NodeValue::BlockQuote => {
                self.tokens
                    .push(Token::open(TokenKind::Blockquote).with_markup(">"));
                self.children(node);
                self.tokens
                    .push(Token::close(TokenKind::Blockquote).with_markup(">"));
            }
            NodeValue::List(list) => {
                let (kind, markup) = match list.list_type {
                    ListType::Bullet => (
                        TokenKind::BulletList,
                        char::from(list.bullet_char).to_string(),
                    ),
                    ListType::Ordered => (
                        TokenKind::OrderedList,
                        match list.delimiter {
                            ListDelimType::Paren => ")".to_string(),
                            ListDelimType::Period => ".".to_string(),
                        },
                    ),
                };
                let mut open = Token::open(kind.clone()).with_markup(markup.clone());
                if kind == TokenKind::OrderedList {
                    open.set_attr("start", list.start.to_string());
                }
                self.tokens.push(open);
                self.children(node);
                self.tokens.push(Token::close(kind).with_markup(markup));
            }
            NodeValue::Item(list) => {
                let markup = match list.list_type {
                    ListType::Bullet => char::from(list.bullet_char).to_string(),
                    ListType::Ordered => ".".to_string(),
                };
                self.tokens
                    .push(Token::open(TokenKind::ListItem).with_markup(markup.clone()));
                self.children(node);
                self.tokens
                    .push(Token::close(TokenKind::ListItem).with_markup(markup));
            }
            NodeValue::CodeBlock(code) => {
                let literal = code
                    .literal
                    .strip_suffix('\n')
                    .unwrap_or(&code.literal)
                    .to_string();
                let token = if code.fenced {
                    let mut token = Token::leaf(TokenKind::Fence, literal).with_markup(
                        char::from(code.fence_char)
                            .to_string()
                            .repeat(code.fence_length),
                    );
                    token.info = code.info.trim().to_string();
                    token
                } else {
                    Token::leaf(TokenKind::CodeBlock, literal)
                };
                self.tokens.push(token);
            }
            NodeValue::HtmlBlock(html) => {
                self.tokens
                    .push(Token::leaf(TokenKind::HtmlBlock, html.literal));
            }
            NodeValue::ThematicBreak => {
                self.tokens.push(Token::leaf(TokenKind::Hr, ""));
            }
            NodeValue::Table(_) => self.table(node),
            other => {
                self.tokens.push(Token::leaf(
                    TokenKind::Unknown(node_name(&other).to_string()),
                    "",
                ));
            }
        }
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>) {
        for child in node.children() {
            self.block(child);
        }
    }

    fn table<'a>(&mut self, node: &'a AstNode<'a>) {
        self.tokens.push(Token::open(TokenKind::Table));
        let mut body_open = false;
        for row in node.children() {
            let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
            if header {
                self.tokens.push(Token::open(TokenKind::Thead));
                self.table_row(row, true);
                self.tokens.push(Token::close(TokenKind::Thead));
            } else {
                if !body_open {
                    self.tokens.push(Token::open(TokenKind::Tbody));
                    body_open = true;
                }
                self.table_row(row, false);
            }
        }
        if body_open {
            self.tokens.push(Token::close(TokenKind::Tbody));
        }
        self.tokens.push(Token::close(TokenKind::Table));
    }

    fn table_row<'a>(&mut self, row: &'a AstNode<'a>, header: bool) {
        let cell_kind = if header { TokenKind::Th } else { TokenKind::Td };
        self.tokens.push(Token::open(TokenKind::Tr));
        for cell in row.children() {
            self.tokens.push(Token::open(cell_kind.clone()));
            let inline = self.inline_token(cell);
            self.tokens.push(inline);
            self.tokens.push(Token::close(cell_kind.clone()));
        }
        self.tokens.push(Token::close(TokenKind::Tr));
    }

    fn inline_token<'a>(&self, node: &'a AstNode<'a>) -> Token {
        let mut children = Vec::new();
        for child in node.children() {
            self.inline(child, &mut children);
        }
        let mut token = Token::leaf(TokenKind::Inline, plain_text(&children));
        token.children = children;
        token
    }

    fn inline<'a>(&self, node: &'a AstNode<'a>, out: &mut Vec<Token>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Text(text) => push_text(out, &text),
            NodeValue::SoftBreak => out.push(Token::leaf(TokenKind::Softbreak, "")),
            NodeValue::LineBreak => out.push(Token::leaf(TokenKind::Hardbreak, "")),
            NodeValue::Code(code) => out.push(
                Token::leaf(TokenKind::CodeInline, code.literal)
                    .with_markup("`".repeat(code.num_backticks.max(1))),
            ),
            NodeValue::HtmlInline(html) => out.push(Token::leaf(TokenKind::HtmlInline, html)),
            NodeValue::Emph => {
                let markup = if self.delimiter(node) == Some(b'_') {
                    "_"
                } else {
                    "*"
                };
                self.wrapped(node, TokenKind::Em, markup, out);
            }
            NodeValue::Strong => {
                let markup = if self.delimiter(node) == Some(b'_') {
                    "__"
                } else {
                    "**"
                };
                self.wrapped(node, TokenKind::Strong, markup, out);
            }
            NodeValue::Strikethrough => self.wrapped(node, TokenKind::S, "~~", out),
            NodeValue::Link(link) => {
                let mut open = Token::open(TokenKind::Link).with_attr("href", link.url);
                if !link.title.is_empty() {
                    open.set_attr("title", link.title);
                }
                out.push(open);
                for child in node.children() {
                    self.inline(child, out);
                }
                out.push(Token::close(TokenKind::Link));
            }
            NodeValue::Image(link) => {
                let mut children = Vec::new();
                for child in node.children() {
                    self.inline(child, &mut children);
                }
                let alt = alt_text(&children);
                let mut image = Token::leaf(TokenKind::Image, alt.clone())
                    .with_attr("src", link.url)
                    .with_attr("alt", alt);
                if !link.title.is_empty() {
                    image.set_attr("title", link.title);
                }
                image.children = children;
                out.push(image);
            }
            other => out.push(Token::leaf(
                TokenKind::Unknown(node_name(&other).to_string()),
                "",
            )),
        }
    }

    fn wrapped<'a>(
        &self,
        node: &'a AstNode<'a>,
        kind: TokenKind,
        markup: &str,
        out: &mut Vec<Token>,
    ) {
        out.push(Token::open(kind.clone()).with_markup(markup));
        for child in node.children() {
            self.inline(child, out);
        }
        out.push(Token::close(kind).with_markup(markup));
    }

    /// Delimiter byte an emphasis node starts with in the source
    fn delimiter<'a>(&self, node: &'a AstNode<'a>) -> Option<u8> {
        let start = node.data.borrow().sourcepos.start;
        self.source.byte_at(start.line, start.column)
    }
}

/// Token name for comrak constructs without a token kind
fn node_name(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::Document => "document",
        NodeValue::FrontMatter(_) => "front_matter",
        NodeValue::DescriptionList => "description_list",
        NodeValue::DescriptionItem(_) => "description_item",
        NodeValue::DescriptionTerm => "description_term",
        NodeValue::DescriptionDetails => "description_details",
        NodeValue::FootnoteDefinition(_) => "footnote_definition",
        NodeValue::FootnoteReference(_) => "footnote_ref",
        NodeValue::TaskItem(_) => "task_item",
        NodeValue::TableRow(_) => "tr",
        NodeValue::TableCell => "td",
        NodeValue::Superscript => "superscript",
        _ => "unknown",
    }
}

fn push_text(out: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.kind == TokenKind::Text => last.content.push_str(text),
        _ => out.push(Token::leaf(TokenKind::Text, text)),
    }
}

fn plain_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::Text | TokenKind::CodeInline))
        .map(|t| t.content.as_str())
        .collect()
}

fn alt_text(tokens: &[Token]) -> String {
    let mut alt = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Text | TokenKind::CodeInline | TokenKind::Image => {
                alt.push_str(&token.content)
            }
            TokenKind::Softbreak | TokenKind::Hardbreak => alt.push('\n'),
            _ => {}
        }
    }
    alt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(Token::name).collect()
    }

    #[test]
    fn test_paragraph_tokens() {
        let tokens = tokenize("Hello *world*\n");
        assert_eq!(
            names(&tokens),
            vec!["paragraph_open", "inline", "paragraph_close"]
        );
        assert_eq!(
            names(&tokens[1].children),
            vec!["text", "em_open", "text", "em_close"]
        );
        assert_eq!(tokens[1].children[1].markup, "*");
    }

    #[test]
    fn test_underscore_emphasis_markup() {
        let tokens = tokenize("_a_ and __b__\n");
        let inline = &tokens[1].children;
        assert_eq!(inline[0].markup, "_");
        let strong = inline
            .iter()
            .find(|t| t.is_open(&TokenKind::Strong))
            .unwrap();
        assert_eq!(strong.markup, "__");
    }

    #[test]
    fn test_bullet_list_markup() {
        let tokens = tokenize("- one\n- two\n");
        assert_eq!(tokens[0].name(), "bullet_list_open");
        assert_eq!(tokens[0].markup, "-");
        assert_eq!(tokens[1].name(), "list_item_open");
        assert_eq!(tokens.last().unwrap().name(), "bullet_list_close");
    }

    #[test]
    fn test_ordered_list_start() {
        let tokens = tokenize("3. three\n4. four\n");
        assert_eq!(tokens[0].name(), "ordered_list_open");
        assert_eq!(tokens[0].attr("start"), Some("3"));
    }

    #[test]
    fn test_fence_strips_trailing_newline() {
        let tokens = tokenize("```rust\nlet x = 1;\n```\n");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Fence);
        assert_eq!(tokens[0].info, "rust");
        assert_eq!(tokens[0].content, "let x = 1;");
    }

    #[test]
    fn test_table_sections() {
        let tokens = tokenize("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(
            names(&tokens[..4]),
            vec!["table_open", "thead_open", "tr_open", "th_open"]
        );
        assert!(tokens.iter().any(|t| t.is_open(&TokenKind::Tbody)));
        assert!(tokens.iter().any(|t| t.is_open(&TokenKind::Td)));
    }

    #[test]
    fn test_image_alt_with_breaks() {
        let tokens = tokenize("![line0\\\nline1](http://x/y.png \"T\")\n");
        let image = &tokens[1].children[0];
        assert_eq!(image.kind, TokenKind::Image);
        assert_eq!(image.attr("alt"), Some("line0\nline1"));
        assert_eq!(image.attr("title"), Some("T"));
    }

    #[test]
    fn test_unhandled_construct_names() {
        let token = Token::leaf(
            TokenKind::Unknown(node_name(&NodeValue::Superscript).to_string()),
            "",
        );
        assert_eq!(token.name(), "superscript");
        assert_eq!(node_name(&NodeValue::DescriptionList), "description_list");
        assert_eq!(node_name(&NodeValue::Paragraph), "unknown");
    }

    #[test]
    fn test_html_tokens() {
        let tokens = tokenize("<!-- note -->\n\ntext <b>bold</b>\n");
        assert_eq!(tokens[0].kind, TokenKind::HtmlBlock);
        let inline = &tokens[2].children;
        assert_eq!(inline[1].kind, TokenKind::HtmlInline);
        assert_eq!(inline[1].content, "<b>");
    }
}
