//! HTML parsing (HTML fragment → Markup import)
//!
//! Pipeline: HTML string → html5ever RcDom → Markup pieces → `doc` node.
//!
//! Every DOM node converts to a list of pieces, each either a block node or an inline node.
//! Transparent wrappers (div, span, thead, ...) return their children's pieces unchanged, so the
//! block/inline decision is made where pieces are collected: inline runs between blocks are
//! wrapped in paragraphs, and whitespace-only runs are dropped.

use super::HtmlFragmentError;
use crate::extensions::Extensions;
use crate::markup::marks::add_to_set;
use crate::markup::{push_merged, MarkKind, MarkupMark, MarkupNode, NodeKind};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML fragment into a `doc` node
pub fn parse_html(html: &str, extensions: &Extensions) -> Result<MarkupNode, HtmlFragmentError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let converter = Converter { extensions };

    let mut handles = Vec::new();
    for child in dom.document.children.borrow().iter() {
        match &child.data {
            NodeData::Element { name, .. } if &*name.local == "html" => {
                for section in child.children.borrow().iter() {
                    if element_name(section).as_deref() == Some("body") {
                        handles.extend(section.children.borrow().iter().cloned());
                    }
                }
            }
            NodeData::Comment { .. } => handles.push(child.clone()),
            _ => {}
        }
    }

    Ok(MarkupNode::doc(converter.blocks(&handles, &[])?))
}

enum Piece {
    Block(MarkupNode),
    Inline(MarkupNode),
}

struct Converter<'a> {
    extensions: &'a Extensions,
}

impl Converter<'_> {
    /// Convert sibling handles into block content, wrapping inline runs in paragraphs.
    fn blocks(
        &self,
        handles: &[Handle],
        marks: &[MarkupMark],
    ) -> Result<Vec<MarkupNode>, HtmlFragmentError> {
        let mut blocks = Vec::new();
        let mut run = Vec::new();
        for handle in handles {
            for piece in self.convert(handle, marks)? {
                match piece {
                    Piece::Block(node) => {
                        self.flush_run(&mut run, &mut blocks)?;
                        blocks.push(node);
                    }
                    Piece::Inline(node) => push_merged(&mut run, node),
                }
            }
        }
        self.flush_run(&mut run, &mut blocks)?;
        Ok(blocks)
    }

    fn flush_run(
        &self,
        run: &mut Vec<MarkupNode>,
        blocks: &mut Vec<MarkupNode>,
    ) -> Result<(), HtmlFragmentError> {
        let content = std::mem::take(run);
        let blank = content
            .iter()
            .all(|node| node.is_text() && node.text_str().trim().is_empty());
        if !blank {
            self.require(&NodeKind::Paragraph)?;
            blocks.push(MarkupNode::paragraph(content));
        }
        Ok(())
    }

    /// Convert sibling handles into inline content (blocks are kept in place).
    fn inlines(
        &self,
        handles: &[Handle],
        marks: &[MarkupMark],
    ) -> Result<Vec<MarkupNode>, HtmlFragmentError> {
        let mut content = Vec::new();
        for handle in handles {
            for piece in self.convert(handle, marks)? {
                match piece {
                    Piece::Block(node) | Piece::Inline(node) => push_merged(&mut content, node),
                }
            }
        }
        Ok(content)
    }

    fn convert(
        &self,
        handle: &Handle,
        marks: &[MarkupMark],
    ) -> Result<Vec<Piece>, HtmlFragmentError> {
        match &handle.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.is_empty() {
                    return Ok(Vec::new());
                }
                self.require(&NodeKind::Text)?;
                Ok(vec![Piece::Inline(MarkupNode::text(text, marks.to_vec()))])
            }
            NodeData::Comment { contents } => {
                self.require(&NodeKind::Comment)?;
                let mut comment = MarkupNode::new(NodeKind::Comment);
                if !contents.is_empty() {
                    comment.content = vec![MarkupNode::text(contents.to_string(), Vec::new())];
                }
                Ok(vec![Piece::Inline(comment)])
            }
            NodeData::Element { .. } => self.element(handle, marks),
            _ => Ok(Vec::new()),
        }
    }

    fn element(
        &self,
        handle: &Handle,
        marks: &[MarkupMark],
    ) -> Result<Vec<Piece>, HtmlFragmentError> {
        let tag = element_name(handle).unwrap_or_default();
        let children = handle.children.borrow().clone();

        let mark = match tag.as_str() {
            "strong" | "b" => Some(MarkupMark::new(MarkKind::Bold)),
            "em" | "i" => Some(MarkupMark::new(MarkKind::Em)),
            "s" | "del" | "strike" => Some(MarkupMark::new(MarkKind::Strike)),
            "u" | "ins" => Some(MarkupMark::new(MarkKind::Underline)),
            "code" => Some(MarkupMark::new(MarkKind::Code)),
            "a" if !matches!(attr(handle, "data-type").as_deref(), Some("embed" | "reference")) => {
                let mut link = MarkupMark::new(MarkKind::Link);
                if let Some(href) = attr(handle, "href") {
                    link = link.with_attr("href", href);
                }
                if let Some(title) = attr(handle, "title") {
                    link = link.with_attr("title", title);
                }
                Some(link)
            }
            _ => None,
        };
        if let Some(mark) = mark {
            if !self.extensions.has_mark(&mark.kind) {
                return Err(HtmlFragmentError::UnsupportedMark(mark.kind.to_string()));
            }
            let marks = add_to_set(&mark, marks);
            return self.transparent(&children, &marks);
        }

        let piece = match tag.as_str() {
            "div" | "span" | "html" | "body" | "thead" | "tbody" | "tfoot" => {
                return self.transparent(&children, marks);
            }
            "head" | "colgroup" | "script" | "style" => return Ok(Vec::new()),
            "p" => Piece::Block(
                self.node(NodeKind::Paragraph)?
                    .with_content(self.inlines(&children, &[])?),
            ),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<i64>().unwrap_or(1);
                Piece::Block(
                    self.node(NodeKind::Heading)?
                        .with_attr("level", level)
                        .with_content(self.inlines(&children, &[])?),
                )
            }
            "blockquote" => Piece::Block(
                self.node(NodeKind::Blockquote)?
                    .with_content(self.blocks(&children, &[])?),
            ),
            "ul" => {
                let kind = match attr(handle, "data-type").as_deref() {
                    Some("todoList") => NodeKind::TodoList,
                    Some("taskList") => NodeKind::TaskList,
                    _ => NodeKind::BulletList,
                };
                Piece::Block(self.node(kind)?.with_content(self.blocks(&children, &[])?))
            }
            "ol" => {
                let order = attr(handle, "start")
                    .and_then(|start| start.trim().parse::<i64>().ok())
                    .unwrap_or(1);
                Piece::Block(
                    self.node(NodeKind::OrderedList)?
                        .with_attr("order", order)
                        .with_content(self.blocks(&children, &[])?),
                )
            }
            "li" => Piece::Block(self.list_item(handle, &children)?),
            "pre" => Piece::Block(self.code_block(handle)?),
            "hr" => Piece::Block(self.node(NodeKind::HorizontalRule)?),
            "table" => Piece::Block(self.table(&children)?),
            "tr" => Piece::Block(self.table_row(&children)?),
            "th" | "td" => Piece::Block(self.table_cell(handle, &tag, &children)?),
            "br" => Piece::Inline(self.marked(self.node(NodeKind::HardBreak)?, marks)),
            "img" => {
                let mut image = self.node(NodeKind::Image)?;
                for key in ["src", "alt", "title", "width", "height"] {
                    if let Some(value) = attr(handle, key) {
                        image = image.with_attr(key, value);
                    }
                }
                Piece::Inline(self.marked(image, marks))
            }
            "sub" => Piece::Inline(self.marked(
                self.node(NodeKind::SubLink)?
                    .with_content(self.inlines(&children, &[])?),
                marks,
            )),
            "a" => Piece::Inline(self.special_anchor(handle, &children, marks)?),
            other => return Err(HtmlFragmentError::UnsupportedElement(other.to_string())),
        };
        Ok(vec![piece])
    }

    fn transparent(
        &self,
        children: &[Handle],
        marks: &[MarkupMark],
    ) -> Result<Vec<Piece>, HtmlFragmentError> {
        let mut pieces = Vec::new();
        for child in children {
            pieces.extend(self.convert(child, marks)?);
        }
        Ok(pieces)
    }

    fn list_item(
        &self,
        handle: &Handle,
        children: &[Handle],
    ) -> Result<MarkupNode, HtmlFragmentError> {
        let kind = match attr(handle, "data-type").as_deref() {
            Some("todoItem") => NodeKind::TodoItem,
            Some("taskItem") => NodeKind::TaskItem,
            _ => NodeKind::ListItem,
        };
        let mut item = self.node(kind.clone())?;
        if kind != NodeKind::ListItem {
            let checked = attr(handle, "data-checked").as_deref() == Some("true");
            item = item.with_attr("checked", checked);
        }
        for key in ["todoid", "userid"] {
            if let Some(value) = attr(handle, &format!("data-{key}")) {
                item = item.with_attr(key, value);
            }
        }
        Ok(item.with_content(self.blocks(children, &[])?))
    }

    fn code_block(&self, handle: &Handle) -> Result<MarkupNode, HtmlFragmentError> {
        let code = handle
            .children
            .borrow()
            .iter()
            .find(|child| element_name(child).as_deref() == Some("code"))
            .cloned();
        let language = code
            .as_ref()
            .and_then(|code| attr(code, "class"))
            .and_then(|class| {
                class
                    .split_whitespace()
                    .find_map(|c| c.strip_prefix("language-").map(str::to_string))
            })
            .or_else(|| attr(handle, "data-language"))
            .unwrap_or_default();

        let kind = if language == "mermaid" && self.extensions.has_node(&NodeKind::Mermaid) {
            NodeKind::Mermaid
        } else {
            NodeKind::CodeBlock
        };
        let mut block = self.node(kind)?.with_attr("language", language);

        let mut text = text_content(handle);
        if text.ends_with('\n') {
            text.pop();
        }
        if !text.is_empty() {
            block.content = vec![MarkupNode::text(text, Vec::new())];
        }
        Ok(block)
    }

    fn table(&self, children: &[Handle]) -> Result<MarkupNode, HtmlFragmentError> {
        let mut rows = Vec::new();
        collect_rows(children, &mut rows);
        let mut content = Vec::new();
        for row in rows {
            let cells = row.children.borrow().clone();
            content.push(self.table_row(&cells)?);
        }
        Ok(self.node(NodeKind::Table)?.with_content(content))
    }

    fn table_row(&self, children: &[Handle]) -> Result<MarkupNode, HtmlFragmentError> {
        let mut cells = Vec::new();
        for child in children {
            if let Some(tag) = element_name(child) {
                if tag == "th" || tag == "td" {
                    let content = child.children.borrow().clone();
                    cells.push(self.table_cell(child, &tag, &content)?);
                }
            }
        }
        Ok(self.node(NodeKind::TableRow)?.with_content(cells))
    }

    fn table_cell(
        &self,
        handle: &Handle,
        tag: &str,
        children: &[Handle],
    ) -> Result<MarkupNode, HtmlFragmentError> {
        let kind = if tag == "th" {
            NodeKind::TableHeader
        } else {
            NodeKind::TableCell
        };
        let span = |key: &str| {
            attr(handle, key)
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(1)
        };
        let mut cell = self
            .node(kind)?
            .with_attr("colspan", span("colspan"))
            .with_attr("rowspan", span("rowspan"));
        if let Some(colwidth) = attr(handle, "colwidth") {
            cell = cell.with_attr("colwidth", colwidth);
        }

        let mut content = self.blocks(children, &[])?;
        if content.is_empty() {
            content.push(self.node(NodeKind::Paragraph)?);
        }
        Ok(cell.with_content(content))
    }

    /// `<a data-type="embed">` and `<a data-type="reference">`
    fn special_anchor(
        &self,
        handle: &Handle,
        children: &[Handle],
        marks: &[MarkupMark],
    ) -> Result<MarkupNode, HtmlFragmentError> {
        if attr(handle, "data-type").as_deref() == Some("embed") {
            let src = attr(handle, "src")
                .or_else(|| attr(handle, "href"))
                .unwrap_or_default();
            let embed = self.node(NodeKind::Embed)?.with_attr("src", src);
            return Ok(self.marked(embed, marks));
        }

        let mut reference = self.node(NodeKind::Reference)?;
        for (key, name) in [
            ("id", "data-id"),
            ("objectclass", "data-objectclass"),
            ("label", "data-label"),
        ] {
            reference = reference.with_attr(key, attr(handle, name).unwrap_or_default());
        }
        let content = self.inlines(children, &[])?;
        Ok(self.marked(reference.with_content(content), marks))
    }

    fn node(&self, kind: NodeKind) -> Result<MarkupNode, HtmlFragmentError> {
        self.require(&kind)?;
        Ok(MarkupNode::new(kind))
    }

    fn require(&self, kind: &NodeKind) -> Result<(), HtmlFragmentError> {
        if self.extensions.has_node(kind) {
            Ok(())
        } else {
            Err(HtmlFragmentError::UnsupportedNode(kind.to_string()))
        }
    }

    fn marked(&self, node: MarkupNode, marks: &[MarkupMark]) -> MarkupNode {
        if marks.is_empty() {
            node
        } else {
            node.with_marks(marks.to_vec())
        }
    }
}

fn collect_rows(handles: &[Handle], rows: &mut Vec<Handle>) {
    for handle in handles {
        match element_name(handle).as_deref() {
            Some("tr") => rows.push(handle.clone()),
            Some("thead" | "tbody" | "tfoot") => {
                let children = handle.children.borrow().clone();
                collect_rows(&children, rows);
            }
            _ => {}
        }
    }
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attr(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}
