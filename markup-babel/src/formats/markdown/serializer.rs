//! Markdown serialization (Markup → Markdown export)
//!
//! A depth-first walk over the tree writing into a single output buffer.
//!
//! Block layout is lazy: [`MarkdownState::close_block`] only records that a block ended, and the
//! next [`MarkdownState::write`] emits the owed separator (a newline plus a blank, prefix-only
//! line) before new content. `wrap_block` extends the running line prefix (`"> "` for quotes,
//! indentation for list items) while a block's children render.
//!
//! Inline content goes through a mark diff: for every child the common prefix between its marks
//! and the currently open ones stays open, the rest is closed innermost first, and the missing
//! marks are opened. Mixable marks (emphasis, bold, strike, underline) are first reordered to
//! line up with the open ones, so `**a*b***`-style runs don't toggle needlessly. Marks that cannot
//! start or end on whitespace push that whitespace outside their delimiters.

use crate::error::FormatError;
use crate::formats::html::{HtmlExporter, MarkupToHtml};
use crate::markup::marks::is_in_set;
use crate::markup::{AttrValue, MarkKind, MarkupMark, MarkupNode, NodeKind};
use crate::options::ConvertOptions;
use std::borrow::Cow;
use tracing::debug;
use url::form_urlencoded;

/// Delimiters and behavior of a mark kind
#[derive(Debug, Clone, Copy)]
struct MarkSpec {
    open: &'static str,
    close: &'static str,
    /// Order relative to other mixable marks carries no meaning
    mixable: bool,
    /// Leading/trailing whitespace must be moved outside the delimiters
    expel_whitespace: bool,
    /// Content inside the mark is Markdown and may be escaped
    escape: bool,
}

fn mark_spec(kind: &MarkKind) -> Option<MarkSpec> {
    let emphasis = |open, close| MarkSpec {
        open,
        close,
        mixable: true,
        expel_whitespace: true,
        escape: true,
    };
    match kind {
        MarkKind::Em => Some(emphasis("*", "*")),
        MarkKind::Bold => Some(emphasis("**", "**")),
        MarkKind::Strike => Some(emphasis("~~", "~~")),
        MarkKind::Underline => Some(emphasis("<ins>", "</ins>")),
        MarkKind::Link => Some(MarkSpec {
            open: "[",
            close: "]",
            mixable: false,
            expel_whitespace: false,
            escape: true,
        }),
        MarkKind::Code => Some(MarkSpec {
            open: "`",
            close: "`",
            mixable: false,
            expel_whitespace: false,
            escape: false,
        }),
        MarkKind::Extension(_) => None,
    }
}

fn has_renderer(kind: &NodeKind) -> bool {
    kind.is_builtin()
}

/// Markup → Markdown serializer for one extension set
pub struct MarkdownSerializer {
    ref_url: String,
    image_url: String,
    tight_lists: bool,
    bullet: String,
    html: Box<dyn MarkupToHtml>,
}

impl MarkdownSerializer {
    /// Fails when the extension set declares a node or mark kind that has no renderer.
    pub fn new(options: &ConvertOptions) -> Result<Self, FormatError> {
        if let Some(kind) = options.extensions.nodes().find(|k| !has_renderer(k)) {
            return Err(FormatError::UnknownNodeKind(kind.to_string()));
        }
        if let Some(kind) = options.extensions.marks().find(|k| mark_spec(k).is_none()) {
            return Err(FormatError::UnknownMarkKind(kind.to_string()));
        }
        Ok(Self {
            ref_url: options.ref_url.clone(),
            image_url: options.image_url.clone(),
            tight_lists: options.tight_lists,
            bullet: options.bullet.clone(),
            html: Box::new(HtmlExporter),
        })
    }

    /// Replace the renderer used for table islands and embeds
    pub fn with_html_renderer(mut self, html: Box<dyn MarkupToHtml>) -> Self {
        self.html = html;
        self
    }

    pub fn serialize(&self, doc: &MarkupNode) -> Result<String, FormatError> {
        let mut state = MarkdownState::new(self);
        if doc.kind == NodeKind::Doc {
            state.render_content(doc)?;
        } else {
            state.render(doc, doc, 0)?;
        }
        debug!(bytes = state.out.len(), "serialized markdown");
        Ok(state.out)
    }
}

struct InlineState<'n> {
    active: Vec<MarkupMark>,
    trailing: String,
    parent: &'n MarkupNode,
    node: Option<Cow<'n, MarkupNode>>,
    marks: Vec<MarkupMark>,
}

struct MarkdownState<'s> {
    serializer: &'s MarkdownSerializer,
    out: String,
    delim: String,
    closed: bool,
    closed_node: Option<NodeKind>,
    in_tight_list: bool,
    in_autolink: bool,
    /// Links render as `<a href>` inside `<sub>`
    in_sub_link: bool,
}

impl<'s> MarkdownState<'s> {
    fn new(serializer: &'s MarkdownSerializer) -> Self {
        Self {
            serializer,
            out: String::new(),
            delim: String::new(),
            closed: false,
            closed_node: None,
            in_tight_list: false,
            in_autolink: false,
            in_sub_link: false,
        }
    }

    fn flush_close(&mut self, size: usize) {
        if self.closed {
            if !self.at_blank() {
                self.out.push('\n');
            }
            if size > 1 {
                let delim = self.delim.trim_end().to_string();
                for _ in 1..size {
                    self.out.push_str(&delim);
                    self.out.push('\n');
                }
            }
            self.closed = false;
        }
    }

    fn wrap_block(
        &mut self,
        delim: &str,
        first_delim: Option<&str>,
        node: &MarkupNode,
        body: impl FnOnce(&mut Self) -> Result<(), FormatError>,
    ) -> Result<(), FormatError> {
        let old = self.delim.clone();
        self.write(first_delim.unwrap_or(delim));
        self.delim.push_str(delim);
        let result = body(self);
        self.delim = old;
        self.close_block(node);
        result
    }

    fn at_blank(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn ensure_new_line(&mut self) {
        if !self.at_blank() {
            self.out.push('\n');
        }
    }

    /// Flush any owed block separator, emit the line prefix at line start, then `content`
    fn write(&mut self, content: &str) {
        self.flush_close(2);
        if self.at_blank() {
            let delim = self.delim.clone();
            self.out.push_str(&delim);
        }
        self.out.push_str(content);
    }

    fn close_block(&mut self, node: &MarkupNode) {
        self.closed_node = Some(node.kind.clone());
        self.closed = true;
    }

    /// Raw text; every line after a newline gets the current prefix
    fn text(&mut self, text: &str) {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            self.write("");
            self.out.push_str(line);
            if lines.peek().is_some() {
                self.out.push('\n');
            }
        }
    }

    fn render(
        &mut self,
        node: &MarkupNode,
        parent: &MarkupNode,
        index: usize,
    ) -> Result<(), FormatError> {
        match &node.kind {
            NodeKind::Doc => self.render_content(node)?,
            NodeKind::Blockquote => {
                self.wrap_block("> ", None, node, |state| state.render_content(node))?
            }
            NodeKind::CodeBlock | NodeKind::Mermaid => {
                let language = if node.kind == NodeKind::Mermaid {
                    "mermaid".to_string()
                } else {
                    node.attr_string("language").unwrap_or_default()
                };
                self.write(&format!("```{language}\n"));
                self.render_inline(node)?;
                self.ensure_new_line();
                self.write("```");
                self.close_block(node);
            }
            NodeKind::Heading => {
                let level = node
                    .attr("level")
                    .and_then(AttrValue::as_int)
                    .unwrap_or(1)
                    .clamp(1, 6) as usize;
                self.write(&format!("{} ", "#".repeat(level)));
                self.render_inline(node)?;
                self.close_block(node);
            }
            NodeKind::HorizontalRule => {
                let markup = node.attr_string("markup").unwrap_or_else(|| "---".into());
                self.write(&markup);
                self.close_block(node);
            }
            NodeKind::BulletList => {
                let bullet = self.bullet(node);
                self.render_list(node, "  ", &|_, _| format!("{bullet} "))?;
            }
            NodeKind::TaskList => {
                self.render_list(node, "  ", &|_, _| "* [ ] ".to_string())?;
            }
            NodeKind::TodoList => {
                let bullet = self.bullet(node);
                self.render_list(node, "  ", &|_, item| todo_item_prefix(&bullet, item))?;
            }
            NodeKind::OrderedList => {
                let start = node.attr("order").and_then(AttrValue::as_int).unwrap_or(1);
                let last = start.saturating_add((node.content.len() as i64).saturating_sub(1));
                let width = last.to_string().len();
                let delim = " ".repeat(width + 2);
                self.render_list(node, &delim, &|i, _| {
                    let number = start.saturating_add(i as i64).to_string();
                    format!(
                        "{}{number}. ",
                        " ".repeat(width.saturating_sub(number.len()))
                    )
                })?;
            }
            NodeKind::ListItem | NodeKind::TaskItem | NodeKind::TodoItem => {
                self.render_content(node)?
            }
            NodeKind::Paragraph => {
                self.render_inline(node)?;
                self.close_block(node);
            }
            NodeKind::Image => {
                let image = self.image(node);
                self.write(&image);
            }
            NodeKind::Reference => {
                let reference = self.reference(node);
                self.write(&reference);
            }
            NodeKind::Comment => {
                self.write("<!--");
                self.render_inline(node)?;
                self.write("-->");
            }
            NodeKind::HardBreak => {
                let continues = parent
                    .content
                    .iter()
                    .skip(index + 1)
                    .any(|sibling| sibling.kind != node.kind);
                if continues {
                    self.write("\\\n");
                }
            }
            NodeKind::Text => self.text(node.text_str()),
            NodeKind::Table => {
                let rows = self.serializer.html.to_html(&node.content)?;
                self.write(&format!("<table><tbody>{rows}</tbody></table>"));
                self.close_block(node);
            }
            NodeKind::TableRow | NodeKind::TableCell | NodeKind::TableHeader => {
                let html = self.serializer.html.to_html(std::slice::from_ref(node))?;
                self.write(&html);
                self.close_block(node);
            }
            NodeKind::Embed => {
                let html = self.serializer.html.to_html(std::slice::from_ref(node))?;
                self.write(&html);
            }
            NodeKind::SubLink => {
                self.write("<sub>");
                let previous = std::mem::replace(&mut self.in_sub_link, true);
                let result = self.render_inline(node);
                self.in_sub_link = previous;
                result?;
                self.write("</sub>");
            }
            NodeKind::Extension(name) => return Err(FormatError::UnknownNodeKind(name.clone())),
        }
        Ok(())
    }

    fn render_content(&mut self, parent: &MarkupNode) -> Result<(), FormatError> {
        for (index, node) in parent.content.iter().enumerate() {
            self.render(node, parent, index)?;
        }
        Ok(())
    }

    fn render_inline(&mut self, parent: &MarkupNode) -> Result<(), FormatError> {
        let mut state = InlineState {
            active: Vec::new(),
            trailing: String::new(),
            parent,
            node: None,
            marks: Vec::new(),
        };
        for (index, node) in parent.content.iter().enumerate() {
            state.node = Some(Cow::Borrowed(node));
            self.render_node_inline(&mut state, index)?;
        }
        // closes whatever is still open
        state.node = None;
        self.render_node_inline(&mut state, 0)
    }

    fn render_node_inline(
        &mut self,
        state: &mut InlineState<'_>,
        index: usize,
    ) -> Result<(), FormatError> {
        state.marks = state
            .node
            .as_ref()
            .map(|node| node.mark_list().to_vec())
            .unwrap_or_default();
        self.filter_hard_break_marks(state, index);

        let leading = self.adjust_leading(state)?;

        let inner = state.marks.last().cloned();
        let no_escape = match &inner {
            Some(mark) => !spec(&mark.kind)?.escape,
            None => false,
        };
        let len = state.marks.len() - usize::from(no_escape);

        reorder_mixable_marks(state, len)?;
        self.close_marks(state, len, index)?;

        if !leading.is_empty() {
            self.text(&leading);
        }

        self.open_marks(state, len, index, inner.as_ref(), no_escape)
    }

    /// A hard break only keeps the marks that continue into the following text
    fn filter_hard_break_marks(&self, state: &mut InlineState<'_>, index: usize) {
        let is_break = state
            .node
            .as_ref()
            .is_some_and(|node| node.kind == NodeKind::HardBreak);
        if !is_break {
            return;
        }
        state.marks = match state.parent.content.get(index + 1) {
            Some(next)
                if !next.is_text() || next.text_str().chars().any(|c| !c.is_whitespace()) =>
            {
                state
                    .marks
                    .iter()
                    .filter(|mark| is_in_set(mark, next.mark_list()))
                    .cloned()
                    .collect()
            }
            _ => Vec::new(),
        };
    }

    /// Move whitespace out of expelling marks; returns the whitespace to write before the node
    fn adjust_leading(&self, state: &mut InlineState<'_>) -> Result<String, FormatError> {
        let mut leading = std::mem::take(&mut state.trailing);

        let node = match &state.node {
            Some(node) if node.is_text() && node.text.is_some() => node,
            _ => return Ok(leading),
        };
        let mut expel = false;
        for mark in &state.marks {
            expel |= spec(&mark.kind)?.expel_whitespace;
        }
        if !expel {
            return Ok(leading);
        }

        let text = node.text_str();
        let body = text.trim_start();
        let lead = &text[..text.len() - body.len()];
        let inner = body.trim_end();
        let trail = &body[inner.len()..];
        if lead.is_empty() && trail.is_empty() {
            return Ok(leading);
        }

        leading.push_str(lead);
        state.trailing = trail.to_string();
        if inner.is_empty() {
            state.node = None;
            state.marks = state.active.clone();
        } else {
            let mut trimmed: MarkupNode = (**node).clone();
            trimmed.text = Some(inner.to_string());
            state.node = Some(Cow::Owned(trimmed));
        }
        Ok(leading)
    }

    fn close_marks(
        &mut self,
        state: &mut InlineState<'_>,
        len: usize,
        index: usize,
    ) -> Result<(), FormatError> {
        let mut keep = 0;
        while keep < state.active.len().min(len) && state.marks[keep] == state.active[keep] {
            keep += 1;
        }
        while keep < state.active.len() {
            if let Some(mark) = state.active.pop() {
                let close = self.mark_string(&mark, false, state.parent, index)?;
                self.text(&close);
            }
        }
        Ok(())
    }

    fn open_marks(
        &mut self,
        state: &mut InlineState<'_>,
        len: usize,
        index: usize,
        inner: Option<&MarkupMark>,
        no_escape: bool,
    ) -> Result<(), FormatError> {
        let node = match state.node.take() {
            Some(node) => node,
            None => return Ok(()),
        };

        while state.active.len() < len {
            let mark = state.marks[state.active.len()].clone();
            let open = self.mark_string(&mark, true, state.parent, index)?;
            state.active.push(mark);
            self.text(&open);
        }

        match inner {
            Some(inner) if no_escape && node.is_text() => {
                let text = if inner.kind == MarkKind::Code && inner.attr("marker").is_none() {
                    code_span(node.text_str())
                } else {
                    format!(
                        "{}{}{}",
                        self.mark_string(inner, true, state.parent, index)?,
                        node.text_str(),
                        self.mark_string(inner, false, state.parent, index + 1)?
                    )
                };
                self.text(&text);
                Ok(())
            }
            _ => self.render(&node, state.parent, index),
        }
    }

    fn mark_string(
        &mut self,
        mark: &MarkupMark,
        open: bool,
        parent: &MarkupNode,
        index: usize,
    ) -> Result<String, FormatError> {
        if let Some(marker) = mark.attr_str("marker") {
            return Ok(marker.to_string());
        }
        if mark.kind == MarkKind::Link {
            return Ok(self.link_string(mark, open, parent, index));
        }
        let spec = spec(&mark.kind)?;
        Ok(if open { spec.open } else { spec.close }.to_string())
    }

    fn link_string(
        &mut self,
        mark: &MarkupMark,
        open: bool,
        parent: &MarkupNode,
        index: usize,
    ) -> String {
        if self.in_sub_link {
            return if open {
                format!(
                    "<a href=\"{}\">",
                    encode_uri(mark.attr_str("href").unwrap_or_default())
                )
            } else {
                "</a>".to_string()
            };
        }
        if open {
            self.in_autolink = is_plain_url(mark, parent, index);
            return if self.in_autolink { "<" } else { "[" }.to_string();
        }
        if std::mem::take(&mut self.in_autolink) {
            return ">".to_string();
        }
        let href = escape_destination(mark.attr_str("href").unwrap_or_default());
        let title = mark
            .attr_str("title")
            .map(|title| format!(" \"{}\"", title.replace('"', "\\\"")))
            .unwrap_or_default();
        format!("]({href}{title})")
    }

    fn render_list(
        &mut self,
        node: &MarkupNode,
        delim: &str,
        first_delim: &dyn Fn(usize, &MarkupNode) -> String,
    ) -> Result<(), FormatError> {
        if self.closed && self.closed_node.as_ref() == Some(&node.kind) {
            self.flush_close(3);
        } else if self.in_tight_list {
            self.flush_close(1);
        }

        let tight = node
            .attr("tight")
            .and_then(AttrValue::as_bool)
            .unwrap_or(self.serializer.tight_lists);
        let previous = std::mem::replace(&mut self.in_tight_list, tight);

        for (i, child) in node.content.iter().enumerate() {
            if i > 0 && tight {
                self.flush_close(1);
            }
            let first = first_delim(i, child);
            self.wrap_block(delim, Some(&first), node, |state| {
                state.render(child, node, i)
            })?;
        }

        self.in_tight_list = previous;
        Ok(())
    }

    fn bullet(&self, node: &MarkupNode) -> String {
        node.attr_string("bullet")
            .filter(|bullet| !bullet.is_empty())
            .unwrap_or_else(|| self.serializer.bullet.clone())
    }

    fn image(&self, node: &MarkupNode) -> String {
        let alt = node.attr_string("alt");
        let src = node.attr_string("src").unwrap_or_default();
        let width = node.attr_string("width");
        let height = node.attr_string("height");
        let title = node.attr_string("title");
        let alt_text = alt.as_deref().map(escape_alt).unwrap_or_default();
        let title_part = title
            .as_deref()
            .map(|title| format!(" {}", quote(title)))
            .unwrap_or_default();

        if let Some(file_id) = node.attr_string("file-id") {
            let mut url = format!("{}{}", self.serializer.image_url, file_id);
            if let Some(width) = &width {
                url.push_str(&format!("&width={}", esc(width)));
            }
            if let Some(height) = &height {
                url.push_str(&format!("&height={}", esc(height)));
            }
            return format!("![{alt_text}]({url}{title_part})");
        }

        if width.is_some() || height.is_some() {
            let mut tag = String::from("<img");
            if let Some(width) = &width {
                tag.push_str(&format!(" width=\"{}\"", esc(width)));
            }
            if let Some(height) = &height {
                tag.push_str(&format!(" height=\"{}\"", esc(height)));
            }
            tag.push_str(&format!(" src=\"{}\"", esc(&src)));
            if let Some(alt) = &alt {
                tag.push_str(&format!(" alt=\"{}\"", esc(alt)));
            }
            match &title {
                Some(title) => tag.push_str(&format!(">{}</img>", quote(title))),
                None => tag.push('>'),
            }
            return tag;
        }

        format!("![{alt_text}]({}{title_part})", escape_destination(&src))
    }

    fn reference(&self, node: &MarkupNode) -> String {
        let label = node.attr_string("label").unwrap_or_default();
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("_class", &node.attr_string("objectclass").unwrap_or_default())
            .append_pair("_id", &node.attr_string("id").unwrap_or_default())
            .append_pair("label", &label)
            .finish();
        let ref_url = &self.serializer.ref_url;
        let separator = if ref_url.contains('?') { '&' } else { '?' };
        let title = node
            .attr_string("title")
            .map(|title| format!(" {}", quote(&title)))
            .unwrap_or_default();
        format!("[{}]({ref_url}{separator}{query}{title})", esc(&label))
    }
}

fn spec(kind: &MarkKind) -> Result<MarkSpec, FormatError> {
    mark_spec(kind).ok_or_else(|| FormatError::UnknownMarkKind(kind.to_string()))
}

/// Line up the node's mixable marks with the open ones so equal marks share one span
fn reorder_mixable_marks(state: &mut InlineState<'_>, len: usize) -> Result<(), FormatError> {
    for i in 0..len {
        let mark = state.marks[i].clone();
        if !spec(&mark.kind)?.mixable {
            break;
        }
        for j in 0..state.active.len() {
            let other = &state.active[j];
            if !spec(&other.kind)?.mixable {
                break;
            }
            if mark == *other && i != j {
                state.marks = switch_marks(&state.marks, i, j, &mark, len);
                break;
            }
        }
    }
    Ok(())
}

/// Move `marks[i]` to position `j`, keeping marks up to `len`
fn switch_marks(
    marks: &[MarkupMark],
    i: usize,
    j: usize,
    mark: &MarkupMark,
    len: usize,
) -> Vec<MarkupMark> {
    let slice = |start: usize, end: usize| {
        let end = end.min(marks.len());
        let start = start.min(end);
        &marks[start..end]
    };
    let mut out = Vec::with_capacity(marks.len());
    if i > j {
        out.extend_from_slice(slice(0, j));
        out.push(mark.clone());
        out.extend_from_slice(slice(j, i));
        out.extend_from_slice(slice(i + 1, len));
    } else {
        out.extend_from_slice(slice(0, i));
        out.extend_from_slice(slice(i + 1, j));
        out.push(mark.clone());
        out.extend_from_slice(slice(j, len));
    }
    out
}

/// A link renders as `<href>` when its text is exactly its absolute href
fn is_plain_url(link: &MarkupMark, parent: &MarkupNode, index: usize) -> bool {
    if link.attr("title").is_some() {
        return false;
    }
    let href = link.attr_str("href").unwrap_or_default();
    if !has_scheme(href) {
        return false;
    }
    let node = match parent.content.get(index) {
        Some(node) => node,
        None => return false,
    };
    if !node.is_text() || node.text_str() != href || node.mark_list().last() != Some(link) {
        return false;
    }
    match parent.content.get(index + 1) {
        Some(next) => !is_in_set(link, next.mark_list()),
        None => true,
    }
}

fn has_scheme(href: &str) -> bool {
    match href.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_alphanumeric() || c == '_')
        }
        None => false,
    }
}

fn todo_item_prefix(bullet: &str, item: &MarkupNode) -> String {
    let checked = item.attr("checked").and_then(AttrValue::as_bool) == Some(true);
    let meta = match (item.attr_string("todoid"), item.attr_string("userid")) {
        (Some(todoid), Some(userid)) => format!("<!-- todoid={todoid},userid={userid} -->"),
        _ => String::new(),
    };
    format!("{bullet} [{}] {meta}", if checked { 'x' } else { ' ' })
}

/// Backslash-escape Markdown punctuation
fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '`' | '*' | '\\' | '~' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_alt(alt: &str) -> String {
    esc(alt).replace('\n', "\\\n")
}

fn escape_destination(href: &str) -> String {
    let mut out = String::with_capacity(href.len());
    for c in href.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '(' | ')' | '"' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode everything but unreserved and reserved URI characters
fn encode_uri(href: &str) -> String {
    let mut out = String::with_capacity(href.len());
    for c in href.chars() {
        if c.is_ascii_alphanumeric() || ";,/?:@&=+$-_.!~*'()#".contains(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

fn quote(text: &str) -> String {
    let (open, close) = if !text.contains('"') {
        ('"', '"')
    } else if !text.contains('\'') {
        ('\'', '\'')
    } else {
        ('(', ')')
    };
    format!("{open}{text}{close}")
}

/// Inline code with a fence longer than any backtick run in the text
fn code_span(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat(longest + 1);
    let all_spaces = text.chars().all(|c| c == ' ');
    let pad = text.starts_with('`')
        || text.ends_with('`')
        || (!all_spaces && text.starts_with(' ') && text.ends_with(' '));
    if pad {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}
