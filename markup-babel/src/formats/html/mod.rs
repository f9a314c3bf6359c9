//! HTML format implementation
//!
//! HTML is the Markdown converter's escape hatch in both directions: raw HTML found in Markdown
//! is imported through [`HtmlToMarkup`], and tables are exported through [`MarkupToHtml`] as a
//! literal `<table>` island. The same pair backs the standalone `html` format.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` ecosystem for HTML parsing and serialization:
//! - `html5ever`: Browser-grade HTML5 parser from the Servo project
//! - `markup5ever_rcdom`: Reference-counted DOM tree implementation
//!
//! Fragments are parsed as whole documents; the converter reads document-level comments and the
//! children of `<body>`, and ignores `<head>`.
//!
//! # Element Mapping Table
//!
//! | Markup              | HTML                                              | Notes                                   |
//! |---------------------|---------------------------------------------------|-----------------------------------------|
//! | paragraph           | `<p>`                                             | Inline runs at block level get one too  |
//! | heading             | `<h1>`..`<h6>`                                    | `level` attr                            |
//! | blockquote          | `<blockquote>`                                    |                                         |
//! | bulletList          | `<ul>`                                            |                                         |
//! | todoList / taskList | `<ul data-type="todoList">` / `"taskList"`        |                                         |
//! | orderedList         | `<ol start>`                                      | `order` attr                            |
//! | listItem            | `<li>`                                            |                                         |
//! | todoItem / taskItem | `<li data-type data-checked>`                     | `todoid`/`userid` as `data-*`           |
//! | codeBlock / mermaid | `<pre><code class="language-*">`                  |                                         |
//! | horizontalRule      | `<hr>`                                            |                                         |
//! | hardBreak           | `<br>`                                            |                                         |
//! | image               | `<img src alt title width height>`                |                                         |
//! | reference           | `<a data-type="reference" data-id ...>`           | Children are the visible label          |
//! | embed               | `<a data-type="embed" href>`                      |                                         |
//! | comment             | `<!-- -->`                                        | Body kept as a text child               |
//! | subLink             | `<sub>`                                           | Inline content, usually a link          |
//! | table, rows, cells  | `<table>`, `<tr>`, `<th>`/`<td>`                  | Cell content is block HTML              |
//! | Marks:              |                                                   |                                         |
//! |   bold              | `<strong>`                                        | Import also accepts `<b>`               |
//! |   em                | `<em>`                                            | Import also accepts `<i>`               |
//! |   strike            | `<s>`                                             | Import also accepts `<del>`, `<strike>` |
//! |   underline         | `<u>`                                             | Import also accepts `<ins>`             |
//! |   code              | `<code>`                                          |                                         |
//! |   link              | `<a href title>`                                  |                                         |
//!
//! div, span, thead, tbody and tfoot are transparent on import. head, colgroup, script and style
//! are skipped. Anything else is an [`HtmlFragmentError`].
//!
//! # Lossy Conversions
//!
//! - Whitespace-only text between blocks is dropped
//! - Table cell colspan/rowspan are only written when they differ from 1
//! - Unknown attributes are not preserved

mod parser;
mod serializer;

pub use parser::parse_html;
pub use serializer::{serialize_document, serialize_nodes};

use crate::error::FormatError;
use crate::extensions::Extensions;
use crate::format::Format;
use crate::markup::MarkupNode;
use thiserror::Error;

/// Failure converting an embedded HTML fragment
///
/// The Markdown parser recovers from these by keeping the fragment as literal text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HtmlFragmentError {
    #[error("Unsupported HTML element <{0}>")]
    UnsupportedElement(String),

    #[error("Node kind '{0}' is not enabled")]
    UnsupportedNode(String),

    #[error("Mark kind '{0}' is not enabled")]
    UnsupportedMark(String),
}

/// HTML fragment → Markup conversion
pub trait HtmlToMarkup: Send + Sync {
    /// Convert `html` into a `doc` node
    fn to_markup(&self, html: &str) -> Result<MarkupNode, HtmlFragmentError>;
}

/// Markup → HTML fragment rendering
pub trait MarkupToHtml: Send + Sync {
    fn to_html(&self, nodes: &[MarkupNode]) -> Result<String, FormatError>;
}

/// html5ever-backed importer restricted to an extension set
#[derive(Debug, Clone, Default)]
pub struct HtmlImporter {
    extensions: Extensions,
}

impl HtmlImporter {
    pub fn new(extensions: Extensions) -> Self {
        Self { extensions }
    }
}

impl HtmlToMarkup for HtmlImporter {
    fn to_markup(&self, html: &str) -> Result<MarkupNode, HtmlFragmentError> {
        parse_html(html, &self.extensions)
    }
}

/// html5ever-backed exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl MarkupToHtml for HtmlExporter {
    fn to_html(&self, nodes: &[MarkupNode]) -> Result<String, FormatError> {
        serialize_nodes(nodes)
    }
}

/// Format implementation for HTML fragments
#[derive(Default)]
pub struct HtmlFormat {
    importer: HtmlImporter,
}

impl HtmlFormat {
    pub fn new(extensions: Extensions) -> Self {
        Self {
            importer: HtmlImporter::new(extensions),
        }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<MarkupNode, FormatError> {
        self.importer
            .to_markup(source)
            .map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, doc: &MarkupNode) -> Result<String, FormatError> {
        serialize_document(doc)
    }
}
