//! Markdown format implementation
//!
//! Bidirectional conversion between CommonMark Markdown (with the GFM extensions the editor
//! uses) and the Markup tree.
//!
//! # Library Choice
//!
//! We use the `comrak` crate to tokenize Markdown. Its AST is flattened into a markdown-it style
//! token stream ([`token::Token`]) so that the parser can be driven by a rule table keyed on
//! token kind. Serialization is hand written: it has to reproduce the editor's own conventions
//! (todo metadata comments, stored image URLs, reference links) which no generic renderer knows.
//!
//! # Element Mapping Table
//!
//! | Markup            | Markdown                              | Export Notes                       | Import Notes                           |
//! |-------------------|---------------------------------------|------------------------------------|----------------------------------------|
//! | paragraph         | Paragraph                             | Blank line between blocks          | Direct                                 |
//! | heading           | `#`..`######`                         | `level` attr                       | Setext headings too                    |
//! | blockquote        | `> `                                  | Prefix on every line               | Direct                                 |
//! | bulletList        | `*`/`-`/`+` list                      | `bullet` attr, default from config | Bullet char kept                       |
//! | orderedList       | `1.` list                             | Numbers right-aligned              | `order` attr from the start number     |
//! | todoList/todoItem | `* [ ] ` / `* [x] `                   | `<!-- todoid=..,userid=.. -->`     | Only when every item has a checkbox    |
//! | taskList/taskItem | `* [ ] `                              | Fixed marker                       | Not produced                           |
//! | codeBlock         | Fenced block                          | Language on the fence              | Indented blocks too                    |
//! | mermaid           | ```` ```mermaid ````                  |                                    | Fence language `mermaid`               |
//! | horizontalRule    | `---`                                 | `markup` attr if recorded          | Direct                                 |
//! | image             | `![alt](src "title")`                 | `<img>` when sized, stored URL     | Stored URL → `file-id`, width, height  |
//! | reference         | `[label](ref://?_class=..&_id=..)`    | Query is URL encoded               | Links under the reference prefix       |
//! | table             | `<table>` HTML island                 | Rendered through the HTML exporter | GFM pipe tables and HTML tables        |
//! | comment           | `<!-- -->`                            |                                    | Via the HTML importer                  |
//! | subLink           | `<sub>..</sub>`                       | Links inside become `<a href>`     | Via the HTML importer                  |
//! | hardBreak         | `\` + newline                         | Dropped at the end of a block      | Both break syntaxes                    |
//! | Marks:            |                                       |                                    |                                        |
//! |   em              | `*em*`                                | `_` when it was written that way   | Parse both                             |
//! |   bold            | `**bold**`                            | `__` when it was written that way  | Parse both                             |
//! |   strike          | `~~strike~~`                          |                                    | Direct                                 |
//! |   underline       | `<ins>..</ins>`                       |                                    | Via the HTML importer                  |
//! |   code            | `` `code` ``                          | Fence grows past inner backticks   | Direct                                 |
//! |   link            | `[text](href "title")`, `<href>`      | Autolink when text equals href     | Direct                                 |
//!
//! # Lossy Conversions
//!
//! - Plain text is written unescaped, so literal Markdown punctuation in text is re-parsed
//! - List tightness is not recorded on import; export uses the configured default
//! - `)` ordered list delimiters become `.`
//! - Table cell alignment is dropped
//!
//! # Raw HTML
//!
//! Inline HTML runs (an opening tag through its matching closing tag) and HTML blocks are handed
//! to the [`HtmlToMarkup`](crate::formats::html::HtmlToMarkup) collaborator. A fragment it cannot
//! convert is logged and kept as literal text.

pub mod lists;
pub mod parser;
pub mod rules;
pub mod serializer;
pub mod token;
pub mod tokenizer;

pub use parser::{MarkdownParser, ParseState};
pub use serializer::MarkdownSerializer;
pub use token::{Nesting, Token, TokenKind};

use crate::error::FormatError;
use crate::format::Format;
use crate::markup::MarkupNode;
use crate::options::ConvertOptions;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: ConvertOptions,
}

impl MarkdownFormat {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with editor extensions"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<MarkupNode, FormatError> {
        MarkdownParser::new(&self.options).parse(source)
    }

    fn serialize(&self, doc: &MarkupNode) -> Result<String, FormatError> {
        MarkdownSerializer::new(&self.options)?.serialize(doc)
    }
}
