//! Markdown ↔ Markup conversion
//!
//!     This crate converts between Markdown source text and the Markup tree, the JSON document
//!     model of a rich-text editor (`{"type": "doc", "content": [...]}`), and back again while
//!     keeping the round trip faithful.
//!
//!     This is a pure lib: it powers markup-cli but never prints, reads env vars or touches
//!     files. Diagnostics go through `tracing`.
//!
//! Architecture
//!
//!     Markdown → Markup
//!         comrak parses the source; its AST is flattened into a markdown-it style token stream
//!         (./formats/markdown/tokenizer.rs). The list post-processor (./formats/markdown/lists.rs)
//!         turns checkbox items into todo items and splits mixed lists. A rule table built from
//!         the enabled extensions (./formats/markdown/rules.rs) maps every token kind to a builder
//!         action, and the parse state (./formats/markdown/parser.rs) assembles the tree on a frame
//!         stack. Raw HTML goes through the HTML collaborator (./formats/html/).
//!
//!     Markup → Markdown
//!         A tree walk (./formats/markdown/serializer.rs) with lazy block separation and a mark
//!         diff for inline content. Tables are emitted as HTML islands.
//!
//!     Round trips are validated with the comparator in ./compare.rs.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── extensions.rs           # Enabled node and mark kinds
//!     ├── options.rs              # ConvertOptions
//!     ├── compare.rs              # Equivalence and similarity
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── markup                  # The tree model
//!     ├── formats
//!     │   ├── markdown
//!     │   ├── html
//!     │   ├── json
//!     │   └── treeviz
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories, so tests/lib.rs includes them as modules.
//!
//! Formats
//!
//!     Every format implements the Format trait (./format.rs) and is registered in the
//!     FormatRegistry: markdown (parse and serialize), json (the editor's tree, both ways), html
//!     (both ways) and treeviz (serialize only, for inspection).

pub mod compare;
pub mod error;
pub mod extensions;
pub mod format;
pub mod formats;
pub mod markup;
pub mod options;
pub mod registry;

pub use compare::{is_equivalent, similarity};
pub use error::FormatError;
pub use extensions::Extensions;
pub use format::Format;
pub use formats::markdown::{MarkdownParser, MarkdownSerializer};
pub use markup::{AttrValue, Attrs, MarkKind, MarkupMark, MarkupNode, NodeKind};
pub use options::ConvertOptions;
pub use registry::FormatRegistry;

/// Parse Markdown into a `doc` node
pub fn markdown_to_markup(
    markdown: &str,
    options: &ConvertOptions,
) -> Result<MarkupNode, FormatError> {
    MarkdownParser::new(options).parse(markdown)
}

/// Serialize a Markup tree as Markdown
pub fn markup_to_markdown(
    doc: &MarkupNode,
    options: &ConvertOptions,
) -> Result<String, FormatError> {
    MarkdownSerializer::new(options)?.serialize(doc)
}
