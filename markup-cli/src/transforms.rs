//! CLI-specific transforms
//!
//! Each transform is a stage + format combination (e.g., "markup-treeviz", "tokens-json").
//!
//! ## Transform Pipeline
//!
//! 1. **Tokenization** - Markdown → flat token stream (after todo list post-processing)
//!    - `tokens-json`: tokens as JSON
//!    - `tokens-simple`: one token name per line, inline children indented
//!
//! 2. **Conversion** - Tokens → Markup tree
//!    - `markup-json`: the tree as JSON
//!    - `markup-treeviz`: tree visualization with Unicode icons
//!
//! 3. **Serialization** - Markup tree → Markdown
//!    - `roundtrip`: parse then serialize again
//!
//! ## Extra Parameters
//!
//! - `attrs`: "true" shows node attributes in `markup-treeviz`
//! - `marks`: "true" shows text marks in `markup-treeviz`
//!
//! Example: `markup inspect notes.md markup-treeviz --extra-show-attrs`

use markup_babel::formats::json::to_json;
use markup_babel::formats::markdown::Token;
use markup_babel::formats::treeviz::to_treeviz_str_with_params;
use markup_babel::{ConvertOptions, MarkdownParser, MarkdownSerializer};
use std::collections::HashMap;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "tokens-json",
    "tokens-simple",
    "markup-json",
    "markup-treeviz",
    "roundtrip",
];

/// Execute a named transform on Markdown source
///
/// ```ignore
/// let output = execute_transform("# Title", "markup-treeviz", &options, &HashMap::new())?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    options: &ConvertOptions,
    params: &HashMap<String, String>,
) -> Result<String, String> {
    let parser = MarkdownParser::new(options);

    match transform_name {
        "tokens-json" => serde_json::to_string_pretty(&parser.tokens(source))
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "tokens-simple" => Ok(tokens_to_simple(&parser.tokens(source))),
        "markup-json" => {
            let doc = parser
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            to_json(&doc).map_err(|e| format!("JSON serialization failed: {e}"))
        }
        "markup-treeviz" => {
            let doc = parser
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(to_treeviz_str_with_params(&doc, params))
        }
        "roundtrip" => {
            let doc = parser
                .parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            MarkdownSerializer::new(options)
                .and_then(|serializer| serializer.serialize(&doc))
                .map_err(|e| format!("Serialization failed: {e}"))
        }
        _ => Err(format!(
            "Unknown transform '{transform_name}'. Use --list-transforms to see available transforms."
        )),
    }
}

fn tokens_to_simple(tokens: &[Token]) -> String {
    let mut output = String::new();
    for token in tokens {
        output.push_str(&token.name());
        output.push('\n');
        for child in &token.children {
            output.push_str("  ");
            output.push_str(&child.name());
            output.push('\n');
        }
    }
    output
}
