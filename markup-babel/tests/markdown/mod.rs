//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ Markup conversion.

mod export;
mod import;
mod lists;
mod roundtrip;
