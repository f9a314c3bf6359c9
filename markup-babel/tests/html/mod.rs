//! HTML format tests

mod import;
mod table;
