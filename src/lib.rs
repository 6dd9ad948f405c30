//! Statement segmentation and cursor resolution for SQL editor buffers.
//!
//! Splits a buffer into `;`-terminated statements without being fooled by
//! semicolons inside string literals or comments, picks the statement under a
//! caret or selection, and keys execution results so they survive unrelated
//! edits.

pub mod config;
pub mod editor_buffer;
pub mod editor_markers;
pub mod editor_position;
pub mod editor_selection;
pub mod models;
pub mod query_cursor;
pub mod query_key;
pub mod query_range;
pub mod query_scanner;
pub mod query_tools;
pub mod sql_document;
pub mod syntax;

pub use editor_buffer::EditorBuffer;
pub use editor_markers::{BufferExecutions, clamp_range, error_position, error_range};
pub use editor_position::{end_position, offset_to_position, position_to_offset};
pub use editor_selection::EditorSelection;
pub use models::structs::{
    ErrorResult, ExecutionRecord, Position, QueryRequest, ScanOptions, SelectionSlice, Statement,
    StatementSpan,
};
pub use query_cursor::{resolve, resolve_at_cursor, statement_at_cursor, statements_for_selection};
pub use query_key::{QueryKey, QueryKeyError, shift_offset, validate_query_at_offset};
pub use query_range::{all_statements, statements_in_range, statements_starting_on_row};
pub use query_scanner::{ScanResult, scan_statements};
pub use query_tools::normalize_query_text;
pub use sql_document::SqlDocument;
pub use syntax::strip_sql_comments;

/// Set up `env_logger` for this crate at debug level, honouring `RUST_LOG`
/// and a `.env` file. Safe to call more than once.
pub fn init_logging() {
    init_logging_with(None);
}

/// Like [`init_logging`], with an extra filter applied when `RUST_LOG` is unset.
pub fn init_logging_with(filter: Option<&str>) {
    dotenv::dotenv().ok();
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_module("tabular_statements", log::LevelFilter::Debug);
    if let Some(filter) = filter
        && std::env::var_os("RUST_LOG").is_none()
    {
        builder.parse_filters(filter);
    }
    let _ = builder.is_test(false).try_init();
}
