pub mod commands;
pub mod handlers;
pub mod logging;

// Re-export commonly used handler helpers for convenience
pub use handlers::{open_database, parse_report_format, read_text_input, require_project, resolve_db_path};
