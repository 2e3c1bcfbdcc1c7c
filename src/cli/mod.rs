//! CLI support for quill-lang
//!
//! Provides programmatic access to the `quill` commands so other tools can
//! embed statement checking and the bundled reference.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check, parse_param};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::error::QueryError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Query(#[from] QueryError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// `--param` not in `name=value` form
    #[error("Invalid parameter `{0}`: expected name=value")]
    InvalidParam(String),
    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoQuery,
    #[error("Unknown category: '{0}'\nRun 'quill docs' to see available categories.")]
    UnknownCategory(String),
}
