use thiserror::Error;

use crate::parser::ParseError;

/// Errors surfaced by compiling, binding or executing a statement.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed query text.
    #[error("syntax error in `{query}`: {source}")]
    Syntax {
        query: String,
        #[source]
        source: ParseError,
    },

    /// Recognized but unsupported construct (unknown function, unknown
    /// conversion kind, key-value call on a document-only manager).
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// A prepared query was executed before every parameter was bound.
    #[error("missing parameters: {}", at_names(.0))]
    MissingParameters(Vec<String>),

    /// `bind` was called with a name that does not appear in the query.
    #[error("parameter @{0} is not declared in the query")]
    UnknownParameter(String),

    /// The literal path received text containing parameters.
    #[error("query `{query}` contains parameters ({}); use a prepared query instead", at_names(.params))]
    InvalidLiteralQuery { query: String, params: Vec<String> },

    /// `between` without exactly two values, or `in` with no values.
    #[error("cardinality error: {0}")]
    Cardinality(String),

    #[error("unrecognized TTL unit `{0}` (expected day, hour, minute, second, millisecond or nanosecond)")]
    UnrecognizedTtlUnit(String),

    /// A value that cannot be used where it appears.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("prepared query has already been executed")]
    AlreadyExecuted,

    #[error("expected at most one result, found {0}")]
    NonUniqueResult(usize),

    /// Error reported by the manager executing the statement.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn at_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("@{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl QueryError {
    pub(crate) fn syntax(query: &str, source: ParseError) -> Self {
        QueryError::Syntax {
            query: query.to_string(),
            source,
        }
    }

    /// Whether the caller can fix the problem and retry the same object.
    ///
    /// Only missing parameters qualify: bind them and execute again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QueryError::MissingParameters(_))
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
