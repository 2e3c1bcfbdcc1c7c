//! A compiler for CRUD-style NoSQL statements.
//!
//! Query text (`select`, `delete`, `insert`, `update`, `put`, `get`, `del`)
//! is lexed, parsed into an [`ast::Statement`] and compiled into an
//! immutable [`CompiledStatement`] that a [`Manager`] executes. Statements
//! with `@name` parameters are prepared instead and bound before execution.
//!
//! ```
//! use quill_lang::{QueryEngine, Value};
//!
//! let engine = QueryEngine::default();
//! let mut prepared = engine.prepare("select * from God where age = @age").unwrap();
//! prepared.bind("age", 10).unwrap();
//! let statement = prepared.resolve().unwrap();
//! let condition = statement.as_select().unwrap().condition().unwrap();
//! assert_eq!(condition.as_value(), Some(&Value::Integer(10)));
//! ```

pub mod ast;
pub mod cache;
pub mod compiler;
pub mod condition;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod manager;
pub mod observer;
pub mod output;
pub mod params;
pub mod parser;
pub mod prepared;
pub mod query;
pub mod resolver;
pub mod ttl;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Statement, StatementKind, Token};
pub use cache::QueryCache;
pub use condition::{Condition, ConditionValue, Operator};
pub use config::EngineConfig;
pub use convert::ValueKind;
pub use engine::QueryEngine;
pub use error::QueryError;
pub use lexer::{LexError, Lexer, Position};
pub use manager::{Manager, QueryResult};
pub use observer::{MappingObserver, NameObserver, NoopObserver};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use params::Params;
pub use prepared::{PreparedQuery, PreparedState};
pub use query::{
    CompiledStatement, DelQuery, DeleteQuery, EntityPayload, GetQuery, InsertQuery, PutQuery,
    Query, Sort, UpdateQuery,
};
pub use value::{ParamRef, Value};
