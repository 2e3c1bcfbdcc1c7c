//! # Quill Query Language - Abstract Syntax Tree
//!
//! The AST is the transient form of a statement between the
//! [`Parser`](crate::parser::Parser) and the [`compiler`](crate::compiler).
//! Nodes are created per parse call and dropped after compilation.
//!
//! ## Submodules
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Entity/field references and value expressions
//! - **[operators]** - Comparison operators, connectives, sort directions
//! - **[statements]** - One struct per statement kind plus clause nodes
//!
//! ## Statements
//!
//! ```text
//! select [fields | *] from Entity [where cond] [order by f [asc|desc], ...] [skip N] [limit N]
//! delete [fields] from Entity [where cond]
//! insert Entity (field = value, ...) [N unit]
//! update Entity (field = value, ...)
//! put {key, value [, N unit]}
//! get key, ...
//! del key, ...
//! ```
//!
//! ## Conditions
//!
//! There are no grouping parentheses. `and`/`or` join the comparisons
//! adjacent to them and are folded by [`condition::fold_where`](crate::condition::fold_where).
//!
//! ```text
//! where age > 10 and not name = "Diana" or power in ("sun", "moon")
//! ```
//!
//! ## Parameters
//!
//! `@name` marks a value bound later through a
//! [`PreparedQuery`](crate::prepared::PreparedQuery):
//!
//! ```text
//! select * from God where age = @age
//! ```
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod tokens;

pub use expressions::{EntityRef, Expr, FieldRef, Literal};
pub use operators::{CompareOp, Connective, SortDirection};
pub use statements::{
    Assignment, Comparison, DelStatement, DeleteStatement, EntityBody, GetStatement,
    InsertStatement, PutStatement, SelectStatement, SortSpec, Statement, StatementKind, TtlClause,
    UpdateStatement, WhereClause,
};
pub use tokens::Token;
