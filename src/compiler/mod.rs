//! Per-statement compilers: AST + name observer -> [`CompiledStatement`].
//!
//! Each compiler is a plain function over one statement struct. Values go
//! through a [`Resolver`], which decides whether parameters are rejected
//! (literal path) or declared (prepared path).

mod entity;
mod key_value;
mod select;

use tracing::debug;

use crate::{
    ast::{Statement, WhereClause},
    condition::{Condition, Leaf, fold_where},
    error::QueryError,
    lexer::Position,
    observer::NameObserver,
    query::CompiledStatement,
    resolver::Resolver,
};

pub use entity::{compile_insert, compile_update};
pub use key_value::{compile_del, compile_get, compile_put};
pub use select::{compile_delete, compile_select};

/// Compiles any statement.
pub fn compile(
    statement: &Statement,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<CompiledStatement, QueryError> {
    resolver.check_statement(statement)?;
    let compiled = match statement {
        Statement::Select(s) => CompiledStatement::Select(compile_select(s, observer, resolver)?),
        Statement::Delete(s) => CompiledStatement::Delete(compile_delete(s, observer, resolver)?),
        Statement::Insert(s) => CompiledStatement::Insert(compile_insert(s, observer, resolver)?),
        Statement::Update(s) => CompiledStatement::Update(compile_update(s, observer, resolver)?),
        Statement::Put(s) => CompiledStatement::Put(compile_put(s, resolver)?),
        Statement::Get(s) => CompiledStatement::Get(compile_get(s, resolver)?),
        Statement::Del(s) => CompiledStatement::Del(compile_del(s, resolver)?),
    };
    debug!(kind = %compiled.kind(), "compiled statement");
    Ok(compiled)
}

/// Builds the condition tree of a `where` clause.
///
/// Field names go through the observer; each comparison becomes a leaf and
/// the leaves are folded with [`fold_where`].
pub(crate) fn compile_where(
    clause: Option<&WhereClause>,
    entity: &str,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<Option<Condition>, QueryError> {
    let Some(clause) = clause else {
        return Ok(None);
    };

    let leaves = clause
        .iter()
        .map(|(connective, cmp)| {
            let name = observer.resolve_field(entity, cmp.field.name());
            let value = resolver.resolve(&cmp.value)?;
            let condition = Condition::compare(name, cmp.operator.into(), value)
                .map_err(|e| at_position(e, cmp.position))?;
            Ok(Leaf {
                connective,
                condition,
                negated: cmp.negated,
            })
        })
        .collect::<Result<Vec<_>, QueryError>>()?;

    Ok(fold_where(leaves))
}

/// Adds the source position to value-level errors.
pub(crate) fn at_position(err: QueryError, position: Position) -> QueryError {
    match err {
        QueryError::Cardinality(msg) => QueryError::Cardinality(format!("{msg} at {position}")),
        QueryError::InvalidValue(msg) => QueryError::InvalidValue(format!("{msg} at {position}")),
        other => other,
    }
}
