use crate::{
    ast::{DeleteStatement, FieldRef, SelectStatement},
    error::QueryError,
    observer::NameObserver,
    query::{DeleteQuery, Query, Sort},
    resolver::Resolver,
};

use super::compile_where;

fn resolve_fields(fields: &[FieldRef], entity: &str, observer: &dyn NameObserver) -> Vec<String> {
    fields
        .iter()
        .map(|f| observer.resolve_field(entity, f.name()))
        .collect()
}

pub fn compile_select(
    statement: &SelectStatement,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<Query, QueryError> {
    let logical = statement.entity.name();
    let condition = compile_where(statement.where_clause.as_ref(), logical, observer, resolver)?;

    let sorts = statement
        .order_by
        .iter()
        .map(|spec| Sort {
            field: observer.resolve_field(logical, spec.field.name()),
            direction: spec.direction,
        })
        .collect();

    Ok(Query {
        entity: observer.resolve_entity(logical),
        fields: resolve_fields(&statement.fields, logical, observer),
        sorts,
        skip: statement.skip.unwrap_or(0),
        limit: statement.limit.unwrap_or(0),
        condition,
    })
}

pub fn compile_delete(
    statement: &DeleteStatement,
    observer: &dyn NameObserver,
    resolver: &mut Resolver<'_>,
) -> Result<DeleteQuery, QueryError> {
    let logical = statement.entity.name();
    let condition = compile_where(statement.where_clause.as_ref(), logical, observer, resolver)?;

    Ok(DeleteQuery {
        entity: observer.resolve_entity(logical),
        fields: resolve_fields(&statement.fields, logical, observer),
        condition,
    })
}
