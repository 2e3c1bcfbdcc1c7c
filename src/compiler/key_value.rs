use crate::{
    ast::{DelStatement, Expr, GetStatement, PutStatement},
    error::QueryError,
    query::{DelQuery, GetQuery, PutQuery},
    resolver::Resolver,
    ttl,
    value::Value,
};

fn resolve_keys(keys: &[Expr], resolver: &mut Resolver<'_>) -> Result<Vec<Value>, QueryError> {
    keys.iter().map(|k| resolver.resolve(k)).collect()
}

pub fn compile_put(statement: &PutStatement, resolver: &mut Resolver<'_>) -> Result<PutQuery, QueryError> {
    let key = resolver.resolve(&statement.key)?;
    let value = match &statement.value {
        Some(expr) => resolver.resolve(expr)?,
        None => Value::Null,
    };
    let ttl = statement.ttl.as_ref().map(ttl::resolve).transpose()?;
    Ok(PutQuery { key, value, ttl })
}

pub fn compile_get(statement: &GetStatement, resolver: &mut Resolver<'_>) -> Result<GetQuery, QueryError> {
    Ok(GetQuery {
        keys: resolve_keys(&statement.keys, resolver)?,
    })
}

pub fn compile_del(statement: &DelStatement, resolver: &mut Resolver<'_>) -> Result<DelQuery, QueryError> {
    Ok(DelQuery {
        keys: resolve_keys(&statement.keys, resolver)?,
    })
}
