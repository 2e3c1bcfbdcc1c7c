//! The storage side: executes compiled statements.

use std::time::Duration;

use crate::{
    error::QueryError,
    query::{CompiledStatement, DeleteQuery, EntityPayload, Query},
    value::Value,
};

/// Executes compiled statements against a store.
///
/// The key-value methods default to [`QueryError::UnsupportedConstruct`], so
/// a document-only store implements just the first four.
pub trait Manager {
    type Entity;

    fn select(&self, query: &Query) -> Result<Vec<Self::Entity>, QueryError>;

    fn delete(&self, query: &DeleteQuery) -> Result<(), QueryError>;

    fn insert(&self, payload: &EntityPayload, ttl: Option<Duration>) -> Result<Self::Entity, QueryError>;

    fn update(&self, payload: &EntityPayload) -> Result<Self::Entity, QueryError>;

    fn put(&self, _key: &Value, _value: &Value, _ttl: Option<Duration>) -> Result<(), QueryError> {
        Err(QueryError::UnsupportedConstruct("put on this manager".to_string()))
    }

    fn get(&self, _keys: &[Value]) -> Result<Vec<Value>, QueryError> {
        Err(QueryError::UnsupportedConstruct("get on this manager".to_string()))
    }

    fn remove(&self, _keys: &[Value]) -> Result<(), QueryError> {
        Err(QueryError::UnsupportedConstruct("del on this manager".to_string()))
    }
}

/// What executing a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<E> {
    /// Rows of a `select`
    Entities(Vec<E>),
    /// Entity returned by `insert` or `update`
    Entity(E),
    /// Values of a `get`
    Values(Vec<Value>),
    /// `delete`, `put` and `del`
    Done,
}

impl<E> QueryResult<E> {
    pub fn into_entities(self) -> Vec<E> {
        match self {
            QueryResult::Entities(rows) => rows,
            QueryResult::Entity(e) => vec![e],
            QueryResult::Values(_) | QueryResult::Done => vec![],
        }
    }
}

/// Dispatches a fully resolved statement to the matching manager call.
pub fn dispatch<M: Manager>(
    statement: &CompiledStatement,
    manager: &M,
) -> Result<QueryResult<M::Entity>, QueryError> {
    match statement {
        CompiledStatement::Select(q) => manager.select(q).map(QueryResult::Entities),
        CompiledStatement::Delete(q) => manager.delete(q).map(|()| QueryResult::Done),
        CompiledStatement::Insert(q) => manager.insert(&q.payload, q.ttl).map(QueryResult::Entity),
        CompiledStatement::Update(q) => manager.update(&q.payload).map(QueryResult::Entity),
        CompiledStatement::Put(q) => manager.put(&q.key, &q.value, q.ttl).map(|()| QueryResult::Done),
        CompiledStatement::Get(q) => manager.get(&q.keys).map(QueryResult::Values),
        CompiledStatement::Del(q) => manager.remove(&q.keys).map(|()| QueryResult::Done),
    }
}
