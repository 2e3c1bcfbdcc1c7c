//! Compiled, immutable statement forms handed to a [`Manager`](crate::manager::Manager).

use std::time::Duration;

use crate::{
    ast::{SortDirection, StatementKind},
    condition::Condition,
    value::Value,
};

/// Resolved `order by` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Compiled `select`.
///
/// `skip` and `limit` are 0 when absent; a limit of 0 means unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub(crate) entity: String,
    pub(crate) fields: Vec<String>,
    pub(crate) sorts: Vec<Sort>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
    pub(crate) condition: Option<Condition>,
}

impl Query {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Projected fields; empty selects every field.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}

/// Compiled `delete ... from`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub(crate) entity: String,
    pub(crate) fields: Vec<String>,
    pub(crate) condition: Option<Condition>,
}

impl DeleteQuery {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Fields to remove; empty removes whole entities.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}

/// Field values of an entity to insert or update, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPayload {
    pub(crate) entity: String,
    pub(crate) fields: Vec<(String, Value)>,
}

impl EntityPayload {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub payload: EntityPayload,
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub payload: EntityPayload,
}

/// Compiled `put`. A missing value is stored as null.
#[derive(Debug, Clone, PartialEq)]
pub struct PutQuery {
    pub key: Value,
    pub value: Value,
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetQuery {
    pub keys: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelQuery {
    pub keys: Vec<Value>,
}

/// Any compiled statement.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledStatement {
    Select(Query),
    Delete(DeleteQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Put(PutQuery),
    Get(GetQuery),
    Del(DelQuery),
}

impl CompiledStatement {
    pub fn kind(&self) -> StatementKind {
        match self {
            CompiledStatement::Select(_) => StatementKind::Select,
            CompiledStatement::Delete(_) => StatementKind::Delete,
            CompiledStatement::Insert(_) => StatementKind::Insert,
            CompiledStatement::Update(_) => StatementKind::Update,
            CompiledStatement::Put(_) => StatementKind::Put,
            CompiledStatement::Get(_) => StatementKind::Get,
            CompiledStatement::Del(_) => StatementKind::Del,
        }
    }

    pub fn as_select(&self) -> Option<&Query> {
        match self {
            CompiledStatement::Select(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_delete(&self) -> Option<&DeleteQuery> {
        match self {
            CompiledStatement::Delete(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_insert(&self) -> Option<&InsertQuery> {
        match self {
            CompiledStatement::Insert(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&UpdateQuery> {
        match self {
            CompiledStatement::Update(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_put(&self) -> Option<&PutQuery> {
        match self {
            CompiledStatement::Put(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_get(&self) -> Option<&GetQuery> {
        match self {
            CompiledStatement::Get(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_del(&self) -> Option<&DelQuery> {
        match self {
            CompiledStatement::Del(q) => Some(q),
            _ => None,
        }
    }
}
