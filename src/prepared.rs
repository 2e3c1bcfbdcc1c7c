//! Prepared queries: a compiled template plus the parameters it waits for.
//!
//! ```text
//! Unbound(names) --bind--> ... --bind--> Ready --execute--> Executed
//! ```
//!
//! Executing before `Ready` fails with [`QueryError::MissingParameters`]
//! and leaves the query usable: bind the rest and execute again. A
//! successful execution is terminal.

use tracing::debug;

use crate::{
    ast::StatementKind,
    error::QueryError,
    manager::{Manager, QueryResult, dispatch},
    params::Params,
    query::{
        CompiledStatement, DelQuery, DeleteQuery, EntityPayload, GetQuery, InsertQuery, PutQuery,
        Query, UpdateQuery,
    },
    resolver::substitute,
    value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreparedState {
    /// At least one declared parameter has no value yet.
    Unbound,
    /// Every declared parameter is bound.
    Ready,
    /// Executed successfully; no further execution.
    Executed,
}

#[derive(Debug, Clone)]
pub struct PreparedQuery {
    template: CompiledStatement,
    params: Params,
    raw: String,
    executed: bool,
}

impl PreparedQuery {
    pub(crate) fn new(raw: &str, template: CompiledStatement, params: Params) -> Self {
        PreparedQuery {
            template,
            params,
            raw: raw.to_string(),
            executed: false,
        }
    }

    /// The query text this was prepared from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> StatementKind {
        self.template.kind()
    }

    /// The compiled template, placeholders included.
    pub fn template(&self) -> &CompiledStatement {
        &self.template
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn state(&self) -> PreparedState {
        if self.executed {
            PreparedState::Executed
        } else if self.params.is_ready() {
            PreparedState::Ready
        } else {
            PreparedState::Unbound
        }
    }

    /// Binds `value` to the parameter `name` (written `@name` in the query).
    ///
    /// Re-binding replaces the earlier value. Names that do not appear in
    /// the query fail with [`QueryError::UnknownParameter`].
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, QueryError> {
        if self.executed {
            return Err(QueryError::AlreadyExecuted);
        }
        let name = name.strip_prefix('@').unwrap_or(name);
        self.params.bind(name, value.into())?;
        Ok(self)
    }

    /// The template with every parameter substituted, without executing it.
    pub fn resolve(&self) -> Result<CompiledStatement, QueryError> {
        let unbound = self.params.unbound();
        if !unbound.is_empty() {
            return Err(QueryError::MissingParameters(unbound));
        }

        let params = &self.params;
        let mut sub = |v: &Value| substitute(v, params);

        let resolved = match &self.template {
            CompiledStatement::Select(q) => CompiledStatement::Select(Query {
                condition: q.condition.as_ref().map(|c| c.try_map_values(&mut sub)).transpose()?,
                ..q.clone()
            }),
            CompiledStatement::Delete(q) => CompiledStatement::Delete(DeleteQuery {
                condition: q.condition.as_ref().map(|c| c.try_map_values(&mut sub)).transpose()?,
                ..q.clone()
            }),
            CompiledStatement::Insert(q) => CompiledStatement::Insert(InsertQuery {
                payload: substitute_payload(&q.payload, params)?,
                ttl: q.ttl,
            }),
            CompiledStatement::Update(q) => CompiledStatement::Update(UpdateQuery {
                payload: substitute_payload(&q.payload, params)?,
            }),
            CompiledStatement::Put(q) => CompiledStatement::Put(PutQuery {
                key: substitute(&q.key, params)?,
                value: substitute(&q.value, params)?,
                ttl: q.ttl,
            }),
            CompiledStatement::Get(q) => CompiledStatement::Get(GetQuery {
                keys: substitute_all(&q.keys, params)?,
            }),
            CompiledStatement::Del(q) => CompiledStatement::Del(DelQuery {
                keys: substitute_all(&q.keys, params)?,
            }),
        };
        Ok(resolved)
    }

    /// Executes the bound statement, dispatching on its kind.
    pub fn execute<M: Manager>(&mut self, manager: &M) -> Result<QueryResult<M::Entity>, QueryError> {
        if self.executed {
            return Err(QueryError::AlreadyExecuted);
        }
        let statement = self.resolve()?;
        debug!(kind = %statement.kind(), params = self.params.len(), "execute prepared query");
        let result = dispatch(&statement, manager)?;
        self.executed = true;
        Ok(result)
    }

    /// Executes and returns the selected entities (empty for statements
    /// that return no rows).
    pub fn result<M: Manager>(&mut self, manager: &M) -> Result<Vec<M::Entity>, QueryError> {
        self.execute(manager).map(QueryResult::into_entities)
    }

    /// Executes and returns the only selected entity, if any.
    pub fn single_result<M: Manager>(&mut self, manager: &M) -> Result<Option<M::Entity>, QueryError> {
        let mut rows = self.result(manager)?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            n => Err(QueryError::NonUniqueResult(n)),
        }
    }
}

fn substitute_all(values: &[Value], params: &Params) -> Result<Vec<Value>, QueryError> {
    values.iter().map(|v| substitute(v, params)).collect()
}

fn substitute_payload(payload: &EntityPayload, params: &Params) -> Result<EntityPayload, QueryError> {
    let fields = payload
        .fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), substitute(value, params)?)))
        .collect::<Result<Vec<_>, QueryError>>()?;
    Ok(EntityPayload {
        entity: payload.entity.clone(),
        fields,
    })
}
