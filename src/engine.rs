//! The entry point: compiles, caches, prepares and executes query text.

use std::sync::Arc;

use tracing::debug;

use crate::{
    ast::Statement,
    cache::QueryCache,
    compiler,
    config::EngineConfig,
    error::QueryError,
    manager::{Manager, QueryResult, dispatch},
    observer::{NameObserver, NoopObserver},
    params::Params,
    parser,
    prepared::PreparedQuery,
    query::CompiledStatement,
    resolver::Resolver,
};

/// Compiles query text against one name observer.
///
/// Cloning shares the cache and the observer.
///
/// # Examples
///
/// ```
/// use quill_lang::QueryEngine;
///
/// let engine = QueryEngine::default();
/// let compiled = engine.compile("select * from God where age > 10 limit 5").unwrap();
/// let query = compiled.as_select().unwrap();
/// assert_eq!(query.entity(), "God");
/// assert_eq!(query.limit(), 5);
/// ```
#[derive(Clone)]
pub struct QueryEngine {
    observer: Arc<dyn NameObserver>,
    cache: Option<Arc<QueryCache>>,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(config: EngineConfig, observer: Arc<dyn NameObserver>) -> Self {
        let cache = config
            .cache_enabled
            .then(|| Arc::new(QueryCache::new(config.cache_capacity)));
        QueryEngine { observer, cache }
    }

    pub fn observer(&self) -> &Arc<dyn NameObserver> {
        &self.observer
    }

    pub fn cache(&self) -> Option<&QueryCache> {
        self.cache.as_deref()
    }

    /// Parses `text` into its AST.
    pub fn parse(&self, text: &str) -> Result<Statement, QueryError> {
        parser::parse(text).map_err(|e| QueryError::syntax(text, e))
    }

    /// Compiles a parameter-free statement, through the cache when enabled.
    ///
    /// Text containing `@name` parameters fails with
    /// [`QueryError::InvalidLiteralQuery`]; use [`prepare`](Self::prepare).
    pub fn compile(&self, text: &str) -> Result<Arc<CompiledStatement>, QueryError> {
        match &self.cache {
            Some(cache) => cache.get_or_compile(text, &self.observer, || self.compile_literal(text)),
            None => self.compile_literal(text).map(Arc::new),
        }
    }

    fn compile_literal(&self, text: &str) -> Result<CompiledStatement, QueryError> {
        let statement = self.parse(text)?;
        let mut resolver = Resolver::literal(text);
        compiler::compile(&statement, self.observer.as_ref(), &mut resolver)
    }

    /// Compiles a statement whose `@name` parameters are bound later.
    ///
    /// Prepared statements never go through the cache.
    pub fn prepare(&self, text: &str) -> Result<PreparedQuery, QueryError> {
        let statement = self.parse(text)?;
        let mut params = Params::new();
        let template = {
            let mut resolver = Resolver::prepared(text, &mut params);
            compiler::compile(&statement, self.observer.as_ref(), &mut resolver)?
        };
        debug!(kind = %template.kind(), params = params.len(), "prepared statement");
        Ok(PreparedQuery::new(text, template, params))
    }

    /// Compiles (or fetches) a literal statement and executes it.
    pub fn execute<M: Manager>(&self, text: &str, manager: &M) -> Result<QueryResult<M::Entity>, QueryError> {
        let statement = self.compile(text)?;
        debug!(kind = %statement.kind(), "execute statement");
        dispatch(&statement, manager)
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
