//! Name observers translate logical entity and field names, as written in a
//! query, into the physical names the storage uses.

use std::collections::HashMap;

pub trait NameObserver: Send + Sync {
    fn resolve_entity(&self, name: &str) -> String;

    /// `entity` is the logical entity name as written in the query.
    fn resolve_field(&self, entity: &str, name: &str) -> String;
}

/// Returns every name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl NameObserver for NoopObserver {
    fn resolve_entity(&self, name: &str) -> String {
        name.to_string()
    }

    fn resolve_field(&self, _entity: &str, name: &str) -> String {
        name.to_string()
    }
}

/// Renames from explicit tables; names without an entry pass through.
///
/// ```
/// use quill_lang::{MappingObserver, NameObserver};
///
/// let observer = MappingObserver::new()
///     .entity("Person", "people")
///     .field("Person", "name", "full_name");
/// assert_eq!(observer.resolve_entity("Person"), "people");
/// assert_eq!(observer.resolve_field("Person", "name"), "full_name");
/// assert_eq!(observer.resolve_field("Person", "age"), "age");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingObserver {
    entities: HashMap<String, String>,
    fields: HashMap<(String, String), String>,
}

impl MappingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.entities.insert(logical.into(), physical.into());
        self
    }

    pub fn field(
        mut self,
        entity: impl Into<String>,
        logical: impl Into<String>,
        physical: impl Into<String>,
    ) -> Self {
        self.fields
            .insert((entity.into(), logical.into()), physical.into());
        self
    }
}

impl NameObserver for MappingObserver {
    fn resolve_entity(&self, name: &str) -> String {
        self.entities
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn resolve_field(&self, entity: &str, name: &str) -> String {
        self.fields
            .get(&(entity.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}
