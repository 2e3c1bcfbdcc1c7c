use std::collections::BTreeMap;

use tracing::trace;

use crate::{error::QueryError, value::Value};

/// Named parameters declared by a query, and the values bound to them so far.
///
/// Names are kept sorted so error messages list them deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    slots: BTreeMap<String, Option<Value>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as declared. Declaring twice keeps any bound value.
    pub fn declare(&mut self, name: &str) {
        if !self.slots.contains_key(name) {
            trace!(param = name, "declare parameter");
            self.slots.insert(name.to_string(), None);
        }
    }

    /// Binds a value to a declared name, replacing any previous value.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<(), QueryError> {
        if value.has_params() {
            return Err(QueryError::InvalidValue(format!(
                "parameter @{name} cannot be bound to another parameter"
            )));
        }
        match self.slots.get_mut(name) {
            Some(slot) => {
                trace!(param = name, value = %value, rebind = slot.is_some(), "bind parameter");
                *slot = Some(value);
                Ok(())
            }
            None => Err(QueryError::UnknownParameter(name.to_string())),
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The bound value of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).and_then(Option::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Declared names without a value, sorted.
    pub fn unbound(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn is_ready(&self) -> bool {
        self.slots.values().all(Option::is_some)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
