//! Relationship Registry - Typed map from relation name to descriptor factory

use std::fmt;

use super::metadata::Relationship;

/// Factory producing a relationship descriptor
pub type RelationFactory = fn() -> Relationship;

/// Relations a model exposes to `Query::with`, in registration order
#[derive(Clone, Default)]
pub struct RelationRegistry {
    entries: Vec<(&'static str, RelationFactory)>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relation; registering a name again replaces the factory
    pub fn register(mut self, name: &'static str, factory: RelationFactory) -> Self {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
        self
    }

    /// Build the descriptor registered under `name`
    pub fn resolve(&self, name: &str) -> Option<Relationship> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, factory)| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RelationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationRegistry")
            .field("names", &self.names())
            .finish()
    }
}
