//! Query Builder WITH methods - eager loading through `$lookup`

use super::builder::Query;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::relationships::Relationship;

impl<M: Model> Query<M> {
    /// Eager load a relation registered in `M::relations()`.
    ///
    /// Lookups run in the order they were added. An unregistered name fails
    /// with [`ModelError::UnknownRelation`].
    pub fn with(mut self, relation: &str) -> ModelResult<Self> {
        match M::relations().resolve(relation) {
            Some(descriptor) => {
                self.relations.push(descriptor);
                Ok(self)
            }
            None => Err(ModelError::UnknownRelation {
                model: M::collection_name(),
                relation: relation.to_string(),
            }),
        }
    }

    /// Eager load several registered relations, failing on the first unknown name
    pub fn with_many(self, relations: &[&str]) -> ModelResult<Self> {
        relations.iter().try_fold(self, |query, relation| query.with(relation))
    }
}

impl<M> Query<M> {
    /// Eager load an ad-hoc relationship that is not in the registry
    pub fn with_relation(mut self, relation: Relationship) -> Self {
        self.relations.push(relation);
        self
    }
}
