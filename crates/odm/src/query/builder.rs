//! Query Builder - Core builder implementation
//!
//! A [`Query`] accumulates an equality filter, relations to eager load, sort
//! keys and pagination bounds. Nothing touches the database until one of the
//! terminal methods in `execution` is awaited.

use std::fmt;
use std::marker::PhantomData;

use bson::Document;

use super::types::OrderDirection;
use crate::database::{Collection, Database};
use crate::model::Model;
use crate::relationships::Relationship;

/// Fluent query over the collection of `M`
pub struct Query<M> {
    pub(crate) collection: Collection,
    pub(crate) filter: Document,
    pub(crate) relations: Vec<Relationship>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: u64,
    pub(crate) skip_count: u64,
    _phantom: PhantomData<M>,
}

impl<M> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            filter: self.filter.clone(),
            relations: self.relations.clone(),
            order_by: self.order_by.clone(),
            limit_count: self.limit_count,
            skip_count: self.skip_count,
            _phantom: PhantomData,
        }
    }
}

impl<M: Model> Query<M> {
    /// Create an empty query bound to `M`'s collection
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<M>(),
            filter: Document::new(),
            relations: Vec::new(),
            order_by: Vec::new(),
            limit_count: 0,
            skip_count: 0,
            _phantom: PhantomData,
        }
    }
}

impl<M> Query<M> {
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Accumulated equality predicates
    pub fn filter(&self) -> &Document {
        &self.filter
    }

    /// Relations in registration order
    pub fn relations(&self) -> &[Relationship] {
        &self.relations
    }

    /// Sort keys in precedence order
    pub fn sort_keys(&self) -> &[(String, OrderDirection)] {
        &self.order_by
    }

    /// Limit bound, 0 when unset
    pub fn limit_value(&self) -> u64 {
        self.limit_count
    }

    /// Skip bound, 0 when unset
    pub fn skip_value(&self) -> u64 {
        self.skip_count
    }
}

impl<M> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("collection", &self.collection.name())
            .field("filter", &self.filter)
            .field("relations", &self.relations)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit_count)
            .field("skip", &self.skip_count)
            .finish()
    }
}
