//! Query Builder filter operations

use bson::{Bson, Document};

use super::builder::Query;

impl<M> Query<M> {
    /// Require `field == value`.
    ///
    /// Predicates on different fields combine with AND; a second call on the
    /// same field replaces the first.
    pub fn where_eq<T>(mut self, field: &str, value: T) -> Self
    where
        T: Into<Bson>,
    {
        self.filter.insert(field, value.into());
        self
    }

    /// Require `field` to be null or absent
    pub fn where_null(self, field: &str) -> Self {
        self.where_eq(field, Bson::Null)
    }

    /// Merge several equality predicates at once (same overwrite rule as `where_eq`)
    pub fn where_all(mut self, predicates: Document) -> Self {
        for (field, value) in predicates {
            self.filter.insert(field, value);
        }
        self
    }

    /// Skip documents carrying a soft-delete marker. Opt-in; queries do not
    /// filter soft-deleted documents unless asked to.
    pub fn exclude_soft_deleted(self) -> Self {
        self.where_null("deleted_at")
    }
}
