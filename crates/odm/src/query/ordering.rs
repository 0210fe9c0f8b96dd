//! Query Builder sort operations

use super::builder::Query;
use super::types::OrderDirection;

impl<M> Query<M> {
    /// Append a sort key. Earlier keys take precedence; later keys break ties.
    pub fn sort(mut self, field: &str, ascending: bool) -> Self {
        self.order_by
            .push((field.to_string(), OrderDirection::from_ascending(ascending)));
        self
    }

    /// Append an ascending sort key
    pub fn order_by(self, field: &str) -> Self {
        self.sort(field, true)
    }

    /// Append a descending sort key
    pub fn order_by_desc(self, field: &str) -> Self {
        self.sort(field, false)
    }

    /// Newest first by creation time
    pub fn latest(self) -> Self {
        self.order_by_desc("created_at")
    }
}
