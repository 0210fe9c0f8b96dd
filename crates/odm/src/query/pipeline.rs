//! Pipeline compilation
//!
//! Stage order is fixed: `$match` → one `$lookup` per relation → `$sort` →
//! `$skip` → `$limit`. Joined fields are sortable. Empty parts emit no stage.

use bson::{doc, Document};

use super::builder::Query;

impl<M> Query<M> {
    /// Compile the accumulated state into an aggregation pipeline
    pub fn pipeline(&self) -> Vec<Document> {
        let mut pipeline = Vec::with_capacity(self.relations.len() + 4);

        if !self.filter.is_empty() {
            pipeline.push(doc! { "$match": self.filter.clone() });
        }

        pipeline.extend(self.relations.iter().map(|relation| relation.lookup_stage()));

        if !self.order_by.is_empty() {
            pipeline.push(doc! { "$sort": self.sort_document() });
        }

        if self.skip_count > 0 {
            pipeline.push(doc! { "$skip": bound(self.skip_count) });
        }

        if self.limit_count > 0 {
            pipeline.push(doc! { "$limit": bound(self.limit_count) });
        }

        pipeline
    }

    /// Compound sort specification, primary key first
    pub fn sort_document(&self) -> Document {
        let mut keys = Document::new();
        for (field, direction) in &self.order_by {
            keys.insert(field.as_str(), direction.as_i32());
        }
        keys
    }
}

fn bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
