//! Relationship Descriptor - One-level join between two collections

use std::fmt;

use bson::{doc, Document};

use crate::model::Model;

/// Defines the kind of relationship between models.
///
/// The kind documents intent only; both kinds compile to the same `$lookup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Parent document has many documents in another collection
    HasMany,
    /// Document refers to its parent in another collection
    BelongsTo,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::HasMany => write!(f, "has_many"),
            RelationKind::BelongsTo => write!(f, "belongs_to"),
        }
    }
}

/// Immutable join specification: match documents of `from_collection` whose
/// `foreign_field` equals this document's `local_field`, and attach them as an
/// array under `as_field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    kind: RelationKind,
    from_collection: String,
    local_field: String,
    foreign_field: String,
    as_field: String,
}

impl Relationship {
    pub fn new(
        kind: RelationKind,
        from_collection: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            from_collection: from_collection.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            as_field: as_field.into(),
        }
    }

    /// `Related` documents reference this model: typically `("_id", "<parent>_id", "<plural>")`
    pub fn has_many<Related: Model>(local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        Self::new(
            RelationKind::HasMany,
            Related::collection_name(),
            local_field,
            foreign_field,
            as_field,
        )
    }

    /// This model references a `Related` parent: typically `("<parent>_id", "_id", "<parent>")`
    pub fn belongs_to<Related: Model>(local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        Self::new(
            RelationKind::BelongsTo,
            Related::collection_name(),
            local_field,
            foreign_field,
            as_field,
        )
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn from_collection(&self) -> &str {
        &self.from_collection
    }

    pub fn local_field(&self) -> &str {
        &self.local_field
    }

    pub fn foreign_field(&self) -> &str {
        &self.foreign_field
    }

    pub fn as_field(&self) -> &str {
        &self.as_field
    }

    /// Render the `$lookup` stage for this relationship
    pub fn lookup_stage(&self) -> Document {
        doc! {
            "$lookup": {
                "from": self.from_collection.as_str(),
                "localField": self.local_field.as_str(),
                "foreignField": self.foreign_field.as_str(),
                "as": self.as_field.as_str(),
            }
        }
    }
}
