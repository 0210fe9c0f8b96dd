//! Base Model Fields - Identity and audit fields shared by most documents
//!
//! Embed a [`BaseModel`] with `#[serde(flatten)]` and expand
//! [`delegate_base_model!`](crate::delegate_base_model) inside the `impl Model`
//! block; the domain type then only supplies its collection name and
//! relations.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity, creation, modification and soft-delete fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseModel {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_bson_datetime"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_bson_datetime"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_bson_datetime"
    )]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BaseModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base fields with a client-chosen identity
    pub fn with_id(id: ObjectId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Current time at the millisecond precision BSON dates store.
///
/// Timestamps written onto an entity equal the ones read back from the
/// database.
pub fn now_millis() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

/// Serde adapter storing `Option<DateTime<Utc>>` as a native BSON date
pub mod optional_bson_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => bson::DateTime::from_chrono(*timestamp).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bson::DateTime>::deserialize(deserializer)?.map(bson::DateTime::to_chrono))
    }
}

/// Implement the identity and timestamp methods of [`Model`](crate::Model)
/// by delegating to an owned [`BaseModel`] field.
///
/// ```ignore
/// impl Model for User {
///     fn collection_name() -> &'static str { "users" }
///     elif_odm::delegate_base_model!(base);
/// }
/// ```
#[macro_export]
macro_rules! delegate_base_model {
    ($field:ident) => {
        fn id(&self) -> ::core::option::Option<$crate::bson::oid::ObjectId> {
            self.$field.id
        }

        fn set_id(&mut self, id: $crate::bson::oid::ObjectId) {
            self.$field.id = ::core::option::Option::Some(id);
        }

        fn created_at(
            &self,
        ) -> ::core::option::Option<$crate::chrono::DateTime<$crate::chrono::Utc>> {
            self.$field.created_at
        }

        fn set_created_at(&mut self, timestamp: $crate::chrono::DateTime<$crate::chrono::Utc>) {
            self.$field.created_at = ::core::option::Option::Some(timestamp);
        }

        fn updated_at(
            &self,
        ) -> ::core::option::Option<$crate::chrono::DateTime<$crate::chrono::Utc>> {
            self.$field.updated_at
        }

        fn set_updated_at(&mut self, timestamp: $crate::chrono::DateTime<$crate::chrono::Utc>) {
            self.$field.updated_at = ::core::option::Option::Some(timestamp);
        }

        fn deleted_at(
            &self,
        ) -> ::core::option::Option<$crate::chrono::DateTime<$crate::chrono::Utc>> {
            self.$field.deleted_at
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::tests::User;
    use bson::Bson;

    #[test]
    fn test_empty_base_fields_are_omitted() {
        let document = bson::to_document(&BaseModel::new()).unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_timestamps_are_native_dates() {
        let now = now_millis();
        let base = BaseModel {
            id: Some(ObjectId::new()),
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };

        let document = bson::to_document(&base).unwrap();
        assert!(matches!(document.get("_id"), Some(Bson::ObjectId(_))));
        assert!(matches!(document.get("created_at"), Some(Bson::DateTime(_))));
        assert!(document.get("deleted_at").is_none());

        let decoded: BaseModel = bson::from_document(document).unwrap();
        assert_eq!(decoded, base);
    }

    #[test]
    fn test_now_millis_has_no_sub_millisecond_part() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_flattened_base_fields_sit_at_top_level() {
        let id = ObjectId::new();
        let mut user = User::new("Alice", "alice@test.com");
        user.set_id(id);
        user.set_created_at(now_millis());

        let document = bson::to_document(&user).unwrap();
        assert_eq!(document.get_object_id("_id").unwrap(), id);
        assert!(document.get("created_at").is_some());
        assert_eq!(document.get_str("name").unwrap(), "Alice");

        let decoded: User = bson::from_document(document).unwrap();
        assert_eq!(decoded.id(), Some(id));
        assert_eq!(decoded.created_at(), user.created_at());
        assert!(!decoded.is_soft_deleted());
    }
}
