//! Shared fixtures for unit tests

use serde::{Deserialize, Serialize};

use crate::model::{BaseModel, Model};
use crate::relationships::{RelationRegistry, Relationship};
use crate::ObjectId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct User {
    #[serde(flatten)]
    pub base: BaseModel,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            base: BaseModel::new(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

impl Model for User {
    fn collection_name() -> &'static str {
        "users"
    }

    crate::delegate_base_model!(base);

    fn relations() -> RelationRegistry {
        RelationRegistry::new().register("Posts", || {
            Relationship::has_many::<Post>("_id", "user_id", "posts")
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Post {
    #[serde(flatten)]
    pub base: BaseModel,
    pub title: String,
    pub user_id: Option<ObjectId>,
}

impl Model for Post {
    fn collection_name() -> &'static str {
        "posts"
    }

    crate::delegate_base_model!(base);

    fn relations() -> RelationRegistry {
        RelationRegistry::new().register("Author", || {
            Relationship::belongs_to::<User>("user_id", "_id", "author")
        })
    }
}
