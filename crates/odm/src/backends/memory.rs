//! In-Memory Document Backend
//!
//! Keeps every collection as a vector of documents and evaluates the subset of
//! the aggregation language the query builder emits: equality `$match`,
//! `$lookup`, `$sort`, `$skip` and `$limit`. Updates understand `$set` and
//! `$unset`. Anything else is reported as a transport error, the same way a
//! server would reject it.

use std::cmp::Ordering;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use dashmap::DashMap;

use super::core::DocumentBackend;
use crate::error::{ModelError, ModelResult};

static NULL: Bson = Bson::Null;

/// Failures raised by [`MemoryBackend`], surfaced through `ModelError::Transport`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MemoryBackendError {
    #[error("duplicate key error collection: {collection} dup key: {{ _id: {key} }}")]
    DuplicateKey { collection: String, key: String },

    #[error("unsupported pipeline stage: {0}")]
    UnsupportedStage(String),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("invalid {stage} stage: {reason}")]
    InvalidStage { stage: String, reason: String },

    #[error("performing an update on the path '{0}' would modify the immutable field '_id'")]
    ImmutableField(String),

    #[error("cannot create field '{field}' in element {{{parent}: {value}}}")]
    PathConflict {
        field: String,
        parent: String,
        value: String,
    },
}

impl From<MemoryBackendError> for ModelError {
    fn from(err: MemoryBackendError) -> Self {
        ModelError::transport(err)
    }
}

/// Process-local document store
#[derive(Debug, Default)]
pub struct MemoryBackend {
    name: String,
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: DashMap::new(),
        }
    }

    /// Copy of every document currently stored in a collection
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// Names of collections that have received at least one write
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Drop every collection
    pub fn clear(&self) {
        self.collections.clear();
    }

    fn run_stage(&self, documents: Vec<Document>, stage: &Document) -> ModelResult<Vec<Document>> {
        let mut entries = stage.iter();
        let (name, spec) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(MemoryBackendError::InvalidStage {
                    stage: "pipeline".to_string(),
                    reason: "each stage must hold exactly one operator".to_string(),
                }
                .into())
            }
        };

        match name.as_str() {
            "$match" => {
                let filter = stage_document(name, spec)?;
                let mut kept = Vec::with_capacity(documents.len());
                for document in documents {
                    if matches_filter(&document, filter)? {
                        kept.push(document);
                    }
                }
                Ok(kept)
            }
            "$lookup" => self.lookup(documents, stage_document(name, spec)?),
            "$sort" => sort_documents(documents, stage_document(name, spec)?),
            "$skip" => {
                let count = stage_count(name, spec)?;
                Ok(documents.into_iter().skip(count).collect())
            }
            "$limit" => {
                let count = stage_count(name, spec)?;
                Ok(documents.into_iter().take(count).collect())
            }
            other => Err(MemoryBackendError::UnsupportedStage(other.to_string()).into()),
        }
    }

    fn lookup(&self, documents: Vec<Document>, spec: &Document) -> ModelResult<Vec<Document>> {
        let from = lookup_option(spec, "from")?;
        let local_field = lookup_option(spec, "localField")?;
        let foreign_field = lookup_option(spec, "foreignField")?;
        let as_field = lookup_option(spec, "as")?;

        let foreign = self.documents(from);

        Ok(documents
            .into_iter()
            .map(|mut document| {
                let local = lookup_path(&document, local_field);
                let joined: Vec<Bson> = foreign
                    .iter()
                    .filter(|candidate| join_matches(local, lookup_path(candidate, foreign_field)))
                    .cloned()
                    .map(Bson::Document)
                    .collect();
                document.insert(as_field, joined);
                document
            })
            .collect())
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    fn database_name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, collection: &str, document: Document) -> ModelResult<Bson> {
        let id = match document.get("_id") {
            Some(id) if !matches!(id, Bson::Null) => id.clone(),
            _ => Bson::ObjectId(ObjectId::new()),
        };

        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in document {
            if key != "_id" {
                stored.insert(key, value);
            }
        }

        let mut documents = self.collections.entry(collection.to_string()).or_default();
        let duplicate = documents
            .iter()
            .any(|existing| values_equal(existing.get("_id").unwrap_or(&NULL), &id));
        if duplicate {
            return Err(MemoryBackendError::DuplicateKey {
                collection: collection.to_string(),
                key: id.to_string(),
            }
            .into());
        }

        documents.push(stored);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> ModelResult<u64> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(0);
        };

        for document in documents.iter_mut() {
            if matches_filter(document, &filter)? {
                // A rejected update leaves the stored document untouched
                let mut updated = document.clone();
                apply_update(&mut updated, &update)?;
                *document = updated;
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> ModelResult<u64> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(0);
        };

        for index in 0..documents.len() {
            if matches_filter(&documents[index], &filter)? {
                documents.remove(index);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> ModelResult<Option<Document>> {
        let Some(documents) = self.collections.get(collection) else {
            return Ok(None);
        };

        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> ModelResult<Vec<Document>> {
        let mut documents = self.documents(collection);
        for stage in &pipeline {
            documents = self.run_stage(documents, stage)?;
        }
        Ok(documents)
    }

    async fn count(&self, collection: &str, filter: Document) -> ModelResult<u64> {
        let Some(documents) = self.collections.get(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

fn stage_document<'a>(stage: &str, spec: &'a Bson) -> ModelResult<&'a Document> {
    match spec {
        Bson::Document(document) => Ok(document),
        other => Err(MemoryBackendError::InvalidStage {
            stage: stage.to_string(),
            reason: format!("expected a document, got {}", other),
        }
        .into()),
    }
}

fn stage_count(stage: &str, spec: &Bson) -> ModelResult<usize> {
    as_i64(spec)
        .filter(|n| *n >= 0)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
        .ok_or_else(|| {
            MemoryBackendError::InvalidStage {
                stage: stage.to_string(),
                reason: format!("expected a non-negative integer, got {}", spec),
            }
            .into()
        })
}

fn lookup_option<'a>(spec: &'a Document, key: &str) -> ModelResult<&'a str> {
    spec.get_str(key).map_err(|_| {
        MemoryBackendError::InvalidStage {
            stage: "$lookup".to_string(),
            reason: format!("missing string field '{}'", key),
        }
        .into()
    })
}

/// Resolve a dotted field path inside a document
fn lookup_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(inner) => inner.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Every value a dotted path reaches, descending into arrays of documents
fn path_values<'a>(document: &'a Document, path: &str, out: &mut Vec<&'a Bson>) {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let Some(value) = document.get(head) else {
        return;
    };

    match (value, rest) {
        (_, None) => out.push(value),
        (Bson::Document(inner), Some(rest)) => path_values(inner, rest, out),
        (Bson::Array(items), Some(rest)) => {
            for item in items {
                if let Bson::Document(inner) = item {
                    path_values(inner, rest, out);
                }
            }
        }
        _ => {}
    }
}

/// Sort key of one document: smallest reachable value ascending, largest
/// descending, null when the path reaches nothing
fn sort_key(document: &Document, field: &str, descending: bool) -> Bson {
    let mut values = Vec::new();
    path_values(document, field, &mut values);

    let mut candidates: Vec<&Bson> = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Bson::Array(items) if !items.is_empty() => candidates.extend(items.iter()),
            other => candidates.push(other),
        }
    }

    let picked = if descending {
        candidates.into_iter().max_by(|a, b| compare_bson(a, b))
    } else {
        candidates.into_iter().min_by(|a, b| compare_bson(a, b))
    };
    picked.cloned().unwrap_or(Bson::Null)
}

fn matches_filter(document: &Document, filter: &Document) -> ModelResult<bool> {
    for (field, expected) in filter {
        if field.starts_with('$') {
            return Err(MemoryBackendError::UnsupportedOperator(field.clone()).into());
        }
        if let Bson::Document(inner) = expected {
            if let Some(operator) = inner.keys().find(|key| key.starts_with('$')) {
                return Err(MemoryBackendError::UnsupportedOperator(operator.clone()).into());
            }
        }
        let mut values = Vec::new();
        path_values(document, field, &mut values);
        let matched = if values.is_empty() {
            field_matches(None, expected)
        } else {
            values.into_iter().any(|value| field_matches(Some(value), expected))
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Equality as the server applies it: a missing field equals null and an
/// array field matches when any element equals a scalar.
fn field_matches(actual: Option<&Bson>, expected: &Bson) -> bool {
    match actual {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, expected))
        }
        Some(value) => values_equal(value, expected),
    }
}

fn join_matches(local: Option<&Bson>, foreign: Option<&Bson>) -> bool {
    match local {
        Some(Bson::Array(items)) => items.iter().any(|item| field_matches(foreign, item)),
        Some(value) => field_matches(foreign, value),
        None => field_matches(foreign, &NULL),
    }
}

fn sort_documents(documents: Vec<Document>, keys: &Document) -> ModelResult<Vec<Document>> {
    let mut order = Vec::with_capacity(keys.len());
    for (field, direction) in keys {
        let descending = match as_i64(direction) {
            Some(1) => false,
            Some(-1) => true,
            _ => {
                return Err(MemoryBackendError::InvalidStage {
                    stage: "$sort".to_string(),
                    reason: format!("direction for '{}' must be 1 or -1", field),
                }
                .into())
            }
        };
        order.push((field.as_str(), descending));
    }

    let mut keyed: Vec<(Vec<Bson>, Document)> = documents
        .into_iter()
        .map(|document| {
            let keys = order
                .iter()
                .map(|(field, descending)| sort_key(&document, field, *descending))
                .collect();
            (keys, document)
        })
        .collect();

    keyed.sort_by(|(left, _), (right, _)| {
        for ((l, r), (_, descending)) in left.iter().zip(right).zip(&order) {
            let ordering = compare_bson(l, r);
            if ordering != Ordering::Equal {
                return if *descending { ordering.reverse() } else { ordering };
            }
        }
        Ordering::Equal
    });
    Ok(keyed.into_iter().map(|(_, document)| document).collect())
}

fn apply_update(document: &mut Document, update: &Document) -> ModelResult<()> {
    for (operator, fields) in update {
        let fields = match (operator.as_str(), fields) {
            ("$set" | "$unset", Bson::Document(fields)) => fields,
            _ => return Err(MemoryBackendError::UnsupportedOperator(operator.clone()).into()),
        };

        for (path, value) in fields {
            if path == "_id" || path.starts_with("_id.") {
                let unchanged = operator == "$set" && document.get("_id") == Some(value);
                if !unchanged {
                    return Err(MemoryBackendError::ImmutableField(path.clone()).into());
                }
                continue;
            }
            if operator == "$set" {
                set_path(document, path, value.clone())?;
            } else {
                unset_path(document, path);
            }
        }
    }
    Ok(())
}

fn set_path(document: &mut Document, path: &str, value: Bson) -> ModelResult<()> {
    let Some((head, rest)) = path.split_once('.') else {
        document.insert(path, value);
        return Ok(());
    };

    match document.get(head) {
        None => {
            document.insert(head, Document::new());
        }
        Some(Bson::Document(_)) => {}
        Some(other) => {
            let field = rest.split('.').next().unwrap_or(rest).to_string();
            return Err(MemoryBackendError::PathConflict {
                field,
                parent: head.to_string(),
                value: other.to_string(),
            }
            .into());
        }
    }

    match document.get_mut(head) {
        Some(Bson::Document(inner)) => set_path(inner, rest, value),
        _ => Ok(()),
    }
}

fn unset_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        Some((head, rest)) => {
            if let Some(Bson::Document(inner)) = document.get_mut(head) {
                unset_path(inner, rest);
            }
        }
        None => {
            document.remove(path);
        }
    }
}

fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        Bson::Double(n) if n.fract() == 0.0 => Some(*n as i64),
        _ => None,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Cross-type ordering of BSON values (MinKey < null < numbers < strings <
/// documents < arrays < binary < ObjectId < bool < date < timestamp < regex < MaxKey)
fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::MaxKey => 13,
        _ => 12,
    }
}

pub(crate) fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Bson::String(x) | Bson::Symbol(x), Bson::String(y) | Bson::Symbol(y)) => x.cmp(y),
        (Bson::Document(x), Bson::Document(y)) => {
            for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()) {
                let ordering = kx.cmp(ky).then_with(|| compare_bson(vx, vy));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Bson::Array(x), Bson::Array(y)) => {
            for (vx, vy) in x.iter().zip(y.iter()) {
                let ordering = compare_bson(vx, vy);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Bson::Binary(x), Bson::Binary(y)) => x.bytes.cmp(&y.bytes),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.timestamp_millis().cmp(&y.timestamp_millis()),
        (Bson::Timestamp(x), Bson::Timestamp(y)) => {
            (x.time, x.increment).cmp(&(y.time, y.increment))
        }
        (Bson::Int32(_) | Bson::Int64(_), Bson::Int32(_) | Bson::Int64(_)) => {
            as_i64(a).cmp(&as_i64(b))
        }
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            // decimal, regex, code: keep input order
            _ => Ordering::Equal,
        },
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (a, b) {
        (Bson::Decimal128(_), _) | (_, Bson::Decimal128(_)) | (Bson::RegularExpression(_), _) => a == b,
        _ => compare_bson(a, b) == Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    async fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::new("test_db");
        for (name, age) in [("carol", 41), ("alice", 30), ("bob", 30)] {
            backend
                .insert_one("users", doc! { "name": name, "age": age })
                .await
                .unwrap();
        }
        backend
    }

    #[tokio::test]
    async fn test_insert_generates_object_id_first() {
        let backend = MemoryBackend::new("test_db");
        let id = backend.insert_one("users", doc! { "name": "alice" }).await.unwrap();

        assert!(matches!(id, Bson::ObjectId(_)));
        let stored = backend.documents("users");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].keys().next().map(String::as_str), Some("_id"));
        assert_eq!(stored[0].get("_id"), Some(&id));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let backend = MemoryBackend::new("test_db");
        let id = ObjectId::new();
        backend.insert_one("users", doc! { "_id": id, "n": 1 }).await.unwrap();

        let err = backend
            .insert_one("users", doc! { "_id": id, "n": 2 })
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(backend.documents("users").len(), 1);
    }

    #[tokio::test]
    async fn test_collection_names_and_clear() {
        let backend = seeded().await;
        backend.insert_one("posts", doc! { "title": "hello" }).await.unwrap();
        assert_eq!(backend.collection_names(), vec!["posts", "users"]);

        backend.clear();
        assert!(backend.collection_names().is_empty());
        assert_eq!(backend.count("users", doc! {}).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_match_missing_field_equals_null() {
        let backend = MemoryBackend::new("test_db");
        backend.insert_one("users", doc! { "name": "a" }).await.unwrap();
        backend
            .insert_one("users", doc! { "name": "b", "deleted_at": bson::DateTime::now() })
            .await
            .unwrap();

        let live = backend
            .aggregate("users", vec![doc! { "$match": { "deleted_at": Bson::Null } }])
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].get_str("name").unwrap(), "a");
    }

    #[tokio::test]
    async fn test_match_array_membership_and_numeric_types() {
        let backend = MemoryBackend::new("test_db");
        backend
            .insert_one("posts", doc! { "tags": ["rust", "db"], "score": 3_i64 })
            .await
            .unwrap();

        let by_tag = backend.count("posts", doc! { "tags": "rust" }).await.unwrap();
        let by_score = backend.count("posts", doc! { "score": 3_i32 }).await.unwrap();
        assert_eq!(by_tag, 1);
        assert_eq!(by_score, 1);
    }

    #[tokio::test]
    async fn test_compound_sort_skip_limit() {
        let backend = seeded().await;
        let docs = backend
            .aggregate(
                "users",
                vec![
                    doc! { "$sort": { "age": 1, "name": -1 } },
                    doc! { "$skip": 1_i64 },
                    doc! { "$limit": 5_i64 },
                ],
            )
            .await
            .unwrap();

        let names: Vec<&str> = docs.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }

    #[tokio::test]
    async fn test_lookup_attaches_matches_as_array() {
        let backend = MemoryBackend::new("test_db");
        let alice = backend.insert_one("users", doc! { "name": "alice" }).await.unwrap();
        backend.insert_one("users", doc! { "name": "bob" }).await.unwrap();
        backend
            .insert_one("posts", doc! { "title": "hello", "user_id": alice.clone() })
            .await
            .unwrap();

        let docs = backend
            .aggregate(
                "users",
                vec![
                    doc! { "$lookup": { "from": "posts", "localField": "_id", "foreignField": "user_id", "as": "posts" } },
                    doc! { "$sort": { "name": 1 } },
                ],
            )
            .await
            .unwrap();

        assert_eq!(docs[0].get_array("posts").unwrap().len(), 1);
        assert_eq!(docs[1].get_array("posts").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_update_set_and_unset() {
        let backend = seeded().await;
        let matched = backend
            .update_one(
                "users",
                doc! { "name": "bob" },
                doc! { "$set": { "age": 31, "address.city": "Oslo" }, "$unset": { "name": "" } },
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let bob = backend.find_one("users", doc! { "age": 31 }).await.unwrap().unwrap();
        assert!(bob.get("name").is_none());
        assert_eq!(bob.get_document("address").unwrap().get_str("city").unwrap(), "Oslo");

        let missed = backend
            .update_one("users", doc! { "name": "nobody" }, doc! { "$set": { "age": 1 } })
            .await
            .unwrap();
        assert_eq!(missed, 0);
    }

    #[tokio::test]
    async fn test_update_rejects_changing_the_id() {
        let backend = MemoryBackend::new("test_db");
        let id = backend.insert_one("users", doc! { "name": "alice" }).await.unwrap();

        let err = backend
            .update_one(
                "users",
                doc! { "_id": id.clone() },
                doc! { "$set": { "_id": ObjectId::new(), "name": "mallory" } },
            )
            .await
            .unwrap_err();
        assert!(err.is_transport());

        let unset = backend
            .update_one("users", doc! { "_id": id.clone() }, doc! { "$unset": { "_id": "" } })
            .await
            .unwrap_err();
        assert!(unset.is_transport());

        let stored = backend.documents("users");
        assert_eq!(stored[0].get("_id"), Some(&id));
        assert_eq!(stored[0].get_str("name").unwrap(), "alice");

        let same = backend
            .update_one(
                "users",
                doc! { "_id": id.clone() },
                doc! { "$set": { "_id": id.clone(), "name": "alicia" } },
            )
            .await
            .unwrap();
        assert_eq!(same, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_dotted_path_through_scalar() {
        let backend = MemoryBackend::new("test_db");
        backend.insert_one("users", doc! { "n": 1, "tag": "a" }).await.unwrap();

        let err = backend
            .update_one("users", doc! { "n": 1 }, doc! { "$set": { "tag": "b", "n.x": 5 } })
            .await
            .unwrap_err();
        assert!(err.is_transport());

        let stored = backend.documents("users");
        assert_eq!(stored[0].get_i32("n").unwrap(), 1);
        assert_eq!(stored[0].get_str("tag").unwrap(), "a");
    }

    #[tokio::test]
    async fn test_delete_one_removes_first_match() {
        let backend = seeded().await;
        assert_eq!(backend.delete_one("users", doc! { "age": 30 }).await.unwrap(), 1);
        assert_eq!(backend.count("users", doc! {}).await.unwrap(), 2);
        assert_eq!(backend.delete_one("missing", doc! {}).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_input_is_a_transport_error() {
        let backend = seeded().await;

        let stage = backend
            .aggregate("users", vec![doc! { "$group": { "_id": "$age" } }])
            .await
            .unwrap_err();
        assert!(stage.is_transport());

        let operator = backend
            .count("users", doc! { "age": { "$gt": 18 } })
            .await
            .unwrap_err();
        assert!(operator.is_transport());
    }

    #[tokio::test]
    async fn test_sort_and_match_through_joined_arrays() {
        let backend = MemoryBackend::new("test_db");
        backend
            .insert_one("posts", doc! { "title": "z", "author": [{ "name": "zed" }] })
            .await
            .unwrap();
        backend
            .insert_one("posts", doc! { "title": "a", "author": [{ "name": "amy" }] })
            .await
            .unwrap();

        let sorted = backend
            .aggregate("posts", vec![doc! { "$sort": { "author.name": 1 } }])
            .await
            .unwrap();
        let titles: Vec<&str> = sorted.iter().map(|d| d.get_str("title").unwrap()).collect();
        assert_eq!(titles, vec!["a", "z"]);

        let by_author = backend.count("posts", doc! { "author.name": "zed" }).await.unwrap();
        assert_eq!(by_author, 1);
    }

    #[test]
    fn test_bson_type_order() {
        assert_eq!(compare_bson(&Bson::Null, &Bson::Int32(0)), Ordering::Less);
        assert_eq!(compare_bson(&Bson::Int64(2), &Bson::Double(1.5)), Ordering::Greater);
        assert_eq!(
            compare_bson(&Bson::String("b".into()), &Bson::String("a".into())),
            Ordering::Greater
        );
        assert_eq!(compare_bson(&Bson::Boolean(true), &Bson::String("z".into())), Ordering::Greater);
    }
}
