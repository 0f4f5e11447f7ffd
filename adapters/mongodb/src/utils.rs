//! Conversions between API documents/filters and BSON

use bson::{doc, Bson, DateTime as BsonDateTime, Document as BsonDocument};
use chrono::SecondsFormat;
use espresso_core::errors::StoreError;
use espresso_core::types::{Document, Filter, CREATED_AT_FIELD, ID_FIELD};
use serde_json::Value;

/// Convert a JSON value to BSON
pub fn json_to_bson(value: &Value) -> Result<Bson, StoreError> {
    bson::to_bson(value).map_err(|e| StoreError::Serialization(format!("Failed to convert value to BSON: {}", e)))
}

/// Convert an API document to BSON, dropping any `_id`.
///
/// An RFC 3339 `createdAt` is stored as a BSON date so it sorts and compares
/// as one; any other `createdAt` value is stored as given.
pub fn json_to_bson_document(document: &Document) -> Result<BsonDocument, StoreError> {
    let mut out = BsonDocument::new();
    for (key, value) in document {
        if key == ID_FIELD {
            continue;
        }
        let converted = match value {
            Value::String(s) if key == CREATED_AT_FIELD => match BsonDateTime::parse_rfc3339_str(s) {
                Ok(date) => Bson::DateTime(date),
                Err(_) => Bson::String(s.clone()),
            },
            other => json_to_bson(other)?,
        };
        out.insert(key.clone(), converted);
    }
    Ok(out)
}

/// Build the `$set` update for a partial document.
///
/// `None` means there is nothing to set once `_id` is dropped; older servers
/// reject an empty `$set`, so callers skip the write.
pub fn set_update(set: &Document) -> Result<Option<BsonDocument>, StoreError> {
    let set = json_to_bson_document(set)?;
    if set.is_empty() {
        return Ok(None);
    }
    Ok(Some(doc! { "$set": set }))
}

/// Convert a stored BSON document to its API form.
///
/// Top-level ObjectIds render as hex and dates as RFC 3339 strings; nested
/// values use relaxed extended JSON.
pub fn bson_to_json_document(document: BsonDocument) -> Document {
    document
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Bson::ObjectId(oid) => Value::String(oid.to_hex()),
                Bson::DateTime(dt) => Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)),
                other => other.into_relaxed_extjson(),
            };
            (key, value)
        })
        .collect()
}

/// Translate a filter into a MongoDB query document
pub fn filter_to_bson(filter: &Filter) -> Result<BsonDocument, StoreError> {
    let query = match filter {
        Filter::All => doc! {},
        Filter::Id(id) => doc! { "_id": id.object_id() },
        Filter::Eq(field, value) => {
            let mut query = BsonDocument::new();
            query.insert(field.clone(), json_to_bson(value)?);
            query
        }
        Filter::Contains(field, needle) => {
            let mut query = BsonDocument::new();
            query.insert(field.clone(), doc! { "$regex": escape_regex(needle), "$options": "i" });
            query
        }
        Filter::And(filters) if filters.is_empty() => doc! {},
        Filter::And(filters) => doc! { "$and": filters_to_bson(filters)? },
        // Every document has an _id, so this never matches
        Filter::Or(filters) if filters.is_empty() => doc! { "_id": { "$exists": false } },
        Filter::Or(filters) => doc! { "$or": filters_to_bson(filters)? },
    };
    Ok(query)
}

fn filters_to_bson(filters: &[Filter]) -> Result<Vec<Bson>, StoreError> {
    filters
        .iter()
        .map(|f| filter_to_bson(f).map(Bson::Document))
        .collect()
}

/// Escape regex metacharacters so the needle matches literally
pub fn escape_regex(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '-' | '/') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use espresso_core::types::DocumentId;
    use serde_json::json;

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("mocha"), "mocha");
        assert_eq!(escape_regex("a.b"), "a\\.b");
        assert_eq!(escape_regex("(large)*"), "\\(large\\)\\*");
        assert_eq!(escape_regex("c:\\x"), "c:\\\\x");
    }

    #[test]
    fn test_json_to_bson_drops_id() {
        let document = json!({"_id": "abc", "name": "Ann", "age": 30})
            .as_object()
            .cloned()
            .unwrap();
        let converted = json_to_bson_document(&document).unwrap();
        assert!(!converted.contains_key("_id"));
        assert_eq!(converted.get_str("name").unwrap(), "Ann");
        assert!(converted.contains_key("age"));
    }

    #[test]
    fn test_bson_to_json_renders_object_id_as_hex() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let converted = bson_to_json_document(doc! { "_id": oid, "name": "Ann", "tags": ["x"] });
        assert_eq!(converted["_id"], json!("507f1f77bcf86cd799439011"));
        assert_eq!(converted["name"], json!("Ann"));
        assert_eq!(converted["tags"], json!(["x"]));
    }

    #[test]
    fn test_bson_to_json_renders_dates() {
        let at = BsonDateTime::parse_rfc3339_str("2024-03-01T09:30:00.120Z").unwrap();
        let converted = bson_to_json_document(doc! { "createdAt": at, "nested": { "at": at } });
        assert_eq!(converted["createdAt"], json!("2024-03-01T09:30:00.120Z"));
        assert!(converted["nested"]["at"].is_object());
    }

    #[test]
    fn test_created_at_is_stored_as_date() {
        let document = json!({"createdAt": "2024-03-01T09:30:00.120Z", "rating": 4})
            .as_object()
            .cloned()
            .unwrap();
        let converted = json_to_bson_document(&document).unwrap();
        let stored = converted.get_datetime("createdAt").unwrap();
        assert_eq!(stored.timestamp_millis(), 1_709_285_400_120);
        assert_eq!(
            bson_to_json_document(converted)["createdAt"],
            json!("2024-03-01T09:30:00.120Z")
        );

        let document = json!({"createdAt": "yesterday", "note": "2024-03-01T09:30:00Z"})
            .as_object()
            .cloned()
            .unwrap();
        let converted = json_to_bson_document(&document).unwrap();
        assert_eq!(converted.get_str("createdAt").unwrap(), "yesterday");
        assert_eq!(converted.get_str("note").unwrap(), "2024-03-01T09:30:00Z");
    }

    #[test]
    fn test_set_update() {
        let set = json!({"_id": "abc", "name": "Ann"}).as_object().cloned().unwrap();
        assert_eq!(set_update(&set).unwrap(), Some(doc! { "$set": { "name": "Ann" } }));

        let only_id = json!({"_id": "abc"}).as_object().cloned().unwrap();
        assert_eq!(set_update(&only_id).unwrap(), None);
        assert_eq!(set_update(&Document::new()).unwrap(), None);
    }

    #[test]
    fn test_filter_translation() {
        let id = DocumentId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(filter_to_bson(&Filter::All).unwrap(), doc! {});
        assert_eq!(filter_to_bson(&Filter::id(id)).unwrap(), doc! { "_id": id.object_id() });
        assert_eq!(filter_to_bson(&Filter::eq("role", "Buyer")).unwrap(), doc! { "role": "Buyer" });
        assert_eq!(filter_to_bson(&Filter::And(vec![])).unwrap(), doc! {});
        assert_eq!(
            filter_to_bson(&Filter::Or(vec![])).unwrap(),
            doc! { "_id": { "$exists": false } }
        );

        let search = Filter::Or(vec![
            Filter::contains("name", "mo.cha"),
            Filter::contains("company", "mo.cha"),
        ]);
        assert_eq!(
            filter_to_bson(&search).unwrap(),
            doc! { "$or": [
                { "name": { "$regex": "mo\\.cha", "$options": "i" } },
                { "company": { "$regex": "mo\\.cha", "$options": "i" } }
            ] }
        );
    }
}
