//! Core data types for Espresso Emporium

use crate::errors::CoreError;
use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

/// A loosely-typed record as stored in a collection
pub type Document = serde_json::Map<String, Value>;

/// Name of the primary key field on every stored document
pub const ID_FIELD: &str = "_id";

/// Server-stamped creation time on reviews
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Opaque document identifier (a 12-byte ObjectId rendered as 24 hex chars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a 24-character hexadecimal identifier
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !Self::is_valid(s) {
            return Err(CoreError::InvalidId(s.to_string()));
        }
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::InvalidId(s.to_string()))
    }

    /// Check whether a string is syntactically a valid identifier
    pub fn is_valid(s: &str) -> bool {
        s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Lowercase hex form
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// The underlying ObjectId
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for DocumentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Read the identifier of a stored document, if it carries a valid one
pub fn document_id(doc: &Document) -> Option<DocumentId> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| DocumentId::parse(s).ok())
}

/// The four collections exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Products,
    Cart,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Products,
        Collection::Cart,
        Collection::Reviews,
    ];

    /// Name of the collection in the backing database
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Cart => "cart",
            Collection::Reviews => "reviews",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Well-known user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "Buyer",
            Role::Seller => "Seller",
            Role::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Buyer" => Ok(Role::Buyer),
            "Seller" => Ok(Role::Seller),
            "Admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Backend-neutral query over a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    /// Primary key equality
    Id(DocumentId),
    /// Field equality; `null` also matches a missing field
    Eq(String, Value),
    /// Case-insensitive literal substring match on a string field
    Contains(String, String),
    /// Every sub-filter matches (empty matches everything)
    And(Vec<Filter>),
    /// Some sub-filter matches (empty matches nothing)
    Or(Vec<Filter>),
}

impl Filter {
    pub fn id(id: DocumentId) -> Self {
        Filter::Id(id)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains(field.into(), needle.into())
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => document_id(doc).map_or(false, |doc_id| doc_id == *id),
            Filter::Eq(field, Value::Null) => doc.get(field).map_or(true, Value::is_null),
            Filter::Eq(field, expected) => doc.get(field) == Some(expected),
            Filter::Contains(field, needle) => doc
                .get(field)
                .and_then(Value::as_str)
                .map_or(false, |s| s.to_lowercase().contains(&needle.to_lowercase())),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

/// Outcome of inserting a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl InsertOneResult {
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Outcome of a partial update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Outcome of a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Outcome of a self-registration attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Created(InsertOneResult),
    AlreadyExists,
}

/// Live aggregate counts for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_buyers: u64,
    pub total_sellers: u64,
    pub total_products: u64,
    pub total_reviews: u64,
}

fn str_field(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

/// The user fields the service reasons about
#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UserView {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            email: str_field(doc, "email"),
            role: str_field(doc, "role"),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

/// The product fields the service reasons about
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub seller_email: Option<String>,
}

impl ProductView {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            seller_email: str_field(doc, "sellerEmail"),
        }
    }
}

/// The review fields the service reasons about
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub coffee_id: Option<String>,
}

impl ReviewView {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            coffee_id: str_field(doc, "coffeeId"),
        }
    }
}
