//! Output formatting utilities for espctl

use crate::cli::OutputFormat;
use colored::*;
use espresso_core::errors::CoreError;
use espresso_core::types::{AdminStats, Document};
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

/// Which columns to show when listing documents as a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    User,
    Product,
    CartItem,
    Review,
}

/// Display a list of documents
pub fn display_documents(documents: &[Document], kind: DocumentKind, format: &OutputFormat) -> Result<(), CoreError> {
    match format {
        OutputFormat::Table => {
            if documents.is_empty() {
                println!("No {} found", kind.plural());
                return Ok(());
            }

            let table = match kind {
                DocumentKind::User => Table::new(documents.iter().map(UserRow::from)).to_string(),
                DocumentKind::Product => Table::new(documents.iter().map(ProductRow::from)).to_string(),
                DocumentKind::CartItem => Table::new(documents.iter().map(CartRow::from)).to_string(),
                DocumentKind::Review => Table::new(documents.iter().map(ReviewRow::from)).to_string(),
            };
            println!("{}", table);
        }
        OutputFormat::Json => print_json(documents)?,
    }
    Ok(())
}

/// Display every field of a single document
pub fn display_document(document: &Document, title: &str, format: &OutputFormat) -> Result<(), CoreError> {
    match format {
        OutputFormat::Table => {
            println!("{}", title.bold().blue());
            for (key, value) in document {
                println!("{:<15} {}", format!("{}:", key).bold(), format_value(value));
            }
        }
        OutputFormat::Json => print_json(document)?,
    }
    Ok(())
}

/// Display the admin dashboard counters
pub fn display_stats(stats: &AdminStats, format: &OutputFormat) -> Result<(), CoreError> {
    match format {
        OutputFormat::Table => {
            println!("{}", "Emporium Statistics".bold().blue());
            println!("{:<15} {}", "Buyers:".bold(), stats.total_buyers);
            println!("{:<15} {}", "Sellers:".bold(), stats.total_sellers);
            println!("{:<15} {}", "Products:".bold(), stats.total_products);
            println!("{:<15} {}", "Reviews:".bold(), stats.total_reviews);
        }
        OutputFormat::Json => print_json(stats)?,
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize to JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

impl DocumentKind {
    fn plural(&self) -> &'static str {
        match self {
            DocumentKind::User => "users",
            DocumentKind::Product => "products",
            DocumentKind::CartItem => "cart items",
            DocumentKind::Review => "reviews",
        }
    }
}

/// Render a field for table cells; absent fields show as `-`
fn field(document: &Document, key: &str) -> String {
    document.get(key).map_or_else(|| "-".to_string(), format_value)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&Document> for UserRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: field(doc, "_id"),
            name: field(doc, "name"),
            email: field(doc, "email"),
            role: field(doc, "role"),
        }
    }
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Seller")]
    seller: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Document> for ProductRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: field(doc, "_id"),
            name: field(doc, "name"),
            company: field(doc, "company"),
            seller: field(doc, "sellerEmail"),
            price: field(doc, "price"),
        }
    }
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
}

impl From<&Document> for CartRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: field(doc, "_id"),
            product: field(doc, "productId"),
            quantity: field(doc, "quantity"),
        }
    }
}

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Document> for ReviewRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: field(doc, "_id"),
            author: field(doc, "authorId"),
            rating: field(doc, "rating"),
            created: field(doc, "createdAt"),
        }
    }
}
