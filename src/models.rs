//! Core data types used throughout catalogd.
//!
//! These types represent the items, search requests, and sort options that
//! flow through the write coordinator and the search gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A catalog item, persisted in the record store and mirrored into the
/// search index.
///
/// The id is assigned once at creation and never reassigned. Item names are
/// unique across the catalog; the write coordinator enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    pub subcategory: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate item data before an id and timestamps have been assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    pub subcategory: String,
    pub location: String,
}

impl NewItem {
    /// Request-shape validation, shared by every entry point that accepts
    /// a candidate. Deeper invariants (name uniqueness) belong to the
    /// write coordinator, not this check.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        if !(self.price > 0.0) {
            return Err("price must be positive".to_string());
        }
        if self.stock < 0 {
            return Err("stock must not be negative".to_string());
        }
        Ok(())
    }
}

/// Field a search can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Price,
    Name,
    Stock,
    CreatedAt,
    Relevance,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Name => "name",
            SortField::Stock => "stock",
            SortField::CreatedAt => "created_at",
            SortField::Relevance => "relevance",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(SortField::Price),
            "name" => Ok(SortField::Name),
            "stock" => Ok(SortField::Stock),
            "created_at" => Ok(SortField::CreatedAt),
            "relevance" => Ok(SortField::Relevance),
            other => Err(format!(
                "unknown sort field '{}'; use price, name, stock, created_at, or relevance",
                other
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'; use asc or desc", other)),
        }
    }
}

/// A structured, read-only search request.
///
/// Every field is optional. `min_price <= max_price` is the caller's
/// responsibility; the translator passes through whatever bounds are
/// present. `limit` and `offset` are likewise passed through unmodified —
/// defaulting and clamping belong to the search backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text term matched against name and description.
    pub q: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub location: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_round_trip() {
        for field in [
            SortField::Price,
            SortField::Name,
            SortField::Stock,
            SortField::CreatedAt,
            SortField::Relevance,
        ] {
            assert_eq!(field.as_str().parse::<SortField>().unwrap(), field);
        }
    }

    #[test]
    fn test_sort_field_rejects_unknown() {
        assert!("rank".parse::<SortField>().is_err());
    }

    fn candidate() -> NewItem {
        NewItem {
            name: "Widget".to_string(),
            description: "a widget".to_string(),
            price: 9.99,
            stock: 3,
            category: "Tools".to_string(),
            subcategory: "Hand tools".to_string(),
            location: "Berlin".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_candidate() {
        assert!(candidate().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut c = candidate();
        c.price = 0.0;
        assert!(c.validate().is_err());
        c.price = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut c = candidate();
        c.name = "   ".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_stock() {
        let mut c = candidate();
        c.stock = -1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_search_query_deserializes_partial_input() {
        // Mirrors what the HTTP layer deserializes from URL parameters.
        let query: SearchQuery = serde_json::from_value(serde_json::json!({
            "q": "laptop",
            "category": "Electronics",
            "min_price": 100.0,
            "sort": "price",
            "order": "desc"
        }))
        .unwrap();
        assert_eq!(query.q.as_deref(), Some("laptop"));
        assert_eq!(query.sort, Some(SortField::Price));
        assert_eq!(query.order, Some(SortOrder::Desc));
        assert_eq!(query.max_price, None);
    }
}
