use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog entry as stored in the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // ---
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Unit price, non-negative.
    pub price: f64,
    /// Units in stock, non-negative.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    // ---
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: i32,
}

/// Request body for replacing the mutable fields of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    // ---
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: i32,
}

fn validate_fields(name: &str, price: f64, quantity: i32) -> Result<(), String> {
    // ---
    if name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number".to_string());
    }
    if quantity < 0 {
        return Err("quantity must not be negative".to_string());
    }
    Ok(())
}

impl NewProduct {
    // ---
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.name, self.price, self.quantity)
    }
}

impl ProductUpdate {
    // ---
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.name, self.price, self.quantity)
    }
}

/// Column a product listing can be ordered by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Price,
    Quantity,
    CreatedAt,
}

impl SortKey {
    // ---
    /// Column name used in `ORDER BY`. Only these fixed identifiers ever reach SQL.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Quantity => "quantity",
            SortKey::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "quantity" => Ok(SortKey::Quantity),
            "created_at" => Ok(SortKey::CreatedAt),
            other => Err(format!(
                "invalid sort field '{other}', expected one of: id, name, price, quantity, created_at"
            )),
        }
    }
}
