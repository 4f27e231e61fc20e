//! Product domain types.

use chrono::{DateTime, Utc};

use bramble_core::{Price, ProductId, UserId};

/// A catalog product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Price in the shop currency.
    pub price: Price,
    /// Long-form description shown on the detail page.
    pub description: String,
    /// Public URL of the product image (under `/images`).
    pub image_url: String,
    /// User who created the product; `NULL` once that account is deleted.
    pub created_by: Option<UserId>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
}
