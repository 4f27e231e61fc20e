//! Product repository for database operations.

use sqlx::PgPool;

use bramble_core::{Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, price, description, image_url, created_by, created_at, updated_at
            FROM shop.product
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, price, description, image_url, created_by, created_at, updated_at
            FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        product: &NewProduct,
        created_by: UserId,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO shop.product (title, price, description, image_url, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, price, description, image_url, created_by, created_at, updated_at
            ",
        )
        .bind(&product.title)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(created_by)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product's editable fields.
    ///
    /// A `None` image URL keeps the stored one, mirroring the admin form
    /// where re-uploading an image is optional.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        title: &str,
        price: Price,
        description: &str,
        image_url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.product
            SET title = $1,
                price = $2,
                description = $3,
                image_url = COALESCE($4, image_url),
                updated_at = now()
            WHERE id = $5
            ",
        )
        .bind(title)
        .bind(price)
        .bind(description)
        .bind(image_url)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product by its ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
