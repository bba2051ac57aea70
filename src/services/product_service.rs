//! src/services/product_service.rs
//!
//! ProductService — catalog CRUD backed by a single SQLite `products` table.
//! Every operation is one statement; concurrent edits to the same listing are
//! last-write-wins per field set. No caching, no retries.

use crate::models::{
    object_id::ObjectId,
    product::{NewProduct, Product, ProductPatch},
};
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite, types::Json};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const PRODUCT_COLUMNS: &str = "id, name, description, price, images, seller_id, status, \
                               category, location, created_at, updated_at";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("`{0}` is not a valid product id")]
    InvalidId(String),
    #[error("product `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product repository. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct ProductService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl ProductService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    fn parse_id(id: &str) -> CatalogResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| CatalogError::InvalidId(id.to_string()))
    }

    /// Every listing, in whatever order SQLite yields them.
    pub async fn list(&self) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products"))
            .fetch_all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Listings owned by one seller.
    pub async fn list_by_seller(&self, seller_id: &ObjectId) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE seller_id = ?"
        ))
        .bind(seller_id)
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Fetch one listing. `Ok(None)` when the id is well formed but unknown.
    pub async fn get(&self, id: &str) -> CatalogResult<Option<Product>> {
        let id = Self::parse_id(id)?;
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(&id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(row)
    }

    /// Insert a listing. Input is expected to be validated already.
    ///
    /// `created_at` and `updated_at` share one timestamp and status defaults
    /// to `available`.
    pub async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let id = ObjectId::new();
        let now = Utc::now();
        let status = input.status.unwrap_or_default();

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                id, name, description, price, images, seller_id, status,
                category, location, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(Json(&input.images))
        .bind(&input.seller_id)
        .bind(status)
        .bind(&input.category)
        .bind(&input.location)
        .bind(now)
        .bind(now)
        .fetch_one(&*self.db)
        .await?;

        debug!("created product {}", product.id);
        Ok(product)
    }

    /// Merge the supplied fields into a listing and refresh `updated_at`.
    ///
    /// Runs as a single UPDATE so the row is never observed half written.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> CatalogResult<Product> {
        let id = Self::parse_id(id)?;

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE products SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(name) = patch.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(price) = patch.price {
            builder.push(", price = ").push_bind(price);
        }
        if let Some(images) = patch.images {
            builder.push(", images = ").push_bind(Json(images));
        }
        if let Some(seller_id) = patch.seller_id {
            builder.push(", seller_id = ").push_bind(seller_id);
        }
        if let Some(status) = patch.status {
            builder.push(", status = ").push_bind(status);
        }
        if let Some(category) = patch.category {
            builder.push(", category = ").push_bind(category);
        }
        if let Some(location) = patch.location {
            builder.push(", location = ").push_bind(location);
        }

        builder.push(" WHERE id = ").push_bind(id.clone());
        builder.push(" RETURNING ").push(PRODUCT_COLUMNS);

        builder
            .build_query_as::<Product>()
            .fetch_optional(&*self.db)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Remove a listing. Deleting an absent id succeeds; the return value
    /// says whether a row was actually removed.
    pub async fn delete(&self, id: &str) -> CatalogResult<bool> {
        let id = Self::parse_id(id)?;
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(&id)
            .execute(&*self.db)
            .await?;

        let removed = result.rows_affected() > 0;
        if !removed {
            debug!("delete of product {} matched nothing", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, models::product::ProductStatus};
    use serde_json::json;

    async fn service() -> ProductService {
        let pool = db::memory_pool().await.unwrap();
        ProductService::new(Arc::new(pool))
    }

    fn desk() -> NewProduct {
        serde_json::from_value(json!({
            "name": "Desk",
            "description": "Oak, lightly used",
            "price": 49.99,
            "images": ["http://x/1.jpg", "http://x/2.jpg"],
            "sellerId": "507f1f77bcf86cd799439011",
            "category": "furniture"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_timestamps_and_default_status() {
        let svc = service().await;
        let created = svc.create(desk()).await.unwrap();

        assert_eq!(created.status, ProductStatus::Available);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.images, vec!["http://x/1.jpg", "http://x/2.jpg"]);

        let fetched = svc.get(created.id.as_str()).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_distinguishes_missing_from_malformed() {
        let svc = service().await;
        assert!(
            svc.get("507f1f77bcf86cd799439099")
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            svc.get("nope").await,
            Err(CatalogError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let svc = service().await;
        let created = svc.create(desk()).await.unwrap();

        let patch = ProductPatch {
            status: Some(ProductStatus::Reserved),
            ..Default::default()
        };
        let updated = svc.update(created.id.as_str(), patch).await.unwrap();

        assert_eq!(updated.status, ProductStatus::Reserved);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(
            Product {
                status: created.status,
                updated_at: created.updated_at,
                ..updated
            },
            created
        );
    }

    #[tokio::test]
    async fn update_of_missing_product_is_not_found() {
        let svc = service().await;
        let res = svc
            .update("507f1f77bcf86cd799439099", ProductPatch::default())
            .await;
        assert!(matches!(res, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let svc = service().await;
        let created = svc.create(desk()).await.unwrap();

        assert!(svc.delete(created.id.as_str()).await.unwrap());
        assert!(!svc.delete(created.id.as_str()).await.unwrap());
        assert!(svc.get(created.id.as_str()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_and_list_by_seller() {
        let svc = service().await;
        svc.create(desk()).await.unwrap();
        let mut other = desk();
        other.seller_id = ObjectId::parse_str("507f1f77bcf86cd799439022").unwrap();
        svc.create(other).await.unwrap();

        assert_eq!(svc.list().await.unwrap().len(), 2);
        let mine = svc
            .list_by_seller(&ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Desk");
    }
}
