//! HTTP handlers for `/api/product` and `/api/product/{id}`.
//!
//! Bodies are decoded into typed inputs and validated before the repository
//! is touched. Store failures become a 500 with a fixed message.

use crate::{
    errors::AppError,
    handlers::extract::JsonBody,
    models::product::{NewProduct, Product, ProductPatch},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// `?id=` on the collection route.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

const UPDATED: MessageResponse = MessageResponse {
    message: "Product updated successfully",
};
const DELETED: MessageResponse = MessageResponse {
    message: "Product deleted successfully",
};

/// GET `/api/product` — all listings, or one when `?id=` is given.
pub async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Response, AppError> {
    if let Some(id) = q.id {
        return fetch_one(&state, &id).await.map(IntoResponse::into_response);
    }

    let products = state
        .products
        .list()
        .await
        .map_err(|e| AppError::from_catalog(e, "Failed to fetch products"))?;
    Ok(Json(products).into_response())
}

/// POST `/api/product` — create a listing.
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewProduct>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let product = state
        .products
        .create(input)
        .await
        .map_err(|e| AppError::from_catalog(e, "Failed to add product"))?;

    tracing::info!("product {} listed by {}", product.id, product.seller_id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT `/api/product?id=` — same as the item route.
pub async fn update_product_by_query(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> Result<impl IntoResponse, AppError> {
    let id = q
        .id
        .ok_or_else(|| AppError::bad_request("Missing product id"))?;
    apply_update(&state, &id, patch).await
}

/// DELETE `/api/product?id=` — same as the item route.
pub async fn delete_product_by_query(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = q
        .id
        .ok_or_else(|| AppError::bad_request("Missing product id"))?;
    apply_delete(&state, &id).await
}

/// GET `/api/product/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    fetch_one(&state, &id).await
}

/// PUT `/api/product/{id}` — partial update.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> Result<impl IntoResponse, AppError> {
    apply_update(&state, &id, patch).await
}

/// DELETE `/api/product/{id}` — idempotent.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    apply_delete(&state, &id).await
}

async fn fetch_one(state: &AppState, id: &str) -> Result<Json<Product>, AppError> {
    let product = state
        .products
        .get(id)
        .await
        .map_err(|e| AppError::from_catalog(e, "Failed to fetch product"))?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

async fn apply_update(
    state: &AppState,
    id: &str,
    patch: ProductPatch,
) -> Result<Json<MessageResponse>, AppError> {
    patch.validate()?;
    if patch.is_empty() {
        tracing::debug!("empty update for product {} only refreshes updatedAt", id);
    }

    let product = state
        .products
        .update(id, patch)
        .await
        .map_err(|e| AppError::from_catalog(e, "Failed to update product"))?;

    tracing::debug!("product {} now {:?}", product.id, product.status);
    Ok(Json(UPDATED))
}

async fn apply_delete(state: &AppState, id: &str) -> Result<Json<MessageResponse>, AppError> {
    let removed = state
        .products
        .delete(id)
        .await
        .map_err(|e| AppError::from_catalog(e, "Failed to delete product"))?;

    if removed {
        tracing::info!("product {} deleted", id);
    }
    Ok(Json(DELETED))
}
