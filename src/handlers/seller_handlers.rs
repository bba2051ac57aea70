//! Seller-facing views behind the session guard: the dashboard of the
//! signed-in user's listings and the orders derived from them.

use crate::{
    errors::AppError,
    models::{product::Product, session::SessionUser},
    services::{
        order_service::{self, OrderSummary, StatusCounts},
        product_service::CatalogError,
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct SellerDashboard {
    pub user: SessionUser,
    pub products: Vec<Product>,
    pub counts: StatusCounts,
}

/// GET `/seller`
pub async fn seller_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<SellerDashboard>, AppError> {
    let products = own_listings(&state, &user).await?;
    let counts = StatusCounts::tally(&products);
    Ok(Json(SellerDashboard {
        user,
        products,
        counts,
    }))
}

/// GET `/seller/{*rest}` — one of the user's own listings.
pub async fn seller_listing(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(rest): Path<String>,
) -> Result<Json<Product>, AppError> {
    owned_product(&state, &user, &rest).await.map(Json)
}

/// GET `/order`
pub async fn order_summary(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<OrderSummary>, AppError> {
    let products = own_listings(&state, &user).await?;
    Ok(Json(order_service::summarize(products)))
}

/// GET `/order/{*rest}` — one reserved or sold listing of the user.
pub async fn order_detail(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(rest): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = owned_product(&state, &user, &rest).await?;
    if !product.status.is_order() {
        return Err(AppError::not_found("Order not found"));
    }
    Ok(Json(product))
}

async fn own_listings(state: &AppState, user: &SessionUser) -> Result<Vec<Product>, AppError> {
    state
        .products
        .list_by_seller(&user.id)
        .await
        .map_err(|e| AppError::from_catalog(e, "Failed to fetch products"))
}

/// Anything that is not a listing of this user is a 404, including paths
/// that are not ids at all.
async fn owned_product(
    state: &AppState,
    user: &SessionUser,
    rest: &str,
) -> Result<Product, AppError> {
    let id = rest.trim_matches('/');
    match state.products.get(id).await {
        Ok(Some(product)) if product.seller_id == user.id => Ok(product),
        Ok(_) => Err(AppError::not_found("Product not found")),
        Err(CatalogError::InvalidId(_)) => Err(AppError::not_found("Product not found")),
        Err(e) => Err(AppError::from_catalog(e, "Failed to fetch product")),
    }
}
