//! Defines routes for the product catalog and the seller pages.
//!
//! ## Structure
//! - **Collection endpoints**
//!   - `GET    /api/product`       — list all products, or one with `?id=`
//!   - `POST   /api/product`       — create a product
//!   - `PUT    /api/product?id=`   — partial update
//!   - `DELETE /api/product?id=`   — delete
//!
//! - **Item endpoints**
//!   - `GET    /api/product/{id}`  — fetch one product
//!   - `PUT    /api/product/{id}`  — partial update
//!   - `DELETE /api/product/{id}`  — delete (idempotent)
//!
//! - **Session-guarded pages**: `/seller`, `/seller/*`, `/order`, `/order/*`
//!   (a bare trailing slash is the index page, since `{*rest}` needs a tail)

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        product_handlers::{
            create_product, delete_product, delete_product_by_query, get_product, list_products,
            update_product, update_product_by_query,
        },
        seller_handlers::{order_detail, order_summary, seller_dashboard, seller_listing},
    },
    middleware::session_guard::require_session,
    state::AppState,
};
use axum::{Router, middleware, routing::get};

/// Build the full router with state applied.
///
/// The session guard is attached with `route_layer`, so it only runs for the
/// protected routes and never for the public API.
pub fn routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/seller", get(seller_dashboard))
        .route("/seller/", get(seller_dashboard))
        .route("/seller/{*rest}", get(seller_listing))
        .route("/order", get(order_summary))
        .route("/order/", get(order_summary))
        .route("/order/{*rest}", get(order_detail))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Collection routes
        .route(
            "/api/product",
            get(list_products)
                .post(create_product)
                .put(update_product_by_query)
                .delete(delete_product_by_query),
        )
        // Item routes
        .route(
            "/api/product/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .merge(protected)
        .with_state(state)
}
