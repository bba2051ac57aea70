#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use market_catalog::{
    config::DEFAULT_SESSION_COOKIE,
    db,
    models::session::SessionUser,
    routes::routes::routes,
    services::{
        product_service::ProductService,
        session_service::{SessionStore, SqliteSessionStore, default_expiry, new_user},
    },
    state::AppState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const SELLER_ID: &str = "507f1f77bcf86cd799439011";

pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<dyn SessionStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = Arc::new(db::memory_pool().await.expect("in-memory database"));
        let sessions: Arc<dyn SessionStore> = Arc::new(SqliteSessionStore::new(pool.clone()));
        let state = AppState::new(
            ProductService::new(pool),
            sessions.clone(),
            DEFAULT_SESSION_COOKIE,
        );
        Self {
            router: routes(state),
            sessions,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.send(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Create a user with a live session and return it with its cookie header.
    pub async fn login(&self, name: &str) -> (SessionUser, String) {
        let user = new_user(name, None);
        let token = self.sessions.issue(&user, default_expiry()).await.unwrap();
        (user, format!("{}={}", DEFAULT_SESSION_COOKIE, token))
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }
}

pub fn desk(seller_id: &str) -> Value {
    serde_json::json!({
        "name": "Desk",
        "price": 49.99,
        "images": ["http://x/1.jpg"],
        "sellerId": seller_id
    })
}
