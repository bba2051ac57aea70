use crate::services::{product_service::ProductService, session_service::SessionStore};
use std::sync::Arc;

/// Shared state carried by the router to every handler and to the session
/// guard.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub sessions: Arc<dyn SessionStore>,
    /// Name of the cookie carrying the session token.
    pub session_cookie: Arc<str>,
}

impl AppState {
    pub fn new(
        products: ProductService,
        sessions: Arc<dyn SessionStore>,
        session_cookie: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            products,
            sessions,
            session_cookie: session_cookie.into(),
        }
    }
}
