pub mod extract;
pub mod health_handlers;
pub mod product_handlers;
pub mod seller_handlers;
