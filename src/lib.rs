//! Product catalog service for a B2B marketplace: listing CRUD over SQLite,
//! a JSON REST surface, and a session guard for the seller pages.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
