// Middleware module - Axum middleware

pub mod cors;

pub use cors::edge_cors;
