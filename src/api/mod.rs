//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /stores` - List store names
//! - `DELETE /stores/:store` - Clear a store
//! - `GET /stats/:store` - Store statistics
//! - `PUT /stores/:store/:key` - Store a payload
//! - `GET /stores/:store/:key` - Retrieve a payload
//! - `DELETE /stores/:store/:key` - Remove a payload
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
