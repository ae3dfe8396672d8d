//! API Module
//!
//! HTTP handlers and routing for the read-through cache server.
//!
//! # Endpoints
//! - `GET /get/:key` - Read a key through the cache
//! - `POST /mget` - Read many keys at once
//! - `DELETE /del/:key` - Drop one cached key
//! - `DELETE /clear` - Drop every cached key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
