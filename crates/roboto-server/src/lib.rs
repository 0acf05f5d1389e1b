//! HTTP surface for roboto: axum handlers and router for robots.txt and the
//! sitemaps, plus a small demo application used by the `roboto` binary.

pub mod demo;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{robots_router, Server};
