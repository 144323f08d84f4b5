//! HTTP application shell

pub mod middleware;
pub mod routes;
pub mod server;
pub mod websocket;

pub use server::*;
