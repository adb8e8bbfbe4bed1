//! Inbound adapters: HTTP handlers and the WebSocket entry point.

pub mod http;
pub mod ws;
