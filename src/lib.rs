//! Equipment checkout tracking: catalog, status transitions, and realtime
//! fan-out of committed changes to connected viewers.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
