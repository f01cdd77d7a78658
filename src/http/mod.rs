//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all route)
//!     → request.rs (request ID)
//!     → routing::RouteTable (candidate handler class)
//!     → dispatch (method resolution, handler invocation)
//!     → response.rs (JSON document or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::ErrorEnvelope;
pub use server::{AppState, RestService};
