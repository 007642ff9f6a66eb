//! HTTP control surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router, middleware stack, graceful shutdown)
//!     → request.rs (request id assigned, echoed on the response)
//!     → handlers.rs (extract JSON / query, call ControlSession)
//!     → response.rs (ControlError → status + {"error": ...})
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
