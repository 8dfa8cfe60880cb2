//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → submit.rs (method, origin and payload gate)
//!     → [upstream forwarder]
//!     → response.rs (normalize to {ok, ...})
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod submit;

pub use request::X_REQUEST_ID;
pub use server::{HttpServer, ServerError, SUBMIT_PATH};
pub use submit::AppState;
