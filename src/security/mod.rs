//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → origin.rs (allow-list check, CORS headers)
//!     → limits.rs (body size and shape)
//!     → Pass to forwarder
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod limits;
pub mod origin;

pub use limits::{read_payload, PayloadError};
pub use origin::{apply_cors_headers, OriginPolicy};
