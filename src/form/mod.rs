//! Client-side form controller.
//!
//! # Data Flow
//! ```text
//! entered values
//!     → fields.rs (email check, inject subject / category / page)
//!     → controller.rs (disable submit control while in flight)
//!     → client.rs (POST to relay endpoint or hosted form relay)
//!     → SubmitOutcome → status message, form cleared on success
//! ```

pub mod client;
pub mod controller;
pub mod fields;

pub use client::{Destination, FormClient, SubmitOutcome, FORM_RELAY_BASE};
pub use controller::{FormController, InFlight, StatusMessage, SubmitControl};
pub use fields::{prepare_submission, validate_email, FormError, FormKind, Fields};
