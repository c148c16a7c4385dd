//! Domain models with validation at construction
//!
//! Client input is validated when a `RegistrationForm` becomes a
//! `Registration`. Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod registration;

pub use validation::{ValidationError, REQUIRED_FIELDS_MESSAGE};
pub use registration::{Registration, RegistrationForm, COLUMNS};
