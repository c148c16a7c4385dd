//! Validation error types

use std::fmt;

/// Message returned to clients when a required field is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, email, and student ID are required";

/// Validation error for inbound registrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are absent or empty
    MissingRequired { fields: Vec<&'static str> },
}

impl ValidationError {
    /// Names of the offending fields, in declaration order.
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::MissingRequired { fields } => fields,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Clients always see the same sentence regardless of which field failed
            Self::MissingRequired { .. } => f.write_str(REQUIRED_FIELDS_MESSAGE),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::MissingRequired {
            fields: vec!["email"],
        };
        assert_eq!(err.to_string(), "Name, email, and student ID are required");
        assert_eq!(err.fields(), &["email"]);
    }
}
