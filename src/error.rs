//! Error types for the depth/property selection layer.
//!
//! Loading and I/O paths report through `anyhow`; the selector reports these
//! typed, recoverable conditions so the viewer can reset its controls.

use thiserror::Error;

/// Result type alias for selector operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Recoverable selection failures. None of these end the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The referenced field is absent, or equals the depth field where a
    /// distinct property is required.
    #[error("Invalid field '{name}': {reason}")]
    InvalidField { name: String, reason: &'static str },

    /// No records, so bounds are undefined.
    #[error("Dataset has no records")]
    EmptyDataset,

    /// A numeric comparison or plot hit a non-numeric value.
    #[error("Field '{field}' is not numeric (row {row}: '{value}')")]
    NonNumericField {
        field: String,
        row: usize,
        value: String,
    },

    /// Bounds are reversed or not finite.
    #[error("Invalid depth range [{lower}, {upper}]")]
    InvalidRange { lower: f64, upper: f64 },
}

impl SelectionError {
    /// Create an InvalidField error for a name the dataset does not have.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::InvalidField {
            name: name.into(),
            reason: "not present in dataset",
        }
    }

    /// Create an InvalidField error for a property equal to the depth field.
    pub fn same_as_depth(name: impl Into<String>) -> Self {
        Self::InvalidField {
            name: name.into(),
            reason: "already selected as the depth field",
        }
    }

    /// Create a NonNumericField error.
    pub fn non_numeric(field: impl Into<String>, row: usize, value: impl Into<String>) -> Self {
        Self::NonNumericField {
            field: field.into(),
            row,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let e = SelectionError::same_as_depth("DEPTH");
        assert_eq!(
            e.to_string(),
            "Invalid field 'DEPTH': already selected as the depth field"
        );
        let e = SelectionError::non_numeric("LITH", 3, "shale");
        assert_eq!(e.to_string(), "Field 'LITH' is not numeric (row 3: 'shale')");
    }
}
