//! Error types for the phasor circuit analyzer.
//!
//! This module provides a unified error type [`PhasorError`] that covers
//! all error conditions that can occur during netlist parsing, circuit
//! construction, and solving.

use thiserror::Error;

/// Result type alias using [`PhasorError`].
pub type Result<T> = std::result::Result<T, PhasorError>;

/// Unified error type for all analyzer operations.
#[derive(Error, Debug)]
pub enum PhasorError {
    // ============ Netlist Parsing Errors ============
    /// Malformed line (wrong field count, stray token)
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// A field that could not be converted to its expected type
    #[error("Invalid field '{field}' for component '{name}' at line {line}: {message}")]
    InvalidField {
        name: String,
        line: usize,
        field: String,
        message: String,
    },

    /// Unknown component type
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    /// Duplicate component name
    #[error("Duplicate component name '{name}' at line {line}")]
    DuplicateComponent { name: String, line: usize },

    // ============ Circuit Errors ============
    /// No independent source carries a frequency
    #[error("Circuit has no frequency (add an independent V or I source)")]
    MissingFrequency,

    /// Two independent sources disagree on the analysis frequency
    #[error("Source '{component}' runs at {found} Hz but the circuit frequency is {expected} Hz")]
    ConflictingFrequency {
        component: String,
        expected: f64,
        found: f64,
    },

    /// Current-controlled source names something that is not a voltage-defining component
    #[error("Component '{component}' senses '{sensor}', which is not a voltage source (V, E or H)")]
    UnresolvedSensor { component: String, sensor: String },

    // ============ Solve Errors ============
    /// The system has no unique solution
    #[error("Singular matrix - circuit has no unique solution: {reason}")]
    SingularMatrix { reason: String },

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error serializing a result
    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error category, for translating errors at a service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    MissingFrequency,
    UnresolvedSensor,
    SingularMatrix,
    Io,
}

impl PhasorError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(
        name: impl Into<String>,
        line: usize,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            name: name.into(),
            line,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a singular matrix error
    pub fn singular(reason: impl Into<String>) -> Self {
        Self::SingularMatrix {
            reason: reason.into(),
        }
    }

    /// Category of this error.
    ///
    /// A conflicting frequency is reported as [`ErrorKind::MissingFrequency`]:
    /// in both cases the circuit does not define a single frequency.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ParseError { .. }
            | Self::InvalidField { .. }
            | Self::UnknownComponentType { .. }
            | Self::DuplicateComponent { .. } => ErrorKind::Parse,
            Self::MissingFrequency | Self::ConflictingFrequency { .. } => {
                ErrorKind::MissingFrequency
            }
            Self::UnresolvedSensor { .. } => ErrorKind::UnresolvedSensor,
            Self::SingularMatrix { .. } => ErrorKind::SingularMatrix,
            Self::FileReadError { .. } | Self::Serialization(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let err = PhasorError::parse(7, "expected 3 fields");
        assert_eq!(err.to_string(), "Parse error at line 7: expected 3 fields");
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_invalid_field_names_field() {
        let err = PhasorError::invalid_field("R1", 2, "value", "not a number: 'abc'");
        let msg = err.to_string();
        assert!(msg.contains("'value'"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(PhasorError::MissingFrequency.kind(), ErrorKind::MissingFrequency);
        assert_eq!(
            PhasorError::UnresolvedSensor {
                component: "F1".into(),
                sensor: "VX".into()
            }
            .kind(),
            ErrorKind::UnresolvedSensor
        );
        assert_eq!(PhasorError::singular("floating node").kind(), ErrorKind::SingularMatrix);
    }
}
