//! Error types for parsing and simulating signal automata.

use thiserror::Error;

/// Result type alias for automaton operations.
pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Errors that can occur while parsing rules or generating diagrams.
#[derive(Debug, Error)]
pub enum AutomatonError {
    /// The rule text is malformed. `line` is 1-based.
    #[error("syntax error on line {line} at `{token}`: {message}")]
    Syntax {
        line: usize,
        token: String,
        message: String,
    },

    /// A literal referenced a position offset outside the neighborhood window.
    #[error("neighborhood offset {offset} outside window [{min}, {max}]")]
    Index { offset: i32, min: i32, max: i32 },

    /// A cell index does not exist in the configuration.
    #[error("cell index {index} out of range for configuration of {len} cells")]
    CellOutOfRange { index: usize, len: usize },

    /// Simulation settings were rejected.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Diagram serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (reading rule files).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AutomatonError {
    /// Build a syntax error for the given line and offending token.
    pub(crate) fn syntax(line: usize, token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            token: token.into(),
            message: message.into(),
        }
    }

    /// Check if this is a parse-time syntax error.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
