//! Error handling for GarageLayout
//!
//! Provides the error types shared by the layout engine crates:
//! - Layout errors (geometry generation, invalid parameters)
//! - Lookup errors (missing garages, levels, elements)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Layout error type
///
/// Raised by the geometry side of the engine: auto-layout generation,
/// element construction, and site lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The canvas cannot fit a single spot per row
    #[error("Canvas width {width} is too narrow for auto-layout (usable width {usable})")]
    CanvasTooNarrow {
        /// The requested canvas width.
        width: f64,
        /// The width left after margins and curve space.
        usable: f64,
    },

    /// EV and ADA counts exceed the total spot count
    #[error("Spot counts are inconsistent: {ev} EV + {ada} ADA > {total} total")]
    InconsistentSpotCounts {
        /// Total spot count.
        total: u32,
        /// EV spot count.
        ev: u32,
        /// ADA spot count.
        ada: u32,
    },

    /// A garage id did not resolve
    #[error("Garage not found: {0}")]
    GarageNotFound(String),

    /// A level id did not resolve within its garage
    #[error("Level not found: {0}")]
    LevelNotFound(String),

    /// An unknown element or device type tag
    #[error("Unknown type tag: {0}")]
    UnknownType(String),
}

/// Main error type for GarageLayout
///
/// A unified error type for the public APIs of the core crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a layout error
    pub fn is_layout_error(&self) -> bool {
        matches!(self, Error::Layout(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::CanvasTooNarrow {
            width: 200.0,
            usable: -80.0,
        };
        assert_eq!(
            err.to_string(),
            "Canvas width 200 is too narrow for auto-layout (usable width -80)"
        );

        let err = LayoutError::LevelNotFound("level-3".to_string());
        assert_eq!(err.to_string(), "Level not found: level-3");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = LayoutError::GarageNotFound("g1".to_string()).into();
        assert!(err.is_layout_error());
        assert_eq!(err.to_string(), "Garage not found: g1");

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
