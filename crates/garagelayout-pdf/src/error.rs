//! Error types for PDF rendering.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The PDF backend rejected an operation.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The garage has no levels, so there is nothing to paginate.
    #[error("Garage '{0}' has no levels")]
    NoLevels(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(
            RenderError::NoLevels("North".into()).to_string(),
            "Garage 'North' has no levels"
        );
        let err: RenderError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.to_string(), "I/O error: denied");
    }
}
