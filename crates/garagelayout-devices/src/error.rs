//! Error types for the XML configuration codec.

use std::io;
use thiserror::Error;

/// Errors raised while reading or writing configuration documents.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The XML could not be tokenized.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing to the output buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document is well-formed but not the expected shape.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The root element is not one of the accepted names.
    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: String, found: String },

    /// The written bytes were not valid UTF-8.
    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for codec operations.
pub type XmlResult<T> = Result<T, XmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_error_display() {
        let err = XmlError::Malformed("unexpected end of document".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed document: unexpected end of document"
        );

        let err = XmlError::UnexpectedRoot {
            expected: "Devices".to_string(),
            found: "Cameras".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected root element <Cameras>, expected <Devices>"
        );
    }

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: XmlError = io_err.into();
        assert!(matches!(err, XmlError::Io(_)));
    }
}
