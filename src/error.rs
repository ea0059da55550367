/// Error and status reporting for every operation in the suite
///
/// Operations propagate `SuiteError` internally with `?`. At the UI boundary
/// the result is collapsed into an `Outcome`: an optional output path plus a
/// human-readable status line prefixed with a success or failure marker.

use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

/// Marker prepended to successful status lines
pub const SUCCESS: &str = "✅";

/// Marker prepended to failed status lines
pub const FAILURE: &str = "❌";

/// Everything that can go wrong while processing a request
#[derive(Error, Debug)]
pub enum SuiteError {
    /// No input file was selected
    #[error("No input image provided")]
    MissingInput,

    /// Decoding, encoding or pixel-level failure from the image crate
    #[error("{0}")]
    Image(#[from] image::ImageError),

    /// File system failure
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("{0}")]
    Http(String),

    /// The remote service answered with a non-success status
    #[error("{body}")]
    Api { service: &'static str, body: String },

    /// A request needed an API key that nobody supplied
    #[error("{0} API key not provided")]
    MissingKey(&'static str),

    /// Requested format or service is not available
    #[error("{0}")]
    Unsupported(String),

    /// A numeric or textual parameter is out of range
    #[error("{0}")]
    InvalidParameter(String),

    /// Icon archive could not be written
    #[error("{0}")]
    Archive(#[from] zip::result::ZipError),

    /// Segmentation model load or inference failure
    #[error("{0}")]
    Model(String),

    /// The blocking worker could not be joined
    #[error("Task join error: {0}")]
    Task(String),
}

impl From<reqwest::Error> for SuiteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for SuiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Http(format!("Invalid response payload: {}", err))
    }
}

pub type SuiteResult<T> = Result<T, SuiteError>;

/// What the UI receives back from one click
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Path of the written file, if the operation produced one
    pub output: Option<PathBuf>,
    /// Status line shown next to the result
    pub status: String,
}

impl Outcome {
    pub fn success(output: PathBuf, message: impl AsRef<str>) -> Self {
        Self {
            output: Some(output),
            status: format!("{} {}", SUCCESS, message.as_ref()),
        }
    }

    /// Success that produced text only (e.g. an enhanced prompt)
    pub fn message(message: impl AsRef<str>) -> Self {
        Self {
            output: None,
            status: format!("{} {}", SUCCESS, message.as_ref()),
        }
    }

    pub fn failure(message: impl AsRef<str>) -> Self {
        Self {
            output: None,
            status: format!("{} {}", FAILURE, message.as_ref()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.starts_with(SUCCESS)
    }
}

/// Collapse an operation result into an `Outcome`
///
/// Missing keys and API errors keep their own wording; every other failure is
/// rendered as `<prefix>: <message>`.
pub fn report(prefix: &str, result: SuiteResult<(PathBuf, String)>) -> Outcome {
    match result {
        Ok((path, message)) => Outcome::success(path, message),
        Err(err) => {
            error!("{} failed: {}", prefix, err);
            Outcome::failure(describe(prefix, &err))
        }
    }
}

/// Failure text for an error, without the marker
pub fn describe(prefix: &str, err: &SuiteError) -> String {
    match err {
        SuiteError::MissingInput => "Please upload an image".to_string(),
        SuiteError::MissingKey(_) => err.to_string(),
        SuiteError::Api { service, body } => format!("{} API Error: {}", service, body),
        _ => format!("{}: {}", prefix, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_marker_and_path() {
        let outcome = report("Error", Ok((PathBuf::from("out.png"), "Converted to PNG".into())));
        assert_eq!(outcome.status, "✅ Converted to PNG");
        assert_eq!(outcome.output, Some(PathBuf::from("out.png")));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_failure_collapses_to_prefix() {
        let outcome = report(
            "Enhancement error",
            Err(SuiteError::InvalidParameter("bad intensity".into())),
        );
        assert_eq!(outcome.status, "❌ Enhancement error: bad intensity");
        assert!(outcome.output.is_none());
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_missing_input_and_key_wording() {
        let outcome = report("Filter error", Err(SuiteError::MissingInput));
        assert_eq!(outcome.status, "❌ Please upload an image");

        let outcome = report("Remove.bg error", Err(SuiteError::MissingKey("Remove.bg")));
        assert_eq!(outcome.status, "❌ Remove.bg API key not provided");
    }

    #[test]
    fn test_api_error_includes_body() {
        let err = SuiteError::Api {
            service: "OpenAI",
            body: "{\"error\":\"quota\"}".into(),
        };
        assert_eq!(describe("Error", &err), "OpenAI API Error: {\"error\":\"quota\"}");
    }
}
