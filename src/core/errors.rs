use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum SplitError {
    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Submission attempted before a split snapshot exists
    #[error("Splits have not been calculated")]
    SplitsNotCalculated,

    /// Update attempted without the id of the expense being edited
    #[error("No expense id for update")]
    MissingExpenseId,

    #[error("No payer selected")]
    NoPayerSelected,

    #[error("No group selected")]
    NoGroupSelected,

    #[error("Item {0} not found")]
    ItemNotFound(usize),

    #[error("Member {0} is not known")]
    UnknownMember(String),

    #[error("At least one bill image is required")]
    NoBillImages,

    #[error("No items detected")]
    NoItemsDetected,

    #[error("No audio recorded")]
    NoAudioRecorded,

    #[error("Cannot {action} while recorder is {state}")]
    InvalidRecorderTransition { state: String, action: String },

    #[error("Session {0} not found")]
    SessionNotFound(String),

    /// The external service answered with a non-success status
    #[error("Remote service returned {0}: {1}")]
    RemoteStatus(u16, String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response from remote service: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl SplitError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        SplitError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }
}
