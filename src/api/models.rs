use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::envelope::EnvelopeItem;
use crate::core::errors::SplitError;
use crate::core::matcher::MemberMatch;
use crate::core::models::{ApiCredentials, Item};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CalculateSplitsRequest {
    pub items: Vec<Item>,
    pub members: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct EncodeCommentRequest {
    #[serde(default)]
    pub note: String,
    pub items: Vec<EnvelopeItem>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct EncodeCommentResponse {
    pub comment: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DecodeCommentRequest {
    pub comment: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MatchMemberRequest {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MatchMemberResponse {
    pub matched: Option<MemberMatch>,
}

/// Omitted credentials fall back to the server's configured defaults.
#[derive(Deserialize, ToSchema, Default)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub credentials: Option<ApiCredentials>,
}

// Error response struct
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SplitError to implement IntoResponse
pub struct ApiError(pub SplitError);

impl From<SplitError> for ApiError {
    fn from(err: SplitError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            SplitError::InvalidInput(..)
            | SplitError::SplitsNotCalculated
            | SplitError::MissingExpenseId
            | SplitError::NoPayerSelected
            | SplitError::NoGroupSelected
            | SplitError::UnknownMember(_)
            | SplitError::NoBillImages
            | SplitError::NoAudioRecorded => StatusCode::BAD_REQUEST,
            SplitError::ItemNotFound(_) | SplitError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            SplitError::InvalidRecorderTransition { .. } => StatusCode::CONFLICT,
            SplitError::NoItemsDetected => StatusCode::UNPROCESSABLE_ENTITY,
            SplitError::RemoteStatus(..) | SplitError::NetworkError(_) | SplitError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            SplitError::StorageError(_) | SplitError::LoggingError(_) | SplitError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error = match &self.0 {
            SplitError::InvalidInput(_, detail) => format!("{}: {}", detail.title, detail.description),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
