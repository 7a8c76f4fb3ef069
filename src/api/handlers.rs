use crate::{
    api::models::*,
    config::CONFIG,
    core::{
        calculator::calculate_splits,
        envelope::{self, CommentEnvelope},
        errors::SplitError,
        matcher::find_member,
        models::{BillImage, FinalSplit, audit::AppLog},
        recorder::RecorderStatus,
        services::{ExpensePreview, SessionView, SplitService, SubmissionOutcome, VoiceOutcome},
        session::SessionEvent,
    },
    infrastructure::{
        gateway::ExpenseGateway, logging::in_memory::InMemoryLogging, storage::in_memory::InMemorySessionStore,
    },
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use log::debug;
use std::sync::Arc;

pub type AppService = SplitService<Arc<dyn ExpenseGateway>, InMemoryLogging, InMemorySessionStore>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/splits/calculate", post(calculate))
        .route("/comments/encode", post(encode_comment))
        .route("/comments/decode", post(decode_comment))
        .route("/members/match", post(match_member))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/roster", post(load_roster))
        .route("/sessions/{id}/events", post(apply_event))
        .route("/sessions/{id}/summary", get(get_summary))
        .route("/sessions/{id}/bills", post(analyze_bills))
        .route("/sessions/{id}/voice/start", post(start_recording))
        .route("/sessions/{id}/voice/pause", post(pause_recording))
        .route("/sessions/{id}/voice/resume", post(resume_recording))
        .route("/sessions/{id}/voice/chunks", post(push_audio_chunk))
        .route("/sessions/{id}/voice/stop", post(stop_recording))
        .route("/sessions/{id}/expense", post(submit_expense))
        .route("/sessions/{id}/expenses/{expense_id}", get(preview_expense))
        .route("/sessions/{id}/expenses/{expense_id}/load", post(load_expense))
        .route("/sessions/{id}/logs", get(get_session_logs))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/splits/calculate",
    request_body = CalculateSplitsRequest,
    responses(
        (status = 200, description = "Per-member split", body = FinalSplit)
    )
)]
async fn calculate(Json(req): Json<CalculateSplitsRequest>) -> Json<FinalSplit> {
    Json(calculate_splits(&req.items, &req.members))
}

#[utoipa::path(
    post,
    path = "/api/comments/encode",
    request_body = EncodeCommentRequest,
    responses(
        (status = 200, description = "Comment with embedded item data", body = EncodeCommentResponse),
        (status = 400, description = "Items cannot be serialized", body = ErrorResponse)
    )
)]
async fn encode_comment(Json(req): Json<EncodeCommentRequest>) -> Result<Json<EncodeCommentResponse>, ApiError> {
    let comment = envelope::encode(&req.note, &req.items)?;
    Ok(Json(EncodeCommentResponse { comment }))
}

#[utoipa::path(
    post,
    path = "/api/comments/decode",
    request_body = DecodeCommentRequest,
    responses(
        (status = 200, description = "Note and items recovered from a comment", body = CommentEnvelope)
    )
)]
async fn decode_comment(Json(req): Json<DecodeCommentRequest>) -> Json<CommentEnvelope> {
    Json(envelope::decode(&req.comment))
}

#[utoipa::path(
    post,
    path = "/api/members/match",
    request_body = MatchMemberRequest,
    responses(
        (status = 200, description = "Best roster match, if any", body = MatchMemberResponse)
    )
)]
async fn match_member(Json(req): Json<MatchMemberRequest>) -> Json<MatchMemberResponse> {
    Json(MatchMemberResponse {
        matched: find_member(&req.name, &req.members),
    })
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created with roster loaded", body = SessionView),
        (status = 502, description = "Roster could not be fetched", body = ErrorResponse)
    )
)]
async fn create_session(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let credentials = req.credentials.unwrap_or_else(|| CONFIG.default_credentials());
    let session = service.open_session(credentials).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
async fn get_session(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(service.get_session(&id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
async fn delete_session(State(service): State<Arc<AppService>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    service.delete_session(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/roster",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Members and groups reloaded", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Remote service failed", body = ErrorResponse)
    )
)]
async fn load_roster(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(service.load_roster(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/events",
    params(("id" = String, Path, description = "Session id")),
    request_body = SessionEvent,
    responses(
        (status = 200, description = "Event applied", body = SessionView),
        (status = 400, description = "Event rejected", body = ErrorResponse),
        (status = 404, description = "Session or item not found", body = ErrorResponse)
    )
)]
async fn apply_event(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
    Json(event): Json<SessionEvent>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(service.apply_event(&id, event).await?))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/summary",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Split computed from the current items", body = FinalSplit),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
async fn get_summary(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<FinalSplit>, ApiError> {
    Ok(Json(service.summary(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/bills",
    params(("id" = String, Path, description = "Session id")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "One or more `files` parts"),
    responses(
        (status = 200, description = "Detected items merged", body = SessionView),
        (status = 400, description = "No images supplied", body = ErrorResponse),
        (status = 422, description = "No items detected", body = ErrorResponse),
        (status = 502, description = "Remote service failed", body = ErrorResponse)
    )
)]
async fn analyze_bills(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, ApiError> {
    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SplitError::invalid_input("files", "Malformed upload", e.to_string()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("bill").to_string();
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| SplitError::invalid_input("files", "Malformed upload", e.to_string()))?;
        debug!("Received bill image {} ({} bytes)", file_name, data.len());
        images.push(BillImage {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }
    Ok(Json(service.analyze_bills(&id, images).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/voice/start",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Recording started", body = RecorderStatus),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
async fn start_recording(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<RecorderStatus>, ApiError> {
    Ok(Json(service.start_recording(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/voice/pause",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Recording paused", body = RecorderStatus),
        (status = 409, description = "Recorder is not recording", body = ErrorResponse)
    )
)]
async fn pause_recording(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<RecorderStatus>, ApiError> {
    Ok(Json(service.pause_recording(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/voice/resume",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Recording resumed", body = RecorderStatus),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
async fn resume_recording(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<RecorderStatus>, ApiError> {
    Ok(Json(service.resume_recording(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/voice/chunks",
    params(("id" = String, Path, description = "Session id")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Raw audio chunk"),
    responses(
        (status = 200, description = "Chunk buffered", body = RecorderStatus),
        (status = 409, description = "Recorder is not recording", body = ErrorResponse)
    )
)]
async fn push_audio_chunk(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<RecorderStatus>, ApiError> {
    Ok(Json(service.push_audio_chunk(&id, &body).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/voice/stop",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Recording transcribed and merged", body = VoiceOutcome),
        (status = 400, description = "Nothing was recorded", body = ErrorResponse),
        (status = 409, description = "Recorder is not running", body = ErrorResponse),
        (status = 502, description = "Remote service failed", body = ErrorResponse)
    )
)]
async fn stop_recording(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<VoiceOutcome>, ApiError> {
    Ok(Json(service.stop_and_process_voice(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/expense",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Expense created or updated", body = SubmissionOutcome),
        (status = 400, description = "Session is not ready to submit", body = ErrorResponse),
        (status = 502, description = "Remote service failed", body = ErrorResponse)
    )
)]
async fn submit_expense(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    Ok(Json(service.submit_expense(&id).await?))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/expenses/{expense_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("expense_id" = String, Path, description = "Remote expense id")
    ),
    responses(
        (status = 200, description = "Decoded expense", body = ExpensePreview),
        (status = 502, description = "Remote service failed", body = ErrorResponse)
    )
)]
async fn preview_expense(
    State(service): State<Arc<AppService>>,
    Path((id, expense_id)): Path<(String, String)>,
) -> Result<Json<ExpensePreview>, ApiError> {
    Ok(Json(service.preview_expense(&id, &expense_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/expenses/{expense_id}/load",
    params(
        ("id" = String, Path, description = "Session id"),
        ("expense_id" = String, Path, description = "Remote expense id")
    ),
    responses(
        (status = 200, description = "Expense loaded for editing", body = SessionView),
        (status = 502, description = "Remote service failed", body = ErrorResponse)
    )
)]
async fn load_expense(
    State(service): State<Arc<AppService>>,
    Path((id, expense_id)): Path<(String, String)>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(service.load_expense(&id, &expense_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Audit log", body = Vec<AppLog>)
    )
)]
async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/logs",
    params(
        ("id" = String, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Audit entries recorded for the session", body = Vec<AppLog>)
    )
)]
async fn get_session_logs(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_session_logs(&id).await?))
}
