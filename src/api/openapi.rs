use utoipa::OpenApi;

use crate::{
    api::models::{
        CalculateSplitsRequest, CreateSessionRequest, DecodeCommentRequest, EncodeCommentRequest,
        EncodeCommentResponse, ErrorResponse, MatchMemberRequest, MatchMemberResponse,
    },
    core::{
        envelope::{CommentEnvelope, EnvelopeItem},
        matcher::{MatchTier, MemberMatch},
        models::{
            ApiCredentials, DetectedItem, ExpenseReceipt, FinalSplit, Item, ItemizedSplit, LoadedExpense,
            MemberDirectory, MemberSplit, RawPrice, RemoteExpenseUser, audit::AppLog,
        },
        recorder::{RecorderState, RecorderStatus},
        services::{ExpensePreview, SessionView, SubmissionOutcome, VoiceOutcome},
        session::{EditMode, SessionEvent, SessionState},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::calculate,
        super::handlers::encode_comment,
        super::handlers::decode_comment,
        super::handlers::match_member,
        super::handlers::create_session,
        super::handlers::get_session,
        super::handlers::delete_session,
        super::handlers::load_roster,
        super::handlers::apply_event,
        super::handlers::get_summary,
        super::handlers::analyze_bills,
        super::handlers::start_recording,
        super::handlers::pause_recording,
        super::handlers::resume_recording,
        super::handlers::push_audio_chunk,
        super::handlers::stop_recording,
        super::handlers::submit_expense,
        super::handlers::preview_expense,
        super::handlers::load_expense,
        super::handlers::get_session_logs,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CalculateSplitsRequest,
        EncodeCommentRequest,
        EncodeCommentResponse,
        DecodeCommentRequest,
        MatchMemberRequest,
        MatchMemberResponse,
        CreateSessionRequest,
        ErrorResponse,
        ApiCredentials,
        Item,
        DetectedItem,
        RawPrice,
        MemberDirectory,
        FinalSplit,
        MemberSplit,
        ItemizedSplit,
        CommentEnvelope,
        EnvelopeItem,
        MatchTier,
        MemberMatch,
        LoadedExpense,
        ExpenseReceipt,
        RemoteExpenseUser,
        RecorderState,
        RecorderStatus,
        EditMode,
        SessionEvent,
        SessionState,
        SessionView,
        VoiceOutcome,
        SubmissionOutcome,
        ExpensePreview,
        AppLog
    )),
    info(
        title = "Itemsplit API",
        description = "API for splitting itemized bills and syncing them to a shared expense service",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
