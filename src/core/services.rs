use crate::constants::{
    BILLS_ANALYZED, DEFAULT_NOTE, EVENT_APPLIED, EXPENSE_CREATED, EXPENSE_LOADED, EXPENSE_UPDATED, RECORDING_STARTED,
    ROSTER_LOADED, SESSION_CREATED, SESSION_DELETED, VOICE_PROCESSED,
};
use crate::core::envelope::{self, EnvelopeItem};
use crate::core::errors::SplitError;
use crate::core::models::{
    ApiCredentials, BillImage, ExpenseReceipt, ExpenseRequest, ExpenseUpdateRequest, FinalSplit, LoadedExpense,
    RemoteExpenseUser, audit::AppLog,
};
use crate::core::recorder::{AudioRecorder, RecorderStatus};
use crate::core::session::{EditMode, SessionEvent, SessionState, reduce};
use crate::infrastructure::gateway::ExpenseGateway;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::{SessionRecord, SessionStore};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct SessionView {
    pub id: String,
    pub state: SessionState,
    pub hidden_members_with_splits: Vec<String>,
    pub recorder: RecorderStatus,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionRecord> for SessionView {
    fn from(record: &SessionRecord) -> Self {
        SessionView {
            id: record.id.clone(),
            hidden_members_with_splits: record.state.hidden_members_with_splits(),
            state: record.state.clone(),
            recorder: record.recorder.status(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct VoiceOutcome {
    pub transcript: String,
    pub items_added: usize,
    pub session: SessionView,
}

#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct SubmissionOutcome {
    pub updated: bool,
    pub receipt: ExpenseReceipt,
    pub session: SessionView,
}

#[derive(Serialize, Debug, ToSchema, Clone)]
pub struct ExpensePreview {
    pub cost: String,
    pub users: Vec<RemoteExpenseUser>,
    pub expense: LoadedExpense,
}

pub struct SplitService<G: ExpenseGateway, L: LoggingService, S: SessionStore> {
    gateway: G,
    logging: L,
    store: S,
}

impl<G: ExpenseGateway, L: LoggingService, S: SessionStore> SplitService<G, L, S> {
    pub fn new(gateway: G, logging: L, store: S) -> Self {
        SplitService { gateway, logging, store }
    }

    async fn audit(&self, action: &str, details: serde_json::Value, session_id: Option<&str>) -> Result<(), SplitError> {
        self.logging.log_action(action, details, session_id).await
    }

    async fn fetch(&self, session_id: &str) -> Result<SessionRecord, SplitError> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or_else(|| SplitError::SessionNotFound(session_id.to_string()))
    }

    async fn commit(&self, mut record: SessionRecord, state: SessionState) -> Result<SessionRecord, SplitError> {
        record.state = state;
        record.updated_at = Utc::now();
        self.store.save_session(record.clone()).await?;
        Ok(record)
    }

    // SESSIONS

    pub async fn create_session(&self, credentials: ApiCredentials) -> Result<SessionView, SplitError> {
        let now = Utc::now();
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            credentials,
            state: SessionState::new(),
            recorder: AudioRecorder::new(),
            created_at: now,
            updated_at: now,
        };
        self.store.save_session(record.clone()).await?;
        info!("Created session {}", record.id);
        self.audit(SESSION_CREATED, json!({ "session_id": record.id }), Some(&record.id))
            .await?;
        Ok(SessionView::from(&record))
    }

    /// Creates a session and fills its roster; the session is discarded if the
    /// roster cannot be fetched.
    pub async fn open_session(&self, credentials: ApiCredentials) -> Result<SessionView, SplitError> {
        let session = self.create_session(credentials).await?;
        match self.load_roster(&session.id).await {
            Ok(view) => Ok(view),
            Err(e) => {
                warn!("Roster load failed for new session {}: {}", session.id, e);
                self.store.delete_session(&session.id).await?;
                Err(e)
            }
        }
    }

    pub async fn session_count(&self) -> Result<usize, SplitError> {
        self.store.session_count().await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionView, SplitError> {
        Ok(SessionView::from(&self.fetch(session_id).await?))
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), SplitError> {
        if !self.store.delete_session(session_id).await? {
            return Err(SplitError::SessionNotFound(session_id.to_string()));
        }
        self.audit(SESSION_DELETED, json!({ "session_id": session_id }), Some(session_id))
            .await
    }

    pub async fn load_roster(&self, session_id: &str) -> Result<SessionView, SplitError> {
        let record = self.fetch(session_id).await?;
        let directory = self.gateway.list_members(&record.credentials).await?;
        let groups = self.gateway.list_groups(&record.credentials).await?;
        let member_count = directory.members.len();
        let group_count = groups.len();

        let state = reduce(&record.state, SessionEvent::MembersLoaded { directory })?;
        let state = reduce(&state, SessionEvent::GroupsLoaded { groups })?;
        let record = self.commit(record, state).await?;

        self.audit(
            ROSTER_LOADED,
            json!({ "members": member_count, "groups": group_count }),
            Some(session_id),
        )
        .await?;
        Ok(SessionView::from(&record))
    }

    pub async fn apply_event(&self, session_id: &str, event: SessionEvent) -> Result<SessionView, SplitError> {
        let record = self.fetch(session_id).await?;
        let name = event.name();
        let state = reduce(&record.state, event)?;
        let record = self.commit(record, state).await?;
        self.audit(EVENT_APPLIED, json!({ "event": name }), Some(session_id))
            .await?;
        Ok(SessionView::from(&record))
    }

    pub async fn summary(&self, session_id: &str) -> Result<FinalSplit, SplitError> {
        Ok(self.fetch(session_id).await?.state.summary())
    }

    pub async fn hidden_members_with_splits(&self, session_id: &str) -> Result<Vec<String>, SplitError> {
        Ok(self.fetch(session_id).await?.state.hidden_members_with_splits())
    }

    // CAPTURE

    pub async fn analyze_bills(&self, session_id: &str, images: Vec<BillImage>) -> Result<SessionView, SplitError> {
        if images.is_empty() {
            return Err(SplitError::NoBillImages);
        }
        let credentials = self.fetch(session_id).await?.credentials;
        let image_count = images.len();
        let items = self.gateway.analyze_bills(images, &credentials.analysis_key).await?;
        if items.is_empty() {
            return Err(SplitError::NoItemsDetected);
        }
        let item_count = items.len();
        // Events may have landed while the analysis ran.
        let record = self.fetch(session_id).await?;
        let state = reduce(&record.state, SessionEvent::ItemsDetected { items })?;
        let record = self.commit(record, state).await?;

        self.audit(
            BILLS_ANALYZED,
            json!({ "images": image_count, "items": item_count }),
            Some(session_id),
        )
        .await?;
        Ok(SessionView::from(&record))
    }

    async fn with_recorder<F>(&self, session_id: &str, op: F) -> Result<RecorderStatus, SplitError>
    where
        F: FnOnce(&mut AudioRecorder) -> Result<(), SplitError> + Send,
    {
        let mut record = self.fetch(session_id).await?;
        op(&mut record.recorder)?;
        debug!("Recorder for session {} is {}", session_id, record.recorder.state());
        record.updated_at = Utc::now();
        let status = record.recorder.status();
        self.store.save_session(record).await?;
        Ok(status)
    }

    pub async fn start_recording(&self, session_id: &str) -> Result<RecorderStatus, SplitError> {
        let status = self
            .with_recorder(session_id, |recorder| {
                recorder.start();
                Ok(())
            })
            .await?;
        self.audit(RECORDING_STARTED, json!({}), Some(session_id)).await?;
        Ok(status)
    }

    pub async fn pause_recording(&self, session_id: &str) -> Result<RecorderStatus, SplitError> {
        self.with_recorder(session_id, |recorder| recorder.pause()).await
    }

    pub async fn resume_recording(&self, session_id: &str) -> Result<RecorderStatus, SplitError> {
        self.with_recorder(session_id, |recorder| {
            recorder.resume();
            Ok(())
        })
        .await
    }

    pub async fn push_audio_chunk(&self, session_id: &str, chunk: &[u8]) -> Result<RecorderStatus, SplitError> {
        self.with_recorder(session_id, |recorder| recorder.push_chunk(chunk))
            .await
    }

    /// Stops the recorder and sends the clip for transcription. The recorder
    /// is stopped even when processing fails; the items are left untouched.
    pub async fn stop_and_process_voice(&self, session_id: &str) -> Result<VoiceOutcome, SplitError> {
        let mut record = self.fetch(session_id).await?;
        let clip = record.recorder.stop();
        record.updated_at = Utc::now();
        self.store.save_session(record).await?;
        let clip = clip?;

        let transcript = self.gateway.process_voice(clip).await?;
        let items_added = transcript.items.iter().filter(|i| !i.name.trim().is_empty()).count();
        let record = self.fetch(session_id).await?;
        let record = if transcript.items.is_empty() {
            info!("Voice transcript for session {} contained no items", session_id);
            record
        } else {
            let state = reduce(
                &record.state,
                SessionEvent::VoiceItemsProcessed {
                    items: transcript.items.clone(),
                },
            )?;
            self.commit(record, state).await?
        };

        self.audit(
            VOICE_PROCESSED,
            json!({ "items": items_added, "unresolved": record.state.unresolved_names }),
            Some(session_id),
        )
        .await?;
        Ok(VoiceOutcome {
            transcript: transcript.transcript,
            items_added,
            session: SessionView::from(&record),
        })
    }

    // SUBMISSION

    /// Builds the payload for the current snapshot without sending it.
    pub fn build_request(state: &SessionState) -> Result<ExpenseRequest, SplitError> {
        let split = state.final_split.as_ref().ok_or(SplitError::SplitsNotCalculated)?;
        let paid_user = state.paid_user.clone().ok_or(SplitError::NoPayerSelected)?;
        let group = state.selected_group.clone().ok_or(SplitError::NoGroupSelected)?;

        let items: Vec<EnvelopeItem> = state
            .items
            .iter()
            .map(|item| EnvelopeItem::from_item(item, &state.all_members))
            .collect();
        let note = if state.comment.is_empty() {
            DEFAULT_NOTE
        } else {
            state.comment.as_str()
        };

        Ok(ExpenseRequest {
            splits: split.splits(),
            paid_user,
            total_amt: split.total_bill,
            group_id: group,
            description: state.description.clone(),
            comment: envelope::encode(note, &items)?,
        })
    }

    pub async fn submit_expense(&self, session_id: &str) -> Result<SubmissionOutcome, SplitError> {
        let record = self.fetch(session_id).await?;
        let request = Self::build_request(&record.state)?;
        if let Some(split) = &record.state.final_split {
            if !split.is_balanced() {
                warn!(
                    "Split totals differ from bill by {:.2} (unassigned {:.2})",
                    split.discrepancy(),
                    split.unassigned_total
                );
            }
        }

        let (receipt, updated) = match &record.state.mode {
            EditMode::Create => (self.gateway.create_expense(&record.credentials, &request).await?, false),
            EditMode::Update { expense_id } => {
                let update = ExpenseUpdateRequest {
                    expense_id: expense_id.clone(),
                    expense: request.clone(),
                };
                (self.gateway.update_expense(&record.credentials, &update).await?, true)
            }
        };

        let state = reduce(&record.state, SessionEvent::ExpenseSubmitted)?;
        let record = self.commit(record, state).await?;
        self.audit(
            if updated { EXPENSE_UPDATED } else { EXPENSE_CREATED },
            json!({ "total": request.total_amt, "group": request.group_id, "payer": request.paid_user }),
            Some(session_id),
        )
        .await?;

        Ok(SubmissionOutcome {
            updated,
            receipt,
            session: SessionView::from(&record),
        })
    }

    pub async fn preview_expense(&self, session_id: &str, expense_id: &str) -> Result<ExpensePreview, SplitError> {
        if expense_id.trim().is_empty() {
            return Err(SplitError::MissingExpenseId);
        }
        let record = self.fetch(session_id).await?;
        let remote = self.gateway.get_expense(&record.credentials, expense_id).await?;
        let decoded = envelope::decode(remote.comment.as_deref().unwrap_or_default());

        Ok(ExpensePreview {
            expense: LoadedExpense {
                expense_id: Some(expense_id.to_string()),
                description: remote.description.clone(),
                note: decoded.note,
                group_name: remote.group_name.clone(),
                paid_user: remote.payer().map(String::from),
                members: remote.users.iter().map(|u| u.first_name.clone()).collect(),
                items: decoded.items,
            },
            cost: remote.cost,
            users: remote.users,
        })
    }

    /// Loads an existing expense into the session and switches to update mode.
    pub async fn load_expense(&self, session_id: &str, expense_id: &str) -> Result<SessionView, SplitError> {
        let preview = self.preview_expense(session_id, expense_id).await?;
        let item_count = preview.expense.items.len();
        let record = self.fetch(session_id).await?;
        let state = reduce(
            &record.state,
            SessionEvent::ExpenseLoaded {
                expense: preview.expense,
            },
        )?;
        let record = self.commit(record, state).await?;
        self.audit(
            EXPENSE_LOADED,
            json!({ "expense_id": expense_id, "items": item_count }),
            Some(session_id),
        )
        .await?;
        Ok(SessionView::from(&record))
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, SplitError> {
        self.logging.get_logs().await
    }

    /// Audit entries for one session; entries outlive the session itself.
    pub async fn get_session_logs(&self, session_id: &str) -> Result<Vec<AppLog>, SplitError> {
        self.logging.get_session_logs(session_id).await
    }
}
