use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock, Semaphore};

use super::ExpenseGateway;
use crate::core::errors::SplitError;
use crate::core::models::{
    ApiCredentials, BillImage, DetectedItem, ExpenseReceipt, ExpenseRequest, ExpenseUpdateRequest, MemberDirectory,
    RemoteExpense, RemoteExpenseUser, VoiceTranscript,
};
use crate::core::recorder::AudioClip;

#[derive(Default)]
struct Backend {
    directory: MemberDirectory,
    groups: BTreeMap<String, i64>,
    expenses: BTreeMap<String, RemoteExpense>,
    next_expense_id: u64,
    detected_items: Vec<DetectedItem>,
    voice: VoiceTranscript,
    failure: Option<(u16, String)>,
    received_images: usize,
    received_audio: Vec<AudioClip>,
    gate: Option<Arc<CallGate>>,
}

/// Holds bill analysis and voice processing calls until released, one call
/// per release.
pub struct CallGate {
    entered: Notify,
    release: Semaphore,
}

impl CallGate {
    fn new() -> Self {
        CallGate {
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    /// Resolves once a call is waiting at the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
    }
}

/// Stand-in for the external backend; expenses are kept in memory and users'
/// shares are derived the same way the real service derives them.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    backend: Arc<RwLock<Backend>>,
}

impl InMemoryGateway {
    pub fn new(directory: MemberDirectory, groups: BTreeMap<String, i64>) -> Self {
        InMemoryGateway {
            backend: Arc::new(RwLock::new(Backend {
                directory,
                groups,
                next_expense_id: 1,
                ..Backend::default()
            })),
        }
    }

    pub async fn set_detected_items(&self, items: Vec<DetectedItem>) {
        self.backend.write().await.detected_items = items;
    }

    pub async fn set_voice_transcript(&self, transcript: VoiceTranscript) {
        self.backend.write().await.voice = transcript;
    }

    /// Makes every following call fail with the given status until cleared.
    pub async fn fail_with(&self, status: u16, message: &str) {
        self.backend.write().await.failure = Some((status, message.to_string()));
    }

    pub async fn clear_failure(&self) {
        self.backend.write().await.failure = None;
    }

    pub async fn hold_calls(&self) -> Arc<CallGate> {
        let gate = Arc::new(CallGate::new());
        self.backend.write().await.gate = Some(gate.clone());
        gate
    }

    async fn wait_at_gate(&self) {
        let gate = self.backend.read().await.gate.clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
    }

    pub async fn insert_expense(&self, expense_id: &str, expense: RemoteExpense) {
        self.backend.write().await.expenses.insert(expense_id.to_string(), expense);
    }

    pub async fn expense(&self, expense_id: &str) -> Option<RemoteExpense> {
        self.backend.read().await.expenses.get(expense_id).cloned()
    }

    pub async fn expense_count(&self) -> usize {
        self.backend.read().await.expenses.len()
    }

    pub async fn received_images(&self) -> usize {
        self.backend.read().await.received_images
    }

    pub async fn received_audio(&self) -> Vec<AudioClip> {
        self.backend.read().await.received_audio.clone()
    }

    async fn check(&self) -> Result<(), SplitError> {
        match &self.backend.read().await.failure {
            Some((status, message)) => Err(SplitError::RemoteStatus(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn record(backend: &Backend, request: &ExpenseRequest) -> Result<RemoteExpense, SplitError> {
        if !backend.groups.contains_key(&request.group_id) {
            return Err(SplitError::RemoteStatus(400, format!("Unknown group {}", request.group_id)));
        }
        let users = request
            .shares()
            .into_iter()
            .map(|share| {
                if !backend.directory.members.contains(&share.member) {
                    return Err(SplitError::RemoteStatus(400, format!("Unknown member {}", share.member)));
                }
                Ok(RemoteExpenseUser {
                    first_name: share.member,
                    paid_share: format!("{:.2}", share.paid_share),
                    owed_share: format!("{:.2}", share.owed_share),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RemoteExpense {
            description: request.description.clone(),
            cost: format!("{:.2}", request.total_amt),
            comment: Some(request.comment.clone()),
            group_name: Some(request.group_id.clone()),
            users,
        })
    }
}

#[async_trait]
impl ExpenseGateway for InMemoryGateway {
    async fn list_members(&self, _credentials: &ApiCredentials) -> Result<MemberDirectory, SplitError> {
        self.check().await?;
        Ok(self.backend.read().await.directory.clone())
    }

    async fn list_groups(&self, _credentials: &ApiCredentials) -> Result<BTreeMap<String, i64>, SplitError> {
        self.check().await?;
        Ok(self.backend.read().await.groups.clone())
    }

    async fn create_expense(
        &self,
        _credentials: &ApiCredentials,
        request: &ExpenseRequest,
    ) -> Result<ExpenseReceipt, SplitError> {
        self.check().await?;
        let mut backend = self.backend.write().await;
        let expense = Self::record(&backend, request)?;
        let expense_id = backend.next_expense_id.to_string();
        backend.next_expense_id += 1;
        backend.expenses.insert(expense_id.clone(), expense.clone());
        Ok(ExpenseReceipt {
            status: "success".to_string(),
            expense: json!({ "id": expense_id, "cost": expense.cost, "description": expense.description }),
        })
    }

    async fn update_expense(
        &self,
        _credentials: &ApiCredentials,
        request: &ExpenseUpdateRequest,
    ) -> Result<ExpenseReceipt, SplitError> {
        self.check().await?;
        let mut backend = self.backend.write().await;
        if !backend.expenses.contains_key(&request.expense_id) {
            return Err(SplitError::RemoteStatus(404, format!("Expense {} not found", request.expense_id)));
        }
        let expense = Self::record(&backend, &request.expense)?;
        backend.expenses.insert(request.expense_id.clone(), expense.clone());
        Ok(ExpenseReceipt {
            status: "success".to_string(),
            expense: json!({ "id": request.expense_id, "cost": expense.cost, "description": expense.description }),
        })
    }

    async fn get_expense(&self, _credentials: &ApiCredentials, expense_id: &str) -> Result<RemoteExpense, SplitError> {
        self.check().await?;
        self.backend
            .read()
            .await
            .expenses
            .get(expense_id)
            .cloned()
            .ok_or_else(|| SplitError::RemoteStatus(404, format!("Expense {} not found", expense_id)))
    }

    async fn analyze_bills(&self, images: Vec<BillImage>, _analysis_key: &str) -> Result<Vec<DetectedItem>, SplitError> {
        self.wait_at_gate().await;
        self.check().await?;
        let mut backend = self.backend.write().await;
        backend.received_images += images.len();
        Ok(backend.detected_items.clone())
    }

    async fn process_voice(&self, clip: AudioClip) -> Result<VoiceTranscript, SplitError> {
        self.wait_at_gate().await;
        self.check().await?;
        let mut backend = self.backend.write().await;
        backend.received_audio.push(clip);
        Ok(backend.voice.clone())
    }
}
