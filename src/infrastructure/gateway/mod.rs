pub mod http;
pub mod in_memory;

use crate::core::errors::SplitError;
use crate::core::models::{
    ApiCredentials, BillImage, DetectedItem, ExpenseReceipt, ExpenseRequest, ExpenseUpdateRequest, MemberDirectory,
    RemoteExpense, VoiceTranscript,
};
use crate::core::recorder::AudioClip;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The external expense, image-analysis and voice-processing backend.
#[async_trait]
pub trait ExpenseGateway: Send + Sync {
    async fn list_members(&self, credentials: &ApiCredentials) -> Result<MemberDirectory, SplitError>;
    async fn list_groups(&self, credentials: &ApiCredentials) -> Result<BTreeMap<String, i64>, SplitError>;
    async fn create_expense(
        &self,
        credentials: &ApiCredentials,
        request: &ExpenseRequest,
    ) -> Result<ExpenseReceipt, SplitError>;
    async fn update_expense(
        &self,
        credentials: &ApiCredentials,
        request: &ExpenseUpdateRequest,
    ) -> Result<ExpenseReceipt, SplitError>;
    async fn get_expense(&self, credentials: &ApiCredentials, expense_id: &str) -> Result<RemoteExpense, SplitError>;
    async fn analyze_bills(&self, images: Vec<BillImage>, analysis_key: &str) -> Result<Vec<DetectedItem>, SplitError>;
    async fn process_voice(&self, clip: AudioClip) -> Result<VoiceTranscript, SplitError>;
}

#[async_trait]
impl<T: ExpenseGateway + ?Sized> ExpenseGateway for Arc<T> {
    async fn list_members(&self, credentials: &ApiCredentials) -> Result<MemberDirectory, SplitError> {
        (**self).list_members(credentials).await
    }

    async fn list_groups(&self, credentials: &ApiCredentials) -> Result<BTreeMap<String, i64>, SplitError> {
        (**self).list_groups(credentials).await
    }

    async fn create_expense(
        &self,
        credentials: &ApiCredentials,
        request: &ExpenseRequest,
    ) -> Result<ExpenseReceipt, SplitError> {
        (**self).create_expense(credentials, request).await
    }

    async fn update_expense(
        &self,
        credentials: &ApiCredentials,
        request: &ExpenseUpdateRequest,
    ) -> Result<ExpenseReceipt, SplitError> {
        (**self).update_expense(credentials, request).await
    }

    async fn get_expense(&self, credentials: &ApiCredentials, expense_id: &str) -> Result<RemoteExpense, SplitError> {
        (**self).get_expense(credentials, expense_id).await
    }

    async fn analyze_bills(&self, images: Vec<BillImage>, analysis_key: &str) -> Result<Vec<DetectedItem>, SplitError> {
        (**self).analyze_bills(images, analysis_key).await
    }

    async fn process_voice(&self, clip: AudioClip) -> Result<VoiceTranscript, SplitError> {
        (**self).process_voice(clip).await
    }
}
