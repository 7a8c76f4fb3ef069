use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;

use super::ExpenseGateway;
use crate::core::errors::SplitError;
use crate::core::models::{
    ApiCredentials, BillImage, DetectedItem, ExpenseReceipt, ExpenseRequest, ExpenseUpdateRequest, MemberDirectory,
    RemoteExpense, VoiceTranscript,
};
use crate::core::recorder::AudioClip;

const USER_AGENT: &str = concat!("itemsplit/", env!("CARGO_PKG_VERSION"));
const ANALYSIS_KEY_FIELD: &str = "gemini_key";

#[derive(Deserialize)]
struct GroupsResponse {
    groups: BTreeMap<String, i64>,
}

#[derive(Deserialize)]
struct ExpenseResponse {
    expense: RemoteExpense,
}

#[derive(Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<DetectedItem>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Talks to the expense backend over HTTP. Nothing is retried.
pub struct HttpExpenseGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpExpenseGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SplitError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SplitError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SplitError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorDetail>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            warn!("Expense backend returned {}: {}", status, message);
            return Err(SplitError::RemoteStatus(status.as_u16(), message));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| SplitError::InvalidResponse(e.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, SplitError> {
        request
            .send()
            .await
            .map_err(|e| SplitError::NetworkError(e.to_string()))
    }
}

#[async_trait]
impl ExpenseGateway for HttpExpenseGateway {
    async fn list_members(&self, credentials: &ApiCredentials) -> Result<MemberDirectory, SplitError> {
        debug!("Fetching members");
        let response = self
            .send(self.http_client.get(self.url("/api/members")).query(&credentials.query()))
            .await?;
        let directory: MemberDirectory = Self::read_json(response).await?;
        info!("Fetched {} members", directory.members.len());
        Ok(directory)
    }

    async fn list_groups(&self, credentials: &ApiCredentials) -> Result<BTreeMap<String, i64>, SplitError> {
        debug!("Fetching groups");
        let response = self
            .send(self.http_client.get(self.url("/api/groups")).query(&credentials.query()))
            .await?;
        let groups: GroupsResponse = Self::read_json(response).await?;
        Ok(groups.groups)
    }

    async fn create_expense(
        &self,
        credentials: &ApiCredentials,
        request: &ExpenseRequest,
    ) -> Result<ExpenseReceipt, SplitError> {
        info!("Creating expense '{}' for {:.2}", request.description, request.total_amt);
        let response = self
            .send(
                self.http_client
                    .post(self.url("/api/create-expense"))
                    .query(&credentials.query())
                    .json(request),
            )
            .await?;
        Self::read_json(response).await
    }

    async fn update_expense(
        &self,
        credentials: &ApiCredentials,
        request: &ExpenseUpdateRequest,
    ) -> Result<ExpenseReceipt, SplitError> {
        info!("Updating expense {}", request.expense_id);
        let response = self
            .send(
                self.http_client
                    .post(self.url("/api/update-expense"))
                    .query(&credentials.query())
                    .json(request),
            )
            .await?;
        Self::read_json(response).await
    }

    async fn get_expense(&self, credentials: &ApiCredentials, expense_id: &str) -> Result<RemoteExpense, SplitError> {
        debug!("Fetching expense {}", expense_id);
        let response = self
            .send(
                self.http_client
                    .get(self.url("/api/get-expense"))
                    .query(&[("expense_id", expense_id)])
                    .query(&credentials.query()),
            )
            .await?;
        let expense: ExpenseResponse = Self::read_json(response).await?;
        Ok(expense.expense)
    }

    async fn analyze_bills(&self, images: Vec<BillImage>, analysis_key: &str) -> Result<Vec<DetectedItem>, SplitError> {
        info!("Sending {} bill images for analysis", images.len());
        let mut form = Form::new().text(ANALYSIS_KEY_FIELD, analysis_key.to_string());
        for image in images {
            let part = Part::bytes(image.data)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|e| SplitError::invalid_input("files", "Invalid content type", e.to_string()))?;
            form = form.part("files", part);
        }
        let response = self
            .send(self.http_client.post(self.url("/api/analyze-bills")).multipart(form))
            .await?;
        let items: ItemsResponse = Self::read_json(response).await?;
        Ok(items.items)
    }

    async fn process_voice(&self, clip: AudioClip) -> Result<VoiceTranscript, SplitError> {
        info!("Sending {} bytes of audio for processing", clip.data.len());
        let part = Part::bytes(clip.data)
            .file_name(clip.file_name)
            .mime_str(&clip.mime_type)
            .map_err(|e| SplitError::InternalServerError(e.to_string()))?;
        let form = Form::new().part("audio", part);
        let response = self
            .send(self.http_client.post(self.url("/api/process-voice")).multipart(form))
            .await?;
        Self::read_json(response).await
    }
}
