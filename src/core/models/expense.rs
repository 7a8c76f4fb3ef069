use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::item::DetectedItem;
use crate::core::envelope::EnvelopeItem;

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Opaque keys forwarded to the external services.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ApiCredentials {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub api_key: String,
    /// Key for the bill-image analysis endpoint
    #[serde(default)]
    pub analysis_key: String,
}

impl core::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("consumer_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("analysis_key", &"<redacted>")
            .finish()
    }
}

impl ApiCredentials {
    pub fn query(&self) -> [(&'static str, &str); 3] {
        [
            ("consumer_key", self.consumer_key.as_str()),
            ("secret_key", self.secret_key.as_str()),
            ("api_key", self.api_key.as_str()),
        ]
    }
}

/// Member roster as returned by the member listing endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MemberDirectory {
    pub members: Vec<String>,
    #[serde(default)]
    pub mem_to_id: BTreeMap<String, i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseRequest {
    pub splits: BTreeMap<String, f64>,
    pub paid_user: String,
    pub total_amt: f64,
    /// Group name; the expense service resolves it to an id.
    pub group_id: String,
    pub description: String,
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseUpdateRequest {
    pub expense_id: String,
    #[serde(flatten)]
    pub expense: ExpenseRequest,
}

/// One user's side of an expense as the expense service records it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseShare {
    pub member: String,
    pub paid_share: f64,
    pub owed_share: f64,
}

impl ExpenseRequest {
    /// Rounds to cents, folds the rounding difference into the payer's owed
    /// share, and drops members who owe nothing. The payer always comes first.
    pub fn shares(&self) -> Vec<ExpenseShare> {
        let total = round_cents(self.total_amt);
        let mut splits: BTreeMap<&str, f64> = self
            .splits
            .iter()
            .map(|(member, amount)| (member.as_str(), round_cents(*amount)))
            .collect();
        let rounding_difference = total - splits.values().sum::<f64>();
        if let Some(owed) = splits.get_mut(self.paid_user.as_str()) {
            *owed = round_cents(*owed + rounding_difference);
        }

        let mut shares = vec![ExpenseShare {
            member: self.paid_user.clone(),
            paid_share: total,
            owed_share: splits.get(self.paid_user.as_str()).copied().unwrap_or(0.0),
        }];
        shares.extend(
            splits
                .iter()
                .filter(|(member, amount)| **amount != 0.0 && **member != self.paid_user)
                .map(|(member, amount)| ExpenseShare {
                    member: member.to_string(),
                    paid_share: 0.0,
                    owed_share: *amount,
                }),
        );
        shares
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseReceipt {
    pub status: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub expense: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RemoteExpenseUser {
    pub first_name: String,
    #[serde(default)]
    pub paid_share: String,
    #[serde(default)]
    pub owed_share: String,
}

impl RemoteExpenseUser {
    pub fn paid(&self) -> f64 {
        self.paid_share.trim().parse().unwrap_or(0.0)
    }
}

/// An expense as returned by the get-expense endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RemoteExpense {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub users: Vec<RemoteExpenseUser>,
}

impl RemoteExpense {
    /// The first user with a positive paid share.
    pub fn payer(&self) -> Option<&str> {
        self.users.iter().find(|u| u.paid() > 0.0).map(|u| u.first_name.as_str())
    }
}

/// A stored expense decoded back into an editable itemization.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct LoadedExpense {
    pub expense_id: Option<String>,
    pub description: String,
    pub note: String,
    pub group_name: Option<String>,
    pub paid_user: Option<String>,
    pub members: Vec<String>,
    pub items: Vec<EnvelopeItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct VoiceTranscript {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub items: Vec<DetectedItem>,
}

/// A bill image uploaded for analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct BillImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
