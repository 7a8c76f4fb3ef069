use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::constants::SPLIT_TOLERANCE;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MemberSplit {
    pub member: String,
    /// Human-readable trace, e.g. `Pizza=$10.00, Soda=$4.00`
    pub item_splits: String,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ItemizedSplit {
    pub name: String,
    pub price: f64,
    pub split_price: f64,
    pub members: Vec<String>,
}

/// Snapshot of the split computed from the current item list.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct FinalSplit {
    pub total_bill: f64,
    pub members: Vec<MemberSplit>,
    pub itemized: Vec<ItemizedSplit>,
    /// Prices of items nobody is assigned to. Counted in the bill, owed by no one.
    pub unassigned_total: f64,
}

impl FinalSplit {
    pub fn splits(&self) -> BTreeMap<String, f64> {
        self.members.iter().map(|m| (m.member.clone(), m.total)).collect()
    }

    pub fn total_for(&self, member: &str) -> Option<f64> {
        self.members.iter().find(|m| m.member == member).map(|m| m.total)
    }

    pub fn members_total(&self) -> f64 {
        self.members.iter().map(|m| m.total).sum()
    }

    /// Bill total minus the sum of member totals.
    pub fn discrepancy(&self) -> f64 {
        self.total_bill - self.members_total()
    }

    pub fn is_balanced(&self) -> bool {
        self.discrepancy().abs() <= SPLIT_TOLERANCE
    }
}
