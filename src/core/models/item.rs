use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::core::price::{clamp_price, parse_price};

pub type MemberName = String;

/// A priced line item and the members it is split between.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Item {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub members: BTreeMap<String, bool>,
}

impl Item {
    /// An item with every roster member present and unassigned.
    pub fn new(name: impl Into<String>, price: f64, roster: &[MemberName]) -> Self {
        Item {
            name: name.into(),
            price: clamp_price(price),
            members: roster.iter().map(|m| (m.clone(), false)).collect(),
        }
    }

    pub fn placeholder(index: usize, roster: &[MemberName]) -> Self {
        Item::new(format!("Item {}", index), 0.0, roster)
    }

    pub fn is_assigned(&self, member: &str) -> bool {
        self.members.get(member).copied().unwrap_or(false)
    }

    pub fn assigned_count(&self) -> usize {
        self.members.values().filter(|&&selected| selected).count()
    }

    /// Assigned members in roster order, then any assigned names the roster
    /// does not know about.
    pub fn assigned_members(&self, roster: &[MemberName]) -> Vec<MemberName> {
        let mut assigned: Vec<MemberName> = roster.iter().filter(|m| self.is_assigned(m)).cloned().collect();
        assigned.extend(
            self.members
                .iter()
                .filter(|(name, selected)| **selected && !roster.contains(name))
                .map(|(name, _)| name.clone()),
        );
        assigned
    }

    /// The price as it counts toward a split. Items built from client JSON
    /// may carry a negative or non-finite price; those count as zero.
    pub fn amount(&self) -> f64 {
        clamp_price(self.price)
    }

    /// Price divided among assigned members; the full price when nobody is assigned.
    pub fn split_price(&self) -> f64 {
        self.amount() / self.assigned_count().max(1) as f64
    }

    /// Adds a `false` entry for every roster member the item has no entry for.
    pub fn cover_roster(&mut self, roster: &[MemberName]) {
        for member in roster {
            self.members.entry(member.clone()).or_insert(false);
        }
    }
}

/// Price as reported by image or voice analysis: either a JSON number or text.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(untagged)]
pub enum RawPrice {
    Amount(f64),
    Text(String),
}

impl RawPrice {
    pub fn amount(&self) -> f64 {
        match self {
            RawPrice::Amount(value) => clamp_price(*value),
            RawPrice::Text(text) => parse_price(text),
        }
    }
}

impl Default for RawPrice {
    fn default() -> Self {
        RawPrice::Amount(0.0)
    }
}

/// An item discovered by bill-image analysis or voice transcription.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DetectedItem {
    pub name: String,
    #[serde(default)]
    pub price: RawPrice,
    /// Member names as heard or read; not necessarily roster names.
    #[serde(default)]
    pub members: Vec<String>,
}
