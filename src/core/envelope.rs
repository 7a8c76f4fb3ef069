//! Round-trips an itemization through the expense service's free-text
//! comment field.
//!
//! Layout written by [`encode`]:
//!
//! ```text
//! {note}\n---ITEMDATA:{len}---\n{json}
//! ```
//!
//! `len` is the byte length of the compact JSON array that follows. Compact
//! JSON never contains a raw newline, so the last header whose declared length
//! matches the remaining bytes is always the real one, whatever the note says.
//! Comments written by older clients use a bare `---ITEMDATA---` marker and
//! are still decoded.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::SplitError;
use crate::core::models::{Item, MemberName};
use crate::core::price::clamp_price;

pub const LEGACY_MARKER: &str = "---ITEMDATA---";
const TAG_OPEN: &str = "\n---ITEMDATA:";
const TAG_CLOSE: &str = "---\n";

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EnvelopeItem {
    pub name: String,
    pub price: f64,
    pub members: Vec<String>,
}

impl EnvelopeItem {
    pub fn from_item(item: &Item, roster: &[MemberName]) -> Self {
        EnvelopeItem {
            name: item.name.clone(),
            price: item.price,
            members: item.assigned_members(roster),
        }
    }

    /// Rebuilds an editable item; names outside the roster are dropped.
    pub fn to_item(&self, roster: &[MemberName]) -> Item {
        let mut item = Item::new(self.name.clone(), self.price, roster);
        for member in self.members.iter().filter(|m| roster.contains(m)) {
            item.members.insert(member.clone(), true);
        }
        item
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct CommentEnvelope {
    pub note: String,
    pub items: Vec<EnvelopeItem>,
}

pub fn encode(note: &str, items: &[EnvelopeItem]) -> Result<String, SplitError> {
    if let Some(bad) = items.iter().find(|i| !i.price.is_finite() || i.price < 0.0) {
        return Err(SplitError::invalid_input(
            "price",
            "Invalid Amount",
            format!("Price of {} must be a non-negative number", bad.name),
        ));
    }
    let json = serde_json::to_string(items)
        .map_err(|e| SplitError::InternalServerError(format!("Failed to serialize items: {}", e)))?;
    Ok(format!("{}{}{}{}{}", note, TAG_OPEN, json.len(), TAG_CLOSE, json))
}

/// Never fails: whatever cannot be parsed degrades to "no itemization".
pub fn decode(comment: &str) -> CommentEnvelope {
    if let Some(envelope) = decode_tagged(comment) {
        return envelope;
    }
    if let Some(envelope) = decode_legacy(comment) {
        return envelope;
    }
    CommentEnvelope {
        note: comment.to_string(),
        items: Vec::new(),
    }
}

fn decode_tagged(comment: &str) -> Option<CommentEnvelope> {
    for (start, _) in comment.rmatch_indices(TAG_OPEN) {
        let header = &comment[start + TAG_OPEN.len()..];
        let Some(close) = header.find(TAG_CLOSE) else {
            continue;
        };
        let Ok(len) = header[..close].parse::<usize>() else {
            continue;
        };
        let payload = &header[close + TAG_CLOSE.len()..];
        if payload.len() != len {
            continue;
        }
        return Some(CommentEnvelope {
            note: comment[..start].to_string(),
            items: parse_items(payload),
        });
    }
    None
}

fn decode_legacy(comment: &str) -> Option<CommentEnvelope> {
    let mut parts = comment.split(LEGACY_MARKER);
    let note = parts.next()?;
    let payload = parts.next()?;
    let note = note.strip_suffix('\n').unwrap_or(note);
    Some(CommentEnvelope {
        note: note.to_string(),
        items: parse_items(payload.trim()),
    })
}

fn parse_items(payload: &str) -> Vec<EnvelopeItem> {
    match serde_json::from_str::<Vec<EnvelopeItem>>(payload) {
        Ok(mut items) => {
            debug!("Decoded {} items from comment", items.len());
            for item in &mut items {
                item.price = clamp_price(item.price);
            }
            items
        }
        Err(e) => {
            warn!("Failed to parse item data in comment: {}", e);
            Vec::new()
        }
    }
}
