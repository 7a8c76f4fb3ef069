//! Editing session state and the reducer that advances it.
//!
//! A [`SessionState`] is never mutated in place by callers: every change is a
//! [`SessionEvent`] passed to [`reduce`], which returns the next state or an
//! error and leaves the input untouched.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::constants::DEFAULT_ITEM_COUNT;
use crate::core::calculator::calculate_splits;
use crate::core::errors::SplitError;
use crate::core::matcher::find_member;
use crate::core::models::{DetectedItem, FinalSplit, Item, LoadedExpense, MemberDirectory, MemberName};
use crate::core::price::parse_price;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Create,
    Update {
        expense_id: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SessionState {
    pub all_members: Vec<String>,
    pub visible_members: Vec<String>,
    pub member_ids: BTreeMap<String, i64>,
    pub groups: BTreeMap<String, i64>,
    pub selected_group: Option<String>,
    pub paid_user: Option<String>,
    pub items: Vec<Item>,
    pub description: String,
    pub comment: String,
    pub mode: EditMode,
    pub final_split: Option<FinalSplit>,
    /// Names from the last voice batch that matched no roster member.
    pub unresolved_names: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            all_members: Vec::new(),
            visible_members: Vec::new(),
            member_ids: BTreeMap::new(),
            groups: BTreeMap::new(),
            selected_group: None,
            paid_user: None,
            items: default_items(&[]),
            description: String::new(),
            comment: String::new(),
            mode: EditMode::Create,
            final_split: None,
            unresolved_names: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    MembersLoaded { directory: MemberDirectory },
    GroupsLoaded { groups: BTreeMap<String, i64> },
    GroupSelected { group: String },
    PayerSelected { member: String },
    ItemAdded,
    ItemRemoved { index: usize },
    ItemRenamed { index: usize, name: String },
    /// Raw price text; expressions are evaluated, garbage becomes zero.
    ItemPriceEntered { index: usize, input: String },
    MemberToggled { index: usize, member: String },
    AllMembersToggled { index: usize },
    /// Items read from bill images.
    ItemsDetected { items: Vec<DetectedItem> },
    /// Items extracted from a voice transcript.
    VoiceItemsProcessed { items: Vec<DetectedItem> },
    MemberVisibilityToggled { member: String },
    HiddenMembersRevealed,
    DescriptionChanged { description: String },
    CommentChanged { comment: String },
    SplitsCalculated,
    ExpenseLoaded { expense: LoadedExpense },
    UpdateCancelled,
    ExpenseSubmitted,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::MembersLoaded { .. } => "members_loaded",
            SessionEvent::GroupsLoaded { .. } => "groups_loaded",
            SessionEvent::GroupSelected { .. } => "group_selected",
            SessionEvent::PayerSelected { .. } => "payer_selected",
            SessionEvent::ItemAdded => "item_added",
            SessionEvent::ItemRemoved { .. } => "item_removed",
            SessionEvent::ItemRenamed { .. } => "item_renamed",
            SessionEvent::ItemPriceEntered { .. } => "item_price_entered",
            SessionEvent::MemberToggled { .. } => "member_toggled",
            SessionEvent::AllMembersToggled { .. } => "all_members_toggled",
            SessionEvent::ItemsDetected { .. } => "items_detected",
            SessionEvent::VoiceItemsProcessed { .. } => "voice_items_processed",
            SessionEvent::MemberVisibilityToggled { .. } => "member_visibility_toggled",
            SessionEvent::HiddenMembersRevealed => "hidden_members_revealed",
            SessionEvent::DescriptionChanged { .. } => "description_changed",
            SessionEvent::CommentChanged { .. } => "comment_changed",
            SessionEvent::SplitsCalculated => "splits_calculated",
            SessionEvent::ExpenseLoaded { .. } => "expense_loaded",
            SessionEvent::UpdateCancelled => "update_cancelled",
            SessionEvent::ExpenseSubmitted => "expense_submitted",
        }
    }

    fn edits_items(&self) -> bool {
        matches!(
            self,
            SessionEvent::MembersLoaded { .. }
                | SessionEvent::ItemAdded
                | SessionEvent::ItemRemoved { .. }
                | SessionEvent::ItemRenamed { .. }
                | SessionEvent::ItemPriceEntered { .. }
                | SessionEvent::MemberToggled { .. }
                | SessionEvent::AllMembersToggled { .. }
                | SessionEvent::ItemsDetected { .. }
                | SessionEvent::VoiceItemsProcessed { .. }
        )
    }
}

fn default_items(roster: &[MemberName]) -> Vec<Item> {
    (1..=DEFAULT_ITEM_COUNT).map(|i| Item::placeholder(i, roster)).collect()
}

/// An untouched placeholder row: default name, no price, nobody assigned.
fn is_placeholder(item: &Item, index: usize) -> bool {
    item.price == 0.0 && item.assigned_count() == 0 && item.name == format!("Item {}", index + 1)
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, member: &str) -> bool {
        self.visible_members.iter().any(|m| m == member)
    }

    fn is_known(&self, member: &str) -> bool {
        self.all_members.iter().any(|m| m == member)
    }

    fn require_member(&self, member: &str) -> Result<(), SplitError> {
        if self.is_known(member) {
            Ok(())
        } else {
            Err(SplitError::UnknownMember(member.to_string()))
        }
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut Item, SplitError> {
        self.items.get_mut(index).ok_or(SplitError::ItemNotFound(index))
    }

    fn reveal(&mut self, member: &str) {
        if !self.is_visible(member) {
            self.visible_members.push(member.to_string());
        }
    }

    /// Hidden members that still carry at least one assignment, in roster order.
    pub fn hidden_members_with_splits(&self) -> Vec<MemberName> {
        self.all_members
            .iter()
            .filter(|m| !self.is_visible(m))
            .filter(|m| self.items.iter().any(|item| item.is_assigned(m)))
            .cloned()
            .collect()
    }

    /// A fresh split computed from the current items, regardless of snapshot.
    pub fn summary(&self) -> FinalSplit {
        calculate_splits(&self.items, &self.all_members)
    }

    fn load_members(&mut self, directory: MemberDirectory) {
        self.all_members = directory.members;
        self.visible_members = self.all_members.clone();
        self.member_ids = directory.mem_to_id;
        if !self.paid_user.as_deref().is_some_and(|p| self.is_known(p)) {
            self.paid_user = self.all_members.first().cloned();
        }
        let roster = self.all_members.clone();
        for item in &mut self.items {
            item.members.retain(|member, _| roster.contains(member));
            item.cover_roster(&roster);
        }
    }

    fn load_groups(&mut self, groups: BTreeMap<String, i64>) {
        self.groups = groups;
        if !self.selected_group.as_ref().is_some_and(|g| self.groups.contains_key(g)) {
            self.selected_group = self.groups.keys().next().cloned();
        }
    }

    fn toggle_all(&mut self, index: usize) -> Result<(), SplitError> {
        let item = self.item_mut(index)?;
        let all_selected = item.members.values().all(|&selected| selected);
        for selected in item.members.values_mut() {
            *selected = !all_selected;
        }
        Ok(())
    }

    /// Merges discovered items into the list. Untouched placeholder rows are
    /// dropped, spoken names are resolved against the roster, and every
    /// matched member becomes visible so the new assignments stay editable.
    fn merge_detected(&mut self, detected: Vec<DetectedItem>) {
        let roster = self.all_members.clone();
        let mut index = 0;
        self.items.retain(|item| {
            let keep = !is_placeholder(item, index);
            index += 1;
            keep
        });

        let mut matched: Vec<MemberName> = Vec::new();
        let mut unresolved: Vec<String> = Vec::new();
        for found in detected.into_iter().filter(|d| !d.name.trim().is_empty()) {
            let mut item = Item::new(found.name.clone(), found.price.amount(), &roster);
            for spoken in &found.members {
                match find_member(spoken, &roster) {
                    Some(hit) => {
                        debug!("Matched '{}' to member {} ({:?})", spoken, hit.member, hit.tier);
                        item.members.insert(hit.member.clone(), true);
                        if !matched.contains(&hit.member) {
                            matched.push(hit.member);
                        }
                    }
                    None => {
                        if !unresolved.contains(spoken) {
                            unresolved.push(spoken.clone());
                        }
                    }
                }
            }
            self.items.push(item);
        }

        for member in &matched {
            self.reveal(member);
        }
        if !unresolved.is_empty() {
            warn!("Could not match names to members: {:?}", unresolved);
        }
        self.unresolved_names = unresolved;
    }

    fn load_expense(&mut self, expense: LoadedExpense) {
        self.description = expense.description;
        self.comment = expense.note;
        if let Some(group) = expense.group_name {
            self.selected_group = Some(group);
        }
        let payer = expense.paid_user.filter(|p| self.is_known(p));
        if let Some(payer) = &payer {
            self.paid_user = Some(payer.clone());
        }

        if !expense.items.is_empty() {
            let roster = self.all_members.clone();
            let mut involved: Vec<MemberName> = Vec::new();
            for member in expense.items.iter().flat_map(|i| i.members.iter()) {
                if roster.contains(member) && !involved.contains(member) {
                    involved.push(member.clone());
                }
            }
            if let Some(payer) = payer {
                if !involved.contains(&payer) {
                    involved.push(payer);
                }
            }
            for member in &involved {
                self.reveal(member);
            }
            self.items = expense.items.iter().map(|i| i.to_item(&roster)).collect();
        }

        self.mode = match expense.expense_id.filter(|id| !id.is_empty()) {
            Some(expense_id) => EditMode::Update { expense_id },
            None => EditMode::Create,
        };
        self.final_split = None;
    }
}

/// Applies one event, returning the next state.
pub fn reduce(state: &SessionState, event: SessionEvent) -> Result<SessionState, SplitError> {
    let mut next = state.clone();
    if event.edits_items() {
        next.final_split = None;
    }
    let name = event.name();

    match event {
        SessionEvent::MembersLoaded { directory } => next.load_members(directory),
        SessionEvent::GroupsLoaded { groups } => next.load_groups(groups),
        SessionEvent::GroupSelected { group } => {
            if !next.groups.contains_key(&group) {
                return Err(SplitError::invalid_input(
                    "group",
                    "Unknown group",
                    format!("Group {} is not available", group),
                ));
            }
            next.selected_group = Some(group);
        }
        SessionEvent::PayerSelected { member } => {
            next.require_member(&member)?;
            next.paid_user = Some(member);
        }
        SessionEvent::ItemAdded => {
            let item = Item::placeholder(next.items.len() + 1, &next.all_members);
            next.items.push(item);
        }
        SessionEvent::ItemRemoved { index } => {
            if index >= next.items.len() {
                return Err(SplitError::ItemNotFound(index));
            }
            next.items.remove(index);
        }
        SessionEvent::ItemRenamed { index, name } => {
            next.item_mut(index)?.name = name;
        }
        SessionEvent::ItemPriceEntered { index, input } => {
            next.item_mut(index)?.price = parse_price(&input);
        }
        SessionEvent::MemberToggled { index, member } => {
            next.require_member(&member)?;
            let item = next.item_mut(index)?;
            let selected = item.is_assigned(&member);
            item.members.insert(member, !selected);
        }
        SessionEvent::AllMembersToggled { index } => next.toggle_all(index)?,
        SessionEvent::ItemsDetected { items } | SessionEvent::VoiceItemsProcessed { items } => {
            info!("Merging {} discovered items", items.len());
            next.merge_detected(items);
        }
        SessionEvent::MemberVisibilityToggled { member } => {
            next.require_member(&member)?;
            if next.is_visible(&member) {
                next.visible_members.retain(|m| *m != member);
            } else {
                next.visible_members.push(member);
            }
        }
        SessionEvent::HiddenMembersRevealed => {
            for member in next.hidden_members_with_splits() {
                next.reveal(&member);
            }
        }
        SessionEvent::DescriptionChanged { description } => next.description = description,
        SessionEvent::CommentChanged { comment } => next.comment = comment,
        SessionEvent::SplitsCalculated => next.final_split = Some(next.summary()),
        SessionEvent::ExpenseLoaded { expense } => next.load_expense(expense),
        SessionEvent::UpdateCancelled => next.mode = EditMode::Create,
        SessionEvent::ExpenseSubmitted => {
            next.items = default_items(&next.all_members);
            next.final_split = None;
            next.mode = EditMode::Create;
        }
    }

    debug!("Applied {} event", name);
    Ok(next)
}
