//! Ticket button creation wizard state.
//!
//! Each step of the wizard fills in part of a [`ButtonDraft`]. Drafts are kept per user
//! and expire after [`DRAFT_TTL`] of inactivity.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::draft::DraftError;
use crate::model::ticket::{
    CreateTicketButtonParams, TicketButtonStyle, DEFAULT_CHANNEL_NAME_FORMAT,
};

pub const DRAFT_TTL: Duration = Duration::minutes(15);

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonDraft {
    pub panel_id: i32,
    pub label: Option<String>,
    pub emoji: Option<String>,
    pub style: Option<TicketButtonStyle>,
    pub open_message: Option<String>,
    pub category_id: Option<u64>,
    pub archive_category_id: Option<u64>,
    pub support_roles: Vec<u64>,
    pub max_tickets: u32,
    touched_at: DateTime<Utc>,
}

impl ButtonDraft {
    pub fn new(panel_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            panel_id,
            label: None,
            emoji: None,
            style: None,
            open_message: None,
            category_id: None,
            archive_category_id: None,
            support_roles: Vec::new(),
            max_tickets: 1,
            touched_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.touched_at > DRAFT_TTL
    }

    /// Validates the draft and turns it into button creation parameters.
    ///
    /// # Returns
    /// - `Ok(CreateTicketButtonParams)` - All required steps were completed
    /// - `Err(DraftError::MissingField)` - Label, style or category is missing
    pub fn build(&self) -> Result<CreateTicketButtonParams, DraftError> {
        let label = self
            .label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .ok_or(DraftError::MissingField("label"))?;
        let style = self.style.ok_or(DraftError::MissingField("style"))?;
        let category_id = self.category_id.ok_or(DraftError::MissingField("category"))?;

        Ok(CreateTicketButtonParams {
            panel_id: self.panel_id,
            label: label.to_string(),
            emoji: non_empty(self.emoji.as_deref()),
            style,
            open_message: non_empty(self.open_message.as_deref()),
            channel_name_format: DEFAULT_CHANNEL_NAME_FORMAT.to_string(),
            category_id: Some(category_id),
            archive_category_id: self.archive_category_id,
            support_roles: self.support_roles.clone(),
            viewer_roles: Vec::new(),
            max_tickets: self.max_tickets,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Drafts keyed by the Discord user running the wizard.
#[derive(Clone, Default)]
pub struct DraftStore {
    drafts: Arc<DashMap<u64, ButtonDraft>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a wizard, replacing any earlier draft of the user.
    pub fn start(&self, user_id: u64, panel_id: i32, now: DateTime<Utc>) {
        self.drafts.insert(user_id, ButtonDraft::new(panel_id, now));
    }

    /// Applies one wizard step and refreshes the expiry.
    ///
    /// # Returns
    /// - `Ok(ButtonDraft)` - The draft after the step
    /// - `Err(DraftError::NotFound)` - No draft, or it expired
    pub fn update(
        &self,
        user_id: u64,
        now: DateTime<Utc>,
        step: impl FnOnce(&mut ButtonDraft),
    ) -> Result<ButtonDraft, DraftError> {
        let mut draft = self.live_draft(user_id, now)?;

        step(&mut draft);
        draft.touched_at = now;

        Ok(draft.clone())
    }

    /// Gets the draft without refreshing its expiry.
    pub fn get(&self, user_id: u64, now: DateTime<Utc>) -> Result<ButtonDraft, DraftError> {
        Ok(self.live_draft(user_id, now)?.clone())
    }

    pub fn discard(&self, user_id: u64) -> bool {
        self.drafts.remove(&user_id).is_some()
    }

    /// Drops expired drafts, returning how many were removed.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let before = self.drafts.len();
        self.drafts.retain(|_, draft| !draft.is_expired(now));
        before - self.drafts.len()
    }

    fn live_draft(
        &self,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<dashmap::mapref::one::RefMut<'_, u64, ButtonDraft>, DraftError> {
        let draft = self.drafts.get_mut(&user_id).ok_or(DraftError::NotFound)?;

        if draft.is_expired(now) {
            drop(draft);
            self.drafts.remove(&user_id);
            return Err(DraftError::NotFound);
        }

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_each_step() {
        let now = Utc::now();
        let mut draft = ButtonDraft::new(1, now);

        assert_eq!(draft.build(), Err(DraftError::MissingField("label")));

        draft.label = Some("Support".to_string());
        assert_eq!(draft.build(), Err(DraftError::MissingField("style")));

        draft.style = Some(TicketButtonStyle::Success);
        assert_eq!(draft.build(), Err(DraftError::MissingField("category")));

        draft.category_id = Some(555);
        let params = draft.build().unwrap();
        assert_eq!(params.label, "Support");
        assert_eq!(params.category_id, Some(555));
        assert_eq!(params.channel_name_format, DEFAULT_CHANNEL_NAME_FORMAT);
    }

    #[test]
    fn blank_label_counts_as_missing() {
        let mut draft = ButtonDraft::new(1, Utc::now());
        draft.label = Some("   ".to_string());

        assert_eq!(draft.build(), Err(DraftError::MissingField("label")));
    }

    #[test]
    fn steps_update_the_stored_draft() {
        let now = Utc::now();
        let store = DraftStore::new();
        store.start(7, 3, now);

        store
            .update(7, now, |d| d.label = Some("Billing".to_string()))
            .unwrap();
        let draft = store
            .update(7, now, |d| d.support_roles = vec![1, 2])
            .unwrap();

        assert_eq!(draft.label.as_deref(), Some("Billing"));
        assert_eq!(draft.support_roles, vec![1, 2]);
        assert_eq!(store.get(7, now).unwrap().panel_id, 3);
        assert!(store.discard(7));
        assert_eq!(store.get(7, now), Err(DraftError::NotFound));
    }

    #[test]
    fn expired_drafts_are_not_found() {
        let start = Utc::now();
        let store = DraftStore::new();
        store.start(7, 3, start);

        let later = start + DRAFT_TTL + Duration::seconds(1);

        assert_eq!(
            store.update(7, later, |d| d.max_tickets = 2),
            Err(DraftError::NotFound)
        );
        assert!(!store.discard(7));
    }

    #[test]
    fn each_step_extends_the_expiry() {
        let start = Utc::now();
        let store = DraftStore::new();
        store.start(7, 3, start);

        let step = start + Duration::minutes(10);
        store.update(7, step, |_| {}).unwrap();

        assert!(store.get(7, start + Duration::minutes(20)).is_ok());
    }

    #[test]
    fn prune_removes_only_expired() {
        let start = Utc::now();
        let store = DraftStore::new();
        store.start(1, 1, start);
        store.start(2, 1, start + Duration::minutes(10));

        assert_eq!(store.prune(start + Duration::minutes(20)), 1);
        assert!(store.discard(2));
    }
}
