use std::collections::{HashMap, HashSet};

use tokio::sync::broadcast;

use shared_types::{
    ContactView, MatchGroup, MatchGroupView, Notification, ReviewStateResponse, StagingRecord,
    StagingRecordView, StagingStatus, StatusCount, StatusOption,
};

use crate::error::EngineError;
use crate::filter;
use crate::normalizer::{self, NormalizedView};
use crate::selection::Selection;
use crate::store::RecordStore;

const NOTIFICATION_CAPACITY: usize = 64;

/// Result of a review action that reached the store. Holds the notifications
/// the action produced, in order: the success toast, then a staleness warning
/// when the follow-up refresh failed.
#[derive(Debug)]
pub struct ActionOutcome {
    pub notifications: Vec<Notification>,
}

/// Review-state engine for one active view. Owns the full normalized lists,
/// the selection, the active status filter and the status counts, and pushes
/// a notification for every terminal outcome on a broadcast channel the
/// presentation layer subscribes to.
///
/// Filtered views are always re-derived from the latest full list, never
/// patched in place, so overlapping in-flight actions cannot resurrect a
/// stale snapshot.
pub struct ReviewEngine<S: RecordStore> {
    store: S,
    groups: Vec<MatchGroup>,
    view: NormalizedView,
    group_views: Vec<MatchGroupView>,
    selection: Selection,
    status_filter: String,
    status_counts: Vec<StatusCount>,
    notifier: broadcast::Sender<Notification>,
}

impl<S: RecordStore> ReviewEngine<S> {
    pub fn new(store: S) -> Self {
        let (notifier, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            store,
            groups: Vec::new(),
            view: NormalizedView::default(),
            group_views: Vec::new(),
            selection: Selection::default(),
            status_filter: StatusOption::ALL_VALUE.to_string(),
            status_counts: Vec::new(),
            notifier,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Initial data pull. Unlike a post-action refresh, a failure here is a
    /// plain remote error: there is no previous view to fall back on.
    pub async fn load(&mut self) -> Result<(), EngineError> {
        match self.sync_from_store().await {
            Ok(()) => Ok(()),
            Err(e) => {
                let message = e.to_string();
                self.emit(&Notification::error("Load failed", &message));
                Err(EngineError::Remote(message))
            }
        }
    }

    /// Re-pull authoritative data and rebuild every derived view. Not retried
    /// on failure; the last-known view stays in place, stale.
    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        match self.sync_from_store().await {
            Ok(()) => Ok(()),
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Refresh failed, view may be stale: {}", message);
                self.emit(&Notification::warning(
                    "Refresh failed",
                    format!("The view may be stale: {}", message),
                ));
                Err(EngineError::Refresh(message))
            }
        }
    }

    /// Promote the selected staging records into authoritative contacts.
    /// Rejected locally, before any store call, when the selection is empty
    /// or contains an already-processed record.
    pub async fn promote_selected(&mut self) -> Result<ActionOutcome, EngineError> {
        let records = self.selected_records();
        if records.is_empty() {
            return Err(self.validation(
                "Promote failed",
                "Select at least one staging record to promote.",
            ));
        }
        if let Some(processed) = records
            .iter()
            .find(|r| r.status == StagingStatus::Processed)
        {
            return Err(self.validation(
                "Promote failed",
                format!(
                    "{} has already been processed.",
                    normalizer::full_name(&processed.first_name, &processed.last_name)
                ),
            ));
        }

        if let Err(e) = self.store.create_contacts(&records).await {
            return Err(self.remote("Promote failed", e));
        }

        // Local exclusion: promoted records and the contacts in their groups
        // leave the view in the same update. The follow-up refresh converges
        // on the same state.
        let promoted: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        self.groups
            .retain(|g| !promoted.contains(g.staging_record.id.as_str()));
        self.rebuild_views();

        let success = Notification::success(
            "Records promoted",
            format!("{} staging record(s) promoted to contacts.", records.len()),
        );
        self.emit(&success);
        let mut notifications = vec![success];
        self.refresh_after_action(&mut notifications).await;
        Ok(ActionOutcome { notifications })
    }

    /// Delete the selected staging records. The caller must pass the user's
    /// explicit confirmation; unconfirmed deletes never reach the store.
    pub async fn delete_selected(&mut self, confirmed: bool) -> Result<ActionOutcome, EngineError> {
        let records = self.selected_records();
        if records.is_empty() {
            return Err(self.validation(
                "Delete failed",
                "Select at least one staging record to delete.",
            ));
        }
        if !confirmed {
            return Err(self.validation(
                "Delete failed",
                "Deleting staging records requires confirmation.",
            ));
        }

        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        if let Err(e) = self.store.delete_staging_records(&ids).await {
            return Err(self.remote("Delete failed", e));
        }

        let deleted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.groups
            .retain(|g| !deleted.contains(g.staging_record.id.as_str()));
        self.selection.clear();
        self.rebuild_views();

        let success = Notification::success(
            "Records deleted",
            format!("{} staging record(s) deleted.", ids.len()),
        );
        self.emit(&success);
        let mut notifications = vec![success];
        self.refresh_after_action(&mut notifications).await;
        Ok(ActionOutcome { notifications })
    }

    /// Mark the selected staging records `Rejected`. No local patch is
    /// applied: the derived fields must be recomputed from the post-update
    /// records, so the refresh is the only way the change becomes visible.
    pub async fn reject_selected(&mut self) -> Result<ActionOutcome, EngineError> {
        let records = self.selected_records();
        if records.is_empty() {
            return Err(self.validation(
                "Reject failed",
                "Select at least one staging record to reject.",
            ));
        }

        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        if let Err(e) = self
            .store
            .update_staging_status(&ids, StagingStatus::Rejected)
            .await
        {
            return Err(self.remote("Reject failed", e));
        }

        let success = Notification::success(
            "Records rejected",
            format!("{} staging record(s) marked Rejected.", ids.len()),
        );
        self.emit(&success);
        let mut notifications = vec![success];
        self.refresh_after_action(&mut notifications).await;
        Ok(ActionOutcome { notifications })
    }

    /// Replaces the selection wholesale, then prunes it to ids present in the
    /// full staging list so stale ids never enter.
    pub fn set_selection(&mut self, ids: Vec<String>) {
        self.selection.set(ids);
        self.selection.retain_present(&self.view.staging);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection_ids(&self) -> &[String] {
        self.selection.ids()
    }

    /// Changing the filter leaves the selection untouched; only records
    /// leaving the full list prune it.
    pub fn set_status_filter(&mut self, status: String) {
        self.status_filter = status;
    }

    pub fn status_filter(&self) -> &str {
        &self.status_filter
    }

    /// Full staging list, unfiltered.
    pub fn staging_records(&self) -> &[StagingRecordView] {
        &self.view.staging
    }

    /// Staging list under the active status filter, derived fresh from the
    /// full list on every call.
    pub fn filtered_staging(&self) -> Vec<StagingRecordView> {
        filter::apply(&self.view.staging, &self.status_filter)
    }

    pub fn contact_records(&self) -> &[ContactView] {
        &self.view.contacts
    }

    pub fn match_groups(&self) -> &[MatchGroupView] {
        &self.group_views
    }

    pub fn available_statuses(&self) -> Vec<StatusOption> {
        filter::available_statuses(&self.view.staging)
    }

    pub fn status_counts(&self) -> &[StatusCount] {
        &self.status_counts
    }

    /// All staging records regardless of group membership, as views. Backs
    /// the unfiltered staging viewer.
    pub async fn staging_overview(&self) -> Result<Vec<StagingRecordView>, EngineError> {
        let records = self
            .store
            .fetch_staging_records()
            .await
            .map_err(|e| EngineError::Remote(e.to_string()))?;
        Ok(records.iter().map(normalizer::staging_view).collect())
    }

    /// Snapshot for the presentation layer, with the notifications produced
    /// by the action that led here.
    pub fn state(&self, notifications: Vec<Notification>) -> ReviewStateResponse {
        ReviewStateResponse {
            staging_records: self.filtered_staging(),
            contact_records: self.view.contacts.clone(),
            available_statuses: self.available_statuses(),
            status_filter: self.status_filter.clone(),
            selection: self.selection.ids().to_vec(),
            status_counts: self.status_counts.clone(),
            notifications,
        }
    }

    async fn sync_from_store(&mut self) -> anyhow::Result<()> {
        let groups = self.store.fetch_match_groups().await?;
        let counts = self.store.fetch_status_counts().await?;
        self.groups = groups;
        self.rebuild_views();
        self.status_counts = status_count_rows(&counts);
        Ok(())
    }

    async fn refresh_after_action(&mut self, notifications: &mut Vec<Notification>) {
        if let Err(e) = self.sync_from_store().await {
            tracing::warn!("Refresh after action failed, view may be stale: {}", e);
            let warning = Notification::warning(
                "Refresh failed",
                format!("The view may be stale: {}", e),
            );
            self.emit(&warning);
            notifications.push(warning);
        }
    }

    fn rebuild_views(&mut self) {
        self.view = normalizer::flatten(&self.groups);
        self.group_views = normalizer::group_views(&self.groups);
        self.selection.retain_present(&self.view.staging);
    }

    fn selected_records(&self) -> Vec<StagingRecord> {
        // Stale selection ids with no matching group are dropped silently.
        self.groups
            .iter()
            .filter(|g| self.selection.contains(&g.staging_record.id))
            .map(|g| g.staging_record.clone())
            .collect()
    }

    fn validation(&self, title: &str, message: impl Into<String>) -> EngineError {
        let message = message.into();
        self.emit(&Notification::error(title, &message));
        EngineError::Validation(message)
    }

    fn remote(&self, title: &str, err: anyhow::Error) -> EngineError {
        // Store-provided message, passed through verbatim.
        let message = err.to_string();
        self.emit(&Notification::error(title, &message));
        EngineError::Remote(message)
    }

    fn emit(&self, notification: &Notification) {
        // Send fails only when nobody subscribed, which is fine.
        let _ = self.notifier.send(notification.clone());
    }
}

/// Status summary rows in canonical status order, then any extra labels the
/// store reported, alphabetically. Missing canonical statuses show as 0.
pub fn status_count_rows(counts: &HashMap<String, i64>) -> Vec<StatusCount> {
    let canonical = [
        StagingStatus::Pending,
        StagingStatus::Approved,
        StagingStatus::Rejected,
        StagingStatus::Processed,
    ];

    let mut rows: Vec<StatusCount> = canonical
        .iter()
        .map(|s| StatusCount {
            label: s.as_str().to_string(),
            count: counts.get(s.as_str()).copied().unwrap_or(0),
        })
        .collect();

    let mut extras: Vec<&String> = counts
        .keys()
        .filter(|label| !canonical.iter().any(|s| s.as_str() == label.as_str()))
        .collect();
    extras.sort();
    for label in extras {
        rows.push(StatusCount {
            label: label.clone(),
            count: counts[label],
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use shared_types::{Contact, MatchKind, Severity};

    fn staging(id: &str, first: &str, last: &str, status: StagingStatus) -> StagingRecord {
        StagingRecord {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(format!("{}@example.org", id.to_lowercase())),
            secondary_email: None,
            other_email: None,
            umail: None,
            phone: None,
            birth_date: None,
            status,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn contact(id: &str, staging_id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: None,
            phone: None,
            birth_date: None,
            staging_record_id: Some(staging_id.to_string()),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn group(s: StagingRecord, matches: Vec<Contact>) -> MatchGroup {
        MatchGroup {
            kind: MatchKind::ExactMatch,
            staging_record: s,
            matches,
        }
    }

    /// Serves groups from memory and mimics the store's side effects:
    /// promoting or deleting removes the group, rejecting updates the status
    /// in place, so a refresh observes server truth.
    #[derive(Default)]
    struct MockStore {
        groups: Mutex<Vec<MatchGroup>>,
        fail_fetch: AtomicBool,
        fail_create: AtomicBool,
        fail_delete: AtomicBool,
        fail_update: AtomicBool,
        fetch_calls: AtomicUsize,
        create_calls: AtomicUsize,
        delete_calls: AtomicUsize,
        update_calls: AtomicUsize,
    }

    impl MockStore {
        fn with_groups(groups: Vec<MatchGroup>) -> Self {
            Self {
                groups: Mutex::new(groups),
                ..Default::default()
            }
        }

        fn remove_groups(&self, ids: &[String]) {
            self.groups
                .lock()
                .unwrap()
                .retain(|g| !ids.contains(&g.staging_record.id));
        }
    }

    #[async_trait]
    impl RecordStore for MockStore {
        async fn fetch_match_groups(&self) -> anyhow::Result<Vec<MatchGroup>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                bail!("match group fetch unavailable");
            }
            Ok(self.groups.lock().unwrap().clone())
        }

        async fn fetch_staging_records(&self) -> anyhow::Result<Vec<StagingRecord>> {
            Ok(self
                .groups
                .lock()
                .unwrap()
                .iter()
                .map(|g| g.staging_record.clone())
                .collect())
        }

        async fn fetch_status_counts(&self) -> anyhow::Result<HashMap<String, i64>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                bail!("status counts unavailable");
            }
            let mut counts = HashMap::new();
            for g in self.groups.lock().unwrap().iter() {
                *counts
                    .entry(g.staging_record.status.as_str().to_string())
                    .or_insert(0) += 1;
            }
            Ok(counts)
        }

        async fn create_contacts(&self, records: &[StagingRecord]) -> anyhow::Result<()> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create.load(Ordering::SeqCst) {
                bail!("contact creation rejected by server");
            }
            let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
            self.remove_groups(&ids);
            Ok(())
        }

        async fn delete_staging_records(&self, ids: &[String]) -> anyhow::Result<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete.load(Ordering::SeqCst) {
                bail!("delete rejected by server");
            }
            self.remove_groups(ids);
            Ok(())
        }

        async fn update_staging_status(
            &self,
            ids: &[String],
            status: StagingStatus,
        ) -> anyhow::Result<()> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_update.load(Ordering::SeqCst) {
                bail!("status update rejected by server");
            }
            for g in self.groups.lock().unwrap().iter_mut() {
                if ids.contains(&g.staging_record.id) {
                    g.staging_record.status = status;
                }
            }
            Ok(())
        }
    }

    async fn loaded_engine(groups: Vec<MatchGroup>) -> ReviewEngine<MockStore> {
        let mut engine = ReviewEngine::new(MockStore::with_groups(groups));
        engine.load().await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_promote_empty_selection_makes_no_store_call() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![],
        )])
        .await;

        let err = engine.promote_selected().await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(engine.store.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_promote_processed_record_rejected_locally() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Processed),
                vec![],
            ),
        ])
        .await;

        engine.set_selection(vec!["S1".to_string(), "S2".to_string()]);
        let err = engine.promote_selected().await.unwrap_err();
        match err {
            EngineError::Validation(message) => {
                assert!(message.contains("Alan Turing"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(engine.store.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_promote_success_excludes_records_and_linked_contacts() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![contact("C1", "S1")],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Pending),
                vec![contact("C2", "S2")],
            ),
        ])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        let outcome = engine.promote_selected().await.unwrap();
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(outcome.notifications[0].severity, Severity::Success);

        assert!(engine.staging_records().iter().all(|r| r.id != "S1"));
        assert!(engine.contact_records().iter().all(|c| c.id != "C1"));
        assert!(engine.staging_records().iter().any(|r| r.id == "S2"));
        assert!(engine.selection_ids().is_empty());
        assert_eq!(engine.store.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_promote_remote_failure_leaves_state_untouched() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![contact("C1", "S1")],
        )])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        engine.store.fail_create.store(true, Ordering::SeqCst);

        let err = engine.promote_selected().await.unwrap_err();
        match err {
            EngineError::Remote(message) => {
                assert_eq!(message, "contact creation rejected by server");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
        assert_eq!(engine.staging_records().len(), 1);
        assert_eq!(engine.contact_records().len(), 1);
        assert_eq!(engine.selection_ids(), ["S1".to_string()]);
    }

    #[tokio::test]
    async fn test_promote_refresh_failure_reports_staleness() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![contact("C1", "S1")],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Pending),
                vec![],
            ),
        ])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        engine.store.fail_fetch.store(true, Ordering::SeqCst);

        let outcome = engine.promote_selected().await.unwrap();
        assert_eq!(outcome.notifications.len(), 2);
        assert_eq!(outcome.notifications[0].severity, Severity::Success);
        assert_eq!(outcome.notifications[1].severity, Severity::Warning);

        // Local exclusion already applied despite the failed refresh.
        assert!(engine.staging_records().iter().all(|r| r.id != "S1"));
        assert!(engine.contact_records().is_empty());
    }

    #[tokio::test]
    async fn test_delete_empty_selection_emits_error_notification() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![],
        )])
        .await;

        let mut notifications = engine.subscribe();
        let err = engine.delete_selected(true).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(engine.store.delete_calls.load(Ordering::SeqCst), 0);

        let toast = notifications.try_recv().unwrap();
        assert_eq!(toast.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![],
        )])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        let err = engine.delete_selected(false).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(engine.store.delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.staging_records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_success_removes_records_and_clears_selection() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![contact("C1", "S1")],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Pending),
                vec![],
            ),
        ])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        engine.delete_selected(true).await.unwrap();

        assert!(engine.staging_records().iter().all(|r| r.id != "S1"));
        assert!(engine.contact_records().iter().all(|c| c.id != "C1"));
        assert!(engine.selection_ids().is_empty());
        assert_eq!(engine.store.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reject_refresh_recomputes_status() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Pending),
                vec![],
            ),
        ])
        .await;

        engine.set_selection(vec!["S2".to_string()]);
        engine.reject_selected().await.unwrap();

        engine.set_status_filter("Rejected".to_string());
        let rejected = engine.filtered_staging();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].id, "S2");

        engine.set_status_filter("Pending".to_string());
        assert!(engine.filtered_staging().iter().all(|r| r.id != "S2"));
    }

    #[tokio::test]
    async fn test_reject_remote_failure_keeps_status() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![],
        )])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        engine.store.fail_update.store(true, Ordering::SeqCst);

        let err = engine.reject_selected().await.unwrap_err();
        assert!(matches!(err, EngineError::Remote(_)));
        assert_eq!(engine.staging_records()[0].status, StagingStatus::Pending);
    }

    #[tokio::test]
    async fn test_selection_pruned_after_refresh() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Pending),
                vec![],
            ),
        ])
        .await;

        engine.set_selection(vec!["S1".to_string(), "S2".to_string()]);
        engine.store.remove_groups(&["S1".to_string()]);
        engine.refresh().await.unwrap();

        assert_eq!(engine.selection_ids(), ["S2".to_string()]);
    }

    #[tokio::test]
    async fn test_selection_ignores_unknown_ids() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![],
        )])
        .await;

        engine.set_selection(vec!["S1".to_string(), "GHOST".to_string()]);
        assert_eq!(engine.selection_ids(), ["S1".to_string()]);
    }

    #[tokio::test]
    async fn test_filter_change_keeps_selection() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Rejected),
                vec![],
            ),
        ])
        .await;

        engine.set_selection(vec!["S1".to_string()]);
        engine.set_status_filter("Rejected".to_string());
        assert_eq!(engine.selection_ids(), ["S1".to_string()]);
    }

    #[tokio::test]
    async fn test_load_failure_is_remote_error() {
        let store = MockStore::with_groups(vec![]);
        store.fail_fetch.store(true, Ordering::SeqCst);
        let mut engine = ReviewEngine::new(store);

        let err = engine.load().await.unwrap_err();
        assert!(matches!(err, EngineError::Remote(_)));
    }

    #[tokio::test]
    async fn test_manual_refresh_failure_is_refresh_error() {
        let mut engine = loaded_engine(vec![group(
            staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
            vec![],
        )])
        .await;

        engine.store.fail_fetch.store(true, Ordering::SeqCst);
        let err = engine.refresh().await.unwrap_err();
        assert!(matches!(err, EngineError::Refresh(_)));
        // Stale view retained.
        assert_eq!(engine.staging_records().len(), 1);
    }

    #[tokio::test]
    async fn test_state_snapshot_reflects_filter_and_counts() {
        let mut engine = loaded_engine(vec![
            group(
                staging("S1", "Ada", "Lovelace", StagingStatus::Pending),
                vec![contact("C1", "S1")],
            ),
            group(
                staging("S2", "Alan", "Turing", StagingStatus::Rejected),
                vec![],
            ),
        ])
        .await;

        engine.set_status_filter("Pending".to_string());
        let state = engine.state(vec![]);
        assert_eq!(state.staging_records.len(), 1);
        assert_eq!(state.contact_records.len(), 1);
        assert_eq!(state.status_filter, "Pending");

        let pending = state
            .status_counts
            .iter()
            .find(|c| c.label == "Pending")
            .unwrap();
        assert_eq!(pending.count, 1);
    }

    #[test]
    fn test_status_count_rows_canonical_order_and_zero_fill() {
        let mut counts = HashMap::new();
        counts.insert("Rejected".to_string(), 3);
        counts.insert("Held".to_string(), 1);

        let rows = status_count_rows(&counts);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Pending", "Approved", "Rejected", "Processed", "Held"]
        );
        assert_eq!(rows[0].count, 0);
        assert_eq!(rows[2].count, 3);
        assert_eq!(rows[4].count, 1);
    }
}
