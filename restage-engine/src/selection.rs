use shared_types::StagingRecordView;

/// The set of currently selected staging-record ids. The UI always supplies
/// the full selection, never a delta, so `set` replaces wholesale. Insertion
/// order is kept for stable display.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn set(&mut self, ids: Vec<String>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Prunes the selection to ids still present in the full staging list.
    /// Called after every refresh or local exclusion so stale ids never
    /// accumulate.
    pub fn retain_present(&mut self, records: &[StagingRecordView]) {
        self.ids.retain(|id| records.iter().any(|r| &r.id == id));
    }
}
