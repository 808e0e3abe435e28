use shared_types::{StagingRecordView, StatusOption};

/// Distinct statuses present in the list, in order of first occurrence, with
/// the synthetic "All" option (empty-string value) prepended.
pub fn available_statuses(records: &[StagingRecordView]) -> Vec<StatusOption> {
    let mut options = vec![StatusOption::all()];

    for record in records {
        let label = record.status.as_str();
        if !options.iter().any(|o| o.value == label) {
            options.push(StatusOption {
                label: label.to_string(),
                value: label.to_string(),
            });
        }
    }

    options
}

/// Narrows the list to one status, or returns it unchanged for the empty
/// sentinel. Operates on a read-only view; the full list stays the source of
/// truth for re-filtering.
pub fn apply(records: &[StagingRecordView], selected_status: &str) -> Vec<StagingRecordView> {
    if selected_status == StatusOption::ALL_VALUE {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|r| r.status.as_str() == selected_status)
        .cloned()
        .collect()
}
