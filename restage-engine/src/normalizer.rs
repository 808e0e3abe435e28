use chrono::NaiveDate;

use shared_types::{Contact, ContactView, MatchGroup, MatchGroupView, StagingRecord, StagingRecordView};

/// Flat, renderable projection of one fetch cycle's match groups.
#[derive(Debug, Default, Clone)]
pub struct NormalizedView {
    pub staging: Vec<StagingRecordView>,
    pub contacts: Vec<ContactView>,
}

/// Flattens match groups into two parallel view lists: one staging view per
/// group, and every candidate contact across all groups with a backlink to the
/// staging record that owns its group. Input is not mutated; a group with no
/// matches still contributes its staging record.
pub fn flatten(groups: &[MatchGroup]) -> NormalizedView {
    let mut view = NormalizedView::default();

    for group in groups {
        view.staging.push(staging_view(&group.staging_record));
        for contact in &group.matches {
            view.contacts
                .push(contact_view(contact, Some(&group.staging_record.id)));
        }
    }

    view
}

/// Grouped projection for the grouped match display. Keys are synthesized from
/// fetch-order index and are meaningless outside the cycle that produced them.
pub fn group_views(groups: &[MatchGroup]) -> Vec<MatchGroupView> {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| MatchGroupView {
            key: format!("Group_{}", index),
            kind: group.kind,
            staging_record: staging_view(&group.staging_record),
            matches: group
                .matches
                .iter()
                .map(|c| contact_view(c, Some(&group.staging_record.id)))
                .collect(),
        })
        .collect()
}

pub fn staging_view(record: &StagingRecord) -> StagingRecordView {
    StagingRecordView {
        id: record.id.clone(),
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        full_name: full_name(&record.first_name, &record.last_name),
        email: record.email.clone(),
        secondary_email: record.secondary_email.clone(),
        other_email: record.other_email.clone(),
        umail: record.umail.clone(),
        phone: record.phone.clone(),
        birth_date: format_birth_date(record.birth_date),
        record_link: staging_link(&record.id),
        status: record.status,
    }
}

/// `owner_id` is the id of the staging record whose group this contact came
/// from; it takes precedence over the contact's stored back-reference, since
/// group membership is the truth within a fetch cycle.
pub fn contact_view(contact: &Contact, owner_id: Option<&str>) -> ContactView {
    ContactView {
        id: contact.id.clone(),
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        full_name: full_name(&contact.first_name, &contact.last_name),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        birth_date: format_birth_date(contact.birth_date),
        record_link: contact_link(&contact.id),
        staging_record_id: owner_id
            .map(str::to_string)
            .or_else(|| contact.staging_record_id.clone()),
    }
}

pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last)
}

/// Fixed `YYYY-MM-DD` form, empty string when absent.
pub fn format_birth_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

pub fn staging_link(id: &str) -> String {
    format!("/records/staging/{}", id)
}

pub fn contact_link(id: &str) -> String {
    format!("/records/contact/{}", id)
}
