use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Staging types
    types.push(clean_type(StagingStatus::export_to_string()?));
    types.push(clean_type(StagingRecord::export_to_string()?));
    types.push(clean_type(StagingRecordView::export_to_string()?));
    types.push(clean_type(CreateStagingRequest::export_to_string()?));
    types.push(clean_type(StagingRecordsResponse::export_to_string()?));
    types.push(clean_type(StatusCount::export_to_string()?));
    types.push(clean_type(StatusCountsResponse::export_to_string()?));

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactView::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));

    // Match group types
    types.push(clean_type(MatchKind::export_to_string()?));
    types.push(clean_type(MatchGroup::export_to_string()?));
    types.push(clean_type(MatchGroupView::export_to_string()?));
    types.push(clean_type(MatchGroupsResponse::export_to_string()?));

    // Review types
    types.push(clean_type(Severity::export_to_string()?));
    types.push(clean_type(Notification::export_to_string()?));
    types.push(clean_type(StatusOption::export_to_string()?));
    types.push(clean_type(ReviewStateResponse::export_to_string()?));
    types.push(clean_type(SelectionRequest::export_to_string()?));
    types.push(clean_type(FilterRequest::export_to_string()?));
    types.push(clean_type(DeleteRequest::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strips ts-rs "generated" banner lines so the output diffs cleanly.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
