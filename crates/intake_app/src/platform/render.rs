use intake_core::{AppViewModel, SubmissionState};
use intake_engine::PreviewRegistry;
use serde_json::Value;

/// Text rendering of the uploader panel.
pub(crate) fn render_view(view: &AppViewModel, previews: &PreviewRegistry) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.files.len() + 4);
    lines.push(format!("[{}] {} staged", view.select_label, view.files.len()));

    for file in &view.files {
        let marker = if view.active_preview == Some(file.index) {
            '>'
        } else {
            ' '
        };
        let url = previews
            .get(file.preview_id)
            .map(|handle| handle.url.as_str())
            .unwrap_or("-");
        lines.push(format!(
            "{marker} {}: {} ({}, {} bytes) {url}",
            file.index, file.name, file.mime_type, file.size
        ));
    }

    if view.show_category_input {
        lines.push(format!("Category: {}", view.category));
    }

    let gate = if view.submit_enabled { "" } else { " (disabled)" };
    lines.push(format!("[{}]{gate}", view.submit_label));

    if let (SubmissionState::Error, Some(error)) = (view.submission, &view.last_error) {
        lines.push(format!("Last upload failed: {error}"));
    }
    lines
}

/// Human summary of a service reply. Shapes we don't recognise are pretty-printed.
pub(crate) fn render_result(result: &Value) -> Vec<String> {
    let mut lines = vec!["Analysis Results".to_string()];

    if let Some(error) = result.get("error").and_then(Value::as_str) {
        lines.push(format!("Error: {error}"));
    }
    if let Some(verdict) = result.get("result").and_then(Value::as_str) {
        lines.push(format!("Result: {verdict}"));
    }
    if let Some(category) = result.get("category").and_then(Value::as_str) {
        if category != "No match" {
            lines.push(format!("Category: {category}"));
        }
    }
    if let Some(items) = result.get("items").and_then(Value::as_array) {
        if !items.is_empty() {
            lines.push(format!("Detected Items: {}", join_values(items)));
        }
    }
    if let Some(added) = result.get("labelsAdded") {
        lines.push(format!("Labels Added: {}", plain(added)));
    }
    if let Some(received) = result.get("Received images") {
        lines.push("Batch Processing Results:".to_string());
        lines.push(format!("Received Images: {}", plain(received)));
        if let Some(ok) = result.get("Successfull scans") {
            lines.push(format!("Successful Scans: {}", plain(ok)));
        }
        let errors = result
            .get("Error scans")
            .and_then(Value::as_array)
            .filter(|errors| !errors.is_empty())
            .map(|errors| join_values(errors))
            .unwrap_or_else(|| "None".to_string());
        lines.push(format!("Error Scans: {errors}"));
        if let Some(corrupted) = result.get("Corrupted files") {
            lines.push(format!("Corrupted Files: {}", plain(corrupted)));
        }
    }

    if lines.len() == 1 {
        lines.push(serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string()));
    }
    lines
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn join_values(values: &[Value]) -> String {
    values.iter().map(plain).collect::<Vec<_>>().join(", ")
}
