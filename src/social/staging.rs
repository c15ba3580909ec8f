//! One staging loop for every "create a handle per media URL" sequence: unpublished
//! Facebook photos, Instagram carousel children and LinkedIn image uploads.

use crate::error::ToolError;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Default)]
pub struct Staged {
    pub ids: Vec<String>,
    pub skipped: Vec<String>,
}

impl Staged {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Runs `stage` for each URL in order.
///
/// `Ok(Some(id))` records the handle, `Ok(None)` skips the item and `Err` aborts the
/// whole sequence.
pub fn stage_each<F>(label: &str, urls: &[String], mut stage: F) -> Result<Staged, ToolError>
where
    F: FnMut(&str) -> Result<Option<String>, ToolError>,
{
    let mut staged = Staged::default();
    for url in urls {
        match stage(url)? {
            Some(id) => staged.ids.push(id),
            None => {
                warn!(stage = label, url = %url, "skipping media item");
                staged.skipped.push(url.clone());
            }
        }
    }
    Ok(staged)
}

/// The `id` field most Graph API create calls answer with.
pub fn response_id(response: &Value) -> Option<String> {
    match response.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
