//! Recording catalog: a directory scan is the only index.
//!
//! Every listing re-reads the store directory and stats each entry; nothing
//! is cached between requests.

use crate::store::FileStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the recordings listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingEntry {
    pub filename: String,
    /// Cosmetic display name, derived from the filename; not authoritative.
    #[serde(rename = "originalname")]
    pub original_name: String,
    pub size: u64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

/// Collapse a leading `recording-<digits>-<digits>` prefix to `recording`,
/// the shape browser-generated capture names take. Anything else is shown
/// as-is.
pub fn simplify_display_name(filename: &str) -> String {
    let Some(rest) = filename.strip_prefix("recording-") else {
        return filename.to_string();
    };

    let mut halves = rest.splitn(2, '-');
    let (Some(first), Some(second)) = (halves.next(), halves.next()) else {
        return filename.to_string();
    };

    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return filename.to_string();
    }

    let digits = second
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return filename.to_string();
    }

    format!("recording{}", &second[digits..])
}

/// List all recordings, newest first. Directories are skipped; `uploadedAt`
/// comes from the filesystem creation time.
pub async fn list(store: &FileStore) -> Result<Vec<RecordingEntry>> {
    let mut entries: Vec<RecordingEntry> = store
        .entries()
        .await?
        .into_iter()
        .map(|file| RecordingEntry {
            original_name: simplify_display_name(&file.filename),
            url: format!("/uploads/{}", file.filename),
            filename: file.filename,
            size: file.size,
            uploaded_at: file.created_at,
        })
        .collect();

    entries.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    Ok(entries)
}

/// Content type for streaming a stored file, guessed from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "amr" => "audio/amr",
        "m4a" => "audio/x-m4a",
        _ => "application/octet-stream",
    }
}
