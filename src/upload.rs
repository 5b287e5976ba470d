//! Upload handling: multipart validation and derived-filename generation.
//!
//! Validation is all-or-nothing: every part is buffered and checked before
//! anything is written, so a request with one bad part leaves the store
//! untouched.

use crate::error::ApiError;
use axum::extract::Multipart;
use chrono::{DateTime, Utc};

/// Multipart field name carrying the audio files.
pub const UPLOAD_FIELD: &str = "recordings";

/// Maximum number of file parts per request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Per-file size limit in bytes (50 MiB).
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Request body cap for the upload route: ten files at the per-file limit,
/// plus headroom for multipart framing.
pub const MAX_UPLOAD_BODY: usize = MAX_FILES_PER_REQUEST * MAX_FILE_SIZE + 1024 * 1024;

/// MIME types accepted for upload. The type is client-asserted and used only
/// for this filter; file contents are never inspected.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/wav",
    "audio/mp3",
    "audio/webm",
    "audio/amr",
    "audio/x-m4a",
];

pub fn is_allowed_mime(mimetype: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mimetype)
}

/// A validated file part, buffered in memory and not yet persisted.
#[derive(Debug)]
pub struct UploadedPart {
    /// Filename exactly as the client sent it.
    pub original_name: String,
    pub mimetype: String,
    pub data: Vec<u8>,
}

/// Recover a filename that was mis-decoded as one-byte-per-character text.
///
/// Browsers historically delivered UTF-8 filenames that some stacks decoded
/// as Latin-1, turning `测试录音` into mojibake where each char holds one
/// UTF-8 byte. If every char fits in a byte and those bytes form valid
/// UTF-8, the reinterpretation is returned; otherwise the input was already
/// properly decoded (or is not UTF-8) and comes back unchanged.
pub fn repair_mojibake(name: &str) -> String {
    let mut bytes = Vec::with_capacity(name.len());
    for ch in name.chars() {
        let cp = ch as u32;
        if cp > 0xFF {
            return name.to_string();
        }
        bytes.push(cp as u8);
    }
    String::from_utf8(bytes).unwrap_or_else(|_| name.to_string())
}

/// Split a filename into base and extension. The extension starts at the
/// last dot and includes it; a dot in the first position marks a hidden
/// file, not an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Derive the on-disk filename: `{base}-{YYYYMMDDHHmmss}{ext}` with a
/// 14-digit UTC timestamp. Uniqueness rests on the timestamp; identical
/// names uploaded within the same second collide, last writer wins.
pub fn derive_filename(original: &str, now: DateTime<Utc>) -> String {
    let repaired = repair_mojibake(original);
    let (base, ext) = split_extension(&repaired);
    format!("{}-{}{}", base, now.format("%Y%m%d%H%M%S"), ext)
}

/// Drain the multipart stream, validating each file part against the field
/// name, count, type, and size rules. Non-file fields are ignored; file
/// parts under any other field name reject the request.
pub async fn collect_parts(mut multipart: Multipart) -> Result<Vec<UploadedPart>, ApiError> {
    let mut parts = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read multipart body: {}", e)))?
    {
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            // Plain form field, not a file.
            continue;
        };

        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != UPLOAD_FIELD {
            return Err(ApiError::UnexpectedField(field_name));
        }
        if parts.len() >= MAX_FILES_PER_REQUEST {
            return Err(ApiError::TooManyFiles);
        }

        let mimetype = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_mime(&mimetype) {
            return Err(ApiError::InvalidFileType(mimetype));
        }

        // Stream the part in, bailing as soon as it crosses the size limit
        // rather than buffering the rest.
        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::Internal(format!("failed to read file data: {}", e)))?
        {
            if data.len() + chunk.len() >= MAX_FILE_SIZE {
                return Err(ApiError::FileTooLarge(original_name));
            }
            data.extend_from_slice(&chunk);
        }

        parts.push(UploadedPart {
            original_name,
            mimetype,
            data,
        });
    }

    Ok(parts)
}
