//! Upload checks run before any network or database call.

use medinfo_core::object_keys;

use crate::error::IntakeError;

/// Largest accepted image.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Ceiling for the whole multipart body: the file plus 1 MiB of form overhead.
pub const MAX_REQUEST_BYTES: usize = MAX_FILE_BYTES + 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/svg+xml",
];

pub const ALLOWED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp", ".svg"];

const OCTET_STREAM: &str = "application/octet-stream";

/// Guess an image type from magic bytes.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"BM") {
        "image/bmp"
    } else if looks_like_svg(bytes) {
        "image/svg+xml"
    } else {
        OCTET_STREAM
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// The declared type if there is one, otherwise a sniffed one.
///
/// Parameters such as `; charset=...` are dropped and the result is
/// lower-cased.
pub fn resolve_content_type(declared: Option<&str>, bytes: &[u8]) -> String {
    let declared = declared
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty());
    match declared {
        Some(ct) => ct.to_ascii_lowercase(),
        None => sniff_content_type(bytes).to_string(),
    }
}

pub fn check_file_size(len: usize) -> Result<(), IntakeError> {
    if len > MAX_FILE_BYTES {
        return Err(IntakeError::invalid("file too large (max 10MB)"));
    }
    Ok(())
}

pub fn check_content_type(content_type: &str) -> Result<(), IntakeError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(IntakeError::invalid("only image uploads are allowed"));
    }
    Ok(())
}

/// Extension check is case-insensitive.
pub fn check_extension(filename: &str) -> Result<(), IntakeError> {
    let ext = object_keys::extension(filename).to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(IntakeError::invalid("unsupported file extension"));
    }
    Ok(())
}

/// Both identifiers are required; the doctor identifier is trimmed.
pub fn check_identifiers(user_id: &str, doctor: &str) -> Result<(i64, String), IntakeError> {
    let doctor = doctor.trim();
    if user_id.is_empty() || doctor.is_empty() {
        return Err(IntakeError::invalid("userId and doctorUsername are required"));
    }
    let user_id = user_id
        .trim()
        .parse::<i64>()
        .map_err(|_| IntakeError::invalid("invalid userId"))?;
    Ok((user_id, doctor.to_string()))
}
