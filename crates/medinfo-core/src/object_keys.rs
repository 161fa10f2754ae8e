//! Object storage key and URL conventions.
//!
//! Pure string functions. These define where prescription images land in the
//! storage bucket and how their public URLs are derived.

/// Final path component of an uploaded filename, with either separator.
pub fn basename(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

/// Extension of the final path component, including the leading dot.
/// Empty when the name has no dot.
pub fn extension(filename: &str) -> &str {
    let base = basename(filename);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// Key for an uploaded prescription image: `<stem>_<unique><ext>`.
///
/// `unique` is expected to be a nanosecond timestamp, which makes two
/// uploads of the same filename land on different keys. Characters outside
/// `[A-Za-z0-9._-]` become `_` so the key is a single literal URL segment.
pub fn prescription_image(filename: &str, unique: i128) -> String {
    let base = basename(filename);
    let ext = extension(base);
    let stem = &base[..base.len() - ext.len()];
    format!("{}_{unique}{}", url_safe(stem), url_safe(ext))
}

fn url_safe(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn upload_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/storage/v1/object/{bucket}/{key}",
        base_url.trim_end_matches('/')
    )
}

pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{key}",
        base_url.trim_end_matches('/')
    )
}
