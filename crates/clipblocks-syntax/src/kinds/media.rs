use crate::token::MediaKind;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif", "heic"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "mkv", "avi", "ogv"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "m4a", "flac", "aac", "opus"];
pub const FILE_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "txt", "rtf", "epub",
];

/// Removes any `?query` and `#fragment` from a URL.
pub fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Lower-cased extension of the URL's last path segment, if any.
pub fn extension(url: &str) -> Option<String> {
    let path = strip_query_and_fragment(url);
    let last = path.rsplit('/').next()?;
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn has_extension(url: &str, table: &[&str]) -> bool {
    extension(url).is_some_and(|ext| table.contains(&ext.as_str()))
}

/// True for strings that start with an http(s) scheme.
pub fn is_http_url(s: &str) -> bool {
    let lower = s.get(..8).map(str::to_ascii_lowercase).unwrap_or_default();
    (lower.starts_with("http://") && s.len() > 7) || (lower.starts_with("https://") && s.len() > 8)
}

/// Classifies a bare URL by its extension.
pub fn sniff(url: &str) -> Option<MediaKind> {
    if has_extension(url, IMAGE_EXTENSIONS) {
        Some(MediaKind::Image)
    } else if has_extension(url, VIDEO_EXTENSIONS) {
        Some(MediaKind::Video)
    } else if has_extension(url, AUDIO_EXTENSIONS) {
        Some(MediaKind::Audio)
    } else if has_extension(url, FILE_EXTENSIONS) {
        Some(MediaKind::File)
    } else {
        None
    }
}
