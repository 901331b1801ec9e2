//! MIME type detection for submitted content.
//!
//! Content is identified from its leading bytes with `infer` first; when no
//! matcher recognizes it, the filename extension decides. Unknown content is
//! reported as `application/octet-stream`.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension to MIME type, first entry per MIME type is its preferred extension.
///
/// MIME strings match the ones `infer` reports so that the reverse lookup in
/// [`extension_for`] works on sniffed types too.
const EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heif"),
    ("heif", "image/heif"),
    ("avif", "image/avif"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("ico", "image/vnd.microsoft.icon"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("flv", "video/x-flv"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/m4a"),
    ("wav", "audio/x-wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/x-flac"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("exe", "application/vnd.microsoft.portable-executable"),
];

/// Detect the MIME type of `bytes`, falling back to the extension of `filename`
pub fn detect(bytes: &[u8], filename: Option<&str>) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    filename
        .and_then(extension_of)
        .and_then(|ext| mime_for_extension(&ext))
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Lower-cased extension of a filename, without the dot
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// MIME type registered for an extension
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_lowercase();
    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Preferred extension for a MIME type, ignoring parameters such as `; charset=utf-8`
pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type.split(';').next().unwrap_or_default().trim().to_lowercase();
    EXTENSIONS
        .iter()
        .find(|(_, mime)| *mime == essence)
        .map(|(ext, _)| *ext)
}
