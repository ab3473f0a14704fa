//! MIME type → file extension resolution for stored media keys.

/// Static MIME → extension table.
///
/// Append-only. The substring fallback in [`resolve_extension`] scans this
/// table in declaration order, and some keys are substrings of others (e.g.
/// `opus` vs `audio/ogg`), so relative order within a group matters.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    // Images
    ("image/jpeg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tif"),
    ("image/heic", "heic"),
    // Video
    ("video/mp4", "mp4"),
    ("video/mpeg", "mpeg"),
    ("video/quicktime", "mov"),
    ("video/webm", "webm"),
    ("video/x-msvideo", "avi"),
    ("video/x-matroska", "mkv"),
    ("video/3gpp", "3gp"),
    // Audio (keep `opus` ahead of the ogg entries)
    ("audio/mpeg", "mp3"),
    ("audio/mp4", "m4a"),
    ("audio/aac", "aac"),
    ("audio/wav", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/flac", "flac"),
    ("opus", "opus"),
    ("audio/ogg", "ogg"),
    ("audio/webm", "weba"),
    ("audio/amr", "amr"),
    // Documents
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
    ("application/vnd.ms-excel", "xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
    ),
    ("application/vnd.ms-powerpoint", "ppt"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptx",
    ),
    ("application/rtf", "rtf"),
    // Text
    ("text/plain", "txt"),
    ("text/csv", "csv"),
    ("text/html", "html"),
    ("text/xml", "xml"),
    ("application/xml", "xml"),
    ("application/json", "json"),
    // Archives
    ("application/zip", "zip"),
    ("application/x-rar-compressed", "rar"),
    ("application/x-7z-compressed", "7z"),
    ("application/gzip", "gz"),
    ("application/x-tar", "tar"),
    // Generic binary
    ("application/octet-stream", "bin"),
];

const FALLBACK_EXTENSION: &str = "bin";

/// Resolve a file extension for a MIME type.
///
/// Exact table match first; failing that, a substring-containment pass over
/// the same table in declaration order catches parametrized MIME types like
/// `audio/ogg; codecs=opus`. Never fails: unknown, empty and missing types
/// all resolve to `bin`.
pub fn resolve_extension(mime: Option<&str>) -> &'static str {
    let Some(mime) = mime else {
        return FALLBACK_EXTENSION;
    };
    let mime = mime.trim().to_lowercase();
    if mime.is_empty() {
        return FALLBACK_EXTENSION;
    }

    for (key, ext) in MIME_EXTENSIONS {
        if mime == *key {
            return ext;
        }
    }
    for (key, ext) in MIME_EXTENSIONS {
        if mime.contains(key) {
            return ext;
        }
    }
    FALLBACK_EXTENSION
}
