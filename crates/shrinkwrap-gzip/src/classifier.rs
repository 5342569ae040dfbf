//! Classification of payloads that are already compressed
//!
//! Formats in this list are either lossy media or archives whose bytes gain
//! nothing from a second pass of deflate.

const ALREADY_COMPRESSED_EXTENSIONS: &[&str] = &[
    // images
    "ico", "png", "jpg", "jpeg", "webp",
    // audio / video
    "avi", "mp3", "mp4", "mpeg", "ogg", "ogx", "weba", "webm",
    // archives
    "7z", "bz", "bz2", "gzip", "gz", "rar", "zip", "jar", "war",
    // documents / fonts
    "epub", "pdf", "woff", "woff2",
];

/// Check whether a MIME content type names an already-compressed format.
///
/// Parameters such as `; charset=utf-8` are ignored. The subtype is matched
/// against the known extensions, and structured-syntax suffixes
/// (`application/foo+zip`) are matched segment by segment.
///
/// ```
/// use shrinkwrap_gzip::is_already_compressed_content_type;
///
/// assert!(is_already_compressed_content_type("image/png"));
/// assert!(is_already_compressed_content_type("application/epub+zip"));
/// assert!(!is_already_compressed_content_type("text/html; charset=utf-8"));
/// ```
pub fn is_already_compressed_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_lowercase();
    if content_type.is_empty() {
        return false;
    }

    let mime = content_type
        .split_once(';')
        .map_or(content_type.as_str(), |(mime, _)| mime)
        .trim();

    let subtype = mime.split_once('/').map_or(mime, |(_, subtype)| subtype);

    if is_already_compressed_extension(subtype) {
        return true;
    }

    subtype.contains('+') && subtype.split('+').any(is_already_compressed_extension)
}

/// Check whether a file extension (without the leading dot) names an
/// already-compressed format.
pub fn is_already_compressed_extension(extension: &str) -> bool {
    let extension = extension.trim().to_lowercase();
    if extension.is_empty() {
        return false;
    }
    ALREADY_COMPRESSED_EXTENSIONS.contains(&extension.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_extension_is_compressed() {
        for ext in [
            "ico", "png", "jpg", "jpeg", "webp", "avi", "mp3", "mp4", "mpeg", "ogg", "ogx",
            "weba", "webm", "7z", "bz", "bz2", "gzip", "gz", "rar", "zip", "jar", "war", "epub",
            "pdf", "woff", "woff2",
        ] {
            assert!(is_already_compressed_extension(ext), "{ext} should be compressed");
        }
        assert_eq!(ALREADY_COMPRESSED_EXTENSIONS.len(), 26);
    }

    #[test]
    fn test_text_extensions_are_not_compressed() {
        for ext in ["txt", "text", "html", "json", "js", "css", "svg", "xml", "csv", "wasm"] {
            assert!(!is_already_compressed_extension(ext), "{ext} should compress");
        }
    }

    #[test]
    fn test_extension_normalization() {
        assert!(is_already_compressed_extension(" PNG "));
        assert!(is_already_compressed_extension("Gz"));
        assert!(!is_already_compressed_extension(""));
        assert!(!is_already_compressed_extension("   "));
        assert!(!is_already_compressed_extension(".png"));
    }

    #[test]
    fn test_compressed_content_types() {
        assert!(is_already_compressed_content_type("image/png"));
        assert!(is_already_compressed_content_type("image/jpeg"));
        assert!(is_already_compressed_content_type("application/zip"));
        assert!(is_already_compressed_content_type("application/gzip"));
        assert!(is_already_compressed_content_type("application/pdf"));
        assert!(is_already_compressed_content_type("video/mp4"));
        assert!(is_already_compressed_content_type("font/woff2"));
        assert!(is_already_compressed_content_type("audio/webm; codecs=opus"));
        assert!(is_already_compressed_content_type("  IMAGE/WEBP  "));
    }

    #[test]
    fn test_uncompressed_content_types() {
        assert!(!is_already_compressed_content_type("text/plain"));
        assert!(!is_already_compressed_content_type("text/html"));
        assert!(!is_already_compressed_content_type("text/html; charset=utf-8"));
        assert!(!is_already_compressed_content_type("application/json"));
        assert!(!is_already_compressed_content_type("application/javascript"));
        assert!(!is_already_compressed_content_type("image/svg+xml"));
        assert!(!is_already_compressed_content_type("application/octet-stream"));
        assert!(!is_already_compressed_content_type(""));
    }

    #[test]
    fn test_structured_syntax_suffix() {
        assert!(is_already_compressed_content_type("application/epub+zip"));
        assert!(is_already_compressed_content_type("application/vnd.custom+gzip"));
        assert!(!is_already_compressed_content_type("application/ld+json"));
    }

    #[test]
    fn test_bare_subtype_without_slash() {
        assert!(is_already_compressed_content_type("zip"));
        assert!(!is_already_compressed_content_type("html"));
    }
}
