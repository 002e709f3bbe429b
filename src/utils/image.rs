//! Image attachment helpers
//!
//! MIME detection from file names, `data:` URI formatting and parsing, and
//! human-readable sizes for attachment previews.

use std::path::Path;

use crate::core::message::Attachment;

/// Guess the declared MIME type of a file from its extension.
///
/// Returns `None` for unknown extensions. Non-image types are still reported
/// so callers can say what was rejected.
pub fn mime_from_path(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|mime| mime.to_string())
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

pub fn format_data_uri(mime_type: &str, data: &str) -> String {
    format!("data:{mime_type};base64,{data}")
}

/// Split a `data:<mime>;base64,<payload>` URI into an [`Attachment`],
/// dropping the prefix. Returns `None` for anything else.
pub fn parse_data_uri(uri: &str) -> Option<Attachment> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    if mime_type.is_empty() || payload.is_empty() {
        return None;
    }
    Some(Attachment {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

pub fn human_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let size = bytes as f64;
    if size >= MB {
        format!("{:.1} MB", size / MB)
    } else if size >= KB {
        format!("{:.1} KB", size / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_common_image_extensions() {
        let mime = |name: &str| mime_from_path(&PathBuf::from(name));
        assert_eq!(mime("a.PNG").as_deref(), Some("image/png"));
        assert_eq!(mime("dir/b.jpeg").as_deref(), Some("image/jpeg"));
        assert_eq!(mime("c.webp").as_deref(), Some("image/webp"));
        assert_eq!(mime("noext"), None);
    }

    #[test]
    fn detects_less_common_image_extensions() {
        for name in ["anim.apng", "photo.jxl", "scan.jpe"] {
            let mime = mime_from_path(&PathBuf::from(name)).unwrap();
            assert!(is_image_mime(&mime), "{name} -> {mime}");
        }
    }

    #[test]
    fn non_images_are_not_image_mime() {
        let mime = mime_from_path(&PathBuf::from("notes.txt")).unwrap();
        assert!(!is_image_mime(&mime));
        assert!(is_image_mime("image/gif"));
    }

    #[test]
    fn parse_data_uri_strips_prefix() {
        let attachment = parse_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.data, "iVBORw0KGgo=");
    }

    #[test]
    fn parse_data_uri_rejects_non_base64_forms() {
        assert!(parse_data_uri("data:text/plain,hello").is_none());
        assert!(parse_data_uri("image/png;base64,AAAA").is_none());
        assert!(parse_data_uri("data:image/png;base64,").is_none());
    }

    #[test]
    fn human_size_picks_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024 + 1024 * 512), "3.5 MB");
    }
}
