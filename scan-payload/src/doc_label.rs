//! Display formatting for document labels returned by the backend.

use std::sync::OnceLock;

use regex::Regex;

fn container_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}[ _/-]+")
            .expect("valid container prefix pattern")
    })
}

/// Strips a leading container id (canonical UUID) and its separators from `doc`.
///
/// Only one prefix is removed; labels without one are returned unchanged.
///
/// ```
/// use scan_payload::format_doc_label;
///
/// assert_eq!(
///     format_doc_label("e05d7522-891a-416a-8bed-cbefc0c64209_A1xx_manual"),
///     "A1xx_manual"
/// );
/// assert_eq!(format_doc_label("A1xx_manual"), "A1xx_manual");
/// ```
pub fn format_doc_label(doc: &str) -> String {
    container_prefix().replace(doc, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_with_any_separator_run() {
        assert_eq!(
            format_doc_label("41F4F2B3-4AE1-42F3-B824-B7430FFB45C5 / Vista 300.pdf"),
            "Vista 300.pdf"
        );
        assert_eq!(
            format_doc_label("41f4f2b3-4ae1-42f3-b824-b7430ffb45c5-_-manual"),
            "manual"
        );
    }

    #[test]
    fn strips_only_once() {
        let doubled = "e05d7522-891a-416a-8bed-cbefc0c64209_41f4f2b3-4ae1-42f3-b824-b7430ffb45c5_x";
        assert_eq!(
            format_doc_label(doubled),
            "41f4f2b3-4ae1-42f3-b824-b7430ffb45c5_x"
        );
    }

    #[test]
    fn requires_separator_after_uuid() {
        let bare = "e05d7522-891a-416a-8bed-cbefc0c64209";
        assert_eq!(format_doc_label(bare), bare);
        let glued = "e05d7522-891a-416a-8bed-cbefc0c64209manual";
        assert_eq!(format_doc_label(glued), glued);
    }

    #[test]
    fn prefix_must_be_at_start() {
        let mid = "manual_e05d7522-891a-416a-8bed-cbefc0c64209_x";
        assert_eq!(format_doc_label(mid), mid);
        assert_eq!(format_doc_label(""), "");
    }
}
