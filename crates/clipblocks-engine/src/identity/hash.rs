use serde_json::json;
use sha2::{Digest, Sha256};

use super::model::{BlockProps, BlockType};
use crate::parsing::inline::StyledSegment;

/// Content hash of a block: SHA-256 hex over canonical JSON of its type,
/// props, inline content and its children's hashes.
///
/// Ids and timestamps never take part, so an unchanged block hashes the same
/// in every reconciliation.
pub fn content_hash(
    block_type: &BlockType,
    props: &BlockProps,
    inline_content: &[StyledSegment],
    child_hashes: &[String],
) -> String {
    // serde_json maps are key-sorted, which makes the text canonical.
    let canonical = json!({
        "type": block_type,
        "props": props,
        "inline": inline_content,
        "children": child_hashes,
    });
    sha256_hex(&canonical.to_string())
}

fn sha256_hex(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::inline::parse_inline;

    fn paragraph(text: &str) -> String {
        content_hash(
            &BlockType::Paragraph,
            &BlockProps::default(),
            &parse_inline(text),
            &[],
        )
    }

    #[test]
    fn same_content_same_hash() {
        assert_eq!(paragraph("hello **world**"), paragraph("hello **world**"));
    }

    #[test]
    fn hash_is_sha256_hex() {
        let h = paragraph("x");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn styling_changes_hash() {
        assert_ne!(paragraph("hello world"), paragraph("hello **world**"));
    }

    #[test]
    fn props_and_children_change_hash() {
        let base = paragraph("x");
        let checked = content_hash(
            &BlockType::Paragraph,
            &BlockProps {
                checked: Some(true),
                ..Default::default()
            },
            &parse_inline("x"),
            &[],
        );
        let with_child = content_hash(
            &BlockType::Paragraph,
            &BlockProps::default(),
            &parse_inline("x"),
            &[base.clone()],
        );
        assert_ne!(base, checked);
        assert_ne!(base, with_child);
    }
}
