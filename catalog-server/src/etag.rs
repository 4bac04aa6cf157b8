//! Strong ETags for conditional item reads.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use catalog_model::ItemId;

/// Strong fingerprint over the item identity and its last update instant.
pub fn item_etag(id: ItemId, updated_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_uuid().as_bytes());
    hasher.update(b":");
    hasher.update(updated_at.to_rfc3339().as_bytes());
    let digest = hasher.finalize();

    let mut etag = String::with_capacity(2 + digest.len() * 2);
    etag.push('"');
    for byte in digest {
        let _ = write!(etag, "{byte:02x}");
    }
    etag.push('"');
    etag
}

/// Whether an `If-None-Match` header value matches the given ETag.
///
/// Accepts `*`, an exact match, or membership in a comma-separated list;
/// weak prefixes are ignored for comparison.
pub fn if_none_match(header: &str, etag: &str) -> bool {
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| {
            candidate == "*" || candidate.trim_start_matches("W/") == etag
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_changes_with_the_update_timestamp() {
        let id = ItemId::new();
        let first = Utc::now();
        let second = first + chrono::Duration::seconds(1);
        assert_ne!(item_etag(id, first), item_etag(id, second));
        assert_eq!(item_etag(id, first), item_etag(id, first));
    }

    #[test]
    fn if_none_match_accepts_lists_and_wildcard() {
        let etag = "\"abc\"";
        assert!(if_none_match("\"abc\"", etag));
        assert!(if_none_match("\"xyz\", \"abc\"", etag));
        assert!(if_none_match("W/\"abc\"", etag));
        assert!(if_none_match("*", etag));
        assert!(!if_none_match("\"xyz\"", etag));
    }
}
