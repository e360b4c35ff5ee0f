//! Identifier rewriting for amplified result sets.
//!
//! When a stream replays rows across pages or overflow rounds, every copy of
//! a document would otherwise carry the same embedded identifiers. The
//! rewrite prepends a per-round prefix to every canonical UUID token
//! (8-4-4-4-12 hexadecimal groups), keeping the original token as a suffix
//! so the mapping stays reversible and collision-free across
//! (page, overflow) pairs.

/// Length of a canonical UUID text token.
const UUID_LEN: usize = 36;

/// Build the rewrite prefix for a (page, overflow) position.
///
/// `p<page>` when past page 1, `o<overflow>` after at least one completed
/// replay round, joined by a hyphen when both apply. Returns `None` on
/// page 1 with overflow 0, where documents pass through untouched.
pub fn round_prefix(page: u64, overflow: u64) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    if page > 1 {
        parts.push(format!("p{page}"));
    }
    if overflow > 0 {
        parts.push(format!("o{overflow}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("-"))
    }
}

/// Rewrite every canonical UUID token in `doc` as `<prefix>-<token>`.
///
/// Pure token-scan transform; the input comes back unchanged when it
/// contains no UUID-shaped token. Stripping the prefix segments from a
/// rewritten token recovers the original exactly.
pub fn rewrite_identifiers(doc: &str, prefix: &str) -> String {
    let bytes = doc.as_bytes();
    let mut out = String::with_capacity(doc.len() + (prefix.len() + 1) * 8);
    let mut copied = 0;
    let mut i = 0;

    while i + UUID_LEN <= bytes.len() {
        if is_uuid_token(&bytes[i..i + UUID_LEN]) {
            out.push_str(&doc[copied..i]);
            out.push_str(prefix);
            out.push('-');
            out.push_str(&doc[i..i + UUID_LEN]);
            i += UUID_LEN;
            copied = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&doc[copied..]);
    out
}

/// Canonical 8-4-4-4-12 hexadecimal form, case-insensitive.
fn is_uuid_token(window: &[u8]) -> bool {
    debug_assert_eq!(window.len(), UUID_LEN);
    window.iter().enumerate().all(|(i, &b)| match i {
        8 | 13 | 18 | 23 => b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "b07a873d-23ff-4a8c-94f7-52e4d8a5f9c1";

    #[test]
    fn no_prefix_on_first_page() {
        assert_eq!(round_prefix(1, 0), None);
    }

    #[test]
    fn prefix_segments() {
        assert_eq!(round_prefix(3, 0).as_deref(), Some("p3"));
        assert_eq!(round_prefix(1, 2).as_deref(), Some("o2"));
        assert_eq!(round_prefix(2, 1).as_deref(), Some("p2-o1"));
    }

    #[test]
    fn rewrites_embedded_token() {
        let doc = format!(r#"{{"id":"{TOKEN}"}}"#);
        let out = rewrite_identifiers(&doc, "p3");
        assert_eq!(out, format!(r#"{{"id":"p3-{TOKEN}"}}"#));
    }

    #[test]
    fn rewrites_every_occurrence() {
        let doc = format!(r#"{{"id":"{TOKEN}","ref":"Document/{TOKEN}"}}"#);
        let out = rewrite_identifiers(&doc, "o1");
        assert_eq!(out.matches(&format!("o1-{TOKEN}")).count(), 2);
    }

    #[test]
    fn original_token_is_recoverable() {
        let out = rewrite_identifiers(TOKEN, "p2-o1");
        let stripped = out
            .strip_prefix("p2-")
            .and_then(|s| s.strip_prefix("o1-"))
            .unwrap();
        assert_eq!(stripped, TOKEN);
    }

    #[test]
    fn ignores_non_uuid_text() {
        let doc = r#"{"hash":"deadbeefdeadbeefdeadbeefdeadbeefdead","n":12345678}"#;
        assert_eq!(rewrite_identifiers(doc, "p2"), doc);
    }

    #[test]
    fn ignores_malformed_groups() {
        // hyphens in the wrong places
        let doc = "b07a873d23-ff-4a8c-94f7-52e4d8a5f9c1";
        assert_eq!(rewrite_identifiers(doc, "p2"), doc);
    }

    #[test]
    fn uppercase_hex_matches() {
        let token = "B07A873D-23FF-4A8C-94F7-52E4D8A5F9C1";
        let out = rewrite_identifiers(token, "o3");
        assert_eq!(out, format!("o3-{token}"));
    }

    #[test]
    fn multibyte_text_passes_through() {
        let doc = format!(r#"{{"note":"café – ☃","id":"{TOKEN}"}}"#);
        let out = rewrite_identifiers(&doc, "p2");
        assert!(out.contains(&format!("p2-{TOKEN}")));
        assert!(out.contains('☃'));
    }
}
