//! Page decoding.
//!
//! Mirror sites in this family serve GBK as often as UTF-8. Pages are
//! decoded to UTF-8 once, right after fetching, so profile patterns and
//! content markers can be written as ordinary UTF-8 text.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

static CHARSET_META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;/]+)"#).unwrap());

/// Only the page head is scanned for a declaration
const SNIFF_LEN: usize = 1024;

/// Detect the declared charset of a page.
///
/// Covers both `<meta charset="gbk">` and the older
/// `<meta http-equiv="Content-Type" content="text/html; charset=gbk">`.
/// Falls back to UTF-8 when nothing usable is declared.
pub fn detect_encoding(page: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&page[..page.len().min(SNIFF_LEN)]);

    CHARSET_META_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode page bytes to UTF-8 text, replacing invalid sequences.
pub fn decode_page(page: &[u8]) -> String {
    let encoding = detect_encoding(page);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(page).into_owned();
    }

    let (decoded, _, _) = encoding.decode(page);
    decoded.into_owned()
}
