//! Chapter body extraction.
//!
//! Chapter pages on these sites wrap the readable text in a fixed pair of
//! literal markers. Extraction joins the page into a single line, cuts
//! between the markers and normalizes paragraph breaks. It is best effort:
//! a missing marker leaves that side of the page untrimmed.

use tracing::debug;

use crate::encoding::decode_page;
use crate::siteconfig::{SiteProfile, TextReplacer, strip_line_breaks};

/// Extract the cleaned chapter body from a fetched chapter page.
pub fn extract_chapter(page: &[u8], profile: &SiteProfile) -> String {
    let text = strip_line_breaks(&decode_page(page));
    let body = trim_markers(&text, profile.content_start, profile.content_end);
    TextReplacer::paragraphs().apply(body)
}

/// Slice `text` between `start` and `end`.
///
/// A marker only counts when found past offset 1; a hit at the very start
/// of the buffer is treated as spurious and ignored.
pub fn trim_markers<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let mut body = text;

    if let Some(idx) = find_marker(body, start) {
        debug!(marker = start, offset = idx, "found start marker");
        body = &body[idx + start.len()..];
    }

    if let Some(idx) = find_marker(body, end) {
        debug!(marker = end, offset = idx, "found end marker");
        body = &body[..idx];
    }

    body
}

fn find_marker(haystack: &str, marker: &str) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }
    haystack.find(marker).filter(|&idx| idx > 1)
}
