//! Table-of-contents parsing.
//!
//! A TOC page is scanned line by line with the site's title and item
//! patterns. The result is the book title plus the chapter links in page
//! order, after trimming the mirrored "latest chapters" block some sites
//! render ahead of the full list.

use serde::Serialize;

use crate::encoding::decode_page;
use crate::siteconfig::SiteProfile;

/// One chapter link found on a TOC page, before its body is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    /// Href exactly as written on the page, usually a root-relative path.
    pub url: String,
}

/// Parsed table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    /// Book title, empty when the title pattern never matched.
    pub title: String,
    pub entries: Vec<TocEntry>,
}

/// Parse a fetched TOC page with the given site profile.
///
/// Never fails: a missing title leaves `title` empty and a page without
/// chapter lines yields no entries.
pub fn parse_toc(page: &[u8], profile: &SiteProfile) -> TableOfContents {
    let text = split_items(&decode_page(page));

    let mut title = String::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if title.is_empty()
            && let Some(captures) = profile.title_pattern.captures(line)
        {
            title = captures
                .get(profile.title_group)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            continue;
        }

        if profile.item_pattern.is_match(line) {
            lines.push(line);
        }
    }

    trim_mirrored_prefix(&mut lines);

    let entries = lines
        .into_iter()
        .filter_map(|line| {
            let captures = profile.item_pattern.captures(line)?;
            let url = captures.get(profile.url_group)?.as_str().to_string();
            let title = captures.get(profile.chapter_title_group)?.as_str().to_string();
            Some(TocEntry { title, url })
        })
        .collect();

    TableOfContents { title, entries }
}

/// Put every `</dd>` at the end of its own line.
///
/// Some pages emit the whole chapter list on one physical line.
fn split_items(text: &str) -> String {
    text.replace("</dd>", "</dd>\n")
}

/// Drop leading lines that mirror the tail of the list.
///
/// While the list is non-empty the first line is compared with the line at
/// an end index that starts at the last position and moves back by two on
/// every removal. Because the list also shrinks by one from the front, this
/// pairs the k-th input line with the k-th line from the end, which
/// strips a reversed "latest chapters" block placed above the full list.
/// A list of exactly one line is always emptied.
pub fn trim_mirrored_prefix<T: PartialEq>(lines: &mut Vec<T>) {
    let mut drop = 0;
    let mut end = lines.len() as isize - 1;

    while end >= 0 && (drop + end as usize) < lines.len() && lines[drop] == lines[drop + end as usize] {
        drop += 1;
        end -= 2;
    }

    lines.drain(..drop);
}
