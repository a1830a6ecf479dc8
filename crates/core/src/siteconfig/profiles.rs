//! Built-in site profile table.
//!
//! Every supported host gets exactly one row. Supporting a new site means
//! adding a row here; the parsing and extraction code never changes.

/// Raw, uncompiled extraction rules for one host.
///
/// Patterns are line-oriented regular expressions. Group indices are
/// per-site because some layouts carry extra capture groups ahead of the
/// chapter link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileDef {
    /// Exact host name, e.g. `www.qu.la`.
    pub host: &'static str,
    /// Pattern a book's table-of-contents URL must match.
    pub url_pattern: &'static str,
    /// Pattern locating the book title on a single TOC line.
    pub title_pattern: &'static str,
    /// Capture group holding the title.
    pub title_group: usize,
    /// Pattern matching one chapter line of the TOC.
    pub item_pattern: &'static str,
    /// Capture group holding the chapter href.
    pub url_group: usize,
    /// Capture group holding the chapter title.
    pub chapter_title_group: usize,
    /// Literal text right before a chapter's readable body.
    pub content_start: &'static str,
    /// Literal text right after a chapter's readable body.
    pub content_end: &'static str,
}

const H1_TITLE: &str = r"<h1>([^<]+)</h1>$";
const DD_ITEM: &str = r#"<dd>\s*<a\s*href="([^"]+)">([^<]+)</a></dd>$"#;

/// Profiles for the supported biquge-family mirrors.
pub static BUILTIN_PROFILES: &[ProfileDef] = &[
    ProfileDef {
        host: "www.biqudu.com",
        url_pattern: r"^https?://www\.biqudu\.com/[0-9]+_[0-9]+/",
        title_pattern: H1_TITLE,
        title_group: 1,
        item_pattern: DD_ITEM,
        url_group: 1,
        chapter_title_group: 2,
        content_start: r#"<div id="content"><script>readx();</script>"#,
        content_end: r#"<script>chaptererror();</script>"#,
    },
    ProfileDef {
        host: "www.biquge.cm",
        url_pattern: r"^https?://www\.biquge\.cm/[0-9]+/[0-9]+/",
        title_pattern: H1_TITLE,
        title_group: 1,
        item_pattern: DD_ITEM,
        url_group: 1,
        chapter_title_group: 2,
        content_start: r#"<div id="content">&nbsp;&nbsp;&nbsp;&nbsp;"#,
        content_end: r#"找本站搜索"笔趣阁CM" 或输入网址:www.biquge.cm</div>"#,
    },
    ProfileDef {
        host: "www.qu.la",
        url_pattern: r"^https?://www\.qu\.la/book/[0-9]+/",
        title_pattern: H1_TITLE,
        title_group: 1,
        item_pattern: r#"<dd>\s*<a\s*(style=""\s*)?href="([^"]+)">([^<]+)</a></dd>$"#,
        url_group: 2,
        chapter_title_group: 3,
        content_start: r#"<div id="content">"#,
        content_end: r#"<script>chaptererror();</script>"#,
    },
    ProfileDef {
        host: "www.biqugezw.com",
        url_pattern: r"^https?://www\.biqugezw\.com/[0-9]+_[0-9]+/",
        title_pattern: H1_TITLE,
        title_group: 1,
        item_pattern: DD_ITEM,
        url_group: 1,
        chapter_title_group: 2,
        content_start: r#"<div id="content">&nbsp;&nbsp;&nbsp;&nbsp;一秒记住【笔趣阁中文网<a href="http://www.biqugezw.com" target="_blank">www.biqugezw.com</a>】，为您提供精彩小说阅读。"#,
        content_end: r#"手机用户请浏览m.biqugezw.com阅读，更优质的阅读体验。</div>"#,
    },
    ProfileDef {
        host: "www.630zw.com",
        url_pattern: r"^https?://www\.630zw\.com/[0-9]+_[0-9]+/",
        title_pattern: H1_TITLE,
        title_group: 1,
        item_pattern: DD_ITEM,
        url_group: 1,
        chapter_title_group: 2,
        content_start: r#"<div id="content">&nbsp;&nbsp;&nbsp;&nbsp;"#,
        content_end: r#"(新笔趣阁：biqugee.cc，手机笔趣阁 m.biqugee.cc )</div>"#,
    },
    ProfileDef {
        host: "www.biquge.lu",
        url_pattern: r"^https?://www\.biquge\.lu/book/[0-9]+/",
        title_pattern: r"<h2>([^<]+)</h2>$",
        title_group: 1,
        item_pattern: DD_ITEM,
        url_group: 1,
        chapter_title_group: 2,
        content_start: r#"<div id="content" class="showtxt">&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;"#,
        content_end: r#"请记住本书首发域名：www.biquge.lu。笔趣阁手机版阅读网址：m.biquge.lu</div>"#,
    },
];
