//! Book assembly.
//!
//! The [`Assembler`] ties the pipeline together: it picks the site profile
//! for the input URL, fetches and parses the table of contents, then
//! fetches every chapter and extracts its body. The TOC is always parsed
//! completely before the first chapter request goes out.
//!
//! # Example
//!
//! ```rust,no_run
//! use quge_core::{Assembler, FetchConfig, HttpFetcher, SiteRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> quge_core::Result<()> {
//! let registry = SiteRegistry::builtin()?;
//! let fetcher = HttpFetcher::new(FetchConfig::default())?;
//! let book = Assembler::new(&registry, &fetcher).assemble("http://www.qu.la/book/24868/").await?;
//! println!("{}: {} chapters", book.title, book.chapters.len());
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use url::Url;

use crate::book::{Book, Chapter};
use crate::content::extract_chapter;
use crate::fetch::{FetchConfig, PageFetcher, browser_headers, origin};
use crate::siteconfig::{SiteProfile, SiteRegistry};
use crate::toc::{TableOfContents, TocEntry, parse_toc};
use crate::{QugeError, Result};

/// Configuration for an assembly run.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Chapter fetches allowed in flight at once (default: 1).
    ///
    /// Output order never depends on this value.
    pub concurrency: usize,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl AssembleConfig {
    pub fn builder() -> AssembleConfigBuilder {
        AssembleConfigBuilder::new()
    }
}

/// Builder for AssembleConfig.
pub struct AssembleConfigBuilder {
    config: AssembleConfig,
}

impl AssembleConfigBuilder {
    pub fn new() -> Self {
        Self { config: AssembleConfig::default() }
    }

    /// Sets the number of concurrent chapter fetches.
    pub fn concurrency(mut self, value: usize) -> Self {
        self.config.concurrency = value.max(1);
        self
    }

    pub fn build(self) -> AssembleConfig {
        self.config
    }
}

impl Default for AssembleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback invoked once per finished chapter with `(index, total, chapter)`.
pub type ProgressHook<'a> = &'a (dyn Fn(usize, usize, &Chapter) + Sync);

/// Drives one extraction run from a TOC URL to a finished [`Book`].
pub struct Assembler<'a, F: PageFetcher + ?Sized> {
    registry: &'a SiteRegistry,
    fetcher: &'a F,
    fetch_config: FetchConfig,
    config: AssembleConfig,
    progress: Option<ProgressHook<'a>>,
}

impl<'a, F: PageFetcher + ?Sized> Assembler<'a, F> {
    pub fn new(registry: &'a SiteRegistry, fetcher: &'a F) -> Self {
        Self {
            registry,
            fetcher,
            fetch_config: FetchConfig::default(),
            config: AssembleConfig::default(),
            progress: None,
        }
    }

    pub fn with_config(mut self, config: AssembleConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings used to build request headers.
    pub fn with_fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch_config = config;
        self
    }

    pub fn on_chapter(mut self, hook: ProgressHook<'a>) -> Self {
        self.progress = Some(hook);
        self
    }

    /// Fetch and parse the table of contents behind `url`.
    ///
    /// Fails when the URL is malformed, its host has no profile, or the TOC
    /// page cannot be fetched.
    pub async fn fetch_toc(&self, url: &str) -> Result<(Url, &'a SiteProfile, TableOfContents)> {
        let toc_url = Url::parse(url).map_err(|e| QugeError::InvalidUrl(e.to_string()))?;
        let host = toc_url
            .host_str()
            .ok_or_else(|| QugeError::InvalidUrl(format!("No host in {}", url)))?;
        let profile = self
            .registry
            .lookup_url(&toc_url)
            .ok_or_else(|| QugeError::UnsupportedSite(host.to_string()))?;

        let headers = browser_headers(&toc_url, &self.fetch_config);
        let page = self.fetcher.fetch(toc_url.as_str(), &headers).await?;
        let toc = parse_toc(&page, profile);

        info!(title = %toc.title, chapters = toc.entries.len(), "parsed table of contents");

        Ok((toc_url, profile, toc))
    }

    /// Build the complete book for a TOC URL.
    ///
    /// Only a failed TOC fetch aborts the run. A chapter that cannot be
    /// fetched is kept with an empty body.
    pub async fn assemble(&self, url: &str) -> Result<Book> {
        let (toc_url, profile, toc) = self.fetch_toc(url).await?;

        let total = toc.entries.len();
        let jobs = toc.entries.into_iter().map(|entry| {
            let chapter_url = resolve_chapter_url(&toc_url, &entry.url);
            self.fetch_chapter(profile, entry, chapter_url)
        });

        let chapters: Vec<Chapter> = stream::iter(jobs)
            .buffered(self.config.concurrency.max(1))
            .enumerate()
            .map(|(index, chapter)| {
                if let Some(hook) = self.progress {
                    hook(index, total, &chapter);
                }
                chapter
            })
            .collect()
            .await;

        Ok(Book { title: toc.title, chapters, source_url: Some(toc_url.to_string()) })
    }

    async fn fetch_chapter(&self, profile: &SiteProfile, entry: TocEntry, url: String) -> Chapter {
        let body = match Url::parse(&url) {
            Ok(parsed) => {
                let headers = browser_headers(&parsed, &self.fetch_config);
                match self.fetcher.fetch(&url, &headers).await {
                    Ok(page) => extract_chapter(&page, profile),
                    Err(e) => {
                        warn!(url = %url, error = %e, "chapter fetch failed, keeping empty body");
                        String::new()
                    }
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "unusable chapter URL, keeping empty body");
                String::new()
            }
        };

        info!(title = %entry.title, url = %url, bytes = body.len(), "chapter");

        Chapter { title: entry.title, url, body }
    }
}

/// Absolute URL for a chapter link found on the TOC page.
///
/// The result always uses the TOC page's scheme and host. Root-relative
/// hrefs are appended verbatim; absolute hrefs keep only their path and
/// query; bare relative hrefs resolve against the TOC page.
pub fn resolve_chapter_url(toc_url: &Url, href: &str) -> String {
    if href.starts_with('/') {
        return format!("{}{}", origin(toc_url), href);
    }

    if let Ok(absolute) = Url::parse(href) {
        let mut path = absolute.path().to_string();
        if let Some(query) = absolute.query() {
            path.push('?');
            path.push_str(query);
        }
        return format!("{}{}", origin(toc_url), path);
    }

    match toc_url.join(href) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}/{}", origin(toc_url), href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapFetcher {
        pages: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages.iter().map(|(u, p)| (u.to_string(), p.as_bytes().to_vec())).collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str, headers: &[(&'static str, String)]) -> Result<Vec<u8>> {
            assert!(headers.iter().any(|(name, _)| *name == "Referer"));
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| QugeError::HttpStatus { url: url.to_string(), status: 404 })
        }
    }

    const TOC: &str = concat!(
        "<html><body>\n",
        "<h1>My Book</h1>\n",
        "<dl><dd><a href=\"/1.html\">Ch1</a></dd><dd><a href=\"/2.html\">Ch2</a></dd></dl>\n",
        "</body></html>\n"
    );

    fn chapter_page(text: &str) -> String {
        format!(
            "<html><body><div id=\"content\"><script>readx();</script>{}<script>chaptererror();</script></body></html>",
            text
        )
    }

    #[test]
    fn test_resolve_root_relative() {
        let toc = Url::parse("http://www.biqudu.com/43_43821/").unwrap();
        assert_eq!(resolve_chapter_url(&toc, "/43_43821/1.html"), "http://www.biqudu.com/43_43821/1.html");
        assert_eq!(resolve_chapter_url(&toc, "/1.html?p=2"), "http://www.biqudu.com/1.html?p=2");
    }

    #[test]
    fn test_resolve_absolute_keeps_toc_origin() {
        let toc = Url::parse("https://www.qu.la/book/1/").unwrap();
        assert_eq!(
            resolve_chapter_url(&toc, "http://mirror.example/book/1/2.html?x=1"),
            "https://www.qu.la/book/1/2.html?x=1"
        );
    }

    #[test]
    fn test_resolve_bare_relative() {
        let toc = Url::parse("http://www.qu.la/book/1/").unwrap();
        assert_eq!(resolve_chapter_url(&toc, "2.html"), "http://www.qu.la/book/1/2.html");
    }

    #[test]
    fn test_config_builder() {
        let config = AssembleConfig::builder().concurrency(0).build();
        assert_eq!(config.concurrency, 1);
        let config = AssembleConfig::builder().concurrency(8).build();
        assert_eq!(config.concurrency, 8);
    }

    #[tokio::test]
    async fn test_assemble_in_toc_order() {
        let registry = SiteRegistry::builtin().unwrap();
        let one = chapter_page("first");
        let two = chapter_page("second");
        let fetcher = MapFetcher::new(&[
            ("http://www.biqudu.com/1_1/", TOC),
            ("http://www.biqudu.com/1.html", one.as_str()),
            ("http://www.biqudu.com/2.html", two.as_str()),
        ]);

        let book = Assembler::new(&registry, &fetcher)
            .assemble("http://www.biqudu.com/1_1/")
            .await
            .unwrap();

        assert_eq!(book.title, "My Book");
        assert_eq!(
            book.chapters,
            vec![
                Chapter::new("Ch1", "http://www.biqudu.com/1.html", "first"),
                Chapter::new("Ch2", "http://www.biqudu.com/2.html", "second"),
            ]
        );
        assert_eq!(book.source_url.as_deref(), Some("http://www.biqudu.com/1_1/"));

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests[0], "http://www.biqudu.com/1_1/");
    }

    #[tokio::test]
    async fn test_failed_chapter_keeps_empty_body() {
        let registry = SiteRegistry::builtin().unwrap();
        let two = chapter_page("second");
        let fetcher = MapFetcher::new(&[
            ("http://www.biqudu.com/1_1/", TOC),
            ("http://www.biqudu.com/2.html", two.as_str()),
        ]);

        let book = Assembler::new(&registry, &fetcher)
            .assemble("http://www.biqudu.com/1_1/")
            .await
            .unwrap();

        assert_eq!(book.chapters.len(), 2);
        assert!(book.chapters[0].body.is_empty());
        assert_eq!(book.chapters[1].body, "second");
    }

    #[tokio::test]
    async fn test_failed_toc_aborts() {
        let registry = SiteRegistry::builtin().unwrap();
        let fetcher = MapFetcher::new(&[]);

        let result = Assembler::new(&registry, &fetcher)
            .assemble("http://www.biqudu.com/1_1/")
            .await;
        assert!(matches!(result, Err(QugeError::HttpStatus { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_unsupported_host() {
        let registry = SiteRegistry::builtin().unwrap();
        let fetcher = MapFetcher::new(&[]);

        let result = Assembler::new(&registry, &fetcher).assemble("http://example.com/1_1/").await;
        assert!(matches!(result, Err(QugeError::UnsupportedSite(host)) if host == "example.com"));
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let registry = SiteRegistry::builtin().unwrap();
        let fetcher = MapFetcher::new(&[]);

        let result = Assembler::new(&registry, &fetcher).assemble("not a url").await;
        assert!(matches!(result, Err(QugeError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_concurrent_fetch_preserves_order() {
        let registry = SiteRegistry::builtin().unwrap();
        let mut toc = String::from("<h1>Many</h1>\n");
        let mut pages = vec![("http://www.biqudu.com/9_9/".to_string(), String::new())];
        for i in 1..=12 {
            toc.push_str(&format!("<dd><a href=\"/{}.html\">C{}</a></dd>\n", i, i));
            pages.push((format!("http://www.biqudu.com/{}.html", i), chapter_page(&format!("body {}", i))));
        }
        pages[0].1 = toc;
        let borrowed: Vec<(&str, &str)> = pages.iter().map(|(u, p)| (u.as_str(), p.as_str())).collect();
        let fetcher = MapFetcher::new(&borrowed);

        let seen = Mutex::new(Vec::new());
        let hook = |index: usize, total: usize, chapter: &Chapter| {
            assert_eq!(total, 12);
            seen.lock().unwrap().push((index, chapter.title.clone()));
        };

        let book = Assembler::new(&registry, &fetcher)
            .with_config(AssembleConfig::builder().concurrency(4).build())
            .on_chapter(&hook)
            .assemble("http://www.biqudu.com/9_9/")
            .await
            .unwrap();

        let titles: Vec<_> = book.chapters.iter().map(|c| c.title.clone()).collect();
        let expected: Vec<_> = (1..=12).map(|i| format!("C{}", i)).collect();
        assert_eq!(titles, expected);
        assert_eq!(book.chapters[11].body, "body 12");

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 12);
        assert_eq!(seen[0], (0, "C1".to_string()));
    }
}
