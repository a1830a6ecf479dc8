//! Compiled site profiles.
//!
//! [`SiteRegistry::builtin`] compiles every row of
//! [`BUILTIN_PROFILES`] once at startup. The registry is then passed by
//! reference to the classifier and the assembler; nothing registers itself
//! globally.

use crate::error::{QugeError, Result};
use crate::siteconfig::profiles::{BUILTIN_PROFILES, ProfileDef};
use regex::Regex;
use url::Url;

/// Compiled extraction rules for one host.
///
/// Built once from a [`ProfileDef`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Exact host name the profile is registered under.
    pub host: &'static str,
    /// Anchored pattern a supported TOC URL must match.
    pub url_pattern: Regex,
    /// Line pattern carrying the book title.
    pub title_pattern: Regex,
    pub title_group: usize,
    /// Line pattern for one chapter link.
    pub item_pattern: Regex,
    pub url_group: usize,
    pub chapter_title_group: usize,
    /// Literal marker right before the chapter body.
    pub content_start: &'static str,
    /// Literal marker right after the chapter body.
    pub content_end: &'static str,
}

impl SiteProfile {
    /// Compile a raw profile row
    pub fn compile(def: &ProfileDef) -> Result<Self> {
        Ok(Self {
            host: def.host,
            url_pattern: compile_pattern(def.host, def.url_pattern)?,
            title_pattern: compile_pattern(def.host, def.title_pattern)?,
            title_group: def.title_group,
            item_pattern: compile_pattern(def.host, def.item_pattern)?,
            url_group: def.url_group,
            chapter_title_group: def.chapter_title_group,
            content_start: def.content_start,
            content_end: def.content_end,
        })
    }
}

fn compile_pattern(host: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| QugeError::InvalidPattern(format!("{}: {}", host, e)))
}

/// Host-keyed table of site profiles.
///
/// Created once at startup and handed by reference to the classifier and
/// the assembler.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    profiles: Vec<SiteProfile>,
}

impl SiteRegistry {
    /// Registry with every built-in profile
    pub fn builtin() -> Result<Self> {
        Self::from_defs(BUILTIN_PROFILES)
    }

    /// Registry over a custom profile table
    pub fn from_defs(defs: &[ProfileDef]) -> Result<Self> {
        let profiles = defs.iter().map(SiteProfile::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self { profiles })
    }

    /// Look up a profile by exact host name.
    ///
    /// No normalization happens here: `qu.la` does not find `www.qu.la`.
    pub fn lookup(&self, host: &str) -> Option<&SiteProfile> {
        self.profiles.iter().find(|p| p.host == host)
    }

    /// Look up the profile for a parsed URL's host
    pub fn lookup_url(&self, url: &Url) -> Option<&SiteProfile> {
        url.host_str().and_then(|host| self.lookup(host))
    }

    /// Registered hosts, in table order
    pub fn hosts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.iter().map(|p| p.host)
    }

    pub fn profiles(&self) -> &[SiteProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_compiles() {
        let registry = SiteRegistry::builtin().unwrap();
        assert_eq!(registry.len(), BUILTIN_PROFILES.len());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_lookup_exact_host() {
        let registry = SiteRegistry::builtin().unwrap();
        let profile = registry.lookup("www.qu.la").unwrap();
        assert_eq!(profile.url_group, 2);
        assert_eq!(profile.chapter_title_group, 3);
    }

    #[test]
    fn test_lookup_is_not_normalized() {
        let registry = SiteRegistry::builtin().unwrap();
        assert!(registry.lookup("qu.la").is_none());
        assert!(registry.lookup("WWW.QU.LA").is_none());
        assert!(registry.lookup("www.qu.la.").is_none());
    }

    #[test]
    fn test_lookup_url() {
        let registry = SiteRegistry::builtin().unwrap();
        let url = Url::parse("http://www.biquge.lu/book/123/").unwrap();
        assert_eq!(registry.lookup_url(&url).unwrap().host, "www.biquge.lu");

        let url = Url::parse("http://example.com/book/123/").unwrap();
        assert!(registry.lookup_url(&url).is_none());
    }

    #[test]
    fn test_hosts_in_table_order() {
        let registry = SiteRegistry::builtin().unwrap();
        let hosts: Vec<_> = registry.hosts().collect();
        assert_eq!(hosts.first(), Some(&"www.biqudu.com"));
        assert_eq!(hosts.last(), Some(&"www.biquge.lu"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let defs = [ProfileDef {
            host: "broken.example",
            url_pattern: r"^http://broken\.example/(",
            title_pattern: r"<h1>([^<]+)</h1>$",
            title_group: 1,
            item_pattern: r#"<dd><a href="([^"]+)">([^<]+)</a></dd>$"#,
            url_group: 1,
            chapter_title_group: 2,
            content_start: "<div>",
            content_end: "</div>",
        }];

        let result = SiteRegistry::from_defs(&defs);
        assert!(matches!(result, Err(QugeError::InvalidPattern(msg)) if msg.contains("broken.example")));
    }
}
