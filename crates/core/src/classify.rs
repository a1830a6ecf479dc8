//! URL classification.
//!
//! Decides whether a URL points at a book page on one of the supported
//! sites. This is the only gate callers use before handing a URL to the
//! [`Assembler`](crate::Assembler).

use url::Url;

use crate::siteconfig::{SiteProfile, SiteRegistry};

/// Returns the first profile whose URL pattern matches `url`.
///
/// Malformed URLs never match.
pub fn classify<'r>(registry: &'r SiteRegistry, url: &str) -> Option<&'r SiteProfile> {
    if Url::parse(url).is_err() {
        return None;
    }

    registry.profiles().iter().find(|p| p.url_pattern.is_match(url))
}

/// Checks whether `url` belongs to a supported site.
pub fn is_supported(registry: &SiteRegistry, url: &str) -> bool {
    classify(registry, url).is_some()
}
