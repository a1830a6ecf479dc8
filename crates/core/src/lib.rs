pub mod assemble;
pub mod book;
pub mod classify;
pub mod content;
pub mod encoding;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod siteconfig;
pub mod toc;

pub use assemble::{AssembleConfig, AssembleConfigBuilder, Assembler, ProgressHook, resolve_chapter_url};
pub use book::{Book, Chapter};
pub use classify::{classify, is_supported};
pub use content::{extract_chapter, trim_markers};
pub use encoding::{decode_page, detect_encoding};
pub use error::{QugeError, Result};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchConfig, Headers, PageFetcher, browser_headers, origin};
pub use formatters::{BookWriter, OutputFormat, output_file_name, write_book};
pub use formatters::{EpubConfig, EpubWriter, JsonWriter, TextWriter};
#[doc(hidden)]
pub use siteconfig::{BUILTIN_PROFILES, ProfileDef, TextReplacer};
pub use siteconfig::{SiteProfile, SiteRegistry};
pub use toc::{TableOfContents, TocEntry, parse_toc, trim_mirrored_prefix};
