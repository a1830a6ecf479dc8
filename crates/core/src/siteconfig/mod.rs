pub mod processing;
pub mod profiles;
pub mod registry;

pub use processing::{PARAGRAPH_BREAK, PARAGRAPH_REPLACEMENTS, TextReplacer, strip_line_breaks};
pub use profiles::{BUILTIN_PROFILES, ProfileDef};
pub use registry::{SiteProfile, SiteRegistry};
