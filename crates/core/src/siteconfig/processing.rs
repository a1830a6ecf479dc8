/// Literal substitutions applied to every extracted chapter body.
///
/// The first two turn double line breaks into a paragraph boundary, the
/// last drops the full-width indentation these sites put before paragraphs.
pub const PARAGRAPH_REPLACEMENTS: &[(&str, &str)] = &[
    ("<br /><br />&nbsp;&nbsp;&nbsp;&nbsp;", "</p><p>"),
    ("<br/><br/>", "</p><p>"),
    ("\u{3000}\u{3000}", ""),
];

/// Paragraph boundary emitted by [`PARAGRAPH_REPLACEMENTS`]
pub const PARAGRAPH_BREAK: &str = "</p><p>";

/// Ordered find/replace pass over text
#[derive(Debug, Clone, Copy)]
pub struct TextReplacer {
    replacements: &'static [(&'static str, &'static str)],
}

impl TextReplacer {
    pub fn new(replacements: &'static [(&'static str, &'static str)]) -> Self {
        Self { replacements }
    }

    /// Replacer for chapter paragraph normalization
    pub fn paragraphs() -> Self {
        Self::new(PARAGRAPH_REPLACEMENTS)
    }

    /// Apply all replacements in order
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();

        for (find, replace) in self.replacements {
            if !find.is_empty() {
                result = result.replace(find, replace);
            }
        }

        result
    }
}

/// Remove CRLF, CR and LF so a page becomes one continuous run of text
pub fn strip_line_breaks(text: &str) -> String {
    text.replace("\r\n", "").replace(['\r', '\n'], "")
}
