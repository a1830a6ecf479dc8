//! Output writers for assembled books.
//!
//! Every writer follows the same four-step protocol: [`BookWriter::begin`],
//! [`BookWriter::set_title`], one [`BookWriter::append_content`] per chapter
//! in book order, then [`BookWriter::end`] which finalizes the output.

pub mod epub;
pub mod json;
pub mod text;

use std::str::FromStr;

pub use epub::{EpubConfig, EpubWriter};
pub use json::JsonWriter;
pub use text::{TextWriter, html_to_text};

use crate::{Book, Result};

/// Destination for an assembled book.
pub trait BookWriter {
    /// Start a new document.
    fn begin(&mut self) -> Result<()>;

    /// Set the document title.
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Append one chapter.
    fn append_content(&mut self, title: &str, url: &str, body: &str) -> Result<()>;

    /// Finalize and persist the document.
    fn end(&mut self) -> Result<()>;
}

/// Feed a whole book through a writer, in chapter order.
pub fn write_book<W: BookWriter + ?Sized>(book: &Book, writer: &mut W) -> Result<()> {
    writer.begin()?;
    writer.set_title(&book.title)?;

    for chapter in &book.chapters {
        writer.append_content(&chapter.title, &chapter.url, &chapter.body)?;
    }

    writer.end()
}

/// Output format for a written book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// EPUB container.
    #[default]
    Epub,
    /// Plain text.
    Text,
    /// Structured JSON.
    Json,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Epub => "epub",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "epub" => Ok(Self::Epub),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: epub, text, json", s)),
        }
    }
}

/// Default file name for a book: its title with path-hostile characters
/// replaced, or `book` when the title is empty.
pub fn output_file_name(title: &str, format: OutputFormat) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = if cleaned.is_empty() { "book" } else { cleaned.as_str() };
    format!("{}.{}", stem, format.extension())
}
