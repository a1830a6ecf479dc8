//! EPUB writer.
//!
//! Chapters are buffered in memory and the whole container is written on
//! [`BookWriter::end`]: an uncompressed `mimetype` first, then
//! `META-INF/container.xml`, the OPF package, the NCX table of contents, a
//! title page and one XHTML file per chapter.

use std::io::{Seek, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::formatters::BookWriter;
use crate::formatters::text::markup_to_lines;
use crate::{QugeError, Result};

const UNTITLED: &str = "Untitled";

/// Configuration for EPUB output.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Value of `dc:language` (default `zh`).
    pub language: String,
    /// Value of `dc:identifier`; derived from the title when unset.
    pub identifier: Option<String>,
    /// Deflate level for everything except `mimetype` (default 6).
    pub compression_level: i64,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self { language: "zh".to_string(), identifier: None, compression_level: 6 }
    }
}

struct PendingChapter {
    title: String,
    url: String,
    body: String,
}

/// EPUB writer over any seekable sink.
pub struct EpubWriter<W: Write + Seek> {
    sink: W,
    config: EpubConfig,
    started: bool,
    title: String,
    chapters: Vec<PendingChapter>,
}

impl<W: Write + Seek> EpubWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, EpubConfig::default())
    }

    pub fn with_config(sink: W, config: EpubConfig) -> Self {
        Self { sink, config, started: false, title: String::new(), chapters: Vec::new() }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn display_title(&self) -> &str {
        if self.title.trim().is_empty() { UNTITLED } else { &self.title }
    }

    fn identifier(&self) -> String {
        self.config
            .identifier
            .clone()
            .unwrap_or_else(|| format!("urn:quge:{}", self.display_title()))
    }

    fn require_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(QugeError::ArchiveError("EPUB writer used before begin()".to_string()))
        }
    }
}

impl<W: Write + Seek> BookWriter for EpubWriter<W> {
    fn begin(&mut self) -> Result<()> {
        self.started = true;
        self.title.clear();
        self.chapters.clear();
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.require_started()?;
        self.title = title.to_string();
        Ok(())
    }

    fn append_content(&mut self, title: &str, url: &str, body: &str) -> Result<()> {
        self.require_started()?;
        self.chapters.push(PendingChapter {
            title: title.to_string(),
            url: url.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.require_started()?;

        let title = self.display_title().to_string();
        let identifier = self.identifier();
        let opf = generate_opf(&title, &identifier, &self.config.language, self.chapters.len());
        let ncx = generate_ncx(&title, &identifier, &self.chapters);
        let title_page = xhtml_page(&title, &self.config.language, "", &format!("<h1>{}</h1>", escape_xml(&title)));
        let pages: Vec<String> = self
            .chapters
            .iter()
            .map(|c| {
                let content = format!("<h2>{}</h2>\n{}", escape_xml(&c.title), xhtml_body(&c.body));
                xhtml_page(&c.title, &self.config.language, &c.url, &content)
            })
            .collect();

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.config.compression_level));

        let mut zip = ZipWriter::new(&mut self.sink);

        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(opf.as_bytes())?;

        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(ncx.as_bytes())?;

        zip.start_file("OEBPS/title.xhtml", deflated)?;
        zip.write_all(title_page.as_bytes())?;

        for (i, page) in pages.iter().enumerate() {
            zip.start_file(format!("OEBPS/{}", chapter_file(i)), deflated)?;
            zip.write_all(page.as_bytes())?;
        }

        zip.finish()?;
        self.sink.flush()?;
        self.started = false;
        Ok(())
    }
}

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

fn chapter_file(index: usize) -> String {
    format!("chapter_{:04}.xhtml", index + 1)
}

fn chapter_id(index: usize) -> String {
    format!("chapter_{:04}", index + 1)
}

fn generate_opf(title: &str, identifier: &str, language: &str, chapter_count: usize) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    opf.push_str(&format!("    <dc:title>{}</dc:title>\n", escape_xml(title)));
    opf.push_str(&format!("    <dc:language>{}</dc:language>\n", escape_xml(language)));
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(identifier)
    ));
    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str("    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n");
    opf.push_str("    <item id=\"title\" href=\"title.xhtml\" media-type=\"application/xhtml+xml\"/>\n");

    for i in 0..chapter_count {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            chapter_id(i),
            chapter_file(i)
        ));
    }
    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    opf.push_str("    <itemref idref=\"title\"/>\n");

    for i in 0..chapter_count {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", chapter_id(i)));
    }
    opf.push_str("  </spine>\n</package>\n");
    opf
}

fn generate_ncx(title: &str, identifier: &str, chapters: &[PendingChapter]) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    ncx.push_str(&format!("    <meta name=\"dtb:uid\" content=\"{}\"/>\n", escape_xml(identifier)));
    ncx.push_str(
        r#"    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
"#,
    );
    ncx.push_str(&format!("  <docTitle><text>{}</text></docTitle>\n", escape_xml(title)));
    ncx.push_str("  <navMap>\n");

    for (i, chapter) in chapters.iter().enumerate() {
        let play_order = i + 1;
        ncx.push_str(&format!(
            "    <navPoint id=\"navPoint-{}\" playOrder=\"{}\">\n",
            play_order, play_order
        ));
        ncx.push_str(&format!(
            "      <navLabel><text>{}</text></navLabel>\n",
            escape_xml(&chapter.title)
        ));
        ncx.push_str(&format!("      <content src=\"{}\"/>\n", chapter_file(i)));
        ncx.push_str("    </navPoint>\n");
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn xhtml_page(title: &str, language: &str, source: &str, content: &str) -> String {
    let source_meta = if source.is_empty() {
        String::new()
    } else {
        format!("\n<meta name=\"source\" content=\"{}\"/>", escape_xml(source))
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
<title>{title}</title>{source_meta}
</head>
<body>
{content}
</body>
</html>
"#,
        lang = escape_xml(language),
        title = escape_xml(title),
        source_meta = source_meta,
        content = content,
    )
}

/// Rebuild an extracted chapter body as XHTML paragraphs.
///
/// Site markup is not trusted to be well-formed: tags are dropped, entities
/// decoded, and the text re-escaped. Blank lines start a new `<p>`, single
/// newlines become `<br/>`, and U+00A0 is written as `&#160;`.
fn xhtml_body(body: &str) -> String {
    let text: String = markup_to_lines(body)
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect();

    let paragraphs: Vec<String> = text
        .split("\n\n")
        .map(|p| p.trim_matches(|c: char| c == '\n' || c == ' '))
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<_> = p.lines().map(|line| escape_xml(line.trim_end_matches(' '))).collect();
            format!("<p>{}</p>", lines.join("<br/>").replace('\u{a0}', "&#160;"))
        })
        .collect();

    if paragraphs.is_empty() { "<p></p>".to_string() } else { paragraphs.join("\n") }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
