use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::Result;
use crate::formatters::BookWriter;
use crate::siteconfig::PARAGRAPH_BREAK;

static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").unwrap());

/// Plain text writer.
///
/// Writes the title underlined with `=`, then every chapter under a heading
/// underlined with `-`.
pub struct TextWriter<W: Write> {
    sink: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> BookWriter for TextWriter<W> {
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        if !title.is_empty() {
            writeln!(self.sink, "{}", title)?;
            writeln!(self.sink, "{}", "=".repeat(title.chars().count()))?;
        }
        Ok(())
    }

    fn append_content(&mut self, title: &str, _url: &str, body: &str) -> Result<()> {
        writeln!(self.sink)?;
        writeln!(self.sink, "{}", title)?;
        writeln!(self.sink, "{}", "-".repeat(title.chars().count()))?;
        writeln!(self.sink)?;

        let text = html_to_text(body);
        if !text.is_empty() {
            writeln!(self.sink, "{}", text)?;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Convert an extracted chapter body to plain text.
///
/// Paragraph markers become blank lines, line breaks become newlines, and
/// any remaining tags are dropped.
pub fn html_to_text(body: &str) -> String {
    let text = markup_to_lines(body).replace('\u{a0}', " ");
    text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n").trim().to_string()
}

/// Strip markup from a chapter body, keeping its layout as newlines.
///
/// `</p><p>` becomes a blank line, `<br>` a newline. Entities are decoded,
/// so `&nbsp;` comes back as U+00A0. Unknown entities are left as written.
pub(crate) fn markup_to_lines(body: &str) -> String {
    let text = body.replace(PARAGRAPH_BREAK, "\n\n");
    let text = BR_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    decode_entities(&text)
}

/// Replace character references and common HTML named entities.
pub(crate) fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            resolve_entity(entity).map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn resolve_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }

    let c = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "middot" => '\u{b7}',
        "bull" => '\u{2022}',
        "times" => '\u{d7}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(c)
}
