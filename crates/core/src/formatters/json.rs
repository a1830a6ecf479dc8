use std::io::Write;

use crate::formatters::BookWriter;
use crate::{Book, Chapter, Result};

/// JSON writer.
///
/// Collects the book and serializes it in one go on [`BookWriter::end`].
pub struct JsonWriter<W: Write> {
    sink: W,
    book: Book,
    pretty: bool,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, book: Book::default(), pretty: true }
    }

    /// Emit compact single-line JSON instead of pretty output.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> BookWriter for JsonWriter<W> {
    fn begin(&mut self) -> Result<()> {
        self.book = Book::default();
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.book.title = title.to_string();
        Ok(())
    }

    fn append_content(&mut self, title: &str, url: &str, body: &str) -> Result<()> {
        self.book.push(Chapter::new(title, url, body));
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.sink, &self.book)?;
        } else {
            serde_json::to_writer(&mut self.sink, &self.book)?;
        }
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::write_book;

    #[test]
    fn test_json_writer_round_trip_fields() {
        let mut book = Book::new("T");
        book.push(Chapter::new("one", "http://h/1.html", "a</p><p>b"));

        let mut writer = JsonWriter::new(Vec::new()).compact();
        write_book(&book, &mut writer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["chapters"][0]["title"], "one");
        assert_eq!(value["chapters"][0]["body"], "a</p><p>b");
    }

    #[test]
    fn test_json_writer_begin_resets() {
        let mut writer = JsonWriter::new(Vec::new());
        writer.begin().unwrap();
        writer.append_content("stale", "u", "").unwrap();
        writer.begin().unwrap();
        writer.set_title("fresh").unwrap();
        writer.end().unwrap();

        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
        assert_eq!(value["chapters"].as_array().unwrap().len(), 0);
        assert_eq!(value["title"], "fresh");
    }
}
