//! Assembled book model.
//!
//! A [`Book`] is built by one assembly run and handed to a
//! [`BookWriter`](crate::formatters::BookWriter). Nothing is persisted or
//! reused between runs.

use serde::Serialize;

use crate::Result;

/// One chapter with its fetched body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    /// Absolute URL the body was fetched from.
    pub url: String,
    /// Cleaned body markup; empty when the fetch failed.
    pub body: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), body: body.into() }
    }

    /// Whether the chapter came back without any text
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A titled, ordered collection of chapters.
///
/// Chapter order always equals the order of the parsed table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Title taken from the TOC page; empty if the page had none.
    pub title: String,
    pub chapters: Vec<Chapter>,
    /// URL of the table-of-contents page the book was built from.
    pub source_url: Option<String>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }

    pub fn push(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Total body size in bytes
    pub fn total_bytes(&self) -> usize {
        self.chapters.iter().map(|c| c.body.len()).sum()
    }

    /// Chapters whose body could not be fetched or extracted
    pub fn empty_chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter().filter(|c| c.is_empty())
    }

    /// Gets the book as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
