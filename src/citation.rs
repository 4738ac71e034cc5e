use crate::error::ReaderError;
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sura plus an inclusive verse interval, parsed from a citation such as
/// `2:15-18` or `2:15`. `verse_start <= verse_end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub sura: u32,
    pub verse_start: u32,
    pub verse_end: u32,
}

impl Range {
    pub fn new(sura: u32, verse_start: u32, verse_end: u32) -> Option<Self> {
        if verse_start > verse_end {
            return None;
        }
        Some(Range {
            sura,
            verse_start,
            verse_end,
        })
    }

    #[allow(dead_code)]
    pub fn single(sura: u32, verse: u32) -> Self {
        Range {
            sura,
            verse_start: verse,
            verse_end: verse,
        }
    }

    /// True when `other` lies entirely inside this range's verse interval
    /// for the same sura.
    pub fn contains(&self, other: &Range) -> bool {
        self.sura == other.sura
            && other.verse_start >= self.verse_start
            && other.verse_end <= self.verse_end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.verse_start == self.verse_end {
            write!(f, "{}:{}", self.sura, self.verse_start)
        } else {
            write!(f, "{}:{}-{}", self.sura, self.verse_start, self.verse_end)
        }
    }
}

/// Ranges found in a block of free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub ranges: Vec<Range>,
    /// Citation-shaped matches that still failed to parse (overflow, reversed interval).
    pub malformed: usize,
}

/// A piece of prose: either plain text or a citation the reader can follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProseSegment {
    Text(String),
    Citation(String),
}

impl ProseSegment {
    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        match self {
            ProseSegment::Text(s) | ProseSegment::Citation(s) => s,
        }
    }
}

pub struct CitationParser {
    token_pattern: Regex,
    embedded_pattern: Regex,
}

impl CitationParser {
    pub fn new() -> Result<Self> {
        // ASCII digits only; sura/verse numbers never use other numerals.
        Ok(CitationParser {
            token_pattern: Regex::new(r"^([0-9]+):([0-9]+)(?:-([0-9]+))?$")
                .context("Failed to compile citation token pattern")?,
            embedded_pattern: Regex::new(r"([0-9]+):([0-9]+)(?:-([0-9]+))?")
                .context("Failed to compile embedded citation pattern")?,
        })
    }

    /// Parses a single citation token. Never panics; anything that is not a
    /// well-formed `SURA:VERSE[-VERSE]` comes back as `MalformedCitation`.
    pub fn parse(&self, token: &str) -> Result<Range, ReaderError> {
        let trimmed = token.trim();
        self.token_pattern
            .captures(trimmed)
            .and_then(|caps| Self::range_from_captures(&caps))
            .ok_or_else(|| ReaderError::MalformedCitation(token.to_string()))
    }

    /// Scans free text for every embedded citation.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut extraction = Extraction::default();
        for caps in self.embedded_pattern.captures_iter(text) {
            match Self::range_from_captures(&caps) {
                Some(range) => extraction.ranges.push(range),
                None => extraction.malformed += 1,
            }
        }
        extraction
    }

    /// Splits prose into alternating text and citation segments. Joining the
    /// segments back together yields the input unchanged.
    pub fn split_prose(&self, text: &str) -> Vec<ProseSegment> {
        let mut segments = Vec::new();
        let mut last = 0;

        for m in self.embedded_pattern.find_iter(text) {
            if m.start() > last {
                segments.push(ProseSegment::Text(text[last..m.start()].to_string()));
            }
            segments.push(ProseSegment::Citation(m.as_str().to_string()));
            last = m.end();
        }

        if last < text.len() {
            segments.push(ProseSegment::Text(text[last..].to_string()));
        }

        segments
    }

    fn range_from_captures(caps: &Captures<'_>) -> Option<Range> {
        let sura = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let verse_start = caps.get(2)?.as_str().parse::<u32>().ok()?;
        let verse_end = match caps.get(3) {
            Some(m) => m.as_str().parse::<u32>().ok()?,
            None => verse_start,
        };
        Range::new(sura, verse_start, verse_end)
    }
}
