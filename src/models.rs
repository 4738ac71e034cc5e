use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifies a verse within one corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseKey {
    pub sura: u32,
    pub verse: u32,
}

impl VerseKey {
    pub fn new(sura: u32, verse: u32) -> Self {
        VerseKey { sura, verse }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub key: VerseKey,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Title(String),
    Text(String),
    Evidence {
        lines: Vec<String>,
        refs: Vec<String>,
    },
}

impl BlockKind {
    fn rank(&self) -> u8 {
        match self {
            BlockKind::Title(_) => 0,
            BlockKind::Text(_) => 1,
            BlockKind::Evidence { .. } => 2,
        }
    }
}

/// Introductory/appendix content shown on a page, positioned by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub order: u32,
    pub kind: BlockKind,
}

/// One physical page of the book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    /// Raw citation fields, e.g. `"2:1-5"`. Free text; may hold several citations.
    pub citations: Vec<String>,
    /// Verses printed on this page, ordered by (sura, verse).
    pub verses: Vec<Verse>,
    pub blocks: Vec<ContentBlock>,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Page {
            number,
            ..Default::default()
        }
    }

    /// Blocks sorted by `order`; ties keep titles before text before evidence.
    pub fn ordered_blocks(&self) -> Vec<&ContentBlock> {
        let mut blocks: Vec<&ContentBlock> = self.blocks.iter().collect();
        blocks.sort_by_key(|b| (b.order, b.kind.rank()));
        blocks
    }
}

/// Read-only in-memory book. Derived indexes are built from it and never
/// write back into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pages: BTreeMap<u32, Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub pages: usize,
    pub suras: usize,
    pub verses: usize,
    pub citations: usize,
}

impl Corpus {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Corpus {
            pages: pages.into_iter().map(|p| (p.number, p)).collect(),
        }
    }

    /// Pages in ascending page-number order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.get(&number)
    }

    pub fn verses(&self) -> impl Iterator<Item = &Verse> {
        self.pages.values().flat_map(|p| p.verses.iter())
    }

    pub fn stats(&self) -> CorpusStats {
        let suras: BTreeSet<u32> = self.verses().map(|v| v.key.sura).collect();
        CorpusStats {
            pages: self.pages.len(),
            suras: suras.len(),
            verses: self.verses().count(),
            citations: self.pages().map(|p| p.citations.len()).sum(),
        }
    }
}
