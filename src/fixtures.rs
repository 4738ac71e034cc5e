use crate::corpus::{hash_bytes, load_corpus, CorpusBundle, CorpusId, CorpusSource, TextLayer};
use crate::models::*;
use crate::page_store::PageStore;
use anyhow::Result;
use std::cell::Cell;
use std::collections::HashMap;

/// A small book: page 5 cites 2:10-20, page 7 narrows to 2:15-18,
/// page 9 covers sura 3, page 13 is an introduction page without citations.
pub const SAMPLE_BOOK: &str = r#"{
    "5": {
        "page": "2:10-20",
        "sura": {
            "2": {
                "verses": {
                    "10": "In their hearts is a disease",
                    "11": "When it is said to them, do not corrupt the earth"
                },
                "encrypted": {
                    "10": "في قلوبهم مرض",
                    "11": "وإذا قيل لهم"
                }
            }
        }
    },
    "7": {
        "page": "2:15-18",
        "sura": {
            "2": {
                "verses": {
                    "15": "GOD mocks them and leaves them in their transgressions",
                    "16": "It is they who bought the straying at the expense of guidance"
                },
                "encrypted": {
                    "15": "قال الله الكتاب",
                    "16": "الله الله نور"
                }
            }
        }
    },
    "9": {
        "page": ["3:1-5", "3:6 & 3:7"],
        "sura": {
            "3": {
                "verses": {
                    "1": "A.L.M.",
                    "2": "GOD there is no other god besides Him"
                }
            }
        }
    },
    "13": {
        "titles": {"0": "Introduction"},
        "text": {"1": "This book confirms 2:15 and explains 3:7."},
        "evidence": {"2": {"lines": {"0": "first line", "1": "second line"}, "ref": ["2:15"]}}
    }
}"#;

/// A translated edition with different pagination for sura 2.
pub const TRANSLATED_BOOK: &str = r#"{
    "6": {
        "page": "2:10-20",
        "sura": {
            "2": {
                "verses": {
                    "10": "Kalplerinde bir hastalık vardır",
                    "15": "ALLAH onlarla alay eder"
                }
            }
        }
    }
}"#;

pub fn sample_corpus() -> Corpus {
    load_corpus(SAMPLE_BOOK.as_bytes(), TextLayer::Translation)
        .map(|(corpus, _)| corpus)
        .unwrap()
}

pub fn page_with_citations(number: u32, citations: &[&str]) -> Page {
    let mut page = Page::new(number);
    page.citations = citations.iter().map(|c| c.to_string()).collect();
    page
}

pub fn single_verse_corpus(sura: u32, verse: u32, text: &str) -> Corpus {
    let mut page = Page::new(1);
    page.verses.push(Verse {
        key: VerseKey::new(sura, verse),
        text: text.to_string(),
    });
    Corpus::new(vec![page])
}

/// Serves corpus bundles from in-memory JSON, keyed by language.
pub struct MapCorpusSource {
    books: HashMap<String, String>,
}

impl MapCorpusSource {
    pub fn new(books: &[(&str, &str)]) -> Self {
        MapCorpusSource {
            books: books
                .iter()
                .map(|(lang, json)| (lang.to_string(), json.to_string()))
                .collect(),
        }
    }
}

impl CorpusSource for MapCorpusSource {
    fn load(&self, language: &str) -> Result<CorpusBundle> {
        let json = self
            .books
            .get(language)
            .ok_or_else(|| anyhow::anyhow!("No corpus bundle for language: {}", language))?;
        let (corpus, report) = load_corpus(json.as_bytes(), TextLayer::Translation)?;
        Ok(CorpusBundle {
            id: CorpusId {
                language: language.to_string(),
                digest: hash_bytes(json.as_bytes()),
            },
            corpus,
            report,
        })
    }
}

/// Keeps the last page in memory instead of on disk.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    page: Cell<Option<u32>>,
}

impl MemoryPageStore {
    pub fn with_page(page: u32) -> Self {
        MemoryPageStore {
            page: Cell::new(Some(page)),
        }
    }
}

impl PageStore for MemoryPageStore {
    fn load(&self) -> Option<u32> {
        self.page.get()
    }

    fn save(&self, page: u32) -> Result<()> {
        self.page.set(Some(page));
        Ok(())
    }
}
