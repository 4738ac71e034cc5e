//! Whole-corpus word search: occurrence counting, verse filtering and the
//! word/verse selection toggles of the concordance view.

use crate::models::{Corpus, VerseKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sura to (verse to text), flattened from every page of a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConcordanceIndex {
    suras: BTreeMap<u32, BTreeMap<u32, String>>,
}

impl ConcordanceIndex {
    /// A verse printed on more than one page keeps the later page's text.
    pub fn build(corpus: &Corpus) -> Self {
        let mut suras: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();
        for verse in corpus.verses() {
            suras
                .entry(verse.key.sura)
                .or_default()
                .insert(verse.key.verse, verse.text.clone());
        }
        ConcordanceIndex { suras }
    }

    pub fn verse_text(&self, key: VerseKey) -> Option<&str> {
        self.suras.get(&key.sura)?.get(&key.verse).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn sura(&self, sura: u32) -> Option<&BTreeMap<u32, String>> {
        self.suras.get(&sura)
    }

    pub fn verse_count(&self) -> usize {
        self.suras.values().map(BTreeMap::len).sum()
    }

    /// Counts whitespace-separated tokens that contain `word`, over all verses.
    /// A token holding the word twice counts once.
    pub fn count_occurrences(&self, word: Option<&str>) -> usize {
        let Some(word) = word.filter(|w| !w.is_empty()) else {
            return 0;
        };
        self.suras
            .values()
            .flat_map(BTreeMap::values)
            .map(|text| {
                text.split_whitespace()
                    .filter(|token| token.trim().contains(word))
                    .count()
            })
            .sum()
    }

    /// Every verse whose text contains `word`, in (sura, verse) order.
    pub fn filtered(&self, word: Option<&str>) -> Vec<(VerseKey, &str)> {
        self.suras
            .iter()
            .flat_map(|(sura, verses)| {
                filter_by_word(verses, word)
                    .into_iter()
                    .map(move |(verse, text)| (VerseKey::new(*sura, verse), text))
            })
            .collect()
    }
}

/// Keeps the verses of one sura whose text contains `word` as a substring.
/// Without a word nothing is filtered out.
pub fn filter_by_word<'a>(
    verses: &'a BTreeMap<u32, String>,
    word: Option<&str>,
) -> Vec<(u32, &'a str)> {
    verses
        .iter()
        .filter(|(_, text)| word.map_or(true, |w| text.contains(w)))
        .map(|(verse, text)| (*verse, text.as_str()))
        .collect()
}

/// Selecting the current value again clears it.
pub fn toggle<T: PartialEq>(current: Option<T>, candidate: T) -> Option<T> {
    if current.as_ref() == Some(&candidate) {
        None
    } else {
        Some(candidate)
    }
}

/// What the reader has picked in the concordance view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    selected_word: Option<String>,
    selected_verse: Option<VerseKey>,
}

impl SearchState {
    pub fn selected_word(&self) -> Option<&str> {
        self.selected_word.as_deref()
    }

    pub fn selected_verse(&self) -> Option<VerseKey> {
        self.selected_verse
    }

    pub fn toggle_word(&mut self, word: &str) {
        self.selected_word = toggle(self.selected_word.take(), word.to_string());
    }

    pub fn toggle_verse_selection(&mut self, key: VerseKey) {
        self.selected_verse = toggle(self.selected_verse, key);
    }

    /// Recomputed on every call against the given index.
    pub fn occurrence_count(&self, index: &ConcordanceIndex) -> usize {
        index.count_occurrences(self.selected_word())
    }

    pub fn filtered_verses<'a>(&self, index: &'a ConcordanceIndex) -> Vec<(VerseKey, &'a str)> {
        index.filtered(self.selected_word())
    }

    pub fn clear(&mut self) {
        self.selected_word = None;
        self.selected_verse = None;
    }
}
