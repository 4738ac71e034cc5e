use crate::models::*;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Which verse map of a sura feeds the corpus text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLayer {
    /// The translated verses (`verses`).
    #[default]
    Translation,
    /// The original script (`encrypted`), read right-to-left.
    Original,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CitationField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct RawSura {
    #[serde(default)]
    verses: BTreeMap<String, String>,
    #[serde(default)]
    encrypted: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvidence {
    #[serde(default)]
    lines: BTreeMap<String, String>,
    #[serde(default, rename = "ref")]
    refs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(default)]
    page: Option<CitationField>,
    #[serde(default)]
    sura: BTreeMap<String, RawSura>,
    #[serde(default)]
    titles: BTreeMap<String, String>,
    #[serde(default)]
    text: BTreeMap<String, String>,
    #[serde(default)]
    evidence: BTreeMap<String, RawEvidence>,
}

/// Data-quality findings from a load. Nothing here aborts the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Page, sura, verse or order keys that were not numbers.
    pub skipped_keys: Vec<String>,
    /// Verse keys printed on more than one page; the later page's text wins when flattened.
    pub duplicate_verses: Vec<VerseKey>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_keys.is_empty() && self.duplicate_verses.is_empty()
    }
}

/// Identity of a loaded corpus: same language and same bytes means same derived indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpusId {
    pub language: String,
    pub digest: String,
}

#[derive(Debug, Clone)]
pub struct CorpusBundle {
    pub id: CorpusId,
    pub corpus: Corpus,
    pub report: LoadReport,
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Parses a raw book file into the normalized corpus model.
pub fn load_corpus(bytes: &[u8], layer: TextLayer) -> Result<(Corpus, LoadReport)> {
    let raw: BTreeMap<String, RawPage> =
        serde_json::from_slice(bytes).context("Failed to parse corpus JSON")?;

    let mut report = LoadReport::default();
    let mut seen: HashMap<VerseKey, u32> = HashMap::new();
    let mut pages = Vec::with_capacity(raw.len());

    for (page_key, raw_page) in raw {
        let Some(number) = parse_key(&page_key, &mut report) else {
            continue;
        };
        let mut page = Page::new(number);

        page.citations = match raw_page.page {
            Some(CitationField::One(s)) => vec![s],
            Some(CitationField::Many(v)) => v,
            None => Vec::new(),
        };

        for (sura_key, raw_sura) in raw_page.sura {
            let Some(sura) = parse_key(&sura_key, &mut report) else {
                continue;
            };
            let verse_map = match layer {
                TextLayer::Translation => raw_sura.verses,
                TextLayer::Original => raw_sura.encrypted,
            };
            for (verse_key, text) in verse_map {
                let Some(verse) = parse_key(&verse_key, &mut report) else {
                    continue;
                };
                let key = VerseKey::new(sura, verse);
                if seen.insert(key, number).is_some() {
                    report.duplicate_verses.push(key);
                }
                page.verses.push(Verse { key, text });
            }
        }
        page.verses.sort_by_key(|v| v.key);

        for (order_key, title) in raw_page.titles {
            if let Some(order) = parse_key(&order_key, &mut report) {
                page.blocks.push(ContentBlock {
                    order,
                    kind: BlockKind::Title(title),
                });
            }
        }
        for (order_key, text) in raw_page.text {
            if let Some(order) = parse_key(&order_key, &mut report) {
                page.blocks.push(ContentBlock {
                    order,
                    kind: BlockKind::Text(text),
                });
            }
        }
        for (order_key, evidence) in raw_page.evidence {
            if let Some(order) = parse_key(&order_key, &mut report) {
                let lines: BTreeMap<u32, String> = evidence
                    .lines
                    .into_iter()
                    .filter_map(|(key, line)| Some((parse_key(&key, &mut report)?, line)))
                    .collect();
                page.blocks.push(ContentBlock {
                    order,
                    kind: BlockKind::Evidence {
                        lines: lines.into_values().collect(),
                        refs: evidence.refs,
                    },
                });
            }
        }

        pages.push(page);
    }

    Ok((Corpus::new(pages), report))
}

fn parse_key(key: &str, report: &mut LoadReport) -> Option<u32> {
    match key.trim().parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            report.skipped_keys.push(key.to_string());
            None
        }
    }
}

/// Supplies a corpus for a named language.
pub trait CorpusSource {
    fn load(&self, language: &str) -> Result<CorpusBundle>;
}

/// Reads the primary book file, or `<translations>/<lang>/quran_<lang>.json`
/// for any language that is not English.
pub struct FileCorpusSource {
    corpus_path: PathBuf,
    translations_dir: PathBuf,
    layer: TextLayer,
}

impl FileCorpusSource {
    pub fn new(corpus_path: &Path, translations_dir: &Path, layer: TextLayer) -> Self {
        FileCorpusSource {
            corpus_path: corpus_path.to_path_buf(),
            translations_dir: translations_dir.to_path_buf(),
            layer,
        }
    }

    pub fn path_for(&self, language: &str) -> PathBuf {
        if language.to_lowercase().contains("en") {
            self.corpus_path.clone()
        } else {
            self.translations_dir
                .join(language)
                .join(format!("quran_{}.json", language))
        }
    }
}

impl CorpusSource for FileCorpusSource {
    fn load(&self, language: &str) -> Result<CorpusBundle> {
        let path = self.path_for(language);
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read corpus file: {:?}", path))?;
        let (corpus, report) = load_corpus(&bytes, self.layer)
            .with_context(|| format!("Failed to load corpus from {:?}", path))?;

        Ok(CorpusBundle {
            id: CorpusId {
                language: language.to_string(),
                digest: hash_bytes(&bytes),
            },
            corpus,
            report,
        })
    }
}
