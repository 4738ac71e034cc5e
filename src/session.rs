use crate::citation::ProseSegment;
use crate::concordance::{ConcordanceIndex, SearchState};
use crate::config::ReaderConfig;
use crate::corpus::{CorpusBundle, CorpusId, CorpusSource};
use crate::error::ReaderError;
use crate::logger::{DiagnosticLogger, SessionReport};
use crate::models::{Corpus, Page, VerseKey};
use crate::navigation::NavigationState;
use crate::page_store::PageStore;
use crate::reference_index::ReferenceIndex;
use crate::resolver::{ReferenceResolver, Resolution};
use crate::text_tokenizer::{Highlighter, Segment, TextTokenizer};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

const FALLBACK_LANGUAGE: &str = "en";

/// Everything derived from one corpus. Read-only once built, so it can be
/// shared between sessions reading the same corpus.
#[derive(Debug)]
pub struct DerivedIndexes {
    pub references: ReferenceIndex,
    pub concordance: ConcordanceIndex,
}

struct ActiveCorpus {
    bundle: CorpusBundle,
    indexes: Arc<DerivedIndexes>,
}

/// One reader's session: the active corpus with its indexes, where the
/// reader is, and what they have selected.
pub struct ReaderSession {
    source: Box<dyn CorpusSource>,
    store: Box<dyn PageStore>,
    resolver: ReferenceResolver,
    tokenizer: TextTokenizer,
    /// Compiled for `search.selected_word`; rebuilt whenever that changes.
    highlighter: Highlighter,
    logger: DiagnosticLogger,
    cache: HashMap<CorpusId, Arc<DerivedIndexes>>,
    active: ActiveCorpus,
    navigation: NavigationState,
    search: SearchState,
}

impl ReaderSession {
    /// Loads the configured language, falling back to the primary corpus when
    /// that translation is unavailable.
    pub fn open(
        config: &ReaderConfig,
        source: Box<dyn CorpusSource>,
        store: Box<dyn PageStore>,
        logger: DiagnosticLogger,
    ) -> Result<Self> {
        let resolver = ReferenceResolver::new(config.tie_policy)
            .context("Failed to create ReferenceResolver")?;
        let tokenizer = TextTokenizer::new().context("Failed to create TextTokenizer")?;

        let bundle = match source.load(&config.language) {
            Ok(bundle) => bundle,
            Err(e) if config.language != FALLBACK_LANGUAGE => {
                logger.warning(
                    format!("Translation not found for language: {}", config.language),
                    Some(serde_json::json!({ "reason": format!("{:#}", e) })),
                );
                source
                    .load(FALLBACK_LANGUAGE)
                    .context("Failed to load fallback corpus")?
            }
            Err(e) => return Err(e.context("Failed to load corpus")),
        };

        let initial_page = store.initial_page(config.start_page);
        let mut cache = HashMap::new();
        let indexes = build_indexes(&bundle, &resolver, &logger, &mut cache);

        Ok(ReaderSession {
            source,
            store,
            resolver,
            highlighter: tokenizer.highlighter(None),
            tokenizer,
            logger,
            cache,
            active: ActiveCorpus { bundle, indexes },
            navigation: NavigationState::new(initial_page, config.start_page, config.min_page),
            search: SearchState::default(),
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.active.bundle.corpus
    }

    pub fn corpus_id(&self) -> &CorpusId {
        &self.active.bundle.id
    }

    #[allow(dead_code)]
    pub fn indexes(&self) -> Arc<DerivedIndexes> {
        Arc::clone(&self.active.indexes)
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.active.indexes.references
    }

    pub fn concordance(&self) -> &ConcordanceIndex {
        &self.active.indexes.concordance
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &dyn PageStore {
        self.store.as_ref()
    }

    pub fn logger(&self) -> &DiagnosticLogger {
        &self.logger
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.corpus().page(self.navigation.current_page())
    }

    pub fn go_to(&mut self, page: u32, sura: Option<u32>, verse: Option<u32>) {
        let before = self.navigation.current_page();
        self.navigation.go_to(page, sura, verse);
        self.persist_if_moved(before);
    }

    pub fn next(&mut self) {
        let before = self.navigation.current_page();
        self.navigation.next();
        self.persist_if_moved(before);
    }

    pub fn back(&mut self) {
        let before = self.navigation.current_page();
        self.navigation.back();
        self.persist_if_moved(before);
    }

    /// Jumps to the page holding `citation`. On a miss nothing moves.
    pub fn resolve_citation(&mut self, citation: &str) -> Result<Resolution, ReaderError> {
        match self.resolver.resolve(self.references(), citation) {
            Ok(resolution) => {
                self.logger.info(format!(
                    "Reference {} resolved to page {}",
                    citation, resolution.page
                ));
                self.go_to(
                    resolution.page,
                    Some(resolution.sura),
                    Some(resolution.verse_start),
                );
                Ok(resolution)
            }
            Err(e) => {
                self.logger.warning(
                    e.to_string(),
                    Some(serde_json::json!({
                        "citation": citation,
                        "language": self.corpus_id().language,
                    })),
                );
                Err(e)
            }
        }
    }

    /// Swaps in another language's corpus. Both indexes are ready before the
    /// swap; on failure the current corpus stays active.
    pub fn switch_language(&mut self, language: &str) -> Result<(), ReaderError> {
        let bundle = match self.source.load(language) {
            Ok(bundle) => bundle,
            Err(e) => {
                let error = ReaderError::CorpusLoad {
                    language: language.to_string(),
                    reason: format!("{:#}", e),
                };
                self.logger.warning(
                    error.to_string(),
                    Some(serde_json::json!({ "active": self.corpus_id().language })),
                );
                return Err(error);
            }
        };

        let indexes = build_indexes(&bundle, &self.resolver, &self.logger, &mut self.cache);
        self.active = ActiveCorpus { bundle, indexes };
        self.search.clear();
        self.refresh_highlighter();
        self.logger
            .info(format!("Switched corpus to language: {}", language));
        Ok(())
    }

    pub fn toggle_word(&mut self, word: &str) {
        self.search.toggle_word(word);
        self.refresh_highlighter();
    }

    pub fn toggle_verse_selection(&mut self, key: VerseKey) {
        self.search.toggle_verse_selection(key);
    }

    pub fn occurrence_count(&self) -> usize {
        self.search.occurrence_count(self.concordance())
    }

    pub fn filtered_verses(&self) -> Vec<(VerseKey, &str)> {
        self.search.filtered_verses(self.concordance())
    }

    /// Segments `text` against the currently selected word.
    pub fn highlight(&self, text: &str) -> Vec<Segment> {
        self.highlighter.segments(text)
    }

    /// Words of the selected verse, for picking a search word.
    pub fn selected_verse_words(&self) -> Vec<&str> {
        self.search
            .selected_verse()
            .and_then(|key| self.concordance().verse_text(key))
            .map(|text| self.tokenizer.words(text))
            .unwrap_or_default()
    }

    pub fn split_prose(&self, text: &str) -> Vec<ProseSegment> {
        self.resolver.parser().split_prose(text)
    }

    pub fn report(&self) -> Result<SessionReport> {
        self.logger.generate_report(self.corpus().stats())
    }

    fn refresh_highlighter(&mut self) {
        self.highlighter = self.tokenizer.highlighter(self.search.selected_word());
    }

    fn persist_if_moved(&mut self, before: u32) {
        let page = self.navigation.current_page();
        if page == before {
            return;
        }
        if let Err(e) = self.store.save(page) {
            self.logger.error(
                format!("Failed to persist page {}", page),
                Some(serde_json::json!({ "reason": format!("{:#}", e) })),
            );
        }
    }
}

/// Returns the cached indexes for this corpus identity, building them on a miss.
fn build_indexes(
    bundle: &CorpusBundle,
    resolver: &ReferenceResolver,
    logger: &DiagnosticLogger,
    cache: &mut HashMap<CorpusId, Arc<DerivedIndexes>>,
) -> Arc<DerivedIndexes> {
    if let Some(indexes) = cache.get(&bundle.id) {
        logger.info(format!(
            "Reusing indexes for corpus {} ({})",
            bundle.id.language, bundle.id.digest
        ));
        return Arc::clone(indexes);
    }

    if !bundle.report.is_clean() {
        logger.warning(
            format!(
                "Corpus {} loaded with {} skipped keys and {} duplicate verses",
                bundle.id.language,
                bundle.report.skipped_keys.len(),
                bundle.report.duplicate_verses.len()
            ),
            serde_json::to_value(&bundle.report).ok(),
        );
    }

    let references = ReferenceIndex::build(&bundle.corpus, resolver.parser());
    let concordance = ConcordanceIndex::build(&bundle.corpus);

    if references.skipped_citations() > 0 {
        logger.warning(
            format!(
                "Skipped {} malformed citations in corpus {}",
                references.skipped_citations(),
                bundle.id.language
            ),
            None,
        );
    }

    logger.info(format!(
        "Indexed corpus {}: {} pages, {} distinct verses, {} ranges",
        bundle.id.language,
        references.page_count(),
        concordance.verse_count(),
        references.range_count()
    ));

    let indexes = Arc::new(DerivedIndexes {
        references,
        concordance,
    });
    cache.insert(bundle.id.clone(), Arc::clone(&indexes));
    indexes
}
