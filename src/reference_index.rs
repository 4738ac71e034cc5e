use crate::citation::{CitationParser, Range};
use crate::models::Corpus;
use serde::Serialize;
use std::collections::BTreeMap;

/// Page number to the verse ranges cited on that page, in citation order.
///
/// Every page of the corpus has an entry, possibly empty. Ranges are kept as
/// cited: overlapping or repeated ranges on one page are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceIndex {
    pages: BTreeMap<u32, Vec<Range>>,
    #[serde(skip)]
    skipped: usize,
}

impl ReferenceIndex {
    /// Scans every citation field of every page. Citation text that does not
    /// parse is skipped and counted, never reported as an error: page
    /// metadata is semi-structured and a bad annotation only costs that link.
    pub fn build(corpus: &Corpus, parser: &CitationParser) -> Self {
        let mut index = ReferenceIndex::default();

        for page in corpus.pages() {
            let mut ranges = Vec::new();
            for field in &page.citations {
                let extraction = parser.extract(field);
                ranges.extend(extraction.ranges);
                index.skipped += extraction.malformed;
            }
            index.pages.insert(page.number, ranges);
        }

        index
    }

    /// Ranges cited on `page`; a page that is not indexed contributes nothing.
    pub fn ranges(&self, page: u32) -> &[Range] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pages in ascending order with their ranges.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Range])> {
        self.pages.iter().map(|(page, ranges)| (*page, ranges.as_slice()))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn range_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn skipped_citations(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::models::Page;

    fn parser() -> CitationParser {
        CitationParser::new().unwrap()
    }

    #[test]
    fn test_build_indexes_every_page() {
        let index = ReferenceIndex::build(&fixtures::sample_corpus(), &parser());

        assert_eq!(index.page_count(), 4);
        assert_eq!(index.ranges(5), &[Range::new(2, 10, 20).unwrap()]);
        assert_eq!(index.ranges(7), &[Range::new(2, 15, 18).unwrap()]);
        assert_eq!(
            index.ranges(9),
            &[Range::new(3, 1, 5).unwrap(), Range::single(3, 6), Range::single(3, 7)]
        );
        assert!(index.ranges(13).is_empty());
    }

    #[test]
    fn test_missing_page_behaves_like_empty_page() {
        let index = ReferenceIndex::build(&fixtures::sample_corpus(), &parser());
        assert_eq!(index.ranges(13), index.ranges(400));
    }

    #[test]
    fn test_overlapping_ranges_are_kept() {
        let corpus = crate::models::Corpus::new(vec![fixtures::page_with_citations(
            1,
            &["2:1-10", "2:5-7", "2:1-10"],
        )]);
        let index = ReferenceIndex::build(&corpus, &parser());
        assert_eq!(index.ranges(1).len(), 3);
    }

    #[test]
    fn test_malformed_citations_are_skipped() {
        let corpus = crate::models::Corpus::new(vec![
            fixtures::page_with_citations(1, &["Preface", "2:9-3", "4:2"]),
            Page::new(2),
        ]);
        let index = ReferenceIndex::build(&corpus, &parser());

        assert_eq!(index.ranges(1), &[Range::single(4, 2)]);
        assert_eq!(index.skipped_citations(), 1);
        assert_eq!(index.range_count(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let corpus = fixtures::sample_corpus();
        let parser = parser();
        assert_eq!(
            ReferenceIndex::build(&corpus, &parser),
            ReferenceIndex::build(&corpus, &parser)
        );
    }

    #[test]
    fn test_index_serializes_by_page() {
        let index = ReferenceIndex::build(&fixtures::sample_corpus(), &parser());
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["pages"]["7"][0]["verse_start"], 15);
        assert_eq!(json["pages"]["13"], serde_json::json!([]));
    }
}
