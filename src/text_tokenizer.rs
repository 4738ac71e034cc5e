use regex::Regex;
use serde::{Deserialize, Serialize};

/// A run of verse text, flagged when it is exactly the selected word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub matched: bool,
    pub content: String,
}

/// Splits verse text into whitespace and non-whitespace runs without losing
/// a single character. Segment order is the stored (logical) order; display
/// direction is left to whoever renders them.
pub struct TextTokenizer {
    segment_pattern: Regex,
}

impl TextTokenizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(TextTokenizer {
            segment_pattern: Regex::new(r"\s+|\S+")?,
        })
    }

    /// Compiles the segmentation for `word` once, so every verse shown for the
    /// same selection reuses it. No word, or an empty one, matches nothing.
    pub fn highlighter(&self, word: Option<&str>) -> Highlighter {
        let word = word.filter(|w| !w.is_empty());
        let pattern = word
            .and_then(|w| Regex::new(&format!(r"({})|\s+|\S+", regex::escape(w))).ok())
            .unwrap_or_else(|| self.segment_pattern.clone());

        Highlighter {
            word: word.map(str::to_string),
            pattern,
        }
    }

    /// Words a reader can pick from a verse, trimmed.
    pub fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace().collect()
    }
}

/// Segmentation compiled for one selected word.
#[derive(Debug, Clone)]
pub struct Highlighter {
    word: Option<String>,
    pattern: Regex,
}

impl Highlighter {
    /// Segments `text`, marking runs equal to the word. The word is tried first
    /// at every position, so it is found even when glued to punctuation.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        self.pattern
            .find_iter(text)
            .map(|m| Segment {
                matched: self.word.as_deref() == Some(m.as_str()),
                content: m.as_str().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tokenizer() -> TextTokenizer {
        TextTokenizer::new().unwrap()
    }

    fn highlight(text: &str, word: Option<&str>) -> Vec<Segment> {
        tokenizer().highlighter(word).segments(text)
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.content.as_str()).collect()
    }

    #[test]
    fn test_highlight_marks_exact_word() {
        let segments = highlight("the cat  sat", Some("cat"));
        let contents: Vec<&str> = segments.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["the", " ", "cat", "  ", "sat"]);

        let matched: Vec<bool> = segments.iter().map(|s| s.matched).collect();
        assert_eq!(matched, vec![false, false, true, false, false]);
    }

    #[test]
    fn test_highlight_finds_word_inside_longer_run() {
        let segments = highlight("cats,cat.", Some("cat"));
        let contents: Vec<&str> = segments.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["cat", "s,cat."]);
        assert!(segments[0].matched);
        assert!(!segments[1].matched);
    }

    #[test]
    fn test_highlight_right_to_left_text_keeps_logical_order() {
        let text = "قال الله الكتاب";
        let segments = highlight(text, Some("الله"));
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0].content, "قال");
        assert!(segments[2].matched);
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_highlight_escapes_pattern_characters() {
        let segments = highlight("a.b axb", Some("a.b"));
        assert!(segments[0].matched);
        assert!(!segments[2].matched);
    }

    #[test]
    fn test_highlight_without_word_matches_nothing() {
        for word in [None, Some("")] {
            let segments = highlight(" in the beginning ", word);
            assert!(segments.iter().all(|s| !s.matched));
            assert_eq!(joined(&segments), " in the beginning ");
        }
        assert!(highlight("", Some("x")).is_empty());
    }

    #[test]
    fn test_one_highlighter_serves_many_verses() {
        let highlighter = tokenizer().highlighter(Some("them"));
        let verses = [
            "GOD mocks them and leaves them",
            "When it is said to them, do not",
            "It is they who bought",
        ];
        let counts: Vec<usize> = verses
            .iter()
            .map(|v| highlighter.segments(v).iter().filter(|s| s.matched).count())
            .collect();
        assert_eq!(counts, vec![2, 1, 0]);
    }

    #[test]
    fn test_words_are_trimmed() {
        assert_eq!(tokenizer().words("  GOD  is\tgreat "), vec!["GOD", "is", "great"]);
    }

    proptest! {
        #[test]
        fn prop_highlight_is_lossless(text in "\\PC{0,40}", word in "\\PC{0,4}") {
            let segments = highlight(&text, Some(&word));
            prop_assert_eq!(joined(&segments), text);
        }

        #[test]
        fn prop_matched_segments_equal_word(text in "[ab \\t]{0,30}", word in "[ab]{1,2}") {
            for segment in highlight(&text, Some(&word)) {
                prop_assert_eq!(segment.matched, segment.content == word);
            }
        }
    }
}
