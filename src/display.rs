//! Plain-text rendering of pages and search results for the terminal.
//! Highlighted words are wrapped in `[...]`, followable citations in `<...>`.

use crate::citation::ProseSegment;
use crate::models::{BlockKind, Page};
use crate::session::ReaderSession;
use crate::text_tokenizer::Segment;

pub fn format_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.matched {
                format!("[{}]", s.content)
            } else {
                s.content.clone()
            }
        })
        .collect()
}

pub fn format_prose(segments: &[ProseSegment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            ProseSegment::Text(text) => text.clone(),
            ProseSegment::Citation(citation) => format!("<{}>", citation),
        })
        .collect()
}

pub fn format_page(session: &ReaderSession, page: &Page) -> String {
    let ranges: Vec<String> = session
        .references()
        .ranges(page.number)
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut lines = vec![if ranges.is_empty() {
        format!("Page {}", page.number)
    } else {
        format!("Page {} ({})", page.number, ranges.join(", "))
    }];

    for block in page.ordered_blocks() {
        match &block.kind {
            BlockKind::Title(title) => lines.push(format!("## {}", title)),
            BlockKind::Text(text) => lines.push(format_prose(&session.split_prose(text))),
            BlockKind::Evidence { lines: evidence, refs } => {
                lines.extend(evidence.iter().map(|line| format!("  > {}", line)));
                lines.push(format!("  [ {} ]", refs.join(", ")));
            }
        }
    }

    let selected = session
        .navigation()
        .selected_sura()
        .zip(session.navigation().selected_verse());
    for verse in &page.verses {
        let marker = if selected == Some((verse.key.sura, verse.key.verse)) {
            "*"
        } else {
            " "
        };
        lines.push(format!(
            "{}{}:{} {}",
            marker,
            verse.key.sura,
            verse.key.verse,
            format_segments(&session.highlight(&verse.text))
        ));
    }

    lines.join("\n")
}

pub fn format_search(session: &ReaderSession) -> String {
    let mut lines: Vec<String> = session
        .filtered_verses()
        .into_iter()
        .map(|(key, text)| {
            format!(
                "{}:{} {}",
                key.sura,
                key.verse,
                format_segments(&session.highlight(text))
            )
        })
        .collect();

    lines.push(format!(
        "Filter: {}  Occurrences: {}",
        session.search().selected_word().unwrap_or("N / A"),
        session.occurrence_count()
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_segments_brackets_matches() {
        let segments = vec![
            Segment {
                matched: false,
                content: "the".to_string(),
            },
            Segment {
                matched: false,
                content: " ".to_string(),
            },
            Segment {
                matched: true,
                content: "cat".to_string(),
            },
        ];
        assert_eq!(format_segments(&segments), "the [cat]");
    }

    #[test]
    fn test_format_prose_marks_citations() {
        let segments = vec![
            ProseSegment::Text("see ".to_string()),
            ProseSegment::Citation("2:15".to_string()),
        ];
        assert_eq!(format_prose(&segments), "see <2:15>");
    }
}
