use crate::display;
use crate::models::VerseKey;
use crate::session::ReaderSession;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const HELP: &str = "commands: next | back | goto <page> [<sura> <verse>] | ref <citation> | \
page | word <word> | verse <sura> <verse> | words | search | count | lang <code> | quit";

/// Reads one command per line until `quit` or end of input. Bad input is
/// reported and the loop carries on.
pub fn run<R: BufRead, W: Write>(
    session: &mut ReaderSession,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        let reply = match (command, args.as_slice()) {
            ("quit" | "exit", _) => break,
            ("next", []) => {
                session.next();
                page_line(session)
            }
            ("back", []) => {
                session.back();
                page_line(session)
            }
            ("goto", [page]) => match page.parse::<u32>() {
                Ok(page) => {
                    session.go_to(page, None, None);
                    page_line(session)
                }
                Err(_) => format!("not a page number: {}", page),
            },
            ("goto", [page, sura, verse]) => {
                match (page.parse::<u32>(), sura.parse::<u32>(), verse.parse::<u32>()) {
                    (Ok(page), Ok(sura), Ok(verse)) => {
                        session.go_to(page, Some(sura), Some(verse));
                        page_line(session)
                    }
                    _ => "usage: goto <page> [<sura> <verse>]".to_string(),
                }
            }
            ("ref", [citation]) => match session.resolve_citation(citation) {
                Ok(resolution) => format!(
                    "{} -> page {} (history: {:?})",
                    citation,
                    resolution.page,
                    session.navigation().history()
                ),
                Err(e) => e.to_string(),
            },
            ("page", []) => match session.current_page() {
                Some(page) => display::format_page(session, page),
                None => format!("page {} has no content", session.navigation().current_page()),
            },
            ("word", [word]) => {
                session.toggle_word(word);
                format!(
                    "Filter: {}",
                    session.search().selected_word().unwrap_or("N / A")
                )
            }
            ("verse", [sura, verse]) => match (sura.parse::<u32>(), verse.parse::<u32>()) {
                (Ok(sura), Ok(verse)) => {
                    session.toggle_verse_selection(VerseKey::new(sura, verse));
                    match session.search().selected_verse() {
                        Some(key) => format!("selected {}:{}", key.sura, key.verse),
                        None => "selection cleared".to_string(),
                    }
                }
                _ => "usage: verse <sura> <verse>".to_string(),
            },
            ("words", []) => session.selected_verse_words().join(" | "),
            ("search", []) => display::format_search(session),
            ("count", []) => format!("Occurrences: {}", session.occurrence_count()),
            ("lang", [language]) => match session.switch_language(language) {
                Ok(()) => format!("language: {}", language),
                Err(e) => e.to_string(),
            },
            _ => HELP.to_string(),
        };

        writeln!(output, "{}", reply).context("Failed to write reply")?;
    }

    Ok(())
}

fn page_line(session: &ReaderSession) -> String {
    format!("Page {}", session.navigation().current_page())
}
