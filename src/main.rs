mod citation;
mod cli;
mod concordance;
mod config;
mod corpus;
mod display;
mod error;
#[cfg(test)]
mod fixtures;
mod logger;
mod models;
mod navigation;
mod page_store;
mod reference_index;
mod repl;
mod resolver;
mod session;
mod text_tokenizer;

use crate::cli::{Cli, Command};
use crate::config::ReaderConfig;
use crate::corpus::FileCorpusSource;
use crate::logger::DiagnosticLogger;
use crate::page_store::FilePageStore;
use crate::session::ReaderSession;
use anyhow::{Context, Result};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReaderConfig::load(path)?,
        None => ReaderConfig::default(),
    };
    cli.apply(&mut config);

    let logger = DiagnosticLogger::new(&config.log_dir).context("Failed to create logger")?;
    logger
        .rotate_logs(config.max_log_files)
        .context("Failed to rotate session logs")?;

    let source = FileCorpusSource::new(
        &config.corpus_path,
        &config.translations_dir,
        config.text_layer,
    );
    let store = FilePageStore::new(&config.state_file);
    let mut session = ReaderSession::open(&config, Box::new(source), Box::new(store), logger)
        .context("Failed to open reader session")?;

    match &cli.command {
        Command::Resolve { citation } => match session.resolve_citation(citation) {
            Ok(resolution) => println!(
                "{} -> page {} (sura {}, verse {})",
                citation, resolution.page, resolution.sura, resolution.verse_start
            ),
            Err(e) => eprintln!("{}", e),
        },
        Command::Count { word } => {
            session.toggle_word(word);
            println!("Occurrences of {}: {}", word, session.occurrence_count());
        }
        Command::Search { word } => {
            session.toggle_word(word);
            println!("{}", display::format_search(&session));
        }
        Command::Index => {
            let json = serde_json::to_string_pretty(session.references())
                .context("Failed to serialize reference index")?;
            println!("{}", json);
        }
        Command::Page { number } => {
            let number = number.unwrap_or_else(|| session.navigation().current_page());
            match session.corpus().page(number) {
                Some(page) => println!("{}", display::format_page(&session, page)),
                None => eprintln!("Page {} has no content", number),
            }
        }
        Command::Next => {
            session.next();
            println!("Page {}", session.navigation().current_page());
        }
        Command::Back => {
            session.back();
            println!("Page {}", session.navigation().current_page());
        }
        Command::Goto { page, sura, verse } => {
            session.go_to(*page, *sura, *verse);
            println!("Page {}", session.navigation().current_page());
        }
        Command::Interactive => {
            let stdin = io::stdin();
            repl::run(&mut session, stdin.lock(), io::stdout())?;
        }
    }

    let report = session.report()?;
    if report.summary.warnings > 0 || report.summary.errors > 0 {
        eprintln!(
            "Session {}: {} warning(s), {} error(s)",
            report.session_id, report.summary.warnings, report.summary.errors
        );
    }

    Ok(())
}
