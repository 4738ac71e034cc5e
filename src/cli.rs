use crate::config::ReaderConfig;
use crate::corpus::TextLayer;
use crate::resolver::TiePolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tft-reader")]
#[command(
    about = "Navigate a paginated scripture by citation and search it by word",
    long_about = None
)]
pub struct Cli {
    #[arg(long, help = "Reader config file (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Primary corpus file")]
    pub corpus: Option<PathBuf>,

    #[arg(long, help = "Directory holding <lang>/quran_<lang>.json translations")]
    pub translations: Option<PathBuf>,

    #[arg(long, help = "Corpus language")]
    pub lang: Option<String>,

    #[arg(long, help = "Search the original script instead of the translation")]
    pub original: bool,

    #[arg(long, help = "File holding the last viewed page")]
    pub state_file: Option<PathBuf>,

    #[arg(long, help = "Log directory")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, help = "Resolve citations to the first containing page instead of the last")]
    pub first_match: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Jump to the page containing a citation such as 2:15-18
    Resolve { citation: String },
    /// Count occurrences of a word across the corpus
    Count { word: String },
    /// List verses containing a word, with the word highlighted
    Search { word: String },
    /// Print the page to citation-range index as JSON
    Index,
    /// Show a page (defaults to the current page)
    Page { number: Option<u32> },
    /// Go to the next page
    Next,
    /// Go back one page
    Back,
    /// Go to a page, optionally selecting a verse
    Goto {
        page: u32,
        #[arg(long)]
        sura: Option<u32>,
        #[arg(long)]
        verse: Option<u32>,
    },
    /// Read commands from stdin, keeping navigation history between them
    Interactive,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Overrides config fields with whatever was given on the command line.
    pub fn apply(&self, config: &mut ReaderConfig) {
        if let Some(corpus) = &self.corpus {
            config.corpus_path = corpus.clone();
        }
        if let Some(translations) = &self.translations {
            config.translations_dir = translations.clone();
        }
        if let Some(lang) = &self.lang {
            config.language = lang.clone();
        }
        if self.original {
            config.text_layer = TextLayer::Original;
        }
        if let Some(state_file) = &self.state_file {
            config.state_file = state_file.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
        if self.first_match {
            config.tie_policy = TiePolicy::FirstMatch;
        }
    }
}
