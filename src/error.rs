use thiserror::Error;

/// Failures surfaced by the reader core. None of them are fatal: callers
/// report them and keep operating on the last good state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Malformed citation: {0}")]
    MalformedCitation(String),

    #[error("Reference not found in the book: {0}")]
    CitationNotFound(String),

    #[error("Corpus for language '{language}' could not be loaded: {reason}")]
    CorpusLoad { language: String, reason: String },
}
