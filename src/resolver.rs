use crate::citation::CitationParser;
use crate::error::ReaderError;
use crate::reference_index::ReferenceIndex;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Which page wins when several pages carry a range containing the citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// The highest-numbered containing page. Later annotations are usually the
    /// narrower ones.
    #[default]
    LastMatch,
    FirstMatch,
}

/// Where a citation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub page: u32,
    pub sura: u32,
    pub verse_start: u32,
}

pub struct ReferenceResolver {
    parser: CitationParser,
    policy: TiePolicy,
}

impl ReferenceResolver {
    pub fn new(policy: TiePolicy) -> Result<Self> {
        Ok(ReferenceResolver {
            parser: CitationParser::new()?,
            policy,
        })
    }

    pub fn parser(&self) -> &CitationParser {
        &self.parser
    }

    /// Finds the page whose indexed range fully contains the cited span.
    /// A malformed citation resolves to `CitationNotFound` like any other miss.
    pub fn resolve(
        &self,
        index: &ReferenceIndex,
        citation: &str,
    ) -> Result<Resolution, ReaderError> {
        let not_found = || ReaderError::CitationNotFound(citation.to_string());
        let query = self.parser.parse(citation).map_err(|_| not_found())?;

        let mut containing = index
            .iter()
            .filter(|(_, ranges)| ranges.iter().any(|r| r.contains(&query)))
            .map(|(page, _)| page);

        let page = match self.policy {
            TiePolicy::LastMatch => containing.last(),
            TiePolicy::FirstMatch => containing.next(),
        }
        .ok_or_else(not_found)?;

        Ok(Resolution {
            page,
            sura: query.sura,
            verse_start: query.verse_start,
        })
    }
}
