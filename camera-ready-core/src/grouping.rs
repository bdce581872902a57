use std::collections::HashSet;
use std::fmt;

use tracing::info;

use crate::metadata::PaperMetadata;

/// How a paper is presented at the conference. Orals come first in the proceedings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presentation {
    Oral,
    Poster,
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presentation::Oral => write!(f, "Oral"),
            Presentation::Poster => write!(f, "Poster"),
        }
    }
}

/// A paper paired with the identifier assigned to it.
#[derive(Debug, Clone, Copy)]
pub struct IdentifiedPaper<'a> {
    pub identifier: &'a str,
    pub metadata: &'a PaperMetadata,
}

#[derive(Debug, Default)]
pub struct PresentationGroups<'a> {
    pub orals: Vec<IdentifiedPaper<'a>>,
    pub posters: Vec<IdentifiedPaper<'a>>,
}

impl<'a> PresentationGroups<'a> {
    /// Orals then posters, each in input order.
    pub fn in_proceedings_order(&self) -> impl Iterator<Item = (Presentation, &IdentifiedPaper<'a>)> {
        self.orals
            .iter()
            .map(|p| (Presentation::Oral, p))
            .chain(self.posters.iter().map(|p| (Presentation::Poster, p)))
    }
}

/// Split papers into orals (forum id in the allow-list) and posters (everything else).
///
/// Relative order is preserved inside each group; no sorting happens here.
pub fn split_by_presentation<'a>(
    papers: &'a [PaperMetadata],
    identifiers: &'a [String],
    oral_forum_ids: &HashSet<String>,
) -> PresentationGroups<'a> {
    let mut groups = PresentationGroups::default();
    for (metadata, identifier) in papers.iter().zip(identifiers) {
        let paper = IdentifiedPaper {
            identifier: identifier.as_str(),
            metadata,
        };
        if oral_forum_ids.contains(&metadata.forum) {
            groups.orals.push(paper);
        } else {
            groups.posters.push(paper);
        }
    }
    info!(
        orals = groups.orals.len(),
        posters = groups.posters.len(),
        "Split papers by presentation"
    );
    groups
}
