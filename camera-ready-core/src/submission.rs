//! Review-platform submission records, shaped like OpenReview API v2 notes.
//!
//! Every content field is wrapped as `{"value": ...}`. Decisions are not part of
//! the note itself but arrive as direct replies whose invitation ends in
//! `Decision`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProceedingsError;
use crate::metadata::PaperMetadata;

pub const PUBLICATION_AGREEMENT_FIELD: &str = "publication_agreement";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub number: u32,
    #[serde(default)]
    pub forum: Option<String>,
    #[serde(default)]
    pub content: BTreeMap<String, ContentField>,
    #[serde(default)]
    pub details: SubmissionDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetails {
    #[serde(rename = "directReplies", default)]
    pub direct_replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub invitations: Vec<String>,
    #[serde(default)]
    pub content: BTreeMap<String, ContentField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentField {
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ContentField {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

impl Submission {
    /// Forum id of the submission; falls back to the note id for top-level notes.
    pub fn forum_id(&self) -> &str {
        self.forum.as_deref().unwrap_or(&self.id)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.content.get(name).and_then(ContentField::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.content.contains_key(name)
    }

    pub fn title(&self) -> Option<&str> {
        self.field_str("title")
    }

    pub fn authors(&self) -> Vec<String> {
        self.content
            .get("authors")
            .and_then(|f| f.value.as_array())
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_publication_agreement(&self) -> bool {
        self.has_field(PUBLICATION_AGREEMENT_FIELD)
    }

    /// The decision value from the first direct reply posted under a `...Decision` invitation.
    pub fn decision(&self) -> Option<&str> {
        self.details
            .direct_replies
            .iter()
            .find(|reply| reply.invitations.iter().any(|i| i.ends_with("Decision")))
            .and_then(|reply| reply.content.get("decision"))
            .and_then(ContentField::as_str)
    }

    /// Whether the decision is an acceptance (`Accept (Oral)`, `Accept (Poster)`, ...).
    pub fn is_accepted(&self) -> bool {
        self.decision().is_some_and(|d| d.trim_start().starts_with("Accept"))
    }

    pub fn has_pdf(&self) -> bool {
        self.has_field("pdf")
    }

    /// Convert into the static metadata record consumed by the proceedings compiler.
    pub fn to_paper_metadata(&self) -> Result<PaperMetadata, ProceedingsError> {
        let title = self
            .title()
            .ok_or(ProceedingsError::IncompleteSubmission {
                number: self.number,
                field: "title",
            })?;
        let abstract_text = self.field_str("abstract").unwrap_or_default();
        let non_empty = |name: &str| {
            self.field_str(name)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_owned)
        };

        Ok(PaperMetadata {
            forum: self.forum_id().to_string(),
            submission_number: self.number,
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            authors: self.authors(),
            code: non_empty("code"),
            video: non_empty("video"),
        })
    }
}
