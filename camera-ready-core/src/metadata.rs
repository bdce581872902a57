//! Paper metadata records and their line-delimited JSON file format.
//!
//! One paper per line:
//!
//! ```json
//! {"forum": "abc", "submission_number": 12,
//!  "submission_content": {"title": {"value": "..."}, "abstract": {"value": "..."},
//!                         "authors": {"value": ["First Last"]},
//!                         "code": {"value": "https://..."}, "video": {"value": "https://..."}}}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::ProceedingsError;

/// Static facts about one accepted submission. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperMetadata {
    pub forum: String,
    pub submission_number: u32,
    pub title: String,
    pub abstract_text: String,
    /// Author full names in byline order.
    pub authors: Vec<String>,
    pub code: Option<String>,
    pub video: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MetadataRecord {
    forum: String,
    submission_number: u32,
    submission_content: SubmissionContent,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmissionContent {
    title: Valued<String>,
    #[serde(default)]
    r#abstract: Option<Valued<String>>,
    #[serde(default)]
    authors: Option<Valued<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<Valued<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video: Option<Valued<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Valued<T> {
    value: T,
}

impl From<MetadataRecord> for PaperMetadata {
    fn from(record: MetadataRecord) -> Self {
        let content = record.submission_content;
        let link = |v: Option<Valued<String>>| v.map(|v| v.value).filter(|s| !s.trim().is_empty());
        PaperMetadata {
            forum: record.forum,
            submission_number: record.submission_number,
            title: content.title.value,
            abstract_text: content.r#abstract.map(|v| v.value).unwrap_or_default(),
            authors: content.authors.map(|v| v.value).unwrap_or_default(),
            code: link(content.code),
            video: link(content.video),
        }
    }
}

impl From<&PaperMetadata> for MetadataRecord {
    fn from(paper: &PaperMetadata) -> Self {
        MetadataRecord {
            forum: paper.forum.clone(),
            submission_number: paper.submission_number,
            submission_content: SubmissionContent {
                title: Valued {
                    value: paper.title.clone(),
                },
                r#abstract: Some(Valued {
                    value: paper.abstract_text.clone(),
                }),
                authors: Some(Valued {
                    value: paper.authors.clone(),
                }),
                code: paper.code.clone().map(|value| Valued { value }),
                video: paper.video.clone().map(|value| Valued { value }),
            },
        }
    }
}

/// Parse metadata from any line-oriented reader. Blank lines are skipped.
pub fn parse_paper_metadata<R: BufRead>(reader: R) -> Result<Vec<PaperMetadata>, ProceedingsError> {
    let mut papers = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| ProceedingsError::io(format!("<line {line_no}>"), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: MetadataRecord = serde_json::from_str(&line).map_err(|source| {
            error!(line = line_no, error = %source, "Malformed metadata line");
            ProceedingsError::Metadata {
                line: line_no,
                source,
            }
        })?;
        debug!(
            line = line_no,
            forum = %record.forum,
            submission_number = record.submission_number,
            "Parsed metadata record"
        );
        papers.push(record.into());
    }
    Ok(papers)
}

/// Read the `<conference>__metadata.jsonl` file.
pub fn read_paper_metadata(path: &Path) -> Result<Vec<PaperMetadata>, ProceedingsError> {
    info!(path = %path.display(), "Reading paper metadata");
    let file = File::open(path).map_err(|e| ProceedingsError::io(path, e))?;
    let papers = parse_paper_metadata(BufReader::new(file))?;
    info!(count = papers.len(), "Total number of papers");
    Ok(papers)
}

/// Write papers in the same line-delimited format [`read_paper_metadata`] accepts.
pub fn write_paper_metadata(path: &Path, papers: &[PaperMetadata]) -> Result<(), ProceedingsError> {
    let file = File::create(path).map_err(|e| ProceedingsError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for paper in papers {
        let line = serde_json::to_string(&MetadataRecord::from(paper))?;
        writeln!(out, "{line}").map_err(|e| ProceedingsError::io(path, e))?;
    }
    out.flush().map_err(|e| ProceedingsError::io(path, e))?;
    info!(path = %path.display(), count = papers.len(), "Wrote paper metadata");
    Ok(())
}
