use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything the proceedings compiler needs to know about the venue.
///
/// Built by the CLI from the YAML config file; never read from globals.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Short conference name, used for file names (`<name>__metadata.jsonl`, `<name>.bib`).
    pub conference_name: String,
    /// Two-digit year code appended to every identifier.
    pub year_code: String,
    /// Directory holding the downloaded `Paper<number>.pdf` files.
    pub pdf_dir: PathBuf,
    /// Forum ids of papers presented as orals. Everything else is a poster.
    pub oral_forum_ids: HashSet<String>,
    pub proceedings: ProceedingsInfo,
}

impl CompilerConfig {
    pub fn trace_loaded(&self) {
        info!(
            conference = %self.conference_name,
            year_code = %self.year_code,
            pdf_dir = %self.pdf_dir.display(),
            oral_count = self.oral_forum_ids.len(),
            "Loaded CompilerConfig"
        );
        debug!(?self, "CompilerConfig loaded (full debug)");
    }

    pub fn metadata_file_name(&self) -> String {
        format!("{}__metadata.jsonl", self.conference_name)
    }

    pub fn bib_file_name(&self) -> String {
        format!("{}.bib", self.conference_name)
    }
}

/// Fields of the `@Proceedings{...}` preamble block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProceedingsInfo {
    pub key: String,
    pub booktitle: String,
    pub name: String,
    pub shortname: String,
    pub year: String,
    /// Editor full names, formatted like authors in the output.
    #[serde(default)]
    pub editors: Vec<String>,
    #[serde(default)]
    pub volume: String,
    pub start: String,
    pub end: String,
    pub address: String,
    pub conference_url: String,
    pub conference_number: u32,
    /// Rewrite accented characters in titles, abstracts and names as LaTeX escapes.
    #[serde(default = "default_latex_escape")]
    pub latex_escape: bool,
}

fn default_latex_escape() -> bool {
    true
}

/// Where and what to fetch from the OpenReview API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenReviewConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Submission invitation, e.g. `robot-learning.org/CoRL/2024/Conference/-/Submission`.
    pub invitation: String,
    /// Directory where fresh snapshots of the submission list are written.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

fn default_base_url() -> String {
    "https://api2.openreview.net".to_string()
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("notes")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Maximum number of PDF downloads in flight. 1 downloads sequentially.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}
