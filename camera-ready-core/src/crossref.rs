//! Reporting passes that join the session schedule with platform submissions.
//!
//! Nothing here mutates the platform: results are plain values the CLI prints
//! or writes to a flat file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ProceedingsError;
use crate::schedule::Schedule;
use crate::submission::Submission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementReport {
    /// Scheduled submissions that were checked.
    pub total: usize,
    pub with_agreement: usize,
    /// Paper numbers lacking a publication agreement, in submission order.
    pub missing: Vec<u32>,
}

impl AgreementReport {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.with_agreement as f64 * 100.0 / self.total as f64
        }
    }
}

/// Count scheduled papers with a `publication_agreement` field; list the rest.
///
/// Submissions not in the schedule (rejected, withdrawn) are ignored.
pub fn agreement_report(schedule: &Schedule, submissions: &[Submission]) -> AgreementReport {
    let mut report = AgreementReport {
        total: 0,
        with_agreement: 0,
        missing: Vec::new(),
    };
    for submission in submissions.iter().filter(|s| schedule.contains(s.number)) {
        report.total += 1;
        if submission.has_publication_agreement() {
            report.with_agreement += 1;
        } else {
            report.missing.push(submission.number);
        }
    }
    info!(
        total = report.total,
        with_agreement = report.with_agreement,
        missing = report.missing.len(),
        "Publication agreement report"
    );
    report
}

/// `(paper number, forum id)` for every oral paper found among the submissions,
/// in submission order. A paper number is reported once.
pub fn oral_forum_ids(schedule: &Schedule, submissions: &[Submission]) -> Vec<(u32, String)> {
    let orals: HashSet<u32> = schedule.oral_paper_ids().into_iter().collect();
    let mut seen = HashSet::new();
    let found: Vec<(u32, String)> = submissions
        .iter()
        .filter(|s| orals.contains(&s.number) && seen.insert(s.number))
        .map(|s| (s.number, s.id.clone()))
        .collect();
    info!(found = found.len(), scheduled = orals.len(), "Found oral papers");
    found
}

/// Write one forum id per line.
pub fn write_forum_ids(path: &Path, ids: &[(u32, String)]) -> Result<(), ProceedingsError> {
    let body: String = ids.iter().map(|(_, forum)| format!("{forum}\n")).collect();
    fs::write(path, body).map_err(|e| ProceedingsError::io(path, e))?;
    info!(path = %path.display(), count = ids.len(), "Wrote oral forum ids");
    Ok(())
}

/// Read a forum-id list written by [`write_forum_ids`]. Blank lines are ignored.
pub fn read_forum_ids(path: &Path) -> Result<HashSet<String>, ProceedingsError> {
    let text = fs::read_to_string(path).map_err(|e| ProceedingsError::io(path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect())
}
