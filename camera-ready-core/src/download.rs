use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::compile::source_pdf_path;
use crate::contract::SubmissionSource;
use crate::error::ProceedingsError;
use crate::metadata::{write_paper_metadata, PaperMetadata};
use crate::submission::Submission;

/// Outcome of a PDF download pass. Per-paper failures are collected, not fatal.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub saved: Vec<u32>,
    pub failed: Vec<DownloadFailure>,
    /// Submissions without a decision reply.
    pub undecided: Vec<u32>,
    /// Decided submissions that carry no `pdf` field.
    pub without_pdf: Vec<u32>,
}

#[derive(Debug)]
pub struct DownloadFailure {
    pub number: u32,
    pub reason: String,
}

/// Submissions with a decision, in input order.
pub fn decided_submissions(submissions: &[Submission]) -> impl Iterator<Item = &Submission> {
    submissions.iter().filter(|s| s.decision().is_some())
}

/// Download `Paper<number>.pdf` for every decided submission that has a PDF.
///
/// Only creating `pdf_dir` is fatal. A failed fetch or write is logged and the
/// pass moves on to the next submission. At most `concurrency` downloads run at once.
pub async fn download_pdfs<S>(
    source: &S,
    submissions: &[Submission],
    pdf_dir: &Path,
    concurrency: usize,
) -> Result<DownloadReport, ProceedingsError>
where
    S: SubmissionSource + ?Sized,
{
    tokio::fs::create_dir_all(pdf_dir)
        .await
        .map_err(|e| ProceedingsError::io(pdf_dir, e))?;

    let mut report = DownloadReport::default();
    let mut targets = Vec::new();
    for submission in submissions {
        match submission.decision() {
            None => {
                debug!(number = submission.number, "No decision, skipping");
                report.undecided.push(submission.number);
            }
            Some(_) if !submission.has_pdf() => {
                warn!(number = submission.number, "Decided submission has no PDF");
                report.without_pdf.push(submission.number);
            }
            Some(decision) => {
                debug!(number = submission.number, decision, "Queued PDF download");
                targets.push(submission);
            }
        }
    }

    info!(
        queued = targets.len(),
        concurrency,
        dir = %pdf_dir.display(),
        "Downloading camera-ready PDFs"
    );

    let outcomes: Vec<(u32, Result<PathBuf, String>)> = stream::iter(targets)
        .map(|submission| async move {
            let result = download_one(source, submission, pdf_dir).await;
            (submission.number, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for (number, outcome) in outcomes {
        match outcome {
            Ok(path) => {
                info!(number, path = %path.display(), "Saved submission");
                report.saved.push(number);
            }
            Err(reason) => {
                error!(number, reason = %reason, "Error during PDF download");
                report.failed.push(DownloadFailure { number, reason });
            }
        }
    }
    report.saved.sort_unstable();
    report.failed.sort_unstable_by_key(|f| f.number);

    Ok(report)
}

async fn download_one<S>(source: &S, submission: &Submission, pdf_dir: &Path) -> Result<PathBuf, String>
where
    S: SubmissionSource + ?Sized,
{
    let bytes = source
        .fetch_pdf(&submission.id)
        .await
        .map_err(|e| format!("fetch failed: {e}"))?;
    let path = source_pdf_path(pdf_dir, submission.number);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("write to {} failed: {e}", path.display()))?;
    Ok(path)
}

/// Write an `id,title` CSV row for every submission.
pub fn write_submissions_csv(path: &Path, submissions: &[Submission]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["id", "title"])?;
    for submission in submissions {
        let number = submission.number.to_string();
        writer.write_record([number.as_str(), submission.title().unwrap_or_default()])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = submissions.len(), "Wrote submissions CSV");
    Ok(())
}

/// Submissions whose decision is an acceptance, in input order.
pub fn accepted_submissions(submissions: &[Submission]) -> impl Iterator<Item = &Submission> {
    submissions.iter().filter(|s| s.is_accepted())
}

/// Export the accepted submissions as the metadata JSONL the proceedings compiler reads.
///
/// Rejected papers are left out so they never reach the proceedings.
/// Returns the number of records written.
pub fn export_metadata(path: &Path, submissions: &[Submission]) -> Result<usize, ProceedingsError> {
    let papers = accepted_submissions(submissions)
        .map(Submission::to_paper_metadata)
        .collect::<Result<Vec<PaperMetadata>, _>>()?;
    write_paper_metadata(path, &papers)?;
    Ok(papers.len())
}
