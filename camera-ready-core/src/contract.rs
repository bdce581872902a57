//! # contract: seams to the outside world
//!
//! The proceedings pipeline depends on two collaborators it does not own:
//!
//! - a review platform that lists submissions and serves their PDFs
//!   ([`SubmissionSource`]), and
//! - something able to report how many pages a PDF has ([`PageCounter`]).
//!
//! Both are traits so the CLI crate can plug in a real HTTP client and the
//! default lopdf-based counter, while tests plug in `mockall` mocks.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`; the generated `MockSubmissionSource`
//!   and `MockPageCounter` are exported under the `test-export-mocks` feature so
//!   downstream crates can use them in their own tests.

use std::path::Path;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::PageCountError;
use crate::submission::Submission;

/// Error type for the review-platform contract (simple boxed error).
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only access to a review platform's submissions.
///
/// Implementors never mutate the platform.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// List every submission for the configured venue, including direct replies
    /// (decisions) in `details`.
    async fn list_submissions(&self) -> Result<Vec<Submission>, SourceError>;

    /// Fetch the PDF bytes of a single submission by its platform id.
    async fn fetch_pdf(&self, submission_id: &str) -> Result<Vec<u8>, SourceError>;
}

/// Reports the number of pages in a PDF file.
///
/// A missing file or an unreadable page count is an error; callers treat it as fatal.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait PageCounter: Send + Sync {
    fn page_count(&self, pdf_path: &Path) -> Result<u32, PageCountError>;
}
