//! High-level pipeline: metadata → identifiers → groups → page ranges → BibTeX + renamed PDFs.
//!
//! # Responsibilities
//! - Assign every paper a unique `lastnameYY` identifier
//! - Order papers orals first, then posters, each in input order
//! - Count pages through the injected [`PageCounter`] and accumulate contiguous page ranges
//! - Copy `Paper<number>.pdf` to `<identifier>.pdf` in the output directory
//! - Write the concatenated `.bib` file once every paper has been processed
//!
//! # Error Handling
//! Fail fast: the first missing PDF, unreadable page count or malformed author
//! aborts the run. PDFs copied before the failure stay in the output directory
//! and the `.bib` file is not written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::bibtex::{render_entry, render_preamble, BibEntry, PageRange};
use crate::config::CompilerConfig;
use crate::contract::PageCounter;
use crate::error::ProceedingsError;
use crate::grouping::{split_by_presentation, IdentifiedPaper, Presentation};
use crate::identifier::assign_identifiers;
use crate::latex::convert_to_latex;

/// Where the compiled proceedings go.
#[derive(Debug, Clone)]
pub struct CompileTargets {
    /// Directory receiving the renamed `<identifier>.pdf` files.
    pub outdir: PathBuf,
    /// Path of the `.bib` file to write.
    pub bib_path: PathBuf,
}

#[derive(Debug)]
pub struct ProceedingsReport {
    pub papers: Vec<CompiledPaper>,
    pub bib_path: PathBuf,
}

impl ProceedingsReport {
    pub fn count(&self, presentation: Presentation) -> usize {
        self.papers
            .iter()
            .filter(|p| p.presentation == presentation)
            .count()
    }

    pub fn total_pages(&self) -> u32 {
        self.papers.iter().map(|p| p.pages.length).sum()
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPaper {
    pub identifier: String,
    pub submission_number: u32,
    pub presentation: Presentation,
    pub pages: PageRange,
    pub pdf_path: PathBuf,
}

/// Source PDF location for a submission: `<pdf_dir>/Paper<number>.pdf`.
pub fn source_pdf_path(pdf_dir: &Path, submission_number: u32) -> PathBuf {
    pdf_dir.join(format!("Paper{submission_number}.pdf"))
}

/// Run the whole compilation for one proceedings volume.
pub fn compile_proceedings<C>(
    config: &CompilerConfig,
    papers: &[crate::metadata::PaperMetadata],
    page_counter: &C,
    targets: &CompileTargets,
) -> Result<ProceedingsReport, ProceedingsError>
where
    C: PageCounter + ?Sized,
{
    info!(
        papers = papers.len(),
        outdir = %targets.outdir.display(),
        "[COMPILE] Starting proceedings compilation"
    );

    let identifiers = assign_identifiers(papers, &config.year_code)?;
    let groups = split_by_presentation(papers, &identifiers, &config.oral_forum_ids);

    fs::create_dir_all(&targets.outdir).map_err(|e| {
        error!(error = ?e, path = %targets.outdir.display(), "[COMPILE][ERROR] Failed to create output directory");
        ProceedingsError::io(&targets.outdir, e)
    })?;

    let mut bibtex = render_preamble(&config.proceedings);
    let mut compiled = Vec::with_capacity(papers.len());
    let mut page_start = 1;

    for (presentation, paper) in groups.in_proceedings_order() {
        let (entry_text, result) =
            compile_paper(config, paper, presentation, page_start, page_counter, &targets.outdir)?;
        page_start = result.pages.next_start();
        bibtex.push_str(&entry_text);
        compiled.push(result);
    }

    fs::write(&targets.bib_path, &bibtex).map_err(|e| {
        error!(error = ?e, path = %targets.bib_path.display(), "[COMPILE][ERROR] Failed to write BibTeX file");
        ProceedingsError::io(&targets.bib_path, e)
    })?;

    info!(
        bib = %targets.bib_path.display(),
        papers = compiled.len(),
        total_pages = page_start - 1,
        "[COMPILE] Proceedings written"
    );

    Ok(ProceedingsReport {
        papers: compiled,
        bib_path: targets.bib_path.clone(),
    })
}

fn compile_paper<C>(
    config: &CompilerConfig,
    paper: &IdentifiedPaper<'_>,
    presentation: Presentation,
    page_start: u32,
    page_counter: &C,
    outdir: &Path,
) -> Result<(String, CompiledPaper), ProceedingsError>
where
    C: PageCounter + ?Sized,
{
    let meta = paper.metadata;
    let source = source_pdf_path(&config.pdf_dir, meta.submission_number);
    if !source.is_file() {
        error!(path = %source.display(), submission = meta.submission_number, "[COMPILE][ERROR] PDF missing");
        return Err(ProceedingsError::MissingPdf {
            submission_number: meta.submission_number,
            path: source,
        });
    }

    let length = page_counter
        .page_count(&source)
        .map_err(|e| ProceedingsError::PageCount {
            path: source.clone(),
            source: e,
        })?;
    if length == 0 {
        return Err(ProceedingsError::ZeroPages { path: source });
    }
    let pages = PageRange {
        start: page_start,
        length,
    };
    debug!(
        identifier = paper.identifier,
        path = %source.display(),
        pages = length,
        "Counted PDF pages"
    );

    let escape = |text: &str| {
        if config.proceedings.latex_escape {
            convert_to_latex(text)
        } else {
            text.to_string()
        }
    };
    let title = escape(&meta.title);
    let abstract_text = escape(&meta.abstract_text);
    let authors: Vec<String> = meta.authors.iter().map(|a| escape(a)).collect();

    let entry = BibEntry {
        identifier: paper.identifier,
        title: &title,
        authors: &authors,
        pages,
        forum: &meta.forum,
        abstract_text: &abstract_text,
        software: meta.code.as_deref(),
        video: meta.video.as_deref(),
    };
    let text = render_entry(&entry);

    let destination = outdir.join(format!("{}.pdf", paper.identifier));
    info!(
        from = %source.display(),
        to = %destination.display(),
        "Rename PDF"
    );
    fs::copy(&source, &destination).map_err(|e| ProceedingsError::io(&destination, e))?;

    Ok((
        text,
        CompiledPaper {
            identifier: paper.identifier.to_string(),
            submission_number: meta.submission_number,
            presentation,
            pages,
            pdf_path: destination,
        },
    ))
}
