/// # camera-ready CLI Interface (Module)
///
/// Command parsing and orchestration for the `camera-ready` binary.
///
/// All proceedings logic (identifiers, page ranges, BibTeX, schedule joins) lives in
/// the `camera-ready-core` crate. This module loads the config, builds the
/// collaborators (OpenReview client, page counter) and prints user-facing summaries.
///
/// ## How To Use
/// - From the shell: `camera-ready --config camera-ready.yaml <command>`; see `--help`.
/// - From tests: call [`run`] with a constructed [`Cli`].
///
/// ## Extending
/// New subcommands go into [`Commands`]; keep non-trivial logic in the core crate.
use crate::load_config::{load_config, AppConfig};
use crate::openreview::OpenReviewClient;
use crate::snapshot::load_or_fetch;
use anyhow::{Context, Result};
use camera_ready_core::compile::{compile_proceedings, CompileTargets};
use camera_ready_core::contract::SubmissionSource;
use camera_ready_core::crossref::{agreement_report, oral_forum_ids, write_forum_ids};
use camera_ready_core::download::{download_pdfs, export_metadata, write_submissions_csv};
use camera_ready_core::grouping::Presentation;
use camera_ready_core::latex::convert_file;
use camera_ready_core::metadata::read_paper_metadata;
use camera_ready_core::pages::LopdfPageCounter;
use camera_ready_core::schedule::Schedule;
use camera_ready_core::submission::Submission;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// CLI for camera-ready: compile a conference's proceedings from review-platform data.
#[derive(Parser)]
#[clap(
    name = "camera-ready",
    version,
    about = "Download camera-ready papers and compile proceedings (BibTeX + renamed PDFs)"
)]
pub struct Cli {
    /// Path to the YAML config file
    #[clap(long, global = true, default_value = "camera-ready.yaml")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the BibTeX file and renamed PDFs from the metadata file in INDIR
    ///
    /// PDFs are read from the configured `pdf_dir`, the same directory `download` writes to.
    Bib {
        /// Directory holding `<name>__metadata.jsonl`; the `.bib` is written here too
        #[clap(short = 'i', long, default_value = "./")]
        indir: PathBuf,
        /// Directory receiving `<identifier>.pdf`
        #[clap(short = 'o', long, default_value = "./out")]
        outdir: PathBuf,
    },
    /// Download camera-ready PDFs of decided submissions
    Download {
        /// Submissions snapshot to use instead of fetching
        #[clap(long)]
        infile: Option<PathBuf>,
        /// Write an `id,title` CSV of all submissions
        #[clap(long)]
        csv: Option<PathBuf>,
        /// Write the metadata JSONL consumed by `bib`
        #[clap(long)]
        metadata: Option<PathBuf>,
        /// Do not download any PDFs
        #[clap(long)]
        skip_pdfs: bool,
    },
    /// Report which scheduled papers submitted a publication agreement
    Agreements {
        /// Session schedule CSV
        #[clap(long)]
        schedule: PathBuf,
        #[clap(long)]
        infile: Option<PathBuf>,
    },
    /// Write the forum ids of scheduled oral papers, one per line
    OralForumIds {
        #[clap(long)]
        schedule: PathBuf,
        #[clap(long)]
        infile: Option<PathBuf>,
        #[clap(long, default_value = "oral_forum_ids.txt")]
        out: PathBuf,
    },
    /// Rewrite accented characters of a text file as LaTeX escapes
    Latex { input: PathBuf, output: PathBuf },
}

/// Async CLI entrypoint shared by `main` and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Latex { input, output } => {
            tracing::info!(command = "latex", input = %input.display(), "Converting to LaTeX");
            convert_file(&input, &output)?;
            println!("Wrote {}", output.display());
            Ok(())
        }
        Commands::Bib { indir, outdir } => {
            let config = load_config(&cli.config)?;
            run_bib(config, &indir, outdir)
        }
        Commands::Download {
            infile,
            csv,
            metadata,
            skip_pdfs,
        } => {
            let config = load_config(&cli.config)?;
            let submissions = submissions(&config, infile.as_deref()).await?;
            if let Some(path) = csv {
                write_submissions_csv(&path, &submissions)
                    .with_context(|| format!("Failed to write CSV {}", path.display()))?;
            }
            if let Some(path) = metadata {
                let written = export_metadata(&path, &submissions)?;
                println!("Wrote {written} metadata records to {}", path.display());
            }
            if skip_pdfs {
                tracing::info!(command = "download", "Skipping PDF downloads");
                return Ok(());
            }
            let client = build_client(&config)?;
            let report = download_pdfs(
                &client,
                &submissions,
                &config.compiler.pdf_dir,
                config.download.concurrency,
            )
            .await?;
            tracing::info!(command = "download", ?report, "Download complete");
            println!(
                "Downloaded {} PDFs ({} failed, {} without decision, {} without PDF)",
                report.saved.len(),
                report.failed.len(),
                report.undecided.len(),
                report.without_pdf.len()
            );
            Ok(())
        }
        Commands::Agreements { schedule, infile } => {
            let config = load_config(&cli.config)?;
            let schedule = Schedule::from_path(&schedule)?;
            let submissions = submissions(&config, infile.as_deref()).await?;
            let report = agreement_report(&schedule, &submissions);
            println!(
                "{} / {} publication agreements submitted. {:.1}%",
                report.with_agreement,
                report.total,
                report.percentage()
            );
            if !report.missing.is_empty() {
                let missing: Vec<String> = report.missing.iter().map(u32::to_string).collect();
                println!("Missing: {}", missing.join(", "));
            }
            Ok(())
        }
        Commands::OralForumIds {
            schedule,
            infile,
            out,
        } => {
            let config = load_config(&cli.config)?;
            let schedule = Schedule::from_path(&schedule)?;
            let submissions = submissions(&config, infile.as_deref()).await?;
            let ids = oral_forum_ids(&schedule, &submissions);
            write_forum_ids(&out, &ids)?;
            println!("Wrote {} oral forum ids to {}", ids.len(), out.display());
            Ok(())
        }
    }
}

fn run_bib(config: AppConfig, indir: &Path, outdir: PathBuf) -> Result<()> {
    let compiler = &config.compiler;
    let metadata_path = indir.join(compiler.metadata_file_name());
    let papers = read_paper_metadata(&metadata_path)?;
    tracing::info!(
        command = "bib",
        papers = papers.len(),
        metadata = %metadata_path.display(),
        pdf_dir = %compiler.pdf_dir.display(),
        "Compiling proceedings"
    );

    let targets = CompileTargets {
        outdir,
        bib_path: indir.join(compiler.bib_file_name()),
    };
    match compile_proceedings(compiler, &papers, &LopdfPageCounter::new(), &targets) {
        Ok(report) => {
            tracing::info!(command = "bib", bib = %report.bib_path.display(), "Proceedings compiled");
            println!(
                "{} papers ({} orals, {} posters), {} pages. Wrote {}",
                report.papers.len(),
                report.count(Presentation::Oral),
                report.count(Presentation::Poster),
                report.total_pages(),
                report.bib_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(command = "bib", error = %e, "Compilation failed");
            Err(e.into())
        }
    }
}

fn build_client(config: &AppConfig) -> Result<OpenReviewClient> {
    OpenReviewClient::new_from_env(config.openreview()?)
        .map_err(|e| anyhow::anyhow!("Failed to construct OpenReview client: {e}"))
}

/// Submissions from the `--infile` snapshot, or from OpenReview when it can't be loaded.
///
/// Credentials are only required when the platform is actually queried.
async fn submissions(config: &AppConfig, infile: Option<&Path>) -> Result<Vec<Submission>> {
    let snapshot_dir = &config.openreview()?.snapshot_dir;
    load_or_fetch(infile, snapshot_dir, || async {
        build_client(config)?
            .list_submissions()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list submissions: {e}"))
    })
    .await
}
