/// `load_config` module: Loads a static YAML config and adapts it into the core crate's config types.
///
/// This module is the only place where user-supplied YAML is parsed and mapped to typed structs.
///
/// # Responsibilities
/// - Parse the YAML file into intermediate (file-side) structs
/// - Validate values the core relies on (two-digit year code)
/// - Resolve the oral allow-list, inline and/or from a file next to the config
/// - Never carry secrets: review-platform credentials come from the environment
///   when a client is built (see [`crate::openreview`])
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use camera_ready_core::config::{CompilerConfig, DownloadSettings, OpenReviewConfig, ProceedingsInfo};
use camera_ready_core::crossref::read_forum_ids;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct RawConfig {
    conference: ConferenceSection,
    pdf_dir: PathBuf,
    #[serde(default)]
    oral_forum_ids: Vec<String>,
    #[serde(default)]
    oral_forum_ids_file: Option<PathBuf>,
    proceedings: ProceedingsInfo,
    #[serde(default)]
    openreview: Option<OpenReviewConfig>,
    #[serde(default)]
    download: DownloadSettings,
}

#[derive(Debug, Deserialize)]
struct ConferenceSection {
    name: String,
    year_code: String,
}

/// Fully loaded configuration for every CLI command.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub compiler: CompilerConfig,
    /// Absent when the config only serves offline commands (`bib`, `latex`).
    pub openreview: Option<OpenReviewConfig>,
    pub download: DownloadSettings,
}

impl AppConfig {
    pub fn openreview(&self) -> Result<&OpenReviewConfig> {
        self.openreview
            .as_ref()
            .context("config has no `openreview` section")
    }
}

/// Loads the YAML config file and returns a validated [`AppConfig`].
///
/// Relative `oral_forum_ids_file` paths are resolved against the config file's directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let year_code = raw.conference.year_code.trim().to_string();
    if year_code.len() != 2 || !year_code.chars().all(|c| c.is_ascii_digit()) {
        error!(year_code = %year_code, "year_code must be two digits");
        bail!("conference.year_code must be exactly two digits, got {year_code:?}");
    }

    let mut oral_forum_ids: HashSet<String> = raw
        .oral_forum_ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    if let Some(file) = raw.oral_forum_ids_file {
        let file = match path_ref.parent() {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file,
        };
        let from_file = read_forum_ids(&file)
            .with_context(|| format!("Failed to read oral forum ids from {}", file.display()))?;
        info!(path = %file.display(), count = from_file.len(), "Loaded oral forum ids from file");
        oral_forum_ids.extend(from_file);
    }

    let compiler = CompilerConfig {
        conference_name: raw.conference.name,
        year_code,
        pdf_dir: raw.pdf_dir,
        oral_forum_ids,
        proceedings: raw.proceedings,
    };
    compiler.trace_loaded();

    Ok(AppConfig {
        compiler,
        openreview: raw.openreview,
        download: raw.download,
    })
}
