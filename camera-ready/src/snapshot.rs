//! Local JSON snapshots of the platform's submission list.
//!
//! Commands that only read submissions accept `--infile`; when that file can't be
//! loaded the list is fetched from the platform and saved as
//! `<snapshot_dir>/notes_<YYYY-MM-DD_HH-MM-SS>.json` for the next run.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camera_ready_core::submission::Submission;
use chrono::Local;

pub fn load_snapshot(path: &Path) -> Result<Vec<Submission>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let submissions: Vec<Submission> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    tracing::info!(path = %path.display(), count = submissions.len(), "Loaded submissions snapshot");
    Ok(submissions)
}

/// Save `submissions` under `dir` with a timestamped name; returns the written path.
pub fn save_snapshot(dir: &Path, submissions: &[Submission]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("notes_{stamp}.json"));
    let body = serde_json::to_string_pretty(submissions)?;
    fs::write(&path, body).with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    tracing::info!(path = %path.display(), count = submissions.len(), "Saved submissions snapshot");
    Ok(path)
}

/// Use the snapshot at `infile` if it loads, otherwise run `fetch` and save its result.
pub async fn load_or_fetch<F, Fut>(
    infile: Option<&Path>,
    snapshot_dir: &Path,
    fetch: F,
) -> Result<Vec<Submission>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Submission>>>,
{
    if let Some(path) = infile {
        match load_snapshot(path) {
            Ok(submissions) => return Ok(submissions),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Could not load snapshot, fetching from the platform"
            ),
        }
    }
    let submissions = fetch().await?;
    save_snapshot(snapshot_dir, &submissions)?;
    Ok(submissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn submissions() -> Vec<Submission> {
        serde_json::from_value(json!([
            {"id": "a1", "number": 1, "content": {"title": {"value": "First"}}},
            {"id": "b2", "number": 2, "content": {}}
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn readable_snapshot_skips_the_fetch() {
        let dir = tempdir().unwrap();
        let path = save_snapshot(dir.path(), &submissions()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("notes_") && name.ends_with(".json"));

        let loaded = load_or_fetch(Some(&path), dir.path(), || async {
            Err::<Vec<Submission>, _>(anyhow::anyhow!("must not fetch when the snapshot loads"))
        })
        .await
        .unwrap();
        assert_eq!(loaded, submissions());
    }

    #[tokio::test]
    async fn missing_snapshot_fetches_and_saves() {
        let dir = tempdir().unwrap();
        let snapshot_dir = dir.path().join("notes");

        let loaded = load_or_fetch(Some(&dir.path().join("absent.json")), &snapshot_dir, || async {
            Ok::<_, anyhow::Error>(submissions())
        })
        .await
        .unwrap();

        assert_eq!(loaded.len(), 2);
        let saved: Vec<_> = fs::read_dir(&snapshot_dir).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }
}
