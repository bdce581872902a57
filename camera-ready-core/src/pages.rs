//! Default [`PageCounter`]: parse the PDF with lopdf, fall back to `pdfinfo`.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use lopdf::Document;
use regex::Regex;
use tracing::{debug, warn};

use crate::contract::PageCounter;
use crate::error::PageCountError;

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfPageCounter;

impl LopdfPageCounter {
    pub fn new() -> Self {
        Self
    }
}

impl PageCounter for LopdfPageCounter {
    fn page_count(&self, pdf_path: &Path) -> Result<u32, PageCountError> {
        if !pdf_path.is_file() {
            return Err(PageCountError::NotFound(pdf_path.to_path_buf()));
        }

        match Document::load(pdf_path) {
            Ok(document) => {
                let count = document.get_pages().len();
                debug!(path = %pdf_path.display(), pages = count, "Counted pages with lopdf");
                u32::try_from(count)
                    .map_err(|_| PageCountError::Unreadable(format!("page count {count} out of range")))
            }
            Err(err) => {
                warn!(
                    path = %pdf_path.display(),
                    error = %err,
                    "lopdf could not open PDF, falling back to pdfinfo"
                );
                page_count_with_pdfinfo(pdf_path).ok_or_else(|| {
                    PageCountError::Unreadable(format!(
                        "lopdf failed to open {} ({err}) and pdfinfo reported no page count",
                        pdf_path.display()
                    ))
                })
            }
        }
    }
}

fn page_count_with_pdfinfo(pdf_path: &Path) -> Option<u32> {
    let output = Command::new("pdfinfo").arg(pdf_path).output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_pdfinfo_pages(&String::from_utf8_lossy(&output.stdout))
}

/// Extract the `Pages:` value from `pdfinfo` output.
pub fn parse_pdfinfo_pages(stdout: &str) -> Option<u32> {
    static PAGES_RE: OnceLock<Regex> = OnceLock::new();
    let re = PAGES_RE.get_or_init(|| Regex::new(r"(?m)^Pages:\s+(\d+)\s*$").expect("valid regex"));
    re.captures(stdout)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pages_line_from_pdfinfo() {
        let stdout = "Title:          Paper\nProducer:       pdfTeX\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_pdfinfo_pages(stdout), Some(12));
    }

    #[test]
    fn pdfinfo_output_without_pages_is_none() {
        assert_eq!(parse_pdfinfo_pages("Title: x\n"), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = LopdfPageCounter::new()
            .page_count(Path::new("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, PageCountError::NotFound(_)));
    }
}
