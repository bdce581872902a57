//! Bibliographic identifiers of the form `lastnameYY`.
//!
//! The base identifier is the lowercased last whitespace-separated token of the
//! first author's name followed by the year code. Later papers that share a base
//! get a letter suffix in input order: the first keeps `smith24`, the second is
//! `smith24a`, the third `smith24b`. Past `z` the suffix continues `aa`, `ab`, ...

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::error::ProceedingsError;
use crate::metadata::PaperMetadata;

/// Derive the unsuffixed identifier for one paper.
pub fn base_identifier(paper: &PaperMetadata, year_code: &str) -> Result<String, ProceedingsError> {
    let invalid = |reason: &str| ProceedingsError::InvalidAuthor {
        submission_number: paper.submission_number,
        reason: reason.to_string(),
    };

    let first_author = paper.authors.first().ok_or_else(|| invalid("author list is empty"))?;
    let tokens: Vec<&str> = first_author.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Err(invalid("first author name is blank")),
        [single] => Err(invalid(&format!(
            "first author `{single}` has no separable last name"
        ))),
        [.., last] if last.contains(&['/', '\\'][..]) => Err(invalid(&format!(
            "last name `{last}` contains a path separator"
        ))),
        [.., last] => Ok(format!("{}{}", last.to_lowercase(), year_code)),
    }
}

/// Suffix for the n-th duplicate (0-based): 0 -> "a", 25 -> "z", 26 -> "aa".
fn collision_suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'a' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Assign an identifier to every paper, same order and length as the input.
///
/// Output identifiers are unique across the whole slice. Collisions are
/// resolved, not rejected; each one is logged for the operator.
pub fn assign_identifiers(
    papers: &[PaperMetadata],
    year_code: &str,
) -> Result<Vec<String>, ProceedingsError> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::with_capacity(papers.len());
    let mut identifiers = Vec::with_capacity(papers.len());

    for (index, paper) in papers.iter().enumerate() {
        let base = base_identifier(paper, year_code)?;
        let seen = occurrences.entry(base.clone()).or_insert(0);

        let identifier = loop {
            let candidate = match *seen {
                0 => base.clone(),
                n => format!("{base}{}", collision_suffix(n - 1)),
            };
            *seen += 1;
            if emitted.insert(candidate.clone()) {
                break candidate;
            }
        };

        if identifier != base {
            info!(
                index,
                base = %base,
                identifier = %identifier,
                title = %paper.title,
                "Identifier conflict found, appending suffix"
            );
        }
        identifiers.push(identifier);
    }

    Ok(identifiers)
}
