//! BibTeX rendering for the proceedings file.
//!
//! The output follows the PMLR proceedings grammar: one `@Proceedings{...}`
//! preamble followed by one `@InProceedings{...}` entry per paper.

use crate::config::ProceedingsInfo;

/// Pages `[start, start + length)` of one paper within the volume, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub length: u32,
}

impl PageRange {
    /// Last page, inclusive. Only meaningful for `length >= 1`.
    pub fn end(&self) -> u32 {
        self.start + self.length - 1
    }

    /// First page of the paper that follows this one.
    pub fn next_start(&self) -> u32 {
        self.start + self.length
    }
}

/// Everything that goes into one `@InProceedings` entry.
#[derive(Debug, Clone)]
pub struct BibEntry<'a> {
    pub identifier: &'a str,
    pub title: &'a str,
    pub authors: &'a [String],
    pub pages: PageRange,
    pub forum: &'a str,
    pub abstract_text: &'a str,
    pub software: Option<&'a str>,
    pub video: Option<&'a str>,
}

/// `"First Middle Last"` -> `"Last, First Middle"`. A single token stays as is.
pub fn format_name(full_name: &str) -> String {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, first)) => format!("{}, {}", last, first.join(" ")),
    }
}

/// Join names as `Last, First and Last, First ...`.
///
/// Multi-word surnames, suffixes and family-name-first orders are not detected.
pub fn format_author_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format_name(name))
        .collect::<Vec<_>>()
        .join(" and ")
}

pub fn render_entry(entry: &BibEntry<'_>) -> String {
    let mut out = format!(
        "@InProceedings{{{id},\n\
         \ttitle = {{{title}}},\n\
         \tauthor = {{{authors}}},\n\
         \tpages = {{{start}-{end}}},\n\
         \topenreview = {{{forum}}},\n\
         \tabstract = {{{abstract_text}}},\n",
        id = entry.identifier,
        title = entry.title,
        authors = format_author_names(entry.authors),
        start = entry.pages.start,
        end = entry.pages.end(),
        forum = entry.forum,
        abstract_text = entry.abstract_text,
    );
    let optional = [("software", entry.software), ("video", entry.video)];
    for (field, value) in optional {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            out.push_str(&format!("\t{field} = {{{value}}},\n"));
        }
    }
    out.push_str("}\n\n");
    out
}

/// The `@Proceedings{...}` block that opens the file.
pub fn render_preamble(info: &ProceedingsInfo) -> String {
    format!(
        "@Proceedings{{{key},\n\
         \tbooktitle = {{{booktitle}}},\n\
         \tname = {{{name}}},\n\
         \tshortname = {{{shortname}}},\n\
         \tyear = {{{year}}},\n\
         \teditor = {{{editors}}},\n\
         \tvolume = {{{volume}}},\n\
         \tstart = {{{start}}},\n\
         \tend = {{{end}}},\n\
         \taddress = {{{address}}},\n\
         \tconference_url = {{{url}}},\n\
         \tconference_number = {{{number}}},\n\
         }}\n\n",
        key = info.key,
        booktitle = info.booktitle,
        name = info.name,
        shortname = info.shortname,
        year = info.year,
        editors = format_author_names(&info.editors),
        volume = info.volume,
        start = info.start,
        end = info.end,
        address = info.address,
        url = info.conference_url,
        number = info.conference_number,
    )
}
