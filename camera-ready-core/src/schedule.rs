//! Session schedule CSV: which paper is presented how, and in which sessions.
//!
//! Expected columns (located by header name, extra columns ignored):
//! `id,title,authors,type,oral_session,spotlight_session,poster_session`.
//! Oral papers are scheduled by `oral_session`, posters by `spotlight_session`;
//! every paper also has a `poster_session`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::grouping::Presentation;

const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "authors",
    "type",
    "oral_session",
    "spotlight_session",
    "poster_session",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub paper_id: u32,
    pub title: String,
    pub authors: String,
    pub presentation: Presentation,
    /// Oral session for orals, spotlight session for posters.
    pub session: u32,
    pub poster_session: u32,
}

#[derive(Debug, Default)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub oral_sessions: BTreeMap<u32, Vec<u32>>,
    pub spotlight_sessions: BTreeMap<u32, Vec<u32>>,
    pub poster_sessions: BTreeMap<u32, Vec<u32>>,
    /// Paper ids whose `type` was neither `Oral` nor `Poster`.
    pub skipped: Vec<u32>,
}

impl Schedule {
    pub fn from_path(path: &Path) -> Result<Self, ScheduleError> {
        info!(path = %path.display(), "Reading session schedule");
        let file = File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScheduleError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::locate(&headers)?;

        let mut schedule = Schedule::default();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let invalid = |reason: String| ScheduleError::InvalidRow { line, reason };

            let paper_id = parse_number(&record, columns.id, "id").map_err(invalid)?;
            let kind = record.get(columns.kind).unwrap_or_default();
            let presentation = match kind.to_ascii_lowercase().as_str() {
                "oral" => Presentation::Oral,
                "poster" => Presentation::Poster,
                _ => {
                    warn!(paper_id, kind, line, "Paper is neither oral nor poster, skipping");
                    schedule.skipped.push(paper_id);
                    continue;
                }
            };
            let (session_column, session_name) = match presentation {
                Presentation::Oral => (columns.oral_session, "oral_session"),
                Presentation::Poster => (columns.spotlight_session, "spotlight_session"),
            };
            let session = parse_number(&record, session_column, session_name).map_err(invalid)?;
            let poster_session =
                parse_number(&record, columns.poster_session, "poster_session").map_err(invalid)?;

            let entry = ScheduleEntry {
                paper_id,
                title: record.get(columns.title).unwrap_or_default().to_string(),
                authors: record.get(columns.authors).unwrap_or_default().to_string(),
                presentation,
                session,
                poster_session,
            };
            debug!(paper_id, %presentation, session, poster_session, "Parsed schedule row");
            schedule.insert(entry);
        }

        info!(
            papers = schedule.entries.len(),
            orals = schedule.oral_paper_ids().len(),
            skipped = schedule.skipped.len(),
            "Loaded session schedule"
        );
        Ok(schedule)
    }

    fn insert(&mut self, entry: ScheduleEntry) {
        let by_session = match entry.presentation {
            Presentation::Oral => &mut self.oral_sessions,
            Presentation::Poster => &mut self.spotlight_sessions,
        };
        by_session.entry(entry.session).or_default().push(entry.paper_id);
        self.poster_sessions
            .entry(entry.poster_session)
            .or_default()
            .push(entry.paper_id);
        self.entries.push(entry);
    }

    pub fn entry(&self, paper_id: u32) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.paper_id == paper_id)
    }

    pub fn contains(&self, paper_id: u32) -> bool {
        self.entry(paper_id).is_some()
    }

    /// All oral paper ids, session by session.
    pub fn oral_paper_ids(&self) -> Vec<u32> {
        self.oral_sessions.values().flatten().copied().collect()
    }
}

struct ColumnIndex {
    id: usize,
    title: usize,
    authors: usize,
    kind: usize,
    oral_session: usize,
    spotlight_session: usize,
    poster_session: usize,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord) -> Result<Self, ScheduleError> {
        let mut found = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in found.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or(ScheduleError::MissingColumn(name))?;
        }
        let [id, title, authors, kind, oral_session, spotlight_session, poster_session] = found;
        Ok(Self {
            id,
            title,
            authors,
            kind,
            oral_session,
            spotlight_session,
            poster_session,
        })
    }
}

fn parse_number(record: &StringRecord, column: usize, name: &str) -> Result<u32, String> {
    let raw = record.get(column).unwrap_or_default();
    raw.parse()
        .map_err(|_| format!("column `{name}` is not a number: `{raw}`"))
}
