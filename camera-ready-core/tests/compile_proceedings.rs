use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use camera_ready_core::compile::{compile_proceedings, CompileTargets};
use camera_ready_core::config::{CompilerConfig, ProceedingsInfo};
use camera_ready_core::contract::MockPageCounter;
use camera_ready_core::error::{PageCountError, ProceedingsError};
use camera_ready_core::grouping::Presentation;
use camera_ready_core::metadata::PaperMetadata;

fn proceedings_info() -> ProceedingsInfo {
    ProceedingsInfo {
        key: "CoRL-2024".into(),
        booktitle: "Proceedings of The 8th Conference on Robot Learning".into(),
        name: "Conference on Robot Learning".into(),
        shortname: "CoRL".into(),
        year: "2024".into(),
        editors: vec!["Pulkit Agrawal".into(), "Oliver Kroemer".into()],
        volume: "270".into(),
        start: "2024-11-06".into(),
        end: "2024-11-09".into(),
        address: "Munich, Germany".into(),
        conference_url: "https://2024.corl.org/".into(),
        conference_number: 8,
        latex_escape: true,
    }
}

fn config(pdf_dir: &Path, orals: &[&str]) -> CompilerConfig {
    CompilerConfig {
        conference_name: "corl24".into(),
        year_code: "24".into(),
        pdf_dir: pdf_dir.to_path_buf(),
        oral_forum_ids: orals.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        proceedings: proceedings_info(),
    }
}

fn paper(number: u32, forum: &str, first_author: &str) -> PaperMetadata {
    PaperMetadata {
        forum: forum.into(),
        submission_number: number,
        title: format!("Paper number {number}"),
        abstract_text: format!("Abstract {number}."),
        authors: vec![first_author.into(), "Grace Hopper".into()],
        code: None,
        video: None,
    }
}

fn write_dummy_pdfs(dir: &Path, numbers: &[u32]) {
    for n in numbers {
        fs::write(dir.join(format!("Paper{n}.pdf")), format!("%PDF dummy {n}")).unwrap();
    }
}

/// Page counter that answers from a fixed table keyed by file name.
fn counter_with(pages: &'static [(&'static str, u32)]) -> MockPageCounter {
    let mut counter = MockPageCounter::new();
    counter.expect_page_count().returning(move |path: &Path| {
        let name = path.file_name().unwrap().to_str().unwrap();
        pages
            .iter()
            .find(|(file, _)| *file == name)
            .map(|(_, n)| *n)
            .ok_or_else(|| PageCountError::Unreadable(format!("no pages for {name}")))
    });
    counter
}

struct Workspace {
    _root: tempfile::TempDir,
    pdf_dir: PathBuf,
    targets: CompileTargets,
}

fn workspace() -> Workspace {
    let root = tempdir().unwrap();
    let pdf_dir = root.path().join("pdfs");
    fs::create_dir_all(&pdf_dir).unwrap();
    let targets = CompileTargets {
        outdir: root.path().join("out"),
        bib_path: root.path().join("corl24.bib"),
    };
    Workspace {
        _root: root,
        pdf_dir,
        targets,
    }
}

#[test]
fn compiles_orals_first_with_contiguous_pages_and_renamed_pdfs() {
    let ws = workspace();
    write_dummy_pdfs(&ws.pdf_dir, &[1, 2, 3]);
    let papers = vec![
        paper(1, "f1", "John Smith"),
        paper(2, "f2", "Jane Smith"),
        paper(3, "f3", "Ann Jones"),
    ];
    let counter = counter_with(&[("Paper1.pdf", 5), ("Paper2.pdf", 3), ("Paper3.pdf", 7)]);

    let report = compile_proceedings(&config(&ws.pdf_dir, &["f3"]), &papers, &counter, &ws.targets)
        .expect("compilation should succeed");

    let order: Vec<_> = report
        .papers
        .iter()
        .map(|p| (p.identifier.as_str(), p.presentation, p.pages.start, p.pages.end()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("jones24", Presentation::Oral, 1, 7),
            ("smith24", Presentation::Poster, 8, 12),
            ("smith24a", Presentation::Poster, 13, 15),
        ]
    );
    assert_eq!(report.count(Presentation::Oral), 1);
    assert_eq!(report.count(Presentation::Poster), 2);
    assert_eq!(report.total_pages(), 15);

    for id in ["jones24", "smith24", "smith24a"] {
        assert!(ws.targets.outdir.join(format!("{id}.pdf")).is_file(), "{id}.pdf missing");
    }
    assert_eq!(
        fs::read_to_string(ws.targets.outdir.join("smith24a.pdf")).unwrap(),
        "%PDF dummy 2"
    );

    let bib = fs::read_to_string(&ws.targets.bib_path).unwrap();
    assert!(bib.starts_with("@Proceedings{CoRL-2024,\n"));
    let jones = bib.find("@InProceedings{jones24,").unwrap();
    let smith = bib.find("@InProceedings{smith24,").unwrap();
    let smith_a = bib.find("@InProceedings{smith24a,").unwrap();
    assert!(jones < smith && smith < smith_a);
    assert!(bib.contains("\tpages = {8-12},\n"));
    assert!(bib.contains("\tauthor = {Smith, Jane and Hopper, Grace},\n"));
    assert!(bib.contains("\topenreview = {f3},\n"));
    assert_eq!(bib.matches("@InProceedings{").count(), 3);
}

#[test]
fn page_ranges_are_contiguous_across_many_papers() {
    let ws = workspace();
    let numbers: Vec<u32> = (1..=12).collect();
    write_dummy_pdfs(&ws.pdf_dir, &numbers);
    let papers: Vec<_> = numbers
        .iter()
        .map(|&n| paper(n, &format!("f{n}"), &format!("Author Name{n}")))
        .collect();
    let mut counter = MockPageCounter::new();
    counter.expect_page_count().returning(|path: &Path| {
        let stem = path.file_stem().unwrap().to_str().unwrap();
        let n: u32 = stem.trim_start_matches("Paper").parse().unwrap();
        Ok(n % 4 + 1)
    });

    let report = compile_proceedings(
        &config(&ws.pdf_dir, &["f5", "f9"]),
        &papers,
        &counter,
        &ws.targets,
    )
    .unwrap();

    assert_eq!(report.papers[0].pages.start, 1);
    for pair in report.papers.windows(2) {
        assert_eq!(pair[1].pages.start, pair[0].pages.start + pair[0].pages.length);
    }
    let ids: HashSet<_> = report.papers.iter().map(|p| &p.identifier).collect();
    assert_eq!(ids.len(), papers.len());
}

#[test]
fn optional_links_appear_only_when_present_and_text_is_escaped() {
    let ws = workspace();
    write_dummy_pdfs(&ws.pdf_dir, &[1, 2]);
    let mut with_links = paper(1, "f1", "José Núñez");
    with_links.code = Some("https://github.com/x/y".into());
    with_links.video = Some("https://youtu.be/z".into());
    let without_links = paper(2, "f2", "Ada Lovelace");
    let counter = counter_with(&[("Paper1.pdf", 2), ("Paper2.pdf", 2)]);

    compile_proceedings(
        &config(&ws.pdf_dir, &[]),
        &[with_links, without_links],
        &counter,
        &ws.targets,
    )
    .unwrap();

    let bib = fs::read_to_string(&ws.targets.bib_path).unwrap();
    let (first, second) = bib.split_at(bib.find("@InProceedings{lovelace24,").unwrap());
    assert!(first.contains("\tsoftware = {https://github.com/x/y},\n"));
    assert!(first.contains("\tvideo = {https://youtu.be/z},\n"));
    assert!(first.contains("N\\'u\\~nez, Jos\\'e"));
    assert!(!second.contains("software"));
    assert!(!second.contains("video"));
    assert!(ws.targets.outdir.join("núñez24.pdf").is_file());
}

#[test]
fn missing_pdf_aborts_without_writing_bib() {
    let ws = workspace();
    write_dummy_pdfs(&ws.pdf_dir, &[1]);
    let papers = vec![paper(1, "f1", "Ada Lovelace"), paper(2, "f2", "Alan Turing")];
    let counter = counter_with(&[("Paper1.pdf", 4)]);

    let err = compile_proceedings(&config(&ws.pdf_dir, &[]), &papers, &counter, &ws.targets)
        .unwrap_err();

    match err {
        ProceedingsError::MissingPdf {
            submission_number, ..
        } => assert_eq!(submission_number, 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!ws.targets.bib_path.exists());
    // Copies made before the failure are left in place.
    assert!(ws.targets.outdir.join("lovelace24.pdf").is_file());
}

#[test]
fn page_counter_failure_is_fatal() {
    let ws = workspace();
    write_dummy_pdfs(&ws.pdf_dir, &[1]);
    let mut counter = MockPageCounter::new();
    counter
        .expect_page_count()
        .times(1)
        .returning(|_| Err(PageCountError::Unreadable("corrupt".into())));

    let err = compile_proceedings(
        &config(&ws.pdf_dir, &[]),
        &[paper(1, "f1", "Ada Lovelace")],
        &counter,
        &ws.targets,
    )
    .unwrap_err();

    assert!(matches!(err, ProceedingsError::PageCount { .. }), "got: {err:?}");
}

#[test]
fn zero_page_pdf_is_rejected() {
    let ws = workspace();
    write_dummy_pdfs(&ws.pdf_dir, &[1]);
    let counter = counter_with(&[("Paper1.pdf", 0)]);

    let err = compile_proceedings(
        &config(&ws.pdf_dir, &[]),
        &[paper(1, "f1", "Ada Lovelace")],
        &counter,
        &ws.targets,
    )
    .unwrap_err();

    assert!(matches!(err, ProceedingsError::ZeroPages { .. }), "got: {err:?}");
}

#[test]
fn invalid_first_author_fails_before_touching_files() {
    let ws = workspace();
    write_dummy_pdfs(&ws.pdf_dir, &[1]);
    let mut lonely = paper(1, "f1", "x");
    lonely.authors.clear();
    let mut counter = MockPageCounter::new();
    counter.expect_page_count().never();

    let err = compile_proceedings(&config(&ws.pdf_dir, &[]), &[lonely], &counter, &ws.targets)
        .unwrap_err();

    assert!(matches!(err, ProceedingsError::InvalidAuthor { .. }));
    assert!(!ws.targets.outdir.exists());
}
