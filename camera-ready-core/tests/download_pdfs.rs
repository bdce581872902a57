use std::fs;

use serde_json::json;
use tempfile::tempdir;

use camera_ready_core::contract::MockSubmissionSource;
use camera_ready_core::download::{download_pdfs, export_metadata, write_submissions_csv};
use camera_ready_core::metadata::read_paper_metadata;
use camera_ready_core::submission::Submission;

fn submission(number: u32, decided: bool, with_pdf: bool) -> Submission {
    let decision = decided.then_some("Accept (Oral)");
    submission_with_decision(number, decision, with_pdf)
}

fn submission_with_decision(number: u32, decision: Option<&str>, with_pdf: bool) -> Submission {
    let mut content = json!({
        "title": {"value": format!("Paper {number}")},
        "abstract": {"value": "Abstract."},
        "authors": {"value": ["Ada Lovelace", "Alan Turing"]}
    });
    if with_pdf {
        content["pdf"] = json!({"value": format!("/pdf/{number}.pdf")});
    }
    let replies = match decision {
        Some(decision) => json!([{
            "invitations": [format!("venue/Submission{number}/-/Decision")],
            "content": {"decision": {"value": decision}}
        }]),
        None => json!([]),
    };
    serde_json::from_value(json!({
        "id": format!("note{number}"),
        "number": number,
        "forum": format!("note{number}"),
        "content": content,
        "details": {"directReplies": replies}
    }))
    .unwrap()
}

#[tokio::test]
async fn downloads_decided_pdfs_and_continues_past_failures() {
    let dir = tempdir().unwrap();
    let pdf_dir = dir.path().join("pdfs");
    let submissions = vec![
        submission(1, true, true),
        submission(2, false, true),
        submission(3, true, false),
        submission(4, true, true),
        submission(5, true, true),
    ];

    let mut source = MockSubmissionSource::new();
    source
        .expect_fetch_pdf()
        .times(3)
        .returning(|id: &str| match id {
            "note4" => Err("connection reset".into()),
            other => Ok(format!("%PDF {other}").into_bytes()),
        });

    let report = download_pdfs(&source, &submissions, &pdf_dir, 2)
        .await
        .expect("only directory creation is fatal");

    assert_eq!(report.saved, vec![1, 5]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].number, 4);
    assert!(report.failed[0].reason.contains("connection reset"));
    assert_eq!(report.undecided, vec![2]);
    assert_eq!(report.without_pdf, vec![3]);

    assert_eq!(fs::read_to_string(pdf_dir.join("Paper1.pdf")).unwrap(), "%PDF note1");
    assert!(pdf_dir.join("Paper5.pdf").is_file());
    assert!(!pdf_dir.join("Paper4.pdf").exists());
    assert!(!pdf_dir.join("Paper2.pdf").exists());
}

#[tokio::test]
async fn sequential_download_with_concurrency_zero_still_runs() {
    let dir = tempdir().unwrap();
    let mut source = MockSubmissionSource::new();
    source
        .expect_fetch_pdf()
        .times(1)
        .returning(|_| Ok(b"%PDF".to_vec()));

    let report = download_pdfs(&source, &[submission(7, true, true)], dir.path(), 0)
        .await
        .unwrap();

    assert_eq!(report.saved, vec![7]);
}

#[test]
fn writes_submission_csv_for_every_submission() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("submissions.csv");
    let submissions = vec![submission(1, true, true), submission(2, false, false)];

    write_submissions_csv(&path, &submissions).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "id,title\n1,Paper 1\n2,Paper 2\n"
    );
}

#[test]
fn exported_metadata_is_readable_by_the_compiler() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corl24__metadata.jsonl");
    let submissions = vec![
        submission(1, true, true),
        submission(2, false, true),
        submission(3, true, false),
    ];

    let written = export_metadata(&path, &submissions).unwrap();
    assert_eq!(written, 2);

    let papers = read_paper_metadata(&path).unwrap();
    let numbers: Vec<_> = papers.iter().map(|p| p.submission_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(papers[0].forum, "note1");
    assert_eq!(papers[0].authors, vec!["Ada Lovelace", "Alan Turing"]);
}

#[test]
fn rejected_papers_are_not_exported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corl24__metadata.jsonl");
    let submissions = vec![
        submission_with_decision(1, Some("Accept (Poster)"), true),
        submission_with_decision(2, Some("Reject"), true),
        submission_with_decision(3, Some("Accept (Oral)"), true),
    ];

    let written = export_metadata(&path, &submissions).unwrap();

    assert_eq!(written, 2);
    let numbers: Vec<_> = read_paper_metadata(&path)
        .unwrap()
        .iter()
        .map(|p| p.submission_number)
        .collect();
    assert_eq!(numbers, vec![1, 3]);
}

#[tokio::test]
async fn rejected_papers_are_still_downloaded() {
    let dir = tempdir().unwrap();
    let mut source = MockSubmissionSource::new();
    source
        .expect_fetch_pdf()
        .times(1)
        .returning(|_| Ok(b"%PDF".to_vec()));

    let report = download_pdfs(
        &source,
        &[submission_with_decision(2, Some("Reject"), true)],
        dir.path(),
        1,
    )
    .await
    .unwrap();

    assert_eq!(report.saved, vec![2]);
}
