//! End-to-end session runs against scripted providers.

use fact_finder::pipeline::{export::parse_export, NoDelay, NoProgress};
use fact_finder::testing::{hits, MockModel, MockSearcher, MockSheetStore, RecordingProgress};
use fact_finder::{
    FactFinderError, SearchOptions, Session, StageError, Template, WarningKind, WriteBack,
};

fn write_input(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[tokio::test]
async fn test_csv_to_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "Name,City\nAlice,Paris\nBob,Oslo\n,Rome\n");
    let output = dir.path().join("extracted_data.csv");

    let mut session = Session::new();
    session.load_csv(&input).unwrap();
    assert_eq!(session.select_column("Name").unwrap(), ["Alice", "Bob"]);

    let searcher = MockSearcher::new()
        .with_hits("Find the email of Alice", hits(3))
        .with_no_results("Find the email of Bob");
    let progress = RecordingProgress::default();

    let warnings = session
        .search(
            &Template::new("Find the email of {entity}"),
            &searcher,
            &NoDelay,
            &progress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

    let records = session.search_records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].results.len(), 3);
    assert!(records[1].results.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].entity, "Bob");
    assert_eq!(warnings[0].kind, WarningKind::NoResults);
    assert_eq!(progress.steps(), vec![(1, 2), (2, 2)]);

    let model = MockModel::new()
        .reply_when("Alice", "alice@example.com")
        .fail_when("Bob");
    let warnings = session
        .extract(
            &Template::new("Extract the email of {entity} from: {results}"),
            &model,
            &NoProgress,
        )
        .await
        .unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::CompletionFailed);

    session.write_csv(&output).unwrap();

    let exported = parse_export(std::fs::File::open(&output).unwrap()).unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].entity, "Alice");
    assert_eq!(exported[0].extracted_info, "alice@example.com");
    assert_eq!(exported[1].entity, "Bob");
    assert_eq!(exported[1].extracted_info, "Error");

    // No spreadsheet behind this session: write-back does nothing and the
    // export stays available.
    assert_eq!(session.write_back().await.unwrap(), WriteBack::Skipped);
    assert_eq!(session.export_table().unwrap().len(), 2);
}

#[tokio::test]
async fn test_sheet_round_trip_with_write_back() {
    let store = MockSheetStore::new(
        "sheet-1",
        rows(&[&["Company", "Country"], &["Acme", "US"], &["Globex", ""]]),
    );
    let mut session = Session::new();
    session
        .load_sheet(
            Box::new(store),
            "https://docs.google.com/spreadsheets/d/sheet-1/edit",
        )
        .await
        .unwrap();
    session.select_column("Company").unwrap();

    let searcher = MockSearcher::new()
        .with_hits("Acme", hits(1))
        .with_hits("Globex", hits(2));
    session
        .search(
            &Template::new("{entity}"),
            &searcher,
            &NoDelay,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

    let model = MockModel::new()
        .reply_when("Acme", "info@acme.example")
        .reply_when("Globex", "hello@globex.example");
    session
        .extract(&Template::new("{entity}\n{results}"), &model, &NoProgress)
        .await
        .unwrap();

    assert_eq!(
        session.write_back().await.unwrap(),
        WriteBack::Written { rows: 2 }
    );
}

#[tokio::test]
async fn test_stages_are_gated() {
    let mut session = Session::new();

    let err = session
        .extract(&Template::default(), &MockModel::new(), &NoProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, FactFinderError::Stage(StageError::NotReady { .. })));

    assert!(matches!(
        session.export_table(),
        Err(FactFinderError::Stage(StageError::NotReady { .. }))
    ));
    assert_eq!(session.write_back().await.unwrap(), WriteBack::Skipped);
}

#[tokio::test]
async fn test_failed_write_back_keeps_export() {
    let store = MockSheetStore::new("sheet-1", rows(&[&["Name"], &["Alice"]])).failing_writes();
    let mut session = Session::new();
    session
        .load_sheet(
            Box::new(store),
            "https://docs.google.com/spreadsheets/d/sheet-1/edit",
        )
        .await
        .unwrap();
    session.select_column("Name").unwrap();
    session
        .search(
            &Template::new("{entity}"),
            &MockSearcher::new(),
            &NoDelay,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();
    session
        .extract(&Template::new("{entity}"), &MockModel::new(), &NoProgress)
        .await
        .unwrap();

    assert!(session.write_back().await.is_err());
    assert_eq!(session.export_table().unwrap().rows()[0], ["Alice", "n/a"]);
}
