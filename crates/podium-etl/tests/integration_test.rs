//! End-to-end tests for the rotate → load → reconcile pipeline.
//!
//! Each test writes small source files into a temp directory, rebuilds a
//! database from them, and checks the stored links and report views.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use podium_core::model::{MatchBranch, Person};
use podium_core::report::ReportKind;
use podium_core::schema::Database;
use podium_etl::{
    build_pipeline, build_reconcile_pipeline, rebuild_database, reconcile_database, run_workflow,
    EtlError, RosterRun, SourcePaths,
};
use treadle::{MemoryStateStore, StageStatus, StateStore, WorkItem};

const INSTRUMENTS: &str = "\
Instrument,Section
Piano,Keyboards
Singer,Vocals
Trombone,Brass
Trumpet,Brass
Saxophone,Woodwinds
";

const NAMES: &str = "\
Homer J. Simpson
Skinner, W. Seymour
Simpson, Lisa
Bender
Mr. Burns
";

const ASSIGNMENTS: &str = "\
Name,Instrument
\"Simpson, Homer J.\",Piano
Homer Simpson,Singer
\"Skinner, W. Seymour\",Trombone
Lisa Simpson,Saxophone
Bender,Piano
Moe Szyslak,Piano
";

struct Fixture {
    _dir: TempDir,
    sources: SourcePaths,
    db_path: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let write = |name: &str, contents: &str| {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    };

    let sources = SourcePaths {
        instruments: write("instruments.csv", INSTRUMENTS),
        names: write("names.txt", NAMES),
        assignments: write("name_instrument.csv", ASSIGNMENTS),
    };
    let db_path = dir.path().join("orchestra.db");

    Fixture {
        _dir: dir,
        sources,
        db_path,
    }
}

fn build(fx: &Fixture) -> Database {
    rebuild_database(&fx.db_path, &fx.sources).unwrap();
    let mut db = Database::open(&fx.db_path).unwrap();
    reconcile_database(&mut db).unwrap();
    db
}

fn find_person<'a>(persons: &'a [Person], first: &str, last: &str) -> &'a Person {
    persons
        .iter()
        .find(|p| {
            p.name.first_name.as_deref() == Some(first) && p.name.last_name.as_deref() == Some(last)
        })
        .unwrap()
}

fn instrument_id(db: &Database, name: &str) -> i64 {
    db.list_instruments()
        .unwrap()
        .into_iter()
        .find(|i| i.name == name)
        .unwrap()
        .id
        .get()
}

/// Test that the pipeline can be built and wired correctly
#[test]
fn test_pipeline_construction() {
    let fx = fixture();
    assert!(build_pipeline(fx.sources.clone(), fx.db_path.clone()).is_ok());
    assert!(build_reconcile_pipeline(fx.db_path.clone()).is_ok());
}

#[tokio::test]
async fn test_pipeline_runs_load_then_reconcile() {
    let fx = fixture();
    let workflow = build_pipeline(fx.sources.clone(), fx.db_path.clone()).unwrap();
    let run = RosterRun::fresh(fx.db_path.clone());
    let mut store = MemoryStateStore::new();

    run_workflow(&workflow, &run, &mut store).await.unwrap();

    for stage in ["load", "reconcile"] {
        let state = store.get_stage_state(run.id(), stage).await.unwrap().unwrap();
        assert_eq!(state.status, StageStatus::Complete);
    }

    let stats = Database::open(&fx.db_path).unwrap().stats().unwrap();
    assert_eq!(stats.persons, 4);
    assert_eq!(stats.links, 5);
}

#[tokio::test]
async fn test_pipeline_fails_when_load_violates_constraints() {
    let fx = fixture();
    fs::write(&fx.sources.assignments, "Name,Instrument\nBender,\n").unwrap();

    let workflow = build_pipeline(fx.sources.clone(), fx.db_path.clone()).unwrap();
    let run = RosterRun::fresh(fx.db_path.clone());
    let mut store = MemoryStateStore::new();

    let err = run_workflow(&workflow, &run, &mut store).await.unwrap_err();
    match err {
        EtlError::StageFailed { stage, message } => {
            assert_eq!(stage, "load");
            assert!(message.contains("Load failed"), "unexpected message: {message}");
        }
        other => panic!("Expected StageFailed, got {other:?}"),
    }

    // Reconcile never ran.
    let reconcile = store.get_stage_state(run.id(), "reconcile").await.unwrap();
    assert!(reconcile.map_or(true, |s| s.status != StageStatus::Complete));
}

#[tokio::test]
async fn test_reconcile_pipeline_relinks_existing_store() {
    let fx = fixture();
    {
        let mut db = build(&fx);
        db.replace_links(&[]).unwrap();
    }

    let workflow = build_reconcile_pipeline(fx.db_path.clone()).unwrap();
    let run = RosterRun::fresh(fx.db_path.clone());
    let mut store = MemoryStateStore::new();
    run_workflow(&workflow, &run, &mut store).await.unwrap();

    let db = Database::open(&fx.db_path).unwrap();
    assert_eq!(db.stats().unwrap().links, 5);
}

#[test]
fn test_load_summary() {
    let fx = fixture();
    let summary = rebuild_database(&fx.db_path, &fx.sources).unwrap();

    assert_eq!(summary.backup, None);
    assert_eq!(summary.instruments, 5);
    assert_eq!(summary.persons, 4);
    assert_eq!(summary.raw_assignments, 6);
    assert_eq!(summary.unparsed_names, vec!["mr. burns".to_string()]);
    assert!(summary.unparsed_assignments.is_empty());
}

#[test]
fn test_initialed_first_name_matches_via_middle_name() {
    let fx = fixture();
    let db = build(&fx);

    let persons = db.list_persons().unwrap();
    let skinner = find_person(&persons, "w.", "skinner");
    assert_eq!(skinner.name.middle_name.as_deref(), Some("seymour"));

    let trombone = instrument_id(&db, "trombone");
    let links: Vec<_> = db
        .list_links()
        .unwrap()
        .into_iter()
        .filter(|l| l.person_id == skinner.id)
        .collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].instrument_id.get(), trombone);
    assert_eq!(links[0].matched_on, MatchBranch::MiddleName);
}

#[test]
fn test_multi_instrumentalist_links_same_person_twice() {
    let fx = fixture();
    let db = build(&fx);

    let persons = db.list_persons().unwrap();
    let homer = find_person(&persons, "homer", "simpson");
    assert_eq!(homer.name.middle_name.as_deref(), Some("j."));

    let mut instruments: Vec<i64> = db
        .list_links()
        .unwrap()
        .into_iter()
        .filter(|l| l.person_id == homer.id)
        .map(|l| l.instrument_id.get())
        .collect();
    instruments.sort_unstable();

    let mut expected = vec![instrument_id(&db, "piano"), instrument_id(&db, "singer")];
    expected.sort_unstable();
    assert_eq!(instruments, expected);

    let multi = db.query_report(ReportKind::MultiInstrumentalists).unwrap();
    assert_eq!(multi.rows.len(), 2);
    assert!(multi
        .rows
        .iter()
        .all(|row| row[0].as_deref() == Some("homer")));
}

#[test]
fn test_unassigned_instrument_reported_without_musicians() {
    let fx = fixture();
    let db = build(&fx);

    let trumpet = instrument_id(&db, "trumpet");
    assert!(db
        .list_links()
        .unwrap()
        .iter()
        .all(|l| l.instrument_id.get() != trumpet));

    let empty = db
        .query_report(ReportKind::InstrumentsWithoutMusicians)
        .unwrap();
    assert_eq!(
        empty.rows,
        vec![vec![Some("trumpet".to_string()), Some("brass".to_string())]]
    );
}

#[test]
fn test_unmatched_assignment_is_dropped() {
    let fx = fixture();
    rebuild_database(&fx.db_path, &fx.sources).unwrap();
    let mut db = Database::open(&fx.db_path).unwrap();

    let summary = reconcile_database(&mut db).unwrap();
    assert_eq!(summary.links, 5);
    assert_eq!(summary.unmatched.len(), 1);
    assert_eq!(
        summary.unmatched[0].assignment.name.first_name.as_deref(),
        Some("moe")
    );
}

#[test]
fn test_reports() {
    let fx = fixture();
    let db = build(&fx);

    let all = db.query_report(ReportKind::AllMusicians).unwrap();
    assert_eq!(
        all.columns,
        vec!["first_name", "middle_name", "last_name", "instrument", "section"]
    );
    assert_eq!(all.rows.len(), 5);

    let shared = db.query_report(ReportKind::MultiplePlayers).unwrap();
    assert_eq!(shared.rows.len(), 2);
    assert!(shared
        .rows
        .iter()
        .all(|row| row[0].as_deref() == Some("piano")));

    let rendered = shared.render_text();
    assert!(rendered.contains("Piano"));
    assert!(rendered.contains("Bender"));
}

#[test]
fn test_rerun_rotates_previous_database() {
    let fx = fixture();
    build(&fx);

    let summary = rebuild_database(&fx.db_path, &fx.sources).unwrap();
    let backup = summary.backup.unwrap();
    assert!(backup.exists());

    // The backup keeps the old links; the fresh store has none until reconciled.
    assert_eq!(Database::open(&backup).unwrap().stats().unwrap().links, 5);
    let db = Database::open(&fx.db_path).unwrap();
    assert_eq!(db.stats().unwrap().links, 0);
    assert_eq!(db.stats().unwrap().persons, 4);
}

#[test]
fn test_bad_source_leaves_existing_database_alone() {
    let fx = fixture();
    build(&fx);

    fs::write(&fx.sources.instruments, "instrument\npiano\n").unwrap();
    assert!(rebuild_database(&fx.db_path, &fx.sources).is_err());

    let db = Database::open(&fx.db_path).unwrap();
    assert_eq!(db.stats().unwrap().links, 5);
}

#[test]
fn test_missing_required_field_aborts_load() {
    let fx = fixture();
    fs::write(
        &fx.sources.assignments,
        "Name,Instrument\nHomer Simpson,Piano\nBender,\n",
    )
    .unwrap();

    let err = rebuild_database(&fx.db_path, &fx.sources).unwrap_err();
    assert!(err.is_constraint_violation());

    let db = Database::open(&fx.db_path).unwrap();
    let stats = db.stats().unwrap();
    assert_eq!(stats.instruments, 0);
    assert_eq!(stats.persons, 0);
    assert_eq!(stats.raw_assignments, 0);
}

/// Test work item creation
#[test]
fn test_roster_run_work_item() {
    let run = RosterRun::new("test-id", PathBuf::from("/data/orchestra.db"));
    assert_eq!(run.id(), "test-id");
    assert_eq!(run.database_path, PathBuf::from("/data/orchestra.db"));
}
