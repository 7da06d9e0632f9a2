// tests/change_monitor.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use tscbuild::fs::mock::MockFileSystem;
use tscbuild::fs::RealFileSystem;
use tscbuild::watch::{diff, snapshot, ChangeMonitor, FileSetSnapshot, SourcePattern};
use tscbuild_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn ts_pattern() -> SourcePattern {
    SourcePattern::for_extension("ts").expect("valid pattern")
}

fn monitor(fs: &MockFileSystem) -> ChangeMonitor {
    ChangeMonitor::new(Arc::new(fs.clone()), "src", ts_pattern())
}

#[test]
fn first_poll_only_takes_a_baseline() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("src/a.ts", "");
    fs.add_file("src/b.ts", "");

    let mut monitor = monitor(&fs);
    assert!(!monitor.has_baseline());

    assert!(monitor.poll_once()?.is_empty());
    assert!(monitor.has_baseline());
    Ok(())
}

#[test]
fn second_poll_reports_files_modified_after_the_baseline() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("src/a.ts", "");
    fs.add_file("src/b.ts", "");

    let mut monitor = monitor(&fs);
    monitor.poll_once()?;

    fs.touch("src/b.ts");
    assert_eq!(monitor.poll_once()?, vec![PathBuf::from("src/b.ts")]);

    // Nothing changed since the previous poll.
    assert!(monitor.poll_once()?.is_empty());
    Ok(())
}

#[test]
fn added_and_removed_files_count_as_changes() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("src/a.ts", "");
    fs.add_file("src/old.ts", "");

    let mut monitor = monitor(&fs);
    monitor.poll_once()?;

    fs.add_file("src/nested/new.ts", "");
    fs.remove_file("src/old.ts");

    let changed = monitor.poll_once()?;
    assert_eq!(
        changed,
        vec![PathBuf::from("src/nested/new.ts"), PathBuf::from("src/old.ts")]
    );
    Ok(())
}

#[test]
fn files_outside_the_pattern_are_ignored() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("src/a.ts", "");

    let mut monitor = monitor(&fs);
    monitor.poll_once()?;

    fs.add_file("src/notes.txt", "");
    fs.add_file("other/b.ts", "");

    assert!(monitor.poll_once()?.is_empty());
    Ok(())
}

#[test]
fn diff_covers_added_removed_and_modified() {
    let t = MockFileSystem::tick_time;

    let previous: FileSetSnapshot = [
        (PathBuf::from("same.ts"), t(1)),
        (PathBuf::from("modified.ts"), t(1)),
        (PathBuf::from("removed.ts"), t(1)),
    ]
    .into_iter()
    .collect();

    let current: FileSetSnapshot = [
        (PathBuf::from("same.ts"), t(1)),
        (PathBuf::from("modified.ts"), t(2)),
        (PathBuf::from("added.ts"), t(2)),
    ]
    .into_iter()
    .collect();

    let changed: Vec<PathBuf> = diff(&previous, &current).into_iter().collect();
    assert_eq!(
        changed,
        vec![
            PathBuf::from("added.ts"),
            PathBuf::from("modified.ts"),
            PathBuf::from("removed.ts"),
        ]
    );

    assert!(diff(&current, &current).is_empty());
}

#[test]
fn missing_root_snapshots_as_empty() -> TestResult {
    let fs = MockFileSystem::new();
    let snap = snapshot(&fs, PathBuf::from("nowhere").as_path(), &ts_pattern())?;
    assert!(snap.is_empty());
    Ok(())
}

#[test]
fn real_filesystem_snapshot_sees_new_and_deleted_files() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("src");
    std::fs::create_dir_all(root.join("app"))?;
    std::fs::write(root.join("main.ts"), "let a = 1;")?;
    std::fs::write(root.join("app/view.ts"), "let b = 2;")?;
    std::fs::write(root.join("app/style.css"), "")?;

    let mut monitor = ChangeMonitor::new(Arc::new(RealFileSystem), &root, ts_pattern());
    monitor.poll_once()?;

    let snap = snapshot(&RealFileSystem, &root, &ts_pattern())?;
    assert_eq!(snap.len(), 2);
    assert!(snap.modified(&root.join("app/view.ts")).is_some());

    std::fs::write(root.join("app/extra.ts"), "")?;
    std::fs::remove_file(root.join("main.ts"))?;

    let changed = monitor.poll_once()?;
    assert_eq!(changed, vec![root.join("app/extra.ts"), root.join("main.ts")]);
    Ok(())
}

#[test]
fn relative_paths_are_lexical() {
    use std::path::Path;
    use tscbuild::watch::path_utils::relative_str;

    assert_eq!(
        relative_str(Path::new("src"), Path::new("src/app/a.ts")).as_deref(),
        Some("app/a.ts")
    );
    assert_eq!(relative_str(Path::new("src"), Path::new("other/a.ts")), None);
    // No disk lookup: a root that only exists in memory still resolves.
    assert_eq!(
        relative_str(Path::new("/no/such/root"), Path::new("/no/such/root/x.ts")).as_deref(),
        Some("x.ts")
    );
}
