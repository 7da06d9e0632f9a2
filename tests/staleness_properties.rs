// tests/staleness_properties.rs

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use proptest::prelude::*;
use tscbuild::build::{bundle_is_stale, is_stale, output_path_for, SourceFile};

fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn file(name: &str, secs: u64) -> SourceFile {
    SourceFile::new(name, at(secs))
}

fn sources_strategy() -> impl Strategy<Value = Vec<SourceFile>> {
    proptest::collection::vec(0..10_000u64, 0..12).prop_map(|times| {
        times
            .into_iter()
            .enumerate()
            .map(|(i, t)| file(&format!("src/f{i}.ts"), t))
            .collect()
    })
}

proptest! {
    #[test]
    fn without_timestamp_check_every_file_is_stale(src in 0..10_000u64, out in proptest::option::of(0..10_000u64)) {
        let output = out.map(|t| file("out/a.js", t));
        prop_assert!(is_stale(&file("src/a.ts", src), output.as_ref(), false));
    }

    #[test]
    fn missing_output_is_always_stale(src in 0..10_000u64, check in any::<bool>()) {
        prop_assert!(is_stale(&file("src/a.ts", src), None, check));
    }

    #[test]
    fn stale_iff_source_strictly_newer(src in 0..10_000u64, out in 0..10_000u64) {
        let stale = is_stale(&file("src/a.ts", src), Some(&file("out/a.js", out)), true);
        prop_assert_eq!(stale, src > out);
    }

    #[test]
    fn bundle_stale_iff_newest_source_is_newer(sources in sources_strategy(), out in 0..10_000u64) {
        let output = file("out/bundle.js", out);
        let stale = bundle_is_stale(&sources, Some(&output), true);
        let newest = sources.iter().map(|s| s.modified).max();
        prop_assert_eq!(stale, newest.is_some_and(|n| n > at(out)));
    }

    #[test]
    fn bundle_forced_unless_empty(sources in sources_strategy(), out in proptest::option::of(0..10_000u64)) {
        let output = out.map(|t| file("out/bundle.js", t));
        prop_assert_eq!(bundle_is_stale(&sources, output.as_ref(), false), !sources.is_empty());
    }

    #[test]
    fn output_path_mirrors_relative_structure(dirs in proptest::collection::vec("[a-z]{1,6}", 0..4), stem in "[a-z]{1,8}") {
        let rel: PathBuf = dirs.iter().collect::<PathBuf>().join(format!("{stem}.ts"));
        let source = Path::new("src").join(&rel);

        let output = output_path_for(&source, Path::new("src"), Path::new("out"), "js");
        prop_assert_eq!(output, Some(Path::new("out").join(rel.with_extension("js"))));
    }
}

#[test]
fn empty_bundle_is_never_stale() {
    assert!(!bundle_is_stale(&[], None, true));
    assert!(!bundle_is_stale(&[], None, false));
}

#[test]
fn same_timestamp_is_up_to_date() {
    assert!(!is_stale(&file("src/a.ts", 5), Some(&file("out/a.js", 5)), true));
}

#[test]
fn source_outside_root_has_no_output_path() {
    assert_eq!(
        output_path_for(Path::new("lib/a.ts"), Path::new("src"), Path::new("out"), "js"),
        None
    );
    assert_eq!(
        output_path_for(Path::new("src"), Path::new("src"), Path::new("out"), "js"),
        None
    );
}
