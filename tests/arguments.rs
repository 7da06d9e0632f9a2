// tests/arguments.rs

use std::path::Path;

use tscbuild::build::arguments::{bundle_arguments, listing_contents, option_arguments, per_file_arguments};
use tscbuild::build::SourceFile;
use tscbuild::config::CompilerFlags;
use tscbuild::fs::mock::MockFileSystem;
use tscbuild::types::ModuleFormat;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn every_flag_appears_in_a_fixed_order() {
    let flags = CompilerFlags {
        target: Some("ES5".to_string()),
        module: Some(ModuleFormat::CommonJs),
        remove_comments: true,
        no_implicit_any: true,
        declaration: true,
        source_map: true,
        source_root: Some("/src".to_string()),
        map_root: Some("/maps".to_string()),
        no_lib: true,
    };

    assert_eq!(
        option_arguments(&flags),
        strings(&[
            "--declaration",
            "--nolib",
            "--removeComments",
            "--noImplicitAny",
            "--sourceMap",
            "--sourceRoot",
            "/src",
            "--mapRoot",
            "/maps",
            "--target",
            "ES5",
            "--module",
            "commonjs",
        ])
    );
}

#[test]
fn source_and_map_roots_need_source_maps() {
    let flags = CompilerFlags {
        source_root: Some("/src".to_string()),
        map_root: Some("/maps".to_string()),
        ..CompilerFlags::default()
    };
    assert!(option_arguments(&flags).is_empty());
}

#[test]
fn bundle_and_per_file_append_outputs_after_flags() {
    let flags = CompilerFlags {
        target: Some("ES3".to_string()),
        module: Some(ModuleFormat::Amd),
        ..CompilerFlags::default()
    };

    assert_eq!(
        bundle_arguments(&flags, Path::new("out/app.js"), Path::new("modifiedFiles.txt")),
        strings(&["--target", "ES3", "--module", "amd", "--out", "out/app.js", "@modifiedFiles.txt"])
    );
    assert_eq!(
        per_file_arguments(&flags, Path::new("out/app"), Path::new("src/app/a.ts")),
        strings(&["--target", "ES3", "--module", "amd", "--outDir", "out/app", "src/app/a.ts"])
    );
}

#[test]
fn listing_has_one_path_per_line() {
    let sources = vec![
        SourceFile::new("src/a.ts", MockFileSystem::tick_time(1)),
        SourceFile::new("src/lib/b.ts", MockFileSystem::tick_time(2)),
    ];
    assert_eq!(listing_contents(&sources), "src/a.ts\nsrc/lib/b.ts\n");
    assert_eq!(listing_contents(&[]), "");
}
