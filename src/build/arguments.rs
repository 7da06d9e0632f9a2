// src/build/arguments.rs

//! Compiler argument lists. The layout is the same whichever strategy
//! ends up running the compiler: option flags first, then the output
//! selection and inputs.

use std::path::Path;

use crate::build::SourceFile;
use crate::config::CompilerFlags;

/// Flags derived from the compiler options, in a fixed order.
pub fn option_arguments(flags: &CompilerFlags) -> Vec<String> {
    let mut options = Vec::new();

    if flags.declaration {
        options.push("--declaration".to_string());
    }
    if flags.no_lib {
        options.push("--nolib".to_string());
    }
    if flags.remove_comments {
        options.push("--removeComments".to_string());
    }
    if flags.no_implicit_any {
        options.push("--noImplicitAny".to_string());
    }
    if flags.source_map {
        options.push("--sourceMap".to_string());
        if let Some(root) = &flags.source_root {
            options.push("--sourceRoot".to_string());
            options.push(root.clone());
        }
        if let Some(root) = &flags.map_root {
            options.push("--mapRoot".to_string());
            options.push(root.clone());
        }
    }
    if let Some(target) = &flags.target {
        options.push("--target".to_string());
        options.push(target.clone());
    }
    if let Some(module) = flags.module {
        options.push("--module".to_string());
        options.push(module.to_string());
    }

    options
}

/// `<flags> --out <bundle> @<listing>`
pub fn bundle_arguments(flags: &CompilerFlags, bundle: &Path, listing_file: &Path) -> Vec<String> {
    let mut args = option_arguments(flags);
    args.push("--out".to_string());
    args.push(bundle.display().to_string());
    args.push(format!("@{}", listing_file.display()));
    args
}

/// `<flags> --outDir <dir> <source>`
pub fn per_file_arguments(flags: &CompilerFlags, out_dir: &Path, source: &Path) -> Vec<String> {
    let mut args = option_arguments(flags);
    args.push("--outDir".to_string());
    args.push(out_dir.display().to_string());
    args.push(source.display().to_string());
    args
}

/// Listing file contents: one source path per line.
pub fn listing_contents(sources: &[SourceFile]) -> String {
    let mut contents = String::new();
    for source in sources {
        contents.push_str(&source.path.display().to_string());
        contents.push('\n');
    }
    contents
}
