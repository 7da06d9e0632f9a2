// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use crate::build::arguments::option_arguments;
use crate::build::BuildOrchestrator;
use crate::cli::CliArgs;
use crate::config::{load_or_default, BuildOptions};
use crate::errors::Result;
use crate::exec::CompilerInvoker;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::CompileMode;
use crate::watch::{ChangeMonitor, WatchLoop};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - compiler invoker (embedded script loaded once here)
/// - the initial build
/// - (optional) the watch loop, cancelled by Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let mut options = load_or_default(args.config.as_deref())?;
    if args.watch {
        options.watch = true;
    }
    let options = Arc::new(options);

    if args.dry_run {
        print_dry_run(&options);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let invoker = CompilerInvoker::from_options(fs.as_ref(), &options)?;
    let mut orchestrator = BuildOrchestrator::new(Arc::clone(&options), Arc::clone(&fs), invoker)?;
    orchestrator.prepare()?;

    // The first build is a full one unless asked otherwise.
    let check_timestamp = args.incremental;

    if !options.watch {
        orchestrator.run_checked(check_timestamp).await?;
        return Ok(());
    }

    match orchestrator.run_once(check_timestamp).await {
        Ok(_) => {}
        Err(err) if err.is_unrecoverable() => return Err(err),
        Err(err) => error!("initial build failed: {err}"),
    }

    let monitor = ChangeMonitor::new(
        Arc::clone(&fs),
        options.source_dir.clone(),
        orchestrator.pattern().clone(),
    );

    // Ctrl-C → graceful shutdown.
    let (cancel_tx, cancel_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = cancel_tx.send(());
            }
            Err(e) => {
                warn!("failed to listen for Ctrl+C: {e}");
                // Keep the sender alive; dropping it would stop the watch.
                std::future::pending::<()>().await;
            }
        }
    });

    let mut watch = WatchLoop::new(orchestrator, monitor, options.poll_interval);
    watch.run(cancel_rx).await
}

/// Simple dry-run output: print resolved options and the compiler flags.
fn print_dry_run(options: &BuildOptions) {
    println!("tscbuild dry-run");
    println!("  source_dir = {}", options.source_dir.display());
    match &options.mode {
        CompileMode::Bundle(file) => {
            println!("  mode = bundle");
            println!("  target_file = {}", file.display());
            println!("  listing_file = {}", options.listing_file.display());
        }
        CompileMode::PerFile => {
            println!("  mode = per-file");
            println!("  target_dir = {}", options.target_dir.display());
        }
    }
    println!(
        "  extensions = .{} -> .{}",
        options.source_extension, options.target_extension
    );
    println!("  encoding = {}", options.encoding);
    println!();

    let inv = &options.invoker;
    println!("invoker:");
    println!("  use_embedded = {}", inv.use_embedded);
    if inv.use_embedded {
        println!("      interpreter: {}", inv.interpreter);
        println!("      compiler_script: {}", inv.compiler_script.display());
    }
    println!("  use_external = {}", inv.use_external);
    if inv.use_external {
        println!("      executable: {}", inv.executable);
        println!("      external_only: {}", inv.external_only);
    }
    println!();

    println!("compiler flags: {}", option_arguments(&options.compiler).join(" "));
    if options.watch {
        println!("watch: every {} ms", options.poll_interval.as_millis());
    }

    debug!("dry-run complete (no execution)");
}
