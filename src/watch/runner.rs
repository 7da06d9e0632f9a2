// src/watch/runner.rs

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::build::BuildOrchestrator;
use crate::errors::Result;
use crate::exec::CompilerBackend;
use crate::watch::monitor::ChangeMonitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Polling,
    Cancelled,
}

/// Polls for source changes on a fixed interval and rebuilds when any are
/// seen, until cancelled.
///
/// Cancellation is only observed while sleeping; a build that has started
/// always runs to completion first.
#[derive(Debug)]
pub struct WatchLoop<C: CompilerBackend> {
    orchestrator: BuildOrchestrator<C>,
    monitor: ChangeMonitor,
    interval: Duration,
    state: WatchState,
    runs: usize,
}

impl<C: CompilerBackend> WatchLoop<C> {
    pub fn new(orchestrator: BuildOrchestrator<C>, monitor: ChangeMonitor, interval: Duration) -> Self {
        Self {
            orchestrator,
            monitor,
            interval,
            state: WatchState::Idle,
            runs: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Builds triggered by detected changes so far.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn orchestrator(&self) -> &BuildOrchestrator<C> {
        &self.orchestrator
    }

    /// Run until `cancel` fires or its sender is dropped.
    ///
    /// Failed builds are logged and polling continues. Only errors that
    /// make further builds pointless (bad configuration, a missing
    /// executable in external-only mode) end the loop early.
    pub async fn run(&mut self, mut cancel: oneshot::Receiver<()>) -> Result<()> {
        self.state = WatchState::Polling;
        self.orchestrator.set_watching(true);

        info!(
            "Waiting for changes to {} polling every {} millis",
            self.monitor.root().display(),
            self.interval.as_millis()
        );

        if let Err(err) = self.monitor.poll_once() {
            warn!("unable to take initial snapshot: {err:#}");
        }

        let result = loop {
            tokio::select! {
                _ = &mut cancel => break Ok(()),
                _ = sleep(self.interval) => {}
            }

            let changed = match self.monitor.poll_once() {
                Ok(changed) => changed,
                Err(err) => {
                    warn!("unable to scan for changes: {err:#}");
                    continue;
                }
            };
            if changed.is_empty() {
                continue;
            }

            debug!(?changed, "sources changed; rebuilding");
            self.runs += 1;

            match self.orchestrator.run_once(true).await {
                Ok(_) => {}
                Err(err) if err.is_unrecoverable() => break Err(err),
                Err(err) => error!("build failed: {err}"),
            }
        };

        self.state = WatchState::Cancelled;
        match &result {
            Ok(()) => info!("Caught interrupt, quitting."),
            Err(err) => error!("watch stopped: {err}"),
        }
        result
    }
}
