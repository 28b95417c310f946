//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Scheduled playback task and its lifecycle handle."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! A session drives one [`PlaybackEngine`] from a dedicated tokio task.
//!
//! Records are published on a bounded broadcast channel in timeline order. The
//! channel closes when playback finishes or the session is cancelled, so
//! subscribers see `RecvError::Closed` as the end of the stream. A receiver that
//! falls more than `capacity` records behind observes `RecvError::Lagged`.
//!
//! The tick body never awaits, so cancellation always lands between ticks.

use serde::Serialize;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};
use wxr_common::metrics::TickJitterReporter;
use wxr_rt::RateLimiter;

use crate::engine::{EmittedRecord, PlaybackEngine, PlaybackState};
use crate::error::{ReplayError, Result};

/// Latest observable state of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub cursor: usize,
    pub emitted: u64,
    pub last_record: Option<EmittedRecord>,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,
    pub emitted: u64,
    pub cursor: usize,
    pub average_temperature: Option<f64>,
    pub cumulative_energy: f64,
}

/// A configured, not yet started, playback session.
#[derive(Debug)]
pub struct PlaybackSession {
    engine: PlaybackEngine,
    records: broadcast::Sender<EmittedRecord>,
}

impl PlaybackSession {
    pub fn new(engine: PlaybackEngine, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ReplayError::InvalidChannelCapacity);
        }
        let (records, _) = broadcast::channel(capacity);
        Ok(Self { engine, records })
    }

    /// Register a consumer. Only records published after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<EmittedRecord> {
        self.records.subscribe()
    }

    /// Spawn the tick task on the current tokio runtime. The first tick fires
    /// immediately.
    pub fn start(self) -> PlaybackHandle {
        let initial = PlaybackStatus {
            state: self.engine.state(),
            cursor: self.engine.cursor(),
            emitted: 0,
            last_record: None,
        };
        let (status_tx, status_rx) = watch::channel(initial);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run_session(self.engine, self.records, status_tx, cancel_rx));
        PlaybackHandle {
            cancel: Some(cancel_tx),
            status: status_rx,
            task,
        }
    }
}

/// Lifecycle handle of a running session. Dropping it cancels the session.
#[derive(Debug)]
pub struct PlaybackHandle {
    cancel: Option<oneshot::Sender<()>>,
    status: watch::Receiver<PlaybackStatus>,
    task: JoinHandle<SessionSummary>,
}

impl PlaybackHandle {
    pub fn status(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop scheduling further ticks and wait for the task to release its timer.
    pub async fn cancel(mut self) -> Result<SessionSummary> {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.join().await
    }

    /// Wait for the session to end on its own.
    pub async fn join(mut self) -> Result<SessionSummary> {
        // Holding the sender keeps the cancel branch from firing while we wait.
        let _keep_alive = self.cancel.take();
        Ok(self.task.await?)
    }
}

async fn run_session(
    mut engine: PlaybackEngine,
    records: broadcast::Sender<EmittedRecord>,
    status: watch::Sender<PlaybackStatus>,
    mut cancel: oneshot::Receiver<()>,
) -> SessionSummary {
    let mut limiter = RateLimiter::new(engine.tick_interval());
    let reporter = TickJitterReporter::new(limiter.period());
    let mut emitted: u64 = 0;
    info!(
        cursor = engine.cursor(),
        remaining = engine.remaining(),
        "playback session started"
    );

    let outcome = loop {
        tokio::select! {
            biased;
            _ = &mut cancel => {
                engine.halt();
                status.send_modify(|s| s.state = engine.state());
                info!(cursor = engine.cursor(), emitted, "playback session cancelled");
                break SessionOutcome::Cancelled;
            }
            instant = limiter.tick() => {
                reporter.record_tick(instant.into_std());
                let Some(record) = engine.tick() else {
                    status.send_modify(|s| s.state = engine.state());
                    break SessionOutcome::Finished;
                };
                emitted += 1;
                status.send_modify(|s| {
                    s.state = engine.state();
                    s.cursor = engine.cursor();
                    s.emitted = emitted;
                    s.last_record = Some(record.clone());
                });
                match records.send(record) {
                    Ok(receivers) => trace!(receivers, "record published"),
                    Err(_) => debug!(cursor = engine.cursor(), "record published without subscribers"),
                }
            }
        }
    };

    if let Some(jitter) = reporter.summary() {
        debug!(
            samples = jitter.samples,
            mean_us = jitter.mean_us,
            max_us = jitter.max_us,
            "playback tick jitter summary"
        );
    }

    SessionSummary {
        outcome,
        emitted,
        cursor: engine.cursor(),
        average_temperature: engine.aggregate().average_temperature(),
        cumulative_energy: engine.aggregate().cumulative_energy(),
    }
}
