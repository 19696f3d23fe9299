//! Background reclamation of abandoned spans.
//!
//! A traced call can disappear without delivering a result, leaving its
//! context pending forever. The sweeper runs [`sweep_expired`] on a fixed
//! cadence so the registry stays bounded without anyone calling it by
//! hand.
//!
//! [`sweep_expired`]: SpanRegistry::sweep_expired

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::SweepConfig;

use super::SpanRegistry;

/// Spawns the periodic sweep task.
#[derive(Debug)]
pub struct Sweeper;

impl Sweeper {
    /// Starts a background task that sweeps `registry` every
    /// `config.sweep_interval`, reclaiming spans pending longer than
    /// `config.span_expiry`.
    ///
    /// Must be called within a tokio runtime. A disabled config (or a
    /// zero interval) yields an inert handle and spawns nothing; manual
    /// sweeps remain available either way.
    pub fn spawn(registry: Arc<SpanRegistry>, config: SweepConfig) -> SweeperHandle {
        if !config.enabled || config.sweep_interval.is_zero() {
            return SweeperHandle::inert();
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let span_expiry = config.span_expiry;
        let sweep_interval = config.sweep_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        registry.sweep_expired(span_expiry);
                    }
                    _ = &mut stop_rx => break,
                }
            }
            tracing::debug!("sweeper stopped");
        });

        SweeperHandle {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Handle controlling a running sweeper task.
///
/// Dropping the handle signals the task to stop; [`shutdown`] does the
/// same and additionally waits for the task to exit.
///
/// [`shutdown`]: SweeperHandle::shutdown
pub struct SweeperHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    fn inert() -> Self {
        Self {
            stop: None,
            task: None,
        }
    }

    /// Returns `true` if a background task was spawned.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Stops the sweeper and waits for its task to exit.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl fmt::Debug for SweeperHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SweeperHandle")
            .field("is_active", &self.is_active())
            .finish()
    }
}
