//! Background alarm ticker.
//!
//! Spawns a tokio task that fires once per second: it records the tick
//! as the displayed clock, takes a read lock on the store and runs one
//! [`AlarmEvaluator::tick`]. Stopped through a oneshot shutdown channel,
//! same lifecycle as the HTTP server handle.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::AlarmEvaluator;
use crate::core_state::CoreState;

/// Tick period of the alarm loop.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running ticker.
pub struct AlarmTicker {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<AlarmEvaluator>,
}

impl AlarmTicker {
    /// Signal the loop to stop. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Alarm ticker shutdown signal sent");
        }
    }

    /// Stop the loop and get the evaluator back.
    pub async fn stop(mut self) -> Option<AlarmEvaluator> {
        self.shutdown();
        self.handle.await.ok()
    }
}

/// Start the ticker against the local wall clock.
pub fn start_alarm_ticker(core: Arc<CoreState>, evaluator: AlarmEvaluator) -> AlarmTicker {
    start_alarm_ticker_with_clock(core, evaluator, TICK_INTERVAL, || {
        chrono::Local::now().naive_local()
    })
}

/// Start the ticker with an explicit period and clock source.
pub fn start_alarm_ticker_with_clock<C>(
    core: Arc<CoreState>,
    mut evaluator: AlarmEvaluator,
    period: Duration,
    clock: C,
) -> AlarmTicker
where
    C: Fn() -> NaiveDateTime + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = period.as_millis() as u64, "Alarm ticker started");

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = interval.tick() => {
                    let now = clock();
                    core.record_tick(now);
                    match core.read_store() {
                        Ok(store) => {
                            evaluator.tick(&store, &now);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Alarm tick skipped");
                        }
                    }
                }
            }
        }

        tracing::info!("Alarm ticker stopped");
        evaluator
    });

    AlarmTicker {
        shutdown_tx: Some(shutdown_tx),
        handle,
    }
}
