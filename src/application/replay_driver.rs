// Replay driver - Feeds stored samples on a scaled virtual clock
use crate::application::telemetry_store::TelemetryStore;
use crate::domain::error::{ReplayError, StoreError};
use crate::domain::sample::Sample;
use crate::infrastructure::config::ReplaySettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Outcome of advancing the virtual clock by one tick.
#[derive(Debug, PartialEq)]
pub enum ReplayTick<'a> {
    Deliver(&'a Sample),
    Finished,
}

/// Timer-free replay state: virtual clock plus a forward-only cursor into
/// the store.
#[derive(Debug)]
pub struct ReplayClock {
    store: Arc<TelemetryStore>,
    step: i64,
    max_timestamp: i64,
    clock: i64,
    cursor: usize,
    finished: bool,
}

impl ReplayClock {
    /// Clock starts at the store's first timestamp. `step` is the advance per
    /// tick in timestamp units and is raised to 1 if smaller.
    pub fn new(store: Arc<TelemetryStore>, step: i64) -> Result<Self, StoreError> {
        let bounds = *store.bounds()?;

        Ok(Self {
            store,
            step: step.max(1),
            max_timestamp: bounds.max_timestamp,
            clock: bounds.min_timestamp,
            cursor: 0,
            finished: false,
        })
    }

    pub fn clock(&self) -> i64 {
        self.clock
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the clock and pick the sample to deliver.
    ///
    /// The delivered sample is the first unconsumed one strictly after the
    /// clock, and the clock snaps to its timestamp. With nothing left ahead,
    /// the final sample is repeated until the clock passes the last timestamp.
    pub fn tick(&mut self) -> ReplayTick<'_> {
        if self.finished {
            return ReplayTick::Finished;
        }

        self.clock = self.clock.saturating_add(self.step);
        if self.clock > self.max_timestamp {
            self.finished = true;
            return ReplayTick::Finished;
        }

        let samples = self.store.samples();
        let clock = self.clock;
        match samples[self.cursor..].iter().position(|s| s.timestamp > clock) {
            Some(offset) => {
                self.cursor += offset;
                let sample = &samples[self.cursor];
                self.clock = sample.timestamp;
                ReplayTick::Deliver(sample)
            }
            None => match samples.last() {
                Some(last) => {
                    self.cursor = samples.len() - 1;
                    ReplayTick::Deliver(last)
                }
                None => {
                    self.finished = true;
                    ReplayTick::Finished
                }
            },
        }
    }
}

/// Consumer of replay output. Called on the driver's task, one tick at a time.
pub trait ReplayObserver: Send + 'static {
    fn sample_delivered(&mut self, sample: &Sample);

    /// Called exactly once, after the last delivery.
    fn simulation_finished(&mut self);
}

#[derive(Debug, Clone)]
pub enum ReplayEvent {
    Sample(Sample),
    Finished,
}

impl ReplayObserver for mpsc::UnboundedSender<ReplayEvent> {
    fn sample_delivered(&mut self, sample: &Sample) {
        let _ = self.send(ReplayEvent::Sample(sample.clone()));
    }

    fn simulation_finished(&mut self) {
        let _ = self.send(ReplayEvent::Finished);
    }
}

struct RunningReplay {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Plays a store back on a tokio interval.
///
/// A driver runs once. Calling `start()` while running, or after the run
/// ended, does nothing. If the observer overruns a tick period, missed ticks
/// are skipped rather than queued.
pub struct ReplayDriver {
    period: Duration,
    pending: Option<(ReplayClock, Box<dyn ReplayObserver>)>,
    running: Option<RunningReplay>,
}

impl ReplayDriver {
    pub fn new(
        store: Arc<TelemetryStore>,
        settings: ReplaySettings,
        observer: impl ReplayObserver,
    ) -> Result<Self, ReplayError> {
        settings.validate()?;
        let period = settings.period()?;
        let clock = ReplayClock::new(store, settings.clock_step())?;

        Ok(Self {
            period,
            pending: Some((clock, Box::new(observer))),
            running: None,
        })
    }

    /// Spawn the tick loop on the current tokio runtime.
    pub fn start(&mut self) {
        let Some((mut clock, mut observer)) = self.pending.take() else {
            tracing::warn!("Replay already started, ignoring start()");
            return;
        };

        let period = self.period;
        tracing::info!(
            "Starting replay at t={} ({:?} per tick, {} units per tick)",
            clock.clock(),
            period,
            clock.step()
        );

        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Replay stopped at t={}", clock.clock());
                        break;
                    }
                    _ = ticker.tick() => match clock.tick() {
                        ReplayTick::Deliver(sample) => {
                            tracing::debug!("Delivering sample t={}", sample.timestamp);
                            observer.sample_delivered(sample);
                        }
                        ReplayTick::Finished => {
                            tracing::info!("Replay finished");
                            observer.simulation_finished();
                            break;
                        }
                    },
                }
            }
        });

        self.running = Some(RunningReplay { shutdown, task });
    }

    /// Cancel the tick loop and wait for it to exit. Once this returns, the
    /// observer will not be called again.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown.send(());
        if let Err(e) = running.task.await {
            tracing::error!("Replay task ended abnormally: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|r| !r.task.is_finished())
    }
}

impl Drop for ReplayDriver {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.task.abort();
        }
    }
}
