//! The poll loop that drives sampling, evaluation and dispatch.
//!
//! One task owns the loop and its deduper state. Ticks run one after another;
//! a tick still running when the timer fires again causes that timer tick to
//! be skipped rather than run concurrently.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};

use super::alerts::{evaluate, Alert, AlertCondition};
use super::dedup::{AlertDeduper, DeduperState};
use super::sampler::{BatteryProbe, BatterySampler};
use crate::core::config::DEFAULT_POLL_INTERVAL_SECS;
use crate::core::config_store::ConfigStore;
use crate::error::{NotifyError, SampleError};
use crate::platform::notifier::Notifier;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Sampling,
    Evaluating,
    Dispatching,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The probe could not produce output; nothing was evaluated
    SampleFailed(SampleError),
    /// The probe output held no battery level
    NoReading,
    /// Evaluated, nothing dispatched (no condition, or already notified)
    Quiet(AlertCondition),
    /// An alert was handed to the notifier
    Dispatched(Alert),
}

pub struct PollLoop<P> {
    sampler: BatterySampler<P>,
    store: Arc<dyn ConfigStore>,
    notifier: Arc<dyn Notifier>,
    deduper: AlertDeduper,
    interval: Duration,
    phase: LoopPhase,
}

impl<P: BatteryProbe + 'static> PollLoop<P> {
    pub fn new(
        sampler: BatterySampler<P>,
        store: Arc<dyn ConfigStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            sampler,
            store,
            notifier,
            deduper: AlertDeduper::new(),
            interval: DEFAULT_POLL_INTERVAL,
            phase: LoopPhase::Idle,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn deduper_state(&self) -> DeduperState {
        self.deduper.state()
    }

    /// Run one sample → evaluate → dedup → dispatch cycle
    pub async fn tick(&mut self) -> TickOutcome {
        self.enter(LoopPhase::Sampling);
        let reading = match self.sampler.sample().await {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("Battery sample failed: {}", e);
                self.enter(LoopPhase::Idle);
                return TickOutcome::SampleFailed(e);
            }
        };

        if reading.level.is_none() {
            log::debug!("Probe output had no battery percentage, skipping tick");
            self.enter(LoopPhase::Idle);
            return TickOutcome::NoReading;
        }

        self.enter(LoopPhase::Evaluating);
        let thresholds = self.store.thresholds();
        let condition = evaluate(&reading, &thresholds);
        log::debug!(
            "Battery at {:?}% (charging: {}) against {}%/{}% -> {:?}",
            reading.level,
            reading.is_charging,
            thresholds.low,
            thresholds.high,
            condition
        );

        self.enter(LoopPhase::Dispatching);
        let fire = self.deduper.observe(condition);
        let outcome = match Alert::for_condition(condition, &thresholds) {
            Some(alert) if fire => {
                log::info!("{} {}", alert.title, alert.body);
                self.dispatch(&alert);
                TickOutcome::Dispatched(alert)
            }
            _ => TickOutcome::Quiet(condition),
        };

        self.enter(LoopPhase::Idle);
        outcome
    }

    /// Tick on the configured cadence until `shutdown` fires or its sender is dropped
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        log::info!("Battery monitor started (every {:?})", self.interval);

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.tick().await;
                    log::trace!("Tick finished: {:?}", outcome);
                }
                _ = shutdown.recv() => {
                    log::info!("Battery monitor shutting down");
                    break;
                }
            }
        }
    }

    fn enter(&mut self, phase: LoopPhase) {
        log::trace!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Hand the alert to the notifier without waiting for delivery
    fn dispatch(&self, alert: &Alert) {
        let notifier = Arc::clone(&self.notifier);
        let title = alert.title.clone();
        let body = alert.body.clone();

        let delivery = tokio::task::spawn_blocking(move || notifier.notify(&title, &body));
        tokio::spawn(async move {
            match delivery.await {
                Ok(Ok(())) => log::debug!("Notification delivered"),
                Ok(Err(e)) => log::error!("Failed to deliver notification: {}", e),
                Err(e) => log::error!(
                    "Failed to deliver notification: {}",
                    NotifyError::Task(e.to_string())
                ),
            }
        });
    }
}
