//! Battery threshold monitoring.
//!
//! Data flows through the submodules in one direction on every tick:
//! sampler → reading → alerts (thresholds from the config store) → dedup →
//! notifier. [`runtime::PollLoop`] drives the cycle.

pub mod alerts;
pub mod dedup;
pub mod reading;
pub mod runtime;
pub mod sampler;

pub use alerts::{evaluate, Alert, AlertCondition};
pub use dedup::{should_dispatch, AlertDeduper, DeduperState};
pub use reading::BatteryReading;
pub use runtime::{LoopPhase, PollLoop, TickOutcome, DEFAULT_POLL_INTERVAL};
pub use sampler::{BatteryProbe, BatterySampler, CommandProbe, ProbeOutput};
