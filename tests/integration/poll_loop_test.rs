use async_trait::async_trait;
use battalert::core::battery_monitor::{
    AlertCondition, BatteryProbe, BatterySampler, DeduperState, PollLoop, ProbeOutput, TickOutcome,
};
use battalert::core::{ConfigStore, MemoryConfigStore, Thresholds};
use battalert::error::{NotifyError, SampleError};
use battalert::platform::Notifier;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Replays a fixed list of probe results, repeating the last one
struct ScriptedProbe {
    script: Mutex<VecDeque<Result<ProbeOutput, SampleError>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    fn new(script: Vec<Result<ProbeOutput, SampleError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl BatteryProbe for ScriptedProbe {
    async fn invoke(&self) -> Result<ProbeOutput, SampleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

struct ChannelNotifier(mpsc::UnboundedSender<(String, String)>);

impl Notifier for ChannelNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.0
            .send((title.to_string(), body.to_string()))
            .map_err(|e| NotifyError::Backend(e.to_string()))
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Backend("no notification daemon".to_string()))
    }
}

fn on_battery(level: u8) -> Result<ProbeOutput, SampleError> {
    Ok(ProbeOutput::ok(format!(
        "Now drawing from 'Battery Power'\n -InternalBattery-0\t{}%; discharging;",
        level
    )))
}

fn on_ac(level: u8) -> Result<ProbeOutput, SampleError> {
    Ok(ProbeOutput::ok(format!(
        "Now drawing from 'AC Power'\n -InternalBattery-0\t{}%; charging;",
        level
    )))
}

fn build(
    script: Vec<Result<ProbeOutput, SampleError>>,
) -> (
    PollLoop<ScriptedProbe>,
    mpsc::UnboundedReceiver<(String, String)>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let poll_loop = PollLoop::new(
        BatterySampler::new(ScriptedProbe::new(script), "AC Power"),
        Arc::new(MemoryConfigStore::default()),
        Arc::new(ChannelNotifier(tx)),
    );
    (poll_loop, rx)
}

async fn next_notification(
    rx: &mut mpsc::UnboundedReceiver<(String, String)>,
) -> (String, String) {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("notification within 5s")
        .expect("notifier channel open")
}

#[tokio::test]
async fn test_low_battery_dispatches() {
    let (mut poll_loop, mut rx) = build(vec![on_battery(15)]);

    let outcome = poll_loop.tick().await;
    assert!(matches!(outcome, TickOutcome::Dispatched(ref a) if a.condition == AlertCondition::Low));

    let (title, body) = next_notification(&mut rx).await;
    assert_eq!(title, "⚠️ Battery Low");
    assert_eq!(body, "Battery below 22%. Connect charger!");
}

#[tokio::test]
async fn test_high_battery_dispatches() {
    let (mut poll_loop, mut rx) = build(vec![on_ac(85)]);

    let outcome = poll_loop.tick().await;
    assert!(matches!(outcome, TickOutcome::Dispatched(ref a) if a.condition == AlertCondition::High));

    let (title, body) = next_notification(&mut rx).await;
    assert_eq!(title, "⚠️ Battery High");
    assert_eq!(body, "Battery above 78%. Unplug charger!");
}

#[tokio::test]
async fn test_probe_failure_changes_nothing() {
    let failure = Ok(ProbeOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
    });
    let (mut poll_loop, mut rx) = build(vec![on_battery(15), failure]);

    assert!(matches!(poll_loop.tick().await, TickOutcome::Dispatched(_)));
    next_notification(&mut rx).await;
    let before = poll_loop.deduper_state();

    for _ in 0..3 {
        assert!(matches!(
            poll_loop.tick().await,
            TickOutcome::SampleFailed(SampleError::ProbeUnavailable(_))
        ));
    }

    assert_eq!(poll_loop.deduper_state(), before);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_fresh_probe_failure_leaves_state_empty() {
    let (mut poll_loop, mut rx) = build(vec![Err(SampleError::probe_unavailable(
        "pmset: command not found",
    ))]);

    assert!(matches!(
        poll_loop.tick().await,
        TickOutcome::SampleFailed(SampleError::ProbeUnavailable(_))
    ));
    assert_eq!(poll_loop.deduper_state(), DeduperState::default());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_low_low_none_low_dispatches_twice() {
    let (mut poll_loop, mut rx) = build(vec![
        on_battery(15),
        on_battery(14),
        on_ac(14),
        on_battery(13),
    ]);

    let mut dispatched = Vec::new();
    for _ in 0..4 {
        dispatched.push(matches!(poll_loop.tick().await, TickOutcome::Dispatched(_)));
    }
    assert_eq!(dispatched, vec![true, false, false, true]);

    next_notification(&mut rx).await;
    next_notification(&mut rx).await;
}

#[tokio::test]
async fn test_notifier_failure_does_not_stop_loop() {
    let mut poll_loop = PollLoop::new(
        BatterySampler::new(
            ScriptedProbe::new(vec![on_battery(10), on_ac(10), on_battery(10)]),
            "AC Power",
        ),
        Arc::new(MemoryConfigStore::default()),
        Arc::new(FailingNotifier),
    );

    assert!(matches!(poll_loop.tick().await, TickOutcome::Dispatched(_)));
    assert_eq!(poll_loop.tick().await, TickOutcome::Quiet(AlertCondition::None));
    assert!(matches!(poll_loop.tick().await, TickOutcome::Dispatched(_)));
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let store: Arc<dyn ConfigStore> =
        Arc::new(MemoryConfigStore::new(Thresholds::new(22, 78).unwrap()).unwrap());
    let probe = ScriptedProbe::new(vec![on_battery(15)]);
    let probe_calls = Arc::clone(&probe.calls);
    let poll_loop = PollLoop::new(
        BatterySampler::new(probe, "AC Power"),
        store,
        Arc::new(ChannelNotifier(tx)),
    )
    .with_interval(Duration::from_millis(20));

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let handle = tokio::spawn(poll_loop.run(shutdown_rx));

    // First tick fires immediately; later ticks repeat Low and stay quiet
    let (title, _) = next_notification(&mut rx).await;
    assert_eq!(title, "⚠️ Battery Low");
    tokio::time::sleep(Duration::from_millis(100)).await;

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop stops after shutdown")
        .unwrap();

    assert!(rx.try_recv().is_err());
    assert!(probe_calls.load(Ordering::SeqCst) > 1);
}
