use async_trait::async_trait;
use bruteguard::{
    AlertDispatcher, AlertError, AutomatonState, DetectionConfig, DetectionEngine,
    EscalationAlert, ManualClock, ReputationProfile,
};
use std::sync::Arc;
use std::time::Duration;

fn engine_at(seconds: u64) -> (DetectionEngine, Arc<ManualClock>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let clock = Arc::new(ManualClock::new(seconds));
    let engine = DetectionEngine::new(DetectionConfig::default()).with_clock(clock.clone());
    (engine, clock)
}

/// Dispatcher that forwards every alert to a channel for assertions
struct RecordingDispatcher {
    tx: tokio::sync::mpsc::UnboundedSender<EscalationAlert>,
}

#[async_trait]
impl AlertDispatcher for RecordingDispatcher {
    async fn notify(&self, alert: &EscalationAlert) -> Result<(), AlertError> {
        let _ = self.tx.send(alert.clone());
        Ok(())
    }
}

#[tokio::test]
async fn three_failures_walk_fail1_fail2_alert() {
    let (engine, _) = engine_at(1_000);

    let first = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(first.state, AutomatonState::Fail(1));
    assert!(!first.captcha_required);

    let second = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(second.state, AutomatonState::Fail(2));
    assert!(!second.captcha_required);

    let third = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(third.state, AutomatonState::Alert);
    assert!(third.captcha_required);
}

#[tokio::test]
async fn success_resets_then_counting_restarts_at_fail1() {
    let (engine, _) = engine_at(1_000);
    engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();

    let reset = engine.process_attempt("alice", true, "10.0.0.1").await.unwrap();
    assert_eq!(reset.state, AutomatonState::Start);
    assert!(!reset.captcha_required);

    let next = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(next.state, AutomatonState::Fail(1));
}

#[tokio::test]
async fn failures_separated_by_more_than_window_never_reach_fail2() {
    let (engine, clock) = engine_at(1_000);
    let eval = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(eval.state, AutomatonState::Fail(1));

    clock.advance(61);
    let eval = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(eval.state, AutomatonState::Fail(1));
}

#[tokio::test]
async fn suspicious_reputation_escalates_on_second_failure() {
    let (engine, _) = engine_at(1_000);
    engine.set_reputation("10.6.6.6", ReputationProfile::Suspicious);

    let first = engine.process_attempt("alice", false, "10.6.6.6").await.unwrap();
    assert_eq!(first.state, AutomatonState::Fail(1));

    let second = engine.process_attempt("alice", false, "10.6.6.6").await.unwrap();
    assert_eq!(second.state, AutomatonState::Alert);
    assert!(second.captcha_required);
}

#[tokio::test]
async fn trusted_reputation_allows_a_third_failure() {
    let (engine, _) = engine_at(1_000);
    engine.set_reputation("10.1.1.1", ReputationProfile::Trusted);

    engine.process_attempt("alice", false, "10.1.1.1").await.unwrap();
    engine.process_attempt("alice", false, "10.1.1.1").await.unwrap();
    let third = engine.process_attempt("alice", false, "10.1.1.1").await.unwrap();

    assert_eq!(third.state, AutomatonState::Fail(3));
    assert!(!third.captcha_required);
}

#[tokio::test]
async fn reputation_downgrade_mid_window_escalates_on_next_failure() {
    let (engine, _) = engine_at(1_000);
    let eval = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(eval.state, AutomatonState::Fail(1));

    // The threshold is re-evaluated from current reputation on every call,
    // so the downgrade takes effect immediately on the next failure.
    engine.set_reputation("10.0.0.1", ReputationProfile::Suspicious);
    let eval = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(eval.state, AutomatonState::Alert);
}

#[tokio::test]
async fn block_expires_after_its_duration() {
    let (engine, clock) = engine_at(1_000);
    engine.block("10.0.0.1", 120);

    assert!(engine.is_blocked("10.0.0.1"));
    assert_eq!(engine.remaining_seconds("10.0.0.1"), 120);

    clock.advance(50);
    assert!(engine.is_blocked("10.0.0.1"));
    assert_eq!(engine.remaining_seconds("10.0.0.1"), 70);

    clock.advance(70);
    assert!(!engine.is_blocked("10.0.0.1"));
    assert_eq!(engine.remaining_seconds("10.0.0.1"), 0);
}

#[tokio::test]
async fn unblock_lifts_a_block_immediately() {
    let (engine, _) = engine_at(1_000);
    engine.block("10.0.0.1", 120);
    assert!(engine.is_blocked("10.0.0.1"));

    engine.unblock("10.0.0.1");
    assert!(!engine.is_blocked("10.0.0.1"));
}

#[tokio::test]
async fn reset_principal_restarts_counting_at_fail1() {
    let (engine, _) = engine_at(1_000);
    engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();

    engine.reset_principal("alice");
    assert!(engine.list_principals().is_empty());

    let eval = engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    assert_eq!(eval.state, AutomatonState::Fail(1));
}

#[tokio::test]
async fn concurrent_failures_for_one_principal_lose_no_updates() {
    let (engine, _) = engine_at(1_000);
    let tasks: Vec<_> = (0..40)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine.process_attempt("alice", false, "10.0.0.1").await.unwrap()
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let principals = engine.list_principals();
    assert_eq!(principals.len(), 1);
    let (_, state) = &principals[0];
    // All 40 failures share one clock reading, so none can be pruned.
    assert_eq!(state.failure_count(), 40);
    assert_eq!(state.state, AutomatonState::Alert);
}

#[tokio::test]
async fn alert_dispatch_fires_once_per_transition() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let clock = Arc::new(ManualClock::new(1_000));
    let engine = DetectionEngine::new(DetectionConfig::default())
        .with_clock(clock)
        .with_dispatcher(Arc::new(RecordingDispatcher { tx }), Duration::from_secs(1));

    for _ in 0..3 {
        engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    }

    let alert = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("alert should be dispatched")
        .unwrap();
    assert_eq!(alert.username, "alice");
    assert_eq!(alert.source_ip, "10.0.0.1");
    assert_eq!(alert.state, AutomatonState::Alert);
    assert_eq!(alert.failure_count, 3);

    // A further failure keeps the principal in ALERT; no second alert.
    engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn principals_are_independent() {
    let (engine, _) = engine_at(1_000);
    for _ in 0..3 {
        engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    }
    let eval = engine.process_attempt("bob", false, "10.0.0.1").await.unwrap();
    assert_eq!(eval.state, AutomatonState::Fail(1));
}

#[tokio::test]
async fn clear_all_drops_every_store() {
    let (engine, _) = engine_at(1_000);
    engine.process_attempt("alice", false, "10.0.0.1").await.unwrap();
    engine.block("10.0.0.1", 120);
    engine.set_reputation("10.0.0.1", ReputationProfile::Suspicious);

    engine.clear_all();

    assert!(engine.list_principals().is_empty());
    assert!(!engine.is_blocked("10.0.0.1"));
    assert_eq!(engine.get_reputation("10.0.0.1"), ReputationProfile::Normal);
}
