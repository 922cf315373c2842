use super::*;


const SURFACE: SurfaceId = SurfaceId(1);

fn scroll(t_ms: u64, dy: i32) -> ScrollEvent {
    ScrollEvent {
        surface: SURFACE,
        t_ms,
        dy,
        to_index: -1,
        item_count: 0,
    }
}

fn scheduled_token(output: &EngineOutput) -> FinalizeToken {
    output
        .actions
        .iter()
        .find_map(|action| match action {
            EngineAction::ScheduleFinalize { token, .. } => Some(*token),
            _ => None,
        })
        .expect("no finalize scheduled")
}

fn started_engine() -> ScrollIntentEngine {
    let mut engine = ScrollIntentEngine::default();
    let _ = engine.interaction_start(SURFACE, 0);
    engine
}

#[test]
fn jitter_refreshes_timer_without_touching_stats() {
    let mut engine = started_engine();
    let _ = engine.update(scroll(10, 50));

    let jitter = engine.update(scroll(40, 1));
    assert_eq!(jitter.trace.decision, DeltaDecision::Jitter);
    assert_eq!(jitter.trace.quiet_ms, 110);
    assert_eq!(jitter.actions.scheduled_due_ms(), Some(150));
    assert_eq!(engine.next_deadline(), Some(150));

    let snapshot = engine.session_snapshot(SURFACE).expect("session");
    assert_eq!(snapshot.sum_dy, 50);
    assert_eq!(snapshot.abs_sum_dy, 50);
    assert_eq!((snapshot.pos_votes, snapshot.neg_votes), (1, 0));
    assert_eq!(snapshot.locked_sign, 0);
    assert_eq!(snapshot.last_ms, 40);
}

#[test]
fn mirrored_spike_is_pair_cancelled() {
    let mut engine = started_engine();
    let first = engine.update(scroll(10, 200));
    assert_eq!(first.trace.lock_committed, 1);

    let mirror = engine.update(scroll(60, -190));
    assert_eq!(mirror.trace.decision, DeltaDecision::PairCancelled);
    assert!(mirror.actions.scheduled_due_ms().is_some());

    let snapshot = engine.session_snapshot(SURFACE).expect("session");
    assert_eq!(snapshot.sum_dy, 200);
    assert_eq!(snapshot.neg_votes, 0);
    assert_eq!(engine.counters().pair_cancels, 1);
}

#[test]
fn snap_window_suppresses_then_releases_reversal() {
    let mut engine = started_engine();
    let _ = engine.update(scroll(10, 200));

    let small = engine.update(scroll(100, -30));
    assert_eq!(small.trace.decision, DeltaDecision::SnapSuppressed);
    assert_eq!(engine.session_snapshot(SURFACE).map(|s| s.sum_dy), Some(200));

    let large = engine.update(scroll(150, -160));
    assert_eq!(large.trace.decision, DeltaDecision::Accepted);
    let snapshot = engine.session_snapshot(SURFACE).expect("session");
    assert_eq!(snapshot.sum_dy, 40);
    assert_eq!(snapshot.abs_sum_dy, 360);
    assert_eq!(snapshot.neg_votes, 1);
    assert_eq!(snapshot.locked_sign, 1);
    assert_eq!(snapshot.locked_at_ms, 10);
}

#[test]
fn released_reversals_accumulate_toward_later_release() {
    let mut engine = started_engine();
    let _ = engine.update(scroll(0, 200));
    let first = engine.update(scroll(150, -300));
    assert_eq!(first.trace.decision, DeltaDecision::Accepted);
    let _ = engine.update(scroll(160, 600));

    // Opposite tally 300 + 300 + 100 against 85% of 800 same-direction px.
    let late = engine.update(scroll(200, -100));
    assert_eq!(late.trace.decision, DeltaDecision::Accepted);
    let snapshot = engine.session_snapshot(SURFACE).expect("session");
    assert_eq!(snapshot.sum_dy, 400);
    assert_eq!(snapshot.neg_votes, 2);
    assert_eq!(snapshot.locked_sign, 1);
}

#[test]
fn locked_direction_decides_verdict_after_reversal() {
    let mut engine = started_engine();
    let _ = engine.update(scroll(10, 200));
    let _ = engine.update(scroll(100, -30));
    let _ = engine.update(scroll(150, -160));
    let _ = engine.update(scroll(170, -170));

    let verdicts = engine.poll(engine.next_deadline().expect("deadline"));
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].verdict, Verdict::Up);
    assert_eq!(verdicts[0].source, VerdictSource::DirectionLock);
    assert!(verdicts[0].sum_dy < 0);
    assert_eq!(verdicts[0].locked_sign, 1);
}

#[test]
fn stale_and_premature_tokens_are_ignored() {
    let mut engine = started_engine();
    let first = engine.update(scroll(100, 20));
    let second = engine.update(scroll(200, 20));
    let stale = scheduled_token(&first);
    let live = scheduled_token(&second);
    assert_ne!(stale, live);

    assert!(engine.fire(SURFACE, stale, 1_000).verdict().is_none());
    assert!(engine.has_active_session(SURFACE));

    // Quiet duration for 0.2 px/ms is 170 ms.
    assert!(engine.fire(SURFACE, live, 369).verdict().is_none());
    assert!(engine.has_active_session(SURFACE));

    let fired = engine.fire(SURFACE, live, 400);
    let record = fired.verdict().expect("verdict");
    assert_eq!(record.finalized_at_ms, 370);
    assert_eq!(record.verdict, Verdict::Unknown);
    assert_eq!(record.source, VerdictSource::InsufficientEvidence);
    assert!(!engine.has_active_session(SURFACE));
    assert_eq!(engine.next_deadline(), None);
}

#[test]
fn strict_sessions_drop_updates_without_start() {
    let mut config = ScrollIntentConfig::default();
    config.session.allow_implicit = false;
    let mut engine = ScrollIntentEngine::new(config.leak());

    let output = engine.update(scroll(0, 300));
    assert_eq!(output.trace.decision, DeltaDecision::NoSession);
    assert!(output.actions.is_empty());
    assert!(!engine.has_active_session(SURFACE));
    assert_eq!(engine.counters().no_session_drops, 1);
    assert_eq!(engine.counters().implicit_starts, 0);
}

#[test]
fn implicit_session_opens_on_first_update() {
    let mut engine = ScrollIntentEngine::default();
    let output = engine.update(scroll(500, 40));

    assert_eq!(output.trace.implicit_start, 1);
    assert_eq!(output.trace.state_id, SurfaceStateId::Tracking);
    let snapshot = engine.session_snapshot(SURFACE).expect("session");
    assert!(snapshot.implicit);
    assert!(!snapshot.touch_started);
    assert_eq!(snapshot.start_ms, 500);
    assert_eq!(engine.counters().implicit_starts, 1);
}

#[test]
fn failed_measurement_leaves_session_and_timer_alone() {
    let mut engine = started_engine();
    let _ = engine.update(scroll(100, 20));
    let before = engine.session_snapshot(SURFACE);
    let deadline = engine.next_deadline();

    let raw = crate::delta::RawUpdate {
        surface: SURFACE,
        t_ms: 150,
        source_key: None,
        reported_dy: Some(80),
        ..crate::delta::RawUpdate::default()
    };
    let mut provider = crate::delta::FallbackDeltaProvider::default();
    let output = engine.measure_and_update(&mut provider, &raw);

    assert_eq!(output.trace.decision, DeltaDecision::MeasureFailed);
    assert!(output.actions.is_empty());
    assert_eq!(engine.session_snapshot(SURFACE), before);
    assert_eq!(engine.next_deadline(), deadline);
    assert_eq!(engine.counters().measure_failures, 1);
    assert_eq!(engine.counters().updates, 1);
}

#[test]
fn measured_delta_feeds_the_pipeline() {
    let mut engine = started_engine();
    let mut provider = crate::delta::FallbackDeltaProvider::default();
    let raw = crate::delta::RawUpdate {
        surface: SURFACE,
        t_ms: 40,
        source_key: Some(crate::delta::SourceKey(9)),
        reported_dy: Some(-40),
        to_index: 3,
        item_count: 20,
        ..crate::delta::RawUpdate::default()
    };

    let output = engine.measure_and_update(&mut provider, &raw);
    assert_eq!(output.trace.decision, DeltaDecision::Accepted);
    let snapshot = engine.session_snapshot(SURFACE).expect("session");
    assert_eq!(snapshot.sum_dy, -40);
    assert_eq!(snapshot.last_to_index, 3);
    assert_eq!(snapshot.last_item_count, 20);
}
