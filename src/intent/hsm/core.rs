use log::{debug, info, warn};

use super::*;
use crate::intent::{
    filter::{screen, NoiseVerdict},
    lock::{snap_check, try_lock, SnapCheck},
    scheduler::quiet_duration_ms,
    types::{EngineAction, FinalizeToken, SurfaceStateId, Verdict},
    verdict::judge,
};

#[derive(Clone, Copy, Debug, Default)]
struct TraceExtras {
    accel: f32,
    lock_committed: bool,
    quiet_ms: u64,
}

enum PipelineStep {
    /// Dropped before aggregation; the quiet timer is still refreshed.
    Dropped(DeltaDecision),
    Accepted {
        accel: f32,
        lock_committed: bool,
        fast_flick: bool,
    },
}

/// Noise filter, lock arbiter, snap window, then aggregation.
fn run_pipeline(
    session: &mut Session,
    update: &ScrollEvent,
    config: &ScrollIntentConfig,
) -> PipelineStep {
    let (dy, now_ms) = (update.dy, update.t_ms);

    match screen(session, dy, now_ms, &config.noise) {
        NoiseVerdict::Jitter => {
            session.last_ms = session.last_ms.max(now_ms);
            return PipelineStep::Dropped(DeltaDecision::Jitter);
        }
        NoiseVerdict::PairCancel => {
            debug!(
                "scroll: pair_cancel surface={} dy={} last={}",
                session.surface, dy, session.last_pair_dy
            );
            session.remember_pair(dy, now_ms);
            return PipelineStep::Dropped(DeltaDecision::PairCancelled);
        }
        NoiseVerdict::Pass => {}
    }

    let lock_committed = try_lock(session, dy, now_ms, &config.lock);
    if lock_committed {
        debug!(
            "scroll: lock surface={} sign={} t={} abs_sum_dy={}",
            session.surface, session.locked_sign, now_ms, session.abs_sum_dy
        );
    }

    if let SnapCheck::Suppressed {
        opposite_abs,
        threshold,
    } = snap_check(session, dy, now_ms, &config.lock)
    {
        debug!(
            "scroll: snap_suppressed surface={} dy={} opposite={} threshold={}",
            session.surface, dy, opposite_abs, threshold
        );
        session.remember_pair(dy, now_ms);
        return PipelineStep::Dropped(DeltaDecision::SnapSuppressed);
    }

    let step = session.aggregate(update, &config.aggregate);
    PipelineStep::Accepted {
        accel: step.accel,
        lock_committed,
        fast_flick: step.fast_flick,
    }
}

impl SurfaceHsm {
    pub(crate) fn new(surface: SurfaceId, config: &'static ScrollIntentConfig) -> Self {
        Self {
            surface,
            config,
            session: None,
            guard: None,
            last_trace: EngineTraceSample {
                surface,
                ..EngineTraceSample::default()
            },
        }
    }

    pub(crate) fn state_id(&self) -> SurfaceStateId {
        match &self.session {
            None => SurfaceStateId::Idle,
            Some(session) if session.touch_ended => SurfaceStateId::Lingering,
            Some(_) => SurfaceStateId::Tracking,
        }
    }

    pub(crate) fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Nothing left that a later event could consult.
    pub(crate) fn is_dormant(&self, now_ms: u64) -> bool {
        self.session.is_none() && !self.guard.is_some_and(|guard| guard.is_live(now_ms))
    }

    /// Opens an explicit session, or re-arms the live one in place.
    pub(super) fn start_interaction(&mut self, context: &mut DispatchContext, now_ms: u64) {
        let surface = self.surface;
        self.session
            .get_or_insert_with(|| Session::begin(surface, now_ms, false))
            .restart_explicit(now_ms);
        self.guard = None;
        context
            .actions
            .push(EngineAction::CancelFinalize { surface });
        debug!("scroll: interaction_start surface={} t={}", surface, now_ms);
        self.record_idle(now_ms, DeltaDecision::None, 0);
    }

    /// Decides whether an update on a surface without a session may open one.
    pub(super) fn admit_without_session(&mut self, update: &ScrollEvent) -> bool {
        let now_ms = update.t_ms;
        let rebound = self
            .guard
            .is_some_and(|guard| guard.is_rebound(now_ms, update.dy, &self.config.bounce_guard));
        if rebound {
            debug!(
                "scroll: bounce_filtered surface={} dy={} t={}",
                self.surface, update.dy, now_ms
            );
            self.record_idle(now_ms, DeltaDecision::BounceFiltered, update.dy);
            return false;
        }

        if !self.config.session.allow_implicit {
            debug!(
                "scroll: no_session surface={} dy={} t={}",
                self.surface, update.dy, now_ms
            );
            self.record_idle(now_ms, DeltaDecision::NoSession, update.dy);
            return false;
        }

        warn!(
            "scroll: implicit_start surface={} t={} (no interaction start)",
            self.surface, now_ms
        );
        self.session = Some(Session::begin(self.surface, now_ms, true));
        self.guard = None;
        true
    }

    /// Runs one update through the pipeline. Returns true if it finalized the session.
    pub(super) fn process_update(
        &mut self,
        context: &mut DispatchContext,
        update: &ScrollEvent,
    ) -> bool {
        let config = self.config;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match run_pipeline(session, update, config) {
            PipelineStep::Dropped(decision) => {
                let quiet_ms = self.schedule_quiet(context, update.t_ms);
                self.record(
                    update.t_ms,
                    decision,
                    update.dy,
                    TraceExtras {
                        quiet_ms,
                        ..TraceExtras::default()
                    },
                );
                false
            }
            PipelineStep::Accepted {
                accel,
                lock_committed,
                fast_flick,
            } => {
                let quiet_ms = if fast_flick {
                    0
                } else {
                    self.schedule_quiet(context, update.t_ms)
                };
                self.record(
                    update.t_ms,
                    DeltaDecision::Accepted,
                    update.dy,
                    TraceExtras {
                        accel,
                        lock_committed,
                        quiet_ms,
                    },
                );
                if fast_flick {
                    self.finalize(context, update.t_ms, FinalizeReason::FastFlick);
                }
                fast_flick
            }
        }
    }

    pub(super) fn end_interaction(&mut self, context: &mut DispatchContext, now_ms: u64) {
        let linger_ms = self.config.finalize.linger_ms;
        if let Some(session) = self.session.as_mut() {
            session.touch_ended = true;
        }
        context.actions.push(EngineAction::ScheduleFinalize {
            surface: self.surface,
            due_ms: now_ms.saturating_add(linger_ms),
            reason: FinalizeReason::Linger,
            token: FinalizeToken::default(),
        });
        debug!(
            "scroll: interaction_end surface={} t={} linger_ms={}",
            self.surface, now_ms, linger_ms
        );
        self.record(
            now_ms,
            DeltaDecision::None,
            0,
            TraceExtras {
                quiet_ms: linger_ms,
                ..TraceExtras::default()
            },
        );
    }

    /// Removes the session, emits its verdict and arms the bounce guard.
    pub(super) fn finalize(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
        reason: FinalizeReason,
    ) {
        let Some(session) = self.session.take() else {
            return;
        };
        let config = self.config;

        context.actions.push(EngineAction::CancelFinalize {
            surface: self.surface,
        });
        let record = judge(&session, now_ms, reason, config);
        context.actions.push(EngineAction::Verdict(record));

        if record.verdict != Verdict::Unknown && config.bounce_guard.enabled {
            self.guard = Some(PostBounceGuard::arm(
                now_ms,
                record.verdict.sign(),
                session.abs_sum_dy,
                &config.bounce_guard,
            ));
        }

        info!(
            "scroll: verdict surface={} verdict={} source={} reason={} sum_dy={} abs_sum_dy={} duration_ms={} vel={:.3} votes={}/{} implicit={} lock={}",
            record.surface,
            record.verdict.label(),
            record.source.label(),
            record.reason.label(),
            record.sum_dy,
            record.abs_sum_dy,
            record.duration_ms,
            record.velocity_ema,
            record.pos_votes,
            record.neg_votes,
            record.implicit,
            record.locked_sign
        );
        self.last_trace.state_id = self.state_id();
    }

    pub(super) fn record_idle(&mut self, now_ms: u64, decision: DeltaDecision, dy: i32) {
        self.record(now_ms, decision, dy, TraceExtras::default());
    }

    fn schedule_quiet(&self, context: &mut DispatchContext, now_ms: u64) -> u64 {
        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        let quiet_ms = quiet_duration_ms(session.velocity_ema, &self.config.finalize);
        context.actions.push(EngineAction::ScheduleFinalize {
            surface: self.surface,
            due_ms: now_ms.saturating_add(quiet_ms),
            reason: FinalizeReason::QuietTimeout,
            token: FinalizeToken::default(),
        });
        quiet_ms
    }

    fn record(&mut self, now_ms: u64, decision: DeltaDecision, dy: i32, extras: TraceExtras) {
        let mut trace = EngineTraceSample {
            now_ms,
            surface: self.surface,
            state_id: self.state_id(),
            decision,
            dy,
            lock_committed: u8::from(extras.lock_committed),
            accel: extras.accel,
            quiet_ms: extras.quiet_ms,
            ..EngineTraceSample::default()
        };
        if let Some(session) = self.session.as_ref() {
            trace.sum_dy = session.sum_dy;
            trace.abs_sum_dy = session.abs_sum_dy;
            trace.locked_sign = session.locked_sign;
            trace.velocity_ema = session.velocity_ema;
        }
        self.last_trace = trace;
    }
}
