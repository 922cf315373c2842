use log::{debug, warn};

use super::{
    config::{active_config, ScrollIntentConfig},
    hsm::{DispatchContext, SurfaceEvent},
    scheduler::{FinalizeScheduler, PendingFinalize},
    session::{Session, SessionSnapshot},
    store::SessionStore,
    trace::EngineTraceSample,
    types::{
        ActionBuffer, DeltaDecision, EngineAction, FinalizeToken, ScrollEvent, SurfaceId,
        SurfaceStateId, VerdictRecord,
    },
};
use crate::{
    delta::{DeltaProvider, RawUpdate},
    telemetry::IntentCounters,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineOutput {
    pub actions: ActionBuffer,
    pub trace: EngineTraceSample,
}

impl EngineOutput {
    pub fn verdict(&self) -> Option<&VerdictRecord> {
        self.actions.verdict()
    }
}

/// Classifies scroll sessions across any number of surfaces.
///
/// Single-threaded and clock-free: every entry point takes the event time, and
/// the host drives deferred finalization through [`next_deadline`](Self::next_deadline)
/// and [`poll`](Self::poll), or through [`fire`](Self::fire) with the tokens
/// carried by `ScheduleFinalize` actions.
pub struct ScrollIntentEngine {
    config: &'static ScrollIntentConfig,
    store: SessionStore,
    scheduler: FinalizeScheduler,
    counters: IntentCounters,
}

impl Default for ScrollIntentEngine {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl ScrollIntentEngine {
    pub fn new(config: &'static ScrollIntentConfig) -> Self {
        Self {
            config,
            store: SessionStore::default(),
            scheduler: FinalizeScheduler::new(),
            counters: IntentCounters::default(),
        }
    }

    pub fn config(&self) -> &'static ScrollIntentConfig {
        self.config
    }

    pub fn interaction_start(&mut self, surface: SurfaceId, now_ms: u64) -> EngineOutput {
        self.dispatch(surface, SurfaceEvent::InteractionStart { now_ms })
    }

    pub fn update(&mut self, event: ScrollEvent) -> EngineOutput {
        self.counters.record_update();
        self.dispatch(event.surface, SurfaceEvent::Update(event))
    }

    pub fn interaction_end(&mut self, surface: SurfaceId, now_ms: u64) -> EngineOutput {
        self.dispatch(surface, SurfaceEvent::InteractionEnd { now_ms })
    }

    /// Measures `dy` with `provider` and feeds the result to [`update`](Self::update).
    ///
    /// A failed measurement leaves the surface untouched, including its timer.
    pub fn measure_and_update<P>(&mut self, provider: &mut P, raw: &RawUpdate) -> EngineOutput
    where
        P: DeltaProvider + ?Sized,
    {
        match provider.measure_dy(raw) {
            Ok(dy) => self.update(ScrollEvent {
                surface: raw.surface,
                t_ms: raw.t_ms,
                dy,
                to_index: raw.to_index,
                item_count: raw.item_count,
            }),
            Err(err) => {
                warn!(
                    "scroll: measure_failed surface={} t={} err={}",
                    raw.surface, raw.t_ms, err
                );
                self.counters.record_measure_failure();
                self.passive_output(raw.surface, raw.t_ms, DeltaDecision::MeasureFailed)
            }
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    /// Fires every finalize due at or before `now_ms`, earliest first.
    pub fn poll(&mut self, now_ms: u64) -> Vec<VerdictRecord> {
        let mut verdicts = Vec::new();
        while let Some((surface, pending)) = self.scheduler.pop_due(now_ms) {
            let output = self.fire_pending(surface, pending);
            verdicts.extend(output.verdict().copied());
        }
        self.prune(now_ms);
        verdicts
    }

    /// Host-timer entry point. Stale or premature tokens are ignored.
    ///
    /// A claimed finalize also prunes dormant surfaces, as [`poll`](Self::poll) does.
    pub fn fire(&mut self, surface: SurfaceId, token: FinalizeToken, now_ms: u64) -> EngineOutput {
        let premature = self
            .scheduler
            .pending(surface)
            .is_some_and(|pending| pending.token == token && now_ms < pending.due_ms);
        let claimed = if premature {
            None
        } else {
            self.scheduler.claim(surface, token)
        };

        match claimed {
            Some(pending) => {
                let output = self.fire_pending(surface, pending);
                self.prune(now_ms);
                output
            }
            None => {
                debug!(
                    "scroll: finalize_ignored surface={} token={} t={}",
                    surface, token.0, now_ms
                );
                self.passive_output(surface, now_ms, DeltaDecision::None)
            }
        }
    }

    pub fn pending_finalize(&self, surface: SurfaceId) -> Option<PendingFinalize> {
        self.scheduler.pending(surface)
    }

    pub fn session_snapshot(&self, surface: SurfaceId) -> Option<SessionSnapshot> {
        self.store
            .get(surface)
            .and_then(|hsm| hsm.session())
            .map(Session::snapshot)
    }

    pub fn has_active_session(&self, surface: SurfaceId) -> bool {
        self.store
            .get(surface)
            .is_some_and(|hsm| hsm.session().is_some())
    }

    pub fn surface_state(&self, surface: SurfaceId) -> SurfaceStateId {
        self.store
            .get(surface)
            .map_or(SurfaceStateId::Idle, |hsm| hsm.state_id())
    }

    pub fn tracked_surfaces(&self) -> usize {
        self.store.len()
    }

    pub fn counters(&self) -> IntentCounters {
        self.counters
    }

    // Verdict time is the deadline, not the moment the host noticed it.
    fn fire_pending(&mut self, surface: SurfaceId, pending: PendingFinalize) -> EngineOutput {
        self.dispatch(
            surface,
            SurfaceEvent::FinalizeDue {
                now_ms: pending.due_ms,
                reason: pending.reason,
            },
        )
    }

    fn prune(&mut self, now_ms: u64) {
        let pruned = self.store.prune(now_ms);
        if pruned > 0 {
            debug!(
                "scroll: pruned surfaces={} remaining={}",
                pruned,
                self.store.len()
            );
        }
    }

    fn dispatch(&mut self, surface: SurfaceId, event: SurfaceEvent) -> EngineOutput {
        let mut context = DispatchContext::default();
        let machine = self.store.get_or_create(surface, self.config);
        machine.handle_with_context(&event, &mut context);
        let trace = machine.inner().last_trace;

        self.counters.record_trace(&trace);
        EngineOutput {
            actions: self.apply(&context.actions),
            trace,
        }
    }

    /// Mirrors timer actions into the scheduler and stamps issued tokens.
    fn apply(&mut self, actions: &ActionBuffer) -> ActionBuffer {
        let mut applied = ActionBuffer::new();
        for action in actions.iter() {
            match *action {
                EngineAction::ScheduleFinalize {
                    surface,
                    due_ms,
                    reason,
                    ..
                } => {
                    let token = self.scheduler.schedule(surface, due_ms, reason);
                    applied.push(EngineAction::ScheduleFinalize {
                        surface,
                        due_ms,
                        reason,
                        token,
                    });
                }
                EngineAction::CancelFinalize { surface } => {
                    self.scheduler.cancel(surface);
                    applied.push(*action);
                }
                EngineAction::Verdict(record) => {
                    self.counters.record_verdict(&record);
                    applied.push(*action);
                }
            }
        }
        applied
    }

    fn passive_output(
        &self,
        surface: SurfaceId,
        now_ms: u64,
        decision: DeltaDecision,
    ) -> EngineOutput {
        let mut trace = EngineTraceSample {
            now_ms,
            surface,
            state_id: self.surface_state(surface),
            decision,
            ..EngineTraceSample::default()
        };
        if let Some(snapshot) = self.session_snapshot(surface) {
            trace.sum_dy = snapshot.sum_dy;
            trace.abs_sum_dy = snapshot.abs_sum_dy;
            trace.locked_sign = snapshot.locked_sign;
            trace.velocity_ema = snapshot.velocity_ema;
        }
        EngineOutput {
            actions: ActionBuffer::new(),
            trace,
        }
    }
}
