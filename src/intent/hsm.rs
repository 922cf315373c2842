use statig::prelude::*;

use super::{
    config::ScrollIntentConfig,
    guard::PostBounceGuard,
    session::Session,
    trace::EngineTraceSample,
    types::{ActionBuffer, DeltaDecision, FinalizeReason, ScrollEvent, SurfaceId},
};

mod core;

#[derive(Clone, Copy, Debug)]
pub(crate) enum SurfaceEvent {
    InteractionStart { now_ms: u64 },
    Update(ScrollEvent),
    InteractionEnd { now_ms: u64 },
    FinalizeDue { now_ms: u64, reason: FinalizeReason },
}

#[derive(Default)]
pub(crate) struct DispatchContext {
    pub(crate) actions: ActionBuffer,
}

/// Lifecycle of one surface: at most one session plus its bounce guard.
pub(crate) struct SurfaceHsm {
    surface: SurfaceId,
    config: &'static ScrollIntentConfig,
    session: Option<Session>,
    guard: Option<PostBounceGuard>,
    pub(crate) last_trace: EngineTraceSample,
}

#[state_machine(initial = "State::idle()")]
impl SurfaceHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &SurfaceEvent) -> Outcome<State> {
        match event {
            SurfaceEvent::InteractionStart { now_ms } => {
                self.start_interaction(context, *now_ms);
                Transition(State::tracking())
            }
            SurfaceEvent::Update(update) => {
                if !self.admit_without_session(update) {
                    return Handled;
                }
                let finalized = self.process_update(context, update);
                self.last_trace.implicit_start = 1;
                if finalized {
                    return Handled;
                }
                Transition(State::tracking())
            }
            SurfaceEvent::InteractionEnd { now_ms } => {
                self.record_idle(*now_ms, DeltaDecision::None, 0);
                Handled
            }
            SurfaceEvent::FinalizeDue { now_ms, .. } => {
                self.record_idle(*now_ms, DeltaDecision::None, 0);
                Handled
            }
        }
    }

    #[state(superstate = "live")]
    fn tracking(&mut self, context: &mut DispatchContext, event: &SurfaceEvent) -> Outcome<State> {
        match event {
            SurfaceEvent::Update(update) => {
                if self.process_update(context, update) {
                    return Transition(State::idle());
                }
                Handled
            }
            SurfaceEvent::InteractionEnd { now_ms } => {
                self.end_interaction(context, *now_ms);
                Transition(State::lingering())
            }
            _ => Super,
        }
    }

    /// Touch has ended; trailing inertial deltas still aggregate until the linger expires.
    #[state(superstate = "live")]
    fn lingering(&mut self, context: &mut DispatchContext, event: &SurfaceEvent) -> Outcome<State> {
        match event {
            SurfaceEvent::Update(update) => {
                if self.process_update(context, update) {
                    return Transition(State::idle());
                }
                Handled
            }
            SurfaceEvent::InteractionEnd { now_ms } => {
                self.end_interaction(context, *now_ms);
                Handled
            }
            _ => Super,
        }
    }

    #[superstate]
    fn live(&mut self, context: &mut DispatchContext, event: &SurfaceEvent) -> Outcome<State> {
        match event {
            SurfaceEvent::InteractionStart { now_ms } => {
                self.start_interaction(context, *now_ms);
                Transition(State::tracking())
            }
            SurfaceEvent::FinalizeDue { now_ms, reason } => {
                self.record_idle(*now_ms, DeltaDecision::None, 0);
                self.finalize(context, *now_ms, *reason);
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}
