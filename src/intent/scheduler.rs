use std::collections::HashMap;

use super::{
    config::FinalizeConfig,
    types::{FinalizeReason, FinalizeToken, SurfaceId},
};

/// Trailing debounce length for a session moving at `velocity_ema` px/ms.
pub(crate) fn quiet_duration_ms(velocity_ema: f32, config: &FinalizeConfig) -> u64 {
    let ms = if velocity_ema < config.quiet_slow_velocity {
        config.quiet_slow_ms
    } else if velocity_ema < config.quiet_fast_velocity {
        config.quiet_mid_ms
    } else {
        config.quiet_fast_ms
    };
    ms.clamp(config.quiet_min_ms, config.quiet_max_ms.max(config.quiet_min_ms))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingFinalize {
    pub due_ms: u64,
    pub token: FinalizeToken,
    pub reason: FinalizeReason,
}

/// One deferred finalize slot per surface. Scheduling replaces the slot, so a
/// previously issued token can never fire afterwards.
#[derive(Debug, Default)]
pub struct FinalizeScheduler {
    slots: HashMap<SurfaceId, PendingFinalize>,
    next_generation: u64,
}

impl FinalizeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        surface: SurfaceId,
        due_ms: u64,
        reason: FinalizeReason,
    ) -> FinalizeToken {
        self.next_generation = self.next_generation.wrapping_add(1);
        let token = FinalizeToken(self.next_generation);
        self.slots.insert(
            surface,
            PendingFinalize {
                due_ms,
                token,
                reason,
            },
        );
        token
    }

    pub fn cancel(&mut self, surface: SurfaceId) -> Option<PendingFinalize> {
        self.slots.remove(&surface)
    }

    pub fn pending(&self, surface: SurfaceId) -> Option<PendingFinalize> {
        self.slots.get(&surface).copied()
    }

    fn is_current(&self, surface: SurfaceId, token: FinalizeToken) -> bool {
        self.slots
            .get(&surface)
            .is_some_and(|pending| pending.token == token)
    }

    /// Consumes the slot if `token` is still the live one.
    pub fn claim(&mut self, surface: SurfaceId, token: FinalizeToken) -> Option<PendingFinalize> {
        if self.is_current(surface, token) {
            self.slots.remove(&surface)
        } else {
            None
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.slots.values().map(|pending| pending.due_ms).min()
    }

    /// Removes and returns the earliest slot due at or before `now_ms`.
    ///
    /// Ties break on surface id so replays stay deterministic.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(SurfaceId, PendingFinalize)> {
        let (surface, _) = self
            .slots
            .iter()
            .filter(|(_, pending)| pending.due_ms <= now_ms)
            .min_by_key(|(surface, pending)| (pending.due_ms, **surface))
            .map(|(surface, pending)| (*surface, *pending))?;
        self.slots.remove(&surface).map(|pending| (surface, pending))
    }
}
