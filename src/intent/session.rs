use super::{
    config::AggregateConfig,
    types::{sign_of, ScrollEvent, SurfaceId},
};

/// Running statistics of one interaction on one surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Session {
    pub(crate) surface: SurfaceId,
    pub(crate) start_ms: u64,
    pub(crate) last_ms: u64,
    pub(crate) sum_dy: i32,
    pub(crate) abs_sum_dy: u64,
    pub(crate) pos_votes: u32,
    pub(crate) neg_votes: u32,
    pub(crate) last_to_index: i32,
    pub(crate) last_item_count: i32,
    /// px/ms
    pub(crate) velocity_ema: f32,
    pub(crate) last_velocity: f32,
    pub(crate) locked_sign: i8,
    pub(crate) locked_at_ms: u64,
    pub(crate) same_abs_since_lock: u64,
    pub(crate) opp_abs_since_lock: u64,
    pub(crate) last_pair_dy: i32,
    pub(crate) last_pair_at_ms: u64,
    pub(crate) touch_started: bool,
    pub(crate) touch_ended: bool,
    pub(crate) implicit: bool,
}

/// Copy of a live session's statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub surface: SurfaceId,
    pub start_ms: u64,
    pub last_ms: u64,
    pub sum_dy: i32,
    pub abs_sum_dy: u64,
    pub pos_votes: u32,
    pub neg_votes: u32,
    pub last_to_index: i32,
    pub last_item_count: i32,
    pub velocity_ema: f32,
    pub locked_sign: i8,
    pub locked_at_ms: u64,
    pub touch_started: bool,
    pub touch_ended: bool,
    pub implicit: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct AggregateStep {
    pub(crate) accel: f32,
    pub(crate) fast_flick: bool,
}

impl Session {
    pub(crate) fn begin(surface: SurfaceId, now_ms: u64, implicit: bool) -> Self {
        Self {
            surface,
            start_ms: now_ms,
            last_ms: now_ms,
            last_to_index: -1,
            touch_started: !implicit,
            implicit,
            ..Self::default()
        }
    }

    /// Restarts timing for a fresh explicit interaction; accumulated evidence is kept.
    pub(crate) fn restart_explicit(&mut self, now_ms: u64) {
        self.start_ms = now_ms;
        self.last_ms = now_ms;
        self.touch_started = true;
        self.touch_ended = false;
        self.implicit = false;
    }

    pub(crate) fn remember_pair(&mut self, dy: i32, now_ms: u64) {
        self.last_pair_dy = dy;
        self.last_pair_at_ms = now_ms;
    }

    pub(crate) fn vote_total(&self) -> u32 {
        self.pos_votes.saturating_add(self.neg_votes)
    }

    pub(crate) fn duration_ms(&self) -> u64 {
        self.last_ms.saturating_sub(self.start_ms)
    }

    /// Folds an accepted delta into the sums, votes, velocity and post-lock tallies.
    ///
    /// A reversal released by the snap window was already charged there and is
    /// charged again here.
    pub(crate) fn aggregate(
        &mut self,
        event: &ScrollEvent,
        config: &AggregateConfig,
    ) -> AggregateStep {
        let dy = event.dy;
        let magnitude = u64::from(dy.unsigned_abs());
        let sign = sign_of(i64::from(dy));

        let first_sample = self.vote_total() == 0;
        self.sum_dy = self.sum_dy.saturating_add(dy);
        self.abs_sum_dy = self.abs_sum_dy.saturating_add(magnitude);
        if dy > 0 {
            self.pos_votes = self.pos_votes.saturating_add(1);
        } else {
            self.neg_votes = self.neg_votes.saturating_add(1);
        }

        // Zero or out-of-order timestamps are clamped to keep the rate finite.
        let dt_ms = event.t_ms.saturating_sub(self.last_ms).max(1) as f32;
        let velocity = magnitude as f32 / dt_ms;
        let accel = (velocity - self.last_velocity).abs() / dt_ms;
        self.velocity_ema = if first_sample {
            velocity
        } else {
            config.ema_alpha * velocity + (1.0 - config.ema_alpha) * self.velocity_ema
        };
        self.last_velocity = velocity;

        if self.locked_sign != 0 {
            if sign == self.locked_sign {
                self.same_abs_since_lock = self.same_abs_since_lock.saturating_add(magnitude);
            } else {
                self.opp_abs_since_lock = self.opp_abs_since_lock.saturating_add(magnitude);
            }
        }

        self.last_ms = event.t_ms;
        self.last_to_index = event.to_index;
        self.last_item_count = event.item_count;
        self.remember_pair(dy, event.t_ms);

        AggregateStep {
            accel,
            fast_flick: self.is_fast_flick_burst(accel, config),
        }
    }

    /// Unanimous votes plus speed or a velocity spike over enough distance.
    fn is_fast_flick_burst(&self, accel: f32, config: &AggregateConfig) -> bool {
        let min_votes = config.fast_min_votes;
        let unanimous = (self.pos_votes >= min_votes && self.neg_votes == 0)
            || (self.neg_votes >= min_votes && self.pos_votes == 0);
        unanimous
            && (self.velocity_ema >= config.fast_velocity || accel >= config.accel_spike)
            && self.abs_sum_dy >= config.fast_min_px
    }

    pub(crate) fn is_fast_flick(&self, config: &AggregateConfig) -> bool {
        self.velocity_ema >= config.fast_velocity && self.abs_sum_dy >= config.fast_min_px
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            surface: self.surface,
            start_ms: self.start_ms,
            last_ms: self.last_ms,
            sum_dy: self.sum_dy,
            abs_sum_dy: self.abs_sum_dy,
            pos_votes: self.pos_votes,
            neg_votes: self.neg_votes,
            last_to_index: self.last_to_index,
            last_item_count: self.last_item_count,
            velocity_ema: self.velocity_ema,
            locked_sign: self.locked_sign,
            locked_at_ms: self.locked_at_ms,
            touch_started: self.touch_started,
            touch_ended: self.touch_ended,
            implicit: self.implicit,
        }
    }
}
