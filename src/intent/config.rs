#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseConfig {
    pub jitter_px: i32,
    pub pair_window_ms: u64,
    pub pair_tolerance_px: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LockConfig {
    pub lock_px: i32,
    pub lock_sum_px: u64,
    pub lock_window_ms: u64,
    pub snap_window_ms: u64,
    pub snap_opposite_ratio_x100: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateConfig {
    pub ema_alpha: f32,
    /// px/ms
    pub fast_velocity: f32,
    /// px/ms²
    pub accel_spike: f32,
    pub fast_min_px: u64,
    pub fast_min_votes: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalizeConfig {
    pub quiet_min_ms: u64,
    pub quiet_max_ms: u64,
    pub quiet_slow_velocity: f32,
    pub quiet_fast_velocity: f32,
    pub quiet_slow_ms: u64,
    pub quiet_mid_ms: u64,
    pub quiet_fast_ms: u64,
    pub linger_ms: u64,
    pub min_duration_ms: u64,
    pub min_total_px: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    pub allow_implicit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BounceGuardConfig {
    pub enabled: bool,
    pub duration_ms: u64,
    pub match_ratio_x100: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollIntentConfig {
    pub noise: NoiseConfig,
    pub lock: LockConfig,
    pub aggregate: AggregateConfig,
    pub finalize: FinalizeConfig,
    pub session: SessionConfig,
    pub bounce_guard: BounceGuardConfig,
}

include!(concat!(env!("OUT_DIR"), "/scroll_intent_config.rs"));

pub fn active_config() -> &'static ScrollIntentConfig {
    &SCROLL_INTENT_CONFIG
}

impl Default for ScrollIntentConfig {
    fn default() -> Self {
        SCROLL_INTENT_CONFIG
    }
}

impl ScrollIntentConfig {
    /// Leaks a tuned copy so it can back an engine for the process lifetime.
    pub fn leak(self) -> &'static ScrollIntentConfig {
        Box::leak(Box::new(self))
    }
}
