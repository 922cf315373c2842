// @generated by scroll_config_compiler. Do not edit.
pub const SCROLL_INTENT_CONFIG: ScrollIntentConfig = ScrollIntentConfig {
    noise: NoiseConfig {
        jitter_px: 2,
        pair_window_ms: 140,
        pair_tolerance_px: 120,
    },
    lock: LockConfig {
        lock_px: 180,
        lock_sum_px: 240,
        lock_window_ms: 220,
        snap_window_ms: 250,
        snap_opposite_ratio_x100: 85,
    },
    aggregate: AggregateConfig {
        ema_alpha: 0.25,
        fast_velocity: 0.9,
        accel_spike: 0.015,
        fast_min_px: 12,
        fast_min_votes: 3,
    },
    finalize: FinalizeConfig {
        quiet_min_ms: 80,
        quiet_max_ms: 260,
        quiet_slow_velocity: 0.15,
        quiet_fast_velocity: 0.6,
        quiet_slow_ms: 240,
        quiet_mid_ms: 170,
        quiet_fast_ms: 110,
        linger_ms: 60,
        min_duration_ms: 60,
        min_total_px: 48,
    },
    session: SessionConfig {
        allow_implicit: true,
    },
    bounce_guard: BounceGuardConfig {
        enabled: true,
        duration_ms: 180,
        match_ratio_x100: 50,
    },
};
