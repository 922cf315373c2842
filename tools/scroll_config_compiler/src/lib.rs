use std::{
    fmt::{Display, Write as _},
    fs,
    path::Path,
};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigCompilerError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrollConfigFile {
    pub noise: NoiseSection,
    pub lock: LockSection,
    pub aggregate: AggregateSection,
    pub finalize: FinalizeSection,
    pub session: SessionSection,
    pub bounce_guard: BounceGuardSection,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseSection {
    pub jitter_px: i32,
    pub pair_window_ms: u64,
    pub pair_tolerance_px: i32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockSection {
    pub lock_px: i32,
    pub lock_sum_px: u64,
    pub lock_window_ms: u64,
    pub snap_window_ms: u64,
    pub snap_opposite_ratio_x100: u64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateSection {
    pub ema_alpha: f32,
    pub fast_velocity: f32,
    pub accel_spike: f32,
    pub fast_min_px: u64,
    pub fast_min_votes: u32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinalizeSection {
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

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    pub allow_implicit: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BounceGuardSection {
    pub enabled: bool,
    pub duration_ms: u64,
    pub match_ratio_x100: u64,
}

pub fn parse_config_file(path: &Path) -> Result<ScrollConfigFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigCompilerError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_config_str(&raw)
}

pub fn parse_config_str(raw: &str) -> Result<ScrollConfigFile, ConfigCompilerError> {
    toml::from_str(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn validate_config(config: &ScrollConfigFile) -> Result<(), ConfigCompilerError> {
    let noise = &config.noise;
    if noise.jitter_px <= 0 {
        return invalid("noise.jitter_px must be > 0");
    }
    if noise.pair_tolerance_px < 0 {
        return invalid("noise.pair_tolerance_px must be >= 0");
    }

    let lock = &config.lock;
    if lock.lock_px <= 0 || lock.lock_sum_px == 0 {
        return invalid("lock.lock_px and lock.lock_sum_px must be positive");
    }
    check_ratio("lock.snap_opposite_ratio_x100", lock.snap_opposite_ratio_x100)?;

    let aggregate = &config.aggregate;
    if !(aggregate.ema_alpha > 0.0 && aggregate.ema_alpha <= 1.0) {
        return invalid("aggregate.ema_alpha must be in (0, 1]");
    }
    if aggregate.fast_velocity <= 0.0 || aggregate.accel_spike <= 0.0 {
        return invalid("aggregate.fast_velocity and aggregate.accel_spike must be positive");
    }
    if aggregate.fast_min_votes == 0 {
        return invalid("aggregate.fast_min_votes must be > 0");
    }

    let finalize = &config.finalize;
    if finalize.quiet_min_ms > finalize.quiet_max_ms {
        return invalid("finalize.quiet_max_ms must be >= finalize.quiet_min_ms");
    }
    let quiet_range = finalize.quiet_min_ms..=finalize.quiet_max_ms;
    for (name, value) in [
        ("quiet_slow_ms", finalize.quiet_slow_ms),
        ("quiet_mid_ms", finalize.quiet_mid_ms),
        ("quiet_fast_ms", finalize.quiet_fast_ms),
    ] {
        if !quiet_range.contains(&value) {
            return invalid(&format!(
                "finalize.{name} must lie within [quiet_min_ms, quiet_max_ms]"
            ));
        }
    }
    if finalize.quiet_slow_velocity >= finalize.quiet_fast_velocity {
        return invalid("finalize.quiet_slow_velocity must be < finalize.quiet_fast_velocity");
    }
    if finalize.linger_ms == 0 {
        return invalid("finalize.linger_ms must be > 0");
    }

    let guard = &config.bounce_guard;
    check_ratio("bounce_guard.match_ratio_x100", guard.match_ratio_x100)?;
    if guard.enabled && guard.duration_ms == 0 {
        return invalid("bounce_guard.duration_ms must be > 0 when the guard is enabled");
    }

    Ok(())
}

pub fn render_generated_config(config: &ScrollConfigFile) -> String {
    let mut out = String::new();
    out.push_str("// @generated by scroll_config_compiler. Do not edit.\n");
    out.push_str("pub const SCROLL_INTENT_CONFIG: ScrollIntentConfig = ScrollIntentConfig {\n");

    open_section(&mut out, "noise", "NoiseConfig");
    push_field(&mut out, "jitter_px", config.noise.jitter_px);
    push_field(&mut out, "pair_window_ms", config.noise.pair_window_ms);
    push_field(&mut out, "pair_tolerance_px", config.noise.pair_tolerance_px);
    close_section(&mut out);

    open_section(&mut out, "lock", "LockConfig");
    push_field(&mut out, "lock_px", config.lock.lock_px);
    push_field(&mut out, "lock_sum_px", config.lock.lock_sum_px);
    push_field(&mut out, "lock_window_ms", config.lock.lock_window_ms);
    push_field(&mut out, "snap_window_ms", config.lock.snap_window_ms);
    push_field(
        &mut out,
        "snap_opposite_ratio_x100",
        config.lock.snap_opposite_ratio_x100,
    );
    close_section(&mut out);

    open_section(&mut out, "aggregate", "AggregateConfig");
    push_float(&mut out, "ema_alpha", config.aggregate.ema_alpha);
    push_float(&mut out, "fast_velocity", config.aggregate.fast_velocity);
    push_float(&mut out, "accel_spike", config.aggregate.accel_spike);
    push_field(&mut out, "fast_min_px", config.aggregate.fast_min_px);
    push_field(&mut out, "fast_min_votes", config.aggregate.fast_min_votes);
    close_section(&mut out);

    open_section(&mut out, "finalize", "FinalizeConfig");
    push_field(&mut out, "quiet_min_ms", config.finalize.quiet_min_ms);
    push_field(&mut out, "quiet_max_ms", config.finalize.quiet_max_ms);
    push_float(
        &mut out,
        "quiet_slow_velocity",
        config.finalize.quiet_slow_velocity,
    );
    push_float(
        &mut out,
        "quiet_fast_velocity",
        config.finalize.quiet_fast_velocity,
    );
    push_field(&mut out, "quiet_slow_ms", config.finalize.quiet_slow_ms);
    push_field(&mut out, "quiet_mid_ms", config.finalize.quiet_mid_ms);
    push_field(&mut out, "quiet_fast_ms", config.finalize.quiet_fast_ms);
    push_field(&mut out, "linger_ms", config.finalize.linger_ms);
    push_field(&mut out, "min_duration_ms", config.finalize.min_duration_ms);
    push_field(&mut out, "min_total_px", config.finalize.min_total_px);
    close_section(&mut out);

    open_section(&mut out, "session", "SessionConfig");
    push_field(&mut out, "allow_implicit", config.session.allow_implicit);
    close_section(&mut out);

    open_section(&mut out, "bounce_guard", "BounceGuardConfig");
    push_field(&mut out, "enabled", config.bounce_guard.enabled);
    push_field(&mut out, "duration_ms", config.bounce_guard.duration_ms);
    push_field(
        &mut out,
        "match_ratio_x100",
        config.bounce_guard.match_ratio_x100,
    );
    close_section(&mut out);

    out.push_str("};\n");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_config_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}

fn invalid(message: &str) -> Result<(), ConfigCompilerError> {
    Err(ConfigCompilerError::Validation(message.to_string()))
}

fn check_ratio(name: &str, value: u64) -> Result<(), ConfigCompilerError> {
    if (1..=100).contains(&value) {
        Ok(())
    } else {
        invalid(&format!("{name} must be within 1..=100"))
    }
}

fn open_section(out: &mut String, field: &str, ty: &str) {
    let _ = writeln!(out, "    {field}: {ty} {{");
}

fn close_section(out: &mut String) {
    out.push_str("    },\n");
}

fn push_field(out: &mut String, name: &str, value: impl Display) {
    let _ = writeln!(out, "        {name}: {value},");
}

// Debug keeps a trailing `.0` on whole floats so the literal stays an f32.
fn push_float(out: &mut String, name: &str, value: f32) {
    let _ = writeln!(out, "        {name}: {value:?},");
}
