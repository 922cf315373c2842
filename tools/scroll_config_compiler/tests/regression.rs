use std::{fs, path::PathBuf};

use scroll_config_compiler::{
    generate_from_path, parse_config_file, render_generated_config, validate_config,
    ConfigCompilerError,
};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("missing tools dir")
        .parent()
        .expect("missing repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn snapshot(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name)
}

#[test]
fn default_config_matches_snapshot() {
    let config = repo_root().join("config/scroll_intent.toml");
    let actual = generate_from_path(&config).expect("default config should compile");
    let expected = fs::read_to_string(snapshot("default_generated.rs"))
        .expect("missing default snapshot file");

    assert_eq!(
        actual, expected,
        "generated output changed; if intentional, update tools/scroll_config_compiler/tests/snapshots/default_generated.rs"
    );
}

#[test]
fn generation_is_deterministic_for_same_input() {
    let config = fixture("valid_default.toml");
    let first = generate_from_path(&config).expect("first generation failed");
    let second = generate_from_path(&config).expect("second generation failed");
    assert_eq!(first, second);
}

#[test]
fn session_and_guard_flags_render_when_disabled() {
    let path = fixture("valid_strict_sessions.toml");
    let config = parse_config_file(&path).expect("fixture should parse");
    validate_config(&config).expect("fixture should validate");
    let rendered = render_generated_config(&config);

    for needle in ["allow_implicit: false", "enabled: false"] {
        assert!(
            rendered.contains(needle),
            "rendered output missing `{needle}`"
        );
    }
}

#[test]
fn semantic_validation_rejects_invalid_ranges() {
    let cases = [
        ("invalid/zero_jitter.toml", "noise.jitter_px must be > 0"),
        (
            "invalid/quiet_min_gt_max.toml",
            "finalize.quiet_max_ms must be >= finalize.quiet_min_ms",
        ),
        (
            "invalid/quiet_tier_out_of_bounds.toml",
            "finalize.quiet_fast_ms must lie within",
        ),
        (
            "invalid/ema_alpha_out_of_range.toml",
            "aggregate.ema_alpha must be in (0, 1]",
        ),
        (
            "invalid/zero_snap_ratio.toml",
            "lock.snap_opposite_ratio_x100 must be within 1..=100",
        ),
        (
            "invalid/velocity_tiers_inverted.toml",
            "finalize.quiet_slow_velocity must be < finalize.quiet_fast_velocity",
        ),
    ];

    for (fixture_name, expected_msg) in cases {
        let path = fixture(fixture_name);
        let err = generate_from_path(&path).expect_err("fixture should fail validation");
        match err {
            ConfigCompilerError::Validation(msg) => {
                assert!(
                    msg.contains(expected_msg),
                    "expected validation message containing `{expected_msg}`, got `{msg}`"
                );
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}

#[test]
fn parse_errors_are_reported_for_schema_mismatches() {
    let cases = [
        ("invalid/missing_session.toml", "session"),
        ("invalid/unknown_field.toml", "lock_degrees"),
    ];

    for (fixture_name, needle) in cases {
        let err = generate_from_path(&fixture(fixture_name)).expect_err("fixture should fail parsing");
        match err {
            ConfigCompilerError::Parse(msg) => {
                assert!(
                    msg.contains(needle),
                    "expected parse error mentioning {needle}, got `{msg}`"
                );
            }
            other => panic!("expected parse error, got {other}"),
        }
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = generate_from_path(&fixture("does_not_exist.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigCompilerError::Io { .. }));
}
