//! Scroll-intent classification for coarse, delta-only scroll feeds.
//!
//! Each observed surface gets at most one session at a time. Updates pass a
//! noise filter, a direction lock with a post-lock snap window and an
//! aggregator; sessions close on an adaptive quiet timeout, a linger after
//! the interaction ends, or a fast-flick short circuit, and resolve to
//! [`Verdict::Up`], [`Verdict::Down`] or [`Verdict::Unknown`].

pub mod delta;
pub mod intent;
pub mod telemetry;

pub use delta::{DeltaError, DeltaProvider, FallbackDeltaProvider, RawUpdate, SourceKey};
pub use intent::{
    active_config, EngineAction, EngineOutput, FinalizeReason, FinalizeToken, ScrollEvent,
    ScrollIntentConfig, ScrollIntentEngine, SurfaceId, Verdict, VerdictRecord, VerdictSource,
};
pub use telemetry::IntentCounters;
