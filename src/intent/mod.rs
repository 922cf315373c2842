pub mod config;
mod engine;
mod filter;
mod guard;
mod hsm;
mod lock;
pub mod scheduler;
mod session;
mod store;
pub mod trace;
pub mod types;
mod verdict;

pub use config::{active_config, ScrollIntentConfig};
pub use engine::{EngineOutput, ScrollIntentEngine};
pub use scheduler::PendingFinalize;
pub use session::SessionSnapshot;
pub use trace::EngineTraceSample;
pub use types::{
    ActionBuffer, DeltaDecision, EngineAction, FinalizeReason, FinalizeToken, ScrollEvent,
    SurfaceId, SurfaceStateId, Verdict, VerdictRecord, VerdictSource,
};

#[cfg(test)]
mod tests;
