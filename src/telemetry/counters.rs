use crate::intent::{
    trace::EngineTraceSample,
    types::{DeltaDecision, FinalizeReason, Verdict, VerdictRecord},
};

/// Saturating per-engine counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntentCounters {
    pub updates: u32,
    pub accepted: u32,
    pub jitter_drops: u32,
    pub pair_cancels: u32,
    pub snap_suppressions: u32,
    pub direction_locks: u32,
    pub bounce_filtered: u32,
    pub implicit_starts: u32,
    pub no_session_drops: u32,
    pub measure_failures: u32,
    pub fast_flicks: u32,
    pub verdicts_up: u32,
    pub verdicts_down: u32,
    pub verdicts_unknown: u32,
}

impl IntentCounters {
    pub fn verdicts_total(&self) -> u32 {
        self.verdicts_up
            .saturating_add(self.verdicts_down)
            .saturating_add(self.verdicts_unknown)
    }

    pub(crate) fn record_update(&mut self) {
        bump(&mut self.updates);
    }

    pub(crate) fn record_measure_failure(&mut self) {
        bump(&mut self.measure_failures);
    }

    pub(crate) fn record_trace(&mut self, trace: &EngineTraceSample) {
        let counter = match trace.decision {
            DeltaDecision::Accepted => Some(&mut self.accepted),
            DeltaDecision::Jitter => Some(&mut self.jitter_drops),
            DeltaDecision::PairCancelled => Some(&mut self.pair_cancels),
            DeltaDecision::SnapSuppressed => Some(&mut self.snap_suppressions),
            DeltaDecision::BounceFiltered => Some(&mut self.bounce_filtered),
            DeltaDecision::NoSession => Some(&mut self.no_session_drops),
            DeltaDecision::MeasureFailed | DeltaDecision::None => None,
        };
        if let Some(counter) = counter {
            bump(counter);
        }
        if trace.lock_committed != 0 {
            bump(&mut self.direction_locks);
        }
        if trace.implicit_start != 0 {
            bump(&mut self.implicit_starts);
        }
    }

    pub(crate) fn record_verdict(&mut self, record: &VerdictRecord) {
        match record.verdict {
            Verdict::Up => bump(&mut self.verdicts_up),
            Verdict::Down => bump(&mut self.verdicts_down),
            Verdict::Unknown => bump(&mut self.verdicts_unknown),
        }
        if record.reason == FinalizeReason::FastFlick {
            bump(&mut self.fast_flicks);
        }
    }
}

fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}
