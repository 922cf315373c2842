use core::fmt;

/// Identifier of an observed scrollable window or region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub i32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One vertical measurement. Positive `dy` means content moved down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollEvent {
    pub surface: SurfaceId,
    pub t_ms: u64,
    pub dy: i32,
    pub to_index: i32,
    pub item_count: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Content moved down, finger swiped up.
    Up,
    /// Content moved up, finger swiped down.
    Down,
    #[default]
    Unknown,
}

impl Verdict {
    pub const fn from_sign(sign: i8) -> Self {
        if sign > 0 {
            Verdict::Up
        } else if sign < 0 {
            Verdict::Down
        } else {
            Verdict::Unknown
        }
    }

    pub const fn sign(self) -> i8 {
        match self {
            Verdict::Up => 1,
            Verdict::Down => -1,
            Verdict::Unknown => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Up => "up",
            Verdict::Down => "down",
            Verdict::Unknown => "unknown",
        }
    }
}

/// Which rule produced the verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum VerdictSource {
    #[default]
    InsufficientEvidence = 0,
    DirectionLock = 1,
    NetDistance = 2,
    Votes = 3,
    IndexProgress = 4,
    Tie = 5,
}

impl VerdictSource {
    pub const fn label(self) -> &'static str {
        match self {
            VerdictSource::InsufficientEvidence => "insufficient",
            VerdictSource::DirectionLock => "lock",
            VerdictSource::NetDistance => "net_distance",
            VerdictSource::Votes => "votes",
            VerdictSource::IndexProgress => "index",
            VerdictSource::Tie => "tie",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum FinalizeReason {
    #[default]
    QuietTimeout = 0,
    Linger = 1,
    FastFlick = 2,
}

impl FinalizeReason {
    pub const fn label(self) -> &'static str {
        match self {
            FinalizeReason::QuietTimeout => "quiet",
            FinalizeReason::Linger => "linger",
            FinalizeReason::FastFlick => "fast_flick",
        }
    }
}

/// Emitted exactly once per finalized session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VerdictRecord {
    pub surface: SurfaceId,
    pub verdict: Verdict,
    pub source: VerdictSource,
    pub reason: FinalizeReason,
    pub finalized_at_ms: u64,
    pub sum_dy: i32,
    pub abs_sum_dy: u64,
    pub duration_ms: u64,
    pub velocity_ema: f32,
    pub pos_votes: u32,
    pub neg_votes: u32,
    pub implicit: bool,
    pub locked_sign: i8,
}

/// Generation token of a scheduled finalize; stale tokens never fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FinalizeToken(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineAction {
    /// `token` is assigned by the engine when the slot is armed.
    ScheduleFinalize {
        surface: SurfaceId,
        due_ms: u64,
        reason: FinalizeReason,
        token: FinalizeToken,
    },
    CancelFinalize {
        surface: SurfaceId,
    },
    Verdict(VerdictRecord),
}

const ACTION_BUFFER_CAPACITY: usize = 4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionBuffer {
    slots: heapless::Vec<EngineAction, ACTION_BUFFER_CAPACITY>,
}

impl ActionBuffer {
    pub const MAX: usize = ACTION_BUFFER_CAPACITY;

    pub const fn new() -> Self {
        Self {
            slots: heapless::Vec::new(),
        }
    }

    pub fn push(&mut self, action: EngineAction) {
        let _ = self.slots.push(action);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineAction> {
        self.slots.iter()
    }

    pub fn verdict(&self) -> Option<&VerdictRecord> {
        self.iter().find_map(|action| match action {
            EngineAction::Verdict(record) => Some(record),
            _ => None,
        })
    }

    pub fn scheduled_due_ms(&self) -> Option<u64> {
        self.slots.iter().rev().find_map(|action| match action {
            EngineAction::ScheduleFinalize { due_ms, .. } => Some(*due_ms),
            _ => None,
        })
    }
}

/// Outcome of one delta passed through the filter, lock and aggregation stages.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum DeltaDecision {
    #[default]
    None = 0,
    Accepted = 1,
    Jitter = 2,
    PairCancelled = 3,
    SnapSuppressed = 4,
    BounceFiltered = 5,
    NoSession = 6,
    MeasureFailed = 7,
}

impl DeltaDecision {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            DeltaDecision::None => "none",
            DeltaDecision::Accepted => "accepted",
            DeltaDecision::Jitter => "jitter",
            DeltaDecision::PairCancelled => "pair_cancel",
            DeltaDecision::SnapSuppressed => "snap_suppressed",
            DeltaDecision::BounceFiltered => "bounce_filtered",
            DeltaDecision::NoSession => "no_session",
            DeltaDecision::MeasureFailed => "measure_failed",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum SurfaceStateId {
    #[default]
    Idle = 0,
    Tracking = 1,
    Lingering = 2,
}

impl SurfaceStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

pub(crate) const fn sign_of(value: i64) -> i8 {
    if value > 0 {
        1
    } else if value < 0 {
        -1
    } else {
        0
    }
}
