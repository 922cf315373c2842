use super::types::{DeltaDecision, SurfaceId, SurfaceStateId};

/// Per-dispatch snapshot of what the surface machine decided.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineTraceSample {
    pub now_ms: u64,
    pub surface: SurfaceId,
    pub state_id: SurfaceStateId,
    pub decision: DeltaDecision,
    pub dy: i32,
    pub sum_dy: i32,
    pub abs_sum_dy: u64,
    pub locked_sign: i8,
    /// 1 on the update that committed the direction lock.
    pub lock_committed: u8,
    /// 1 when this update opened an implicit session.
    pub implicit_start: u8,
    pub velocity_ema: f32,
    pub accel: f32,
    /// Quiet duration armed by this dispatch, 0 if none.
    pub quiet_ms: u64,
}
