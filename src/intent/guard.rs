use super::{config::BounceGuardConfig, types::sign_of};

/// Short-lived record of a resolved session used to reject its release rebound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PostBounceGuard {
    pub(crate) expires_at_ms: u64,
    pub(crate) sign: i8,
    pub(crate) magnitude: u64,
}

impl PostBounceGuard {
    pub(crate) fn arm(now_ms: u64, sign: i8, magnitude: u64, config: &BounceGuardConfig) -> Self {
        Self {
            expires_at_ms: now_ms.saturating_add(config.duration_ms),
            sign,
            magnitude,
        }
    }

    pub(crate) fn is_live(&self, now_ms: u64) -> bool {
        now_ms <= self.expires_at_ms
    }

    /// A live guard matches a reverse delta of at least `match_ratio` of the session.
    pub(crate) fn is_rebound(&self, now_ms: u64, dy: i32, config: &BounceGuardConfig) -> bool {
        if !self.is_live(now_ms) || self.sign == 0 {
            return false;
        }
        let opposite = sign_of(i64::from(dy)) == -self.sign;
        let big = u64::from(dy.unsigned_abs())
            >= self.magnitude.saturating_mul(config.match_ratio_x100) / 100;
        opposite && big
    }
}
