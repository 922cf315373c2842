use super::{config::NoiseConfig, session::Session, types::sign_of};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoiseVerdict {
    Pass,
    /// Below the jitter floor; carries no direction evidence.
    Jitter,
    /// Mirror image of the previous delta (anchor rebind spike).
    PairCancel,
}

/// First gate for every delta: jitter rejection, then pair cancellation.
pub(crate) fn screen(session: &Session, dy: i32, now_ms: u64, config: &NoiseConfig) -> NoiseVerdict {
    let magnitude = dy.unsigned_abs();
    if magnitude < config.jitter_px.max(0) as u32 {
        return NoiseVerdict::Jitter;
    }

    let last = session.last_pair_dy;
    if last != 0
        && sign_of(i64::from(dy)) == -sign_of(i64::from(last))
        && now_ms.saturating_sub(session.last_pair_at_ms) <= config.pair_window_ms
    {
        let diff = i64::from(magnitude) - i64::from(last.unsigned_abs());
        if diff.abs() <= i64::from(config.pair_tolerance_px) {
            return NoiseVerdict::PairCancel;
        }
    }

    NoiseVerdict::Pass
}
