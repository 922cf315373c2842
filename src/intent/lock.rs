use super::{config::LockConfig, session::Session, types::sign_of};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SnapCheck {
    /// Not locked, outside the snap window, or same sign as the lock.
    Clear,
    /// Opposite sign still under the same-direction ratio; dropped.
    Suppressed { opposite_abs: u64, threshold: u64 },
    /// Opposite magnitude outgrew the ratio; the delta goes on to aggregation.
    Released,
}

/// Commits the session direction once, early in the interaction.
///
/// Returns true only on the call that sets the lock.
pub(crate) fn try_lock(session: &mut Session, dy: i32, now_ms: u64, config: &LockConfig) -> bool {
    if session.locked_sign != 0 {
        return false;
    }
    if now_ms.saturating_sub(session.start_ms) > config.lock_window_ms {
        return false;
    }

    let magnitude = dy.unsigned_abs();
    let strong_single = magnitude >= config.lock_px.max(0) as u32;
    let strong_sum =
        session.abs_sum_dy.saturating_add(u64::from(magnitude)) >= config.lock_sum_px;
    if !(strong_single || strong_sum) {
        return false;
    }

    let sign = sign_of(i64::from(dy));
    if sign == 0 {
        return false;
    }
    session.locked_sign = sign;
    session.locked_at_ms = now_ms;
    session.same_abs_since_lock = 0;
    session.opp_abs_since_lock = 0;
    true
}

/// Post-lock reversal check. Charges opposite-sign magnitude while inside the window.
pub(crate) fn snap_check(session: &mut Session, dy: i32, now_ms: u64, config: &LockConfig) -> SnapCheck {
    if session.locked_sign == 0
        || now_ms.saturating_sub(session.locked_at_ms) > config.snap_window_ms
        || sign_of(i64::from(dy)) != -session.locked_sign
    {
        return SnapCheck::Clear;
    }

    session.opp_abs_since_lock = session
        .opp_abs_since_lock
        .saturating_add(u64::from(dy.unsigned_abs()));
    let threshold = (session
        .same_abs_since_lock
        .saturating_mul(config.snap_opposite_ratio_x100)
        / 100)
        .max(1);
    if session.opp_abs_since_lock <= threshold {
        SnapCheck::Suppressed {
            opposite_abs: session.opp_abs_since_lock,
            threshold,
        }
    } else {
        SnapCheck::Released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{config::active_config, types::SurfaceId};

    fn locked_session(sign: i8, same_abs: u64) -> Session {
        let mut session = Session::begin(SurfaceId(3), 0, false);
        session.locked_sign = sign;
        session.locked_at_ms = 0;
        session.same_abs_since_lock = same_abs;
        session
    }

    #[test]
    fn large_single_delta_locks_inside_window() {
        let config = &active_config().lock;
        let mut session = Session::begin(SurfaceId(3), 0, false);
        assert!(try_lock(&mut session, -180, 100, config));
        assert_eq!(session.locked_sign, -1);
        assert_eq!(session.locked_at_ms, 100);
    }

    #[test]
    fn cumulative_distance_locks() {
        let config = &active_config().lock;
        let mut session = Session::begin(SurfaceId(3), 0, false);
        session.abs_sum_dy = 200;
        assert!(!try_lock(&mut session, 30, 50, config));
        assert!(try_lock(&mut session, 40, 60, config));
        assert_eq!(session.locked_sign, 1);
    }

    #[test]
    fn lock_window_expiry_prevents_locking() {
        let config = &active_config().lock;
        let mut session = Session::begin(SurfaceId(3), 0, false);
        assert!(!try_lock(&mut session, 500, 221, config));
        assert_eq!(session.locked_sign, 0);
    }

    #[test]
    fn lock_is_write_once() {
        let config = &active_config().lock;
        let mut session = Session::begin(SurfaceId(3), 0, false);
        assert!(try_lock(&mut session, 300, 0, config));
        assert!(!try_lock(&mut session, -300, 10, config));
        assert_eq!(session.locked_sign, 1);
        assert_eq!(session.locked_at_ms, 0);
    }

    #[test]
    fn opposite_delta_suppressed_until_ratio_exceeded() {
        let config = &active_config().lock;
        let mut session = locked_session(1, 100);

        assert_eq!(
            snap_check(&mut session, -50, 10, config),
            SnapCheck::Suppressed {
                opposite_abs: 50,
                threshold: 85
            }
        );
        assert_eq!(
            snap_check(&mut session, -35, 20, config),
            SnapCheck::Suppressed {
                opposite_abs: 85,
                threshold: 85
            }
        );
        assert_eq!(snap_check(&mut session, -1, 30, config), SnapCheck::Released);
        assert_eq!(session.opp_abs_since_lock, 86);
    }

    #[test]
    fn threshold_floor_is_one() {
        let config = &active_config().lock;
        let mut session = locked_session(-1, 0);
        assert_eq!(
            snap_check(&mut session, 1, 5, config),
            SnapCheck::Suppressed {
                opposite_abs: 1,
                threshold: 1
            }
        );
        assert_eq!(snap_check(&mut session, 1, 6, config), SnapCheck::Released);
    }

    #[test]
    fn snap_window_ignores_same_sign_and_late_deltas() {
        let config = &active_config().lock;
        let mut session = locked_session(1, 100);
        assert_eq!(snap_check(&mut session, 40, 10, config), SnapCheck::Clear);
        assert_eq!(snap_check(&mut session, -40, 251, config), SnapCheck::Clear);
        assert_eq!(session.opp_abs_since_lock, 0);
    }
}
