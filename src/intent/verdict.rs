use super::{
    config::ScrollIntentConfig,
    session::Session,
    types::{sign_of, FinalizeReason, Verdict, VerdictRecord, VerdictSource},
};

/// A direction rule: `Some(sign)` commits, `None` defers to the next rule.
type Resolver = fn(&Session) -> Option<i8>;

const RESOLVERS: [(VerdictSource, Resolver); 4] = [
    (VerdictSource::DirectionLock, by_lock),
    (VerdictSource::NetDistance, by_net_distance),
    (VerdictSource::Votes, by_votes),
    (VerdictSource::IndexProgress, by_index_progress),
];

fn by_lock(session: &Session) -> Option<i8> {
    (session.locked_sign != 0).then_some(session.locked_sign)
}

fn by_net_distance(session: &Session) -> Option<i8> {
    match sign_of(i64::from(session.sum_dy)) {
        0 => None,
        sign => Some(sign),
    }
}

fn by_votes(session: &Session) -> Option<i8> {
    match session.pos_votes.cmp(&session.neg_votes) {
        core::cmp::Ordering::Greater => Some(1),
        core::cmp::Ordering::Less => Some(-1),
        core::cmp::Ordering::Equal => None,
    }
}

// Any index report implies the list advanced toward later items.
fn by_index_progress(session: &Session) -> Option<i8> {
    (session.last_to_index >= 0 && session.last_item_count > 0).then_some(1)
}

pub(crate) fn resolve_direction(session: &Session) -> (Verdict, VerdictSource) {
    RESOLVERS
        .iter()
        .find_map(|(source, resolver)| {
            resolver(session).map(|sign| (Verdict::from_sign(sign), *source))
        })
        .unwrap_or((Verdict::Unknown, VerdictSource::Tie))
}

/// Terminal classification of a session that has just been removed.
pub(crate) fn judge(
    session: &Session,
    now_ms: u64,
    reason: FinalizeReason,
    config: &ScrollIntentConfig,
) -> VerdictRecord {
    let duration_ms = session.duration_ms();
    let fast_flick = session.is_fast_flick(&config.aggregate);
    let too_short = duration_ms < config.finalize.min_duration_ms;
    let too_small = session.abs_sum_dy < config.finalize.min_total_px;

    let (verdict, source) = if !fast_flick && (too_short || too_small) {
        (Verdict::Unknown, VerdictSource::InsufficientEvidence)
    } else {
        resolve_direction(session)
    };

    VerdictRecord {
        surface: session.surface,
        verdict,
        source,
        reason,
        finalized_at_ms: now_ms,
        sum_dy: session.sum_dy,
        abs_sum_dy: session.abs_sum_dy,
        duration_ms,
        velocity_ema: session.velocity_ema,
        pos_votes: session.pos_votes,
        neg_votes: session.neg_votes,
        implicit: session.implicit,
        locked_sign: session.locked_sign,
    }
}
