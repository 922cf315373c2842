use scrollwatch::{ScrollIntentEngine, VerdictRecord};

use crate::trace::TraceLine;

/// Feeds `lines` through `engine` on a virtual clock.
///
/// Before each line, every finalize due strictly before its timestamp fires.
/// Whatever is still pending after the last line is drained.
pub fn replay(engine: &mut ScrollIntentEngine, lines: &[TraceLine]) -> Vec<VerdictRecord> {
    let mut verdicts = Vec::new();

    for line in lines {
        while let Some(deadline) = engine.next_deadline() {
            if deadline >= line.ms() {
                break;
            }
            verdicts.extend(engine.poll(deadline));
        }

        let output = match *line {
            TraceLine::Start { ms, surface } => engine.interaction_start(surface, ms),
            TraceLine::Update(event) => engine.update(event),
            TraceLine::End { ms, surface } => engine.interaction_end(surface, ms),
        };
        verdicts.extend(output.verdict().copied());
    }

    while let Some(deadline) = engine.next_deadline() {
        verdicts.extend(engine.poll(deadline));
    }
    verdicts
}
