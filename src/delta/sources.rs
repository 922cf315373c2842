use std::collections::HashMap;

use super::{DeltaError, DeltaSource, RawUpdate, SourceKey};
use crate::intent::SurfaceId;

/// Platform-reported delta; silent when absent or zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportedDelta;

impl DeltaSource for ReportedDelta {
    fn name(&self) -> &'static str {
        "reported"
    }

    fn delta(&mut self, raw: &RawUpdate, _key: SourceKey) -> Result<Option<i32>, DeltaError> {
        Ok(raw.reported_dy.filter(|dy| *dy != 0))
    }
}

/// Difference between consecutive absolute offsets of the same source node.
#[derive(Clone, Debug, Default)]
pub struct ScrollOffsetDelta {
    last_by_source: HashMap<SourceKey, i32>,
}

impl DeltaSource for ScrollOffsetDelta {
    fn name(&self) -> &'static str {
        "scroll_offset"
    }

    fn delta(&mut self, raw: &RawUpdate, key: SourceKey) -> Result<Option<i32>, DeltaError> {
        let Some(current) = raw.scroll_y else {
            return Ok(None);
        };
        let previous = self.last_by_source.insert(key, current);
        Ok(previous
            .map(|previous| current.saturating_sub(previous))
            .filter(|dy| *dy != 0))
    }
}

/// Movement of the topmost anchor node, per surface.
///
/// Content moving down pushes the anchor up the screen, so the raw
/// difference is negated.
#[derive(Clone, Debug, Default)]
pub struct AnchorTopDelta {
    last_by_surface: HashMap<SurfaceId, i32>,
}

impl DeltaSource for AnchorTopDelta {
    fn name(&self) -> &'static str {
        "anchor_top"
    }

    fn delta(&mut self, raw: &RawUpdate, _key: SourceKey) -> Result<Option<i32>, DeltaError> {
        let Some(top) = raw.anchor_top else {
            return Ok(None);
        };
        let Some(previous) = self.last_by_surface.insert(raw.surface, top) else {
            return Ok(None);
        };
        Ok(Some(previous.saturating_sub(top)))
    }
}
