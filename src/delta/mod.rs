//! Turns raw platform scroll notifications into a signed vertical delta.
//!
//! Platforms rarely report a reliable `dy`. The fallback provider asks an
//! ordered list of sources and takes the first one that commits.

use thiserror::Error;

use crate::intent::SurfaceId;

mod sources;

pub use sources::{AnchorTopDelta, ReportedDelta, ScrollOffsetDelta};

/// Identity of the node that emitted a scroll notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceKey(pub u64);

/// One raw scroll notification as delivered by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawUpdate {
    pub surface: SurfaceId,
    pub t_ms: u64,
    pub source_key: Option<SourceKey>,
    /// Platform-reported delta, when the platform provides one.
    pub reported_dy: Option<i32>,
    /// Absolute scroll offset of the source node.
    pub scroll_y: Option<i32>,
    /// Screen-space top of the topmost visible labelled node.
    pub anchor_top: Option<i32>,
    pub to_index: i32,
    pub item_count: i32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeltaError {
    #[error("update on surface {surface} has no source node")]
    MissingSource { surface: SurfaceId },
    #[error("delta source `{source_name}` failed: {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },
}

pub trait DeltaProvider {
    fn measure_dy(&mut self, raw: &RawUpdate) -> Result<i32, DeltaError>;
}

/// A single candidate in the fallback chain. `Ok(None)` means no opinion.
pub trait DeltaSource {
    fn name(&self) -> &'static str;

    fn delta(&mut self, raw: &RawUpdate, key: SourceKey) -> Result<Option<i32>, DeltaError>;
}

pub struct FallbackDeltaProvider {
    sources: Vec<Box<dyn DeltaSource>>,
}

impl Default for FallbackDeltaProvider {
    /// Reported delta, then scroll offset, then anchor top.
    fn default() -> Self {
        Self::new(vec![
            Box::new(ReportedDelta),
            Box::new(ScrollOffsetDelta::default()),
            Box::new(AnchorTopDelta::default()),
        ])
    }
}

impl FallbackDeltaProvider {
    pub fn new(sources: Vec<Box<dyn DeltaSource>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.iter().map(|source| source.name())
    }
}

impl DeltaProvider for FallbackDeltaProvider {
    fn measure_dy(&mut self, raw: &RawUpdate) -> Result<i32, DeltaError> {
        let key = raw
            .source_key
            .ok_or(DeltaError::MissingSource {
                surface: raw.surface,
            })?;

        for source in self.sources.iter_mut() {
            if let Some(dy) = source.delta(raw, key)? {
                return Ok(dy);
            }
        }
        Ok(0)
    }
}
