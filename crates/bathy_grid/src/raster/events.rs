//! Event types and sinks for observing binning runs.
//!
//! This module defines [`RasterEvent`] and a set of sinks to ignore, collect, or forward
//! events while binning samples via [`crate::raster::RasterProduct::bin_with_events`].
use glam::DVec2;

use crate::error::MalformedSample;
use crate::raster::layer::LayerId;
use crate::raster::product::BinSummary;

/// Describes events emitted while binning.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum RasterEvent {
    /// An overwrite layer replaced an existing cell value: two input samples share a cell.
    ValueOverwritten {
        /// Layer whose cell was replaced.
        layer: LayerId,
        /// Position of the replacing sample.
        position: DVec2,
        /// Cell row.
        row: usize,
        /// Cell column.
        col: usize,
        /// Value held before.
        previous: f64,
        /// Value written.
        value: f64,
    },

    /// A sample was rejected and counted as skipped.
    SampleSkipped {
        /// Offending input line, when binned from text.
        line: Option<String>,
        /// Why it was rejected.
        reason: MalformedSample,
    },

    /// A sample fell outside the grid. The run is aborted with an error right after.
    OutOfBounds {
        /// Offending position.
        position: DVec2,
        /// Computed row (may be negative).
        row: i64,
        /// Computed column (may be negative).
        col: i64,
    },

    /// Emitted by [`crate::raster::RasterProduct::finish_with_events`].
    BinningFinished {
        /// Final counts for the run.
        summary: BinSummary,
    },
}

/// A generic event sink that accepts [`RasterEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: RasterEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: RasterEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(RasterEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(RasterEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(RasterEvent),
{
    #[inline]
    fn send(&mut self, event: RasterEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<RasterEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<RasterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[RasterEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: RasterEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: RasterEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.send(event.clone());
        }
        last.send(event);
    }
}
