//! Streaming extent scan over samples.
//!
//! Grid sizing needs the bounding box of the whole point set before the first sample is
//! binned; colour shading needs the depth range. [`Extent`] collects both in one pass.
use crate::geometry::BoundingBox;
use crate::raster::sample::Sample;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    bbox: Option<BoundingBox>,
    value_range: Option<(f64, f64)>,
    count: usize,
}

impl Extent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let mut extent = Self::new();
        for s in samples {
            extent.include(s);
        }
        extent
    }

    /// Grows the extent to cover `sample`.
    pub fn include(&mut self, sample: &Sample) {
        self.count += 1;
        match self.bbox.as_mut() {
            Some(bbox) => bbox.include(sample.position),
            None => self.bbox = Some(BoundingBox::from_point(sample.position)),
        }
        if let Some(v) = sample.value(0) {
            self.value_range = Some(match self.value_range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
    }

    /// Bounding box of all positions, `None` before the first sample.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Minimum and maximum of the first attribute (depth), ignoring absent values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.value_range
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
