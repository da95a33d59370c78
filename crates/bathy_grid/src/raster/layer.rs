//! Per-attribute layers and their aggregation state.
//!
//! Each [`Layer`] holds one attribute over the whole grid. Collisions (several samples in
//! one cell) are resolved by the layer's [`Aggregation`] policy.

/// How colliding samples are combined within one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregation {
    /// The last sample replaces the previous value; each replacement is reported.
    /// Suited to sources that are already gridded at the same resolution.
    Overwrite,
    /// Running mean of all samples in the cell.
    Mean,
}

/// Name and aggregation policy of a layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerSpec {
    pub name: String,
    pub aggregation: Aggregation,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>, aggregation: Aggregation) -> Self {
        Self {
            name: name.into(),
            aggregation,
        }
    }

    pub fn mean(name: impl Into<String>) -> Self {
        Self::new(name, Aggregation::Mean)
    }

    pub fn overwrite(name: impl Into<String>) -> Self {
        Self::new(name, Aggregation::Overwrite)
    }
}

/// Index of a layer within a [`crate::raster::RasterProduct`]; matches the attribute
/// position in each [`crate::raster::Sample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub usize);

/// Dense per-cell aggregation state for one attribute.
#[derive(Clone, Debug)]
pub struct Layer {
    spec: LayerSpec,
    nodata: f64,
    /// Running sum (mean) or latest value (overwrite).
    acc: Vec<f64>,
    counts: Vec<u32>,
    overwritten: usize,
}

impl Layer {
    pub(crate) fn new(spec: LayerSpec, len: usize, nodata: f64) -> Self {
        Self {
            spec,
            nodata,
            acc: vec![nodata; len],
            counts: vec![0; len],
            overwritten: 0,
        }
    }

    pub fn spec(&self) -> &LayerSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn aggregation(&self) -> Aggregation {
        self.spec.aggregation
    }

    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Number of replaced values (overwrite layers only).
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    /// Adds `value` to the cell at `index`. Returns the replaced value when an overwrite
    /// layer already held one.
    pub(crate) fn accumulate(&mut self, index: usize, value: f64) -> Option<f64> {
        let count = &mut self.counts[index];
        let acc = &mut self.acc[index];
        let replaced = if *count == 0 {
            *acc = value;
            None
        } else {
            match self.spec.aggregation {
                Aggregation::Overwrite => {
                    self.overwritten += 1;
                    Some(std::mem::replace(acc, value))
                }
                Aggregation::Mean => {
                    *acc += value;
                    None
                }
            }
        };
        *count = count.saturating_add(1);
        replaced
    }

    /// Number of samples that touched the cell at `index`.
    pub fn count_at(&self, index: usize) -> u32 {
        self.counts[index]
    }

    /// Final value of the cell at `index`, or `None` if no sample reached it.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match (self.counts[index], self.spec.aggregation) {
            (0, _) => None,
            (_, Aggregation::Overwrite) => Some(self.acc[index]),
            (n, Aggregation::Mean) => Some(self.acc[index] / n as f64),
        }
    }

    /// Final values for all cells, row-major, with the nodata sentinel for empty cells.
    pub fn values(&self) -> Vec<f64> {
        (0..self.counts.len())
            .map(|i| self.value_at(i).unwrap_or(self.nodata))
            .collect()
    }

    /// Per-cell sample counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Minimum and maximum over populated cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        (0..self.counts.len())
            .filter_map(|i| self.value_at(i))
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of cells that never received a sample.
    pub fn empty_cells(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 0).count()
    }
}
