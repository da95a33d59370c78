//! Scatter-to-grid binning.
//!
//! A [`RasterProduct`] owns a fixed [`Grid`] and one [`Layer`] per sample attribute.
//! Samples are binned one at a time, so callers can interleave reading and binning;
//! stopping early leaves a valid, partially filled product.
//!
//! Bad input is handled two ways:
//! - malformed samples (wrong arity, non-numeric or non-finite fields) are skipped and
//!   counted, never interrupting the run;
//! - samples outside the grid abort the run with [`Error::OutOfGridBounds`], since the grid
//!   was sized from the same point set and a silent clip would corrupt the cell averages.
use tracing::{debug, error, info, warn};

use crate::error::{Error, MalformedSample, Result};
use crate::geometry::BoundingBox;
use crate::raster::config::RasterConfig;
use crate::raster::events::{EventSink, RasterEvent};
use crate::raster::grid::Grid;
use crate::raster::layer::{Layer, LayerId, LayerSpec};
use crate::raster::sample::{Sample, SampleParser};
use crate::raster::views::{ColorGrid, ScalarGrid};

/// Counts reported at the end of a binning run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinSummary {
    /// Samples assigned to a cell.
    pub binned: usize,
    /// Malformed samples that were skipped.
    pub skipped: usize,
    /// Binned samples that replaced a value in at least one overwrite layer.
    pub overwritten: usize,
    /// Cells that received no sample.
    pub empty_cells: usize,
}

/// A grid plus its layers and aggregation state.
#[derive(Clone, Debug)]
pub struct RasterProduct {
    grid: Grid,
    nodata: f64,
    layers: Vec<Layer>,
    hits: Vec<u32>,
    binned: usize,
    skipped: usize,
    overwritten: usize,
}

impl RasterProduct {
    /// Allocates layers over `grid`, all cells set to `nodata`.
    pub fn new(grid: Grid, nodata: f64, specs: Vec<LayerSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::InvalidConfig(
                "a raster product needs at least one layer".into(),
            ));
        }
        let len = grid.rows.checked_mul(grid.cols).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "grid of {}x{} cells is too large",
                grid.rows, grid.cols
            ))
        })?;

        let layers = specs
            .into_iter()
            .map(|spec| Layer::new(spec, len, nodata))
            .collect();

        Ok(Self {
            grid,
            nodata,
            layers,
            hits: vec![0; len],
            binned: 0,
            skipped: 0,
            overwritten: 0,
        })
    }

    /// Sizes the grid for `bbox` from `config`, then allocates the layers.
    pub fn from_config(
        bbox: BoundingBox,
        config: &RasterConfig,
        specs: Vec<LayerSpec>,
    ) -> Result<Self> {
        config.validate()?;
        let grid = Grid::from_config(bbox, config)?;
        Self::new(grid, config.nodata, specs)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Number of attributes each sample must carry.
    pub fn arity(&self) -> usize {
        self.layers.len()
    }

    /// Bins one sample. Only an out-of-grid position is an error.
    pub fn bin(&mut self, sample: &Sample) -> Result<()> {
        self.bin_with_events(sample, &mut ())
    }

    /// Bins one sample, reporting overwrites and skips to `sink`.
    pub fn bin_with_events(&mut self, sample: &Sample, sink: &mut dyn EventSink) -> Result<()> {
        if let Err(reason) = self.check_sample(sample) {
            self.skip(None, reason, sink);
            return Ok(());
        }

        let (row, col) = match self.grid.cell_index(sample.position) {
            Ok(cell) => cell,
            Err(err) => {
                if let Error::OutOfGridBounds { row, col, .. } = err {
                    error!(
                        "Sample ({}, {}) falls outside the grid at row {}, col {}; aborting.",
                        sample.position.x, sample.position.y, row, col
                    );
                    sink.send(RasterEvent::OutOfBounds {
                        position: sample.position,
                        row,
                        col,
                    });
                }
                return Err(err);
            }
        };

        let index = self.grid.index(row, col);
        self.hits[index] = self.hits[index].saturating_add(1);

        let mut overwrote = false;
        for (i, (layer, value)) in self.layers.iter_mut().zip(&sample.values).enumerate() {
            let Some(value) = *value else {
                continue;
            };
            if let Some(previous) = layer.accumulate(index, value) {
                overwrote = true;
                debug!(
                    "Overwriting {} value {} with {} at row {}, col {} (x = {}, y = {}).",
                    layer.name(),
                    previous,
                    value,
                    row,
                    col,
                    sample.position.x,
                    sample.position.y
                );
                sink.send(RasterEvent::ValueOverwritten {
                    layer: LayerId(i),
                    position: sample.position,
                    row,
                    col,
                    previous,
                    value,
                });
            }
        }

        if overwrote {
            self.overwritten += 1;
        }
        self.binned += 1;
        Ok(())
    }

    /// Parses and bins one text row. Unparseable rows are skipped and counted.
    pub fn bin_line(&mut self, line: &str, parser: &SampleParser) -> Result<()> {
        self.bin_line_with_events(line, parser, &mut ())
    }

    pub fn bin_line_with_events(
        &mut self,
        line: &str,
        parser: &SampleParser,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        match parser.parse(line) {
            Ok(sample) => self.bin_with_events(&sample, sink),
            Err(reason) => {
                self.skip(Some(line), reason, sink);
                Ok(())
            }
        }
    }

    /// Bins every sample, stopping at the first out-of-grid sample.
    pub fn bin_all<'a, I>(&mut self, samples: I) -> Result<BinSummary>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        for sample in samples {
            self.bin(sample)?;
        }
        Ok(self.summary())
    }

    fn check_sample(&self, sample: &Sample) -> std::result::Result<(), MalformedSample> {
        if sample.values.len() != self.layers.len() {
            return Err(MalformedSample::WrongArity {
                expected: self.layers.len(),
                found: sample.values.len(),
            });
        }
        if !sample.position.is_finite() {
            return Err(MalformedSample::NonFiniteCoordinate);
        }
        for (i, value) in sample.values.iter().enumerate() {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(MalformedSample::NonNumeric {
                    column: i + 2,
                    field: v.to_string(),
                });
            }
        }
        Ok(())
    }

    fn skip(&mut self, line: Option<&str>, reason: MalformedSample, sink: &mut dyn EventSink) {
        self.skipped += 1;
        match line {
            Some(line) => warn!("Skipping row '{}': {}.", line.trim_end(), reason),
            None => warn!("Skipping sample: {}.", reason),
        }
        sink.send(RasterEvent::SampleSkipped {
            line: line.map(|l| l.trim_end().to_owned()),
            reason,
        });
    }

    /// Counts so far.
    pub fn summary(&self) -> BinSummary {
        BinSummary {
            binned: self.binned,
            skipped: self.skipped,
            overwritten: self.overwritten,
            empty_cells: self.hits.iter().filter(|&&h| h == 0).count(),
        }
    }

    /// Logs and returns the final counts.
    pub fn finish(&self) -> BinSummary {
        self.finish_with_events(&mut ())
    }

    pub fn finish_with_events(&self, sink: &mut dyn EventSink) -> BinSummary {
        let summary = self.summary();
        info!(
            "{} samples binned, {} skipped, {} overwritten, {} of {} cells empty.",
            summary.binned,
            summary.skipped,
            summary.overwritten,
            summary.empty_cells,
            self.grid.len()
        );
        sink.send(RasterEvent::BinningFinished { summary });
        summary
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    pub fn layer_id(&self, name: &str) -> Option<LayerId> {
        self.layers.iter().position(|l| l.name() == name).map(LayerId)
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layer_id(name).and_then(|id| self.layer(id))
    }

    /// Number of binned samples per cell, row-major.
    pub fn count_grid(&self) -> &[u32] {
        &self.hits
    }

    /// Final values of one layer with the nodata sentinel preserved.
    pub fn scalar_grid(&self, id: LayerId) -> Option<ScalarGrid> {
        let layer = self.layer(id)?;
        Some(ScalarGrid {
            grid: self.grid,
            nodata: self.nodata,
            values: layer.values(),
        })
    }

    /// Colour-shaded layer over its own observed value range.
    ///
    /// `None` for an unknown layer. A layer without data yields an all-`None` grid.
    pub fn color_grid(&self, id: LayerId) -> Option<ColorGrid> {
        let (cmin, cmax) = self.layer(id)?.value_range().unwrap_or((0.0, 0.0));
        self.color_grid_with_range(id, cmin, cmax)
    }

    /// Colour-shaded layer over a caller-chosen range.
    pub fn color_grid_with_range(&self, id: LayerId, cmin: f64, cmax: f64) -> Option<ColorGrid> {
        let layer = self.layer(id)?;
        let cells = (0..self.grid.len())
            .map(|i| {
                layer
                    .value_at(i)
                    .map(|v| crate::raster::color::ramp_color(v, cmin, cmax))
            })
            .collect();
        Some(ColorGrid {
            grid: self.grid,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::raster::color::Rgb;
    use crate::raster::events::VecSink;
    use crate::raster::sample::Separator;

    fn bbox(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> BoundingBox {
        BoundingBox::try_new(x_min, x_max, y_min, y_max).expect("valid bbox")
    }

    fn depth_product(spec: LayerSpec) -> RasterProduct {
        let config = RasterConfig::new(1.0).without_cap();
        RasterProduct::from_config(bbox(0.0, 3.0, 0.0, 2.0), &config, vec![spec]).unwrap()
    }

    #[test]
    fn mean_of_colliding_samples() {
        let config = RasterConfig::new(10.0);
        let mut product =
            RasterProduct::from_config(bbox(0.0, 1.0, 0.0, 1.0), &config, vec![LayerSpec::mean("depth")])
                .unwrap();
        product.bin(&Sample::from_xyz(0.0, 0.0, 10.0)).unwrap();
        product.bin(&Sample::from_xyz(0.0, 0.0, 20.0)).unwrap();

        let (row, col) = product.grid().cell_index(DVec2::ZERO).unwrap();
        let index = product.grid().index(row, col);
        let layer = product.layer(LayerId(0)).unwrap();
        assert_eq!(layer.value_at(index), Some(15.0));
        assert_eq!(layer.count_at(index), 2);
        assert_eq!(product.count_grid()[index], 2);
        assert_eq!(product.summary().overwritten, 0);
    }

    #[test]
    fn untouched_cells_report_sentinel() {
        let mut product = depth_product(LayerSpec::mean("depth"));
        product.bin(&Sample::from_xyz(0.0, 0.0, 0.0)).unwrap();
        let scalar = product.scalar_grid(LayerId(0)).unwrap();
        assert_eq!(scalar.get(2, 0), Some(0.0));
        assert_eq!(scalar.get(0, 0), Some(-32767.0));
        assert!(scalar.is_nodata(1, 3));
        assert_eq!(
            scalar.values.iter().filter(|&&v| v == -32767.0).count(),
            product.grid().len() - 1
        );
        assert_eq!(product.summary().empty_cells, product.grid().len() - 1);
    }

    #[test]
    fn overwrite_counts_each_collision_once() {
        let mut product = depth_product(LayerSpec::overwrite("depth"));
        let mut sink = VecSink::new();
        product
            .bin_with_events(&Sample::from_xyz(1.0, 1.0, -4.0), &mut sink)
            .unwrap();
        product
            .bin_with_events(&Sample::from_xyz(1.2, 0.9, -6.0), &mut sink)
            .unwrap();

        let summary = product.summary();
        assert_eq!(summary.overwritten, 1);
        assert_eq!(summary.binned, 2);
        assert_eq!(product.layer(LayerId(0)).unwrap().overwritten(), 1);

        let scalar = product.scalar_grid(LayerId(0)).unwrap();
        assert_eq!(scalar.get(1, 1), Some(-6.0));

        let events = sink.into_inner();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            RasterEvent::ValueOverwritten {
                layer: LayerId(0),
                row: 1,
                col: 1,
                previous,
                value,
                ..
            } if previous == -4.0 && value == -6.0
        ));
    }

    #[test]
    fn multi_layer_overwrite_counts_sample_once() {
        let config = RasterConfig::new(1.0);
        let mut product = RasterProduct::from_config(
            bbox(0.0, 2.0, 0.0, 2.0),
            &config,
            vec![
                LayerSpec::overwrite("depth_min"),
                LayerSpec::overwrite("depth_max"),
                LayerSpec::mean("depth_average"),
            ],
        )
        .unwrap();
        let a = Sample::new(DVec2::new(1.0, 1.0), vec![Some(-3.0), Some(-1.0), Some(-2.0)]);
        let b = Sample::new(DVec2::new(1.0, 1.0), vec![Some(-5.0), None, Some(-4.0)]);
        product.bin(&a).unwrap();
        product.bin(&b).unwrap();

        assert_eq!(product.summary().overwritten, 1);
        let min = product.scalar_grid(LayerId(0)).unwrap();
        let max = product.scalar_grid(product.layer_id("depth_max").unwrap()).unwrap();
        let avg = product.scalar_grid(LayerId(2)).unwrap();
        assert_eq!(min.get(1, 1), Some(-5.0));
        assert_eq!(max.get(1, 1), Some(-1.0));
        assert_eq!(avg.get(1, 1), Some(-3.0));
        assert_eq!(product.layer_by_name("depth_max").unwrap().count_at(4), 1);
    }

    #[test]
    fn absent_attribute_skips_only_that_layer() {
        let config = RasterConfig::new(1.0);
        let mut product = RasterProduct::from_config(
            bbox(0.0, 1.0, 0.0, 1.0),
            &config,
            vec![LayerSpec::mean("depth"), LayerSpec::mean("stdev")],
        )
        .unwrap();
        product
            .bin(&Sample::new(DVec2::ZERO, vec![Some(-7.0), None]))
            .unwrap();
        let index = product.grid().index(1, 0);
        assert_eq!(product.layers()[0].value_at(index), Some(-7.0));
        assert_eq!(product.layers()[1].value_at(index), None);
        assert_eq!(product.summary().binned, 1);
    }

    #[test]
    fn out_of_grid_sample_is_fatal() {
        let mut product = depth_product(LayerSpec::mean("depth"));
        let mut sink = VecSink::new();
        let err = product
            .bin_with_events(&Sample::from_xyz(10.0, 0.0, 1.0), &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::OutOfGridBounds { col: 10, .. }));
        assert!(matches!(
            sink.as_slice()[0],
            RasterEvent::OutOfBounds { col: 10, .. }
        ));
        assert_eq!(product.summary().binned, 0);
        assert_eq!(product.summary().empty_cells, product.grid().len());
    }

    #[test]
    fn malformed_samples_are_skipped_and_counted() {
        let mut product = depth_product(LayerSpec::mean("depth"));
        let mut sink = VecSink::new();
        product
            .bin_with_events(&Sample::new(DVec2::ZERO, vec![]), &mut sink)
            .unwrap();
        product
            .bin_with_events(&Sample::new(DVec2::new(f64::NAN, 0.0), vec![Some(1.0)]), &mut sink)
            .unwrap();
        product
            .bin_with_events(&Sample::new(DVec2::ZERO, vec![Some(f64::INFINITY)]), &mut sink)
            .unwrap();
        product.bin(&Sample::from_xyz(0.0, 0.0, -1.0)).unwrap();

        let summary = product.summary();
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.binned, 1);
        assert_eq!(sink.len(), 3);
        assert!(sink
            .as_slice()
            .iter()
            .all(|e| matches!(e, RasterEvent::SampleSkipped { line: None, .. })));
    }

    #[test]
    fn bin_line_parses_and_counts_failures() {
        let mut product = depth_product(LayerSpec::mean("depth"));
        let parser = SampleParser::new(Separator::Char(';'), 1);
        let mut sink = VecSink::new();
        for line in ["0;0;-10", "oops;0;1", "1;1;-20\n", "2;2", "1;1;-30"] {
            product
                .bin_line_with_events(line, &parser, &mut sink)
                .unwrap();
        }
        let summary = product.finish_with_events(&mut sink);
        assert_eq!(summary.binned, 3);
        assert_eq!(summary.skipped, 2);

        let events = sink.into_inner();
        assert!(matches!(
            &events[0],
            RasterEvent::SampleSkipped { line: Some(l), .. } if l == "oops;0;1"
        ));
        assert!(matches!(
            events.last(),
            Some(RasterEvent::BinningFinished { summary: s }) if s.skipped == 2
        ));

        let scalar = product.scalar_grid(LayerId(0)).unwrap();
        assert_eq!(scalar.get(1, 1), Some(-25.0));
    }

    #[test]
    fn bin_all_returns_summary() {
        let mut product = depth_product(LayerSpec::mean("depth"));
        let samples = vec![
            Sample::from_xyz(0.0, 0.0, -1.0),
            Sample::from_xyz(3.0, 2.0, -2.0),
        ];
        let summary = product.bin_all(&samples).unwrap();
        assert_eq!(summary.binned, 2);
        assert_eq!(summary.empty_cells, product.grid().len() - 2);
    }

    #[test]
    fn color_grid_uses_observed_range() {
        let mut product = depth_product(LayerSpec::mean("depth"));
        product.bin(&Sample::from_xyz(0.0, 2.0, -40.0)).unwrap();
        product.bin(&Sample::from_xyz(3.0, 0.0, -10.0)).unwrap();
        let colors = product.color_grid(LayerId(0)).unwrap();
        assert_eq!(colors.get(0, 0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(colors.get(2, 3), Some(Rgb::new(255, 0, 0)));
        assert_eq!(colors.get(1, 1), None);

        let fixed = product.color_grid_with_range(LayerId(0), -40.0, -40.0).unwrap();
        assert_eq!(fixed.get(0, 0), Some(Rgb::WHITE));
        assert!(product.color_grid(LayerId(5)).is_none());
    }

    #[test]
    fn rejects_empty_layer_list() {
        let config = RasterConfig::default();
        assert!(matches!(
            RasterProduct::from_config(bbox(0.0, 1.0, 0.0, 1.0), &config, vec![]),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn from_config_applies_cap() {
        let config = RasterConfig::new(1.0).with_max_rows_cols(500);
        let product = RasterProduct::from_config(
            bbox(0.0, 1000.0, 0.0, 10.0),
            &config,
            vec![LayerSpec::mean("depth")],
        )
        .unwrap();
        assert_eq!(product.grid().cols, 500);
        assert_eq!(product.count_grid().len(), product.grid().len());
    }
}
