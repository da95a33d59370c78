//! Scatter-to-grid rasterization of point samples into multi-layer products.
pub mod color;
pub mod config;
pub mod events;
pub mod extent;
pub mod grid;
pub mod layer;
pub mod product;
pub mod sample;
pub mod views;

pub use color::{ramp_color, ramp_unit, Rgb};
pub use config::{RasterConfig, DEFAULT_MAX_ROWS_COLS, DEFAULT_NODATA};
pub use events::{EventSink, FnSink, MultiSink, RasterEvent, VecSink};
pub use extent::Extent;
pub use grid::{compute_grid, GeoTransform, Grid};
pub use layer::{Aggregation, Layer, LayerId, LayerSpec};
pub use product::{BinSummary, RasterProduct};
pub use sample::{decimate, decimation_step, Sample, SampleParser, Separator};
pub use views::{ColorGrid, ScalarGrid};
