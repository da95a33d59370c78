#![forbid(unsafe_code)]
//! bathy_grid: Polyline simplification and scatter-to-grid rasterization for bathymetric data.
//!
//! Modules:
//! - geometry: polylines and bounding boxes
//! - simplify: Douglas-Peucker simplification with an explicit range stack
//! - raster: grid sizing, sample parsing, multi-layer binning, colour ramps, events
//! - units: metre/degree conversions for geographic grids
//!
//! The library logs through `tracing` and never installs a subscriber.
pub mod error;
pub mod geometry;
pub mod raster;
pub mod simplify;
pub mod units;

/// Convenient re-exports for common types. Import with `use bathy_grid::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, MalformedSample, Result};
    pub use crate::geometry::{BoundingBox, Polyline};
    pub use crate::raster::{
        compute_grid, decimate, decimation_step, ramp_color, ramp_unit, Aggregation, BinSummary,
        ColorGrid, EventSink, Extent, FnSink, GeoTransform, Grid, Layer, LayerId, LayerSpec,
        MultiSink, RasterConfig, RasterEvent, RasterProduct, Rgb, Sample, SampleParser,
        ScalarGrid, Separator, VecSink,
    };
    pub use crate::simplify::{simplify, simplify_many, simplify_points, Simplifier};
    pub use crate::units::{degrees_to_meters, distance_on_sphere, meters_to_degrees};
}
