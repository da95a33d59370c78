//! Configuration for rasterization runs.
use glam::DVec2;

use crate::error::{Error, Result};
use crate::raster::grid::validate_cell_size;

/// Row/column limit applied by default to keep grids tractable.
pub const DEFAULT_MAX_ROWS_COLS: usize = 500;

/// Default "no data" sentinel written to cells that never received a sample.
pub const DEFAULT_NODATA: f64 = -32767.0;

/// Configuration for building a [`crate::raster::RasterProduct`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterConfig {
    /// Requested cell size `(gx, gy)` in coordinate units.
    pub cell_size: DVec2,
    /// Upper bound on rows and columns; the cell size is corrected when exceeded.
    pub max_rows_cols: Option<usize>,
    /// Sentinel reported for cells without samples.
    pub nodata: f64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            cell_size: DVec2::ONE,
            max_rows_cols: Some(DEFAULT_MAX_ROWS_COLS),
            nodata: DEFAULT_NODATA,
        }
    }
}

impl RasterConfig {
    /// Creates a new [`RasterConfig`] with a square cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: DVec2::splat(cell_size),
            ..Default::default()
        }
    }

    /// Sets a possibly non-square cell size.
    pub fn with_cell_size(mut self, cell_size: DVec2) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets a square cell size.
    pub fn with_square_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = DVec2::splat(cell_size);
        self
    }

    /// Sets the row/column limit.
    pub fn with_max_rows_cols(mut self, max_rows_cols: usize) -> Self {
        self.max_rows_cols = Some(max_rows_cols);
        self
    }

    /// Disables the row/column limit.
    pub fn without_cap(mut self) -> Self {
        self.max_rows_cols = None;
        self
    }

    /// Sets the nodata sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        validate_cell_size(self.cell_size)?;
        if matches!(self.max_rows_cols, Some(cap) if cap < 2) {
            return Err(Error::InvalidConfig("max_rows_cols must be >= 2".into()));
        }
        if !self.nodata.is_finite() {
            return Err(Error::InvalidConfig("nodata must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_grid_export_limits() {
        let config = RasterConfig::default();
        assert_eq!(config.cell_size, DVec2::ONE);
        assert_eq!(config.max_rows_cols, Some(500));
        assert_eq!(config.nodata, -32767.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_set_fields() {
        let config = RasterConfig::new(0.25)
            .with_cell_size(DVec2::new(0.5, 0.25))
            .with_max_rows_cols(1000)
            .with_nodata(-9999.0);
        assert_eq!(config.cell_size, DVec2::new(0.5, 0.25));
        assert_eq!(config.max_rows_cols, Some(1000));
        assert_eq!(config.nodata, -9999.0);
        assert_eq!(config.clone().without_cap().max_rows_cols, None);
        assert_eq!(
            config.with_square_cell_size(2.0).cell_size,
            DVec2::splat(2.0)
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(RasterConfig::new(0.0).validate().is_err());
        assert!(RasterConfig::new(f64::INFINITY).validate().is_err());
        assert!(RasterConfig::new(1.0)
            .with_max_rows_cols(1)
            .validate()
            .is_err());
        assert!(RasterConfig::new(1.0)
            .with_nodata(f64::NAN)
            .validate()
            .is_err());
    }
}
