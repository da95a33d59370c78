//! Grid sizing and cell addressing.
//!
//! A [`Grid`] is fixed once from a bounding box and a (possibly corrected) cell size before
//! any sample is binned. Cells are addressed row-major with row 0 at the top (maximum y).
use glam::DVec2;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::raster::config::RasterConfig;

/// Immutable raster geometry: extent, cell size and row/column counts.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Extent of the binned samples. Cell centers sit on `x_min + col * gx` and
    /// `y_min + (rows - 1 - row) * gy`.
    pub bbox: BoundingBox,
    /// Cell size `(gx, gy)` in coordinate units.
    pub cell_size: DVec2,
    /// Number of rows, `round(height / gy) + 1`.
    pub rows: usize,
    /// Number of columns, `round(width / gx) + 1`.
    pub cols: usize,
}

/// GDAL-style affine transform, north-up.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    /// Negative for north-up rasters.
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Coefficients in GDAL order: `[origin_x, pixel_width, 0, origin_y, 0, pixel_height]`.
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            0.0,
            self.origin_y,
            0.0,
            self.pixel_height,
        ]
    }
}

/// Computes the grid for `bbox` at `requested_cell_size`.
///
/// When `max_rows_cols` is set and either dimension would exceed it, the cell size is
/// scaled up (keeping its aspect ratio) so that the axis with the larger overshoot ends up
/// with exactly `max_rows_cols` cells. A zero span on an axis yields a single row or column.
pub fn compute_grid(
    bbox: BoundingBox,
    requested_cell_size: DVec2,
    max_rows_cols: Option<usize>,
) -> Result<Grid> {
    bbox.validate()?;
    validate_cell_size(requested_cell_size)?;
    if let Some(cap) = max_rows_cols {
        if cap < 2 {
            return Err(Error::InvalidConfig(format!(
                "max_rows_cols must be >= 2, got {cap}"
            )));
        }
    }

    let mut cell_size = requested_cell_size;
    let (mut rows, mut cols) = dims(bbox, cell_size);

    if let Some(cap) = max_rows_cols {
        if rows > cap || cols > cap {
            let intervals = (cap - 1) as f64;
            let scale_x = if cols > cap {
                bbox.width() / intervals / cell_size.x
            } else {
                1.0
            };
            let scale_y = if rows > cap {
                bbox.height() / intervals / cell_size.y
            } else {
                1.0
            };
            cell_size *= scale_x.max(scale_y);
            let (r, c) = dims(bbox, cell_size);
            warn!(
                "Grid of {}x{} exceeds limit {}; cell size corrected from {:?} to {:?} ({}x{}).",
                rows, cols, cap, requested_cell_size, cell_size, r, c
            );
            rows = r;
            cols = c;
        }
    }

    info!("Grid {} rows x {} cols, cell size {:?}.", rows, cols, cell_size);

    Ok(Grid {
        bbox,
        cell_size,
        rows,
        cols,
    })
}

fn dims(bbox: BoundingBox, cell_size: DVec2) -> (usize, usize) {
    let rows = ((bbox.height() / cell_size.y).round() as usize).saturating_add(1);
    let cols = ((bbox.width() / cell_size.x).round() as usize).saturating_add(1);
    (rows, cols)
}

pub(crate) fn validate_cell_size(cell_size: DVec2) -> Result<()> {
    if !cell_size.is_finite() || cell_size.x <= 0.0 || cell_size.y <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "cell size must be finite and > 0 in both components, got {cell_size:?}"
        )));
    }
    Ok(())
}

impl Grid {
    /// Computes a grid from the cell size and row/column cap in `config`.
    pub fn from_config(bbox: BoundingBox, config: &RasterConfig) -> Result<Self> {
        compute_grid(bbox, config.cell_size, config.max_rows_cols)
    }

    /// Upper-left anchor `(x_min, y_max)`.
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.bbox.x_min, self.bbox.y_max)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always `false`: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major array index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Snaps a position to its `(row, col)` cell by rounding to the nearest cell center.
    ///
    /// Positions outside the grid are an error, never clamped.
    pub fn cell_index(&self, p: DVec2) -> Result<(usize, usize)> {
        let col = ((p.x - self.bbox.x_min) / self.cell_size.x).round();
        let row_from_bottom = ((p.y - self.bbox.y_min) / self.cell_size.y).round();
        let row = self.rows as f64 - row_from_bottom - 1.0;

        let inside =
            (0.0..self.cols as f64).contains(&col) && (0.0..self.rows as f64).contains(&row);
        if !inside {
            return Err(Error::OutOfGridBounds {
                x: p.x,
                y: p.y,
                row: row as i64,
                col: col as i64,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok((row as usize, col as usize))
    }

    /// World position of the center of `(row, col)`.
    pub fn cell_center(&self, row: usize, col: usize) -> DVec2 {
        DVec2::new(
            self.bbox.x_min + col as f64 * self.cell_size.x,
            self.bbox.y_min + (self.rows - 1 - row) as f64 * self.cell_size.y,
        )
    }

    /// Affine transform anchored at `(x_min, y_max)`, as written by the grid exporters.
    pub fn geo_transform(&self) -> GeoTransform {
        GeoTransform {
            origin_x: self.bbox.x_min,
            origin_y: self.bbox.y_max,
            pixel_width: self.cell_size.x,
            pixel_height: -self.cell_size.y,
        }
    }
}
