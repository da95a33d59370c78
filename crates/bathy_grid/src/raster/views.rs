//! Read-only products derived from a binned [`crate::raster::RasterProduct`].
//!
//! Both views are dense, row-major, and carry the [`Grid`] so an external writer can embed
//! the geotransform.
use crate::raster::color::{ramp_color, Rgb};
use crate::raster::grid::Grid;

/// Final per-cell values of one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarGrid {
    pub grid: Grid,
    pub nodata: f64,
    pub values: Vec<f64>,
}

impl ScalarGrid {
    /// Value at `(row, col)`; the sentinel for empty cells. `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.grid.rows || col >= self.grid.cols {
            return None;
        }
        self.values.get(self.grid.index(row, col)).copied()
    }

    pub fn is_nodata(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(self.nodata)
    }

    /// Minimum and maximum over cells that are not the sentinel.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|&v| v != self.nodata)
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Rows as slices, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.grid.cols)
    }

    /// Shades each populated cell with the colour ramp over `[cmin, cmax]`.
    pub fn to_color_grid(&self, cmin: f64, cmax: f64) -> ColorGrid {
        let cells = self
            .values
            .iter()
            .map(|&v| (v != self.nodata).then(|| ramp_color(v, cmin, cmax)))
            .collect();
        ColorGrid {
            grid: self.grid,
            cells,
        }
    }
}

/// Per-cell colours; `None` marks cells without data.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGrid {
    pub grid: Grid,
    pub cells: Vec<Option<Rgb>>,
}

impl ColorGrid {
    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        if row >= self.grid.rows || col >= self.grid.cols {
            return None;
        }
        self.cells[self.grid.index(row, col)]
    }

    /// Pixel-interleaved RGB bytes, top row first.
    pub fn to_rgb_bytes(&self, nodata_color: Rgb) -> Vec<u8> {
        self.cells
            .iter()
            .flat_map(|c| c.unwrap_or(nodata_color).to_array())
            .collect()
    }

    /// One byte plane per channel, for 3-band rasters.
    pub fn to_band_planes(&self, nodata_color: Rgb) -> [Vec<u8>; 3] {
        let mut planes = [
            Vec::with_capacity(self.cells.len()),
            Vec::with_capacity(self.cells.len()),
            Vec::with_capacity(self.cells.len()),
        ];
        for c in &self.cells {
            let [r, g, b] = c.unwrap_or(nodata_color).to_array();
            planes[0].push(r);
            planes[1].push(g);
            planes[2].push(b);
        }
        planes
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::geometry::BoundingBox;
    use crate::raster::grid::compute_grid;

    fn scalar() -> ScalarGrid {
        let grid = compute_grid(
            BoundingBox::try_new(0.0, 1.0, 0.0, 1.0).unwrap(),
            DVec2::ONE,
            None,
        )
        .unwrap();
        ScalarGrid {
            grid,
            nodata: -32767.0,
            values: vec![-10.0, -32767.0, 0.0, -5.0],
        }
    }

    #[test]
    fn scalar_grid_access() {
        let s = scalar();
        assert_eq!(s.get(0, 0), Some(-10.0));
        assert!(s.is_nodata(0, 1));
        assert_eq!(s.get(2, 0), None);
        assert_eq!(s.value_range(), Some((-10.0, 0.0)));
        let rows: Vec<_> = s.rows().collect();
        assert_eq!(rows, vec![&[-10.0, -32767.0][..], &[0.0, -5.0][..]]);
    }

    #[test]
    fn color_grid_marks_nodata() {
        let colors = scalar().to_color_grid(-10.0, 0.0);
        assert_eq!(colors.get(0, 0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(colors.get(0, 1), None);
        assert_eq!(colors.get(1, 0), Some(Rgb::new(255, 0, 0)));

        let bytes = colors.to_rgb_bytes(Rgb::BLACK);
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[0..6], &[0, 0, 255, 0, 0, 0]);

        let [r, g, b] = colors.to_band_planes(Rgb::WHITE);
        assert_eq!(r, vec![0, 255, 255, 255]);
        assert_eq!(g[1], 255);
        assert_eq!(b[0], 255);
    }
}
