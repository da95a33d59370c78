//! Douglas-Peucker polyline simplification with an explicit range stack.
//!
//! Reduces an ordered vertex sequence to the subset that stays within a distance tolerance
//! of the original. Endpoints are always kept. Zero-length chords (duplicate vertices,
//! closed rings) fall back to plain point distances and never fail.
//!
//! ```
//! use bathy_grid::prelude::*;
//! use glam::DVec2;
//!
//! let line = Polyline::try_new(vec![
//!     DVec2::new(0.0, 0.0),
//!     DVec2::new(1.0, 0.0),
//!     DVec2::new(2.0, 0.0),
//!     DVec2::new(3.0, 0.0),
//! ])?;
//! let out = simplify(&line, 0.01)?;
//! assert_eq!(out.vertices(), &[DVec2::new(0.0, 0.0), DVec2::new(3.0, 0.0)]);
//! # Ok::<(), bathy_grid::error::Error>(())
//! ```
use glam::DVec2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Polyline;

/// Reusable simplifier.
///
/// Holds the (anchor, floater) stack and the keep-mask between calls, so simplifying
/// many rings in a row does not reallocate.
#[derive(Debug, Clone)]
pub struct Simplifier {
    tolerance: f64,
    stack: Vec<(usize, usize)>,
    keep: Vec<bool>,
}

impl Simplifier {
    /// Creates a simplifier for the given tolerance, in coordinate units.
    pub fn new(tolerance: f64) -> Result<Self> {
        Self::with_capacity(tolerance, 0)
    }

    /// Creates a simplifier with buffers pre-sized for polylines of `n` vertices.
    pub fn with_capacity(tolerance: f64, n: usize) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and >= 0, got {tolerance}"
            )));
        }
        Ok(Self {
            tolerance,
            stack: Vec::with_capacity(n),
            keep: Vec::with_capacity(n),
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the indices of the retained vertices in ascending order.
    pub fn simplify_indices(&mut self, points: &[DVec2]) -> Result<Vec<usize>> {
        let n = points.len();
        if n < 2 {
            return Err(Error::InvalidGeometry(format!(
                "polyline needs at least 2 vertices, got {n}"
            )));
        }

        self.keep.clear();
        self.keep.resize(n, false);
        self.stack.clear();
        self.stack.push((0, n - 1));

        while let Some((anchor, floater)) = self.stack.pop() {
            if floater <= anchor + 1 {
                self.keep[anchor] = true;
                self.keep[floater] = true;
                continue;
            }

            let a = points[anchor];
            let f = points[floater];
            let dir = chord_direction(a, f);

            let mut max_dist = 0.0;
            let mut farthest = anchor + 1;
            for (i, &p) in points.iter().enumerate().take(floater).skip(anchor + 1) {
                let d = distance_to_chord(p, a, f, dir);
                // Strict comparison: ties keep the lowest index.
                if d > max_dist {
                    max_dist = d;
                    farthest = i;
                }
            }

            if max_dist <= self.tolerance {
                self.keep[anchor] = true;
                self.keep[floater] = true;
            } else {
                self.stack.push((anchor, farthest));
                self.stack.push((farthest, floater));
            }
        }

        Ok(self
            .keep
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect())
    }

    /// Simplifies a raw vertex slice.
    pub fn simplify_points(&mut self, points: &[DVec2]) -> Result<Vec<DVec2>> {
        let kept = self.simplify_indices(points)?;
        debug!(
            "Simplified polyline from {} to {} vertices (tolerance {}).",
            points.len(),
            kept.len(),
            self.tolerance
        );
        Ok(kept.into_iter().map(|i| points[i]).collect())
    }

    /// Simplifies a polyline. The result always has at least its two endpoints.
    pub fn simplify(&mut self, polyline: &Polyline) -> Result<Polyline> {
        let vertices = self.simplify_points(polyline.vertices())?;
        Polyline::try_new(vertices)
    }
}

/// Simplifies `polyline` with a one-off [`Simplifier`].
pub fn simplify(polyline: &Polyline, tolerance: f64) -> Result<Polyline> {
    Simplifier::with_capacity(tolerance, polyline.len())?.simplify(polyline)
}

/// Simplifies a raw vertex slice with a one-off [`Simplifier`].
pub fn simplify_points(points: &[DVec2], tolerance: f64) -> Result<Vec<DVec2>> {
    Simplifier::with_capacity(tolerance, points.len())?.simplify_points(points)
}

/// Simplifies each polyline independently, e.g. the exterior and interior rings of a hull.
pub fn simplify_many(polylines: &[Polyline], tolerance: f64) -> Result<Vec<Polyline>> {
    let cap = polylines.iter().map(Polyline::len).max().unwrap_or(0);
    let mut simplifier = Simplifier::with_capacity(tolerance, cap)?;
    polylines.iter().map(|p| simplifier.simplify(p)).collect()
}

/// Unit vector from `anchor` to `floater`, or zero when they coincide.
fn chord_direction(anchor: DVec2, floater: DVec2) -> DVec2 {
    if anchor == floater {
        DVec2::ZERO
    } else {
        (floater - anchor).normalize_or_zero()
    }
}

/// Distance from `p` to the chord `anchor`..`floater` with unit direction `dir`.
///
/// Points projecting before the anchor or beyond the floater measure to that endpoint;
/// everything else uses the perpendicular distance to the chord line.
pub(crate) fn distance_to_chord(p: DVec2, anchor: DVec2, floater: DVec2, dir: DVec2) -> f64 {
    let from_anchor = p - anchor;
    if from_anchor.dot(dir) < 0.0 {
        return from_anchor.length();
    }

    let from_floater = p - floater;
    let proj = from_floater.dot(-dir);
    if proj < 0.0 {
        return from_floater.length();
    }

    // Rounding can push the radicand slightly below zero.
    (from_floater.length_squared() - proj * proj).max(0.0).sqrt()
}
