//! Basic 2D geometry primitives shared by the simplifier and the rasterizer.
//!
//! Coordinates are [`DVec2`] throughout; geographic grids need double precision.
use glam::DVec2;
use mint::Point2;

use crate::error::{Error, Result};

/// An ordered, open sequence of at least two vertices.
///
/// No implicit closure: a closed ring repeats its first vertex at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    vertices: Vec<DVec2>,
}

impl Polyline {
    /// Creates a polyline, rejecting inputs with fewer than two vertices.
    pub fn try_new(vertices: Vec<DVec2>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(Error::InvalidGeometry(format!(
                "polyline needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Creates a polyline from any `mint` point source.
    pub fn from_mint<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        Self::try_new(points.into_iter().map(DVec2::from).collect())
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<DVec2> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn first(&self) -> DVec2 {
        self.vertices[0]
    }

    pub fn last(&self) -> DVec2 {
        self.vertices[self.vertices.len() - 1]
    }

    /// Whether the first and last vertex coincide.
    pub fn is_closed(&self) -> bool {
        self.first() == self.last()
    }
}

impl TryFrom<Vec<DVec2>> for Polyline {
    type Error = Error;

    fn try_from(value: Vec<DVec2>) -> Result<Self> {
        Self::try_new(value)
    }
}

/// Axis-aligned bounding box with `x_min <= x_max` and `y_min <= y_max`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting reversed or non-finite bounds.
    pub fn try_new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let bbox = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Degenerate box around a single point.
    pub fn from_point(p: DVec2) -> Self {
        Self {
            x_min: p.x,
            x_max: p.x,
            y_min: p.y,
            y_max: p.y,
        }
    }

    /// Smallest box containing all points, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut iter = points.into_iter();
        let mut bbox = Self::from_point(iter.next()?);
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: DVec2) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::InvalidGeometry(
                "bounding box must have finite bounds".into(),
            ));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(Error::InvalidGeometry(format!(
                "bounding box is reversed: x [{}, {}], y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        Ok(())
    }
}
