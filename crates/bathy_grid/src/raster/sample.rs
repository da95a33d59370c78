//! Point samples and delimited-text row parsing.
//!
//! A [`Sample`] is a coordinate plus a fixed-arity tuple of optional attributes. Absent
//! attributes skip the matching layer for that sample; they are never treated as zero.
use glam::DVec2;
use mint::Point2;

use crate::error::MalformedSample;

/// A coordinate with one optional value per layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub position: DVec2,
    pub values: Vec<Option<f64>>,
}

impl Sample {
    pub fn new(position: DVec2, values: Vec<Option<f64>>) -> Self {
        Self { position, values }
    }

    /// Single-attribute sample, typically `(x, y, depth)`.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(DVec2::new(x, y), vec![Some(z)])
    }

    pub fn from_mint(position: Point2<f64>, values: Vec<Option<f64>>) -> Self {
        Self::new(DVec2::from(position), values)
    }

    /// Number of attributes carried by this sample.
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    /// Attribute `i`, or `None` when absent or out of range.
    pub fn value(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().flatten()
    }
}

/// Field separator for text rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    /// A single character such as `;` or `,`. Empty fields are allowed.
    Char(char),
    /// Any run of whitespace, as in plain `x y z` files.
    Whitespace,
}

/// Parses `x<sep>y<sep>attr...` rows into [`Sample`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleParser {
    pub separator: Separator,
    /// Number of attribute columns after x and y.
    pub arity: usize,
}

impl SampleParser {
    pub fn new(separator: Separator, arity: usize) -> Self {
        Self { separator, arity }
    }

    /// Whitespace-separated `x y z`.
    pub fn xyz() -> Self {
        Self::new(Separator::Whitespace, 1)
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Parses one row. Trailing line terminators are ignored.
    pub fn parse(&self, line: &str) -> Result<Sample, MalformedSample> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = match self.separator {
            Separator::Char(c) => line.split(c).map(str::trim).collect(),
            Separator::Whitespace => line.split_whitespace().collect(),
        };

        let expected = 2 + self.arity;
        if fields.len() != expected {
            return Err(MalformedSample::WrongArity {
                expected,
                found: fields.len(),
            });
        }

        let x = parse_coordinate(fields[0], 0)?;
        let y = parse_coordinate(fields[1], 1)?;

        let values = fields[2..]
            .iter()
            .enumerate()
            .map(|(i, field)| parse_attribute(field, i + 2))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Sample::new(DVec2::new(x, y), values))
    }
}

fn parse_coordinate(field: &str, column: usize) -> Result<f64, MalformedSample> {
    if field.is_empty() {
        return Err(MalformedSample::MissingCoordinate { column });
    }
    let v: f64 = field.parse().map_err(|_| MalformedSample::NonNumeric {
        column,
        field: field.to_owned(),
    })?;
    if !v.is_finite() {
        return Err(MalformedSample::NonFiniteCoordinate);
    }
    Ok(v)
}

fn parse_attribute(field: &str, column: usize) -> Result<Option<f64>, MalformedSample> {
    if field.is_empty() {
        return Ok(None);
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(MalformedSample::NonNumeric {
            column,
            field: field.to_owned(),
        }),
    }
}

/// Stride that thins `point_count` samples down to roughly `max_points`.
///
/// Returns 1 when no thinning is needed.
pub fn decimation_step(point_count: usize, max_points: usize) -> usize {
    if max_points == 0 || point_count <= max_points {
        return 1;
    }
    ((point_count as f64 / max_points as f64).round() as usize).max(1)
}

/// Keeps every `step`-th item, starting with the first.
pub fn decimate<I>(items: I, step: usize) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
{
    items.into_iter().step_by(step.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_xyz() {
        let sample = SampleParser::xyz().parse("2.5  -1.25\t-40.0\n").unwrap();
        assert_eq!(sample.position, DVec2::new(2.5, -1.25));
        assert_eq!(sample.values, vec![Some(-40.0)]);
    }

    #[test]
    fn empty_attribute_fields_are_absent() {
        let parser = SampleParser::new(Separator::Char(';'), 3);
        let sample = parser.parse("23;-24;-45.8;;").unwrap();
        assert_eq!(sample.position, DVec2::new(23.0, -24.0));
        assert_eq!(sample.values, vec![Some(-45.8), None, None]);
        assert_eq!(sample.value(0), Some(-45.8));
        assert_eq!(sample.value(1), None);
        assert_eq!(sample.value(9), None);
    }

    #[test]
    fn rejects_wrong_arity() {
        let parser = SampleParser::new(Separator::Char(';'), 2);
        assert_eq!(
            parser.parse("1;2;3"),
            Err(MalformedSample::WrongArity {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let parser = SampleParser::new(Separator::Char(','), 1);
        assert!(matches!(
            parser.parse("1,abc,3"),
            Err(MalformedSample::NonNumeric { column: 1, .. })
        ));
        assert!(matches!(
            parser.parse("1,2,deep"),
            Err(MalformedSample::NonNumeric { column: 2, .. })
        ));
        assert!(matches!(
            parser.parse("1,2,NaN"),
            Err(MalformedSample::NonNumeric { column: 2, .. })
        ));
    }

    #[test]
    fn rejects_missing_or_infinite_coordinates() {
        let parser = SampleParser::new(Separator::Char(';'), 1);
        assert_eq!(
            parser.parse(";2;3"),
            Err(MalformedSample::MissingCoordinate { column: 0 })
        );
        assert_eq!(
            parser.parse("inf;2;3"),
            Err(MalformedSample::NonFiniteCoordinate)
        );
    }

    #[test]
    fn decimation_step_rounds_ratio() {
        assert_eq!(decimation_step(100, 1000), 1);
        assert_eq!(decimation_step(1000, 1000), 1);
        assert_eq!(decimation_step(2500, 1000), 3);
        assert_eq!(decimation_step(1400, 1000), 1);
        assert_eq!(decimation_step(10, 0), 1);
    }

    #[test]
    fn decimate_keeps_every_step() {
        let kept: Vec<_> = decimate(0..10, 3).collect();
        assert_eq!(kept, vec![0, 3, 6, 9]);
        let all: Vec<_> = decimate(0..3, 0).collect();
        assert_eq!(all, vec![0, 1, 2]);
    }
}
