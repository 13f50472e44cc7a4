//! Trajectory store: the decoded samples of one pointer recording.
//!
//! A recording is CSV text with a header line followed by one
//! `timestamp,x,y,clicked` line per sample. Index order is capture order.

use serde::Serialize;

use crate::error::TrajectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub clicked: bool,
}

impl Point {
    pub fn new(x: i32, y: i32, clicked: bool) -> Self {
        Self { x, y, clicked }
    }
}

/// One data line split into its comma-separated fields, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// 1-based line number in the source text (the header is line 1).
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl<'a> RawRecord<'a> {
    pub fn split(line: usize, text: &'a str) -> Self {
        Self {
            line,
            fields: text.split(',').collect(),
        }
    }
}

/// `true` iff the trimmed field is exactly `"1"`.
pub fn parse_clicked(field: &str) -> bool {
    field.trim() == "1"
}

const MAX_FIELDS: usize = 4;

fn parse_coord(record: &RawRecord<'_>, i: usize, name: &str) -> Result<i32, TrajectoryError> {
    let Some(raw) = record.fields.get(i) else {
        return Err(TrajectoryError::malformed(record.line, format!("missing {name} field")));
    };
    raw.trim().parse::<i32>().map_err(|_| {
        TrajectoryError::malformed(record.line, format!("{name} is not an integer: {raw:?}"))
    })
}

/// Non-empty, immutable sequence of decoded samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: Vec<Point>,
    timestamps: Vec<String>,
}

impl Trajectory {
    /// Decodes data records (header already removed by the caller).
    pub fn load(records: &[RawRecord<'_>]) -> Result<Self, TrajectoryError> {
        if records.is_empty() {
            return Err(TrajectoryError::EmptyTrajectory);
        }

        let mut points = Vec::with_capacity(records.len());
        let mut timestamps = Vec::with_capacity(records.len());
        for record in records {
            if record.fields.len() > MAX_FIELDS {
                return Err(TrajectoryError::malformed(
                    record.line,
                    format!("expected at most {MAX_FIELDS} fields, found {}", record.fields.len()),
                ));
            }

            let x = parse_coord(record, 1, "x")?;
            let y = parse_coord(record, 2, "y")?;
            let clicked = record.fields.get(3).is_some_and(|f| parse_clicked(f));

            points.push(Point { x, y, clicked });
            timestamps.push(record.fields[0].trim().to_owned());
        }

        Ok(Self { points, timestamps })
    }

    /// Parses full CSV text: drops the header line, skips blank lines.
    pub fn parse_csv(text: &str) -> Result<Self, TrajectoryError> {
        let records: Vec<RawRecord<'_>> = text
            .split('\n')
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| RawRecord::split(i + 1, line.trim_end_matches('\r')))
            .collect();

        Self::load(&records)
    }

    /// Builds a trajectory without timestamps.
    pub fn from_points(points: Vec<Point>) -> Result<Self, TrajectoryError> {
        if points.is_empty() {
            return Err(TrajectoryError::EmptyTrajectory);
        }
        let timestamps = vec![String::new(); points.len()];
        Ok(Self { points, timestamps })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, i: usize) -> Option<&Point> {
        self.points.get(i)
    }

    pub fn timestamp(&self, i: usize) -> Option<&str> {
        self.timestamps.get(i).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true: a trajectory cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    /// Total distance travelled, summing unrounded segment lengths.
    pub fn path_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let dx = f64::from(w[1].x) - f64::from(w[0].x);
                let dy = f64::from(w[1].y) - f64::from(w[0].y);
                dx.hypot(dy)
            })
            .sum()
    }

    pub fn click_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.clicked)
            .map(|(i, _)| i)
            .collect()
    }

    /// Inclusive bounding box `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let first = self.points[0];
        self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(l, t, r, b), p| (l.min(p.x), t.min(p.y), r.max(p.x), b.max(p.y)),
        )
    }
}
