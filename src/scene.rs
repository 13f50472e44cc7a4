//! Drawing instructions for one recording and its walk markers.
//!
//! A `Scene` says which points get drawn and with which mark; the canvas
//! rasterizer and the debug viewer both consume it.

use crate::trajectory::Trajectory;
use crate::walk::{Marker, MarkerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Start,
    Click,
    ForwardHit,
    BackwardHit,
}

impl From<MarkerKind> for MarkKind {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::ForwardHit => MarkKind::ForwardHit,
            MarkerKind::BackwardHit => MarkKind::BackwardHit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneMark {
    /// Index into the trajectory.
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub kind: MarkKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Polyline through every point in index order.
    pub path: Vec<(i32, i32)>,
    /// Marks in draw order: start, clicks, then walk hits.
    pub marks: Vec<SceneMark>,
}

pub fn build_scene(trajectory: &Trajectory, markers: &[Marker]) -> Scene {
    let points = trajectory.points();
    let path: Vec<(i32, i32)> = points.iter().map(|p| (p.x, p.y)).collect();

    let mark_at = |index: usize, kind: MarkKind| {
        trajectory.get(index).map(|p| SceneMark {
            index,
            x: p.x,
            y: p.y,
            kind,
        })
    };

    let mut marks = Vec::with_capacity(1 + markers.len());
    marks.extend(mark_at(0, MarkKind::Start));
    marks.extend(
        trajectory
            .click_indices()
            .into_iter()
            .filter_map(|i| mark_at(i, MarkKind::Click)),
    );
    marks.extend(markers.iter().filter_map(|m| mark_at(m.index, m.kind.into())));

    Scene { path, marks }
}

impl Scene {
    pub fn marks_of(&self, kind: MarkKind) -> impl Iterator<Item = &SceneMark> + '_ {
        self.marks.iter().filter(move |m| m.kind == kind)
    }

    /// Inclusive bounds `(min_x, min_y, max_x, max_y)` of the path.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let (&(x0, y0), rest) = self.path.split_first()?;
        Some(rest.iter().fold((x0, y0, x0, y0), |(l, t, r, b), &(x, y)| {
            (l.min(x), t.min(y), r.max(x), b.max(y))
        }))
    }

    /// Index of the path point closest to `(x, y)`.
    pub fn nearest_index(&self, x: f32, y: f32) -> Option<usize> {
        self.path
            .iter()
            .enumerate()
            .map(|(i, &(px, py))| {
                let dx = px as f32 - x;
                let dy = py as f32 - y;
                (i, dx * dx + dy * dy)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}
