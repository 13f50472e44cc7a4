use crate::canvas::Canvas;
use crate::config::Rgb;
use crate::desc::Segment;
use crate::trajectory::{Point, Trajectory};

pub fn points_from_xy(xy: &[(i32, i32)]) -> Vec<Point> {
    xy.iter().map(|&(x, y)| Point::new(x, y, false)).collect()
}

pub fn trajectory_from_xyc(xyc: &[(i32, i32, bool)]) -> Trajectory {
    let points = xyc.iter().map(|&(x, y, c)| Point::new(x, y, c)).collect();
    Trajectory::from_points(points).expect("test trajectory must be non-empty")
}

/// CSV text with a header and one line per point, timestamps counting up in ms.
pub fn csv_from_xyc(xyc: &[(i32, i32, bool)]) -> String {
    let mut out = String::from("timestamp,x,y,clicked\n");
    for (i, &(x, y, c)) in xyc.iter().enumerate() {
        out.push_str(&format!("2025-04-14 23:33:29.{i:03},{x},{y},{}\n", u8::from(c)));
    }
    out
}

pub fn stub_segment(start: usize, end: usize, forward: &[f64], backward: Option<f64>) -> Segment {
    Segment {
        start_index: start,
        end_index: end,
        forward_targets: forward.to_vec(),
        backward_target: backward,
        total_distance: None,
    }
}

/// `.` for background pixels, `#` for anything else.
pub fn canvas_to_ascii(canvas: &Canvas, background: Rgb) -> String {
    let mut out = String::new();
    for y in 0..canvas.h {
        for x in 0..canvas.w {
            let px = canvas.get(x as i64, y as i64);
            out.push(if px == Some(background) { '.' } else { '#' });
        }
        out.push('\n');
    }
    out
}
