use crate::config::{RenderConfig, Rgb};
use crate::scene::{MarkKind, Scene};

/// RGBA8 raster.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride in bytes (w * 4)
    pub arr: Vec<u8>,
}

// Constructor
// -----------------------------------------------------------------------------
impl Canvas {
    pub fn new(w: usize, h: usize, background: Rgb) -> Self {
        let s = w * 4;
        let mut canvas = Self {
            w,
            h,
            s,
            arr: vec![0; s * h],
        };
        canvas.fill(background);
        canvas
    }

    pub fn fill(&mut self, rgb: Rgb) {
        for px in self.arr.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
}

// Pixel access (clipped)
// -----------------------------------------------------------------------------
impl Canvas {
    #[inline(always)]
    fn idx(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return None;
        }
        Some(y as usize * self.s + x as usize * 4)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Rgb> {
        let i = self.idx(x, y)?;
        Some([self.arr[i], self.arr[i + 1], self.arr[i + 2]])
    }

    #[inline]
    pub fn put(&mut self, x: i64, y: i64, rgb: Rgb) {
        if let Some(i) = self.idx(x, y) {
            self.arr[i..i + 3].copy_from_slice(&rgb);
            self.arr[i + 3] = 255;
        }
    }
}

// Primitives
// -----------------------------------------------------------------------------
impl Canvas {
    /// Disc of radius `r`. The scan is limited to the canvas, so any radius
    /// costs at most one pass over the pixels.
    pub fn fill_circle(&mut self, cx: i64, cy: i64, r: f32, rgb: Rgb) {
        if !(r >= 0.5) {
            self.put(cx, cy, rgb);
            return;
        }
        let ri = r.ceil() as i64;
        let r2 = f64::from(r) * f64::from(r);
        let y0 = cy.saturating_sub(ri).max(0);
        let y1 = cy.saturating_add(ri).min(self.h as i64 - 1);
        let x0 = cx.saturating_sub(ri).max(0);
        let x1 = cx.saturating_add(ri).min(self.w as i64 - 1);
        for y in y0..=y1 {
            let dy = (y - cy) as f64;
            for x in x0..=x1 {
                let dx = (x - cx) as f64;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, rgb);
                }
            }
        }
    }

    /// Bresenham line, inclusive of both ends. Widths above 1 stamp a disc at
    /// every step. The segment is first clipped to the canvas grown by the
    /// stamp radius.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, width: f32, rgb: Rgb) {
        let stamp_r = (width / 2.0).min((self.w + self.h) as f32);
        let pad = if width > 1.0 { stamp_r.ceil() as i64 + 1 } else { 1 };
        let Some(((x0, y0), (x1, y1))) = clip_segment(
            (x0, y0),
            (x1, y1),
            (-pad, -pad),
            (self.w as i64 - 1 + pad, self.h as i64 - 1 + pad),
        ) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            if width > 1.0 {
                self.fill_circle(x, y, stamp_r, rgb);
            } else {
                self.put(x, y, rgb);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn draw_polyline(&mut self, pts: &[(i64, i64)], width: f32, rgb: Rgb) {
        match pts {
            [] => {}
            [(x, y)] => self.put(*x, *y, rgb),
            _ => {
                for w in pts.windows(2) {
                    self.draw_line(w[0].0, w[0].1, w[1].0, w[1].1, width, rgb);
                }
            }
        }
    }
}

/// Liang-Barsky clip of `p0..p1` to the inclusive rectangle `min..=max`.
/// Segments already inside come back unchanged.
fn clip_segment(
    p0: (i64, i64),
    p1: (i64, i64),
    min: (i64, i64),
    max: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let inside = |(x, y): (i64, i64)| x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1;
    if inside(p0) && inside(p1) {
        return Some((p0, p1));
    }

    let (x0, y0) = (p0.0 as f64, p0.1 as f64);
    let dx = p1.0 as f64 - x0;
    let dy = p1.1 as f64 - y0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, x0 - min.0 as f64),
        (dx, max.0 as f64 - x0),
        (-dy, y0 - min.1 as f64),
        (dy, max.1 as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

// Scene rendering
// -----------------------------------------------------------------------------

/// Hard ceiling on either canvas side, whatever `max_dim` says.
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Maps recording coordinates onto the raster a scene is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Recording-space point drawn at pixel (0, 0).
    pub origin_x: i64,
    pub origin_y: i64,
    /// Raster size in pixels.
    pub w: usize,
    pub h: usize,
    /// Pixels per recording unit, below 1 only when the path had to shrink.
    pub scale: f64,
}

impl Frame {
    pub fn to_px(&self, x: i32, y: i32) -> (i64, i64) {
        let px = ((i64::from(x) - self.origin_x) as f64 * self.scale).floor();
        let py = ((i64::from(y) - self.origin_y) as f64 * self.scale).floor();
        (px as i64, py as i64)
    }

    /// Size of the framed region in recording units.
    pub fn extent(&self) -> (f64, f64) {
        (self.w as f64 / self.scale, self.h as f64 / self.scale)
    }
}

/// A fixed size draws in recording coordinates; otherwise the frame fits the
/// path bounds plus the margin. Neither side exceeds `max_dim`: a fixed size
/// is cropped, a fitted frame is scaled down.
pub fn scene_frame(scene: &Scene, style: &RenderConfig) -> Frame {
    let max_dim = i64::from(style.max_dim.clamp(1, MAX_CANVAS_DIM));

    if let (Some(w), Some(h)) = (style.width, style.height) {
        return Frame {
            origin_x: 0,
            origin_y: 0,
            w: i64::from(w).min(max_dim) as usize,
            h: i64::from(h).min(max_dim) as usize,
            scale: 1.0,
        };
    }

    let margin = i64::from(style.margin);
    let (l, t, r, b) = scene.bounds().unwrap_or((0, 0, 0, 0));
    let full_w = i64::from(r) - i64::from(l) + 1 + 2 * margin;
    let full_h = i64::from(b) - i64::from(t) + 1 + 2 * margin;

    let scale = if full_w > max_dim || full_h > max_dim {
        (max_dim as f64 / full_w as f64).min(max_dim as f64 / full_h as f64)
    } else {
        1.0
    };
    let fit = |full: i64| ((full as f64 * scale).ceil() as i64).clamp(1, max_dim) as usize;

    Frame {
        origin_x: i64::from(l) - margin,
        origin_y: i64::from(t) - margin,
        w: fit(full_w),
        h: fit(full_h),
        scale,
    }
}

pub fn mark_color(kind: MarkKind, style: &RenderConfig) -> Rgb {
    match kind {
        MarkKind::Start => style.start_color,
        MarkKind::Click => style.click_color,
        MarkKind::ForwardHit => style.forward_color,
        MarkKind::BackwardHit => style.backward_color,
    }
}

pub fn render_scene(scene: &Scene, style: &RenderConfig) -> Canvas {
    let frame = scene_frame(scene, style);
    let mut canvas = Canvas::new(frame.w, frame.h, style.background);

    let pts: Vec<(i64, i64)> = scene.path.iter().map(|&(x, y)| frame.to_px(x, y)).collect();
    canvas.draw_polyline(&pts, style.line_width, style.path_color);

    for mark in &scene.marks {
        let (x, y) = frame.to_px(mark.x, mark.y);
        canvas.fill_circle(x, y, style.marker_radius, mark_color(mark.kind, style));
    }

    canvas
}

// PNG I/O
// -----------------------------------------------------------------------------
#[cfg(feature = "png-io")]
impl Canvas {
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> image::ImageResult<()> {
        let img = image::RgbaImage::from_raw(self.w as u32, self.h as u32, self.arr.clone())
            .ok_or_else(|| {
                image::ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;

        img.save_with_format(path, image::ImageFormat::Png)
    }
}
