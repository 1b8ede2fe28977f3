use rayon::prelude::*;

use crate::grid::Grid;
use crate::phase::PhasePlane;

// Shared palette
const PLOT_BG: [u8; 4] = [250, 250, 248, 255];
const FRAME_LINE: [u8; 4] = [120, 120, 120, 255];
const AXIS_LINE: [u8; 4] = [40, 40, 40, 255];

const CELL_DEAD: [u8; 4] = [245, 245, 242, 255];
const CELL_ALIVE: [u8; 4] = [30, 34, 42, 255];

/// Color cycle for time series, picked apart from each other.
pub const SERIES_COLORS: [[u8; 4]; 6] = [
    [200, 60, 50, 255],   // red
    [50, 100, 200, 255],  // blue
    [50, 160, 80, 255],   // green
    [150, 70, 190, 255],  // violet
    [220, 150, 40, 255],  // orange
    [60, 170, 180, 255],  // teal
];

const QUIVER_ARROW: [u8; 4] = [90, 90, 90, 255];
const EQUILIBRIUM_DOT: [u8; 4] = [200, 40, 40, 255];
const HIST_BAR: [u8; 4] = [90, 120, 180, 255];
const HIST_MARKER: [u8; 4] = [200, 40, 40, 255];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

#[inline]
fn set_px(rgba: &mut [u8], w: usize, h: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= w || y as usize >= h {
        return;
    }
    let i = (y as usize * w + x as usize) * 4;
    rgba[i..i + 4].copy_from_slice(&color);
}

/// Straight segment in pixel space, stepped densely enough to leave no gaps.
fn draw_line(
    rgba: &mut [u8],
    w: usize,
    h: usize,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    color: [u8; 4],
) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        set_px(rgba, w, h, x.round() as i32, y.round() as i32, color);
    }
}

fn draw_dot(rgba: &mut [u8], w: usize, h: usize, x: f32, y: f32, radius: i32, color: [u8; 4]) {
    let (cx, cy) = (x.round() as i32, y.round() as i32);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                set_px(rgba, w, h, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Maps data coordinates into a margined pixel viewport (y up).
struct Frame {
    w: usize,
    h: usize,
    margin: f32,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn new(w: usize, h: usize, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        let (x_min, x_max) = if x_max > x_min {
            (x_min, x_max)
        } else {
            (x_min - 0.5, x_min + 0.5)
        };
        let (y_min, y_max) = if y_max > y_min {
            (y_min, y_max)
        } else {
            (y_min - 0.5, y_min + 0.5)
        };
        Self {
            w,
            h,
            margin: 20.0,
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn px(&self, x: f64, y: f64) -> (f32, f32) {
        let tx = ((x - self.x_min) / (self.x_max - self.x_min)) as f32;
        let ty = ((y - self.y_min) / (self.y_max - self.y_min)) as f32;
        let inner_w = self.w as f32 - 2.0 * self.margin;
        let inner_h = self.h as f32 - 2.0 * self.margin;
        (
            self.margin + tx * inner_w,
            self.h as f32 - self.margin - ty * inner_h,
        )
    }

    fn draw_axes(&self, rgba: &mut [u8]) {
        // Viewport border
        let (x0, y0) = (self.margin, self.margin);
        let (x1, y1) = (self.w as f32 - self.margin, self.h as f32 - self.margin);
        draw_line(rgba, self.w, self.h, x0, y0, x1, y0, FRAME_LINE);
        draw_line(rgba, self.w, self.h, x0, y1, x1, y1, FRAME_LINE);
        draw_line(rgba, self.w, self.h, x0, y0, x0, y1, FRAME_LINE);
        draw_line(rgba, self.w, self.h, x1, y0, x1, y1, FRAME_LINE);
        // Zero axes where they fall inside the viewport
        if self.y_min < 0.0 && self.y_max > 0.0 {
            let (_, y) = self.px(self.x_min, 0.0);
            draw_line(rgba, self.w, self.h, x0, y, x1, y, AXIS_LINE);
        }
        if self.x_min < 0.0 && self.x_max > 0.0 {
            let (x, _) = self.px(0.0, self.y_min);
            draw_line(rgba, self.w, self.h, x, y0, x, y1, AXIS_LINE);
        }
    }

    fn draw_polyline(&self, rgba: &mut [u8], points: &[[f64; 2]], color: [u8; 4]) {
        for pair in points.windows(2) {
            let (x0, y0) = self.px(pair[0][0], pair[0][1]);
            let (x1, y1) = self.px(pair[1][0], pair[1][1]);
            draw_line(rgba, self.w, self.h, x0, y0, x1, y1, color);
        }
    }
}

fn blank(w: usize, h: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; w * h * 4];
    for px in rgba.chunks_exact_mut(4) {
        px.copy_from_slice(&PLOT_BG);
    }
    rgba
}

/// Board snapshot, `scale` pixels per cell. Output is square,
/// `size * scale` on a side.
pub fn render_board(grid: &Grid, scale: usize) -> Vec<u8> {
    let size = grid.size();
    let w = size * scale;
    let cells = grid.cells();
    let mut rgba = vec![0u8; w * w * 4];

    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        let cell_row = y / scale;
        for x in 0..w {
            let alive = cells[cell_row * size + x / scale] == 1;
            let color = if alive { CELL_ALIVE } else { CELL_DEAD };
            row[x * 4..x * 4 + 4].copy_from_slice(&color);
        }
    });

    rgba
}

/// A named curve for `render_series`.
pub struct Series<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
}

/// Line plot of several series over a shared x axis. `marker_x` draws a
/// dashed vertical reference line (signal end, activation time and such).
pub fn render_series(
    x: &[f64],
    series: &[Series<'_>],
    marker_x: Option<f64>,
    w: usize,
    h: usize,
) -> Vec<u8> {
    let mut rgba = blank(w, h);
    if x.is_empty() || series.is_empty() {
        return rgba;
    }

    let x_min = x.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut y_min = 0.0f64;
    let mut y_max = f64::NEG_INFINITY;
    for s in series {
        for &v in s.values {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    // Headroom so peaks don't sit on the frame
    let pad = (y_max - y_min).abs().max(1e-9) * 0.05;
    let frame = Frame::new(w, h, x_min, x_max, y_min - pad, y_max + pad);
    frame.draw_axes(&mut rgba);

    if let Some(mx) = marker_x {
        if mx > x_min && mx < x_max {
            let (px, _) = frame.px(mx, y_min);
            let (top, bottom) = (frame.margin, h as f32 - frame.margin);
            let mut y = top;
            while y < bottom {
                draw_line(&mut rgba, w, h, px, y, px, (y + 4.0).min(bottom), AXIS_LINE);
                y += 8.0;
            }
        }
    }

    for (si, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[si % SERIES_COLORS.len()];
        for i in 1..s.values.len().min(x.len()) {
            let (x0, y0) = frame.px(x[i - 1], s.values[i - 1]);
            let (x1, y1) = frame.px(x[i], s.values[i]);
            draw_line(&mut rgba, w, h, x0, y0, x1, y1, color);
        }
        // Legend swatch: one short bar per series in the top-left corner.
        let ly = frame.margin + 8.0 + 12.0 * si as f32;
        let lx = frame.margin + 8.0;
        draw_line(&mut rgba, w, h, lx, ly, lx + 20.0, ly, color);
    }

    rgba
}

/// Vector field + nullclines + equilibria of a phase-plane analysis.
pub fn render_phase(
    plane: &PhasePlane,
    x_range: (f64, f64),
    y_range: (f64, f64),
    w: usize,
    h: usize,
) -> Vec<u8> {
    let mut rgba = blank(w, h);
    let frame = Frame::new(w, h, x_range.0, x_range.1, y_range.0, y_range.1);
    frame.draw_axes(&mut rgba);

    // Arrow scale: the longest arrow spans roughly the mesh spacing.
    let max_mag = plane
        .arrows
        .iter()
        .map(|a| (a.u * a.u + a.v * a.v).sqrt())
        .fold(0.0f64, f64::max)
        .max(1e-9);
    let spacing = (x_range.1 - x_range.0) / 24.0;
    let scale = 0.8 * spacing / max_mag;

    for a in &plane.arrows {
        let (x0, y0) = frame.px(a.x, a.y);
        let (x1, y1) = frame.px(a.x + a.u * scale, a.y + a.v * scale);
        draw_line(&mut rgba, w, h, x0, y0, x1, y1, QUIVER_ARROW);
        draw_dot(&mut rgba, w, h, x1, y1, 1, QUIVER_ARROW);
    }

    for branch in &plane.dx_nullcline {
        frame.draw_polyline(&mut rgba, branch, SERIES_COLORS[0]);
    }
    frame.draw_polyline(&mut rgba, &plane.dy_nullcline_pos, SERIES_COLORS[1]);
    frame.draw_polyline(&mut rgba, &plane.dy_nullcline_neg, SERIES_COLORS[3]);

    for &[x, y] in &plane.equilibria {
        let (px, py) = frame.px(x, y);
        draw_dot(&mut rgba, w, h, px, py, 4, EQUILIBRIUM_DOT);
    }

    rgba
}

/// Histogram of the motif null distribution with the observed count marked.
pub fn render_histogram(values: &[f64], bins: usize, observed: f64, w: usize, h: usize) -> Vec<u8> {
    let mut rgba = blank(w, h);
    if values.is_empty() || bins == 0 {
        return rgba;
    }

    let v_min = values.iter().cloned().fold(observed, f64::min);
    let v_max = values.iter().cloned().fold(observed, f64::max);
    let span = (v_max - v_min).max(1e-9);

    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = (((v - v_min) / span) * bins as f64) as usize;
        counts[bin.min(bins - 1)] += 1;
    }
    let peak = counts.iter().cloned().max().unwrap_or(1).max(1);

    let frame = Frame::new(w, h, v_min, v_max, 0.0, peak as f64);
    frame.draw_axes(&mut rgba);

    let inner_w = w as f32 - 2.0 * frame.margin;
    let bar_w = inner_w / bins as f32;
    let fill = lerp_color(HIST_BAR, PLOT_BG, 0.15);
    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x0 = frame.margin + bar_w * i as f32 + 1.0;
        let x1 = frame.margin + bar_w * (i + 1) as f32 - 1.0;
        let (_, y_top) = frame.px(v_min, count as f64);
        let y_base = h as f32 - frame.margin - 1.0;
        let mut x = x0;
        while x <= x1 {
            draw_line(&mut rgba, w, h, x, y_top, x, y_base, fill);
            x += 1.0;
        }
    }

    let (mx, _) = frame.px(observed, 0.0);
    draw_line(
        &mut rgba,
        w,
        h,
        mx,
        frame.margin,
        mx,
        h as f32 - frame.margin,
        HIST_MARKER,
    );

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase;

    #[test]
    fn board_render_has_expected_dimensions_and_colors() {
        let mut g = Grid::new(4).unwrap();
        g.set_value(0, 0, 1).unwrap();
        let rgba = render_board(&g, 3);
        assert_eq!(rgba.len(), 12 * 12 * 4);
        // Top-left pixel belongs to the alive cell.
        assert_eq!(&rgba[0..4], &CELL_ALIVE);
        // Bottom-right pixel belongs to a dead cell.
        let last = rgba.len() - 4;
        assert_eq!(&rgba[last..], &CELL_DEAD);
    }

    #[test]
    fn series_render_is_opaque_and_sized() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let values: Vec<f64> = x.iter().map(|v| (v * 0.3).sin()).collect();
        let rgba = render_series(
            &x,
            &[Series {
                label: "wave",
                values: &values,
            }],
            Some(25.0),
            200,
            120,
        );
        assert_eq!(rgba.len(), 200 * 120 * 4);
        assert!(rgba.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn phase_render_does_not_panic_on_defaults() {
        let p = phase::PhaseParams::default();
        let plane = phase::analyze(&p);
        let rgba = render_phase(&plane, (p.x_min, p.x_max), (p.y_min, p.y_max), 320, 240);
        assert_eq!(rgba.len(), 320 * 240 * 4);
    }

    #[test]
    fn histogram_marks_the_observed_value() {
        let values: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let rgba = render_histogram(&values, 10, 12.0, 200, 120);
        assert_eq!(rgba.len(), 200 * 120 * 4);
    }
}
