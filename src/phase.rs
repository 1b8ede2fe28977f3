/// Phase-plane analysis of the two-variable system
///
///   dx/dt = 3x - 2xy + y
///   dy/dt = x - y^2 + 2
///
/// Deliverables: a sampled vector field, the nullclines (the dx nullcline
/// has a pole at x = 1/2 and is emitted as two branches), and the
/// equilibrium points where both derivatives vanish.
#[derive(Clone, Debug)]
pub struct PhaseParams {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Vector-field mesh resolution.
    pub quiver_cols: usize,
    pub quiver_rows: usize,
    /// Samples per nullcline branch.
    pub curve_samples: usize,
}

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            x_min: -4.0,
            x_max: 4.0,
            y_min: -3.0,
            y_max: 3.0,
            quiver_cols: 25,
            quiver_rows: 12,
            curve_samples: 50,
        }
    }
}

pub fn dx(x: f64, y: f64) -> f64 {
    3.0 * x - 2.0 * x * y + y
}

pub fn dy(x: f64, y: f64) -> f64 {
    x - y * y + 2.0
}

/// y where dx/dt = 0, undefined at x = 1/2.
pub fn dx_nullcline(x: f64) -> f64 {
    (3.0 * x) / (2.0 * x - 1.0)
}

/// Positive branch of the dy/dt = 0 curve; NaN left of x = -2.
pub fn dy_nullcline(x: f64) -> f64 {
    (x + 2.0).sqrt()
}

/// An arrow of the sampled vector field: position and direction.
#[derive(Clone, Copy, Debug)]
pub struct Arrow {
    pub x: f64,
    pub y: f64,
    pub u: f64,
    pub v: f64,
}

#[derive(Clone, Debug)]
pub struct PhasePlane {
    pub arrows: Vec<Arrow>,
    /// dx nullcline, split at the pole: each branch is a polyline.
    pub dx_nullcline: Vec<Vec<[f64; 2]>>,
    pub dy_nullcline_pos: Vec<[f64; 2]>,
    pub dy_nullcline_neg: Vec<[f64; 2]>,
    pub equilibria: [[f64; 2]; 3],
}

pub const EQUILIBRIA: [[f64; 2]; 3] = [[2.0, 2.0], [-1.0, 1.0], [0.25, -1.5]];

fn sample_curve(
    x_min: f64,
    x_max: f64,
    samples: usize,
    f: impl Fn(f64) -> f64,
) -> Vec<[f64; 2]> {
    (0..samples)
        .map(|i| {
            let x = x_min + (x_max - x_min) * i as f64 / (samples - 1) as f64;
            [x, f(x)]
        })
        .filter(|p| p[1].is_finite())
        .collect()
}

pub fn analyze(p: &PhaseParams) -> PhasePlane {
    let mut arrows = Vec::with_capacity(p.quiver_cols * p.quiver_rows);
    for row in 0..p.quiver_rows {
        for col in 0..p.quiver_cols {
            let x = p.x_min + (p.x_max - p.x_min) * col as f64 / (p.quiver_cols - 1) as f64;
            let y = p.y_min + (p.y_max - p.y_min) * row as f64 / (p.quiver_rows - 1) as f64;
            arrows.push(Arrow {
                x,
                y,
                u: dx(x, y),
                v: dy(x, y),
            });
        }
    }

    // Stop each branch short of the pole so the curve stays on screen.
    let dx_branches = vec![
        sample_curve(p.x_min, 0.5 - 0.01, p.curve_samples, dx_nullcline),
        sample_curve(0.5 + 0.01, p.x_max, p.curve_samples, dx_nullcline),
    ];

    PhasePlane {
        arrows,
        dx_nullcline: dx_branches,
        dy_nullcline_pos: sample_curve(p.x_min.max(-2.0), p.x_max, p.curve_samples, dy_nullcline),
        dy_nullcline_neg: sample_curve(p.x_min.max(-2.0), p.x_max, p.curve_samples, |x| {
            -dy_nullcline(x)
        }),
        equilibria: EQUILIBRIA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equilibria_are_actual_fixed_points() {
        for [x, y] in EQUILIBRIA {
            assert!(dx(x, y).abs() < 1e-9, "dx({x}, {y}) = {}", dx(x, y));
            assert!(dy(x, y).abs() < 1e-9, "dy({x}, {y}) = {}", dy(x, y));
        }
    }

    #[test]
    fn nullclines_zero_their_derivative() {
        for x in [-3.0, -1.2, 0.0, 1.0, 2.5] {
            let y = dx_nullcline(x);
            assert!(dx(x, y).abs() < 1e-9);
        }
        for x in [-2.0, -1.0, 0.0, 2.0, 4.0] {
            assert!(dy(x, dy_nullcline(x)).abs() < 1e-9);
            assert!(dy(x, -dy_nullcline(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn analysis_covers_the_requested_mesh() {
        let p = PhaseParams::default();
        let plane = analyze(&p);
        assert_eq!(plane.arrows.len(), 25 * 12);
        assert_eq!(plane.dx_nullcline.len(), 2);
        assert!(plane.dx_nullcline.iter().all(|b| !b.is_empty()));
        // The sqrt branches only exist from x = -2 rightward.
        assert!(plane.dy_nullcline_pos.iter().all(|p| p[0] >= -2.0));
    }
}
