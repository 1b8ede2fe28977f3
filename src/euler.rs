/// Fixed-step explicit Euler integration for small ODE systems.
///
/// All the models here were calibrated against forward Euler with a fixed
/// step, so a higher-order scheme would change the curves they were tuned
/// to produce. `f` is the right-hand side `dy/dt = f(y, t)`.

/// Trajectory of one integration. `y[i]` is the state vector at `t[i]`.
#[derive(Debug, Clone)]
pub struct EulerResult {
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
    pub steps: usize,
}

impl EulerResult {
    /// One state variable as its own series, for plotting.
    pub fn component(&self, i: usize) -> Vec<f64> {
        self.y.iter().map(|state| state[i]).collect()
    }

    pub fn y_final(&self) -> &[f64] {
        self.y.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append `other` to this trajectory, skipping `other`'s first sample
    /// (it duplicates our last one). Used to chain integration phases with
    /// different rate constants.
    pub fn extend(&mut self, other: EulerResult) {
        self.t.extend(other.t.into_iter().skip(1));
        self.y.extend(other.y.into_iter().skip(1));
        self.steps += other.steps;
    }
}

/// Advance `y` by one step of size `dt` at time `t`.
pub fn euler_step<F>(f: &F, y: &[f64], t: f64, dt: f64) -> Vec<f64>
where
    F: Fn(&[f64], f64) -> Vec<f64>,
{
    let dy = f(y, t);
    y.iter().zip(&dy).map(|(&yi, &di)| yi + di * dt).collect()
}

/// Integrate over `steps` fixed steps starting from `y0` at `t_start`.
pub fn euler_integrate<F>(f: F, y0: &[f64], t_start: f64, dt: f64, steps: usize) -> EulerResult
where
    F: Fn(&[f64], f64) -> Vec<f64>,
{
    let mut t_vec = Vec::with_capacity(steps + 1);
    let mut y_vec = Vec::with_capacity(steps + 1);

    let mut t = t_start;
    let mut y = y0.to_vec();
    t_vec.push(t);
    y_vec.push(y.clone());

    for _ in 0..steps {
        y = euler_step(&f, &y, t, dt);
        t += dt;
        t_vec.push(t);
        y_vec.push(y.clone());
    }

    EulerResult {
        t: t_vec,
        y: y_vec,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_decay_tracks_the_analytic_solution() {
        // dy/dt = -y, y(0) = 1. Euler with dt = 1e-4 stays within 1e-3 of
        // e^-t over one unit of time.
        let result = euler_integrate(|y, _t| vec![-y[0]], &[1.0], 0.0, 1e-4, 10_000);
        let expected = (-1.0f64).exp();
        assert!((result.y_final()[0] - expected).abs() < 1e-3);
        assert_eq!(result.t.len(), 10_001);
        assert!((result.t[result.t.len() - 1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn chained_phases_line_up() {
        let mut first = euler_integrate(|_, _| vec![1.0], &[0.0], 0.0, 0.1, 10);
        let second = euler_integrate(|_, _| vec![1.0], first.y_final(), 1.0, 0.1, 10);
        first.extend(second);
        assert_eq!(first.steps, 20);
        assert_eq!(first.t.len(), 21);
        assert!((first.y_final()[0] - 2.0).abs() < 1e-9);
        // No duplicated sample at the seam.
        assert!((first.t[10] - 1.0).abs() < 1e-9);
        assert!((first.t[11] - 1.1).abs() < 1e-9);
    }
}
