/// Feed-forward loop X -> Y -> Z with Hill-function kinetics, integrated by
/// explicit Euler. The input signal gates X; Y and Z respond through the
/// variant's gate. Time is in arbitrary units matched to the rate constants.
#[derive(Clone, Debug)]
pub struct FflParams {
    pub y_beta_max: f64,
    pub z_beta_max: f64,
    /// Activation threshold of Y by X.
    pub x_y_kd: f64,
    /// Activation threshold of Z by X.
    pub x_z_kd: f64,
    /// Activation threshold of Z by Y.
    pub y_z_kd: f64,
    pub y_alpha: f64,
    pub z_alpha: f64,
    pub x_alpha: f64,
    /// Steady-state X level while the signal is on.
    pub x_steady: f64,
    pub dt: f64,
    /// Samples in the run (first one is the initial state).
    pub samples: usize,
    /// Signal is on for steps 1..=signal_steps.
    pub signal_steps: usize,
}

impl Default for FflParams {
    fn default() -> Self {
        Self {
            y_beta_max: 10.0,
            z_beta_max: 10.0,
            x_y_kd: 0.8,
            x_z_kd: 0.7,
            y_z_kd: 0.8,
            y_alpha: 0.4,
            z_alpha: 0.6,
            x_alpha: 0.6,
            x_steady: 8.0,
            dt: 0.1,
            samples: 100,
            signal_steps: 20,
        }
    }
}

/// Gate wiring at the Z promoter (and, for `DynamicInput`, the X profile).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Coherent, OR-gate integration of X and Y at Z; X is a step function.
    OrGate,
    /// OR-gate with X following its own on/off exponential instead of a step.
    DynamicInput,
    /// Coherent, AND-gate (product of Hill terms) at Z.
    AndGate,
    /// Incoherent type 1: X activates Z, Y represses it.
    Incoherent,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::OrGate => "or_gate",
            Variant::DynamicInput => "dynamic_input",
            Variant::AndGate => "and_gate",
            Variant::Incoherent => "incoherent",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FflRun {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

fn hill(level: f64, kd: f64) -> f64 {
    level / (level + kd)
}

fn dy(p: &FflParams, x: f64, y: f64) -> f64 {
    p.y_beta_max * hill(x, p.x_y_kd) - y * p.y_alpha
}

fn dz(p: &FflParams, variant: Variant, x: f64, y: f64, z: f64) -> f64 {
    let production = match variant {
        Variant::OrGate | Variant::DynamicInput => {
            let drive = x / p.x_z_kd + y / p.y_z_kd;
            p.z_beta_max * (drive / (1.0 + drive))
        }
        Variant::AndGate => p.z_beta_max * hill(x, p.x_z_kd) * hill(y, p.y_z_kd),
        Variant::Incoherent => {
            p.z_beta_max * (hill(x, p.x_z_kd) - hill(x, p.x_z_kd) * hill(y, p.y_z_kd))
        }
    };
    production - z * p.z_alpha
}

/// Run one variant from a zero initial state.
pub fn simulate(variant: Variant, p: &FflParams) -> FflRun {
    let n = p.samples;
    let mut t = vec![0.0; n];
    let mut x = vec![0.0; n];
    let mut y = vec![0.0; n];
    let mut z = vec![0.0; n];

    if variant != Variant::DynamicInput {
        x.fill(p.x_steady);
    }

    for i in 1..n {
        t[i] = i as f64 * p.dt;
        let signal = i <= p.signal_steps;

        if variant == Variant::DynamicInput {
            // X tracks the signal with first-order on/off kinetics. The
            // clock restarts when the signal drops.
            x[i] = if signal {
                p.x_steady * (1.0 - (-p.x_alpha * t[i]).exp())
            } else {
                let since_off = (i - p.signal_steps) as f64 * p.dt;
                x[i - 1].min(p.x_steady * (-p.x_alpha * since_off).exp())
            };
        }

        // Downstream genes see X only while the signal is on.
        let x_input = if signal {
            match variant {
                Variant::DynamicInput => x[i - 1],
                _ => p.x_steady,
            }
        } else {
            0.0
        };

        y[i] = y[i - 1] + dy(p, x_input, y[i - 1]) * p.dt;
        z[i] = z[i - 1] + dz(p, variant, x_input, y[i - 1], z[i - 1]) * p.dt;
    }

    FflRun { t, x, y, z }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(series: &[f64]) -> f64 {
        series.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn coherent_variants_rise_then_decay() {
        let p = FflParams::default();
        for variant in [Variant::OrGate, Variant::AndGate] {
            let run = simulate(variant, &p);
            assert!(run.y[p.signal_steps] > 0.0);
            assert!(run.z[p.signal_steps] > 0.0);
            // After the signal drops, both relax toward zero.
            assert!(run.y[p.samples - 1] < peak(&run.y));
            assert!(run.z[p.samples - 1] < peak(&run.z));
        }
    }

    #[test]
    fn and_gate_delays_z_relative_to_or_gate() {
        let p = FflParams::default();
        let or_run = simulate(Variant::OrGate, &p);
        let and_run = simulate(Variant::AndGate, &p);
        // With Y still low at the first step, the AND gate produces less Z.
        assert!(and_run.z[2] < or_run.z[2]);
    }

    #[test]
    fn incoherent_variant_pulses() {
        let p = FflParams::default();
        let run = simulate(Variant::Incoherent, &p);
        let z_peak = peak(&run.z);
        let peak_idx = run.z.iter().position(|&v| v == z_peak).unwrap();
        // Z peaks while the signal is still on, then Y repression pulls it
        // down before the signal ends.
        assert!(peak_idx <= p.signal_steps);
        assert!(run.z[p.signal_steps] < z_peak);
    }

    #[test]
    fn dynamic_input_x_rises_and_falls() {
        let p = FflParams::default();
        let run = simulate(Variant::DynamicInput, &p);
        assert_eq!(run.x[0], 0.0);
        let x_at_signal_end = run.x[p.signal_steps];
        assert!(x_at_signal_end > 0.0);
        assert!(x_at_signal_end < p.x_steady);
        // Monotone decay after the signal ends.
        for i in p.signal_steps + 1..p.samples {
            assert!(run.x[i] <= run.x[i - 1] + 1e-12);
        }
    }
}
