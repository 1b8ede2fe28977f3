use crate::euler::{EulerResult, euler_integrate};

/// Within-host HIV infection dynamics: uninfected CD4 cells, productively
/// infected cells, latently infected cells and free virion, coupled through
/// mass-action infection. Rates are per day.
#[derive(Clone, Debug)]
pub struct HivParams {
    /// Virions produced per infected cell per day.
    pub alpha: f64,
    /// Uninfected cell production (cells per day).
    pub production: f64,
    pub uninfected_death: f64,
    pub latent_death: f64,
    pub infected_death: f64,
    /// Mass-action infection rate of uninfected cells by virion.
    pub infection_rate: f64,
    /// Latent -> productively infected activation rate.
    pub activation_rate: f64,
    pub virion_clearance: f64,
    /// Fraction of new infections that go latent instead of productive.
    pub latent_fraction: f64,
    pub initial_uninfected: f64,
    pub initial_virion: f64,
    /// Days simulated.
    pub run_time: f64,
    /// Euler step, days.
    pub dt: f64,
    /// Steps the activation rate is held at zero in the delayed scenario.
    pub activation_delay_steps: usize,
}

impl Default for HivParams {
    fn default() -> Self {
        Self {
            alpha: 100.0,
            production: 0.272,
            uninfected_death: 0.00136,
            latent_death: 0.00136,
            infected_death: 0.33,
            infection_rate: 0.00027,
            activation_rate: 0.05,
            virion_clearance: 2.0,
            latent_fraction: 0.2,
            initial_uninfected: 500.0,
            initial_virion: 10.0,
            run_time: 2000.0,
            dt: 0.05,
            activation_delay_steps: 200,
        }
    }
}

// State vector layout.
pub const UNINFECTED: usize = 0;
pub const INFECTED: usize = 1;
pub const LATENT: usize = 2;
pub const VIRION: usize = 3;

fn derivatives(p: &HivParams, activation_rate: f64) -> impl Fn(&[f64], f64) -> Vec<f64> {
    let p = p.clone();
    move |y, _t| {
        let (u, i, l, v) = (y[UNINFECTED], y[INFECTED], y[LATENT], y[VIRION]);
        let new_infections = u * v * p.infection_rate;
        let du = p.production - new_infections - p.uninfected_death * u;
        // Infected cells are removed both by death and by bursting on
        // virion release, hence the extra -i term.
        let di = (1.0 - p.latent_fraction) * new_infections + activation_rate * l
            - p.infected_death * i
            - i;
        let dl = p.latent_fraction * new_infections - p.latent_death * l - activation_rate * l;
        let dv = p.alpha * i - p.virion_clearance * v;
        vec![du, di, dl, dv]
    }
}

/// Integrate the model. With `delayed_activation` the latent activation rate
/// is held at zero for the first `activation_delay_steps` steps, letting the
/// latent pool build up before reactivation kicks in.
pub fn simulate(p: &HivParams, delayed_activation: bool) -> EulerResult {
    let total_steps = (p.run_time / p.dt) as usize;
    let mut y0 = vec![0.0f64; 4];
    y0[UNINFECTED] = p.initial_uninfected;
    y0[VIRION] = p.initial_virion;

    if !delayed_activation {
        return euler_integrate(derivatives(p, p.activation_rate), &y0, 0.0, p.dt, total_steps);
    }

    let delay = p.activation_delay_steps.min(total_steps);
    let mut result = euler_integrate(derivatives(p, 0.0), &y0, 0.0, p.dt, delay);
    let tail = euler_integrate(
        derivatives(p, p.activation_rate),
        result.y_final(),
        result.t[result.t.len() - 1],
        p.dt,
        total_steps - delay,
    );
    result.extend(tail);
    result
}
