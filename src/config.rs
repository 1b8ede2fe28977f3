/// Surface-level tunables shared by the CLI and the viewer server. The
/// per-model rate constants live with their models (`HivParams`,
/// `FflParams`, `PhaseParams`) and are not process-wide defaults.
#[derive(Clone, Debug)]
pub struct Params {
    // Game of Life
    pub board_size: usize,
    pub begin_alive: usize,
    pub turns: usize,

    // Motif analysis
    pub motif_genes: usize,
    pub motif_density: f32,
    pub motif_inhibitory_fraction: f32,
    pub motif_randomizations: usize,

    // Rendering
    pub cell_scale: usize,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            board_size: 100,
            begin_alive: 2500,
            turns: 10_000,
            motif_genes: 40,
            motif_density: 0.08,
            motif_inhibitory_fraction: 0.3,
            motif_randomizations: 1000,
            cell_scale: 4,
            plot_width: 900,
            plot_height: 540,
        }
    }
}
