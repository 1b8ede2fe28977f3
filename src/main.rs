use std::path::{Path, PathBuf};
use std::time::Instant;

use biosim::config::Params;
use biosim::render::{self, Series};
use biosim::rng::Rng;
use biosim::{Timing, ffl, hiv, motifs, phase};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let sim = args.get(1).map(String::as_str).unwrap_or("life");

    match sim {
        "life" => cmd_life(&args[2..]),
        "hiv" => cmd_hiv(&args[2..]),
        "ffl" => cmd_ffl(&args[2..]),
        "phase" => cmd_phase(&args[2..]),
        "motifs" => cmd_motifs(&args[2..]),
        other => {
            eprintln!("unknown simulation '{}'", other);
            eprintln!("usage: biosim <life|hiv|ffl|phase|motifs> [args...]");
            eprintln!("  life   [seed] [size] [alive] [turns] [out_dir]");
            eprintln!("  hiv    [out_dir]");
            eprintln!("  ffl    [out_dir]");
            eprintln!("  phase  [out_dir]");
            eprintln!("  motifs [seed] [genes] [randomizations] [out_dir]");
            std::process::exit(2);
        }
    }
}

fn out_dir(arg: Option<&String>) -> PathBuf {
    let dir = arg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));
    std::fs::create_dir_all(&dir).expect("failed to create output directory");
    dir
}

fn save(dir: &Path, name: &str, rgba: &[u8], w: usize, h: usize) {
    let path = dir.join(name);
    image::save_buffer(&path, rgba, w as u32, h as u32, image::ColorType::Rgba8)
        .expect("failed to save image");
    eprintln!("Saved {}", path.display());
}

fn print_timings(timings: &[Timing]) {
    eprintln!("\nTimings:");
    for t in timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }
}

fn cmd_life(args: &[String]) {
    let defaults = Params::default();
    let seed: u64 = args.first().and_then(|s| s.parse().ok()).unwrap_or(42);
    let size: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.board_size);
    let alive: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.begin_alive);
    let turns: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.turns);
    let dir = out_dir(args.get(4));

    eprintln!(
        "Game of Life: {}x{} board, {} alive, {} turn budget, seed={}",
        size, size, alive, turns, seed
    );

    let (outcome, timings) = match biosim::run_life(seed, size, alive, turns) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!(
        "Terminated {} after {} turns, {} cells alive",
        outcome.status.name(),
        outcome.turns_run,
        outcome.final_grid.sum()
    );

    let scale = defaults.cell_scale;
    let px = size * scale;
    save(&dir, "life_initial.png", &render::render_board(&outcome.initial, scale), px, px);
    save(&dir, "life_final.png", &render::render_board(&outcome.final_grid, scale), px, px);

    let turns_axis: Vec<f64> = (0..outcome.population.len()).map(|i| i as f64).collect();
    let population: Vec<f64> = outcome.population.iter().map(|&p| p as f64).collect();
    let plot = render::render_series(
        &turns_axis,
        &[Series {
            label: "alive cells",
            values: &population,
        }],
        None,
        defaults.plot_width,
        defaults.plot_height,
    );
    save(&dir, "life_population.png", &plot, defaults.plot_width, defaults.plot_height);

    print_timings(&timings);
}

fn cmd_hiv(args: &[String]) {
    let defaults = Params::default();
    let dir = out_dir(args.first());
    let p = hiv::HivParams::default();

    let mut timings = Vec::new();
    for (delayed, name) in [(false, "hiv_immediate.png"), (true, "hiv_delayed.png")] {
        let t = Instant::now();
        let run = hiv::simulate(&p, delayed);
        timings.push(Timing {
            name: if delayed { "hiv_delayed" } else { "hiv_immediate" },
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let uninfected = run.component(hiv::UNINFECTED);
        let infected = run.component(hiv::INFECTED);
        let latent = run.component(hiv::LATENT);
        let virion = run.component(hiv::VIRION);
        let marker = delayed.then(|| p.activation_delay_steps as f64 * p.dt);
        let plot = render::render_series(
            &run.t,
            &[
                Series { label: "virion", values: &virion },
                Series { label: "uninfected", values: &uninfected },
                Series { label: "latent", values: &latent },
                Series { label: "infected", values: &infected },
            ],
            marker,
            defaults.plot_width,
            defaults.plot_height,
        );
        save(&dir, name, &plot, defaults.plot_width, defaults.plot_height);
    }
    print_timings(&timings);
}

fn cmd_ffl(args: &[String]) {
    let defaults = Params::default();
    let dir = out_dir(args.first());
    let p = ffl::FflParams::default();
    let signal_end = p.signal_steps as f64 * p.dt;

    for variant in [
        ffl::Variant::OrGate,
        ffl::Variant::DynamicInput,
        ffl::Variant::AndGate,
        ffl::Variant::Incoherent,
    ] {
        let run = ffl::simulate(variant, &p);
        let plot = render::render_series(
            &run.t,
            &[
                Series { label: "x", values: &run.x },
                Series { label: "y", values: &run.y },
                Series { label: "z", values: &run.z },
            ],
            Some(signal_end),
            defaults.plot_width,
            defaults.plot_height,
        );
        let name = format!("ffl_{}.png", variant.name());
        save(&dir, &name, &plot, defaults.plot_width, defaults.plot_height);
    }
}

fn cmd_phase(args: &[String]) {
    let defaults = Params::default();
    let dir = out_dir(args.first());
    let p = phase::PhaseParams::default();
    let plane = phase::analyze(&p);
    let plot = render::render_phase(
        &plane,
        (p.x_min, p.x_max),
        (p.y_min, p.y_max),
        defaults.plot_width,
        defaults.plot_height,
    );
    save(&dir, "phase_plane.png", &plot, defaults.plot_width, defaults.plot_height);
}

fn cmd_motifs(args: &[String]) {
    let defaults = Params::default();
    let seed: u64 = args.first().and_then(|s| s.parse().ok()).unwrap_or(42);
    let genes: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.motif_genes);
    let randomizations: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.motif_randomizations);
    let dir = out_dir(args.get(3));

    let mut rng = Rng::new(seed);
    let matrix = motifs::AdjMatrix::random(
        genes,
        defaults.motif_density,
        defaults.motif_inhibitory_fraction,
        &mut rng,
    );

    eprintln!("Network: {} genes, seed={}", genes, seed);
    eprintln!("Transcription factors:    {}", matrix.transcription_factors());
    eprintln!("Activatory interactions:  {}", matrix.activatory());
    eprintln!("Inhibitory interactions:  {}", matrix.inhibitory());
    eprintln!("Non-regulated genes:      {}", matrix.non_regulated());
    eprintln!("Mutual interaction cells: {}", matrix.mutual_interactions());

    let t = Instant::now();
    let enrichment = motifs::motif_enrichment(&matrix, randomizations, &mut rng);
    let timings = [Timing {
        name: "null_model",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    }];

    eprintln!("Motifs in network:        {}", enrichment.observed);
    eprintln!(
        "Null model ({} shuffles): mean={:.2} std={:.2}",
        randomizations, enrichment.null_mean, enrichment.null_std
    );
    eprintln!("Z-score: {:.3}", enrichment.z_score);
    eprintln!("p-value: {:.4}", enrichment.p_value);

    let null: Vec<f64> = enrichment.null_counts.iter().map(|&c| c as f64).collect();
    let plot = render::render_histogram(
        &null,
        30,
        enrichment.observed as f64,
        defaults.plot_width,
        defaults.plot_height,
    );
    save(&dir, "motifs_null.png", &plot, defaults.plot_width, defaults.plot_height);

    let (cn, prob) = matrix.neighbour_rule_curve();
    let curve = render::render_series(
        &cn,
        &[Series {
            label: "interaction probability",
            values: &prob,
        }],
        None,
        defaults.plot_width,
        defaults.plot_height,
    );
    save(&dir, "motifs_neighbour_rule.png", &curve, defaults.plot_width, defaults.plot_height);

    print_timings(&timings);
}
