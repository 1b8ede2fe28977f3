use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use biosim::config::Params;
use biosim::render::{self, Series};
use biosim::rng::Rng;
use biosim::{ffl, hiv, motifs, phase};

#[derive(Deserialize)]
struct SimulateRequest {
    /// One of "life", "hiv", "ffl", "phase", "motifs".
    sim: Option<String>,
    seed: Option<u64>,
    // Game of Life
    size: Option<usize>,
    alive: Option<usize>,
    turns: Option<usize>,
    // Motif analysis
    genes: Option<usize>,
    randomizations: Option<usize>,
}

#[derive(Serialize)]
struct SimulateResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    /// Terminal status of the automaton, when the run has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    motif_stats: Option<MotifStats>,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

#[derive(Serialize)]
struct MotifStats {
    observed: usize,
    null_mean: f64,
    null_std: f64,
    z_score: f64,
    p_value: f64,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

fn plot_layer(name: &str, x: &[f64], series: &[Series<'_>], marker: Option<f64>, p: &Params) -> Layer {
    Layer {
        name: name.into(),
        data_url: encode_png(
            &render::render_series(x, series, marker, p.plot_width, p.plot_height),
            p.plot_width,
            p.plot_height,
        ),
    }
}

fn simulate_life(seed: u64, size: usize, alive: usize, turns: usize, p: &Params) -> Result<SimulateResponse, String> {
    let (outcome, timings) = biosim::run_life(seed, size, alive, turns).map_err(|e| e.to_string())?;

    let px = size * p.cell_scale;
    let turns_axis: Vec<f64> = (0..outcome.population.len()).map(|i| i as f64).collect();
    let population: Vec<f64> = outcome.population.iter().map(|&c| c as f64).collect();

    let layers = vec![
        Layer {
            name: "initial".into(),
            data_url: encode_png(&render::render_board(&outcome.initial, p.cell_scale), px, px),
        },
        Layer {
            name: "final".into(),
            data_url: encode_png(&render::render_board(&outcome.final_grid, p.cell_scale), px, px),
        },
        plot_layer(
            "population",
            &turns_axis,
            &[Series {
                label: "alive cells",
                values: &population,
            }],
            None,
            p,
        ),
    ];

    Ok(SimulateResponse {
        layers,
        timings: timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect(),
        status: Some(outcome.status.name().to_string()),
        motif_stats: None,
    })
}

fn simulate_hiv(p: &Params) -> SimulateResponse {
    let hp = hiv::HivParams::default();
    let mut layers = Vec::new();
    for (delayed, name) in [(false, "immediate"), (true, "delayed")] {
        let run = hiv::simulate(&hp, delayed);
        let uninfected = run.component(hiv::UNINFECTED);
        let infected = run.component(hiv::INFECTED);
        let latent = run.component(hiv::LATENT);
        let virion = run.component(hiv::VIRION);
        let marker = delayed.then(|| hp.activation_delay_steps as f64 * hp.dt);
        layers.push(plot_layer(
            name,
            &run.t,
            &[
                Series { label: "virion", values: &virion },
                Series { label: "uninfected", values: &uninfected },
                Series { label: "latent", values: &latent },
                Series { label: "infected", values: &infected },
            ],
            marker,
            p,
        ));
    }
    SimulateResponse {
        layers,
        timings: Vec::new(),
        status: None,
        motif_stats: None,
    }
}

fn simulate_ffl(p: &Params) -> SimulateResponse {
    let fp = ffl::FflParams::default();
    let signal_end = fp.signal_steps as f64 * fp.dt;
    let layers = [
        ffl::Variant::OrGate,
        ffl::Variant::DynamicInput,
        ffl::Variant::AndGate,
        ffl::Variant::Incoherent,
    ]
    .into_iter()
    .map(|variant| {
        let run = ffl::simulate(variant, &fp);
        plot_layer(
            variant.name(),
            &run.t,
            &[
                Series { label: "x", values: &run.x },
                Series { label: "y", values: &run.y },
                Series { label: "z", values: &run.z },
            ],
            Some(signal_end),
            p,
        )
    })
    .collect();
    SimulateResponse {
        layers,
        timings: Vec::new(),
        status: None,
        motif_stats: None,
    }
}

fn simulate_phase(p: &Params) -> SimulateResponse {
    let pp = phase::PhaseParams::default();
    let plane = phase::analyze(&pp);
    let rgba = render::render_phase(
        &plane,
        (pp.x_min, pp.x_max),
        (pp.y_min, pp.y_max),
        p.plot_width,
        p.plot_height,
    );
    SimulateResponse {
        layers: vec![Layer {
            name: "phase_plane".into(),
            data_url: encode_png(&rgba, p.plot_width, p.plot_height),
        }],
        timings: Vec::new(),
        status: None,
        motif_stats: None,
    }
}

fn simulate_motifs(seed: u64, genes: usize, randomizations: usize, p: &Params) -> SimulateResponse {
    let mut rng = Rng::new(seed);
    let matrix = motifs::AdjMatrix::random(
        genes,
        p.motif_density,
        p.motif_inhibitory_fraction,
        &mut rng,
    );
    let enrichment = motifs::motif_enrichment(&matrix, randomizations, &mut rng);

    let null: Vec<f64> = enrichment.null_counts.iter().map(|&c| c as f64).collect();
    let rgba = render::render_histogram(
        &null,
        30,
        enrichment.observed as f64,
        p.plot_width,
        p.plot_height,
    );

    let (cn, prob) = matrix.neighbour_rule_curve();
    let curve = plot_layer(
        "neighbour_rule",
        &cn,
        &[Series {
            label: "interaction probability",
            values: &prob,
        }],
        None,
        p,
    );

    SimulateResponse {
        layers: vec![
            Layer {
                name: "null_distribution".into(),
                data_url: encode_png(&rgba, p.plot_width, p.plot_height),
            },
            curve,
        ],
        timings: Vec::new(),
        status: None,
        motif_stats: Some(MotifStats {
            observed: enrichment.observed,
            null_mean: enrichment.null_mean,
            null_std: enrichment.null_std,
            z_score: enrichment.z_score,
            p_value: enrichment.p_value,
        }),
    }
}

async fn simulate_handler(
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, (StatusCode, String)> {
    let defaults = Params::default();
    let sim = req.sim.unwrap_or_else(|| "life".to_string());
    let seed = req.seed.unwrap_or(42);
    let size = req.size.unwrap_or(defaults.board_size);
    let alive = req.alive.unwrap_or(defaults.begin_alive);
    let turns = req.turns.unwrap_or(defaults.turns);
    let genes = req.genes.unwrap_or(defaults.motif_genes);
    let randomizations = req.randomizations.unwrap_or(defaults.motif_randomizations);

    let result = tokio::task::spawn_blocking(move || {
        let p = Params::default();
        match sim.as_str() {
            "life" => simulate_life(seed, size, alive, turns, &p),
            "hiv" => Ok(simulate_hiv(&p)),
            "ffl" => Ok(simulate_ffl(&p)),
            "phase" => Ok(simulate_phase(&p)),
            "motifs" => Ok(simulate_motifs(seed, genes, randomizations, &p)),
            other => Err(format!("unknown simulation '{}'", other)),
        }
    })
    .await
    .expect("simulation task panicked");

    match result {
        Ok(response) => Ok(Json(response)),
        Err(message) => Err((StatusCode::BAD_REQUEST, message)),
    }
}

#[tokio::main]
async fn main() {
    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/simulate", post(simulate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("biosim server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
