use std::io::{self, BufWriter, Write};

use tracing_subscriber::EnvFilter;

use xol::config::{EngineConfig, Scenario};
use xol::engine;
use xol::report;
use xol::types::Seed;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("XOL_LOG").unwrap_or_else(|_| EnvFilter::new("xol=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<String> = None;
    let mut seed_override: Option<u64> = None;
    let mut sims_override: Option<usize> = None;
    let mut inflation_override: Option<f64> = None;
    let mut json = false;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                seed_override = Some(args[i].parse().expect("--seed requires a u64"));
            }
            "--sims" => {
                i += 1;
                sims_override = Some(args[i].parse().expect("--sims requires a positive integer"));
            }
            "--inflation" => {
                i += 1;
                inflation_override = Some(args[i].parse().expect("--inflation requires a rate, e.g. 0.08"));
            }
            "--json" => json = true,
            "--quiet" => quiet = true,
            _ => {}
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => EngineConfig::from_json_file(&path).unwrap_or_else(|e| {
            eprintln!("error: {path}: {e}");
            std::process::exit(1);
        }),
        None => EngineConfig::canonical(),
    };
    if let Some(seed) = seed_override {
        config.seed = Seed(seed);
    }
    if let Some(n) = sims_override {
        config.n_sim = n;
    }
    // Rebuild the stressed scenario from the baseline at the requested rate.
    if let (Some(rate), Some(base)) = (inflation_override, config.scenarios.first().cloned()) {
        let stressed = Scenario {
            name: format!("Next Year with Inflation ({:+.1}%)", rate * 100.0),
            severity: base.severity.inflated(rate),
        };
        config.scenarios = vec![base, stressed];
    }

    let reports = engine::run_all(&config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if quiet {
        return;
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = if json {
        report::write_ndjson(&mut out, &reports)
    } else {
        reports.iter().try_for_each(|r| report::write_text(&mut out, r))
    };
    written.and_then(|_| out.flush()).expect("failed to write report");
}
