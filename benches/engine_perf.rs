use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use xol::config::EngineConfig;
use xol::engine::{self, TrialSimulator};
use xol::layer::XolLayer;
use xol::metrics::{LossDistribution, RiskMetrics};
use xol::severity::SeverityModel;
use xol::types::Retention;

fn canonical_severity(config: &EngineConfig) -> SeverityModel {
    SeverityModel::from_assumption(config.scenarios[0].severity).expect("canonical severity")
}

// ── Group 1: single_trial — portfolio size scaling ──────────────────────────

fn bench_single_trial(c: &mut Criterion) {
    let config = EngineConfig::canonical();
    let severity = canonical_severity(&config);
    let mut group = c.benchmark_group("single_trial");
    for &n_policies in &[50u64, 200, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n_policies));
        group.bench_with_input(BenchmarkId::from_parameter(n_policies), &n_policies, |b, &n| {
            let mut sim = TrialSimulator::new(n, config.claim_prob, &severity, XolLayer::new(Retention(25.0)))
                .expect("valid frequency");
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| sim.run_trial(&mut rng))
        });
    }
    group.finish();
}

// ── Group 2: scenario — end-to-end by simulation count ──────────────────────

fn bench_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario");
    group.sample_size(10);
    for &n_sim in &[1_000usize, 10_000, 100_000] {
        let mut config = EngineConfig::canonical();
        config.n_sim = n_sim;
        group.throughput(Throughput::Elements(n_sim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_sim), &config, |b, config| {
            b.iter(|| engine::run_scenario(config, &config.scenarios[0]))
        });
    }
    group.finish();
}

// ── Group 3: metrics — reduction in isolation ───────────────────────────────

fn bench_metrics(c: &mut Criterion) {
    let config = EngineConfig::canonical();
    let severity = canonical_severity(&config);
    let mut group = c.benchmark_group("metrics");
    for &n_sim in &[10_000usize, 100_000, 1_000_000] {
        let mut sized = config.clone();
        sized.n_sim = n_sim;
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let dist = engine::simulate_losses(&sized, &severity, Retention(25.0), &mut rng)
            .expect("valid config");
        group.throughput(Throughput::Elements(n_sim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_sim), &dist, |b, dist| {
            b.iter_batched(
                || dist.clone(),
                |d: LossDistribution| RiskMetrics::from_distribution(&d, 48.5),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_trial, bench_scenario, bench_metrics);
criterion_main!(benches);
