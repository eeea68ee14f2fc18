//! Benchmarks for the posterior sampling agent
//!
//! Run with: cargo bench

use bayes_pomdp::agent::ThompsonPomdpAgent;
use bayes_pomdp::config::AgentConfig;
use bayes_pomdp::model::{DirichletSampler, RewardEstimator, TransitionCounts};
use bayes_pomdp::planning::ValueIteration;
use bayes_pomdp::types::{ModelDims, ObservationModel};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Diagonal-heavy sensor so every observation stays possible
fn sensor(num_states: usize, num_observations: usize) -> ObservationModel {
    let matrix = Array2::from_shape_fn((num_states, num_observations), |(s, o)| {
        if s % num_observations == o { 0.7 } else { 0.3 / (num_observations - 1).max(1) as f64 }
    });
    ObservationModel::new(matrix).unwrap()
}

fn agent(num_states: usize, num_actions: usize, horizon: usize) -> ThompsonPomdpAgent {
    let config = AgentConfig::new(1.0, 0.0).with_horizon(horizon).with_discount(0.9);
    ThompsonPomdpAgent::new(num_states, num_actions, sensor(num_states, 3), config, StdRng::seed_from_u64(0)).unwrap()
}

/// Benchmark agent creation (includes the first plan)
fn bench_agent_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Agent Creation");

    for &num_states in [2usize, 8, 32].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_states), &num_states, |b, &s| {
            b.iter(|| black_box(agent(s, 4, 10)));
        });
    }

    group.finish();
}

/// Benchmark a single interaction step without replanning
fn bench_interact(c: &mut Criterion) {
    let mut group = c.benchmark_group("Interact");

    for &num_states in [2usize, 8, 32].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_states), &num_states, |b, &s| {
            let mut agent = agent(s, 4, usize::MAX);
            agent.interact(None, 0, false, 0).unwrap();
            let mut idx = 1;
            b.iter(|| {
                idx += 1;
                black_box(agent.interact(Some(1.0), idx % 3, false, idx).unwrap())
            });
        });
    }

    group.finish();
}

/// Benchmark sampling plus value iteration
fn bench_replan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Replan");

    for &num_states in [2usize, 8, 32].iter() {
        let dims = ModelDims::new(num_states, 4, 3).unwrap();
        let counts = TransitionCounts::new(dims);
        let rewards = RewardEstimator::new(dims, 1.0).unwrap();
        let sampler = DirichletSampler::new(1.0).unwrap();
        let planner = ValueIteration::new(0.9, 1e-2, 1_000_000).unwrap();

        group.bench_with_input(BenchmarkId::new("sample", num_states), &num_states, |b, _| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| black_box(sampler.sample(&counts, &mut rng).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("value_iteration", num_states), &num_states, |b, _| {
            let model = sampler.sample(&counts, &mut StdRng::seed_from_u64(2)).unwrap();
            b.iter(|| black_box(planner.solve(&model, rewards.estimates()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_agent_creation, bench_interact, bench_replan);
criterion_main!(benches);
