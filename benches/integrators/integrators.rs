use criterion::{criterion_group, criterion_main, Criterion};
use sirsim::integrator::{AdaptiveSolver, ForwardEuler, Integrator};
use sirsim::scenario::Scenario;

pub fn criterion_benchmark(c: &mut Criterion) {
    // 750 days of the built-in COVID-19 scenario.
    let scenario = Scenario::default();

    c.bench_function("forward euler", |bencher| {
        bencher.iter_with_large_drop(|| ForwardEuler.integrate(&scenario).unwrap())
    });
    c.bench_function("adaptive solver", |bencher| {
        bencher.iter_with_large_drop(|| AdaptiveSolver::default().integrate(&scenario).unwrap())
    });
}

criterion_group!(integrator_benches, criterion_benchmark);
criterion_main!(integrator_benches);
