//! Observation encoder benchmarks
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration, Throughput,
};
use deepracer_gym::envs::ObservationEncoder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_scan(rng: &mut StdRng, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|_| {
            if rng.gen_bool(0.05) {
                f32::INFINITY
            } else {
                rng.gen_range(0.0..20.0)
            }
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);
    group.plot_config(plot_config);

    let encoder = ObservationEncoder::new(14.0);
    let mut rng = StdRng::seed_from_u64(0);
    for num_samples in [360, 720, 1440, 2880] {
        group.throughput(Throughput::Elements(num_samples as u64));
        let scan = random_scan(&mut rng, num_samples);
        group.bench_with_input(
            BenchmarkId::new("scan", num_samples),
            &scan,
            |b, scan| {
                b.iter(|| {
                    encoder.encode(
                        black_box((0.05, 0.0375)),
                        black_box(0.3),
                        (-0.4, 0.375),
                        scan,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
