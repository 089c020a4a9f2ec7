//! Benchmarks for the Life generation scan.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use life_engine::{Configuration, PatternKind, Simulation};

fn seeded(width: u32, height: u32, density: f64) -> Simulation {
    let dims = Configuration {
        board_width: width,
        board_height: height,
        number_of_live_cell: 0,
    }
    .dimensions();
    let config = Configuration {
        board_width: width,
        board_height: height,
        number_of_live_cell: (dims.capacity() as f64 * density) as u32,
    };

    let mut simulation = Simulation::new(Some(42));
    if let Err(e) = simulation.reset(&config) {
        panic!("invalid bench config: {e}");
    }
    simulation
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for (width, height) in [(400, 300), (800, 600), (1600, 1200)] {
        let mut simulation = seeded(width, height, 0.2);
        let dims = simulation.dimensions();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", dims.width, dims.height)),
            &dims,
            |b, _| {
                b.iter(|| {
                    black_box(simulation.step().len());
                });
            },
        );
    }

    group.finish();
}

fn bench_density(c: &mut Criterion) {
    let mut group = c.benchmark_group("density");

    for density in [0.02, 0.1, 0.3] {
        let mut simulation = seeded(800, 600, density);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.0}%", density * 100.0)),
            &density,
            |b, _| {
                b.iter(|| {
                    simulation.queue_pattern(PatternKind::Glider);
                    black_box(simulation.step().len());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_density);
criterion_main!(benches);
