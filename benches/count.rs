use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rootcount::{CompositionTable, Diagram, count_root_distribution};

fn triangle() -> Diagram {
    Diagram::new(
        vec![16, 16, 16],
        vec![0, 0, 0],
        vec![(0, 1), (0, 1), (0, 1), (0, 1), (0, 2), (1, 2)],
        8,
    )
    .unwrap()
}

fn count_benchmark(c: &mut Criterion) {
    let d = triangle();
    let strata = d.stratify().unwrap();
    let edges = d.edge_numbers().unwrap();

    let mut group = c.benchmark_group("triangle_h0_3");
    for workers in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| count_root_distribution(&d, &strata, &edges, black_box(3), w).unwrap())
        });
    }
    group.finish();
}

fn composition_benchmark(c: &mut Criterion) {
    c.bench_function("compositions_r12_n20", |b| {
        b.iter(|| CompositionTable::new(12).count(black_box(110), black_box(20)))
    });
}

criterion_group!(benches, count_benchmark, composition_benchmark);
criterion_main!(benches);
