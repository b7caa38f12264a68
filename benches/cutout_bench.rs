use clt_solver::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_cutout_sweep(c: &mut Criterion) {
    let laminate =
        Laminate::symmetric_from_angles(&Material::cfrp(), &[0.0, 45.0, -45.0, 90.0], 0.125)
            .unwrap();
    let solver = CutoutSolver::new(&laminate);

    let circle = CutoutCase::new(HoleShape::Circle { a: 2.0 }).with_membrane(100.0, 20.0, 5.0);
    c.bench_function("cutout_sweep_circle_721", |b| {
        b.iter(|| black_box(solver.solve(&circle).unwrap()))
    });

    let square = CutoutCase::new(HoleShape::Square { a: 2.0 }).with_membrane(100.0, 0.0, 0.0);
    c.bench_function("cutout_sweep_square_721", |b| {
        b.iter(|| black_box(solver.solve(&square).unwrap()))
    });
}

fn bench_laminate_build(c: &mut Criterion) {
    let mat = Material::cfrp();
    c.bench_function("laminate_build_16_plies", |b| {
        b.iter(|| {
            let lam = Laminate::symmetric_from_angles(
                &mat,
                &[0.0, 45.0, -45.0, 90.0, 0.0, 45.0, -45.0, 90.0],
                0.125,
            )
            .unwrap();
            black_box(lam)
        })
    });
}

criterion_group!(benches, bench_cutout_sweep, bench_laminate_build);
criterion_main!(benches);
