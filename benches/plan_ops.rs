//! Benchmarks for cufft-plan plan lifecycle and host execution.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cufft_plan::{
    estimate_plan_buffers, Complex32, Complex64, DeviceConfig, Direction, HostBackend, LaunchGrid,
    Dim3, Plan, PlanShape, TransformType, C2C, R2C, Z2Z,
};
use std::hint::black_box;

/// Plan creation and destruction through the RAII wrapper.
fn bench_plan_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_lifecycle");
    let backend = HostBackend::new();

    group.bench_function("create_drop_1d", |b| {
        b.iter(|| {
            let plan = Plan::<R2C, _>::new_1d(backend.clone(), black_box(1024)).unwrap();
            black_box(plan.raw_handle())
        })
    });

    group.bench_function("create_drop_3d", |b| {
        b.iter(|| {
            let plan = Plan::<Z2Z, _>::new_3d(backend.clone(), 8, 8, black_box(8)).unwrap();
            black_box(plan.raw_handle())
        })
    });

    group.bench_function("take", |b| {
        let mut plan = Plan::<C2C, _>::new_1d(backend.clone(), 64).unwrap();
        b.iter(|| {
            let moved = plan.take();
            plan = moved;
        })
    });

    group.bench_function("config_from_env", |b| {
        b.iter(|| black_box(DeviceConfig::from_env()))
    });

    group.finish();
}

/// Host execution for common transform sizes.
fn bench_host_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("host_execute");
    let backend = HostBackend::new();

    for n in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("r2c", n), &n, |b, &n| {
            let mut plan = Plan::<R2C, _>::new_1d(backend.clone(), n).unwrap();
            let len = usize::try_from(n).unwrap();
            let mut input = vec![1.0f32; len];
            let mut output = vec![Complex32::ZERO; len / 2 + 1];
            b.iter(|| plan.execute(&mut input, &mut output).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("z2z", n), &n, |b, &n| {
            let mut plan = Plan::<Z2Z, _>::new_1d(backend.clone(), n).unwrap();
            let len = usize::try_from(n).unwrap();
            let mut input = vec![Complex64::new(1.0, -1.0); len];
            let mut output = vec![Complex64::ZERO; len];
            b.iter(|| {
                plan.execute_with_direction(&mut input, &mut output, Direction::Forward)
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Footprint estimation and grid coverage.
fn bench_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("helpers");

    group.bench_function("estimate_3d", |b| {
        let shape = PlanShape::ThreeD { nx: 64, ny: 64, nz: 64 };
        b.iter(|| estimate_plan_buffers(black_box(&shape), TransformType::R2C).unwrap())
    });

    group.bench_function("launch_grid_4096", |b| {
        let grid = LaunchGrid::cover(Dim3::x(4096), Dim3::x(256));
        b.iter(|| {
            let mut sum = 0u64;
            grid.launch(|t| sum += u64::from(cufft_plan::coord_x(&t)));
            black_box(sum)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_plan_lifecycle, bench_host_execute, bench_helpers);
criterion_main!(benches);
