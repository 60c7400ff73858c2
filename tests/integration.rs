// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Integration tests for cufft-plan.
//!
//! These tests drive the public API against the host backend.

#![allow(clippy::cast_precision_loss)] // small test sizes convert exactly

use cufft_plan::{
    coord_x, coord_y, estimate_plan_buffers, init_logging, Complex32, Complex64, DeviceConfig,
    Direction, ErrorKind, FftError, FftStatus, HostBackend, HostStream, LaunchGrid, LogConfig,
    ManyLayout, NativeCall, Plan, PlanShape, Result, ThreadCoords, TransformType,
    ValidatableConfig, C2C, C2R, D2Z, Dim3, R2C, Z2D, Z2Z,
};

fn close32(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn close64(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Plan Lifecycle Tests
// ============================================================================

#[test]
fn test_size_8_r2c_scenario() -> Result<()> {
    init_logging(&LogConfig::testing());
    let backend = HostBackend::recording();
    let mut plan = Plan::<R2C, _>::new_1d(backend.clone(), 8)?;
    assert!(plan.is_valid());

    let fp = plan.footprint()?;
    assert_eq!((fp.input_elements, fp.output_elements), (8, 5));

    let mut signal: Vec<f32> = (0..8u8).map(f32::from).collect();
    let mut spectrum = vec![Complex32::ZERO; 5];
    plan.execute(&mut signal, &mut spectrum)?;
    assert!(close32(spectrum[0].re, 28.0));
    // X[4] of 0..8 is -4
    assert!(close32(spectrum[4].re, -4.0) && close32(spectrum[4].im, 0.0));

    let handle = plan.raw_handle();
    drop(plan);
    assert_eq!(
        backend.calls(),
        vec![
            NativeCall::Create { handle, ty: TransformType::R2C },
            NativeCall::Exec { handle, ty: TransformType::R2C, direction: None, stream: None },
            NativeCall::Destroy { handle },
        ]
    );
    Ok(())
}

#[test]
fn test_plan_moved_into_collection() -> Result<()> {
    let backend = HostBackend::new();
    let plans: Vec<Plan<Z2Z, HostBackend>> = (1..=4)
        .map(|n| Plan::new_1d(backend.clone(), n * 4))
        .collect::<Result<_>>()?;
    assert_eq!(backend.stats().live, 4);

    let mut plans = plans;
    let kept = plans.swap_remove(0);
    drop(plans);
    assert_eq!(backend.stats().destroyed, 3);
    assert!(backend.is_live(kept.raw_handle()));
    Ok(())
}

#[test]
fn test_shared_plan_across_threads() -> Result<()> {
    let backend = HostBackend::new();
    let shared = Plan::<C2C, _>::new_1d(backend.clone(), 16)?.into_shared();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let plan = shared.clone();
            std::thread::spawn(move || -> Result<()> {
                let mut input = vec![Complex32::new(i as f32, 0.0); 16];
                let mut output = vec![Complex32::ZERO; 16];
                plan.lock()
                    .execute_with_direction(&mut input, &mut output, Direction::Forward)?;
                assert!(close32(output[0].re, 16.0 * i as f32));
                Ok(())
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked")?;
    }

    assert_eq!(backend.stats().executions, 4);
    drop(shared);
    assert_eq!(backend.stats().destroyed, 1);
    Ok(())
}

#[test]
fn test_stream_binding_orders_on_latest() -> Result<()> {
    let backend = HostBackend::new();
    let mut plan = Plan::<D2Z, _>::new_2d(backend.clone(), 4, 4)?;
    for id in [3, 1, 4] {
        plan.set_stream(HostStream(id))?;
    }
    assert_eq!(backend.stream_of(plan.raw_handle()), Some(HostStream(4)));
    Ok(())
}

#[test]
fn test_execution_after_rebinding_stream() -> Result<()> {
    let backend = HostBackend::recording();
    let mut plan = Plan::<Z2Z, _>::new_1d(backend.clone(), 4)?;
    let mut input = vec![Complex64::new(1.0, 0.0), Complex64::ZERO, Complex64::ZERO, Complex64::ZERO];
    let mut output = vec![Complex64::ZERO; 4];

    plan.set_stream(HostStream(9))?;
    backend.clear_calls();
    plan.execute_with_direction(&mut input, &mut output, Direction::Forward)?;
    assert!(output.iter().all(|v| close64(v.re, 1.0) && close64(v.im, 0.0)));

    plan.set_stream(HostStream(2))?;
    plan.execute_with_direction(&mut input, &mut output, Direction::Inverse)?;
    let streams: Vec<_> = backend
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            NativeCall::Exec { stream, .. } => Some(stream),
            _ => None,
        })
        .collect();
    assert_eq!(streams, vec![Some(HostStream(9)), Some(HostStream(2))]);
    Ok(())
}

#[test]
fn test_long_running_backend_keeps_no_ledger() -> Result<()> {
    let backend = HostBackend::from_config(&DeviceConfig::new().with_crate_name("spectra"))?;
    let mut plan = Plan::<R2C, _>::new_1d(backend.clone(), 8)?;
    let mut signal = vec![1.0f32; 8];
    let mut spectrum = vec![Complex32::ZERO; 5];
    for _ in 0..500 {
        plan.execute(&mut signal, &mut spectrum)?;
    }
    assert!(backend.calls().is_empty());
    assert_eq!(backend.stats().executions, 500);
    Ok(())
}

// ============================================================================
// Transform Correctness Tests
// ============================================================================

#[test]
fn test_r2c_c2r_roundtrip_odd_length() -> Result<()> {
    let backend = HostBackend::new();
    let mut fwd = Plan::<R2C, _>::new_1d(backend.clone(), 5)?;
    let mut inv = Plan::<C2R, _>::new_1d(backend, 5)?;

    let mut signal = vec![0.25f32, -1.0, 3.5, 2.0, 0.0];
    let original = signal.clone();
    let mut spectrum = vec![Complex32::ZERO; 3];
    let mut restored = vec![0.0f32; 5];
    fwd.execute(&mut signal, &mut spectrum)?;
    inv.execute(&mut spectrum, &mut restored)?;

    for (r, s) in restored.iter().zip(&original) {
        assert!(close32(*r, s * 5.0), "{r} vs {}", s * 5.0);
    }
    Ok(())
}

#[test]
fn test_z2z_forward_inverse_3d() -> Result<()> {
    let backend = HostBackend::new();
    let mut plan = Plan::<Z2Z, _>::new_3d(backend, 2, 3, 4)?;

    let mut data: Vec<Complex64> = (0..24i32)
        .map(|i| Complex64::new(f64::from(i).sin(), f64::from(i).cos()))
        .collect();
    let original = data.clone();
    let mut spectrum = vec![Complex64::ZERO; 24];
    plan.execute_with_direction(&mut data, &mut spectrum, Direction::Forward)?;
    plan.execute_with_direction(&mut spectrum, &mut data, Direction::Inverse)?;

    for (r, s) in data.iter().zip(&original) {
        assert!(close64(r.re, s.re * 24.0) && close64(r.im, s.im * 24.0));
    }
    Ok(())
}

#[test]
fn test_d2z_matches_z2z_on_real_input() -> Result<()> {
    let backend = HostBackend::new();
    let mut real = Plan::<D2Z, _>::new_2d(backend.clone(), 3, 4)?;
    let mut cplx = Plan::<Z2Z, _>::new_2d(backend, 3, 4)?;

    let mut signal: Vec<f64> = (0..12i32).map(|i| f64::from(i * i % 7)).collect();
    let mut half = vec![Complex64::ZERO; 3 * 3];
    real.execute(&mut signal, &mut half)?;

    let mut full_in: Vec<Complex64> = signal.iter().map(|v| Complex64::new(*v, 0.0)).collect();
    let mut full = vec![Complex64::ZERO; 12];
    cplx.execute_with_direction(&mut full_in, &mut full, Direction::Forward)?;

    for row in 0..3 {
        for col in 0..3 {
            let (h, f) = (half[row * 3 + col], full[row * 4 + col]);
            assert!(close64(h.re, f.re) && close64(h.im, f.im));
        }
    }
    Ok(())
}

#[test]
fn test_z2d_reconstructs_hermitian_half() -> Result<()> {
    let backend = HostBackend::new();
    let mut plan = Plan::<Z2D, _>::new_1d(backend, 4)?;
    // spectrum of a unit impulse at 0 is flat
    let mut spectrum = vec![Complex64::new(1.0, 0.0); 3];
    let mut signal = vec![0.0; 4];
    plan.execute(&mut spectrum, &mut signal)?;
    assert!(close64(signal[0], 4.0));
    assert!(signal[1..].iter().all(|v| close64(*v, 0.0)));
    Ok(())
}

#[test]
fn test_padded_batched_r2c() -> Result<()> {
    let backend = HostBackend::new();
    // two length-4 rows stored with a padded row pitch of 6
    let layout = ManyLayout::new(vec![4])
        .with_input(vec![6], 1, 6)
        .with_output(vec![3], 1, 3)
        .with_batch(2);
    let mut plan = Plan::<R2C, _>::new_many(backend, layout)?;

    let fp = plan.footprint()?;
    assert_eq!((fp.input_elements, fp.output_elements), (10, 6));

    let mut input = vec![1.0f32, 1.0, 1.0, 1.0, 99.0, 99.0, 2.0, 0.0, 2.0, 0.0];
    let mut output = vec![Complex32::ZERO; 6];
    plan.execute(&mut input, &mut output)?;

    assert!(close32(output[0].re, 4.0));
    assert!(close32(output[1].norm(), 0.0));
    assert!(close32(output[3].re, 4.0));
    assert!(close32(output[5].re, 4.0));
    Ok(())
}

// ============================================================================
// Error Translation Tests
// ============================================================================

#[test]
fn test_non_positive_size_rejected() {
    let backend = HostBackend::new();
    let err = Plan::<C2C, _>::new_1d(backend.clone(), 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.status(), Some(FftStatus::InvalidSize));
    assert_eq!(backend.stats().created, 0);
}

#[test]
fn test_layout_near_i32_max_rejected() {
    let backend = HostBackend::new();
    let layout = ManyLayout::new(vec![2, 1, 1])
        .with_input(vec![2, i32::MAX, i32::MAX], i32::MAX, 1);
    let shape = PlanShape::Many(layout.clone());

    let err = Plan::<C2C, _>::new_many(backend.clone(), layout).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.status(), Some(FftStatus::InvalidSize));
    assert_eq!(backend.stats().created, 0);

    let err = estimate_plan_buffers(&shape, TransformType::C2C).unwrap_err();
    assert_eq!(err.status(), Some(FftStatus::InvalidSize));
}

#[test]
fn test_each_native_failure_maps_to_kind() {
    let cases = [
        (FftStatus::InvalidPlan, ErrorKind::InvalidArgument),
        (FftStatus::AllocFailed, ErrorKind::OutOfMemory),
        (FftStatus::InvalidValue, ErrorKind::InvalidArgument),
        (FftStatus::InternalError, ErrorKind::Runtime),
        (FftStatus::ExecFailed, ErrorKind::Runtime),
        (FftStatus::SetupFailed, ErrorKind::Runtime),
        (FftStatus::InvalidSize, ErrorKind::InvalidArgument),
        (FftStatus::Other(42), ErrorKind::Runtime),
    ];
    for (status, kind) in cases {
        let backend = HostBackend::new();
        backend.fail_next(status);
        let err = Plan::<R2C, _>::new_1d(backend.clone(), 8).unwrap_err();
        assert_eq!(err.kind(), kind, "{status}");
        assert_eq!(err.status(), Some(status));
        assert_eq!(backend.stats().destroyed, 0);
    }
}

#[test]
fn test_short_output_buffer() -> Result<()> {
    let backend = HostBackend::new();
    let mut plan = Plan::<D2Z, _>::new_1d(backend.clone(), 8)?;
    let mut input = vec![0.0; 8];
    let mut output = vec![Complex64::ZERO; 4];
    let err = plan.execute(&mut input, &mut output).unwrap_err();
    assert_eq!(err.status(), Some(FftStatus::InvalidValue));
    assert_eq!(backend.stats().executions, 0);
    Ok(())
}

#[test]
fn test_failed_destroy_is_not_fatal() -> Result<()> {
    let backend = HostBackend::new();
    let plan = Plan::<C2C, _>::new_1d(backend.clone(), 4)?;
    backend.fail_next(FftStatus::InternalError);
    drop(plan);
    assert_eq!(backend.stats().destroyed, 0);
    Ok(())
}

#[test]
fn test_error_display_names_status() {
    let err = FftError::out_of_memory(FftStatus::AllocFailed, "allocation failed");
    let text = err.to_string();
    assert!(text.contains("allocation failed"));
    assert_eq!(err.message(), "allocation failed");
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_device_config_from_env_respects_force_host() {
    std::env::set_var("CUFFT_PLAN_FORCE_HOST", "true");
    std::env::set_var("CUFFT_PLAN_CUDA_DEVICE", "2");

    let config = DeviceConfig::from_env();
    assert!(config.force_host);
    assert_eq!(config.cuda_device, 2);
    assert!(config.validate().is_ok());

    std::env::remove_var("CUFFT_PLAN_FORCE_HOST");
    std::env::remove_var("CUFFT_PLAN_CUDA_DEVICE");
}

#[test]
fn test_layout_validation() {
    assert!(ManyLayout::new(vec![4, 4]).validate().is_ok());
    assert!(ManyLayout::new(Vec::<i32>::new()).validate().is_err());
    assert!(ManyLayout::new(vec![2, 2, 2, 2]).validate().is_err());
    assert!(ManyLayout::new(vec![4]).with_input(vec![4, 4], 1, 4).validate().is_err());
}

#[test]
fn test_footprint_estimation() -> Result<()> {
    let fp = estimate_plan_buffers(&PlanShape::TwoD { nx: 4, ny: 8 }, TransformType::R2C)?;
    assert_eq!(fp.input_bytes, 32 * 4);
    assert_eq!(fp.output_bytes, 4 * 5 * 8);
    Ok(())
}

// ============================================================================
// Thread Coordinate Tests
// ============================================================================

#[test]
fn test_coords_cover_every_bin_once() {
    let (w, h) = (37u32, 5u32);
    let grid = LaunchGrid::cover(Dim3::xy(w, h), Dim3::xy(8, 2));
    let mut hits = vec![0u32; (w * h) as usize];
    grid.launch(|t: ThreadCoords| {
        let (x, y) = (coord_x(&t), coord_y(&t));
        if x < w && y < h {
            hits[(y * w + x) as usize] += 1;
        }
    });
    assert!(hits.iter().all(|&n| n == 1));
}

#[test]
fn test_kernel_normalizes_spectrum() -> Result<()> {
    let backend = HostBackend::new();
    let mut fwd = Plan::<C2C, _>::new_1d(backend.clone(), 6)?;
    let mut inv = Plan::<C2C, _>::new_1d(backend, 6)?;

    let mut signal: Vec<Complex32> = (0..6u8).map(|i| Complex32::new(f32::from(i), 1.0)).collect();
    let original = signal.clone();
    let mut spectrum = vec![Complex32::ZERO; 6];
    fwd.execute_with_direction(&mut signal, &mut spectrum, Direction::Forward)?;

    let n = spectrum.len() as u32;
    LaunchGrid::cover(Dim3::x(n), Dim3::x(4)).launch(|t| {
        let i = coord_x(&t);
        if i < n {
            let v = &mut spectrum[i as usize];
            *v = Complex32::new(v.re / n as f32, v.im / n as f32);
        }
    });

    let mut restored = vec![Complex32::ZERO; 6];
    inv.execute_with_direction(&mut spectrum, &mut restored, Direction::Inverse)?;
    for (r, s) in restored.iter().zip(&original) {
        assert!(close32(r.re, s.re) && close32(r.im, s.im));
    }
    Ok(())
}
