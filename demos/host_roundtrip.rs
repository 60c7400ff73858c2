//! Example: Host Round Trip
//!
//! Plans a real-to-complex and a complex-to-real transform, runs them on
//! the host backend, normalizes the result with a grid-launched kernel and
//! shows the native call ledger.
//!
//! Run with:
//!
//! ```bash
//! cargo run --example host_roundtrip
//! RUST_LOG=cufft_plan=debug cargo run --example host_roundtrip
//! ```

#![allow(clippy::cast_precision_loss)] // Example code - sizes are small

use cufft_plan::{
    coord_x, init_logging, Complex32, Dim3, HostBackend, LaunchGrid, LogConfig, Plan, Result, C2R,
    R2C,
};

const N: usize = 16;

fn main() -> Result<()> {
    init_logging(&LogConfig::development());
    println!("=== Host Round Trip Example ===\n");

    let backend = HostBackend::recording();
    let n = i32::try_from(N).unwrap_or(i32::MAX);
    let mut forward = Plan::<R2C, _>::new_1d(backend.clone(), n)?;
    let mut inverse = Plan::<C2R, _>::new_1d(backend.clone(), n)?;

    let fp = forward.footprint()?;
    println!("1. Buffers: {} reals in, {} bins out ({} bytes)\n", fp.input_elements, fp.output_elements, fp.total_bytes());

    let mut signal: Vec<f32> = (0..N).map(|i| (i as f32 * 0.7).sin()).collect();
    let original = signal.clone();
    let mut spectrum = vec![Complex32::ZERO; fp.output_elements];
    forward.execute(&mut signal, &mut spectrum)?;

    println!("2. Spectrum magnitudes:");
    for (k, bin) in spectrum.iter().enumerate() {
        println!("   X[{k:2}] = {:.4}", bin.norm());
    }

    let mut restored = vec![0.0f32; N];
    inverse.execute(&mut spectrum, &mut restored)?;

    // unnormalized: scale by 1/N, one thread per sample
    let len = u32::try_from(N).unwrap_or(u32::MAX);
    LaunchGrid::cover(Dim3::x(len), Dim3::x(8)).launch(|t| {
        let i = coord_x(&t) as usize;
        if i < N {
            restored[i] /= N as f32;
        }
    });

    let max_err = restored
        .iter()
        .zip(&original)
        .map(|(r, s)| (r - s).abs())
        .fold(0.0f32, f32::max);
    println!("\n3. Max round-trip error: {max_err:.2e}");

    drop(forward);
    drop(inverse);
    println!("\n4. Native calls:");
    for call in backend.calls() {
        println!("   {call:?}");
    }
    println!("\n   {:?}", backend.stats());

    println!("\n=== Example Complete ===");
    Ok(())
}
