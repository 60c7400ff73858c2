// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Global thread coordinates for grid-launched kernels.
//!
//! A kernel addresses its position in a 1-, 2- or 3-D launch grid with
//! [`coord_x`], [`coord_y`] and [`coord_z`]:
//!
//! ```text
//! coord = block_idx * block_dim + thread_idx
//! ```
//!
//! The arithmetic is unsigned 32-bit and wraps like the device registers it
//! mirrors. [`LaunchGrid`] enumerates every thread of a launch so kernels can
//! be run on the host; the host backend executes its transforms this way.
//!
//! ```rust
//! use cufft_plan::coords::{coord_x, Dim3, LaunchGrid};
//!
//! let grid = LaunchGrid::cover(Dim3::x(10), Dim3::x(4));
//! let mut hits = vec![0; 10];
//! grid.launch(|t| {
//!     let i = coord_x(&t) as usize;
//!     if i < hits.len() {
//!         hits[i] += 1;
//!     }
//! });
//! assert!(hits.iter().all(|&h| h == 1));
//! ```

/// Three-component launch dimension or index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim3 {
    /// X component.
    pub x: u32,
    /// Y component.
    pub y: u32,
    /// Z component.
    pub z: u32,
}

impl Dim3 {
    /// Create a dimension.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// One-dimensional extent `(x, 1, 1)`.
    #[must_use]
    pub const fn x(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    /// Two-dimensional extent `(x, y, 1)`.
    #[must_use]
    pub const fn xy(x: u32, y: u32) -> Self {
        Self { x, y, z: 1 }
    }

    /// Total number of points.
    #[must_use]
    pub const fn volume(self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }
}

impl Default for Dim3 {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Position of one thread within a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadCoords {
    /// Index of the thread's block in the grid.
    pub block_idx: Dim3,
    /// Threads per block.
    pub block_dim: Dim3,
    /// Index of the thread within its block.
    pub thread_idx: Dim3,
}

/// Global index along x.
#[inline]
#[must_use]
pub fn coord_x(t: &ThreadCoords) -> u32 {
    t.block_idx
        .x
        .wrapping_mul(t.block_dim.x)
        .wrapping_add(t.thread_idx.x)
}

/// Global index along y.
#[inline]
#[must_use]
pub fn coord_y(t: &ThreadCoords) -> u32 {
    t.block_idx
        .y
        .wrapping_mul(t.block_dim.y)
        .wrapping_add(t.thread_idx.y)
}

/// Global index along z.
#[inline]
#[must_use]
pub fn coord_z(t: &ThreadCoords) -> u32 {
    t.block_idx
        .z
        .wrapping_mul(t.block_dim.z)
        .wrapping_add(t.thread_idx.z)
}

/// Grid and block dimensions of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchGrid {
    /// Blocks per grid.
    pub grid_dim: Dim3,
    /// Threads per block.
    pub block_dim: Dim3,
}

impl LaunchGrid {
    /// Launch with explicit grid and block dimensions.
    #[must_use]
    pub const fn new(grid_dim: Dim3, block_dim: Dim3) -> Self {
        Self {
            grid_dim,
            block_dim,
        }
    }

    /// Smallest grid of `block`-sized blocks covering `extent`.
    ///
    /// Zero block components are treated as one. The grid may overshoot the
    /// extent, so kernels bounds-check their coordinates.
    #[must_use]
    pub fn cover(extent: Dim3, block: Dim3) -> Self {
        let block = Dim3::new(block.x.max(1), block.y.max(1), block.z.max(1));
        let grid = Dim3::new(
            extent.x.div_ceil(block.x),
            extent.y.div_ceil(block.y),
            extent.z.div_ceil(block.z),
        );
        Self::new(grid, block)
    }

    /// Total threads launched.
    #[must_use]
    pub const fn thread_count(&self) -> u64 {
        self.grid_dim.volume() * self.block_dim.volume()
    }

    /// Every thread of the launch, blocks in x-fastest order.
    pub fn threads(&self) -> impl Iterator<Item = ThreadCoords> {
        let grid = self.grid_dim;
        let block_dim = self.block_dim;
        iter_dim3(grid).flat_map(move |block_idx| {
            iter_dim3(block_dim).map(move |thread_idx| ThreadCoords {
                block_idx,
                block_dim,
                thread_idx,
            })
        })
    }

    /// Run `kernel` once per thread, sequentially.
    pub fn launch<F: FnMut(ThreadCoords)>(&self, mut kernel: F) {
        for t in self.threads() {
            kernel(t);
        }
    }
}

fn iter_dim3(d: Dim3) -> impl Iterator<Item = Dim3> {
    (0..d.z).flat_map(move |z| (0..d.y).flat_map(move |y| (0..d.x).map(move |x| Dim3::new(x, y, z))))
}
