//! Ring topology and domain decomposition.
//!
//! The global array of `global_n` elements is split into equal contiguous
//! blocks, one per rank. Neighbors are determined by rank arithmetic
//! modulo the ring size.

use crate::error::{Result, StencilError};

/// One process's position in the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    pub rank: usize,
    pub size: usize,
}

impl Ring {
    /// `rank` must be unique in `[0, size)`; `size >= 1`. Both come from
    /// the process-group bootstrap and are immutable for the run.
    pub fn new(rank: usize, size: usize) -> Self {
        debug_assert!(size >= 1);
        debug_assert!(rank < size);
        Ring { rank, size }
    }

    /// Rank of the left neighbor, wrapping at rank 0.
    pub fn left(&self) -> usize {
        (self.rank + self.size - 1) % self.size
    }

    /// Rank of the right neighbor, wrapping at the last rank.
    pub fn right(&self) -> usize {
        (self.rank + 1) % self.size
    }
}

/// Number of elements each rank owns.
///
/// Fails before any buffer is allocated or any message sent when the
/// global size does not divide evenly; uneven blocks would silently drop
/// the remainder elements otherwise.
pub fn local_len(global_n: usize, size: usize) -> Result<usize> {
    if global_n % size != 0 {
        return Err(StencilError::Configuration { global_n, size });
    }
    Ok(global_n / size)
}

/// Allocate this rank's partition, filled with `rank as f64` so results
/// are reproducible across runs with the same ring size.
pub fn init_partition(rank: usize, local_n: usize) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    values.try_reserve_exact(local_n)?;
    values.resize(local_n, rank as f64);
    Ok(values)
}

/// Allocate the halo scratch buffer, overwritten by every exchange.
pub fn alloc_halo(local_n: usize) -> Result<Vec<f64>> {
    let mut halo = Vec::new();
    halo.try_reserve_exact(local_n)?;
    halo.resize(local_n, 0.0);
    Ok(halo)
}
