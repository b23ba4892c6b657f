//! The ring stencil engine: decomposition, the exchange/update loop,
//! and timing.
//!
//! Every rank runs the identical loop: exchange its whole partition with
//! its ring neighbors, then fold the received halo into the partition
//! with an averaging update. The loop is sequential within a rank; the
//! only blocking point is the exchange itself.

use crate::comm::RingComm;
use crate::error::Result;
use crate::partition;
use std::time::{Duration, Instant};

/// Total number of elements in the conceptual global array.
pub const GLOBAL_N: usize = 2000;

/// Number of exchange+update iterations.
pub const STEPS: usize = 100;

/// Problem size and step count, threaded into [`run`] by value so tests
/// can inject smaller problems.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub global_n: usize,
    pub steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_n: GLOBAL_N,
            steps: STEPS,
        }
    }
}

/// Result of a completed run on one rank.
#[derive(Debug)]
pub struct RunOutcome {
    /// Final contents of this rank's partition.
    pub partition: Vec<f64>,
    /// Wall-clock time spent in the iteration loop only, excluding
    /// initialization and teardown.
    pub elapsed: Duration,
}

/// Averaging stencil step: `partition[i] = 0.5 * (partition[i] + halo[i])`.
///
/// In-place, no side effects beyond the partition buffer.
pub fn update(partition: &mut [f64], halo: &[f64]) {
    debug_assert_eq!(partition.len(), halo.len());
    for (own, nbr) in partition.iter_mut().zip(halo) {
        *own = 0.5 * (*own + nbr);
    }
}

/// Run the fixed-iteration exchange/update loop on this rank.
///
/// Fails with a `Configuration` error before any allocation or
/// communication when the global size does not divide evenly across the
/// ring. Any exchange failure is fatal: a half-completed exchange leaves
/// neighbor data in an undefined state that cannot be repaired mid-run,
/// so no iteration is retried.
pub fn run(comm: &dyn RingComm, config: EngineConfig) -> Result<RunOutcome> {
    let rank = comm.rank();
    let size = comm.size();
    let local_n = partition::local_len(config.global_n, size)?;

    let _span = tracing::debug_span!("stencil_run", rank, size, local_n).entered();

    let mut data = partition::init_partition(rank, local_n)?;
    let mut halo = partition::alloc_halo(local_n)?;

    let start = Instant::now();
    for _step in 0..config.steps {
        comm.exchange(&data, &mut halo)?;
        update(&mut data, &halo);
    }
    let elapsed = start.elapsed();

    tracing::debug!(?elapsed, steps = config.steps, "stencil loop finished");
    Ok(RunOutcome {
        partition: data,
        elapsed,
    })
}

/// Emit the runtime line. Only rank 0 reports; all other ranks discard
/// the measurement.
pub fn report(rank: usize, elapsed: Duration) {
    if rank == 0 {
        println!("Runtime: {:.6} seconds", elapsed.as_secs_f64());
    }
}
