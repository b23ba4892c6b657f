//! MPI communication backend for the ring exchange.
//!
//! Requires the `distributed` feature flag and an MPI installation.
//! Implements [`RingComm`] on top of `MPI_Sendrecv` via the mpi crate's
//! combined `send_receive_into`, which guarantees progress for a full
//! ring regardless of message size (no reliance on transport buffering).
//!
//! # Usage
//!
//! The caller must initialize MPI before constructing `MpiComm`:
//!
//! ```ignore
//! let universe = mpi::initialize().expect("MPI init failed");
//! let comm = MpiComm::new();
//! ```

use crate::comm::RingComm;
use crate::error::{Result, StencilError};
use mpi::point_to_point as p2p;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

/// MPI-based ring backend wrapping the world communicator.
///
/// Requires `mpi::initialize()` to have been called before construction.
pub struct MpiComm;

impl MpiComm {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MpiComm {
    fn default() -> Self {
        Self::new()
    }
}

impl RingComm for MpiComm {
    fn rank(&self) -> usize {
        SimpleCommunicator::world().rank() as usize
    }

    fn size(&self) -> usize {
        SimpleCommunicator::world().size() as usize
    }

    fn exchange(&self, send: &[f64], recv: &mut [f64]) -> Result<()> {
        let world = SimpleCommunicator::world();
        let ring = self.ring();

        let status = p2p::send_receive_into(
            send,
            &world.process_at_rank(ring.right() as i32),
            recv,
            &world.process_at_rank(ring.left() as i32),
        );

        let count = status.count(f64::equivalent_datatype()) as usize;
        if count != recv.len() {
            return Err(StencilError::Transport(format!(
                "received {} elements from rank {}, expected {}",
                count,
                ring.left(),
                recv.len()
            )));
        }
        Ok(())
    }
}
