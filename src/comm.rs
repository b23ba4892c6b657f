//! Communication backend abstraction for the ring exchange.
//!
//! Provides a trait for the combined send-to-right / receive-from-left
//! operation, a trivial single-process implementation, and a channel-based
//! in-process ring for running several ranks as threads without an MPI
//! runtime.

use crate::error::{Result, StencilError};
use crate::partition::Ring;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

/// Abstraction over the per-iteration ring exchange.
///
/// Implementations: `SingleProcessComm` (loopback), `ThreadRingComm`
/// (in-process channels), `MpiComm` (via mpi crate, `distributed` feature).
pub trait RingComm {
    /// This process's rank in the ring.
    fn rank(&self) -> usize;

    /// Total number of ranks in the ring.
    fn size(&self) -> usize;

    /// Combined send-to-right / receive-from-left.
    ///
    /// Sends `send` to rank `(rank + 1) % size` and fills `recv` with the
    /// buffer sent by rank `(rank - 1 + size) % size` in the same logical
    /// iteration. Implementations must guarantee progress for any ring
    /// size and message size: the call may block, but a full ring of
    /// exchanging processes always completes. `send` and `recv` have the
    /// same length on both ends; a mismatch is a fatal transport error.
    fn exchange(&self, send: &[f64], recv: &mut [f64]) -> Result<()>;

    /// Ring position of this process.
    fn ring(&self) -> Ring {
        Ring::new(self.rank(), self.size())
    }
}

/// Loopback backend for single-process execution.
///
/// With one rank, both neighbors are the rank itself, so the exchange
/// hands the process back its own current buffer.
pub struct SingleProcessComm;

impl RingComm for SingleProcessComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn exchange(&self, send: &[f64], recv: &mut [f64]) -> Result<()> {
        if send.len() != recv.len() {
            return Err(StencilError::Transport(format!(
                "message length {} does not match receive buffer length {}",
                send.len(),
                recv.len()
            )));
        }
        recv.copy_from_slice(send);
        Ok(())
    }
}

/// Channel-based ring backend running all ranks inside one process.
///
/// Each handle belongs to one rank and is meant to be moved into its own
/// thread. The link from each rank to its right neighbor is a bounded
/// channel of capacity 1: every rank can deposit its outbound message
/// before blocking on its own receive, which preserves the no-deadlock
/// progress guarantee of the combined exchange. A rank at iteration k+1
/// can be held back only until its right neighbor has consumed the
/// iteration-k message, so inter-rank skew stays bounded at one iteration.
pub struct ThreadRingComm {
    ring: Ring,
    to_right: SyncSender<Vec<f64>>,
    from_left: Receiver<Vec<f64>>,
}

impl ThreadRingComm {
    /// Build connected handles for an in-process ring of `size` ranks,
    /// returned in rank order.
    pub fn ring_of(size: usize) -> Vec<ThreadRingComm> {
        assert!(size >= 1, "ring needs at least one rank");

        // Channel i delivers into rank i's receive side; the matching
        // sender belongs to rank i's left neighbor.
        let mut senders = Vec::with_capacity(size);
        let mut receivers = Vec::with_capacity(size);
        for _ in 0..size {
            let (tx, rx) = sync_channel(1);
            senders.push(tx);
            receivers.push(rx);
        }

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, from_left)| {
                let ring = Ring::new(rank, size);
                let to_right = senders[ring.right()].clone();
                ThreadRingComm {
                    ring,
                    to_right,
                    from_left,
                }
            })
            .collect()
    }
}

impl RingComm for ThreadRingComm {
    fn rank(&self) -> usize {
        self.ring.rank
    }

    fn size(&self) -> usize {
        self.ring.size
    }

    fn exchange(&self, send: &[f64], recv: &mut [f64]) -> Result<()> {
        self.to_right.send(send.to_vec()).map_err(|_| {
            StencilError::Transport(format!(
                "right neighbor (rank {}) disconnected",
                self.ring.right()
            ))
        })?;

        let incoming = self.from_left.recv().map_err(|_| {
            StencilError::Transport(format!(
                "left neighbor (rank {}) disconnected",
                self.ring.left()
            ))
        })?;

        if incoming.len() != recv.len() {
            return Err(StencilError::Transport(format!(
                "received {} elements from rank {}, expected {}",
                incoming.len(),
                self.ring.left(),
                recv.len()
            )));
        }
        recv.copy_from_slice(&incoming);
        Ok(())
    }
}
