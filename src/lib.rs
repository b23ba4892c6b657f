//! Distributed 1D ring stencil benchmark.
//!
//! A fixed-size global array is split into equal contiguous partitions,
//! one per rank. Every iteration each rank sends its whole partition to
//! its right ring-neighbor, receives the left neighbor's partition, and
//! averages the two in place. Rank 0 reports the wall-clock time of the
//! iteration loop, for strong-scaling studies.
//!
//! The exchange is abstracted behind [`comm::RingComm`] so the same
//! engine runs over MPI (`distributed` feature), over in-process channel
//! rings for tests, or as a single loopback process.

pub mod comm;
#[cfg(feature = "distributed")]
pub mod comm_mpi;
pub mod engine;
pub mod error;
pub mod partition;

pub use error::{Result, StencilError};
