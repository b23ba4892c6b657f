//! End-to-end tests for the ring stencil engine, run over the in-process
//! channel ring so no MPI runtime is needed.

use approx::assert_abs_diff_eq;
use ringstencil::comm::{RingComm, ThreadRingComm};
use ringstencil::engine::{self, EngineConfig};
use ringstencil::StencilError;

/// Helper: run the full engine on `size` in-process ranks and return the
/// final partitions in rank order.
fn run_ring(size: usize, config: EngineConfig) -> Vec<Vec<f64>> {
    let handles = ThreadRingComm::ring_of(size);
    std::thread::scope(|scope| {
        let joins: Vec<_> = handles
            .into_iter()
            .map(|comm| {
                scope.spawn(move || engine::run(&comm, config).expect("run failed").partition)
            })
            .collect();
        joins
            .into_iter()
            .map(|j| j.join().expect("rank panicked"))
            .collect()
    })
}

#[test]
fn repeated_runs_are_deterministic() {
    let config = EngineConfig {
        global_n: 40,
        steps: 10,
    };
    let first = run_ring(4, config);
    let second = run_ring(4, config);
    assert_eq!(first, second);
}

#[test]
fn partition_lengths_cover_global_array() {
    let config = EngineConfig {
        global_n: 120,
        steps: 1,
    };
    let partitions = run_ring(6, config);
    let total: usize = partitions.iter().map(Vec::len).sum();
    assert_eq!(total, 120);
    for part in &partitions {
        assert_eq!(part.len(), 120 / 6);
    }
}

#[test]
fn constant_initial_state_is_a_fixed_point() {
    // Drive the exchange/update loop directly with every rank holding the
    // same constant; averaging identical buffers changes nothing.
    let size = 3;
    let handles = ThreadRingComm::ring_of(size);
    let finals: Vec<Vec<f64>> = std::thread::scope(|scope| {
        let joins: Vec<_> = handles
            .into_iter()
            .map(|comm| {
                scope.spawn(move || {
                    let mut data = vec![7.5; 4];
                    let mut halo = vec![0.0; 4];
                    for _ in 0..20 {
                        comm.exchange(&data, &mut halo).expect("exchange failed");
                        engine::update(&mut data, &halo);
                    }
                    data
                })
            })
            .collect();
        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    for data in finals {
        assert_eq!(data, vec![7.5; 4]);
    }
}

#[test]
fn single_rank_run_leaves_data_unchanged() {
    // With one rank both neighbors are the rank itself, so each exchange
    // returns the rank's own buffer and the update degenerates to
    // 0.5 * (x + x) = x.
    let mut handles = ThreadRingComm::ring_of(1);
    let comm = handles.pop().unwrap();

    let mut data = vec![3.0, -1.0, 0.25, 9.0];
    let initial = data.clone();
    let mut halo = vec![0.0; 4];
    for _ in 0..30 {
        comm.exchange(&data, &mut halo).expect("exchange failed");
        engine::update(&mut data, &halo);
    }
    assert_eq!(data, initial);
}

#[test]
fn two_ranks_converge_to_the_mean() {
    // Ranks start at 0.0 and 1.0; with full-partition exchange each
    // update averages the two, so both land on 0.5 after one step and
    // stay there.
    let config = EngineConfig {
        global_n: 8,
        steps: 100,
    };
    let partitions = run_ring(2, config);
    for part in &partitions {
        for &v in part {
            assert_abs_diff_eq!(v, 0.5, epsilon = 1e-12);
        }
    }
}

#[test]
fn two_rank_residual_is_monotone() {
    let residual = |partitions: &[Vec<f64>]| -> f64 {
        partitions
            .iter()
            .flatten()
            .map(|v| (v - 0.5).abs())
            .fold(0.0, f64::max)
    };

    let mut prev = f64::INFINITY;
    for steps in [1, 2, 5, 10, 100] {
        let config = EngineConfig { global_n: 8, steps };
        let r = residual(&run_ring(2, config));
        assert!(r <= prev, "residual grew: {r} > {prev} at {steps} steps");
        prev = r;
    }
    assert!(prev < 1e-9, "residual after 100 steps: {prev}");
}

#[test]
fn four_ranks_converge_to_the_mean() {
    // Initial values 0,1,2,3: the averaging update preserves the global
    // mean (1.5) and damps every other mode, so all ranks approach 1.5.
    let config = EngineConfig {
        global_n: 8,
        steps: 100,
    };
    let partitions = run_ring(4, config);
    for part in &partitions {
        for &v in part {
            assert_abs_diff_eq!(v, 1.5, epsilon = 1e-9);
        }
    }
}

#[test]
fn uneven_decomposition_fails_before_any_exchange() {
    // 2000 is not divisible by 3; every rank must fail during
    // initialization, before any message is sent, so no rank can be left
    // blocking on a neighbor that already aborted.
    let config = EngineConfig {
        global_n: 2000,
        steps: 100,
    };
    let handles = ThreadRingComm::ring_of(3);
    let errors: Vec<StencilError> = std::thread::scope(|scope| {
        let joins: Vec<_> = handles
            .into_iter()
            .map(|comm| {
                scope.spawn(move || {
                    engine::run(&comm, config).expect_err("expected configuration error")
                })
            })
            .collect();
        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    for err in errors {
        match err {
            StencilError::Configuration { global_n, size } => {
                assert_eq!(global_n, 2000);
                assert_eq!(size, 3);
            }
            other => panic!("expected Configuration error, got {other}"),
        }
    }
}
