use clap::Parser;
use ringstencil::comm::RingComm;
use ringstencil::engine;

/// Distributed 1D ring stencil benchmark
///
/// Problem size and step count are fixed; the number of ranks comes from
/// the MPI launcher (e.g. `mpirun -n 4 ringstencil` with the
/// `distributed` feature), not from flags.
#[derive(Parser)]
#[command(name = "ringstencil", version)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "distributed")]
    {
        // The universe must outlive every MPI call; dropping it finalizes
        // the process group.
        let _universe = mpi::initialize().unwrap_or_else(|| {
            eprintln!("MPI init failed");
            std::process::exit(1);
        });
        let comm = ringstencil::comm_mpi::MpiComm::new();
        run_and_report(&comm);
    }

    #[cfg(not(feature = "distributed"))]
    {
        let comm = ringstencil::comm::SingleProcessComm;
        run_and_report(&comm);
    }
}

fn run_and_report(comm: &dyn RingComm) {
    let outcome = engine::run(comm, engine::EngineConfig::default()).unwrap_or_else(|e| {
        eprintln!("Stencil run error: {e}");
        std::process::exit(1);
    });
    engine::report(comm.rank(), outcome.elapsed);
}
