use crate::error::ProveError;
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rootcause::Report;
use std::sync::OnceLock;
use std::thread::{self, ScopedJoinHandle};

static PROVER_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Rayon pool running the FFTs and MSM chunks of every proof.
///
/// Only leaf jobs run here. Joins, channel receives and permit waits stay on the prover's own
/// threads, so a caller sitting on any other pool's worker cannot starve it.
pub(crate) fn prover_pool() -> Result<&'static ThreadPool, Report<ProveError>> {
    if let Some(pool) = PROVER_POOL.get() {
        return Ok(pool);
    }
    let threads = thread::available_parallelism().map_or(1, |threads| threads.get());
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("groth16-prover-{}", i))
        .build()
        .map_err(|err| {
            Report::new(ProveError::TaskFailed {
                task: "prover pool",
            })
            .attach(err.to_string())
        })?;
    debug!("Started prover pool with {} threads", threads);
    // A racing caller may have won; its pool is kept and ours is dropped.
    Ok(PROVER_POOL.get_or_init(|| pool))
}

/// Wait for a scoped task, turning a panic into [`ProveError::TaskFailed`].
pub(crate) fn join_task<T>(
    handle: ScopedJoinHandle<'_, T>,
    task: &'static str,
) -> Result<T, Report<ProveError>> {
    handle
        .join()
        .map_err(|_| Report::new(ProveError::TaskFailed { task }))
}
