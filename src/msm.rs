use crate::error::ProveError;
use crate::pool::join_task;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use log::trace;
use rayon::ThreadPool;
use rayon::prelude::*;
use rootcause::Report;
use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;

type BigIntOf<G> = <<G as ark_ec::PrimeGroup>::ScalarField as PrimeField>::BigInt;

/// Fewest points worth giving their own permit.
const MIN_POINTS_PER_PERMIT: usize = 64;

/// Counting semaphore bounding how many MSM chunks run at once across every MSM of a proof.
#[derive(Debug)]
pub struct CpuSemaphore {
    available: Mutex<usize>,
    released: Condvar,
}

impl CpuSemaphore {
    pub fn new(permits: usize) -> Self {
        CpuSemaphore {
            available: Mutex::new(permits.max(1)),
            released: Condvar::new(),
        }
    }

    /// Block until at least one permit is free, then take as many as are free, up to `wanted`.
    pub fn acquire_up_to(&self, wanted: usize) -> Permits<'_> {
        let wanted = wanted.max(1);
        let mut available = self
            .released
            .wait_while(
                self.available.lock().unwrap_or_else(PoisonError::into_inner),
                |available| *available == 0,
            )
            .unwrap_or_else(PoisonError::into_inner);
        let count = wanted.min(*available);
        *available -= count;
        Permits {
            semaphore: self,
            count,
        }
    }

    pub fn available(&self) -> usize {
        *self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Permits held on a [`CpuSemaphore`], handed back when dropped.
#[derive(Debug)]
pub struct Permits<'a> {
    semaphore: &'a CpuSemaphore,
    count: usize,
}

impl Permits<'_> {
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Drop for Permits<'_> {
    fn drop(&mut self) {
        let mut available = self
            .semaphore
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *available += self.count;
        self.semaphore.released.notify_all();
    }
}

/// `Σ scalars[i]·bases[i]`, split into one chunk per acquired permit.
///
/// Permits are taken on the calling thread, then the chunks run on `pool`.
///
/// # Panics
/// If `bases` and `scalars` have different lengths.
pub fn msm<G: CurveGroup>(
    pool: &ThreadPool,
    semaphore: &CpuSemaphore,
    bases: &[G::Affine],
    scalars: &[BigIntOf<G>],
) -> G {
    assert_eq!(
        bases.len(),
        scalars.len(),
        "MSM needs as many scalars as points"
    );
    if bases.is_empty() {
        return G::zero();
    }

    let permits = semaphore.acquire_up_to(bases.len().div_ceil(MIN_POINTS_PER_PERMIT));
    let chunk = bases.len().div_ceil(permits.count());
    trace!(
        "MSM of {} points in chunks of {} on {} permits",
        bases.len(),
        chunk,
        permits.count()
    );

    pool.install(|| {
        bases
            .par_chunks(chunk)
            .zip(scalars.par_chunks(chunk))
            .map(|(bases, scalars)| G::msm_bigint(bases, scalars))
            .reduce(G::zero, |acc, partial| acc + partial)
    })
}

/// Multiply one point by several scalars, e.g. `[r]δ, [s]δ, [kr]δ`.
pub fn batch_scalar_mul<G: CurveGroup>(
    semaphore: &CpuSemaphore,
    base: &G::Affine,
    scalars: &[BigIntOf<G>],
) -> Vec<G::Affine> {
    let _permit = semaphore.acquire_up_to(1);
    let points: Vec<G> = scalars.iter().map(|s| base.mul_bigint(s)).collect();
    G::normalize_batch(&points)
}

/// Where to cut an MSM of `len` points into three equal parts, if the parts would be longer
/// than `min_chunk`.
pub fn three_way_split(len: usize, min_chunk: usize) -> Option<usize> {
    let split = len / 3;
    (split > min_chunk).then_some(split)
}

/// Same as [`msm`], but large inputs are cut in three and the first two thirds run on their
/// own threads, so this MSM finishes in step with the others of the proof.
pub fn split_msm<G: CurveGroup>(
    pool: &ThreadPool,
    semaphore: &CpuSemaphore,
    bases: &[G::Affine],
    scalars: &[BigIntOf<G>],
    min_chunk: usize,
) -> Result<G, Report<ProveError>> {
    assert_eq!(
        bases.len(),
        scalars.len(),
        "MSM needs as many scalars as points"
    );
    let Some(split) = three_way_split(bases.len(), min_chunk) else {
        return Ok(msm(pool, semaphore, bases, scalars));
    };

    thread::scope(|scope| {
        let first = scope.spawn(|| msm::<G>(pool, semaphore, &bases[..split], &scalars[..split]));
        let second = scope.spawn(|| {
            msm::<G>(
                pool,
                semaphore,
                &bases[split..2 * split],
                &scalars[split..2 * split],
            )
        });
        let third = msm::<G>(pool, semaphore, &bases[2 * split..], &scalars[2 * split..]);

        let first = join_task(first, "split msm");
        let second = join_task(second, "split msm");
        Ok(third + first? + second?)
    })
}
