use crate::domain::{Domain, Shift};
use ark_ff::PrimeField;
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Coefficients of the quotient `H = (A·B - C) / Z`, in canonical form, one per domain position.
///
/// `a`, `b` and `c` hold one evaluation per constraint and are consumed; `a`'s storage is
/// reused for the result.
pub fn compute_h<F>(mut a: Vec<F>, mut b: Vec<F>, mut c: Vec<F>, domain: &Domain<F>) -> Vec<F::BigInt>
where
    F: PrimeField,
{
    let start = Instant::now();
    let n = domain.cardinality();
    debug_assert!(a.len() <= n && a.len() == b.len() && a.len() == c.len());

    a.resize(n, F::zero());
    b.resize(n, F::zero());
    c.resize(n, F::zero());

    // Interpolate over the subgroup, then evaluate on the coset where Z is the constant -2.
    for values in [&mut a, &mut b, &mut c] {
        domain.fft_inverse(values, Shift::Subgroup);
    }
    for values in [&mut a, &mut b, &mut c] {
        domain.fft(values, Shift::Coset);
    }

    let z_inv = domain.vanishing_inverse_on_coset();
    a.par_iter_mut()
        .zip(b.par_iter())
        .zip(c.par_iter())
        .for_each(|((a_i, b_i), c_i)| *a_i = (*a_i * b_i - c_i) * z_inv);
    drop(b);
    drop(c);

    domain.fft_inverse(&mut a, Shift::Coset);
    let h = a.into_par_iter().map(|h_i| h_i.into_bigint()).collect();
    debug!("Computed H over {} points in {:?}", n, start.elapsed());
    h
}
