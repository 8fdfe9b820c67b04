//! Circuits, a throwaway trusted setup and a verifier, so proofs can be checked end to end.

use crate::circuits::{Constraint, ConstraintSystem, LinearCombination, R1CS};
use crate::domain::Domain;
use crate::groth16::Proof;
use crate::key::{G1Key, G2Key, ProvingKey};
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{Field, One, PrimeField, Zero};
use ark_std::UniformRand;
use log::debug;
use rootcause::{Report, report};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `x^3 + x + 5 = out`, with `out` public and `x` secret.
///
/// Wires: `[ONE, out, x, x², x³]`.
pub fn cubic<F: PrimeField>() -> Result<R1CS<F>, Report> {
    let mut r1cs = R1CS::new(2, 1, 2)?;
    let (one, out, x) = (r1cs.one(), r1cs.public(0), r1cs.secret(0));
    let (x2, x3) = (r1cs.internal(0), r1cs.internal(1));

    r1cs.add_constraint(Constraint::new(
        vec![(x, F::one())],
        vec![(x, F::one())],
        vec![(x2, F::one())],
    ))?;
    r1cs.add_constraint(Constraint::new(
        vec![(x2, F::one())],
        vec![(x, F::one())],
        vec![(x3, F::one())],
    ))?;
    r1cs.add_constraint(Constraint::new(
        vec![(x3, F::one()), (x, F::one()), (one, F::from(5u64))],
        vec![(one, F::one())],
        vec![(out, F::one())],
    ))?;
    Ok(r1cs)
}

/// `x^(2^rounds) = out` by repeated squaring, with `out` public and `x` secret.
pub fn squaring_chain<F: PrimeField>(rounds: usize) -> Result<R1CS<F>, Report> {
    if rounds == 0 {
        return Err(report!("Squaring chain needs at least one round"));
    }
    let mut r1cs = R1CS::new(2, 1, rounds - 1)?;
    let mut previous = r1cs.secret(0);
    for round in 0..rounds {
        let next = if round + 1 == rounds {
            r1cs.public(0)
        } else {
            r1cs.internal(round)
        };
        r1cs.add_constraint(Constraint::new(
            vec![(previous, F::one())],
            vec![(previous, F::one())],
            vec![(next, F::one())],
        ))?;
        previous = next;
    }
    Ok(r1cs)
}

pub struct VerifyingKey<E: Pairing> {
    pub alpha: E::G1Affine,
    pub beta: E::G2Affine,
    pub gamma: E::G2Affine,
    pub delta: E::G2Affine,
    /// One point per public wire, ONE included.
    pub ic: Vec<E::G1Affine>,
}

/// Per wire sum of `coefficient · L_i(τ)` over the constraints using it.
fn column_at_tau<F: Field>(
    nb_wires: usize,
    lagrange: &[F],
    rows: impl Iterator<Item = (usize, LinearCombination<F>)>,
) -> Vec<F> {
    let mut column = vec![F::zero(); nb_wires];
    for (i, lc) in rows {
        for (wire, coefficient) in lc {
            column[wire] += coefficient * lagrange[i];
        }
    }
    column
}

/// Groth16 setup with locally drawn toxic waste. Only good for tests.
pub fn setup<E: Pairing>(
    r1cs: &R1CS<E::ScalarField>,
) -> Result<(ProvingKey<E>, VerifyingKey<E>), Report> {
    let mut rng = ark_std::test_rng();
    let tau = E::ScalarField::rand(&mut rng);
    let alpha = E::ScalarField::rand(&mut rng);
    let beta = E::ScalarField::rand(&mut rng);
    let gamma = E::ScalarField::rand(&mut rng);
    let delta = E::ScalarField::rand(&mut rng);

    let domain = Domain::<E::ScalarField>::new(r1cs.nb_constraints())?;
    let n = domain.cardinality();

    // L_i(τ) = ω^i (τ^n - 1) / (n (τ - ω^i))
    let z_tau = tau.pow([n as u64]) - E::ScalarField::one();
    let n_inv = E::ScalarField::from(n as u64)
        .inverse()
        .ok_or(report!("Domain size not invertible"))?;
    let lagrange = (0..n)
        .map(|i| -> Result<E::ScalarField, Report> {
            let omega_i = domain.element(i);
            let denominator = (tau - omega_i)
                .inverse()
                .ok_or(report!("τ landed on the domain"))?;
            Ok(omega_i * z_tau * n_inv * denominator)
        })
        .collect::<Result<Vec<_>, Report>>()?;

    let nb_wires = r1cs.nb_wires();
    let constraints = r1cs.constraints().iter().enumerate();
    let u = column_at_tau(nb_wires, &lagrange, constraints.clone().map(|(i, c)| (i, c.l.clone())));
    let v = column_at_tau(nb_wires, &lagrange, constraints.clone().map(|(i, c)| (i, c.r.clone())));
    let w = column_at_tau(nb_wires, &lagrange, constraints.map(|(i, c)| (i, c.o.clone())));

    let gamma_inv = gamma.inverse().ok_or(report!("γ is zero"))?;
    let delta_inv = delta.inverse().ok_or(report!("δ is zero"))?;
    let combined = |j: usize| beta * u[j] + alpha * v[j] + w[j];

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();
    let g1_times = |scalars: Vec<E::ScalarField>| -> Vec<E::G1Affine> {
        E::G1::normalize_batch(&scalars.into_iter().map(|s| g1 * s).collect::<Vec<_>>())
    };

    let nb_public = r1cs.nb_public_variables();
    let proving_key = ProvingKey {
        domain,
        g1: G1Key {
            alpha: (g1 * alpha).into_affine(),
            beta: (g1 * beta).into_affine(),
            delta: (g1 * delta).into_affine(),
            a: g1_times(u.clone()),
            b: g1_times(v.clone()),
            k: g1_times((nb_public..nb_wires).map(|j| combined(j) * delta_inv).collect()),
            z: g1_times(
                (0..n)
                    .map(|i| tau.pow([i as u64]) * z_tau * delta_inv)
                    .collect(),
            ),
        },
        g2: G2Key {
            beta: (g2 * beta).into_affine(),
            delta: (g2 * delta).into_affine(),
            b: E::G2::normalize_batch(&v.iter().map(|v_j| g2 * *v_j).collect::<Vec<_>>()),
        },
    };
    let verifying_key = VerifyingKey {
        alpha: proving_key.g1.alpha,
        beta: proving_key.g2.beta,
        gamma: (g2 * gamma).into_affine(),
        delta: proving_key.g2.delta,
        ic: g1_times((0..nb_public).map(|j| combined(j) * gamma_inv).collect()),
    };
    debug!("Test setup done for {} wires over {} points", nb_wires, n);
    Ok((proving_key, verifying_key))
}

/// `e(Ar, Bs) = e(α, β) · e(Σ x_j·IC_j, γ) · e(Krs, δ)`, with `public` not including ONE.
pub fn verify<E: Pairing>(
    vk: &VerifyingKey<E>,
    proof: &Proof<E>,
    public: &[E::ScalarField],
) -> bool {
    if public.len() + 1 != vk.ic.len() {
        return false;
    }
    let inputs = public
        .iter()
        .zip(&vk.ic[1..])
        .fold(E::G1::from(vk.ic[0]), |acc, (x, ic)| acc + *ic * *x);

    let lhs = E::pairing(proof.ar, proof.bs);
    let rhs = E::pairing(vk.alpha, vk.beta)
        + E::pairing(inputs, vk.gamma)
        + E::pairing(proof.krs, vk.delta);
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use crate::circuits::ConstraintSystem;
    use crate::testing::{cubic, squaring_chain};
    use ark_ff::Zero;
    use rootcause::Report;

    type Fr = ark_bls12_381::Fr;

    #[test]
    fn squaring_chain_solves() -> Result<(), Report> {
        let r1cs = squaring_chain::<Fr>(4)?;
        assert_eq!(r1cs.nb_wires(), 6);
        let x = Fr::from(2);
        let mut wires = vec![Fr::zero(); r1cs.nb_wires()];
        let mut a = vec![Fr::zero(); 4];
        let mut b = vec![Fr::zero(); 4];
        let mut c = vec![Fr::zero(); 4];
        r1cs.solve(&[Fr::from(65536), x], &mut a, &mut b, &mut c, &mut wires)?;
        assert_eq!(wires[r1cs.internal(2)], Fr::from(256));
        assert!(squaring_chain::<Fr>(0).is_err());
        Ok(())
    }

    #[test]
    fn cubic_has_expected_shape() -> Result<(), Report> {
        let r1cs = cubic::<Fr>()?;
        assert_eq!(r1cs.nb_constraints(), 3);
        assert_eq!(r1cs.nb_wires(), 5);
        Ok(())
    }
}
