use crate::blinding::BlindingScalars;
use crate::circuits::ConstraintSystem;
use crate::config::ProverConfig;
use crate::curve::{CurveId, CurveIdentified};
use crate::error::ProveError;
use crate::key::ProvingKey;
use crate::msm::{CpuSemaphore, batch_scalar_mul, msm, split_msm};
use crate::pool::{join_task, prover_pool};
use crate::quotient::compute_h;
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Valid};
use log::{debug, info, warn};
use rand::TryRngCore;
use rayon::prelude::*;
use rootcause::Report;
use rootcause::prelude::ResultExt;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Instant;

/// A Groth16 proof, with the notation of the DIZK paper (<https://eprint.iacr.org/2018/691.pdf>,
/// figure 4).
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    pub ar: E::G1Affine,
    pub bs: E::G2Affine,
    pub krs: E::G1Affine,
}

impl<E: Pairing> Proof<E> {
    /// Whether every element lies in the prime order subgroup of its group.
    ///
    /// [`prove`] never returns a proof failing this, but one read from elsewhere may.
    pub fn is_valid(&self) -> bool {
        self.ar.check().is_ok() && self.krs.check().is_ok() && self.bs.check().is_ok()
    }

    pub fn curve_id(&self) -> CurveId
    where
        E: CurveIdentified,
    {
        E::CURVE_ID
    }
}

/// One of the three late terms of `Krs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KrsPartial<G> {
    /// `Σ h_i·Z_i`
    Quotient(G),
    /// `Ar`, to be scaled by `s`.
    Ar(G),
    /// The G1 copy of `Bs`, to be scaled by `r`.
    Bs1(G),
}

/// Accumulates the late terms of `Krs` in whatever order they arrive.
pub(crate) struct KrsCombiner<G: PrimeGroup> {
    sum: G,
    r: <G::ScalarField as PrimeField>::BigInt,
    s: <G::ScalarField as PrimeField>::BigInt,
    received: [bool; 3],
}

impl<G: PrimeGroup> KrsCombiner<G> {
    pub fn new(
        sum: G,
        r: <G::ScalarField as PrimeField>::BigInt,
        s: <G::ScalarField as PrimeField>::BigInt,
    ) -> Self {
        KrsCombiner {
            sum,
            r,
            s,
            received: [false; 3],
        }
    }

    pub fn absorb(&mut self, partial: KrsPartial<G>) {
        let (slot, term) = match partial {
            KrsPartial::Quotient(zh) => (0, zh),
            KrsPartial::Ar(ar) => (1, ar.mul_bigint(self.s)),
            KrsPartial::Bs1(bs1) => (2, bs1.mul_bigint(self.r)),
        };
        debug_assert!(!self.received[slot], "Krs term received twice");
        self.received[slot] = true;
        self.sum += term;
    }

    pub fn is_complete(&self) -> bool {
        self.received.iter().all(|received| *received)
    }

    /// Name of the first term still outstanding.
    pub fn missing(&self) -> &'static str {
        match self.received {
            [false, _, _] => "krs quotient",
            [_, false, _] => "ar",
            [_, _, false] => "bs1",
            _ => "krs",
        }
    }

    pub fn finish(self) -> G {
        debug_assert!(self.is_complete());
        self.sum
    }
}

/// Feed `combiner` from `partials` until every late term of `Krs` is in.
///
/// Each producer owns a sender, so one that dies before sending hangs up instead of stalling the
/// wait; the first term still missing is then reported.
pub(crate) fn drain_krs<G: PrimeGroup>(
    mut combiner: KrsCombiner<G>,
    partials: &Receiver<KrsPartial<G>>,
) -> Result<G, Report<ProveError>> {
    while !combiner.is_complete() {
        match partials.recv() {
            Ok(partial) => combiner.absorb(partial),
            Err(_) => {
                return Err(Report::new(ProveError::TaskFailed {
                    task: combiner.missing(),
                }));
            }
        }
    }
    Ok(combiner.finish())
}

/// Prove knowledge of `witness` (public values without ONE, then secret values) for `r1cs`.
///
/// Uses the default [`ProverConfig`] and the operating system's entropy source for blinding.
///
/// When `force` is set, a witness that does not solve the constraint system is not an error: the
/// FFTs and MSMs run on whatever the solver produced, which is useful for benchmarks, but the
/// proof will not verify.
pub fn prove<E, S>(
    r1cs: &S,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    force: bool,
) -> Result<Proof<E>, Report<ProveError>>
where
    E: Pairing,
    S: ConstraintSystem<E::ScalarField> + ?Sized,
{
    prove_with(
        r1cs,
        pk,
        witness,
        force,
        &ProverConfig::default(),
        &mut rand::rngs::OsRng,
    )
}

/// [`prove`] with an explicit configuration and source of blinding randomness.
pub fn prove_with<E, S, R>(
    r1cs: &S,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    force: bool,
    config: &ProverConfig,
    rng: &mut R,
) -> Result<Proof<E>, Report<ProveError>>
where
    E: Pairing,
    S: ConstraintSystem<E::ScalarField> + ?Sized,
    R: TryRngCore + ?Sized,
{
    let start = Instant::now();
    let nb_public = r1cs.nb_public_variables();
    let nb_secret = r1cs.nb_secret_variables();
    let expected = nb_public.saturating_sub(1) + nb_secret;
    if witness.len() != expected {
        return Err(Report::new(ProveError::InvalidWitnessSize {
            got: witness.len(),
            expected,
            nb_public,
            nb_secret,
        }));
    }
    pk.validate(r1cs)?;

    // Solve the R1CS, filling the a, b, c vectors and every wire.
    let n = pk.domain.cardinality();
    let nb_constraints = r1cs.nb_constraints();
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    let mut c = Vec::with_capacity(n);
    a.resize(nb_constraints, E::ScalarField::zero());
    b.resize(nb_constraints, E::ScalarField::zero());
    c.resize(nb_constraints, E::ScalarField::zero());
    let mut wire_values = vec![E::ScalarField::zero(); r1cs.nb_wires()];
    if let Err(err) = r1cs.solve(witness, &mut a, &mut b, &mut c, &mut wire_values) {
        if !force {
            return Err(err).context(ProveError::Solve);
        }
        warn!("Ignoring solver failure, the proof will not verify: {}", err);
    }
    debug!("Solved {} constraints in {:?}", nb_constraints, start.elapsed());

    let pool = prover_pool()?;
    let wire_values: Vec<_> = pool.install(|| {
        wire_values
            .into_par_iter()
            .map(|value| value.into_bigint())
            .collect()
    });

    let semaphore = CpuSemaphore::new(config.cpus());
    let semaphore = &semaphore;
    let wire_values = &wire_values[..];

    thread::scope(|scope| -> Result<Proof<E>, Report<ProveError>> {
        let h_task = scope.spawn(move || pool.install(|| compute_h(a, b, c, &pk.domain)));

        // Cheap next to H, so sample while the FFTs run.
        let blinding = BlindingScalars::<E::ScalarField>::sample(rng).map(|blinding| {
            let scalars = blinding.canonical();
            let deltas = batch_scalar_mul::<E::G1>(semaphore, &pk.g1.delta, &scalars);
            (scalars, deltas)
        });

        // H uses every core, so the MSMs only start once it is done.
        let h = join_task(h_task, "h");
        let ([r, s, _], deltas) = blinding?;
        let h = h?;
        let (r_delta, s_delta, kr_delta) = (deltas[0], deltas[1], deltas[2]);
        debug!("H and blinding ready after {:?}", start.elapsed());

        let (krs_tx, krs_rx) = mpsc::channel::<KrsPartial<E::G1>>();
        let ar_tx = krs_tx.clone();
        let bs1_tx = krs_tx.clone();
        let quotient_tx = krs_tx;

        let krs_task = scope.spawn(move || -> Result<E::G1, Report<ProveError>> {
            // Keeping K and Z apart gives tasks of similar length, which parallelises better.
            let quotient = scope.spawn(move || {
                let zh = msm::<E::G1>(pool, semaphore, &pk.g1.z, &h);
                let _ = quotient_tx.send(KrsPartial::Quotient(zh));
            });

            let mut krs = msm::<E::G1>(pool, semaphore, &pk.g1.k, &wire_values[nb_public..]);
            krs += kr_delta;

            let krs = drain_krs(KrsCombiner::new(krs, r, s), &krs_rx);
            let quotient = join_task(quotient, "krs quotient");
            let krs = krs?;
            quotient?;
            Ok(krs)
        });

        let ar_task = scope.spawn(move || {
            let mut ar = msm::<E::G1>(pool, semaphore, &pk.g1.a, wire_values);
            ar += pk.g1.alpha;
            ar += r_delta;
            let _ = ar_tx.send(KrsPartial::Ar(ar));
            ar.into_affine()
        });

        let bs1_task = scope.spawn(move || {
            let mut bs1 = msm::<E::G1>(pool, semaphore, &pk.g1.b, wire_values);
            bs1 += pk.g1.beta;
            bs1 += s_delta;
            let _ = bs1_tx.send(KrsPartial::Bs1(bs1));
        });

        // Bs runs here rather than on its own thread.
        let bs = split_msm::<E::G2>(
            pool,
            semaphore,
            &pk.g2.b,
            wire_values,
            config.g2_split_min_chunk,
        )
        .map(|mut bs| {
            bs += pk.g2.delta.mul_bigint(s);
            bs += pk.g2.beta;
            bs.into_affine()
        });

        let krs = join_task(krs_task, "krs");
        let ar = join_task(ar_task, "ar");
        let bs1 = join_task(bs1_task, "bs1");

        let krs = krs??;
        let ar = ar?;
        bs1?;
        let bs = bs?;

        info!("Proof created in {:?}", start.elapsed());
        Ok(Proof {
            ar,
            bs,
            krs: krs.into_affine(),
        })
    })
}
