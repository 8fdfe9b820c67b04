use crate::circuits::ConstraintSystem;
use crate::domain::Domain;
use crate::error::ProveError;
use ark_ec::pairing::Pairing;
use rootcause::Report;

/// G1 part of the proving key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct G1Key<E: Pairing> {
    pub alpha: E::G1Affine,
    pub beta: E::G1Affine,
    pub delta: E::G1Affine,
    /// One point per wire.
    pub a: Vec<E::G1Affine>,
    /// One point per wire.
    pub b: Vec<E::G1Affine>,
    /// One point per secret or internal wire.
    pub k: Vec<E::G1Affine>,
    /// One point per domain position.
    pub z: Vec<E::G1Affine>,
}

/// G2 part of the proving key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct G2Key<E: Pairing> {
    pub beta: E::G2Affine,
    pub delta: E::G2Affine,
    /// One point per wire.
    pub b: Vec<E::G2Affine>,
}

/// Output of the trusted setup used to build proofs. Read only while proving, so one key can
/// serve any number of concurrent calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvingKey<E: Pairing> {
    pub domain: Domain<E::ScalarField>,
    pub g1: G1Key<E>,
    pub g2: G2Key<E>,
}

impl<E: Pairing> ProvingKey<E> {
    /// Check that every vector has the length `r1cs` and the domain call for.
    pub fn validate<S>(&self, r1cs: &S) -> Result<(), Report<ProveError>>
    where
        S: ConstraintSystem<E::ScalarField> + ?Sized,
    {
        let nb_wires = r1cs.nb_wires();
        let nb_private = nb_wires - r1cs.nb_public_variables();
        let cardinality = self.domain.cardinality();

        if cardinality < r1cs.nb_constraints() {
            return Err(Report::new(ProveError::InvalidProvingKey)
                .attach(format!("domain cardinality: {}", cardinality))
                .attach(format!("constraints: {}", r1cs.nb_constraints())));
        }

        [
            ("G1.A", self.g1.a.len(), nb_wires),
            ("G1.B", self.g1.b.len(), nb_wires),
            ("G1.K", self.g1.k.len(), nb_private),
            ("G1.Z", self.g1.z.len(), cardinality),
            ("G2.B", self.g2.b.len(), nb_wires),
        ]
        .into_iter()
        .try_for_each(|(name, got, expected)| {
            if got == expected {
                Ok(())
            } else {
                Err(Report::new(ProveError::InvalidProvingKey)
                    .attach(format!("{}: {} points, expected {}", name, got, expected)))
            }
        })
    }
}
