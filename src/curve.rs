use ark_ec::pairing::Pairing;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pairing friendly curves the prover is known to run on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveId {
    Bls12_381,
    Mnt6_753,
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveId::Bls12_381 => write!(f, "bls12_381"),
            CurveId::Mnt6_753 => write!(f, "mnt6_753"),
        }
    }
}

/// A pairing that can report which curve it is.
pub trait CurveIdentified: Pairing {
    const CURVE_ID: CurveId;
}

impl CurveIdentified for ark_bls12_381::Bls12_381 {
    const CURVE_ID: CurveId = CurveId::Bls12_381;
}

impl CurveIdentified for ark_mnt6_753::MNT6_753 {
    const CURVE_ID: CurveId = CurveId::Mnt6_753;
}
