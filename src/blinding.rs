use crate::error::ProveError;
use ark_ff::PrimeField;
use rand::TryRngCore;
use rootcause::Report;

/// Draw a uniform field element by rejection sampling random bytes.
pub fn rand_scalar<R, F>(rng: &mut R) -> Result<F, Report<ProveError>>
where
    R: TryRngCore + ?Sized,
    F: PrimeField,
{
    let mut bytes = vec![0u8; (F::MODULUS_BIT_SIZE as usize).div_ceil(8)];
    loop {
        rng.try_fill_bytes(&mut bytes).map_err(|err| {
            Report::new(ProveError::Randomness).attach(format!("entropy source: {}", err))
        })?;
        if let Some(scalar) = F::from_random_bytes(&bytes) {
            return Ok(scalar);
        }
    }
}

/// The zero knowledge blinding factors `r`, `s` and `kr = -(r·s)` of one proof.
///
/// Kept both as field elements and as canonical integers, since scalar multiplications of curve
/// points take the latter.
pub(crate) struct BlindingScalars<F: PrimeField> {
    pub r: F,
    pub s: F,
    pub kr: F,
}

impl<F: PrimeField> BlindingScalars<F> {
    pub fn sample<R>(rng: &mut R) -> Result<Self, Report<ProveError>>
    where
        R: TryRngCore + ?Sized,
    {
        let r: F = rand_scalar(rng)?;
        let s: F = rand_scalar(rng)?;
        let kr = -(r * s);
        Ok(BlindingScalars { r, s, kr })
    }

    /// `[r, s, kr]` in canonical form.
    pub fn canonical(&self) -> [F::BigInt; 3] {
        [
            self.r.into_bigint(),
            self.s.into_bigint(),
            self.kr.into_bigint(),
        ]
    }
}
