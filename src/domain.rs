use ark_ff::FftField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use rootcause::{Report, report};

/// Which set of points a transform evaluates over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    /// The multiplicative subgroup `{ω^i}`.
    Subgroup,
    /// The coset `{g·ω^i}`, where `g` is a primitive `2n`th root of unity.
    Coset,
}

/// Evaluation domain of size `n`, the next power of two at or above the number of constraints.
///
/// The coset generator `g` satisfies `g^n = -1`, so the vanishing polynomial `x^n - 1` of the
/// subgroup is the constant `-2` on every coset point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain<F: FftField> {
    subgroup: Radix2EvaluationDomain<F>,
    coset: Radix2EvaluationDomain<F>,
    vanishing_on_coset_inv: F,
}

impl<F: FftField> Domain<F> {
    pub fn new(nb_constraints: usize) -> Result<Self, Report> {
        let subgroup = Radix2EvaluationDomain::<F>::new(nb_constraints.max(1))
            .ok_or(report!("Field has no subgroup large enough"))
            .map_err(|report| report.attach(format!("constraints: {}", nb_constraints)))?;
        let n = subgroup.size();

        let generator = F::get_root_of_unity(2 * n as u64)
            .ok_or(report!("Field has no root of unity of order 2n"))
            .map_err(|report| report.attach(format!("n: {}", n)))?;
        let coset = subgroup
            .get_coset(generator)
            .ok_or(report!("Could not shift domain onto coset"))?;

        let vanishing_on_coset = generator.pow([n as u64]) - F::one();
        let vanishing_on_coset_inv = vanishing_on_coset
            .inverse()
            .ok_or(report!("Coset intersects the subgroup"))?;

        Ok(Domain {
            subgroup,
            coset,
            vanishing_on_coset_inv,
        })
    }

    pub fn cardinality(&self) -> usize {
        self.subgroup.size()
    }

    /// `ω^i`, the `i`th point of the subgroup.
    pub fn element(&self, i: usize) -> F {
        self.subgroup.element(i)
    }

    pub fn coset_generator(&self) -> F {
        self.coset.coset_offset()
    }

    /// `1 / Z(x)` for any `x` in the coset, i.e. `-1/2`.
    pub fn vanishing_inverse_on_coset(&self) -> F {
        self.vanishing_on_coset_inv
    }

    /// Evaluate the polynomial with coefficients `values`, in place, over the chosen points.
    /// `values` is zero padded to the domain size.
    pub fn fft(&self, values: &mut Vec<F>, shift: Shift) {
        match shift {
            Shift::Subgroup => self.subgroup.fft_in_place(values),
            Shift::Coset => self.coset.fft_in_place(values),
        }
    }

    /// Interpolate evaluations over the chosen points back into coefficients, in place.
    pub fn fft_inverse(&self, values: &mut Vec<F>, shift: Shift) {
        match shift {
            Shift::Subgroup => self.subgroup.ifft_in_place(values),
            Shift::Coset => self.coset.ifft_in_place(values),
        }
    }
}
