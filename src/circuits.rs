use ark_ff::Field;
use log::trace;
use rootcause::prelude::ResultExt;
use rootcause::{Report, bail, report};

/// What the prover needs from a compiled circuit: its sizing and a way to solve it.
///
/// Wires are indexed `[ONE, public.., secret.., internal..]`, and the proving key's per-wire
/// vectors must follow the same order.
pub trait ConstraintSystem<F: Field> {
    /// Number of public wires, including the reserved ONE wire.
    fn nb_public_variables(&self) -> usize;
    fn nb_secret_variables(&self) -> usize;
    fn nb_internal_variables(&self) -> usize;
    fn nb_constraints(&self) -> usize;

    fn nb_wires(&self) -> usize {
        self.nb_public_variables() + self.nb_secret_variables() + self.nb_internal_variables()
    }

    /// Solve every wire from `witness` (public values without ONE, then secret values).
    ///
    /// `a`, `b` and `c` have one slot per constraint and receive the evaluations of its left,
    /// right and output linear combinations. `wire_values` has one slot per wire. On failure the
    /// buffers keep whatever was written before the failing constraint.
    fn solve(
        &self,
        witness: &[F],
        a: &mut [F],
        b: &mut [F],
        c: &mut [F],
        wire_values: &mut [F],
    ) -> Result<(), Report>;
}

/// Sparse linear combination of wires, as `(wire, coefficient)` terms.
pub type LinearCombination<F> = Vec<(usize, F)>;

/// A single rank 1 constraint `l * r = o`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint<F: Field> {
    pub l: LinearCombination<F>,
    pub r: LinearCombination<F>,
    pub o: LinearCombination<F>,
}

impl<F: Field> Constraint<F> {
    pub fn new(l: LinearCombination<F>, r: LinearCombination<F>, o: LinearCombination<F>) -> Self {
        Constraint { l, r, o }
    }

    fn sides(&self) -> [(Side, &LinearCombination<F>); 3] {
        [(Side::L, &self.l), (Side::R, &self.r), (Side::O, &self.o)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    L,
    R,
    O,
}

fn evaluate<F: Field>(lc: &LinearCombination<F>, wire_values: &[F]) -> F {
    lc.iter()
        .map(|(wire, coefficient)| wire_values[*wire] * coefficient)
        .sum()
}

/// Rank 1 Constraint System stored as a list of sparse constraints.
///
/// Internal wires are resolved in constraint order: a constraint may introduce at most one wire
/// that no earlier constraint (or the witness) has assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CS<F: Field> {
    nb_public: usize,
    nb_secret: usize,
    nb_internal: usize,
    constraints: Vec<Constraint<F>>,
}

impl<F: Field> R1CS<F> {
    /// `nb_public` counts the ONE wire, so it must be at least 1.
    pub fn new(nb_public: usize, nb_secret: usize, nb_internal: usize) -> Result<Self, Report> {
        if nb_public == 0 {
            bail!("R1CS needs at least the ONE public wire");
        }
        Ok(R1CS {
            nb_public,
            nb_secret,
            nb_internal,
            constraints: Vec::new(),
        })
    }

    pub fn one(&self) -> usize {
        0
    }

    /// Index of the `i`th public wire, not counting ONE.
    pub fn public(&self, i: usize) -> usize {
        debug_assert!(i + 1 < self.nb_public);
        1 + i
    }

    pub fn secret(&self, i: usize) -> usize {
        debug_assert!(i < self.nb_secret);
        self.nb_public + i
    }

    pub fn internal(&self, i: usize) -> usize {
        debug_assert!(i < self.nb_internal);
        self.nb_public + self.nb_secret + i
    }

    pub fn add_constraint(&mut self, constraint: Constraint<F>) -> Result<(), Report> {
        let nb_wires = self.nb_wires();
        if let Some((wire, _)) = constraint
            .sides()
            .into_iter()
            .flat_map(|(_, lc)| lc.iter())
            .find(|(wire, _)| *wire >= nb_wires)
        {
            return Err(report!("Constraint references an unknown wire")
                .attach(format!("wire: {}", wire))
                .attach(format!("wires in system: {}", nb_wires)));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    /// Find the single unassigned wire of `constraint`, together with the side it sits on and
    /// its summed coefficient there.
    fn unassigned_wire(
        constraint: &Constraint<F>,
        assigned: &[bool],
    ) -> Result<Option<(Side, usize, F)>, Report> {
        let mut found: Option<(Side, usize, F)> = None;
        for (side, lc) in constraint.sides() {
            for (wire, coefficient) in lc.iter().filter(|(wire, _)| !assigned[*wire]) {
                found = match found {
                    None => Some((side, *wire, *coefficient)),
                    Some((s, w, sum)) if s == side && w == *wire => Some((s, w, sum + coefficient)),
                    Some((_, w, _)) if w == *wire => {
                        return Err(report!("Wire appears on more than one side")
                            .attach(format!("wire: {}", wire)));
                    }
                    Some((_, w, _)) => {
                        return Err(report!("More than one unassigned wire")
                            .attach(format!("wires: {}, {}", w, wire)));
                    }
                };
            }
        }
        Ok(found)
    }

    fn resolve(
        constraint: &Constraint<F>,
        wire_values: &mut [F],
        assigned: &mut [bool],
    ) -> Result<(), Report> {
        let Some((side, wire, coefficient)) = Self::unassigned_wire(constraint, assigned)? else {
            return Ok(());
        };
        let coefficient_inv = coefficient
            .inverse()
            .ok_or(report!("Unassigned wire has a zero coefficient"))?;

        // The unassigned slot still holds zero, so these are the known parts.
        let l = evaluate(&constraint.l, wire_values);
        let r = evaluate(&constraint.r, wire_values);
        let o = evaluate(&constraint.o, wire_values);

        let value = match side {
            Side::O => (l * r - o) * coefficient_inv,
            Side::L => {
                let r_inv = r.inverse().ok_or(report!("Cannot divide by a zero right input"))?;
                (o * r_inv - l) * coefficient_inv
            }
            Side::R => {
                let l_inv = l.inverse().ok_or(report!("Cannot divide by a zero left input"))?;
                (o * l_inv - r) * coefficient_inv
            }
        };
        trace!("Resolved wire {} from {:?}", wire, side);
        wire_values[wire] = value;
        assigned[wire] = true;
        Ok(())
    }
}

impl<F: Field> ConstraintSystem<F> for R1CS<F> {
    fn nb_public_variables(&self) -> usize {
        self.nb_public
    }

    fn nb_secret_variables(&self) -> usize {
        self.nb_secret
    }

    fn nb_internal_variables(&self) -> usize {
        self.nb_internal
    }

    fn nb_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn solve(
        &self,
        witness: &[F],
        a: &mut [F],
        b: &mut [F],
        c: &mut [F],
        wire_values: &mut [F],
    ) -> Result<(), Report> {
        let nb_inputs = self.nb_public + self.nb_secret;
        if witness.len() + 1 != nb_inputs || wire_values.len() != self.nb_wires() {
            return Err(report!("Buffers do not match the constraint system")
                .attach(format!("witness: {}", witness.len()))
                .attach(format!("wire values: {}", wire_values.len())));
        }
        let nb_constraints = self.constraints.len();
        if a.len() != nb_constraints || b.len() != nb_constraints || c.len() != nb_constraints {
            bail!("Constraint evaluation buffers must have one slot per constraint");
        }

        wire_values.fill(F::zero());
        let mut assigned = vec![false; wire_values.len()];
        wire_values[0] = F::one();
        wire_values[1..nb_inputs].copy_from_slice(witness);
        assigned[..nb_inputs].fill(true);

        for (i, constraint) in self.constraints.iter().enumerate() {
            Self::resolve(constraint, wire_values, &mut assigned)
                .context("Resolving wire")
                .attach(format!("constraint #{}", i))?;

            a[i] = evaluate(&constraint.l, wire_values);
            b[i] = evaluate(&constraint.r, wire_values);
            c[i] = evaluate(&constraint.o, wire_values);
            if a[i] * b[i] != c[i] {
                return Err(report!("Constraint is not satisfied")
                    .attach(format!("constraint #{}", i))
                    .attach(format!("{} * {} != {}", a[i], b[i], c[i])));
            }
        }

        if let Some(wire) = assigned.iter().position(|assigned| !assigned) {
            return Err(report!("Wire is never resolved by any constraint")
                .attach(format!("wire: {}", wire)));
        }
        Ok(())
    }
}
