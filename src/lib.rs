//! # WARNING
//! This library was made for purely academic purposes, and has not been audited for security!
//! Don't use this in production!
//!# Groth16 prover
//!
//!This crate provides a parallel Groth16 prover over a Rank 1 Constraint System, given a proving key produced by some
//!trusted setup.
//!
//!The implementation is type generic over any curve that implements `ark_ec::Pairing`, and is tested in this library with
//!BLS12-381 and MNT6-753.
//!
//!Errors are handled using the `rootcause` crate. Every failure of `groth16::prove` is a `Report<error::ProveError>`,
//!whose context tells the kind of failure while attachments and children carry the details (for example the
//!constraint the solver choked on).
//!
//!The core types are `circuits::R1CS`, `key::ProvingKey`, `groth16::Proof` and `config::ProverConfig`.
//!
//!The general flow is:
//!
//!- Define the R1CS, or implement `circuits::ConstraintSystem` for your own
//!- Load a `ProvingKey` matching it, and check it with `ProvingKey::validate`
//!- Generate a proof using `prove(&r1cs, &pk, &witness, false)`, where the witness is the public values without ONE
//!  followed by the secret values
//!
//!Proving solves the R1CS, computes the quotient `H` with FFTs over a subgroup and its coset, then runs the multi-scalar
//!multiplications for `Ar`, `Bs` and `Krs` on their own threads. The number of MSM chunks running at once is bounded
//!by `ProverConfig::cpus`, and the data parallel work runs on a rayon pool owned by the prover, so `prove` may be called
//!from any thread, rayon workers included. Progress and timings are logged through `log`.
//!

/// Blinding scalars drawn fresh for every proof.
pub mod blinding;
/// Contains the constraint system trait and a concrete R1CS with its solver.
pub mod circuits;
/// Tuning of the prover.
pub mod config;
/// Identifiers for the supported curves.
pub mod curve;
/// The FFT domain and its coset.
pub mod domain;
/// The ways proving can fail.
pub mod error;
/// Contains the proof type and the proving algorithm.
pub mod groth16;
/// Contains the proving key.
pub mod key;
/// Multi-scalar multiplication under a shared CPU budget.
pub mod msm;
mod pool;
/// The quotient polynomial `H`.
pub mod quotient;

#[cfg(test)]
mod testing;

pub use error::ProveError;
pub use groth16::{Proof, prove, prove_with};
