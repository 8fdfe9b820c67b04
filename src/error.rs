use thiserror::Error;

/// The ways a call to [`crate::groth16::prove`] can fail.
///
/// Errors travel inside a [`rootcause::Report`], so the underlying cause (for example the
/// constraint the solver choked on) and any attached diagnostics are kept alongside the kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProveError {
    #[error(
        "invalid witness size, got {got}, expected {expected} = {nb_public} (public - ONE_WIRE) + {nb_secret} (secret)"
    )]
    InvalidWitnessSize {
        got: usize,
        expected: usize,
        nb_public: usize,
        nb_secret: usize,
    },
    #[error("proving key does not match the constraint system")]
    InvalidProvingKey,
    #[error("constraint system could not be solved for the given witness")]
    Solve,
    #[error("failed to sample blinding scalars")]
    Randomness,
    /// A proving task panicked or hung up before handing over its result.
    #[error("proving task `{task}` failed to complete")]
    TaskFailed { task: &'static str },
}
