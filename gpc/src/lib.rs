#![cfg_attr(not(feature = "std"), no_std)]

//! The goal of this crate is to let a holder of signed, Merkle-committed
//! data objects (PODs) prove configurable statements about their contents
//! — which entries are revealed, equal across records, within numeric
//! bounds, members or non-members of a disclosed list, or bound to the
//! prover's identity commitment — on a small family of general-purpose
//! circuits instead of one fixed circuit per statement shape.
//!
//! The statement is a declarative [`ProofConfig`]; the data is a set of
//! [`ProofInputs`] on the proving side or redacted [`RevealedClaims`] on
//! the verifying side. This crate validates both, checks them against each
//! other, sizes and selects a circuit, and lowers everything into the
//! flat signal arrays the circuit expects. The circuits themselves, the
//! POD encoding and signature scheme, and the identity scheme are external
//! collaborators; nothing here proves, verifies, hashes or signs.
//!
//! A proving flow goes:
//! - [`check_proof_config`] and [`check_proof_inputs`] validate each side
//!   alone and derive its [`ProofRequirements`],
//! - the two requirement vectors are [merged](ProofRequirements::merge),
//! - [`check_proof_inputs_for_config`] validates the pair,
//! - [`pick_circuit_for_requirements`] selects the smallest capable
//!   circuit (or [`check_circuit_requirements`] validates a pinned one),
//! - [`compile_proof_config`] produces the witness signals for the
//!   external prover, and
//! - [`make_revealed_claims`] projects the minimal public claims from the
//!   prover's outputs.
//!
//! The verifier repeats the same steps from the [`BoundConfig`] and the
//! claims, with [`compile_verify_config`] reconstructing the public
//! inputs and the expected outputs to compare against the external
//! verifier's result.
//!
//! All checks fail fast on the first problem, classified by cause via
//! [`GpcError::kind`]. Everything is a pure, synchronous computation over
//! caller-owned data; calls may run fully in parallel.
//!
//! See `tests/` for end-to-end proving/verifying round trips.
//!
//! [`ProofConfig`]: crate::config::ProofConfig
//! [`BoundConfig`]: crate::config::BoundConfig
//! [`ProofInputs`]: crate::inputs::ProofInputs
//! [`RevealedClaims`]: crate::claims::RevealedClaims
//! [`ProofRequirements`]: crate::requirements::ProofRequirements
//! [`GpcError::kind`]: crate::error::GpcError::kind
//! [`check_proof_config`]: crate::checks::check_proof_config
//! [`check_proof_inputs`]: crate::checks::check_proof_inputs
//! [`check_proof_inputs_for_config`]: crate::checks::check_proof_inputs_for_config
//! [`pick_circuit_for_requirements`]: crate::circuit::pick_circuit_for_requirements
//! [`check_circuit_requirements`]: crate::circuit::check_circuit_requirements
//! [`compile_proof_config`]: crate::compiler::compile_proof_config
//! [`compile_verify_config`]: crate::compiler::compile_verify_config
//! [`make_revealed_claims`]: crate::claims::make_revealed_claims

pub mod checks;
pub mod circuit;
pub mod claims;
pub mod compiler;
pub mod config;
pub mod error;
pub mod inputs;
pub mod pod;
pub mod requirements;

pub mod prelude {
    pub use crate::checks::*;
    pub use crate::circuit::*;
    pub use crate::claims::*;
    pub use crate::compiler::{
        compile_proof_config, compile_verify_config, ProofSignals, VerifySignals,
    };
    pub use crate::config::*;
    pub use crate::error::{GpcError, GpcErrorKind};
    pub use crate::inputs::*;
    pub use crate::pod::*;
    pub use crate::requirements::ProofRequirements;
}
