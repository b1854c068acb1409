//! The three validation layers run before anything is compiled: the
//! statement alone, the data alone, and the two against each other. Each
//! checker is a side-effect-free fold returning its local requirement
//! contribution; nothing is retried because invalid input stays invalid.

mod config;
mod cross;
mod inputs;

pub use config::{check_bound_config, check_proof_config};
pub use cross::{check_proof_inputs_for_config, check_revealed_claims_for_config};
pub use inputs::{check_proof_inputs, check_revealed_claims};
