//! How large a circuit must be to satisfy a statement and its data. Both
//! the config checker and the data checker derive one of these vectors;
//! the caller merges them bottom-up and hands the result to circuit
//! selection. Pure values, recomputed per call, never cached.

use crate::{error::GpcError, pod::TupleName};
use ark_std::{cmp::max, collections::BTreeMap};
use serde::{Deserialize, Serialize};

/// Element-wise size requirements of a proof.
///
/// Tuple arities are a config-only concept: when two vectors are merged,
/// at most one side may carry a non-empty arity map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequirements {
    pub n_objects: usize,
    pub n_entries: usize,
    pub merkle_max_depth: usize,
    pub n_numeric_values: usize,
    pub n_lists: usize,
    pub max_list_size: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tuple_arities: BTreeMap<TupleName, usize>,
}

impl ProofRequirements {
    /// Element-wise maximum of two requirement vectors.
    pub fn merge(&self, other: &Self) -> Result<Self, GpcError> {
        if !self.tuple_arities.is_empty() && !other.tuple_arities.is_empty() {
            return Err(GpcError::TupleAritiesOnBothSides);
        }
        let tuple_arities = if self.tuple_arities.is_empty() {
            other.tuple_arities.clone()
        } else {
            self.tuple_arities.clone()
        };
        Ok(Self {
            n_objects: max(self.n_objects, other.n_objects),
            n_entries: max(self.n_entries, other.n_entries),
            merkle_max_depth: max(self.merkle_max_depth, other.merkle_max_depth),
            n_numeric_values: max(self.n_numeric_values, other.n_numeric_values),
            n_lists: max(self.n_lists, other.n_lists),
            max_list_size: max(self.max_list_size, other.max_list_size),
            tuple_arities,
        })
    }
}
