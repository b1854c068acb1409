//! Descriptors for the family of general-purpose circuits and selection of
//! the smallest member able to satisfy a requirement vector. The circuits
//! themselves (witness generation, keys, SNARK backend) live elsewhere;
//! this module only knows their static capacities.

use crate::{error::GpcError, requirements::ProofRequirements};
use ark_std::{
    fmt,
    format,
    string::{String, ToString},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Qualified circuit identifier, rendered as `family_circuit`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CircuitIdentifier {
    pub family: String,
    pub circuit: String,
}

impl CircuitIdentifier {
    pub fn new(family: impl Into<String>, circuit: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            circuit: circuit.into(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, GpcError> {
        match s.split_once('_') {
            Some((family, circuit)) if !family.is_empty() && !circuit.is_empty() => Ok(Self {
                family: family.to_string(),
                circuit: circuit.to_string(),
            }),
            _ => Err(GpcError::InvalidCircuitIdentifier(s.to_string())),
        }
    }
}

impl fmt::Display for CircuitIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.family, self.circuit)
    }
}

impl TryFrom<String> for CircuitIdentifier {
    type Error = crate::config::IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).map_err(|_| crate::config::IdentifierError(s))
    }
}

impl From<CircuitIdentifier> for String {
    fn from(id: CircuitIdentifier) -> String {
        format!("{}", id)
    }
}

/// Static capacity limits of one member of a circuit family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofCircuitDesc {
    pub family: String,
    pub circuit: String,
    /// Maximum number of PODs.
    pub max_objects: usize,
    /// Maximum number of entry slots across all PODs.
    pub max_entries: usize,
    /// Maximum Merkle inclusion-path depth.
    pub merkle_max_depth: usize,
    /// Maximum number of numeric bounds checks.
    pub max_numeric_values: usize,
    /// Maximum number of membership lists.
    pub max_lists: usize,
    /// Maximum number of elements per membership list.
    pub max_list_size: usize,
    /// Fixed arity of the pairwise tuple-folding gadget.
    pub tuple_arity: usize,
    /// Maximum number of tuple-folding gadgets.
    pub max_tuples: usize,
}

impl ProofCircuitDesc {
    pub fn identifier(&self) -> CircuitIdentifier {
        CircuitIdentifier::new(self.family.clone(), self.circuit.clone())
    }

    /// Canonical size-encoded circuit name, e.g. `3o-10e-8md-4nv-2x100l-4x3t`.
    pub fn canonical_name(&self) -> String {
        format!(
            "{}o-{}e-{}md-{}nv-{}x{}l-{}x{}t",
            self.max_objects,
            self.max_entries,
            self.merkle_max_depth,
            self.max_numeric_values,
            self.max_lists,
            self.max_list_size,
            self.max_tuples,
            self.tuple_arity,
        )
    }

    /// Whether this circuit can satisfy `requirements`: every scalar
    /// capacity must cover the corresponding requirement, and the
    /// requested tuples must fit the fixed-arity gadget capacity.
    pub fn satisfies(&self, requirements: &ProofRequirements) -> bool {
        self.max_objects >= requirements.n_objects
            && self.max_entries >= requirements.n_entries
            && self.merkle_max_depth >= requirements.merkle_max_depth
            && self.max_numeric_values >= requirements.n_numeric_values
            && self.max_lists >= requirements.n_lists
            && self.max_list_size >= requirements.max_list_size
            && self.tuples_feasible(requirements)
    }

    fn tuples_feasible(&self, requirements: &ProofRequirements) -> bool {
        if requirements.tuple_arities.is_empty() {
            // No tuples requested: passes regardless of gadget arity.
            return true;
        }
        if self.tuple_arity < 2 {
            return false;
        }
        let needed: usize = requirements
            .tuple_arities
            .values()
            .map(|&arity| required_tuple_gadgets(self.tuple_arity, arity))
            .sum();
        needed <= self.max_tuples
    }
}

/// Number of fixed-arity gadgets needed to realize an application-level
/// tuple of `tuple_arity` elements when each gadget after the first folds
/// in one more element: `ceil((k - a) / (a - 1)) + 1`.
///
/// `gadget_arity` must be >= 2.
pub fn required_tuple_gadgets(gadget_arity: usize, tuple_arity: usize) -> usize {
    debug_assert!(gadget_arity >= 2);
    if tuple_arity == 0 {
        0
    } else if tuple_arity <= gadget_arity {
        1
    } else {
        1 + (tuple_arity - gadget_arity + gadget_arity - 2) / (gadget_arity - 1)
    }
}

/// An ordered circuit family, smallest member first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofCircuitFamily {
    pub name: String,
    pub circuits: Vec<ProofCircuitDesc>,
}

impl ProofCircuitFamily {
    pub fn find(&self, identifier: &CircuitIdentifier) -> Option<&ProofCircuitDesc> {
        self.circuits
            .iter()
            .find(|c| c.family == identifier.family && c.circuit == identifier.circuit)
    }
}

/// Capacity table of the default family, smallest first.
const DEFAULT_FAMILY_NAME: &str = "pod-gpc";
const DEFAULT_FAMILY_PARAMS: &[[usize; 8]] = &[
    // objects, entries, depth, numeric, lists, list size, tuple arity, tuples
    [1, 5, 6, 2, 1, 50, 3, 2],
    [3, 10, 8, 4, 2, 100, 3, 4],
    [8, 24, 10, 8, 4, 200, 4, 8],
];

/// The statically known default circuit family.
pub fn default_circuit_family() -> ProofCircuitFamily {
    let circuits = DEFAULT_FAMILY_PARAMS
        .iter()
        .map(|&[o, e, md, nv, nl, ls, ta, nt]| {
            let mut desc = ProofCircuitDesc {
                family: DEFAULT_FAMILY_NAME.to_string(),
                circuit: String::new(),
                max_objects: o,
                max_entries: e,
                merkle_max_depth: md,
                max_numeric_values: nv,
                max_lists: nl,
                max_list_size: ls,
                tuple_arity: ta,
                max_tuples: nt,
            };
            desc.circuit = desc.canonical_name();
            desc
        })
        .collect();
    ProofCircuitFamily {
        name: DEFAULT_FAMILY_NAME.to_string(),
        circuits,
    }
}

/// Returns the first (smallest) family member able to satisfy
/// `requirements`.
pub fn pick_circuit_for_requirements<'a>(
    family: &'a ProofCircuitFamily,
    requirements: &ProofRequirements,
) -> Result<&'a ProofCircuitDesc, GpcError> {
    family
        .circuits
        .iter()
        .find(|c| c.satisfies(requirements))
        .ok_or_else(|| GpcError::NoCircuitSatisfies(requirements.clone()))
}

/// Validates that the named family member exists and satisfies
/// `requirements`.
pub fn check_circuit_requirements<'a>(
    family: &'a ProofCircuitFamily,
    identifier: &CircuitIdentifier,
    requirements: &ProofRequirements,
) -> Result<&'a ProofCircuitDesc, GpcError> {
    let circuit = family
        .find(identifier)
        .ok_or_else(|| GpcError::CircuitNotFound(identifier.clone()))?;
    if !circuit.satisfies(requirements) {
        return Err(GpcError::CircuitTooSmall {
            circuit: identifier.clone(),
            requirements: requirements.clone(),
        });
    }
    Ok(circuit)
}
