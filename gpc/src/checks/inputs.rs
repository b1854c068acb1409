//! Well-formedness of the concrete data supplied for a proving or
//! verifying operation, independent of any statement.

use crate::{
    claims::RevealedClaims,
    error::GpcError,
    inputs::ProofInputs,
    pod::{PodMembershipLists, PodName},
    requirements::ProofRequirements,
};
use ark_ff::PrimeField;
use ark_std::cmp::max;

/// Checks prover-side data and derives its size requirements. Numeric
/// bounds and tuple arities are config-only concerns and stay zero/empty
/// here; the Merkle depth is what the supplied records actually need,
/// which can exceed a statement's minimum.
pub fn check_proof_inputs<F: PrimeField>(
    inputs: &ProofInputs<F>,
) -> Result<ProofRequirements, GpcError> {
    let mut merkle_max_depth = 0;
    for (pod_name, pod) in &inputs.pods {
        pod.validate(pod_name)?;
        merkle_max_depth = max(merkle_max_depth, pod.merkle_depth());
    }
    // The owner identity and any external nullifier are well-formed by
    // construction; only the lists need structural checks.
    let (n_lists, max_list_size) = check_membership_lists(inputs.membership_lists.as_ref())?;
    Ok(ProofRequirements {
        n_objects: inputs.pods.len(),
        merkle_max_depth,
        n_lists,
        max_list_size,
        ..Default::default()
    })
}

/// The claims-side counterpart of [`check_proof_inputs`]: claimed records
/// carry optional entries and signer key rather than full records, and the
/// owner claim carries an already-computed nullifier hash instead of
/// secrets.
pub fn check_revealed_claims<F: PrimeField>(
    claims: &RevealedClaims<F>,
) -> Result<ProofRequirements, GpcError> {
    for (pod_name, pod) in &claims.pods {
        if let Some(entries) = &pod.entries {
            if entries.is_empty() {
                return Err(GpcError::EmptyEntriesInClaims(pod_name.clone()));
            }
        }
    }
    let (n_lists, max_list_size) = check_membership_lists(claims.membership_lists.as_ref())?;
    Ok(ProofRequirements {
        n_objects: claims.pods.len(),
        n_lists,
        max_list_size,
        ..Default::default()
    })
}

/// Every supplied list must be non-empty and width-homogeneous: all
/// elements share one tuple arity, where a bare value has arity 1 and a
/// tuple element must have arity >= 2.
fn check_membership_lists<F: PrimeField>(
    lists: Option<&PodMembershipLists<F>>,
) -> Result<(usize, usize), GpcError> {
    let Some(lists) = lists else {
        return Ok((0, 0));
    };
    let mut max_list_size = 0;
    for (list_name, elements) in &lists.0 {
        let Some(first) = elements.first() else {
            return Err(GpcError::EmptyMembershipList(list_name.clone()));
        };
        let width = first.width();
        for element in elements {
            if element.width() != width {
                return Err(GpcError::ListWidthMismatch {
                    list: list_name.clone(),
                    expected: width,
                    actual: element.width(),
                });
            }
            if matches!(element, crate::pod::ListElement::Tuple(_)) && element.width() < 2 {
                return Err(GpcError::ListElementTooNarrow(list_name.clone()));
            }
        }
        max_list_size = max(max_list_size, elements.len());
    }
    Ok((lists.0.len(), max_list_size))
}

/// Shared by the cross-validators: the pod name sets of statement and data
/// must be identical, checked as an exact count match and then per-name
/// existence.
pub(crate) fn check_pod_name_sets<'a>(
    configured: impl ExactSizeIterator<Item = &'a PodName>,
    supplied_len: usize,
    mut contains: impl FnMut(&PodName) -> bool,
) -> Result<(), GpcError> {
    if configured.len() != supplied_len {
        return Err(GpcError::PodCountMismatch {
            configured: configured.len(),
            supplied: supplied_len,
        });
    }
    for name in configured {
        if !contains(name) {
            return Err(GpcError::PodNotFound(name.clone()));
        }
    }
    Ok(())
}
