//! Mutual satisfaction of a statement and its data: every configured
//! reference resolves, every bound is met, every equality and membership
//! holds, and ownership/nullifier preconditions are satisfied. The
//! prove-side variant works against full records; the verify-side variant
//! works against redacted claims and is asymmetric — a claims object may
//! never disclose more, or less, than the bound config permits.

use super::inputs::check_pod_name_sets;
use crate::{
    claims::RevealedClaims,
    config::{
        derive_list_configs, BoundConfig, EntryIdentifier, EntryRef, ListComparison, ProofConfig,
    },
    error::GpcError,
    inputs::ProofInputs,
    pod::{PodHasher, PodMembershipLists, PodValue},
};
use ark_ff::PrimeField;
use ark_std::{vec, vec::Vec};

/// Checks full prover-side data against a statement.
pub fn check_proof_inputs_for_config<F: PrimeField, H: PodHasher<F>>(
    config: &ProofConfig,
    inputs: &ProofInputs<F>,
) -> Result<(), GpcError> {
    check_pod_name_sets(config.pods.keys(), inputs.pods.len(), |name| {
        inputs.pods.contains_key(name)
    })?;
    for (pod_name, pod_config) in &config.pods {
        let pod = inputs
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcError::PodNotFound(pod_name.clone()))?;
        for (entry_name, entry_config) in &pod_config.entries {
            let id = EntryIdentifier::entry(pod_name.clone(), entry_name.clone());
            let value = pod
                .entry(entry_name)
                .ok_or_else(|| GpcError::EntryNotFound(id.clone()))?;
            if entry_config.is_owner_id {
                let owner = inputs
                    .owner
                    .as_ref()
                    .ok_or_else(|| GpcError::OwnerInputMissing(id.clone()))?;
                match value {
                    PodValue::Cryptographic(c) => {
                        if *c != owner.identity.commitment {
                            return Err(GpcError::OwnerCommitmentMismatch(id.clone()));
                        }
                    }
                    _ => return Err(GpcError::OwnerCommitmentKind(id.clone())),
                }
            }
            if let Some(other) = &entry_config.equals_entry {
                let other_value = resolve_input_value(inputs, other)?;
                if H::value_hash(value) != H::value_hash(&other_value) {
                    return Err(GpcError::EntriesNotEqual {
                        entry: id.clone(),
                        other: other.clone(),
                    });
                }
            }
            if let Some(range) = &entry_config.in_range {
                match value {
                    PodValue::Int(v) => {
                        if *v < range.min || *v > range.max {
                            return Err(GpcError::ValueOutOfRange {
                                entry: id,
                                value: *v,
                                min: range.min,
                                max: range.max,
                            });
                        }
                    }
                    _ => return Err(GpcError::ValueNotNumeric(id)),
                }
            }
        }
    }
    // A nullifier without an owner entry would leave the owner
    // unconstrained and the nullifier meaningless.
    if inputs.external_nullifier().is_some() && !config.has_owner_entry() {
        return Err(GpcError::NullifierWithoutOwner);
    }
    check_lists_for_config::<F, H, _>(config, inputs.membership_lists.as_ref(), |id| {
        resolve_input_value(inputs, id).map(Some)
    })
}

/// Checks redacted claims against a bound config. Value-level checks run
/// only where the operands are actually public; the disclosure shape is
/// checked in both directions.
pub fn check_revealed_claims_for_config<F: PrimeField, H: PodHasher<F>>(
    bound: &BoundConfig,
    claims: &RevealedClaims<F>,
) -> Result<(), GpcError> {
    let config = bound.config();
    check_pod_name_sets(config.pods.keys(), claims.pods.len(), |name| {
        claims.pods.contains_key(name)
    })?;
    for (pod_name, pod_config) in &config.pods {
        let claimed = claims
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcError::PodNotFound(pod_name.clone()))?;
        if claimed.signer_public_key.is_none() {
            return Err(GpcError::SignerKeyMissingFromClaims(pod_name.clone()));
        }
        for (entry_name, entry_config) in &pod_config.entries {
            let id = EntryIdentifier::entry(pod_name.clone(), entry_name.clone());
            let claimed_value = claimed
                .entries
                .as_ref()
                .and_then(|entries| entries.get(entry_name));
            if entry_config.is_revealed && claimed_value.is_none() {
                return Err(GpcError::RevealedEntryMissingFromClaims(id));
            }
            if !entry_config.is_revealed && claimed_value.is_some() {
                return Err(GpcError::ExtraEntryInClaims(id));
            }
            let Some(value) = claimed_value else { continue };
            if let Some(other) = &entry_config.equals_entry {
                if let Some(other_value) = resolve_claim_value(claims, other)? {
                    if H::value_hash(value) != H::value_hash(&other_value) {
                        return Err(GpcError::EntriesNotEqual {
                            entry: id.clone(),
                            other: other.clone(),
                        });
                    }
                }
            }
            if let Some(range) = &entry_config.in_range {
                match value {
                    PodValue::Int(v) => {
                        if *v < range.min || *v > range.max {
                            return Err(GpcError::ValueOutOfRange {
                                entry: id,
                                value: *v,
                                min: range.min,
                                max: range.max,
                            });
                        }
                    }
                    _ => return Err(GpcError::ValueNotNumeric(id)),
                }
            }
        }
        // The reverse direction: nothing may be disclosed that the config
        // did not configure.
        if let Some(entries) = &claimed.entries {
            for entry_name in entries.keys() {
                if pod_config.entries.get(entry_name).is_none() {
                    return Err(GpcError::ExtraEntryInClaims(EntryIdentifier::entry(
                        pod_name.clone(),
                        entry_name.clone(),
                    )));
                }
            }
        }
    }
    if claims.owner.is_some() && !config.has_owner_entry() {
        return Err(GpcError::NullifierWithoutOwner);
    }
    check_lists_for_config::<F, H, _>(config, claims.membership_lists.as_ref(), |id| {
        resolve_claim_value(claims, id)
    })
}

/// Resolves a qualified identifier against full prover-side data. The
/// virtual forms read the record itself and need no entry lookup.
pub(crate) fn resolve_input_value<F: PrimeField>(
    inputs: &ProofInputs<F>,
    id: &EntryIdentifier,
) -> Result<PodValue<F>, GpcError> {
    let pod = inputs
        .pods
        .get(&id.pod)
        .ok_or_else(|| GpcError::PodNotFound(id.pod.clone()))?;
    match &id.entry {
        EntryRef::Entry(name) => pod
            .entry(name)
            .cloned()
            .ok_or_else(|| GpcError::EntryNotFound(id.clone())),
        EntryRef::SignerPublicKey => Ok(PodValue::PublicKey(pod.signer_public_key().clone())),
        EntryRef::ContentId => Ok(PodValue::Cryptographic(pod.content_id())),
    }
}

/// Resolves a qualified identifier against claims. Returns `None` where
/// the value is simply not public: an unrevealed entry or a content
/// commitment, which is never disclosed.
pub(crate) fn resolve_claim_value<F: PrimeField>(
    claims: &RevealedClaims<F>,
    id: &EntryIdentifier,
) -> Result<Option<PodValue<F>>, GpcError> {
    let pod = claims
        .pods
        .get(&id.pod)
        .ok_or_else(|| GpcError::PodNotFound(id.pod.clone()))?;
    Ok(match &id.entry {
        EntryRef::Entry(name) => pod
            .entries
            .as_ref()
            .and_then(|entries| entries.get(name))
            .cloned(),
        EntryRef::SignerPublicKey => pod
            .signer_public_key
            .clone()
            .map(PodValue::PublicKey),
        EntryRef::ContentId => None,
    })
}

/// The configured and supplied list-name sets must be identical, and each
/// resolvable comparison value must hit (membership) or miss
/// (non-membership) its list. Width mismatches between comparison and
/// elements are type errors.
fn check_lists_for_config<F, H, R>(
    config: &ProofConfig,
    supplied: Option<&PodMembershipLists<F>>,
    resolve: R,
) -> Result<(), GpcError>
where
    F: PrimeField,
    H: PodHasher<F>,
    R: Fn(&EntryIdentifier) -> Result<Option<PodValue<F>>, GpcError>,
{
    let list_configs = derive_list_configs(config)?;
    let configured_names: Vec<_> = list_configs.keys().cloned().collect();
    let supplied_names: Vec<_> = supplied
        .map(|lists| lists.0.keys().cloned().collect())
        .unwrap_or_default();
    // Both maps iterate sorted, so equality of the collected names is
    // equality of the sets.
    if configured_names != supplied_names {
        return Err(GpcError::ListNameSetMismatch {
            configured: configured_names,
            supplied: supplied_names,
        });
    }
    let Some(supplied) = supplied else {
        return Ok(());
    };
    for (list_name, list_config) in &list_configs {
        let elements = supplied
            .0
            .get(list_name)
            .ok_or_else(|| GpcError::ListNameSetMismatch {
                configured: configured_names.clone(),
                supplied: supplied_names.clone(),
            })?;
        let comparison = match &list_config.comparison {
            ListComparison::Entry(id) => resolve(id)?.map(|value| vec![value]),
            ListComparison::Tuple(tuple_name) => {
                let tuple = config
                    .tuples
                    .get(tuple_name)
                    .ok_or_else(|| GpcError::TupleNotFound(tuple_name.clone()))?;
                let mut values = Vec::with_capacity(tuple.entries.len());
                for member in &tuple.entries {
                    match resolve(member)? {
                        Some(value) => values.push(value),
                        None => {
                            values.clear();
                            break;
                        }
                    }
                }
                if values.is_empty() { None } else { Some(values) }
            }
        };
        // On the verify side a hidden comparison value is not checkable.
        let Some(comparison) = comparison else {
            continue;
        };
        for element in elements {
            if element.width() != comparison.len() {
                return Err(GpcError::ComparisonWidthMismatch {
                    list: list_name.clone(),
                    comparison: comparison.len(),
                    element: element.width(),
                });
            }
        }
        let comparison_hashes: Vec<F> = comparison.iter().map(|v| H::value_hash(v)).collect();
        let hit = elements.iter().any(|element| {
            itertools::equal(
                element.values().iter().map(|v| H::value_hash(v)),
                comparison_hashes.iter().copied(),
            )
        });
        if list_config.membership && !hit {
            return Err(GpcError::ListMembershipViolated(list_name.clone()));
        }
        if !list_config.membership && hit {
            return Err(GpcError::ListNonMembershipViolated(list_name.clone()));
        }
    }
    Ok(())
}
