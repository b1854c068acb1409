//! The proving direction: everything the circuit needs as witness,
//! including per-record signatures, per-entry Merkle inclusion paths and
//! the owner's secrets. Plaintext enters the circuit only for owner
//! entries; every other entry is constrained at the hash level.

use super::{
    flag, layout_config, list_signals, numeric_bound_signals, sentinel, tuple_signals,
};
use crate::{
    checks::{check_proof_config, check_proof_inputs},
    circuit::ProofCircuitDesc,
    config::ProofConfig,
    error::GpcError,
    inputs::ProofInputs,
    pod::{PodHasher, PodValue},
};
use ark_ff::{One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, start_timer, vec::Vec};
use pod_gpc_utils::{ff::i64_to_field, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Flat witness arrays for the proving direction, padded to the chosen
/// circuit's capacities.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct ProofSignals<F: PrimeField> {
    // Per-object signals.
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_content_ids: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signer_pubkey_x: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signer_pubkey_y: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signature_r8x: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signature_r8y: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signature_s: Vec<F>,
    // Per-entry signals.
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_object_index: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_name_hashes: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_is_value_enabled: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_values: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_is_value_hash_revealed: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_equal_to_other_entry_by_index: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_proof_depth: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_proof_index: Vec<F>,
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub entry_proof_siblings: Vec<Vec<F>>,
    // Numeric bounds checks.
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_value_entry_indexes: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_values: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_min_values: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_max_values: Vec<F>,
    // Membership lists.
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub list_comparison_value_indexes: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub list_contains_comparison_value: Vec<F>,
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub list_valid_values: Vec<Vec<F>>,
    // Tuple-gadget rows.
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub tuple_indexes: Vec<Vec<F>>,
    // Owner module.
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_entry_index: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_nullifier_secret: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_trapdoor_secret: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_external_nullifier: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_is_nullifier_hash_revealed: F,
    // Whole-proof watermark.
    #[serde_as(as = "ArkObjectBytes")]
    pub global_watermark: F,
}

/// Lowers a statement and full prover-side data onto `circuit`. The
/// inputs are expected to have passed the cross-validator; the statement
/// and data are still re-checked against the circuit's capacities here so
/// a too-small circuit fails cleanly instead of overflowing a slot.
pub fn compile_proof_config<F: PrimeField, H: PodHasher<F>>(
    config: &ProofConfig,
    inputs: &ProofInputs<F>,
    circuit: &ProofCircuitDesc,
) -> Result<ProofSignals<F>, GpcError> {
    let timer = start_timer!(|| "compile proof signals");
    let requirements =
        check_proof_config(config)?.merge(&check_proof_inputs(inputs)?)?;
    if !circuit.satisfies(&requirements) {
        return Err(GpcError::CircuitTooSmall {
            circuit: circuit.identifier(),
            requirements,
        });
    }
    let layout = layout_config(config, circuit)?;

    // Per-object signals, padded by duplicating object 0.
    let mut object_content_ids = Vec::with_capacity(circuit.max_objects);
    let mut object_signer_pubkey_x = Vec::with_capacity(circuit.max_objects);
    let mut object_signer_pubkey_y = Vec::with_capacity(circuit.max_objects);
    let mut object_signature_r8x = Vec::with_capacity(circuit.max_objects);
    let mut object_signature_r8y = Vec::with_capacity(circuit.max_objects);
    let mut object_signature_s = Vec::with_capacity(circuit.max_objects);
    for pod_name in &layout.pods {
        let pod = inputs
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcError::PodNotFound(pod_name.clone()))?;
        object_content_ids.push(pod.content_id());
        object_signer_pubkey_x.push(pod.signer_public_key().x);
        object_signer_pubkey_y.push(pod.signer_public_key().y);
        object_signature_r8x.push(pod.signature().r8x);
        object_signature_r8y.push(pod.signature().r8y);
        object_signature_s.push(pod.signature().s);
    }
    for signals in [
        &mut object_content_ids,
        &mut object_signer_pubkey_x,
        &mut object_signer_pubkey_y,
        &mut object_signature_r8x,
        &mut object_signature_r8y,
        &mut object_signature_s,
    ] {
        let first = signals[0];
        signals.resize(circuit.max_objects, first);
    }

    // Per-entry signals.
    let mut entry_object_index = Vec::with_capacity(circuit.max_entries);
    let mut entry_name_hashes = Vec::with_capacity(circuit.max_entries);
    let mut entry_is_value_enabled = Vec::with_capacity(circuit.max_entries);
    let mut entry_values = Vec::with_capacity(circuit.max_entries);
    let mut entry_is_value_hash_revealed = Vec::with_capacity(circuit.max_entries);
    let mut entry_points_to = Vec::with_capacity(circuit.max_entries);
    let mut entry_proof_depth = Vec::with_capacity(circuit.max_entries);
    let mut entry_proof_index = Vec::with_capacity(circuit.max_entries);
    let mut entry_proof_siblings = Vec::with_capacity(circuit.max_entries);
    for slot in &layout.entries {
        let pod = inputs
            .pods
            .get(&slot.pod)
            .ok_or_else(|| GpcError::PodNotFound(slot.pod.clone()))?;
        let proof = pod
            .entry_proof(&slot.entry)
            .ok_or_else(|| crate::error::entry_not_found(&slot.pod, &slot.entry))?;
        entry_object_index.push(F::from(slot.object_index as u64));
        entry_name_hashes.push(proof.name_hash);
        // Plaintext enters the circuit only for the owner entry, whose
        // value must equal the identity commitment.
        if slot.is_owner {
            let value = pod
                .entry(&slot.entry)
                .ok_or_else(|| crate::error::entry_not_found(&slot.pod, &slot.entry))?;
            let commitment = match value {
                PodValue::Cryptographic(c) => *c,
                _ => {
                    return Err(GpcError::OwnerCommitmentKind(
                        crate::config::EntryIdentifier::entry(
                            slot.pod.clone(),
                            slot.entry.clone(),
                        ),
                    ))
                }
            };
            entry_is_value_enabled.push(F::one());
            entry_values.push(commitment);
        } else {
            entry_is_value_enabled.push(F::zero());
            entry_values.push(F::zero());
        }
        entry_is_value_hash_revealed.push(flag(slot.is_revealed));
        entry_points_to.push(F::from(slot.points_to as u64));
        entry_proof_depth.push(F::from(proof.depth() as u64));
        entry_proof_index.push(F::from(proof.leaf_index));
        let mut siblings = proof.siblings.clone();
        siblings.resize(circuit.merkle_max_depth, F::zero());
        entry_proof_siblings.push(siblings);
    }
    // Spare entry slots duplicate slot 0 with all flags disabled and a
    // self-referential equality index.
    for spare in layout.entries.len()..circuit.max_entries {
        entry_object_index.push(entry_object_index[0]);
        entry_name_hashes.push(entry_name_hashes[0]);
        entry_is_value_enabled.push(F::zero());
        entry_values.push(entry_values[0]);
        entry_is_value_hash_revealed.push(F::zero());
        entry_points_to.push(F::from(spare as u64));
        entry_proof_depth.push(entry_proof_depth[0]);
        entry_proof_index.push(entry_proof_index[0]);
        entry_proof_siblings.push(entry_proof_siblings[0].clone());
    }

    // Numeric bounds: the separate plaintext block linked to entries by
    // index.
    let (numeric_value_entry_indexes, numeric_min_values, numeric_max_values) =
        numeric_bound_signals(&layout, circuit);
    let mut numeric_values = Vec::with_capacity(circuit.max_numeric_values);
    for slot in &layout.numeric {
        let entry = &layout.entries[slot.entry_slot];
        let pod = inputs
            .pods
            .get(&entry.pod)
            .ok_or_else(|| GpcError::PodNotFound(entry.pod.clone()))?;
        let value = pod
            .entry(&entry.entry)
            .ok_or_else(|| crate::error::entry_not_found(&entry.pod, &entry.entry))?;
        match value {
            PodValue::Int(v) => numeric_values.push(i64_to_field(*v)),
            _ => {
                return Err(GpcError::ValueNotNumeric(
                    crate::config::EntryIdentifier::entry(
                        entry.pod.clone(),
                        entry.entry.clone(),
                    ),
                ))
            }
        }
    }
    numeric_values.resize(circuit.max_numeric_values, F::zero());

    let (list_comparison_value_indexes, list_contains_comparison_value, list_valid_values) =
        list_signals::<F, H>(&layout, inputs.membership_lists.as_ref(), circuit)?;
    let tuple_indexes = tuple_signals(&layout, circuit);

    // Owner module: disabled entirely via the sentinel index when no
    // entry is bound to the prover's identity.
    let (owner_entry_index, owner_nullifier_secret, owner_trapdoor_secret) =
        match layout.first_owner {
            Some(slot) => {
                let owner = inputs.owner.as_ref().ok_or_else(|| {
                    GpcError::OwnerInputMissing(crate::config::EntryIdentifier::entry(
                        layout.entries[slot].pod.clone(),
                        layout.entries[slot].entry.clone(),
                    ))
                })?;
                (
                    F::from(slot as u64),
                    owner.identity.secrets.nullifier,
                    owner.identity.secrets.trapdoor,
                )
            }
            None => (sentinel(), F::zero(), F::zero()),
        };
    let external_nullifier = inputs.external_nullifier();
    let owner_external_nullifier = external_nullifier
        .map(|value| H::value_hash(value))
        .unwrap_or_else(F::zero);
    let owner_is_nullifier_hash_revealed =
        flag(layout.first_owner.is_some() && external_nullifier.is_some());

    let global_watermark = inputs
        .watermark
        .as_ref()
        .map(|value| H::value_hash(value))
        .unwrap_or_else(F::zero);

    let signals = ProofSignals {
        object_content_ids,
        object_signer_pubkey_x,
        object_signer_pubkey_y,
        object_signature_r8x,
        object_signature_r8y,
        object_signature_s,
        entry_object_index,
        entry_name_hashes,
        entry_is_value_enabled,
        entry_values,
        entry_is_value_hash_revealed,
        entry_equal_to_other_entry_by_index: entry_points_to,
        entry_proof_depth,
        entry_proof_index,
        entry_proof_siblings,
        numeric_value_entry_indexes,
        numeric_values,
        numeric_min_values,
        numeric_max_values,
        list_comparison_value_indexes,
        list_contains_comparison_value,
        list_valid_values,
        tuple_indexes,
        owner_entry_index,
        owner_nullifier_secret,
        owner_trapdoor_secret,
        owner_external_nullifier,
        owner_is_nullifier_hash_revealed,
        global_watermark,
    };
    end_timer!(timer);
    Ok(signals)
}
