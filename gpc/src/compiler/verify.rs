//! The verifying direction: the public input signals a verifier feeds the
//! circuit, reconstructed from the bound config and the revealed claims
//! alone, plus the expected public outputs the external verifier's result
//! must match.

use super::{
    flag, layout_config, list_signals, numeric_bound_signals, sentinel, tuple_signals,
};
use crate::{
    checks::{check_bound_config, check_revealed_claims},
    circuit::ProofCircuitDesc,
    claims::{CircuitOutputs, RevealedClaims},
    config::BoundConfig,
    error::GpcError,
    pod::PodHasher,
};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, start_timer, vec, vec::Vec};
use pod_gpc_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Flat public-input arrays for the verifying direction. Everything here
/// is derivable from the bound config and the claims; no witness data
/// appears.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct VerifySignals<F: PrimeField> {
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signer_pubkey_x: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub object_signer_pubkey_y: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_object_index: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_name_hashes: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_is_value_hash_revealed: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_equal_to_other_entry_by_index: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_value_entry_indexes: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_min_values: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub numeric_max_values: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub list_comparison_value_indexes: Vec<F>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub list_contains_comparison_value: Vec<F>,
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub list_valid_values: Vec<Vec<F>>,
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub tuple_indexes: Vec<Vec<F>>,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_entry_index: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_external_nullifier: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_is_nullifier_hash_revealed: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub global_watermark: F,
}

/// Reconstructs the circuit's public inputs and its expected public
/// outputs from a bound config and revealed claims, so the caller can
/// compare the expectation against what the external verifier actually
/// returns.
pub fn compile_verify_config<F: PrimeField, H: PodHasher<F>>(
    bound: &BoundConfig,
    claims: &RevealedClaims<F>,
    circuit: &ProofCircuitDesc,
) -> Result<(VerifySignals<F>, CircuitOutputs<F>), GpcError> {
    let timer = start_timer!(|| "compile verify signals");
    let requirements =
        check_bound_config(bound)?.merge(&check_revealed_claims(claims)?)?;
    if !circuit.satisfies(&requirements) {
        return Err(GpcError::CircuitTooSmall {
            circuit: circuit.identifier(),
            requirements,
        });
    }
    // The claims are only meaningful against the circuit the config was
    // bound to.
    if let Some(pinned) = bound.circuit_identifier() {
        if *pinned != circuit.identifier() {
            return Err(GpcError::CircuitMismatch {
                pinned: pinned.clone(),
                compiled: circuit.identifier(),
            });
        }
    }
    let config = bound.config();
    let layout = layout_config(config, circuit)?;

    let mut object_signer_pubkey_x = Vec::with_capacity(circuit.max_objects);
    let mut object_signer_pubkey_y = Vec::with_capacity(circuit.max_objects);
    for pod_name in &layout.pods {
        let claimed = claims
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcError::PodNotFound(pod_name.clone()))?;
        let key = claimed
            .signer_public_key
            .as_ref()
            .ok_or_else(|| GpcError::SignerKeyMissingFromClaims(pod_name.clone()))?;
        object_signer_pubkey_x.push(key.x);
        object_signer_pubkey_y.push(key.y);
    }
    let first_x = object_signer_pubkey_x[0];
    let first_y = object_signer_pubkey_y[0];
    object_signer_pubkey_x.resize(circuit.max_objects, first_x);
    object_signer_pubkey_y.resize(circuit.max_objects, first_y);

    let mut entry_object_index = Vec::with_capacity(circuit.max_entries);
    let mut entry_name_hashes = Vec::with_capacity(circuit.max_entries);
    let mut entry_is_value_hash_revealed = Vec::with_capacity(circuit.max_entries);
    let mut entry_points_to = Vec::with_capacity(circuit.max_entries);
    // Expected outputs: one revealed-value hash per entry slot, sentinel
    // where nothing is revealed.
    let mut entry_revealed_value_hashes = vec![sentinel::<F>(); circuit.max_entries];
    for (slot_index, slot) in layout.entries.iter().enumerate() {
        entry_object_index.push(F::from(slot.object_index as u64));
        // The verifier has no records; entry name hashes are recomputed
        // from the config.
        entry_name_hashes.push(H::name_hash(&slot.entry));
        entry_is_value_hash_revealed.push(flag(slot.is_revealed));
        entry_points_to.push(F::from(slot.points_to as u64));
        if slot.is_revealed {
            let value = claims
                .pods
                .get(&slot.pod)
                .and_then(|pod| pod.entries.as_ref())
                .and_then(|entries| entries.get(&slot.entry))
                .ok_or_else(|| {
                    GpcError::RevealedEntryMissingFromClaims(
                        crate::config::EntryIdentifier::entry(
                            slot.pod.clone(),
                            slot.entry.clone(),
                        ),
                    )
                })?;
            entry_revealed_value_hashes[slot_index] = H::value_hash(value);
        }
    }
    for spare in layout.entries.len()..circuit.max_entries {
        entry_object_index.push(entry_object_index[0]);
        entry_name_hashes.push(entry_name_hashes[0]);
        entry_is_value_hash_revealed.push(F::zero());
        entry_points_to.push(F::from(spare as u64));
    }

    let (numeric_value_entry_indexes, numeric_min_values, numeric_max_values) =
        numeric_bound_signals(&layout, circuit);
    let (list_comparison_value_indexes, list_contains_comparison_value, list_valid_values) =
        list_signals::<F, H>(&layout, claims.membership_lists.as_ref(), circuit)?;
    let tuple_indexes = tuple_signals(&layout, circuit);

    if claims.owner.is_some() && layout.first_owner.is_none() {
        return Err(GpcError::NullifierWithoutOwner);
    }
    let owner_entry_index = layout
        .first_owner
        .map(|slot| F::from(slot as u64))
        .unwrap_or_else(sentinel);
    let owner_external_nullifier = claims
        .owner
        .as_ref()
        .map(|owner| H::value_hash(&owner.external_nullifier))
        .unwrap_or_else(F::zero);
    let owner_is_nullifier_hash_revealed = flag(claims.owner.is_some());
    let owner_nullifier_hash = claims
        .owner
        .as_ref()
        .map(|owner| owner.nullifier_hash)
        .unwrap_or_else(sentinel);

    let global_watermark = claims
        .watermark
        .as_ref()
        .map(|value| H::value_hash(value))
        .unwrap_or_else(F::zero);

    let signals = VerifySignals {
        object_signer_pubkey_x,
        object_signer_pubkey_y,
        entry_object_index,
        entry_name_hashes,
        entry_is_value_hash_revealed,
        entry_equal_to_other_entry_by_index: entry_points_to,
        numeric_value_entry_indexes,
        numeric_min_values,
        numeric_max_values,
        list_comparison_value_indexes,
        list_contains_comparison_value,
        list_valid_values,
        tuple_indexes,
        owner_entry_index,
        owner_external_nullifier,
        owner_is_nullifier_hash_revealed,
        global_watermark,
    };
    let outputs = CircuitOutputs {
        entry_revealed_value_hashes,
        owner_nullifier_hash,
    };
    end_timer!(timer);
    Ok((signals, outputs))
}
