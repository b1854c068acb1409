//! The publicly disclosed subset of a proof: what a verifier sees. Also
//! the redaction step deriving it from full proving-side data — a pure
//! projection; all validation has already happened upstream.

use crate::{
    config::ProofConfig,
    error::GpcError,
    inputs::ProofInputs,
    pod::{PodEntryName, PodMembershipLists, PodName, PodPublicKey, PodValue},
};
use ark_ff::PrimeField;
use ark_std::{collections::BTreeMap, vec::Vec};
use pod_gpc_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Public outputs of a proving run, as returned by the external circuit
/// backend: one revealed-value hash per entry slot (a sentinel where
/// nothing is revealed) and the owner's nullifier hash (a sentinel when no
/// nullifier is revealed). The verify-side compiler reconstructs the same
/// structure as the expected outputs.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CircuitOutputs<F: PrimeField> {
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub entry_revealed_value_hashes: Vec<F>,
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_nullifier_hash: F,
}

/// What is disclosed about one POD: its signer public key and, when at
/// least one entry is configured as revealed, exactly those entries. The
/// entries map is absent — not empty — when nothing is revealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RevealedPod<F: PrimeField> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<BTreeMap<PodEntryName, PodValue<F>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<PodPublicKey<F>>,
}

/// The owner-related disclosure: the external nullifier that was folded
/// into the proof and the resulting nullifier hash computed by the
/// circuit.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RevealedOwner<F: PrimeField> {
    pub external_nullifier: PodValue<F>,
    #[serde_as(as = "ArkObjectBytes")]
    pub nullifier_hash: F,
}

/// Everything a verifier learns besides the proof itself. Lists and the
/// watermark are public by construction and carried verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RevealedClaims<F: PrimeField> {
    pub pods: BTreeMap<PodName, RevealedPod<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<RevealedOwner<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_lists: Option<PodMembershipLists<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<PodValue<F>>,
}

/// Projects full proving-side data down to the minimal claims record a
/// verifier will see: always the signer key, only the entries configured
/// as revealed, the owner claim only when an external nullifier was
/// supplied, and the watermark only when one was supplied.
pub fn make_revealed_claims<F: PrimeField>(
    config: &ProofConfig,
    inputs: &ProofInputs<F>,
    outputs: &CircuitOutputs<F>,
) -> Result<RevealedClaims<F>, GpcError> {
    let mut pods = BTreeMap::new();
    for (pod_name, pod_config) in &config.pods {
        let pod = inputs
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcError::PodNotFound(pod_name.clone()))?;
        let mut revealed = BTreeMap::new();
        for (entry_name, entry_config) in &pod_config.entries {
            if !entry_config.is_revealed {
                continue;
            }
            let value = pod
                .entry(entry_name)
                .ok_or_else(|| crate::error::entry_not_found(pod_name, entry_name))?;
            revealed.insert(entry_name.clone(), value.clone());
        }
        pods.insert(
            pod_name.clone(),
            RevealedPod {
                entries: if revealed.is_empty() {
                    None
                } else {
                    Some(revealed)
                },
                signer_public_key: Some(pod.signer_public_key().clone()),
            },
        );
    }
    let owner = inputs.external_nullifier().map(|external_nullifier| RevealedOwner {
        external_nullifier: external_nullifier.clone(),
        nullifier_hash: outputs.owner_nullifier_hash,
    });
    Ok(RevealedClaims {
        pods,
        owner,
        membership_lists: inputs.membership_lists.clone(),
        watermark: inputs.watermark.clone(),
    })
}
