//! Prover-side data for one proving attempt: the concrete PODs named by
//! the statement, the prover's identity, membership lists and an optional
//! watermark. Secret material (the identity's nullifier and trapdoor
//! secrets) is zeroized on drop.

use crate::pod::{Pod, PodMembershipLists, PodName, PodValue};
use ark_ff::PrimeField;
use ark_std::collections::BTreeMap;
use pod_gpc_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The owner's nullifier and trapdoor secrets. Known only to the prover.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(bound = "")]
pub struct OwnerSecrets<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub nullifier: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub trapdoor: F,
}

/// The prover's identity as supplied by the identity provider: a public
/// commitment plus the secrets it commits to.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct OwnerIdentity<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub commitment: F,
    pub secrets: OwnerSecrets<F>,
}

/// Identity plus the optional external nullifier to fold into the proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ProofOwner<F: PrimeField> {
    pub identity: OwnerIdentity<F>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_nullifier: Option<PodValue<F>>,
}

/// Everything the prover supplies alongside a [`ProofConfig`] for one
/// proving attempt. Read-only to this crate.
///
/// [`ProofConfig`]: crate::config::ProofConfig
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ProofInputs<F: PrimeField> {
    pub pods: BTreeMap<PodName, Pod<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ProofOwner<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_lists: Option<PodMembershipLists<F>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<PodValue<F>>,
}

impl<F: PrimeField> ProofInputs<F> {
    pub fn new(pods: BTreeMap<PodName, Pod<F>>) -> Self {
        Self {
            pods,
            owner: None,
            membership_lists: None,
            watermark: None,
        }
    }

    /// The external nullifier, if one was supplied with the owner.
    pub(crate) fn external_nullifier(&self) -> Option<&PodValue<F>> {
        self.owner
            .as_ref()
            .and_then(|owner| owner.external_nullifier.as_ref())
    }
}
