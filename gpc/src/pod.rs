//! The decoded form of a POD — an externally signed, Merkle-committed set
//! of named typed values — together with the name newtypes and the hashing
//! seam used throughout the crate.
//!
//! Nothing here hashes, signs or verifies. The signed-record provider
//! decodes its wire representation into a [`Pod`]: plaintext entries, the
//! content commitment, the signer public key and signature as field-element
//! coordinates, and one Merkle inclusion bundle per entry. This crate only
//! re-checks that the decoded pieces are mutually consistent.

use crate::error::GpcError;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    collections::BTreeMap,
    fmt,
    format,
    string::{String, ToString},
    vec::Vec,
};
use pod_gpc_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Smallest value representable by the integer value kind.
pub const POD_INT_MIN: i64 = i64::MIN;
/// Largest value representable by the integer value kind.
pub const POD_INT_MAX: i64 = i64::MAX;

/// Raised when a string does not satisfy the name grammar
/// `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameError(pub String);

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid name: {}", self.0)
    }
}

fn check_name(s: &str) -> Result<(), NameError> {
    let mut chars = s.chars();
    let ok = match chars.next() {
        Some(c) => {
            (c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if ok {
        Ok(())
    } else {
        Err(NameError(s.to_string()))
    }
}

macro_rules! impl_name_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Result<Self, NameError> {
                let s = s.into();
                check_name(&s)?;
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = NameError;

            fn try_from(s: String) -> Result<Self, NameError> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = NameError;

            fn try_from(s: &str) -> Result<Self, NameError> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(n: $name) -> String {
                n.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_name_type!(
    /// Name of one POD within a proof. Lexicographic order of these names is
    /// the canonical object order during compilation.
    PodName
);
impl_name_type!(
    /// Name of one entry within a POD.
    PodEntryName
);
impl_name_type!(
    /// Name of a membership list.
    PodListName
);
impl_name_type!(
    /// Name of a tuple of entries treated as one composite value.
    TupleName
);

/// A signer public key decoded to its two curve coordinates.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PodPublicKey<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub x: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub y: F,
}

/// A signature over a POD's content commitment, decoded to field elements.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PodSignature<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub r8x: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub r8y: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: F,
}

/// One typed value within a POD. String-like kinds participate in equality
/// and membership checks through their content hash; only [`PodValue::Int`]
/// participates in bounds checks.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum PodValue<F: PrimeField> {
    Int(i64),
    Cryptographic(#[serde_as(as = "ArkObjectBytes")] F),
    String(String),
    Bytes(Vec<u8>),
    PublicKey(PodPublicKey<F>),
}

/// Merkle inclusion bundle for one entry, as produced by the signed-record
/// provider: the hashed name/value leaves, the leaf position of the name
/// leaf, and the sibling path up to the root.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PodEntryProof<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub name_hash: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub value_hash: F,
    pub leaf_index: u64,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub siblings: Vec<F>,
}

impl<F: PrimeField> PodEntryProof<F> {
    /// Depth of this entry's inclusion path.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// A signed record in decoded form. Immutable once constructed; the
/// checkers only read it.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Pod<F: PrimeField> {
    entries: BTreeMap<PodEntryName, PodValue<F>>,
    entry_proofs: BTreeMap<PodEntryName, PodEntryProof<F>>,
    #[serde_as(as = "ArkObjectBytes")]
    content_id: F,
    signer_public_key: PodPublicKey<F>,
    signature: PodSignature<F>,
    merkle_depth: usize,
}

impl<F: PrimeField> Pod<F> {
    pub fn new(
        entries: BTreeMap<PodEntryName, PodValue<F>>,
        entry_proofs: BTreeMap<PodEntryName, PodEntryProof<F>>,
        content_id: F,
        signer_public_key: PodPublicKey<F>,
        signature: PodSignature<F>,
        merkle_depth: usize,
    ) -> Self {
        Self {
            entries,
            entry_proofs,
            content_id,
            signer_public_key,
            signature,
            merkle_depth,
        }
    }

    pub fn entries(&self) -> &BTreeMap<PodEntryName, PodValue<F>> {
        &self.entries
    }

    pub fn entry(&self, name: &PodEntryName) -> Option<&PodValue<F>> {
        self.entries.get(name)
    }

    pub fn entry_proof(&self, name: &PodEntryName) -> Option<&PodEntryProof<F>> {
        self.entry_proofs.get(name)
    }

    pub fn content_id(&self) -> F {
        self.content_id
    }

    pub fn signer_public_key(&self) -> &PodPublicKey<F> {
        &self.signer_public_key
    }

    pub fn signature(&self) -> &PodSignature<F> {
        &self.signature
    }

    pub fn merkle_depth(&self) -> usize {
        self.merkle_depth
    }

    /// Consistency of the decoded pieces: at least one entry, one inclusion
    /// bundle per entry and no stray bundles, and no inclusion path deeper
    /// than the declared tree depth.
    pub fn validate(&self, name: &PodName) -> Result<(), GpcError> {
        if self.entries.is_empty() {
            return Err(GpcError::MalformedPod(format!("POD {} has no entries", name)));
        }
        for entry_name in self.entries.keys() {
            match self.entry_proofs.get(entry_name) {
                Some(proof) if proof.depth() <= self.merkle_depth => {}
                Some(_) => {
                    return Err(GpcError::MalformedPod(format!(
                        "POD {} entry {} has an inclusion path deeper than the tree",
                        name, entry_name
                    )))
                }
                None => {
                    return Err(GpcError::MalformedPod(format!(
                        "POD {} entry {} has no inclusion bundle",
                        name, entry_name
                    )))
                }
            }
        }
        for entry_name in self.entry_proofs.keys() {
            if !self.entries.contains_key(entry_name) {
                return Err(GpcError::MalformedPod(format!(
                    "POD {} carries an inclusion bundle for unknown entry {}",
                    name, entry_name
                )));
            }
        }
        Ok(())
    }
}

/// One element of a membership list: a bare value (width 1) or a
/// value-tuple of width >= 2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum ListElement<F: PrimeField> {
    Value(PodValue<F>),
    Tuple(Vec<PodValue<F>>),
}

impl<F: PrimeField> ListElement<F> {
    pub fn width(&self) -> usize {
        match self {
            Self::Value(_) => 1,
            Self::Tuple(values) => values.len(),
        }
    }

    pub fn values(&self) -> &[PodValue<F>] {
        match self {
            Self::Value(value) => core::slice::from_ref(value),
            Self::Tuple(values) => values,
        }
    }
}

/// Named membership lists supplied with proof inputs or revealed claims.
/// Lists are public by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "", transparent)]
pub struct PodMembershipLists<F: PrimeField>(pub BTreeMap<PodListName, Vec<ListElement<F>>>);

impl<F: PrimeField> PodMembershipLists<F> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn add(&mut self, name: PodListName, elements: Vec<ListElement<F>>) {
        self.0.insert(name, elements);
    }
}

impl<F: PrimeField> Default for PodMembershipLists<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hooks into the external POD encoding and circuit family. Implementations
/// must compute exactly the hashes the circuits compute, or proofs will
/// fail to verify.
pub trait PodHasher<F: PrimeField> {
    /// Hash of an entry name, as it appears in a POD's Merkle tree.
    fn name_hash(name: &PodEntryName) -> F;

    /// Content hash of a value. Two values are considered equal by every
    /// check in this crate exactly when their content hashes are equal.
    fn value_hash(value: &PodValue<F>) -> F;

    /// Folds a slice of content hashes into a single representative using
    /// the circuit family's chained fixed-arity tuple gadget. Inputs
    /// shorter than `gadget_arity` are padded by repeating the first
    /// element; longer inputs are folded one extra element per additional
    /// gadget.
    fn tuple_hash(gadget_arity: usize, elements: &[F]) -> F;
}
