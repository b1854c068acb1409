//! The proof statement: which entries of which PODs are revealed, equal,
//! bounded, list-checked, tuple-grouped or bound to the prover's identity.
//! A config is agreed between prover and verifier and contains no secret
//! data. Once a circuit has been chosen the config is pinned to it,
//! producing a [`BoundConfig`] — the artifact a verifier actually uses.

use crate::{
    circuit::CircuitIdentifier,
    error::GpcError,
    pod::{PodEntryName, PodListName, PodName, TupleName},
};
use ark_std::{
    collections::BTreeMap,
    fmt,
    format,
    string::{String, ToString},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Reserved entry name addressing a POD's signer public key.
pub const SIGNER_PUBLIC_KEY_IDENT: &str = "$signerPublicKey";
/// Reserved entry name addressing a POD's content commitment.
pub const CONTENT_ID_IDENT: &str = "$contentID";

/// The entry part of a qualified identifier: a physical entry name or one
/// of the two reserved virtual forms, which need no record lookup.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryRef {
    Entry(PodEntryName),
    SignerPublicKey,
    ContentId,
}

/// A qualified `pod.entry` identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryIdentifier {
    pub pod: PodName,
    pub entry: EntryRef,
}

impl EntryIdentifier {
    pub fn entry(pod: PodName, entry: PodEntryName) -> Self {
        Self {
            pod,
            entry: EntryRef::Entry(entry),
        }
    }

    pub fn signer_public_key(pod: PodName) -> Self {
        Self {
            pod,
            entry: EntryRef::SignerPublicKey,
        }
    }

    pub fn content_id(pod: PodName) -> Self {
        Self {
            pod,
            entry: EntryRef::ContentId,
        }
    }

    pub fn is_virtual(&self) -> bool {
        !matches!(self.entry, EntryRef::Entry(_))
    }

    pub fn parse(s: &str) -> Result<Self, GpcError> {
        let (pod, entry) = s
            .split_once('.')
            .ok_or_else(|| GpcError::InvalidEntryIdentifier(s.to_string()))?;
        let pod =
            PodName::new(pod).map_err(|_| GpcError::InvalidEntryIdentifier(s.to_string()))?;
        let entry = match entry {
            SIGNER_PUBLIC_KEY_IDENT => EntryRef::SignerPublicKey,
            CONTENT_ID_IDENT => EntryRef::ContentId,
            name => EntryRef::Entry(
                PodEntryName::new(name)
                    .map_err(|_| GpcError::InvalidEntryIdentifier(s.to_string()))?,
            ),
        };
        Ok(Self { pod, entry })
    }
}

impl fmt::Display for EntryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            EntryRef::Entry(name) => write!(f, "{}.{}", self.pod, name),
            EntryRef::SignerPublicKey => write!(f, "{}.{}", self.pod, SIGNER_PUBLIC_KEY_IDENT),
            EntryRef::ContentId => write!(f, "{}.{}", self.pod, CONTENT_ID_IDENT),
        }
    }
}

impl TryFrom<String> for EntryIdentifier {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, IdentifierError> {
        Self::parse(&s).map_err(|_| IdentifierError(s))
    }
}

impl From<EntryIdentifier> for String {
    fn from(id: EntryIdentifier) -> String {
        format!("{}", id)
    }
}

/// Serde-facing error for identifier parsing.
#[derive(Clone, Debug)]
pub struct IdentifierError(pub String);

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid entry identifier: {}", self.0)
    }
}

/// An inclusive integer range. Bounds are signed 64-bit by construction,
/// the exact representable range of the integer value kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

/// Per-entry statement flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Whether the entry's plaintext value becomes public on verification.
    pub is_revealed: bool,
    /// Marks this entry as holding the prover's identity commitment.
    /// Mutually exclusive with `equals_entry`.
    #[serde(default)]
    pub is_owner_id: bool,
    /// Another entry this entry must equal, compared by content hash.
    #[serde(default)]
    pub equals_entry: Option<EntryIdentifier>,
    /// Inclusive bounds the entry's integer value must satisfy.
    #[serde(default)]
    pub in_range: Option<IntRange>,
    /// Membership list this entry's value must appear in.
    #[serde(default)]
    pub is_member_of: Option<PodListName>,
    /// Membership list this entry's value must not appear in.
    #[serde(default)]
    pub is_not_member_of: Option<PodListName>,
}

impl EntryConfig {
    pub fn revealed(is_revealed: bool) -> Self {
        Self {
            is_revealed,
            is_owner_id: false,
            equals_entry: None,
            in_range: None,
            is_member_of: None,
            is_not_member_of: None,
        }
    }

    pub fn with_owner_id(mut self) -> Self {
        self.is_owner_id = true;
        self
    }

    pub fn with_equals_entry(mut self, other: EntryIdentifier) -> Self {
        self.equals_entry = Some(other);
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.in_range = Some(IntRange { min, max });
        self
    }

    pub fn with_membership(mut self, list: PodListName) -> Self {
        self.is_member_of = Some(list);
        self
    }

    pub fn with_non_membership(mut self, list: PodListName) -> Self {
        self.is_not_member_of = Some(list);
        self
    }
}

/// Statement for one POD: at least one entry config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodConfig {
    pub entries: BTreeMap<PodEntryName, EntryConfig>,
}

impl PodConfig {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn add_entry(&mut self, name: PodEntryName, entry: EntryConfig) {
        self.entries.insert(name, entry);
    }
}

impl Default for PodConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered group of >= 2 entries treated as one composite value for
/// membership checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleConfig {
    pub entries: Vec<EntryIdentifier>,
    #[serde(default)]
    pub is_member_of: Option<PodListName>,
    #[serde(default)]
    pub is_not_member_of: Option<PodListName>,
}

impl TupleConfig {
    pub fn new(entries: Vec<EntryIdentifier>) -> Self {
        Self {
            entries,
            is_member_of: None,
            is_not_member_of: None,
        }
    }

    pub fn with_membership(mut self, list: PodListName) -> Self {
        self.is_member_of = Some(list);
        self
    }

    pub fn with_non_membership(mut self, list: PodListName) -> Self {
        self.is_not_member_of = Some(list);
        self
    }
}

/// The complete proof statement. Known to prover and verifier, agreed
/// before proving.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofConfig {
    pub pods: BTreeMap<PodName, PodConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tuples: BTreeMap<TupleName, TupleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_identifier: Option<CircuitIdentifier>,
}

impl ProofConfig {
    pub fn new() -> Self {
        Self {
            pods: BTreeMap::new(),
            tuples: BTreeMap::new(),
            circuit_identifier: None,
        }
    }

    pub fn add_pod(&mut self, name: PodName, pod: PodConfig) {
        self.pods.insert(name, pod);
    }

    pub fn add_tuple(&mut self, name: TupleName, tuple: TupleConfig) {
        self.tuples.insert(name, tuple);
    }

    pub(crate) fn entry_config(
        &self,
        pod: &PodName,
        entry: &PodEntryName,
    ) -> Option<&EntryConfig> {
        self.pods.get(pod).and_then(|p| p.entries.get(entry))
    }

    /// Whether any entry is configured as the owner's identity commitment.
    pub(crate) fn has_owner_entry(&self) -> bool {
        self.pods
            .values()
            .flat_map(|pod| pod.entries.values())
            .any(|entry| entry.is_owner_id)
    }
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A proof statement pinned to one concrete circuit. Produced once a
/// circuit has been selected; verification always works from this form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundConfig(ProofConfig);

impl BoundConfig {
    /// Pins `config` to `circuit`, replacing any previous pin.
    pub fn bind(mut config: ProofConfig, circuit: CircuitIdentifier) -> Self {
        config.circuit_identifier = Some(circuit);
        Self(config)
    }

    pub fn config(&self) -> &ProofConfig {
        &self.0
    }

    pub fn circuit_identifier(&self) -> Option<&CircuitIdentifier> {
        self.0.circuit_identifier.as_ref()
    }
}

/// What a named list is checked against: a single entry's value or a named
/// tuple of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ListComparison {
    Entry(EntryIdentifier),
    Tuple(TupleName),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListConfig {
    pub comparison: ListComparison,
    /// True for membership, false for non-membership.
    pub membership: bool,
}

/// Derives the implicit list configs from entries and tuples carrying a
/// membership marker. Each list name may be bound exactly once, and a
/// subject may not request both membership and non-membership.
pub(crate) fn derive_list_configs(
    config: &ProofConfig,
) -> Result<BTreeMap<PodListName, ListConfig>, GpcError> {
    let mut lists = BTreeMap::new();
    let mut bind = |name: &PodListName, list_config: ListConfig| -> Result<(), GpcError> {
        if lists.insert(name.clone(), list_config).is_some() {
            return Err(GpcError::DuplicateListBinding(name.clone()));
        }
        Ok(())
    };
    for (pod_name, pod) in &config.pods {
        for (entry_name, entry) in &pod.entries {
            let id = EntryIdentifier::entry(pod_name.clone(), entry_name.clone());
            if let (Some(_), Some(_)) = (&entry.is_member_of, &entry.is_not_member_of) {
                return Err(GpcError::MembershipConflict(format!("{}", id)));
            }
            if let Some(list) = &entry.is_member_of {
                bind(
                    list,
                    ListConfig {
                        comparison: ListComparison::Entry(id.clone()),
                        membership: true,
                    },
                )?;
            }
            if let Some(list) = &entry.is_not_member_of {
                bind(
                    list,
                    ListConfig {
                        comparison: ListComparison::Entry(id.clone()),
                        membership: false,
                    },
                )?;
            }
        }
    }
    for (tuple_name, tuple) in &config.tuples {
        if let (Some(_), Some(_)) = (&tuple.is_member_of, &tuple.is_not_member_of) {
            return Err(GpcError::MembershipConflict(tuple_name.to_string()));
        }
        if let Some(list) = &tuple.is_member_of {
            bind(
                list,
                ListConfig {
                    comparison: ListComparison::Tuple(tuple_name.clone()),
                    membership: true,
                },
            )?;
        }
        if let Some(list) = &tuple.is_not_member_of {
            bind(
                list,
                ListConfig {
                    comparison: ListComparison::Tuple(tuple_name.clone()),
                    membership: false,
                },
            )?;
        }
    }
    Ok(lists)
}
