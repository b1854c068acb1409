use crate::{
    circuit::CircuitIdentifier,
    config::EntryIdentifier,
    pod::{PodEntryName, PodListName, PodName, TupleName},
    requirements::ProofRequirements,
};
use ark_std::{string::String, vec::Vec};

/// Broad classification of a [`GpcError`] by cause rather than call site.
/// Structural problems are always surfaced before any semantic check runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpcErrorKind {
    /// A required field is missing or a value has the wrong shape.
    Structural,
    /// A bound is outside the representable limits or a value violates its
    /// configured bounds.
    Range,
    /// A named record, entry, list, tuple or circuit does not exist, or the
    /// claims and the bound config disagree about what is disclosed.
    Referential,
    /// A business rule is violated: mutually exclusive flags, unsatisfied
    /// equality or membership, no usable circuit, and the like.
    Logical,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GpcError {
    InvalidName(String),
    InvalidEntryIdentifier(String),
    InvalidCircuitIdentifier(String),
    NoPodsConfigured,
    NoEntriesConfigured(PodName),
    MalformedPod(String),
    MissingCircuitIdentifier,
    EmptyMembershipList(PodListName),
    /// A tuple-valued list element with fewer than 2 components.
    ListElementTooNarrow(PodListName),
    /// Elements of a single membership list have differing widths.
    ListWidthMismatch {
        list: PodListName,
        expected: usize,
        actual: usize,
    },
    /// The comparison value's width differs from the list elements' width.
    ComparisonWidthMismatch {
        list: PodListName,
        comparison: usize,
        element: usize,
    },
    BoundsInverted {
        entry: EntryIdentifier,
        min: i64,
        max: i64,
    },
    ValueOutOfRange {
        entry: EntryIdentifier,
        value: i64,
        min: i64,
        max: i64,
    },
    PodCountMismatch {
        configured: usize,
        supplied: usize,
    },
    PodNotFound(PodName),
    EntryNotFound(EntryIdentifier),
    TupleNotFound(TupleName),
    TupleEntryNotFound {
        tuple: TupleName,
        entry: EntryIdentifier,
    },
    /// The set of lists named by the config and the set of lists supplied
    /// with the data must be identical. Both sets are reported.
    ListNameSetMismatch {
        configured: Vec<PodListName>,
        supplied: Vec<PodListName>,
    },
    CircuitNotFound(CircuitIdentifier),
    /// Claims disclose an entry the bound config never revealed.
    ExtraEntryInClaims(EntryIdentifier),
    /// An entry configured as revealed is absent from the claims.
    RevealedEntryMissingFromClaims(EntryIdentifier),
    SignerKeyMissingFromClaims(PodName),
    /// Claims carry an entries map for a record with nothing revealed. An
    /// empty map must be omitted entirely.
    EmptyEntriesInClaims(PodName),
    OwnerConflictsWithEquality(EntryIdentifier),
    /// Both membership and non-membership requested for the same subject.
    MembershipConflict(String),
    TupleTooNarrow {
        tuple: TupleName,
        arity: usize,
    },
    /// A list name may be bound to exactly one comparison entry or tuple.
    DuplicateListBinding(PodListName),
    OwnerInputMissing(EntryIdentifier),
    /// The value of an owner entry is not of the cryptographic kind. An
    /// integer-kind value cannot serve as an identity commitment.
    OwnerCommitmentKind(EntryIdentifier),
    OwnerCommitmentMismatch(EntryIdentifier),
    /// A bounds check was configured on an entry whose value is not an
    /// integer.
    ValueNotNumeric(EntryIdentifier),
    EntriesNotEqual {
        entry: EntryIdentifier,
        other: EntryIdentifier,
    },
    /// An external nullifier was supplied but no entry is configured as the
    /// owner's identity commitment.
    NullifierWithoutOwner,
    ListMembershipViolated(PodListName),
    ListNonMembershipViolated(PodListName),
    NoCircuitSatisfies(ProofRequirements),
    CircuitTooSmall {
        circuit: CircuitIdentifier,
        requirements: ProofRequirements,
    },
    /// Tuple arities may come from the config side of a merge or the data
    /// side, never both.
    TupleAritiesOnBothSides,
    /// The bound config is pinned to a different circuit than the one
    /// being compiled for.
    CircuitMismatch {
        pinned: CircuitIdentifier,
        compiled: CircuitIdentifier,
    },
}

impl GpcError {
    pub fn kind(&self) -> GpcErrorKind {
        match self {
            Self::InvalidName(_)
            | Self::InvalidEntryIdentifier(_)
            | Self::InvalidCircuitIdentifier(_)
            | Self::NoPodsConfigured
            | Self::NoEntriesConfigured(_)
            | Self::MalformedPod(_)
            | Self::MissingCircuitIdentifier
            | Self::EmptyMembershipList(_)
            | Self::ListElementTooNarrow(_)
            | Self::ListWidthMismatch { .. }
            | Self::ComparisonWidthMismatch { .. }
            | Self::EmptyEntriesInClaims(_) => GpcErrorKind::Structural,
            Self::BoundsInverted { .. } | Self::ValueOutOfRange { .. } => GpcErrorKind::Range,
            Self::PodCountMismatch { .. }
            | Self::PodNotFound(_)
            | Self::EntryNotFound(_)
            | Self::TupleNotFound(_)
            | Self::TupleEntryNotFound { .. }
            | Self::ListNameSetMismatch { .. }
            | Self::CircuitNotFound(_)
            | Self::ExtraEntryInClaims(_)
            | Self::RevealedEntryMissingFromClaims(_)
            | Self::SignerKeyMissingFromClaims(_) => GpcErrorKind::Referential,
            Self::OwnerConflictsWithEquality(_)
            | Self::MembershipConflict(_)
            | Self::TupleTooNarrow { .. }
            | Self::DuplicateListBinding(_)
            | Self::OwnerInputMissing(_)
            | Self::OwnerCommitmentKind(_)
            | Self::OwnerCommitmentMismatch(_)
            | Self::ValueNotNumeric(_)
            | Self::EntriesNotEqual { .. }
            | Self::NullifierWithoutOwner
            | Self::ListMembershipViolated(_)
            | Self::ListNonMembershipViolated(_)
            | Self::NoCircuitSatisfies(_)
            | Self::CircuitTooSmall { .. }
            | Self::TupleAritiesOnBothSides
            | Self::CircuitMismatch { .. } => GpcErrorKind::Logical,
        }
    }
}

impl From<crate::pod::NameError> for GpcError {
    fn from(e: crate::pod::NameError) -> Self {
        Self::InvalidName(e.0)
    }
}

pub(crate) fn entry_not_found(pod: &PodName, entry: &PodEntryName) -> GpcError {
    GpcError::EntryNotFound(EntryIdentifier::entry(pod.clone(), entry.clone()))
}
