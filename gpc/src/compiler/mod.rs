//! Lowers a validated (statement, data, circuit) triple into the flat,
//! padded, index-ordered signal arrays the circuit expects. The circuit
//! has no notion of names, only indices, so POD names and entry names are
//! sorted lexicographically once and both directions reproduce the same
//! assignment.
//!
//! Value-index space, in order:
//!   - `0 .. max_entries`: physical entry slots;
//!   - `max_entries .. max_entries + max_objects`: signer public keys;
//!   - next `max_objects`: content commitments;
//!   - next `max_tuples`: tuple-gadget outputs.
//!
//! The field element `-1` is the sentinel for "disabled": no owner entry,
//! an unused numeric/list/tuple slot, an unrevealed output. Spare object
//! and entry slots duplicate slot 0 with every control flag disabled, so
//! unused capacity is well-formed but inert.

mod prove;
mod verify;

pub use prove::{compile_proof_config, ProofSignals};
pub use verify::{compile_verify_config, VerifySignals};

use crate::{
    circuit::{required_tuple_gadgets, ProofCircuitDesc},
    config::{
        derive_list_configs, EntryIdentifier, EntryRef, ListComparison, ProofConfig,
    },
    error::GpcError,
    pod::{
        ListElement, PodEntryName, PodHasher, PodListName, PodMembershipLists, PodName,
        POD_INT_MAX, POD_INT_MIN,
    },
};
use ark_ff::{One, PrimeField, Zero};
use ark_std::{
    cmp::min,
    collections::BTreeMap,
    vec,
    vec::Vec,
};
use pod_gpc_utils::ff::i64_to_field;

pub(crate) fn sentinel<F: PrimeField>() -> F {
    -F::one()
}

pub(crate) fn flag<F: PrimeField>(b: bool) -> F {
    if b {
        F::one()
    } else {
        F::zero()
    }
}

/// One physical entry slot in canonical order.
pub(crate) struct EntrySlot {
    pub pod: PodName,
    pub entry: PodEntryName,
    pub object_index: usize,
    pub is_revealed: bool,
    pub is_owner: bool,
    /// Value index this slot is constrained to equal. Defaults to the slot
    /// itself; owner entries all point at the first owner entry; equality
    /// constraints point at their target.
    pub points_to: usize,
}

pub(crate) struct NumericSlot {
    pub entry_slot: usize,
    pub min: i64,
    pub max: i64,
}

pub(crate) struct ListSlot {
    pub name: PodListName,
    pub comparison_index: usize,
    pub membership: bool,
}

/// The name-free skeleton of a statement: canonical slot assignment plus
/// every config-derived index, shared by the prove and verify directions.
pub(crate) struct ConfigLayout {
    pub pods: Vec<PodName>,
    pub entries: Vec<EntrySlot>,
    pub numeric: Vec<NumericSlot>,
    pub lists: Vec<ListSlot>,
    pub tuple_rows: Vec<Vec<usize>>,
    pub first_owner: Option<usize>,
}

/// Resolves a qualified identifier to its value index under `circuit`.
fn value_index(
    circuit: &ProofCircuitDesc,
    pod_index: &BTreeMap<PodName, usize>,
    entry_index: &BTreeMap<(PodName, PodEntryName), usize>,
    id: &EntryIdentifier,
) -> Result<usize, GpcError> {
    let object = *pod_index
        .get(&id.pod)
        .ok_or_else(|| GpcError::PodNotFound(id.pod.clone()))?;
    match &id.entry {
        EntryRef::Entry(name) => entry_index
            .get(&(id.pod.clone(), name.clone()))
            .copied()
            .ok_or_else(|| GpcError::EntryNotFound(id.clone())),
        EntryRef::SignerPublicKey => Ok(circuit.max_entries + object),
        EntryRef::ContentId => Ok(circuit.max_entries + circuit.max_objects + object),
    }
}

/// Derives the canonical slot assignment and all config-side indices.
pub(crate) fn layout_config(
    config: &ProofConfig,
    circuit: &ProofCircuitDesc,
) -> Result<ConfigLayout, GpcError> {
    let pods: Vec<PodName> = config.pods.keys().cloned().collect();
    let pod_index: BTreeMap<PodName, usize> = pods
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();

    let mut entry_index = BTreeMap::new();
    let mut entries = Vec::new();
    for (pod_name, pod_config) in &config.pods {
        for (entry_name, entry_config) in &pod_config.entries {
            let slot = entries.len();
            entry_index.insert((pod_name.clone(), entry_name.clone()), slot);
            entries.push(EntrySlot {
                pod: pod_name.clone(),
                entry: entry_name.clone(),
                object_index: pod_index[pod_name],
                is_revealed: entry_config.is_revealed,
                is_owner: entry_config.is_owner_id,
                points_to: slot,
            });
        }
    }

    let first_owner = entries.iter().position(|slot| slot.is_owner);

    // Equality and ownership are one "points-to" index per entry. All
    // owner entries point at the first owner entry, which forces them to
    // agree circuit-wide with a single constraint shape.
    let mut numeric = Vec::new();
    for (pod_name, pod_config) in &config.pods {
        for (entry_name, entry_config) in &pod_config.entries {
            let slot = entry_index[&(pod_name.clone(), entry_name.clone())];
            if entry_config.is_owner_id {
                // first_owner is Some here.
                if let Some(owner_slot) = first_owner {
                    entries[slot].points_to = owner_slot;
                }
            } else if let Some(other) = &entry_config.equals_entry {
                entries[slot].points_to = value_index(circuit, &pod_index, &entry_index, other)?;
            }
            if let Some(range) = &entry_config.in_range {
                numeric.push(NumericSlot {
                    entry_slot: slot,
                    min: range.min,
                    max: range.max,
                });
            }
        }
    }

    // Tuples fold through chained fixed-arity gadgets: the first gadget
    // takes the leading elements, each further gadget folds the previous
    // gadget's output with the next elements. Short rows repeat the
    // tuple's first element.
    let arity = circuit.tuple_arity;
    let mut tuple_rows: Vec<Vec<usize>> = Vec::new();
    let mut tuple_output = BTreeMap::new();
    let output_base = circuit.max_entries + 2 * circuit.max_objects;
    for (tuple_name, tuple) in &config.tuples {
        let member_indices: Vec<usize> = tuple
            .entries
            .iter()
            .map(|member| value_index(circuit, &pod_index, &entry_index, member))
            .collect::<Result<_, _>>()?;
        let gadgets = required_tuple_gadgets(arity, member_indices.len());
        let mut consumed = min(member_indices.len(), arity);
        let mut row = member_indices[..consumed].to_vec();
        row.resize(arity, member_indices[0]);
        tuple_rows.push(row);
        for _ in 1..gadgets {
            let prev = output_base + tuple_rows.len() - 1;
            let take = min(member_indices.len() - consumed, arity - 1);
            let mut row = vec![prev];
            row.extend_from_slice(&member_indices[consumed..consumed + take]);
            row.resize(arity, member_indices[0]);
            consumed += take;
            tuple_rows.push(row);
        }
        tuple_output.insert(tuple_name.clone(), output_base + tuple_rows.len() - 1);
    }

    let mut lists = Vec::new();
    for (list_name, list_config) in derive_list_configs(config)? {
        let comparison_index = match &list_config.comparison {
            ListComparison::Entry(id) => value_index(circuit, &pod_index, &entry_index, id)?,
            ListComparison::Tuple(tuple_name) => *tuple_output
                .get(tuple_name)
                .ok_or_else(|| GpcError::TupleNotFound(tuple_name.clone()))?,
        };
        lists.push(ListSlot {
            name: list_name,
            comparison_index,
            membership: list_config.membership,
        });
    }

    Ok(ConfigLayout {
        pods,
        entries,
        numeric,
        lists,
        tuple_rows,
        first_owner,
    })
}

/// Signal form of the tuple rows, padded to circuit capacity with
/// sentinel rows.
pub(crate) fn tuple_signals<F: PrimeField>(
    layout: &ConfigLayout,
    circuit: &ProofCircuitDesc,
) -> Vec<Vec<F>> {
    let mut rows: Vec<Vec<F>> = layout
        .tuple_rows
        .iter()
        .map(|row| row.iter().map(|&i| F::from(i as u64)).collect())
        .collect();
    rows.resize(circuit.max_tuples, vec![sentinel(); circuit.tuple_arity]);
    rows
}

/// Signal form of the membership-list block. List contents are public on
/// both sides, so this is shared: per list slot the comparison value
/// index, the membership flag, and the element representatives padded by
/// repeating the first element. Unused slots are disabled via the
/// sentinel comparison index.
pub(crate) fn list_signals<F: PrimeField, H: PodHasher<F>>(
    layout: &ConfigLayout,
    supplied: Option<&PodMembershipLists<F>>,
    circuit: &ProofCircuitDesc,
) -> Result<(Vec<F>, Vec<F>, Vec<Vec<F>>), GpcError> {
    let mut comparison_indexes = Vec::with_capacity(circuit.max_lists);
    let mut contains = Vec::with_capacity(circuit.max_lists);
    let mut valid_values = Vec::with_capacity(circuit.max_lists);
    for slot in &layout.lists {
        let elements = supplied
            .and_then(|lists| lists.0.get(&slot.name))
            .ok_or_else(|| GpcError::ListNameSetMismatch {
                configured: layout.lists.iter().map(|s| s.name.clone()).collect(),
                supplied: supplied
                    .map(|lists| lists.0.keys().cloned().collect())
                    .unwrap_or_default(),
            })?;
        let mut row: Vec<F> = elements
            .iter()
            .map(|element| list_element_rep::<F, H>(circuit, element))
            .collect();
        let first = row
            .first()
            .copied()
            .ok_or_else(|| GpcError::EmptyMembershipList(slot.name.clone()))?;
        row.resize(circuit.max_list_size, first);
        comparison_indexes.push(F::from(slot.comparison_index as u64));
        contains.push(flag(slot.membership));
        valid_values.push(row);
    }
    comparison_indexes.resize(circuit.max_lists, sentinel());
    contains.resize(circuit.max_lists, F::one());
    valid_values.resize(circuit.max_lists, vec![F::zero(); circuit.max_list_size]);
    Ok((comparison_indexes, contains, valid_values))
}

/// A list element's single-field representative: the content hash of a
/// bare value, or the chained tuple hash of a value-tuple.
pub(crate) fn list_element_rep<F: PrimeField, H: PodHasher<F>>(
    circuit: &ProofCircuitDesc,
    element: &ListElement<F>,
) -> F {
    match element {
        ListElement::Value(value) => H::value_hash(value),
        ListElement::Tuple(values) => {
            let hashes: Vec<F> = values.iter().map(|v| H::value_hash(v)).collect();
            H::tuple_hash(circuit.tuple_arity, &hashes)
        }
    }
}

/// Numeric bounds block shared between directions; the prove side
/// additionally carries the plaintext values. Unused slots are disabled
/// via the sentinel entry index and carry the full representable range.
pub(crate) fn numeric_bound_signals<F: PrimeField>(
    layout: &ConfigLayout,
    circuit: &ProofCircuitDesc,
) -> (Vec<F>, Vec<F>, Vec<F>) {
    let mut entry_indexes = Vec::with_capacity(circuit.max_numeric_values);
    let mut mins = Vec::with_capacity(circuit.max_numeric_values);
    let mut maxes = Vec::with_capacity(circuit.max_numeric_values);
    for slot in &layout.numeric {
        entry_indexes.push(F::from(slot.entry_slot as u64));
        mins.push(i64_to_field(slot.min));
        maxes.push(i64_to_field(slot.max));
    }
    entry_indexes.resize(circuit.max_numeric_values, sentinel());
    mins.resize(circuit.max_numeric_values, i64_to_field(POD_INT_MIN));
    maxes.resize(circuit.max_numeric_values, i64_to_field(POD_INT_MAX));
    (entry_indexes, mins, maxes)
}
