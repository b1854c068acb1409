//! Internal well-formedness of a proof statement, independent of any data.

use crate::{
    config::{derive_list_configs, BoundConfig, EntryIdentifier, EntryRef, ProofConfig},
    error::GpcError,
    requirements::ProofRequirements,
};
use ark_std::{cmp::max, collections::BTreeMap};
use pod_gpc_utils::misc::ceil_log2;

/// Checks a proof statement for internal consistency and derives its size
/// requirements. Fails fast on the first problem found.
pub fn check_proof_config(config: &ProofConfig) -> Result<ProofRequirements, GpcError> {
    if config.pods.is_empty() {
        return Err(GpcError::NoPodsConfigured);
    }
    let mut n_entries = 0;
    let mut n_numeric_values = 0;
    let mut largest_pod = 0;
    for (pod_name, pod) in &config.pods {
        if pod.entries.is_empty() {
            return Err(GpcError::NoEntriesConfigured(pod_name.clone()));
        }
        largest_pod = max(largest_pod, pod.entries.len());
        for (entry_name, entry) in &pod.entries {
            n_entries += 1;
            let id = || EntryIdentifier::entry(pod_name.clone(), entry_name.clone());
            if entry.is_owner_id && entry.equals_entry.is_some() {
                return Err(GpcError::OwnerConflictsWithEquality(id()));
            }
            if let Some(range) = &entry.in_range {
                // Bounds are i64 by construction, which is exactly the
                // representable integer range; only the ordering can fail.
                if range.min > range.max {
                    return Err(GpcError::BoundsInverted {
                        entry: id(),
                        min: range.min,
                        max: range.max,
                    });
                }
                n_numeric_values += 1;
            }
        }
    }

    let mut tuple_arities = BTreeMap::new();
    for (tuple_name, tuple) in &config.tuples {
        if tuple.entries.len() < 2 {
            return Err(GpcError::TupleTooNarrow {
                tuple: tuple_name.clone(),
                arity: tuple.entries.len(),
            });
        }
        for member in &tuple.entries {
            if !identifier_is_configured(config, member) {
                return Err(GpcError::TupleEntryNotFound {
                    tuple: tuple_name.clone(),
                    entry: member.clone(),
                });
            }
        }
        tuple_arities.insert(tuple_name.clone(), tuple.entries.len());
    }

    let lists = derive_list_configs(config)?;

    Ok(ProofRequirements {
        n_objects: config.pods.len(),
        n_entries,
        // Each entry occupies a name leaf and a value leaf, so the largest
        // configured POD needs a tree able to index twice its entry count.
        merkle_max_depth: ceil_log2(2 * largest_pod),
        n_numeric_values,
        n_lists: lists.len(),
        // List contents are runtime data; the config only pins one slot
        // per named list.
        max_list_size: if lists.is_empty() { 0 } else { 1 },
        tuple_arities,
    })
}

/// [`check_proof_config`] plus the requirement that the statement is
/// pinned to a concrete circuit.
pub fn check_bound_config(bound: &BoundConfig) -> Result<ProofRequirements, GpcError> {
    if bound.circuit_identifier().is_none() {
        return Err(GpcError::MissingCircuitIdentifier);
    }
    check_proof_config(bound.config())
}

/// A qualified identifier resolves if its POD is configured and, for a
/// physical entry, that entry has a config. The virtual forms need no
/// entry config.
pub(crate) fn identifier_is_configured(config: &ProofConfig, id: &EntryIdentifier) -> bool {
    match &id.entry {
        EntryRef::Entry(name) => config.entry_config(&id.pod, name).is_some(),
        EntryRef::SignerPublicKey | EntryRef::ContentId => config.pods.contains_key(&id.pod),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        circuit::CircuitIdentifier,
        config::{EntryConfig, PodConfig, TupleConfig},
        pod::{PodEntryName, PodListName, PodName, TupleName},
    };
    use ark_std::vec;

    fn pod_name(s: &str) -> PodName {
        PodName::new(s).unwrap()
    }

    fn entry_name(s: &str) -> PodEntryName {
        PodEntryName::new(s).unwrap()
    }

    fn single_pod_config(entries: &[(&str, EntryConfig)]) -> ProofConfig {
        let mut pod = PodConfig::new();
        for (name, entry) in entries {
            pod.add_entry(entry_name(name), entry.clone());
        }
        let mut config = ProofConfig::new();
        config.add_pod(pod_name("pod0"), pod);
        config
    }

    #[test]
    fn empty_statements_rejected() {
        assert_eq!(
            check_proof_config(&ProofConfig::new()),
            Err(GpcError::NoPodsConfigured)
        );
        let mut config = ProofConfig::new();
        config.add_pod(pod_name("pod0"), PodConfig::new());
        assert_eq!(
            check_proof_config(&config),
            Err(GpcError::NoEntriesConfigured(pod_name("pod0")))
        );
    }

    #[test]
    fn owner_and_equality_are_exclusive() {
        let config = single_pod_config(&[(
            "id",
            EntryConfig::revealed(false)
                .with_owner_id()
                .with_equals_entry(EntryIdentifier::parse("pod0.other").unwrap()),
        )]);
        assert_eq!(
            check_proof_config(&config),
            Err(GpcError::OwnerConflictsWithEquality(
                EntryIdentifier::parse("pod0.id").unwrap()
            ))
        );
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config =
            single_pod_config(&[("age", EntryConfig::revealed(false).with_range(10, 5))]);
        assert_eq!(
            check_proof_config(&config),
            Err(GpcError::BoundsInverted {
                entry: EntryIdentifier::parse("pod0.age").unwrap(),
                min: 10,
                max: 5,
            })
        );
    }

    #[test]
    fn requirements_derived_from_statement() {
        let config = single_pod_config(&[
            ("a", EntryConfig::revealed(true)),
            ("b", EntryConfig::revealed(false).with_range(0, 100)),
            (
                "c",
                EntryConfig::revealed(false)
                    .with_membership(PodListName::new("colors").unwrap()),
            ),
        ]);
        let requirements = check_proof_config(&config).unwrap();
        assert_eq!(requirements.n_objects, 1);
        assert_eq!(requirements.n_entries, 3);
        // 3 entries -> 6 leaves -> depth 3.
        assert_eq!(requirements.merkle_max_depth, 3);
        assert_eq!(requirements.n_numeric_values, 1);
        assert_eq!(requirements.n_lists, 1);
        assert_eq!(requirements.max_list_size, 1);
        assert!(requirements.tuple_arities.is_empty());
    }

    #[test]
    fn tuples_must_resolve_and_have_arity_two() {
        let mut config = single_pod_config(&[("a", EntryConfig::revealed(false))]);
        config.add_tuple(
            TupleName::new("narrow").unwrap(),
            TupleConfig::new(vec![EntryIdentifier::parse("pod0.a").unwrap()]),
        );
        assert_eq!(
            check_proof_config(&config),
            Err(GpcError::TupleTooNarrow {
                tuple: TupleName::new("narrow").unwrap(),
                arity: 1,
            })
        );

        let mut config = single_pod_config(&[("a", EntryConfig::revealed(false))]);
        config.add_tuple(
            TupleName::new("pair").unwrap(),
            TupleConfig::new(vec![
                EntryIdentifier::parse("pod0.a").unwrap(),
                EntryIdentifier::parse("pod0.missing").unwrap(),
            ]),
        );
        assert_eq!(
            check_proof_config(&config),
            Err(GpcError::TupleEntryNotFound {
                tuple: TupleName::new("pair").unwrap(),
                entry: EntryIdentifier::parse("pod0.missing").unwrap(),
            })
        );

        // Virtual members are always allowed for configured PODs.
        let mut config = single_pod_config(&[("a", EntryConfig::revealed(false))]);
        config.add_tuple(
            TupleName::new("pair").unwrap(),
            TupleConfig::new(vec![
                EntryIdentifier::parse("pod0.a").unwrap(),
                EntryIdentifier::parse("pod0.$signerPublicKey").unwrap(),
            ]),
        );
        let requirements = check_proof_config(&config).unwrap();
        assert_eq!(
            requirements.tuple_arities.get(&TupleName::new("pair").unwrap()),
            Some(&2)
        );
    }

    #[test]
    fn bound_config_requires_circuit_pin() {
        let config = single_pod_config(&[("a", EntryConfig::revealed(true))]);
        let bound = BoundConfig::bind(
            config.clone(),
            CircuitIdentifier::new("pod-gpc", "1o-5e-6md-2nv-1x50l-2x3t"),
        );
        assert!(check_bound_config(&bound).is_ok());

        // A bound config can only lose its pin by construction from a raw
        // unpinned statement.
        let unpinned: BoundConfig = serde_json::from_str(
            &serde_json::to_string(&config).unwrap(),
        )
        .unwrap();
        assert_eq!(
            check_bound_config(&unpinned),
            Err(GpcError::MissingCircuitIdentifier)
        );
    }
}
