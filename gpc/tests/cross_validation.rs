//! Statement-versus-data checks: range violations, unsatisfied
//! equalities, list-name mismatches, ownership and nullifier rules, and
//! the bidirectional disclosure check on the verify side.

mod common;

use ark_bls12_381::Fr;
use common::*;
use pod_gpc::prelude::*;
use std::collections::BTreeMap;

fn one_pod_config(entries: &[(&str, EntryConfig)]) -> ProofConfig {
    let mut pod = PodConfig::new();
    for (name, entry) in entries {
        pod.add_entry(entry_name(name), entry.clone());
    }
    let mut config = ProofConfig::new();
    config.add_pod(pod_name("pod0"), pod);
    config
}

fn one_pod_inputs(entries: &[(&str, PodValue<Fr>)]) -> ProofInputs<Fr> {
    let mut pods = BTreeMap::new();
    pods.insert(pod_name("pod0"), make_pod(11, entries));
    ProofInputs::new(pods)
}

#[test]
fn range_violation_names_entry_and_bound() {
    let config = one_pod_config(&[("score", EntryConfig::revealed(false).with_range(0, 100))]);
    let inputs = one_pod_inputs(&[("score", PodValue::Int(150))]);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::ValueOutOfRange {
            entry: EntryIdentifier::parse("pod0.score").unwrap(),
            value: 150,
            min: 0,
            max: 100,
        })
    );
    let below = one_pod_inputs(&[("score", PodValue::Int(-3))]);
    assert!(matches!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &below),
        Err(GpcError::ValueOutOfRange { value: -3, .. })
    ));
    let not_numeric = one_pod_inputs(&[("score", PodValue::String("high".into()))]);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &not_numeric),
        Err(GpcError::ValueNotNumeric(
            EntryIdentifier::parse("pod0.score").unwrap()
        ))
    );
}

#[test]
fn unsatisfied_cross_equality() {
    let mut config = ProofConfig::new();
    let mut a = PodConfig::new();
    a.add_entry(
        entry_name("x"),
        EntryConfig::revealed(false).with_equals_entry(EntryIdentifier::parse("b.y").unwrap()),
    );
    let mut b = PodConfig::new();
    b.add_entry(
        entry_name("y"),
        EntryConfig::revealed(false).with_equals_entry(EntryIdentifier::parse("a.x").unwrap()),
    );
    config.add_pod(pod_name("a"), a);
    config.add_pod(pod_name("b"), b);

    let mut pods = BTreeMap::new();
    pods.insert(pod_name("a"), make_pod(1, &[("x", PodValue::Int(1))]));
    pods.insert(pod_name("b"), make_pod(2, &[("y", PodValue::Int(2))]));
    let inputs = ProofInputs::new(pods);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::EntriesNotEqual {
            entry: EntryIdentifier::parse("a.x").unwrap(),
            other: EntryIdentifier::parse("b.y").unwrap(),
        })
    );
}

#[test]
fn equality_against_virtual_targets() {
    let mut config = ProofConfig::new();
    let mut a = PodConfig::new();
    a.add_entry(
        entry_name("other_signer"),
        EntryConfig::revealed(false)
            .with_equals_entry(EntryIdentifier::parse("b.$signerPublicKey").unwrap()),
    );
    let mut b = PodConfig::new();
    b.add_entry(entry_name("anything"), EntryConfig::revealed(false));
    config.add_pod(pod_name("a"), a);
    config.add_pod(pod_name("b"), b);

    let pod_b = make_pod(2, &[("anything", PodValue::Int(0))]);
    let signer = pod_b.signer_public_key().clone();
    let mut pods = BTreeMap::new();
    pods.insert(
        pod_name("a"),
        make_pod(1, &[("other_signer", PodValue::PublicKey(signer))]),
    );
    pods.insert(pod_name("b"), pod_b);
    let inputs = ProofInputs::new(pods);
    check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs).unwrap();

    // A mismatching key fails the same check.
    let pod_b = make_pod(2, &[("anything", PodValue::Int(0))]);
    let wrong = make_pod(3, &[("w", PodValue::Int(0))]).signer_public_key().clone();
    let mut pods = BTreeMap::new();
    pods.insert(
        pod_name("a"),
        make_pod(1, &[("other_signer", PodValue::PublicKey(wrong))]),
    );
    pods.insert(pod_name("b"), pod_b);
    let inputs = ProofInputs::new(pods);
    assert!(matches!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::EntriesNotEqual { .. })
    ));
}

#[test]
fn list_name_sets_must_match_exactly() {
    let config = one_pod_config(&[(
        "color",
        EntryConfig::revealed(false).with_membership(list_name("colors")),
    )]);
    let mut inputs = one_pod_inputs(&[("color", PodValue::String("red".into()))]);
    let mut lists = PodMembershipLists::new();
    lists.add(
        list_name("sizes"),
        vec![ListElement::Value(PodValue::Int(1))],
    );
    inputs.membership_lists = Some(lists);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::ListNameSetMismatch {
            configured: vec![list_name("colors")],
            supplied: vec![list_name("sizes")],
        })
    );
}

#[test]
fn membership_and_non_membership() {
    let config = one_pod_config(&[(
        "color",
        EntryConfig::revealed(false).with_membership(list_name("colors")),
    )]);
    let mut inputs = one_pod_inputs(&[("color", PodValue::String("black".into()))]);
    let mut lists = PodMembershipLists::new();
    lists.add(
        list_name("colors"),
        vec![
            ListElement::Value(PodValue::String("red".into())),
            ListElement::Value(PodValue::String("blue".into())),
        ],
    );
    inputs.membership_lists = Some(lists.clone());
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::ListMembershipViolated(list_name("colors")))
    );

    let config = one_pod_config(&[(
        "color",
        EntryConfig::revealed(false).with_non_membership(list_name("colors")),
    )]);
    let mut inputs = one_pod_inputs(&[("color", PodValue::String("red".into()))]);
    inputs.membership_lists = Some(lists);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::ListNonMembershipViolated(list_name("colors")))
    );
}

#[test]
fn comparison_width_must_match_list_width() {
    let config = one_pod_config(&[(
        "color",
        EntryConfig::revealed(false).with_membership(list_name("colors")),
    )]);
    let mut inputs = one_pod_inputs(&[("color", PodValue::String("red".into()))]);
    let mut lists = PodMembershipLists::new();
    lists.add(
        list_name("colors"),
        vec![ListElement::Tuple(vec![
            PodValue::String("red".into()),
            PodValue::String("crimson".into()),
        ])],
    );
    inputs.membership_lists = Some(lists);
    let err = check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs).unwrap_err();
    assert_eq!(
        err,
        GpcError::ComparisonWidthMismatch {
            list: list_name("colors"),
            comparison: 1,
            element: 2,
        }
    );
    assert_eq!(err.kind(), GpcErrorKind::Structural);
}

#[test]
fn ownership_rules() {
    let config = one_pod_config(&[(
        "owner",
        EntryConfig::revealed(false).with_owner_id(),
    )]);

    // Owner entry configured but no owner input supplied.
    let inputs = one_pod_inputs(&[("owner", PodValue::Cryptographic(owner_commitment(7)))]);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::OwnerInputMissing(
            EntryIdentifier::parse("pod0.owner").unwrap()
        ))
    );

    // An integer-kind value cannot serve as a commitment.
    let mut inputs = one_pod_inputs(&[("owner", PodValue::Int(7))]);
    inputs.owner = Some(ProofOwner {
        identity: make_identity(7),
        external_nullifier: None,
    });
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::OwnerCommitmentKind(
            EntryIdentifier::parse("pod0.owner").unwrap()
        ))
    );

    // The entry value must equal the identity's commitment.
    let mut inputs =
        one_pod_inputs(&[("owner", PodValue::Cryptographic(owner_commitment(8)))]);
    inputs.owner = Some(ProofOwner {
        identity: make_identity(7),
        external_nullifier: None,
    });
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::OwnerCommitmentMismatch(
            EntryIdentifier::parse("pod0.owner").unwrap()
        ))
    );

    // All preconditions satisfied.
    let mut inputs =
        one_pod_inputs(&[("owner", PodValue::Cryptographic(owner_commitment(7)))]);
    inputs.owner = Some(ProofOwner {
        identity: make_identity(7),
        external_nullifier: None,
    });
    check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs).unwrap();
}

#[test]
fn nullifier_requires_owner_entry() {
    let config = one_pod_config(&[("plain", EntryConfig::revealed(false))]);
    let mut inputs = one_pod_inputs(&[("plain", PodValue::Int(1))]);
    inputs.owner = Some(ProofOwner {
        identity: make_identity(7),
        external_nullifier: Some(PodValue::String("ctx".into())),
    });
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::NullifierWithoutOwner)
    );

    // An owner input without a nullifier is merely unused.
    inputs.owner.as_mut().unwrap().external_nullifier = None;
    check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs).unwrap();
}

#[test]
fn pod_name_sets_must_match() {
    let config = one_pod_config(&[("a", EntryConfig::revealed(false))]);
    let inputs: ProofInputs<Fr> = ProofInputs::new(BTreeMap::new());
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::PodCountMismatch {
            configured: 1,
            supplied: 0,
        })
    );

    let mut pods = BTreeMap::new();
    pods.insert(pod_name("other"), make_pod(1, &[("a", PodValue::Int(1))]));
    let inputs = ProofInputs::new(pods);
    assert_eq!(
        check_proof_inputs_for_config::<Fr, TestHasher>(&config, &inputs),
        Err(GpcError::PodNotFound(pod_name("pod0")))
    );
}

#[test]
fn claims_may_not_disclose_more_or_less_than_configured() {
    let config = one_pod_config(&[
        ("public", EntryConfig::revealed(true)),
        ("secret", EntryConfig::revealed(false)),
    ]);
    let bound = BoundConfig::bind(
        config,
        CircuitIdentifier::parse("pod-gpc_1o-5e-6md-2nv-1x50l-2x3t").unwrap(),
    );
    let signer = make_pod::<Fr>(5, &[("public", PodValue::Int(1))])
        .signer_public_key()
        .clone();

    let claims_with = |entries: Option<BTreeMap<PodEntryName, PodValue<Fr>>>| RevealedClaims {
        pods: {
            let mut pods = BTreeMap::new();
            pods.insert(
                pod_name("pod0"),
                RevealedPod {
                    entries,
                    signer_public_key: Some(signer.clone()),
                },
            );
            pods
        },
        owner: None,
        membership_lists: None,
        watermark: None,
    };

    // Exactly the configured disclosure passes.
    let mut entries = BTreeMap::new();
    entries.insert(entry_name("public"), PodValue::Int(1));
    check_revealed_claims_for_config::<Fr, TestHasher>(&bound, &claims_with(Some(entries)))
        .unwrap();

    // A missing revealed entry is rejected.
    assert_eq!(
        check_revealed_claims_for_config::<Fr, TestHasher>(&bound, &claims_with(None)),
        Err(GpcError::RevealedEntryMissingFromClaims(
            EntryIdentifier::parse("pod0.public").unwrap()
        ))
    );

    // Disclosing an unrevealed entry is rejected.
    let mut entries = BTreeMap::new();
    entries.insert(entry_name("public"), PodValue::Int(1));
    entries.insert(entry_name("secret"), PodValue::Int(2));
    assert_eq!(
        check_revealed_claims_for_config::<Fr, TestHasher>(&bound, &claims_with(Some(entries))),
        Err(GpcError::ExtraEntryInClaims(
            EntryIdentifier::parse("pod0.secret").unwrap()
        ))
    );

    // Disclosing an entry the config never mentions is rejected.
    let mut entries = BTreeMap::new();
    entries.insert(entry_name("public"), PodValue::Int(1));
    entries.insert(entry_name("stray"), PodValue::Int(3));
    assert_eq!(
        check_revealed_claims_for_config::<Fr, TestHasher>(&bound, &claims_with(Some(entries))),
        Err(GpcError::ExtraEntryInClaims(
            EntryIdentifier::parse("pod0.stray").unwrap()
        ))
    );

    // A missing signer key is rejected.
    let mut entries = BTreeMap::new();
    entries.insert(entry_name("public"), PodValue::Int(1));
    let mut claims = claims_with(Some(entries));
    claims
        .pods
        .get_mut(&pod_name("pod0"))
        .unwrap()
        .signer_public_key = None;
    assert_eq!(
        check_revealed_claims_for_config::<Fr, TestHasher>(&bound, &claims),
        Err(GpcError::SignerKeyMissingFromClaims(pod_name("pod0")))
    );
}

#[test]
fn error_kinds_classify_by_cause() {
    assert_eq!(
        GpcError::NullifierWithoutOwner.kind(),
        GpcErrorKind::Logical
    );
    assert_eq!(
        GpcError::PodNotFound(pod_name("pod0")).kind(),
        GpcErrorKind::Referential
    );
    assert_eq!(
        GpcError::ValueOutOfRange {
            entry: EntryIdentifier::parse("pod0.score").unwrap(),
            value: 150,
            min: 0,
            max: 100,
        }
        .kind(),
        GpcErrorKind::Range
    );
    assert_eq!(GpcError::NoPodsConfigured.kind(), GpcErrorKind::Structural);
}
