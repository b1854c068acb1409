//! Shared fixtures: a blake2-based hasher standing in for the external
//! POD encoding, and builders for deterministic test PODs.
#![allow(dead_code)]

use ark_ff::{BigInteger, PrimeField};
use blake2::{Blake2b512, Digest};
use pod_gpc::prelude::*;
use pod_gpc_utils::misc::ceil_log2;
use std::collections::BTreeMap;

pub struct TestHasher;

fn hash_to_field<F: PrimeField>(tag: &[u8], payload: &[u8]) -> F {
    let mut hasher = Blake2b512::new();
    hasher.update(tag);
    hasher.update(payload);
    F::from_le_bytes_mod_order(&hasher.finalize())
}

fn field_bytes<F: PrimeField>(f: &F) -> Vec<u8> {
    f.into_bigint().to_bytes_le()
}

impl<F: PrimeField> PodHasher<F> for TestHasher {
    fn name_hash(name: &PodEntryName) -> F {
        hash_to_field(b"pod/name", name.as_str().as_bytes())
    }

    fn value_hash(value: &PodValue<F>) -> F {
        match value {
            PodValue::Int(v) => hash_to_field(b"pod/int", &v.to_le_bytes()),
            PodValue::Cryptographic(c) => hash_to_field(b"pod/crypto", &field_bytes(c)),
            PodValue::String(s) => hash_to_field(b"pod/string", s.as_bytes()),
            PodValue::Bytes(b) => hash_to_field(b"pod/bytes", b),
            PodValue::PublicKey(key) => {
                let mut payload = field_bytes(&key.x);
                payload.extend(field_bytes(&key.y));
                hash_to_field(b"pod/pubkey", &payload)
            }
        }
    }

    fn tuple_hash(gadget_arity: usize, elements: &[F]) -> F {
        assert!(gadget_arity >= 2);
        assert!(!elements.is_empty());
        let pad = elements[0];
        let fold = |chunk: &[F]| -> F {
            let mut payload = Vec::new();
            for element in chunk {
                payload.extend(field_bytes(element));
            }
            hash_to_field(b"pod/tuple", &payload)
        };
        let take = gadget_arity.min(elements.len());
        let mut chunk: Vec<F> = elements[..take].to_vec();
        chunk.resize(gadget_arity, pad);
        let mut acc = fold(&chunk);
        let mut consumed = take;
        while consumed < elements.len() {
            let take = (gadget_arity - 1).min(elements.len() - consumed);
            let mut chunk = vec![acc];
            chunk.extend_from_slice(&elements[consumed..consumed + take]);
            chunk.resize(gadget_arity, pad);
            acc = fold(&chunk);
            consumed += take;
        }
        acc
    }
}

pub fn pod_name(s: &str) -> PodName {
    PodName::new(s).unwrap()
}

pub fn entry_name(s: &str) -> PodEntryName {
    PodEntryName::new(s).unwrap()
}

pub fn list_name(s: &str) -> PodListName {
    PodListName::new(s).unwrap()
}

pub fn tuple_name(s: &str) -> TupleName {
    TupleName::new(s).unwrap()
}

/// Builds a structurally consistent POD whose hashes match [`TestHasher`].
/// The signature and sibling paths are deterministic fillers; nothing in
/// the layer under test verifies them cryptographically.
pub fn make_pod<F: PrimeField>(seed: u64, entries: &[(&str, PodValue<F>)]) -> Pod<F> {
    let entry_map: BTreeMap<PodEntryName, PodValue<F>> = entries
        .iter()
        .map(|(name, value)| (entry_name(name), value.clone()))
        .collect();
    let merkle_depth = ceil_log2(2 * entry_map.len());
    let mut proofs = BTreeMap::new();
    for (i, (name, value)) in entry_map.iter().enumerate() {
        let siblings = (0..merkle_depth)
            .map(|level| {
                hash_to_field(
                    b"test/sibling",
                    &[seed.to_le_bytes(), (i as u64).to_le_bytes(), (level as u64).to_le_bytes()]
                        .concat(),
                )
            })
            .collect();
        proofs.insert(
            name.clone(),
            PodEntryProof {
                name_hash: <TestHasher as PodHasher<F>>::name_hash(name),
                value_hash: <TestHasher as PodHasher<F>>::value_hash(value),
                leaf_index: 2 * i as u64,
                siblings,
            },
        );
    }
    let content_id = hash_to_field(b"test/content", &seed.to_le_bytes());
    let signer_public_key = PodPublicKey {
        x: hash_to_field(b"test/pkx", &seed.to_le_bytes()),
        y: hash_to_field(b"test/pky", &seed.to_le_bytes()),
    };
    let signature = PodSignature {
        r8x: hash_to_field(b"test/sigr8x", &seed.to_le_bytes()),
        r8y: hash_to_field(b"test/sigr8y", &seed.to_le_bytes()),
        s: hash_to_field(b"test/sigs", &seed.to_le_bytes()),
    };
    Pod::new(
        entry_map,
        proofs,
        content_id,
        signer_public_key,
        signature,
        merkle_depth,
    )
}

/// An identity whose commitment is derived from the seed; PODs meant to be
/// owned by this identity should carry `owner_commitment(seed)` in their
/// owner entry.
pub fn make_identity<F: PrimeField>(seed: u64) -> OwnerIdentity<F> {
    OwnerIdentity {
        commitment: owner_commitment(seed),
        secrets: OwnerSecrets {
            nullifier: hash_to_field(b"test/nullifier", &seed.to_le_bytes()),
            trapdoor: hash_to_field(b"test/trapdoor", &seed.to_le_bytes()),
        },
    }
}

pub fn owner_commitment<F: PrimeField>(seed: u64) -> F {
    hash_to_field(b"test/commitment", &seed.to_le_bytes())
}
