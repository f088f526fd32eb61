//! End-to-end properties of the allowlist engine.

use proptest::prelude::*;

use crate::*;

fn build(ids: &[&str]) -> AllowlistTree {
    AllowlistTree::build(ids, HashAlgorithm::Blake3)
        .unwrap()
        .expect("non-empty allowlist should build")
}

fn flip_bit(hash: &Hash, bit: usize) -> Hash {
    let mut out = *hash;
    out[bit / 8] ^= 1 << (bit % 8);
    out
}

#[test]
fn test_three_member_scenario() {
    let tree = build(&["alice", "bob", "carol"]);
    let algo = HashAlgorithm::Blake3;

    let proof = tree.proof(0).expect("index 0 exists");
    assert_eq!(proof.len(), 2);
    assert_eq!(proof.siblings()[0], algo.leaf_hash(b"bob"));
    // "carol" was carried up unchanged and meets "alice"/"bob" at the top.
    assert_eq!(proof.siblings()[1], algo.leaf_hash(b"carol"));

    assert!(verify_identity(algo, b"alice", &proof, &tree.root()));
    assert!(!verify_identity(algo, b"dave", &proof, &tree.root()));
}

#[test]
fn test_four_member_root_by_hand() {
    let algo = HashAlgorithm::Blake3;
    let tree = build(&["a", "b", "c", "d"]);

    let [a, b, c, d] = [b"a", b"b", b"c", b"d"].map(|v| algo.leaf_hash(v));
    let expected = algo.internal_hash(&algo.internal_hash(&a, &b), &algo.internal_hash(&c, &d));
    assert_eq!(tree.root(), expected);

    // Same thing spelled out without the helper's sorting.
    let node = |x: &Hash, y: &Hash| {
        let (lo, hi) = if x < y { (x, y) } else { (y, x) };
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[INTERNAL_DOMAIN_TAG]);
        hasher.update(lo);
        hasher.update(hi);
        *hasher.finalize().as_bytes()
    };
    assert_eq!(tree.root(), node(&node(&a, &b), &node(&c, &d)));
}

#[test]
fn test_five_member_odd_handling() {
    let tree = build(&["a", "b", "c", "d", "e"]);
    assert_eq!(tree.layer_count(), 4);
    let lengths: Vec<usize> = tree.layers().iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![5, 3, 2, 1]);

    for index in 0..5 {
        let proof = tree.proof(index).expect("in range");
        let expected_len = if index == 4 { 1 } else { 3 };
        assert_eq!(proof.len(), expected_len, "index {}", index);
        assert!(tree.verify_index(index, &proof, &tree.root()));
    }
}

#[test]
fn test_reordering_changes_root() {
    let forward = build(&["alice", "bob", "carol", "dave"]);
    let rotated = build(&["bob", "carol", "dave", "alice"]);
    assert_ne!(forward.root(), rotated.root());
}

#[test]
fn test_swapping_a_pair_keeps_root() {
    // Sorted pairs make the two children of one node interchangeable: a
    // known edge case of the construction, not a bug.
    let forward = build(&["alice", "bob", "carol", "dave"]);
    let swapped = build(&["bob", "alice", "carol", "dave"]);
    assert_eq!(forward.root(), swapped.root());
    assert_ne!(forward.leaves(), swapped.leaves());
}

#[test]
fn test_every_bit_flip_is_detected() {
    let tree = build(&["alice", "bob", "carol", "dave", "erin", "frank"]);
    let root = tree.root();
    let proof = tree.proof(2).expect("index 2 exists");
    let leaf = *tree.leaf(2).expect("leaf 2");

    for (step, sibling) in proof.siblings().iter().enumerate() {
        for bit in 0..256 {
            let mut siblings = proof.siblings().to_vec();
            siblings[step] = flip_bit(sibling, bit);
            let tampered = AllowlistProof::new(siblings);
            assert!(!verify_leaf(tree.algorithm(), &leaf, &tampered, &root));
        }
    }
    for bit in 0..256 {
        assert!(!verify_leaf(tree.algorithm(), &leaf, &proof, &flip_bit(&root, bit)));
    }
}

#[test]
fn test_base58_allowlist_end_to_end() {
    let addresses: Vec<String> = (0u8..7)
        .map(|i| bs58::encode([i.wrapping_mul(37).wrapping_add(1); 32]).into_string())
        .collect();
    let identities = parse_identities(&addresses, IdentityEncoding::Base58).expect("valid keys");
    let tree = AllowlistTree::from_identities(&identities, HashAlgorithm::Sha256)
        .unwrap()
        .expect("build");

    let (index, proof) = tree
        .prove_identity(addresses[5].as_bytes())
        .expect("address 5 is listed");
    assert_eq!(index, 5);
    assert!(verify_identity(
        HashAlgorithm::Sha256,
        addresses[5].as_bytes(),
        &proof,
        &tree.root()
    ));

    let outsider = bs58::encode([0xeeu8; 32]).into_string();
    assert!(tree.prove_identity(outsider.as_bytes()).is_none());
    assert!(!verify_identity(
        HashAlgorithm::Sha256,
        outsider.as_bytes(),
        &proof,
        &tree.root()
    ));
}

#[test]
fn test_independent_trees_built_concurrently() {
    let lists: Vec<Vec<String>> = (0..4)
        .map(|g| (0..50).map(|i| format!("group{}-wallet{}", g, i)).collect())
        .collect();
    let roots: Vec<Hash> = std::thread::scope(|s| {
        let handles: Vec<_> = lists
            .iter()
            .map(|ids| {
                s.spawn(move || {
                    AllowlistTree::build(ids, HashAlgorithm::Blake3)
                        .unwrap()
                        .expect("build")
                        .root()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("builder thread"))
            .collect()
    });
    for (ids, root) in lists.iter().zip(&roots) {
        let sequential = AllowlistTree::build(ids, HashAlgorithm::Blake3)
            .unwrap()
            .expect("build");
        assert_eq!(sequential.root(), *root);
    }
}

fn identity_lists() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..48), 1..70)
}

proptest! {
    #[test]
    fn prop_build_is_deterministic(ids in identity_lists()) {
        let first = AllowlistTree::build(&ids, HashAlgorithm::Blake3).unwrap().expect("build");
        let second = AllowlistTree::build(&ids, HashAlgorithm::Blake3).unwrap().expect("build");
        prop_assert_eq!(first.root(), second.root());
    }

    #[test]
    fn prop_every_member_verifies(ids in identity_lists()) {
        let tree = AllowlistTree::build(&ids, HashAlgorithm::Blake3).unwrap().expect("build");
        let root = tree.root();
        for (index, id) in ids.iter().enumerate() {
            let proof = tree.proof(index).expect("in range");
            prop_assert!(proof.len() < tree.layer_count());
            prop_assert!(tree.verify_index(index, &proof, &root));
            prop_assert!(verify_identity(HashAlgorithm::Blake3, id, &proof, &root));
        }
    }

    #[test]
    fn prop_near_miss_identity_rejected(
        ids in identity_lists(),
        pick in any::<prop::sample::Index>(),
        byte in any::<prop::sample::Index>(),
    ) {
        let tree = AllowlistTree::build(&ids, HashAlgorithm::Blake3).unwrap().expect("build");
        let index = pick.index(ids.len());
        let mut candidate = ids[index].clone();
        let at = byte.index(candidate.len());
        candidate[at] ^= 0x01;
        prop_assume!(!ids.contains(&candidate));

        let root = tree.root();
        for i in 0..ids.len() {
            let proof = tree.proof(i).expect("in range");
            prop_assert!(!verify_identity(HashAlgorithm::Blake3, &candidate, &proof, &root));
        }
    }

    #[test]
    fn prop_out_of_range_index_fails(ids in identity_lists(), extra in 0usize..10) {
        let tree = AllowlistTree::build(&ids, HashAlgorithm::Blake3).unwrap().expect("build");
        let index = ids.len() + extra;
        let is_invalid_index = matches!(
            tree.proof(index),
            Err(AllowlistError::InvalidIndex { index: i, count }) if i == index && count == ids.len()
        );
        prop_assert!(is_invalid_index);
    }

    #[test]
    fn prop_proof_bytes_roundtrip(ids in identity_lists(), pick in any::<prop::sample::Index>()) {
        let tree = AllowlistTree::build(&ids, HashAlgorithm::Keccak256).unwrap().expect("build");
        let proof = tree.proof(pick.index(ids.len())).expect("in range");
        let bytes = proof.encode_to_vec().expect("encode");
        prop_assert_eq!(AllowlistProof::decode_from_slice(&bytes).expect("decode"), proof);
    }
}
