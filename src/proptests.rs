use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_trie<B: AsRef<[u8]>>(t: &RawTrie<B>) {
    fn walk<B: AsRef<[u8]>>(
        t: &RawTrie<B>,
        r: Ref,
        path: &mut Vec<(CritBit, usize)>,
        leaves_seen: &mut usize,
    ) {
        assert!(!r.is_null(), "NULL reference inside the trie");

        if r.is_leaf() {
            let leaf = t.leaf(r);
            for &(bit, dir) in path.iter() {
                assert_eq!(
                    bit.direction(leaf.key.as_ref()),
                    dir,
                    "leaf key on the wrong side of an ancestor branch"
                );
            }
            *leaves_seen += 1;
            return;
        }

        let b = *t.branch(r);
        if let Some(&(parent_bit, _)) = path.last() {
            assert!(
                b.bit > parent_bit,
                "crit positions must strictly increase toward the leaves"
            );
        }
        for dir in 0..2 {
            path.push((b.bit, dir));
            walk(t, b.children[dir], path, leaves_seen);
            path.pop();
        }
    }

    let mut leaves_seen = 0usize;
    if !t.root.is_null() {
        let mut path = Vec::new();
        walk(t, t.root, &mut path, &mut leaves_seen);
    }
    assert_eq!(leaves_seen, t.count, "reachable leaves must match len");

    // Slab accounting: every slot is either live or on its free list, and a
    // collapse-maintained binary trie has exactly len - 1 branches.
    let live_leaves = t.leaves.iter().filter(|slot| slot.is_some()).count();
    assert_eq!(live_leaves, t.count);
    assert_eq!(t.free_leaves.len(), t.leaves.len() - live_leaves);
    let live_branches = t.branches.iter().filter(|slot| slot.is_some()).count();
    assert_eq!(live_branches, t.count.saturating_sub(1));
    assert_eq!(t.free_branches.len(), t.branches.len() - live_branches);
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, Vec<u8>),
    Remove(Vec<u8>),
    Get(Vec<u8>),
    Prefix(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A dense strategy over a tiny alphabet (0x00 included, so presence
    // branching gets exercised) plus a sparse one over the full byte range.
    prop_oneof![
        prop::collection::vec(0u8..=3, 0..=6),
        prop::collection::vec(any::<u8>(), 0..=24),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let value = prop::collection::vec(any::<u8>(), 0..=8);
    let op = prop_oneof![
        50 => (key.clone(), value).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        20 => key.clone().prop_map(Op::Get),
        5 => key.clone().prop_map(Op::Prefix),
    ];
    prop::collection::vec(op, 0..=800)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_owning(ops in ops_strategy()) {
        let mut map = CritbitMap::new();
        let mut mirror: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let old = map.insert(&key, &value).expect("insert");
                    prop_assert_eq!(old.map(Vec::from), mirror.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(map.remove(&key).map(Vec::from), mirror.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(
                        map.get(&key).map(<[u8]>::to_vec),
                        mirror.get(&key).cloned()
                    );
                }
                Op::Prefix(prefix) => {
                    let got: Vec<_> = map
                        .iter_prefix(&prefix)
                        .map(|(k, v)| (k.to_vec(), v.to_vec()))
                        .collect();
                    let expected: Vec<_> = mirror
                        .iter()
                        .filter(|(k, _)| k.starts_with(&prefix))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(map.len(), mirror.len());
        }

        validate_trie(&map.raw);
        let got: Vec<_> = map.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
        let expected: Vec<_> = mirror.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_equivalence_borrowing(ops in ops_strategy()) {
        let mut map = CritbitRefMap::new();
        let mut mirror: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

        for op in &ops {
            match op {
                Op::Insert(key, value) => {
                    let old = map.insert(key, value).expect("insert");
                    prop_assert_eq!(
                        old.map(<[u8]>::to_vec),
                        mirror.insert(key.clone(), value.clone())
                    );
                }
                Op::Remove(key) => {
                    prop_assert_eq!(
                        map.remove(key).map(<[u8]>::to_vec),
                        mirror.remove(key.as_slice())
                    );
                }
                Op::Get(key) => {
                    prop_assert_eq!(
                        map.get(key).map(<[u8]>::to_vec),
                        mirror.get(key.as_slice()).cloned()
                    );
                }
                Op::Prefix(prefix) => {
                    let got: Vec<_> = map
                        .iter_prefix(prefix)
                        .map(|(k, v)| (k.to_vec(), v.to_vec()))
                        .collect();
                    let expected: Vec<_> = mirror
                        .iter()
                        .filter(|(k, _)| k.starts_with(prefix.as_slice()))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(map.len(), mirror.len());
        }

        validate_trie(&map.raw);
        let got: Vec<_> = map.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
        let expected: Vec<_> = mirror.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        prop_assert_eq!(got, expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

// A small key set dense in prefix relations: the empty key, a strict prefix
// chain, and a trailing NUL.
fn permutation_keys() -> Vec<Vec<u8>> {
    vec![
        b"".to_vec(),
        b"a".to_vec(),
        b"a\0".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"b".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = permutation_keys();

    for_each_permutation(&keys, |perm| {
        let mut map = CritbitMap::new();
        let mut mirror: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = vec![i as u8];
            assert_eq!(
                map.insert(&k, &v).expect("insert").map(Vec::from),
                mirror.insert(k, v)
            );
        }

        validate_trie(&map.raw);
        let got: Vec<_> = map.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
        let expected: Vec<_> = mirror.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = permutation_keys();

    // Insert in a fixed order, then remove in all permutations.
    let mut base_map = CritbitMap::new();
    let mut base_mirror: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        let v = vec![i as u8];
        assert_eq!(
            base_map.insert(k, &v).expect("insert").map(Vec::from),
            base_mirror.insert(k.clone(), v)
        );
    }

    for_each_permutation(&keys, |perm| {
        let mut map = base_map.clone();
        let mut mirror = base_mirror.clone();

        for k in perm {
            assert_eq!(map.remove(&k).map(Vec::from), mirror.remove(&k));
            assert_eq!(map.len(), mirror.len());
            validate_trie(&map.raw);
        }
        assert_eq!(map.len(), 0);
        assert!(map.raw.root.is_null());
    });
}
