use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Checks the size invariant at every node and that no empty branch survives.
fn validate_node<V>(node: &Node<V>, is_root: bool) -> usize {
    if !is_root {
        assert!(
            node.value.is_some() || !node.children.is_empty(),
            "reachable non-root node must hold a value or children"
        );
    }

    let mut below = 0usize;
    for child in node.children.values() {
        below += validate_node(child, false);
    }
    assert_eq!(node.size, below, "stored size must match children");
    node.len()
}

fn validate_trie<V>(t: &Trie<V>) {
    assert!(t.root.value.is_none(), "root never holds a value");
    assert_eq!(validate_node(&t.root, true), t.len());
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // A small alphabet makes shared prefixes and prefix-of-key cases common.
    prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'.'), any::<u8>()], 0..=12)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Put(#[proptest(strategy = "key_strategy()")] Vec<u8>, u64),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 15)]
    Get(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 10)]
    LongestPrefix(#[proptest(strategy = "key_strategy()")] Vec<u8>),
}

fn model_longest_prefix(m: &BTreeMap<Vec<u8>, u64>, key: &[u8]) -> usize {
    (1..=key.len())
        .rev()
        .find(|&end| m.contains_key(&key[..end]))
        .unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=1000)) {
        let mut t: Trie<u64> = Trie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    if key.is_empty() {
                        prop_assert_eq!(t.put(&key, value), Err(TrieError::EmptyKey));
                    } else {
                        prop_assert_eq!(t.put(&key, value), Ok(m.insert(key, value)));
                    }
                }
                Op::Remove(key) => {
                    if key.is_empty() {
                        prop_assert_eq!(t.remove(&key), Err(TrieError::EmptyKey));
                    } else {
                        prop_assert_eq!(t.remove(&key), Ok(m.remove(&key)));
                    }
                }
                Op::Get(key) => {
                    if key.is_empty() {
                        prop_assert_eq!(t.get(&key), Err(TrieError::EmptyKey));
                    } else {
                        prop_assert_eq!(t.get(&key), Ok(m.get(&key)));
                        let has_prefix = m.range(key.clone()..).next().is_some_and(|(k, _)| k.starts_with(&key));
                        prop_assert_eq!(t.contains(&key), Ok(has_prefix));
                    }
                }
                Op::LongestPrefix(key) => {
                    if key.is_empty() {
                        prop_assert_eq!(t.longest_prefix_of(&key), Err(TrieError::EmptyKey));
                    } else {
                        let expected = model_longest_prefix(&m, &key);
                        prop_assert_eq!(t.longest_prefix_of(&key), Ok(&key[..expected]));
                    }
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_trie(&t);
        let got: Vec<(Vec<u8>, u64)> = t.items().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_keys_with_prefix(
        keys in prop::collection::btree_set(key_strategy(), 0..64),
        prefix in key_strategy(),
    ) {
        let mut t: Trie<()> = Trie::new();
        for key in keys.iter().filter(|k| !k.is_empty()) {
            t.put(key, ()).unwrap();
        }

        let got: Vec<Vec<u8>> = t.keys_with_prefix(&prefix).collect();
        let expected: Vec<Vec<u8>> = keys
            .iter()
            .filter(|k| !k.is_empty() && k.starts_with(&prefix))
            .cloned()
            .collect();
        prop_assert_eq!(got, expected);
    }
}

/// Nested terminals along one path, plus siblings that share part of it.
const NESTED_KEYS: [&str; 6] = [
    "www",
    "www.test",
    "www.test.com",
    "www.example.com",
    "w",
    "example.com",
];

/// Steps `order` to its next lexicographic permutation; false once it wraps.
fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = order.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let swap = order
        .iter()
        .rposition(|&x| x > order[pivot])
        .expect("a larger element follows the pivot");
    order.swap(pivot, swap);
    order[pivot + 1..].reverse();
    true
}

fn model_has_prefix(m: &BTreeMap<Vec<u8>, u64>, prefix: &[u8]) -> bool {
    m.keys().any(|k| k.starts_with(prefix))
}

#[test]
fn put_order_does_not_change_structure() {
    let mut order: Vec<usize> = (0..NESTED_KEYS.len()).collect();
    let reference: Vec<Vec<u8>> = {
        let mut sorted: Vec<Vec<u8>> = NESTED_KEYS.iter().map(|k| k.as_bytes().to_vec()).collect();
        sorted.sort();
        sorted
    };

    loop {
        let mut t: Trie<u64> = Trie::new();
        for (step, &i) in order.iter().enumerate() {
            assert_eq!(t.put(NESTED_KEYS[i], i as u64), Ok(None));
            assert_eq!(t.len(), step + 1);
        }
        validate_trie(&t);

        assert_eq!(t.keys().collect::<Vec<_>>(), reference);
        for (i, key) in NESTED_KEYS.iter().enumerate() {
            assert_eq!(t.get(key), Ok(Some(&(i as u64))));
        }
        assert_eq!(t.longest_prefix_of("www.test.co"), Ok(&b"www.test"[..]));
        assert_eq!(t.longest_prefix_of("wx"), Ok(&b"w"[..]));

        if !next_permutation(&mut order) {
            break;
        }
    }
}

#[test]
fn delete_order_prunes_exactly_dead_prefixes() {
    let mut base: Trie<u64> = Trie::new();
    let mut base_model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    for (i, key) in NESTED_KEYS.iter().enumerate() {
        base.put(key, i as u64).unwrap();
        base_model.insert(key.as_bytes().to_vec(), i as u64);
    }

    let mut order: Vec<usize> = (0..NESTED_KEYS.len()).collect();
    loop {
        let mut t = base.clone();
        let mut m = base_model.clone();

        for &i in &order {
            let key = NESTED_KEYS[i].as_bytes();
            assert_eq!(t.remove(key), Ok(m.remove(key)));
            assert_eq!(t.len(), m.len());
            validate_trie(&t);

            // Every prefix of the deleted key survives only while some
            // remaining key still runs through it.
            for end in 1..=key.len() {
                let prefix = &key[..end];
                assert_eq!(
                    t.contains(prefix),
                    Ok(model_has_prefix(&m, prefix)),
                    "prefix {:?} after deleting {:?}",
                    prefix.escape_ascii().to_string(),
                    NESTED_KEYS[i],
                );
            }
            assert_eq!(t.contains_key(key), Ok(false));
        }
        assert!(t.is_empty());
        assert!(t.root.children.is_empty());

        if !next_permutation(&mut order) {
            break;
        }
    }
}
