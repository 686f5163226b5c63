use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

fn key_strategy() -> impl Strategy<Value = String> {
    // Tiny alphabet so keys repeat and counts climb above one.
    "[a-dA-C]{1,3}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 30)]
    Delete(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 15)]
    Count(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 5)]
    Rebalance,
}

/// Multiset semantics: returns whether the key was present.
fn model_delete(model: &mut BTreeMap<String, usize>, key: &str) -> bool {
    match model.get(key).copied() {
        None => false,
        Some(1) => {
            model.remove(key);
            true
        }
        Some(c) => {
            model.insert(key.to_owned(), c - 1);
            true
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_multiset_model(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let tree = ShareableTree::new();
        let mut model: BTreeMap<String, usize> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    tree.insert(&key).unwrap();
                    *model.entry(key).or_insert(0) += 1;
                }
                Op::Delete(key) => {
                    let found = tree.delete(&key).unwrap();
                    prop_assert_eq!(found, model_delete(&mut model, &key));
                }
                Op::Count(key) => {
                    prop_assert_eq!(tree.count(&key).unwrap(), model.get(&key).copied());
                    prop_assert_eq!(tree.search(&key).unwrap().is_some(), model.contains_key(&key));
                }
                Op::Rebalance => {
                    let before = tree.height();
                    tree.rebalance();
                    prop_assert!(tree.height() <= before);
                    prop_assert_eq!(tree.height(), node::min_height(model.len()));
                }
            }

            prop_assert_eq!(tree.len(), model.len());
        }

        node::validate(&tree.root.read());
        let expected: Vec<(String, usize)> = model.into_iter().collect();
        prop_assert_eq!(tree.entries(), expected);
    }

    #[test]
    fn prop_rebalance_idempotent(words in prop::collection::vec(key_strategy(), 0..=200)) {
        let tree = ShareableTree::new();
        for w in &words {
            tree.insert(w).unwrap();
        }
        let height_before = tree.height();
        let entries_before = tree.entries();

        tree.rebalance();
        let dump_first = tree.dump();
        let height_first = tree.height();
        tree.rebalance();

        prop_assert_eq!(tree.dump(), dump_first);
        prop_assert_eq!(tree.height(), height_first);
        prop_assert!(height_first <= height_before);
        prop_assert_eq!(tree.entries(), entries_before);
    }

    #[test]
    fn prop_bulk_build_counts(words in prop::collection::vec(key_strategy(), 0..=300)) {
        let tree = ShareableTree::from_words(&words).unwrap();
        let mut model: BTreeMap<String, usize> = BTreeMap::new();
        for w in words {
            *model.entry(w).or_insert(0) += 1;
        }

        prop_assert_eq!(tree.height(), node::min_height(model.len()));
        let expected: Vec<(String, usize)> = model.into_iter().collect();
        prop_assert_eq!(tree.entries(), expected);
    }
}

/// Calls `f` once per ordering of `keys` (Heap's algorithm, iterative).
fn for_each_permutation(keys: &[&str], mut f: impl FnMut(&[&str])) {
    let mut order = keys.to_vec();
    let mut c = vec![0usize; order.len()];
    f(&order);
    let mut i = 1;
    while i < order.len() {
        if c[i] < i {
            let j = if i % 2 == 0 { 0 } else { c[i] };
            order.swap(j, i);
            f(&order);
            c[i] += 1;
            i = 1;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = ["d", "b", "f", "a", "c", "e"];

    for_each_permutation(&keys, |perm| {
        let tree = ShareableTree::new();
        for k in perm {
            tree.insert(k).unwrap();
        }
        node::validate(&tree.root.read());
        assert_eq!(tree.dump(), ">a,b,c,d,e,f");
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    // Built in a fixed order that leaves several two-child nodes, then torn
    // down in every order. Each key is present twice.
    let keys = ["d", "b", "f", "a", "c", "e", "g"];

    for_each_permutation(&keys, |perm| {
        let tree = ShareableTree::new();
        for k in keys.iter().chain(keys.iter()) {
            tree.insert(k).unwrap();
        }

        let mut model: BTreeMap<String, usize> = keys.iter().map(|k| (k.to_string(), 2)).collect();
        for round in 0..2 {
            for k in perm {
                assert!(tree.delete(k).unwrap());
                model_delete(&mut model, k);
                node::validate(&tree.root.read());
                let expected: Vec<(String, usize)> = model.clone().into_iter().collect();
                assert_eq!(tree.entries(), expected, "round {round}, after deleting {k}");
            }
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
    });
}
