//! Property-based tests over arbitrary key/value sequences.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::ChampMap;

fn small_key() -> impl Strategy<Value = i32> {
    -64..64_i32
}

proptest! {
    #[test]
    fn get_after_insert_roundtrips(pairs in vec((small_key(), any::<i32>()), 0..200)) {
        let mut map = ChampMap::new();
        let mut model = std::collections::HashMap::new();
        for (k, v) in pairs {
            map.insert(k, v);
            model.insert(k, v);
        }
        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }
        prop_assert_eq!(map.len(), model.len());
    }

    #[test]
    fn remove_then_lookup_is_none(pairs in vec((small_key(), any::<i32>()), 0..200)) {
        let mut map = ChampMap::new();
        for (k, v) in &pairs {
            map.insert(*k, *v);
        }
        for (k, _) in &pairs {
            map.remove(k);
            prop_assert_eq!(map.get(k), None);
        }
        prop_assert_eq!(map.len(), 0);
    }

    #[test]
    fn insertion_order_does_not_affect_adhash(pairs in vec((small_key(), any::<i32>()), 0..100)) {
        let mut forward = ChampMap::new();
        for (k, v) in &pairs {
            forward.insert(*k, *v);
        }
        let mut backward = ChampMap::new();
        for (k, v) in pairs.iter().rev() {
            backward.insert(*k, *v);
        }
        if forward.len() == backward.len() {
            prop_assert_eq!(forward.adhash(), backward.adhash());
        }
    }

    #[test]
    fn iteration_visits_every_key_exactly_once(pairs in vec((small_key(), any::<i32>()), 0..200)) {
        let mut map = ChampMap::new();
        let mut model = std::collections::HashSet::new();
        for (k, v) in pairs {
            map.insert(k, v);
            model.insert(k);
        }
        let mut seen: Vec<i32> = map.iter().map(|(&k, _)| k).collect();
        seen.sort_unstable();
        let mut expected: Vec<i32> = model.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn transient_roundtrip_matches_persistent_edits(
        initial in vec((small_key(), any::<i32>()), 0..50),
        edits in vec((small_key(), any::<i32>(), any::<bool>()), 0..100),
    ) {
        let mut map = ChampMap::new();
        for (k, v) in &initial {
            map.insert(*k, *v);
        }

        let mut model: std::collections::HashMap<i32, i32> =
            map.iter().map(|(&k, &v)| (k, v)).collect();

        let mut t = map.as_transient();
        for (k, v, remove) in edits {
            if remove {
                t.dissoc(&k).unwrap();
                model.remove(&k);
            } else {
                t.assoc(k, v).unwrap();
                model.insert(k, v);
            }
        }
        let result = t.persistent().unwrap();

        prop_assert_eq!(result.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(result.get(k), Some(v));
        }
    }

    #[test]
    fn merge_of_a_with_itself_as_ancestor_and_b_is_identity(
        pairs in vec((small_key(), any::<i32>()), 0..100),
        extra in vec((small_key(), any::<i32>()), 0..50),
    ) {
        let mut ancestor = ChampMap::new();
        for (k, v) in &pairs {
            ancestor.insert(*k, *v);
        }
        let mut a = ChampMap::new();
        for (k, v) in &pairs {
            a.insert(*k, *v);
        }
        for (k, v) in &extra {
            a.insert(*k, *v);
        }

        let merged = crate::ops::merge::merge(&ancestor, &a, &ancestor, |_, _, av, _| {
            Ok(av.copied())
        }).unwrap();

        prop_assert_eq!(merged.len(), a.len());
        for (k, v) in a.iter() {
            prop_assert_eq!(merged.get(k), Some(v));
        }
    }
}
