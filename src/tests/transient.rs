use crate::ChampError;
use crate::ChampMap;

#[test]
fn seeded_from_empty_map() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let t = map.as_transient();
    assert_eq!(t.count(), Ok(0));
}

#[test]
fn assoc_and_lookup() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let mut t = map.as_transient();
    assert_eq!(t.assoc(1, 100).unwrap(), None);
    assert_eq!(t.assoc(2, 200).unwrap(), None);
    assert_eq!(t.lookup(&1).unwrap(), Some(&100));
    assert_eq!(t.count().unwrap(), 2);
}

#[test]
fn assoc_overwrite_returns_old() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let mut t = map.as_transient();
    t.assoc(1, 1).unwrap();
    assert_eq!(t.assoc(1, 2).unwrap(), Some(1));
    assert_eq!(t.count().unwrap(), 1);
}

#[test]
fn dissoc_removes() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let mut t = map.as_transient();
    t.assoc(1, 1).unwrap();
    t.assoc(2, 2).unwrap();
    assert_eq!(t.dissoc(&1).unwrap(), Some(1));
    assert_eq!(t.lookup(&1).unwrap(), None);
    assert_eq!(t.count().unwrap(), 1);
}

#[test]
fn source_map_untouched() {
    let mut map = ChampMap::new();
    map.insert(1, 1);
    let mut t = map.as_transient();
    t.assoc(2, 2).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&2), None);
}

#[test]
fn persistent_matches_edits() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let mut t = map.as_transient();
    for i in 0..200 {
        t.assoc(i, i * 2).unwrap();
    }
    for i in (0..200).step_by(3) {
        t.dissoc(&i).unwrap();
    }
    let result = t.persistent().unwrap();
    for i in 0..200 {
        if i % 3 == 0 {
            assert_eq!(result.get(&i), None);
        } else {
            assert_eq!(result.get(&i), Some(&(i * 2)));
        }
    }
}

#[test]
fn dead_after_persistent() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let mut t = map.as_transient();
    t.assoc(1, 1).unwrap();
    let _ = t.persistent().unwrap();
    assert!(matches!(t.count(), Err(ChampError::TransientDead)));
    assert!(matches!(t.assoc(2, 2), Err(ChampError::TransientDead)));
}

#[test]
fn transient_with_collisions() {
    use std::hash::{Hash, Hasher};

    #[derive(Clone, PartialEq, Eq)]
    struct Colliding(u32, u64);
    impl Hash for Colliding {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.1.hash(state);
        }
    }

    let map: ChampMap<Colliding, i32> = ChampMap::new();
    let mut t = map.as_transient();
    let k1 = Colliding(1, 0xF00D);
    let k2 = Colliding(2, 0xF00D);
    t.assoc(k1.clone(), 1).unwrap();
    t.assoc(k2.clone(), 2).unwrap();
    assert_eq!(t.lookup(&k1).unwrap(), Some(&1));
    assert_eq!(t.dissoc(&k1).unwrap(), Some(1));
    assert_eq!(t.lookup(&k2).unwrap(), Some(&2));
    let result = t.persistent().unwrap();
    assert_eq!(result.get(&k2), Some(&2));
}
