use crate::TinyMap;

#[test]
fn empty_tiny_map() {
    let map: TinyMap<i32, i32> = TinyMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[test]
fn insert_and_get() {
    let mut map = TinyMap::new();
    assert_eq!(map.insert("a", 1), Ok(None));
    assert_eq!(map.get(&"a"), Some(&1));
    assert_eq!(map.len(), 1);
}

#[test]
fn overwrite_returns_old_value() {
    let mut map = TinyMap::new();
    map.insert("a", 1).unwrap();
    assert_eq!(map.insert("a", 2), Ok(Some(1)));
    assert_eq!(map.get(&"a"), Some(&2));
    assert_eq!(map.len(), 1);
}

#[test]
fn remove() {
    let mut map = TinyMap::new();
    map.insert("a", 1).unwrap();
    map.insert("b", 2).unwrap();
    assert_eq!(map.remove(&"a"), Some(1));
    assert_eq!(map.get(&"a"), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn remove_missing_is_none() {
    let mut map: TinyMap<i32, i32> = TinyMap::new();
    assert_eq!(map.remove(&1), None);
}

#[test]
fn promotes_past_capacity() {
    let mut map = TinyMap::new();
    let mut promoted = false;
    for i in 0..64 {
        if map.insert(i, i).is_err() {
            promoted = true;
            let champ = map.promote();
            assert_eq!(champ.len(), i);
            break;
        }
    }
    assert!(promoted, "expected promotion before exhausting the loop");
}

#[test]
fn promote_preserves_contents() {
    let mut map = TinyMap::new();
    for i in 0..10 {
        map.insert(i, i * 10).unwrap();
    }
    let champ = map.promote();
    assert_eq!(champ.len(), 10);
    for i in 0..10 {
        assert_eq!(champ.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn into_iterator() {
    let mut map = TinyMap::new();
    map.insert(1, "a").unwrap();
    map.insert(2, "b").unwrap();
    let mut items: Vec<(i32, &str)> = map.into_iter().collect();
    items.sort_unstable();
    assert_eq!(items, vec![(1, "a"), (2, "b")]);
}
