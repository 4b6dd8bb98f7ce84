use crate::ChampMap;

#[test]
fn empty_iter() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn iter_visits_all_entries() {
    let mut map = ChampMap::new();
    for i in 0..50 {
        map.insert(i, i * 2);
    }
    let mut seen: Vec<(i32, i32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
    seen.sort_unstable();
    let expected: Vec<(i32, i32)> = (0..50).map(|i| (i, i * 2)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn iter_after_remove() {
    let mut map = ChampMap::new();
    for i in 0..20 {
        map.insert(i, i);
    }
    for i in (0..20).step_by(2) {
        map.remove(&i);
    }
    let mut seen: Vec<i32> = map.iter().map(|(&k, _)| k).collect();
    seen.sort_unstable();
    let expected: Vec<i32> = (0..20).filter(|i| i % 2 != 0).collect();
    assert_eq!(seen, expected);
}

#[test]
fn iter_is_lazy_and_exact_size() {
    let mut map = ChampMap::new();
    for i in 0..30 {
        map.insert(i, i);
    }
    let mut it = map.iter();
    assert_eq!(it.len(), 30);
    it.next();
    assert_eq!(it.len(), 29);
}

#[test]
fn into_iterator_by_ref() {
    let mut map = ChampMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    let mut count = 0;
    for (_, _) in &map {
        count += 1;
    }
    assert_eq!(count, 2);
}
