use super::*;
use crate::{Builder, Descend, MAX_LEVEL};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};

/// Walks the sentinel column and every level, and the whole arena, checking
/// the structural invariants.
fn assert_invariants<K, V, C>(map: &SkipMap<K, V, C>)
where
  K: core::fmt::Debug + Clone + PartialEq,
  C: Comparator<K>,
{
  assert_eq!(map.heads.len(), map.opts.max_level);
  assert!(map.height < map.heads.len());

  let mut nodes_per_level = std::vec![0usize; map.heads.len()];

  for (level, &head) in map.heads.iter().enumerate() {
    let sentinel = &map.arena[head];
    assert!(sentinel.is_sentinel());
    assert_eq!(sentinel.level, level);
    assert_eq!(sentinel.backward, None);
    assert_eq!(sentinel.down, level.checked_sub(1).map(|l| map.heads[l]));
    assert_eq!(sentinel.up, map.heads.get(level + 1).copied());

    let mut prev = head;
    let mut cur = sentinel.forward;
    while let Some(handle) = cur {
      let node = &map.arena[handle];
      let key = node.key.as_ref().expect("real node without a key");
      assert!(node.value.is_some());
      assert_eq!(node.level, level);
      assert_eq!(node.backward, Some(prev), "broken backward link at {key:?}");

      if let Some(prev_key) = map.arena[prev].key.as_ref() {
        assert_eq!(
          map.cmp.compare(prev_key, key),
          Ordering::Less,
          "level {level} is not strictly ascending at {key:?}"
        );
      }

      // Towers are contiguous from level 0.
      if level == 0 {
        assert_eq!(node.down, None);
      } else {
        let down = node.down.expect("tower has a gap");
        let below = &map.arena[down];
        assert_eq!(below.key.as_ref(), Some(key));
        assert_eq!(below.level, level - 1);
        assert_eq!(below.up, Some(handle));
      }
      if let Some(up) = node.up {
        assert_eq!(map.arena[up].down, Some(handle));
        assert_eq!(map.arena[up].key.as_ref(), Some(key));
      }

      nodes_per_level[level] += 1;
      prev = handle;
      cur = node.forward;
    }

    if level > map.height {
      assert_eq!(nodes_per_level[level], 0, "keys above the active height");
    }
  }

  if map.height > 0 {
    assert!(nodes_per_level[map.height] > 0, "active top level is empty");
  }
  assert_eq!(nodes_per_level[0], map.len);

  // Nothing live points at a freed slot.
  let total: usize = nodes_per_level.iter().sum();
  assert_eq!(map.arena.len(), total + map.heads.len());
  for (_, node) in map.arena.iter() {
    for link in [node.up, node.down, node.forward, node.backward]
      .into_iter()
      .flatten()
    {
      assert!(map.arena.get(link).is_some(), "dangling link");
    }
  }
}

fn tower_height<K, V, C: Comparator<K>>(map: &SkipMap<K, V, C>, key: &K) -> Option<usize> {
  let (found, _) = map.search(key);
  found.map(|node| node.top().level())
}

fn keys<K: Clone, V, C>(map: &SkipMap<K, V, C>) -> Vec<K> {
  map.iter().map(|(k, _)| k.clone()).collect()
}

fn seeded<K: Ord, V>(seed: u64) -> SkipMap<K, V> {
  Builder::new().with_seed(Some(seed)).build().unwrap()
}

#[test]
fn test_empty() {
  let map = SkipMap::<u32, u32>::new();

  assert!(map.is_empty());
  assert_eq!(map.height(), 0);
  assert_eq!(map.max_level(), MAX_LEVEL);
  assert!(map.get(&1).is_none());
  assert!(!map.contains_key(&1));
  assert!(map.front().is_none());
  assert!(map.back().is_none());
  assert_eq!(map.iter().count(), 0);

  let (found, path) = map.search(&1);
  assert!(found.is_none());
  assert_eq!(path.len(), 1);
  assert!(path.first().unwrap().is_sentinel());
  assert_invariants(&map);
}

#[test]
fn test_overwrite_keeps_order() {
  let mut map = seeded(1);
  map.insert(50, "A");
  map.insert(10, "A");
  map.insert(30, "A");
  assert_eq!(map.insert(10, "B"), Some("A"));

  assert_eq!(map.get(&10), Some(&"B"));
  assert_eq!(keys(&map), [10, 30, 50]);
  assert_eq!(map.len(), 3);
  assert_invariants(&map);
}

#[test]
fn test_remove_middle() {
  let mut map = seeded(2);
  for k in 1..=7 {
    map.insert(k, k * 10);
  }

  assert_eq!(map.remove(&4), Some(40));

  let (found, _) = map.search(&4);
  assert!(found.is_none());

  let three = map.search(&3).0.unwrap();
  let five = map.search(&5).0.unwrap();
  assert_eq!(three.forward(), Some(five));
  assert_eq!(five.backward(), Some(three));
  assert_invariants(&map);
}

#[test]
fn test_height_follows_single_tower() {
  let mut map = SkipMap::new();
  assert_eq!(map.height(), 0);

  map.insert_with(7, "x", |_| 3);
  assert_eq!(map.height(), 3);
  assert_eq!(tower_height(&map, &7), Some(3));
  assert_invariants(&map);

  assert_eq!(map.remove(&7), Some("x"));
  assert_eq!(map.height(), 0);
  assert_invariants(&map);
}

#[test]
fn test_absent_path_ends_at_predecessor() {
  let mut map = seeded(4);
  for k in [10, 20, 30] {
    map.insert(k, ());
  }

  let (found, path) = map.search(&99);
  assert!(found.is_none());

  let first = path.first().unwrap();
  assert!(first.is_sentinel());
  assert_eq!(first.level(), map.height());

  let last = path.last().unwrap();
  assert_eq!(last.key(), Some(&30));
  assert_eq!(last.level(), 0);

  let last_real = path.iter().filter(|n| !n.is_sentinel()).last().unwrap();
  assert_eq!(last_real.key(), Some(&30));
}

#[test]
fn test_absent_path_below_first_key() {
  let mut map = seeded(5);
  for k in [10, 20, 30] {
    map.insert(k, ());
  }

  let (found, path) = map.search(&5);
  assert!(found.is_none());
  assert!(path.iter().all(|n| n.is_sentinel()));
  assert_eq!(path.len(), map.height() + 1);
  assert_eq!(path.last().unwrap().level(), 0);
}

#[test]
fn test_path_steps_are_forward_or_down() {
  let mut map = seeded(6);
  for k in 0..200u32 {
    map.insert(k * 3, k);
  }

  for target in [0, 1, 150, 299, 597, 1000] {
    let (found, path) = map.search(&target);
    let visits: Vec<_> = path.iter().collect();

    for pair in visits.windows(2) {
      let (from, to) = (pair[0], pair[1]);
      if from.forward() == Some(to) {
        continue;
      }
      assert_eq!(from.down(), Some(to), "path jumps between unrelated nodes");
    }

    match found {
      Some(node) => {
        assert_eq!(node.key(), Some(&target));
        assert_eq!(node.level(), 0);
        assert_eq!(path.last(), Some(node));
      }
      None => assert_eq!(path.last().unwrap().level(), 0),
    }
  }
}

#[test]
fn test_path_links() {
  let mut map = SkipMap::new();
  map.insert_with(10, (), |_| 0);
  map.insert_with(20, (), |_| 1);
  map.insert_with(30, (), |_| 0);

  let (_, path) = map.search(&30);
  let links: Vec<_> = path.links().map(|l| (l.source, l.target, l.level)).collect();
  assert_eq!(
    links,
    [
      (None, Some(&20), 1),
      (Some(&20), Some(&20), 1),
      (Some(&20), Some(&30), 0),
    ]
  );
}

#[test]
fn test_round_trip() {
  let mut map = seeded(7);
  for i in 0..500u32 {
    map.insert(i, i.to_string());
    let (found, _) = map.search(&i);
    assert_eq!(found.and_then(|n| n.value()), Some(&i.to_string()));
  }
  assert_invariants(&map);
}

#[test]
fn test_overwrite_preserves_height() {
  let mut map = SkipMap::new();
  map.insert_with(1, "v1", |_| 5);
  assert_eq!(map.insert_with(1, "v2", |_| 0), Some("v1"));

  assert_eq!(tower_height(&map, &1), Some(5));
  assert_eq!(map.len(), 1);

  // Every node of the tower carries the new value.
  let mut node = map.search(&1).0;
  while let Some(n) = node {
    assert_eq!(n.value(), Some(&"v2"));
    node = n.up();
  }
  assert_invariants(&map);
}

#[test]
fn test_overwrite_does_not_draw_height() {
  let mut map = SkipMap::new();
  map.insert_with(1, 1, |_| 2);

  let mut drawn = false;
  map.insert_with(1, 2, |_| {
    drawn = true;
    9
  });
  assert!(!drawn);
}

#[test]
fn test_remove_unlinks_whole_tower() {
  let mut map = seeded(8);
  for k in 0..64u32 {
    map.insert(k, k);
  }
  map.insert_with(100, 100, |_| 6);
  map.insert(101, 101);

  let bottom = match map.find(&100, &mut ()) {
    Lookup::Found(handle) => handle,
    Lookup::Absent(_) => panic!("key 100 missing"),
  };
  let mut tower = Vec::new();
  let mut cur = Some(bottom);
  while let Some(handle) = cur {
    tower.push(handle);
    cur = map.arena[handle].up;
  }
  assert_eq!(tower.len(), 7);

  assert_eq!(map.remove(&100), Some(100));

  for handle in &tower {
    assert!(map.arena.get(*handle).is_none());
  }
  for (_, node) in map.arena.iter() {
    for link in [node.up, node.down, node.forward, node.backward]
      .into_iter()
      .flatten()
    {
      assert!(!tower.contains(&link));
    }
  }
  assert!(!map.contains_key(&100));
  assert!(map.contains_key(&101));
  assert_invariants(&map);
}

#[test]
fn test_shrink_skips_every_empty_level() {
  let mut map = SkipMap::new();
  map.insert_with(1, (), |_| 2);
  map.insert_with(2, (), |_| 7);
  assert_eq!(map.height(), 7);

  map.remove(&2);
  assert_eq!(map.height(), 2);
  assert_invariants(&map);

  map.remove(&1);
  assert_eq!(map.height(), 0);
  assert_invariants(&map);
}

#[test]
fn test_shrink_only_when_top_empties() {
  let mut map = SkipMap::new();
  map.insert_with(1, (), |_| 4);
  map.insert_with(2, (), |_| 4);

  map.remove(&1);
  assert_eq!(map.height(), 4);
  map.remove(&2);
  assert_eq!(map.height(), 0);
}

#[test]
fn test_remove_absent_is_noop() {
  let mut map = seeded(9);
  for k in [3, 1, 4, 1, 5, 9, 2, 6] {
    map.insert(k, k);
  }
  let before = map.snapshot();
  let len = map.len();

  assert_eq!(map.remove(&7), None);
  assert_eq!(map.remove(&100), None);

  assert_eq!(map.snapshot(), before);
  assert_eq!(map.len(), len);
  assert_invariants(&map);

  let mut empty = SkipMap::<u8, u8>::new();
  assert_eq!(empty.remove(&1), None);
  assert_eq!(empty.height(), 0);
}

#[test]
fn test_height_clamped_to_column() {
  let mut map = Builder::new().with_max_level(4).build().unwrap();
  map.insert_with(1, (), |_| 100);
  assert_eq!(map.height(), 3);
  assert_eq!(tower_height(&map, &1), Some(3));
  assert_invariants(&map);
}

#[test]
fn test_random_level_bounds() {
  let mut map = Builder::new()
    .with_max_level(3)
    .with_probability(0.99)
    .with_seed(Some(11))
    .build::<u32, ()>()
    .unwrap();

  let levels: BTreeSet<_> = (0..1000).map(|_| map.random_level()).collect();
  assert!(levels.iter().all(|&l| l <= 2));
  assert!(levels.contains(&2));
}

#[test]
fn test_random_level_is_geometric() {
  let mut map = seeded::<u32, ()>(12);
  let n = 20_000;
  let ground = (0..n).filter(|_| map.random_level() == 0).count();

  // P(level == 0) = 1/2.
  assert!((n * 45 / 100..n * 55 / 100).contains(&ground), "{ground}");
}

#[test]
fn test_front_back() {
  let mut map = seeded(13);
  for k in [40, 10, 30, 20] {
    map.insert(k, k * 2);
  }

  assert_eq!(map.front(), Some((&10, &20)));
  assert_eq!(map.back(), Some((&40, &80)));

  map.remove(&40);
  assert_eq!(map.back(), Some((&30, &60)));
}

#[test]
fn test_iter() {
  let map: SkipMap<_, _> = (0..100u32).rev().map(|k| (k, k + 1)).collect();

  let iter = map.iter();
  assert_eq!(iter.len(), 100);
  let entries: Vec<_> = iter.map(|(k, v)| (*k, *v)).collect();
  assert_eq!(entries, (0..100).map(|k| (k, k + 1)).collect::<Vec<_>>());

  let mut count = 0;
  for (k, v) in &map {
    assert_eq!(*v, *k + 1);
    count += 1;
  }
  assert_eq!(count, 100);
}

#[test]
fn test_clear() {
  let mut map = seeded(14);
  for k in 0..50u32 {
    map.insert(k, k);
  }
  map.clear();

  assert!(map.is_empty());
  assert_eq!(map.height(), 0);
  assert_eq!(map.iter().count(), 0);
  assert_invariants(&map);

  map.insert(1, 1);
  assert_eq!(map.get(&1), Some(&1));
  assert_invariants(&map);
}

#[test]
fn test_head_accessors() {
  let mut map = SkipMap::new();
  map.insert_with(5, (), |_| 2);

  let top = map.top_head();
  assert!(top.is_sentinel());
  assert_eq!(top.level(), 2);
  assert_eq!(top.forward().and_then(|n| n.key()), Some(&5));
  assert_eq!(map.head(2), Some(top));

  let ground = map.head(0).unwrap();
  assert_eq!(top.bottom(), ground);
  assert_eq!(ground.top().level(), MAX_LEVEL - 1);
  assert!(map.head(MAX_LEVEL).is_none());
  assert!(map.head(3).unwrap().forward().is_none());
}

#[test]
fn test_descending_order() {
  let mut map = Builder::new()
    .with_comparator(Descend)
    .with_seed(Some(15))
    .build()
    .unwrap();
  for k in 0..100u32 {
    map.insert(k, ());
  }
  map.remove(&50);

  assert_eq!(map.front(), Some((&99, &())));
  assert_eq!(map.back(), Some((&0, &())));
  assert!(!map.contains_key(&50));
  assert_invariants(&map);
}

#[test]
fn test_randomized_against_btreemap() {
  let mut rng = SmallRng::seed_from_u64(0x5eed);
  let mut map = seeded(16);
  let mut model = BTreeMap::new();

  for step in 0..5_000u32 {
    let key = rng.random_range(0..300u32);
    if rng.random_bool(0.6) {
      assert_eq!(map.insert(key, step), model.insert(key, step));
    } else {
      assert_eq!(map.remove(&key), model.remove(&key));
    }

    if step % 250 == 0 {
      assert_invariants(&map);
    }
  }

  assert_invariants(&map);
  assert_eq!(map.len(), model.len());
  assert!(map.iter().eq(model.iter()));
  for key in 0..300u32 {
    assert_eq!(map.get(&key), model.get(&key));
  }

  let keys: Vec<_> = model.keys().copied().collect();
  for key in keys {
    map.remove(&key);
  }
  assert!(map.is_empty());
  assert_eq!(map.height(), 0);
  assert_invariants(&map);
}
