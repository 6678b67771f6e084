use std::vec::Vec;

use crate::SkipMap;

/// A copy of the level structure of a [`SkipMap`], enough to draw it.
///
/// ```text
/// level 2:  HEAD ─────────────► 30
/// level 1:  HEAD ─────► 20 ───► 30
/// level 0:  HEAD ► 10 ► 20 ───► 30 ► 40
/// ```
///
/// The picture above has `height == 2`, nodes `HEAD@2, 10@0, 20@1, 30@2,
/// 40@0` and one link per arrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<K> {
  /// The active height of the map when the snapshot was taken.
  pub height: usize,
  /// The sentinel column first, then every key in comparator order, each with
  /// the highest level it reaches.
  pub nodes: Vec<SnapshotNode<K>>,
  /// Every forward edge, top level first, left to right within a level.
  pub links: Vec<SnapshotLink<K>>,
}

/// A key, or the sentinel column, and the top of its tower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNode<K> {
  /// The key, `None` for the sentinel column.
  pub key: Option<K>,
  /// The highest level the tower reaches.
  pub level: usize,
}

/// A forward edge on one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLink<K> {
  /// The key the edge leaves, `None` when it leaves the sentinel.
  pub source: Option<K>,
  /// The key the edge reaches.
  pub target: K,
  /// The level the edge lives on.
  pub level: usize,
}

impl<K: Clone> Snapshot<K> {
  /// Walks every active level of `map` and copies out its nodes and edges.
  pub fn capture<V, C>(map: &SkipMap<K, V, C>) -> Self {
    let height = map.height();

    let mut links = Vec::new();
    for level in (0..=height).rev() {
      let mut cur = map.head(level);
      while let Some(node) = cur {
        let next = node.forward();
        if let Some(target) = next.and_then(|n| n.key()) {
          links.push(SnapshotLink {
            source: node.key().cloned(),
            target: target.clone(),
            level,
          });
        }
        cur = next;
      }
    }

    let mut nodes = Vec::with_capacity(map.len() + 1);
    nodes.push(SnapshotNode {
      key: None,
      level: height,
    });

    let mut cur = map.head(0).and_then(|head| head.forward());
    while let Some(node) = cur {
      nodes.push(SnapshotNode {
        key: node.key().cloned(),
        level: node.top().level(),
      });
      cur = node.forward();
    }

    Self {
      height,
      nodes,
      links,
    }
  }

  /// Returns the highest level `key` reaches, or `None` if it is not in the
  /// snapshot.
  pub fn level_of(&self, key: &K) -> Option<usize>
  where
    K: PartialEq,
  {
    self
      .nodes
      .iter()
      .find(|node| node.key.as_ref() == Some(key))
      .map(|node| node.level)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty() {
    let map = SkipMap::<u32, ()>::new();
    let snap = map.snapshot();

    assert_eq!(snap.height, 0);
    assert_eq!(
      snap.nodes,
      [SnapshotNode {
        key: None,
        level: 0
      }]
    );
    assert!(snap.links.is_empty());
  }

  #[test]
  fn test_picture() {
    let mut map = SkipMap::new();
    for (key, level) in [(30, 2), (10, 0), (40, 0), (20, 1)] {
      map.insert_with(key, (), |_| level);
    }

    let snap = map.snapshot();
    assert_eq!(snap.height, 2);

    let nodes: Vec<_> = snap.nodes.iter().map(|n| (n.key, n.level)).collect();
    assert_eq!(
      nodes,
      [(None, 2), (Some(10), 0), (Some(20), 1), (Some(30), 2), (Some(40), 0)]
    );

    let links: Vec<_> = snap
      .links
      .iter()
      .map(|l| (l.source, l.target, l.level))
      .collect();
    assert_eq!(
      links,
      [
        (None, 30, 2),
        (None, 20, 1),
        (Some(20), 30, 1),
        (None, 10, 0),
        (Some(10), 20, 0),
        (Some(20), 30, 0),
        (Some(30), 40, 0),
      ]
    );

    assert_eq!(snap.level_of(&30), Some(2));
    assert_eq!(snap.level_of(&99), None);
  }

  #[test]
  fn test_snapshot_follows_shrink() {
    let mut map = SkipMap::new();
    map.insert_with(1, (), |_| 0);
    map.insert_with(2, (), |_| 4);

    assert_eq!(map.snapshot().height, 4);

    map.remove(&2);
    let snap = map.snapshot();
    assert_eq!(snap.height, 0);
    assert_eq!(snap.links.len(), 1);
    assert_eq!(snap.level_of(&1), Some(0));
  }
}
