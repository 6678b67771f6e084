use std::vec::Vec;

use super::NodeRef;
use crate::arena::{Arena, Handle};

/// The nodes one [`search`](super::SkipMap::search) visited, in visit order.
///
/// A path starts at the sentinel of the active top level and records every
/// forward step and every step down. It borrows the map, so it always
/// describes the structure it was recorded on; to keep a trace across
/// mutations, copy the [`links`](Path::links) out.
pub struct Path<'a, K, V> {
  arena: &'a Arena<K, V>,
  visits: Vec<Handle>,
}

/// One step of a [`Path`]: the move from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLink<'a, K> {
  /// Key of the node the step leaves, `None` for a sentinel.
  pub source: Option<&'a K>,
  /// Key of the node the step reaches, `None` for a sentinel.
  pub target: Option<&'a K>,
  /// Level of the node the step leaves.
  pub level: usize,
}

impl<'a, K, V> Path<'a, K, V> {
  #[inline]
  pub(super) fn new(arena: &'a Arena<K, V>, visits: Vec<Handle>) -> Self {
    Self { arena, visits }
  }

  /// Returns the number of visited nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.visits.len()
  }

  /// Returns `true` if nothing was visited. A recorded search never is.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.visits.is_empty()
  }

  /// Returns the `idx`-th visited node.
  #[inline]
  pub fn get(&self, idx: usize) -> Option<NodeRef<'a, K, V>> {
    self
      .visits
      .get(idx)
      .map(|&handle| NodeRef::new(self.arena, handle))
  }

  /// Returns the node the search started from.
  #[inline]
  pub fn first(&self) -> Option<NodeRef<'a, K, V>> {
    self.get(0)
  }

  /// Returns the node the search stopped at.
  #[inline]
  pub fn last(&self) -> Option<NodeRef<'a, K, V>> {
    self.visits.len().checked_sub(1).and_then(|idx| self.get(idx))
  }

  /// Returns an iterator over the visited nodes.
  pub fn iter(&self) -> impl Iterator<Item = NodeRef<'a, K, V>> + '_ {
    let arena = self.arena;
    self
      .visits
      .iter()
      .map(move |&handle| NodeRef::new(arena, handle))
  }

  /// Returns an iterator over consecutive pairs of visits.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert(1, ());
  ///
  /// let (_, path) = map.search(&1);
  /// let links: Vec<_> = path.links().collect();
  /// assert_eq!(links.len(), path.len() - 1);
  /// assert_eq!(links[0].source, None);
  /// assert_eq!(links.last().unwrap().target, Some(&1));
  /// ```
  pub fn links(&self) -> impl Iterator<Item = PathLink<'a, K>> + '_ {
    let arena = self.arena;
    self.visits.windows(2).map(move |pair| {
      let source = &arena[pair[0]];
      PathLink {
        source: source.key.as_ref(),
        target: arena[pair[1]].key.as_ref(),
        level: source.level,
      }
    })
  }
}

impl<K: core::fmt::Debug, V> core::fmt::Debug for Path<'_, K, V> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_list()
      .entries(self.iter().map(|node| (node.key(), node.level())))
      .finish()
  }
}
