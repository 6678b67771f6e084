use crate::{
  arena::{Arena, Handle},
  node::Node,
};

/// A read-only view of one node in a [`SkipMap`](super::SkipMap).
///
/// Follow [`forward`](NodeRef::forward) and [`backward`](NodeRef::backward)
/// along a level, [`up`](NodeRef::up) and [`down`](NodeRef::down) along a
/// tower. Sentinels have no key and no value.
pub struct NodeRef<'a, K, V> {
  arena: &'a Arena<K, V>,
  handle: Handle,
}

impl<K, V> Clone for NodeRef<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K, V> PartialEq for NodeRef<'_, K, V> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    core::ptr::eq(self.arena, other.arena) && self.handle == other.handle
  }
}

impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for NodeRef<'_, K, V> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let node = self.node();
    f.debug_struct("NodeRef")
      .field("key", &node.key)
      .field("value", &node.value)
      .field("level", &node.level)
      .finish()
  }
}

impl<'a, K, V> NodeRef<'a, K, V> {
  #[inline]
  pub(crate) const fn new(arena: &'a Arena<K, V>, handle: Handle) -> Self {
    Self { arena, handle }
  }

  #[inline]
  fn node(&self) -> &'a Node<K, V> {
    let arena = self.arena;
    &arena[self.handle]
  }

  #[inline]
  fn to(&self, handle: Option<Handle>) -> Option<Self> {
    handle.map(|handle| Self::new(self.arena, handle))
  }

  /// Returns the key, or `None` for a sentinel.
  #[inline]
  pub fn key(&self) -> Option<&'a K> {
    self.node().key.as_ref()
  }

  /// Returns the value, or `None` for a sentinel.
  #[inline]
  pub fn value(&self) -> Option<&'a V> {
    self.node().value.as_ref()
  }

  /// Returns the level this node lives on.
  #[inline]
  pub fn level(&self) -> usize {
    self.node().level
  }

  /// Returns `true` if this node anchors a level rather than holding a key.
  #[inline]
  pub fn is_sentinel(&self) -> bool {
    self.node().is_sentinel()
  }

  /// Returns the next node on the same level.
  #[inline]
  pub fn forward(&self) -> Option<Self> {
    self.to(self.node().forward)
  }

  /// Returns the previous node on the same level. `None` only for sentinels.
  #[inline]
  pub fn backward(&self) -> Option<Self> {
    self.to(self.node().backward)
  }

  /// Returns the node one level up in the same tower.
  #[inline]
  pub fn up(&self) -> Option<Self> {
    self.to(self.node().up)
  }

  /// Returns the node one level down in the same tower.
  #[inline]
  pub fn down(&self) -> Option<Self> {
    self.to(self.node().down)
  }

  /// Returns the level 0 node of this tower.
  pub fn bottom(&self) -> Self {
    let mut cur = *self;
    while let Some(down) = cur.down() {
      cur = down;
    }
    cur
  }

  /// Returns the highest node of this tower.
  pub fn top(&self) -> Self {
    let mut cur = *self;
    while let Some(up) = cur.up() {
      cur = up;
    }
    cur
  }
}
