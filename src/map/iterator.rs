use core::iter::FusedIterator;

use crate::arena::{Arena, Handle};

/// An iterator over the entries of a [`SkipMap`](super::SkipMap) in
/// comparator order.
///
/// Walks level 0 forward from the sentinel, so every entry is yielded exactly
/// once regardless of tower heights.
pub struct Iter<'a, K, V> {
  arena: &'a Arena<K, V>,
  next: Option<Handle>,
  remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      arena: self.arena,
      next: self.next,
      remaining: self.remaining,
    }
  }
}

impl<'a, K, V> Iter<'a, K, V> {
  #[inline]
  pub(super) const fn new(arena: &'a Arena<K, V>, first: Option<Handle>, len: usize) -> Self {
    Self {
      arena,
      next: first,
      remaining: len,
    }
  }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = (&'a K, &'a V);

  fn next(&mut self) -> Option<Self::Item> {
    let arena = self.arena;
    let node = &arena[self.next?];
    self.next = node.forward;
    self.remaining = self.remaining.saturating_sub(1);
    node.key.as_ref().zip(node.value.as_ref())
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
