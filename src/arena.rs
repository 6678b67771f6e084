use core::ops::{Index, IndexMut};
use std::vec::Vec;

use crate::node::Node;

/// An opaque reference to a slot in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Handle(u32);

impl Handle {
  #[inline]
  const fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug)]
enum Slot<K, V> {
  Occupied(Node<K, V>),
  Vacant { next_free: Option<Handle> },
}

/// A growable table of node slots.
///
/// Freed slots are threaded into a free list and handed out again before the
/// table grows.
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
  slots: Vec<Slot<K, V>>,
  free: Option<Handle>,
}

impl<K, V> Arena<K, V> {
  pub(crate) fn with_capacity(cap: usize) -> Self {
    Self {
      slots: Vec::with_capacity(cap),
      free: None,
    }
  }

  /// Returns the number of occupied slots.
  #[cfg(test)]
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.iter().count()
  }

  pub(crate) fn alloc(&mut self, node: Node<K, V>) -> Handle {
    match self.free {
      Some(handle) => {
        let slot = &mut self.slots[handle.index()];
        if let Slot::Vacant { next_free } = *slot {
          self.free = next_free;
        }
        *slot = Slot::Occupied(node);
        handle
      }
      None => {
        let handle = Handle(self.slots.len() as u32);
        self.slots.push(Slot::Occupied(node));
        handle
      }
    }
  }

  /// Takes the node out of its slot and puts the slot on the free list.
  pub(crate) fn dealloc(&mut self, handle: Handle) -> Node<K, V> {
    let vacant = Slot::Vacant {
      next_free: self.free,
    };

    match core::mem::replace(&mut self.slots[handle.index()], vacant) {
      Slot::Occupied(node) => {
        self.free = Some(handle);
        node
      }
      Slot::Vacant { .. } => panic!("double free of arena slot {}", handle.0),
    }
  }

  #[cfg(test)]
  #[inline]
  pub(crate) fn get(&self, handle: Handle) -> Option<&Node<K, V>> {
    match self.slots.get(handle.index()) {
      Some(Slot::Occupied(node)) => Some(node),
      _ => None,
    }
  }

  /// Iterates over every occupied slot.
  #[cfg(test)]
  pub(crate) fn iter(&self) -> impl Iterator<Item = (Handle, &Node<K, V>)> + '_ {
    self
      .slots
      .iter()
      .enumerate()
      .filter_map(|(idx, slot)| match slot {
        Slot::Occupied(node) => Some((Handle(idx as u32), node)),
        Slot::Vacant { .. } => None,
      })
  }

  pub(crate) fn clear(&mut self) {
    self.slots.clear();
    self.free = None;
  }
}

impl<K, V> Index<Handle> for Arena<K, V> {
  type Output = Node<K, V>;

  #[inline]
  fn index(&self, handle: Handle) -> &Self::Output {
    match &self.slots[handle.index()] {
      Slot::Occupied(node) => node,
      Slot::Vacant { .. } => panic!("arena slot {} is vacant", handle.0),
    }
  }
}

impl<K, V> IndexMut<Handle> for Arena<K, V> {
  #[inline]
  fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
    match &mut self.slots[handle.index()] {
      Slot::Occupied(node) => node,
      Slot::Vacant { .. } => panic!("arena slot {} is vacant", handle.0),
    }
  }
}
