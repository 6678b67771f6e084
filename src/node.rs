use crate::arena::Handle;

/// One slice of a tower: the node a key owns on a single level.
///
/// Sentinels have no key and no value. Real nodes always carry both, and every
/// node of a tower holds its own copy of the key and the value.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
  pub(crate) key: Option<K>,
  pub(crate) value: Option<V>,
  pub(crate) level: usize,

  pub(crate) up: Option<Handle>,
  pub(crate) down: Option<Handle>,
  pub(crate) forward: Option<Handle>,
  pub(crate) backward: Option<Handle>,
}

impl<K, V> Node<K, V> {
  #[inline]
  pub(crate) const fn new(key: K, value: V, level: usize) -> Self {
    Self {
      key: Some(key),
      value: Some(value),
      level,
      up: None,
      down: None,
      forward: None,
      backward: None,
    }
  }

  #[inline]
  pub(crate) const fn sentinel(level: usize) -> Self {
    Self {
      key: None,
      value: None,
      level,
      up: None,
      down: None,
      forward: None,
      backward: None,
    }
  }

  #[inline]
  pub(crate) const fn is_sentinel(&self) -> bool {
    self.key.is_none()
  }
}
