use core::cmp::Ordering;
use std::{boxed::Box, vec::Vec};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{
  arena::{Arena, Handle},
  node::Node,
  Ascend, Comparator, Error, Options, Snapshot,
};

mod entry;
pub use entry::NodeRef;
mod iterator;
pub use iterator::Iter;
mod path;
pub use path::{Path, PathLink};

#[cfg(test)]
mod tests;

/// Collects the nodes a lookup visits.
pub(crate) trait Recorder {
  fn record(&mut self, handle: Handle);
}

impl Recorder for () {
  #[inline]
  fn record(&mut self, _: Handle) {}
}

impl Recorder for Vec<Handle> {
  #[inline]
  fn record(&mut self, handle: Handle) {
    self.push(handle);
  }
}

/// Where a lookup ended.
enum Lookup {
  /// The ground level node of the key's tower.
  Found(Handle),
  /// The last node visited, always on level 0.
  Absent(Handle),
}

/// An ordered map based on a four-way linked skiplist.
///
/// Every level is a doubly linked list anchored by a sentinel, and the nodes of
/// one key are chained vertically into a tower. Level 0 holds every key, each
/// higher level a random subset, so lookups skip ahead on the upper levels and
/// step down until they reach the key or fall off level 0.
///
/// The map is not synchronized. Mutations relink several nodes across several
/// levels, so callers sharing a map between threads must serialize every call,
/// reads included, behind one lock.
#[derive(Debug)]
pub struct SkipMap<K, V, C = Ascend> {
  arena: Arena<K, V>,
  /// Sentinel column indexed by level. Always `max_level` tall.
  heads: Box<[Handle]>,
  /// Highest level holding at least one real node, 0 when empty.
  height: usize,
  len: usize,
  rng: SmallRng,
  opts: Options,
  cmp: C,
}

impl<K, V> Default for SkipMap<K, V> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> SkipMap<K, V> {
  /// Creates an empty map with the default [`Options`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::{SkipMap, MAX_LEVEL};
  ///
  /// let map = SkipMap::<u32, &str>::new();
  /// assert!(map.is_empty());
  /// assert_eq!(map.height(), 0);
  /// assert_eq!(map.max_level(), MAX_LEVEL);
  /// ```
  #[inline]
  pub fn new() -> Self {
    Self::construct(Options::new(), Ascend)
  }

  /// Creates an empty map with the given [`Options`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::{Options, SkipMap};
  ///
  /// let map = SkipMap::<u32, u32>::with_options(Options::new().with_max_level(4)).unwrap();
  /// assert_eq!(map.max_level(), 4);
  ///
  /// assert!(SkipMap::<u32, u32>::with_options(Options::new().with_max_level(0)).is_err());
  /// ```
  pub fn with_options(opts: Options) -> Result<Self, Error> {
    opts.validate()?;
    Ok(Self::construct(opts, Ascend))
  }
}

// --------------------------------Public Methods--------------------------------
impl<K, V, C> SkipMap<K, V, C> {
  /// Returns the highest level that currently holds a key.
  ///
  /// Grows when a new tower is taller than every existing one and shrinks
  /// when removals empty the top levels. An empty map has height 0.
  #[inline]
  pub fn height(&self) -> usize {
    self.height
  }

  /// Returns the number of levels in the sentinel column.
  #[inline]
  pub fn max_level(&self) -> usize {
    self.heads.len()
  }

  /// Returns the number of entries in the map.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the map holds no entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns the options the map was built with.
  #[inline]
  pub fn options(&self) -> &Options {
    &self.opts
  }

  /// Returns the comparator ordering the keys.
  #[inline]
  pub fn comparator(&self) -> &C {
    &self.cmp
  }

  /// Returns the sentinel anchoring `level`, or `None` if the column is not
  /// that tall.
  ///
  /// Sentinels above [`height`](SkipMap::height) exist but have no forward
  /// neighbor.
  #[inline]
  pub fn head(&self, level: usize) -> Option<NodeRef<'_, K, V>> {
    self
      .heads
      .get(level)
      .map(|&handle| NodeRef::new(&self.arena, handle))
  }

  /// Returns the sentinel where lookups start, the one at
  /// [`height`](SkipMap::height).
  #[inline]
  pub fn top_head(&self) -> NodeRef<'_, K, V> {
    NodeRef::new(&self.arena, self.heads[self.height])
  }

  /// Returns the first entry in comparator order.
  pub fn front(&self) -> Option<(&K, &V)> {
    let first = self.arena[self.heads[0]].forward?;
    self.entry(first)
  }

  /// Returns the last entry in comparator order.
  ///
  /// Runs along the express lanes, so it costs a lookup rather than a full
  /// scan of level 0.
  pub fn back(&self) -> Option<(&K, &V)> {
    let mut cur = self.heads[self.height];
    loop {
      while let Some(next) = self.arena[cur].forward {
        cur = next;
      }

      match self.arena[cur].down {
        Some(down) => cur = down,
        None => break,
      }
    }

    self.entry(cur)
  }

  /// Returns an iterator over the entries in comparator order.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::SkipMap;
  ///
  /// let map: SkipMap<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
  /// let entries: Vec<_> = map.iter().collect();
  /// assert_eq!(entries, [(&1, &'a'), (&2, &'b'), (&3, &'c')]);
  /// ```
  #[inline]
  pub fn iter(&self) -> Iter<'_, K, V> {
    Iter::new(&self.arena, self.arena[self.heads[0]].forward, self.len)
  }

  /// Removes every entry. The options and the random generator are kept.
  pub fn clear(&mut self) {
    self.arena.clear();
    self.heads = build_column(&mut self.arena, self.heads.len());
    self.height = 0;
    self.len = 0;
  }

  /// Captures the level structure for visualization.
  #[inline]
  pub fn snapshot(&self) -> Snapshot<K>
  where
    K: Clone,
  {
    Snapshot::capture(self)
  }
}

impl<K, V, C> SkipMap<K, V, C>
where
  C: Comparator<K>,
{
  /// Looks up `key` and records every node the lookup visits.
  ///
  /// Returns the ground level node of the key's tower, if present, and the
  /// [`Path`] walked to get there. The path always starts at
  /// [`top_head`](SkipMap::top_head). When the key is absent, the path ends on
  /// level 0 at the node the key would follow.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// for k in [10, 20, 30] {
  ///   map.insert(k, k * 2);
  /// }
  ///
  /// let (found, path) = map.search(&99);
  /// assert!(found.is_none());
  /// assert_eq!(path.last().and_then(|n| n.key()), Some(&30));
  /// ```
  pub fn search(&self, key: &K) -> (Option<NodeRef<'_, K, V>>, Path<'_, K, V>) {
    let mut visits = Vec::new();
    let found = match self.find(key, &mut visits) {
      Lookup::Found(handle) => Some(NodeRef::new(&self.arena, handle)),
      Lookup::Absent(_) => None,
    };

    (found, Path::new(&self.arena, visits))
  }

  /// Returns the value stored for `key`.
  #[inline]
  pub fn get(&self, key: &K) -> Option<&V> {
    match self.find(key, &mut ()) {
      Lookup::Found(handle) => self.arena[handle].value.as_ref(),
      Lookup::Absent(_) => None,
    }
  }

  /// Returns `true` if the map holds `key`.
  #[inline]
  pub fn contains_key(&self, key: &K) -> bool {
    matches!(self.find(key, &mut ()), Lookup::Found(_))
  }

  /// Inserts a key-value pair.
  ///
  /// If the key is new, a tower of random height is linked in and `None` is
  /// returned. If the key is already present, the value is rewritten on every
  /// node of its tower, the tower keeps its height, and the previous value is
  /// returned.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// assert_eq!(map.insert(10, "A"), None);
  /// assert_eq!(map.insert(10, "B"), Some("A"));
  /// assert_eq!(map.get(&10), Some(&"B"));
  /// assert_eq!(map.len(), 1);
  /// ```
  pub fn insert(&mut self, key: K, value: V) -> Option<V>
  where
    K: Clone,
    V: Clone,
  {
    self.insert_with(key, value, Self::random_level)
  }

  /// Removes `key` and its whole tower, returning the value.
  ///
  /// Removing an absent key is a no-op. Once the removal leaves the top
  /// levels without keys, the active height drops to the highest level that
  /// still holds one.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::SkipMap;
  ///
  /// let mut map: SkipMap<_, _> = (1..=7).map(|k| (k, k)).collect();
  /// assert_eq!(map.remove(&4), Some(4));
  /// assert_eq!(map.remove(&4), None);
  /// assert!(!map.contains_key(&4));
  /// ```
  pub fn remove(&mut self, key: &K) -> Option<V> {
    let bottom = match self.find(key, &mut ()) {
      Lookup::Found(handle) => handle,
      Lookup::Absent(_) => return None,
    };

    let mut removed = None;
    let mut cur = Some(bottom);
    while let Some(handle) = cur {
      let node = self.arena.dealloc(handle);

      if let Some(back) = node.backward {
        self.arena[back].forward = node.forward;
      }
      if let Some(next) = node.forward {
        self.arena[next].backward = node.backward;
      }

      if handle == bottom {
        removed = node.value;
      }
      cur = node.up;
    }

    self.len -= 1;

    #[cfg(feature = "tracing")]
    tracing::trace!(len = self.len, "removed tower");

    self.shrink();
    removed
  }

  /// Inserts with the tower height chosen by `level`, which is only consulted
  /// when the key is new. The height is clamped to the sentinel column.
  pub(crate) fn insert_with(
    &mut self,
    key: K,
    value: V,
    level: impl FnOnce(&mut Self) -> usize,
  ) -> Option<V>
  where
    K: Clone,
    V: Clone,
  {
    match self.find(&key, &mut ()) {
      Lookup::Found(bottom) => self.overwrite(bottom, value),
      Lookup::Absent(last) => {
        let height = level(&mut *self).min(self.heads.len() - 1);
        self.link_tower(last, key, value, height);
        None
      }
    }
  }

  /// Top-down scan: run forward while the next key is smaller, step down
  /// otherwise. A match on any level drops straight down its tower.
  fn find<R: Recorder>(&self, key: &K, rec: &mut R) -> Lookup {
    let mut cur = self.heads[self.height];
    rec.record(cur);

    loop {
      while let Some(next) = self.arena[cur].forward {
        match self.compare_at(next, key) {
          Some(Ordering::Less) => {
            cur = next;
            rec.record(cur);
          }
          Some(Ordering::Equal) => {
            rec.record(next);
            let mut target = next;
            while let Some(down) = self.arena[target].down {
              target = down;
              rec.record(target);
            }
            return Lookup::Found(target);
          }
          _ => break,
        }
      }

      match self.arena[cur].down {
        Some(down) => {
          cur = down;
          rec.record(cur);
        }
        None => return Lookup::Absent(cur),
      }
    }
  }

  /// Builds a tower of `height + 1` nodes bottom-up, starting after `pred` on
  /// level 0.
  fn link_tower(&mut self, mut pred: Handle, key: K, value: V, height: usize)
  where
    K: Clone,
    V: Clone,
  {
    debug_assert_eq!(self.arena[pred].level, 0);

    if height > self.height {
      self.height = height;

      #[cfg(feature = "tracing")]
      tracing::debug!(height, "active height grew");
    }

    let mut below: Option<Handle> = None;
    for level in 0..=height {
      // Every level has its own neighbors, so rescan from the predecessor.
      while let Some(next) = self.arena[pred].forward {
        if self.compare_at(next, &key) == Some(Ordering::Less) {
          pred = next;
        } else {
          break;
        }
      }

      let succ = self.arena[pred].forward;
      let mut node = Node::new(key.clone(), value.clone(), level);
      node.down = below;
      node.forward = succ;
      node.backward = Some(pred);
      let handle = self.arena.alloc(node);

      if let Some(below) = below {
        self.arena[below].up = Some(handle);
      }
      if let Some(succ) = succ {
        self.arena[succ].backward = Some(handle);
      }
      self.arena[pred].forward = Some(handle);
      below = Some(handle);

      if level == height {
        break;
      }

      // The nearest node behind us with a node above it is the predecessor on
      // the next level. Nodes in between have no tower above them; the
      // sentinel below the top of the column always has one.
      while self.arena[pred].up.is_none() {
        match self.arena[pred].backward {
          Some(back) => pred = back,
          None => break,
        }
      }
      match self.arena[pred].up {
        Some(up) => pred = up,
        None => break,
      }
    }

    self.len += 1;

    #[cfg(feature = "tracing")]
    tracing::trace!(height, len = self.len, "linked tower");
  }
}

// --------------------------------Private Methods--------------------------------
impl<K, V, C> SkipMap<K, V, C> {
  pub(crate) fn construct(opts: Options, cmp: C) -> Self {
    let mut arena = Arena::with_capacity(opts.capacity + opts.max_level);
    let heads = build_column(&mut arena, opts.max_level);
    let rng = match opts.seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_os_rng(),
    };

    Self {
      arena,
      heads,
      height: 0,
      len: 0,
      rng,
      opts,
      cmp,
    }
  }

  /// Flips the promotion coin until it fails or the tower would outgrow the
  /// sentinel column.
  fn random_level(&mut self) -> usize {
    let top = self.heads.len() - 1;
    let mut level = 0;
    while self.rng.random_bool(self.opts.probability) && level < top {
      level += 1;
    }
    level
  }

  /// Rewrites the value on every node of the tower standing on `bottom`.
  fn overwrite(&mut self, bottom: Handle, value: V) -> Option<V>
  where
    V: Clone,
  {
    let mut cur = self.arena[bottom].up;
    while let Some(handle) = cur {
      let node = &mut self.arena[handle];
      node.value = Some(value.clone());
      cur = node.up;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("overwrote tower value");

    self.arena[bottom].value.replace(value)
  }

  /// Lowers the active height past every top level left without keys.
  fn shrink(&mut self) {
    while self.height > 0 && self.arena[self.heads[self.height]].forward.is_none() {
      self.height -= 1;

      #[cfg(feature = "tracing")]
      tracing::debug!(height = self.height, "active height shrank");
    }
  }

  #[inline]
  fn compare_at(&self, handle: Handle, key: &K) -> Option<Ordering>
  where
    C: Comparator<K>,
  {
    self.arena[handle]
      .key
      .as_ref()
      .map(|k| self.cmp.compare(k, key))
  }

  #[inline]
  fn entry(&self, handle: Handle) -> Option<(&K, &V)> {
    let node = &self.arena[handle];
    node.key.as_ref().zip(node.value.as_ref())
  }
}

/// Allocates a sentinel column of `max_level` nodes chained vertically and
/// returns the handles indexed by level.
fn build_column<K, V>(arena: &mut Arena<K, V>, max_level: usize) -> Box<[Handle]> {
  let mut heads = Vec::with_capacity(max_level);
  let mut below: Option<Handle> = None;
  for level in 0..max_level {
    let mut sentinel = Node::sentinel(level);
    sentinel.down = below;
    let handle = arena.alloc(sentinel);
    if let Some(below) = below {
      arena[below].up = Some(handle);
    }
    heads.push(handle);
    below = Some(handle);
  }
  heads.into_boxed_slice()
}

impl<'a, K, V, C> IntoIterator for &'a SkipMap<K, V, C> {
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<K, V, C> Extend<(K, V)> for SkipMap<K, V, C>
where
  K: Clone,
  V: Clone,
  C: Comparator<K>,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.insert(key, value);
    }
  }
}

impl<K, V> FromIterator<(K, V)> for SkipMap<K, V>
where
  K: Ord + Clone,
  V: Clone,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut map = Self::new();
    map.extend(iter);
    map
  }
}
