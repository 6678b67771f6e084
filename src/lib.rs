//! An ordered map backed by a four-way linked skiplist.
//!
//! Every key owns a *tower*: one node per level from level 0 up to a randomly
//! drawn height. Nodes are linked `forward`/`backward` within a level and
//! `up`/`down` within a tower, and every level is anchored by a keyless
//! sentinel. All nodes live in an arena and are addressed by handles, so the
//! map never holds a raw pointer.
//!
//! Besides the usual map operations, [`SkipMap::search`] returns the exact
//! [`Path`] it walked, and [`SkipMap::snapshot`] captures the whole level
//! structure, which is what a visualizer needs to draw the list and replay a
//! lookup.
//!
//! ```rust
//! use skiptower::SkipMap;
//!
//! let mut map = SkipMap::new();
//! map.insert(50, "fifty");
//! map.insert(10, "ten");
//! map.insert(30, "thirty");
//!
//! let (found, path) = map.search(&30);
//! assert_eq!(found.and_then(|n| n.value()), Some(&"thirty"));
//! assert!(path.first().unwrap().is_sentinel());
//!
//! let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, [10, 30, 50]);
//! ```
#![cfg_attr(not(all(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

#[cfg(feature = "std")]
extern crate std;

use core::cmp;

mod arena;
mod node;

mod builder;
pub use builder::Builder;

mod error;
pub use error::Error;

mod options;
pub use options::Options;

/// The skiplist map and the views it hands out.
pub mod map;
pub use map::{Iter, NodeRef, Path, PathLink, SkipMap};

/// Structural snapshots for visualization.
pub mod snapshot;
pub use snapshot::{Snapshot, SnapshotLink, SnapshotNode};

/// The default number of levels in the sentinel column.
pub const MAX_LEVEL: usize = 16;

/// The largest sentinel column [`Options::with_max_level`] accepts.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// The default probability of promoting a tower to the next level.
pub const PROBABILITY: f64 = 0.5;

/// Comparator defines the order of keys in a [`SkipMap`].
///
/// Implementations must be a strict total order, the map does not check it.
pub trait Comparator<K: ?Sized> {
  /// Compares two keys.
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering;
}

/// Ascend orders keys by their natural [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ascend;

impl<K: Ord + ?Sized> Comparator<K> for Ascend {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    a.cmp(b)
  }
}

/// Descend orders keys in the reverse of their natural [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Descend;

impl<K: Ord + ?Sized> Comparator<K> for Descend {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    b.cmp(a)
  }
}
