use crate::MAX_LEVEL_LIMIT;

/// Error type for the skiptower crate.
///
/// Only building a map can fail; once a [`SkipMap`](crate::SkipMap) exists,
/// a missing key is reported as `None` and a duplicate key overwrites.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
  /// Indicates that the requested sentinel column is empty or taller than
  /// [`MAX_LEVEL_LIMIT`].
  #[error("max level must be between 1 and {limit}, got {0}", limit = MAX_LEVEL_LIMIT)]
  InvalidMaxLevel(usize),

  /// Indicates that the promotion probability is not strictly between 0 and 1.
  #[error("promotion probability must be in the open interval (0, 1), got {0}")]
  InvalidProbability(f64),
}
