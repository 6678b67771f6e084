use crate::{Error, MAX_LEVEL, MAX_LEVEL_LIMIT, PROBABILITY};

/// Options for [`SkipMap`](crate::SkipMap).
#[viewit::viewit(vis_all = "pub(super)", getters(skip), setters(skip))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
  max_level: usize,
  probability: f64,
  capacity: usize,
  seed: Option<u64>,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      max_level: MAX_LEVEL,
      probability: PROBABILITY,
      capacity: 0,
      seed: None,
    }
  }

  /// Set the number of levels in the sentinel column.
  ///
  /// Towers are at most `max_level` nodes tall, so the highest level a key can
  /// reach is `max_level - 1`. The sentinel column is allocated once and is
  /// never shrunk, only the active height moves.
  ///
  /// The default value is [`MAX_LEVEL`](crate::MAX_LEVEL).
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::Options;
  ///
  /// let opts = Options::new().with_max_level(8);
  /// assert_eq!(opts.max_level(), 8);
  /// ```
  #[inline]
  pub const fn with_max_level(mut self, max_level: usize) -> Self {
    self.max_level = max_level;
    self
  }

  /// Set the probability that a new tower is promoted one more level.
  ///
  /// Heights follow a geometric distribution: a coin with this success
  /// probability is flipped until it fails or the tower reaches the top of the
  /// sentinel column.
  ///
  /// The default value is [`PROBABILITY`](crate::PROBABILITY).
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::Options;
  ///
  /// let opts = Options::new().with_probability(0.25);
  /// assert_eq!(opts.probability(), 0.25);
  /// ```
  #[inline]
  pub const fn with_probability(mut self, probability: f64) -> Self {
    self.probability = probability;
    self
  }

  /// Set how many node slots the arena reserves up front.
  ///
  /// The arena grows on demand; this only avoids reallocation when the
  /// expected size is known. The sentinel column is always reserved on top of
  /// this.
  ///
  /// The default value is `0`.
  #[inline]
  pub const fn with_capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Set the seed of the random generator that draws tower heights.
  ///
  /// Two maps built with the same seed and fed the same operations end up with
  /// identical structure. `None` seeds from the operating system.
  ///
  /// The default value is `None`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::Options;
  ///
  /// let opts = Options::new().with_seed(Some(42));
  /// assert_eq!(opts.seed(), Some(42));
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
    self.seed = seed;
    self
  }

  /// Returns the number of levels in the sentinel column.
  #[inline]
  pub const fn max_level(&self) -> usize {
    self.max_level
  }

  /// Returns the promotion probability.
  #[inline]
  pub const fn probability(&self) -> f64 {
    self.probability
  }

  /// Returns the number of node slots reserved up front.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the height generator seed, if any.
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }

  /// Checks that the options describe a usable map.
  pub(crate) fn validate(&self) -> Result<(), Error> {
    if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
      return Err(Error::InvalidMaxLevel(self.max_level));
    }

    // NaN fails both comparisons.
    if !(self.probability > 0.0 && self.probability < 1.0) {
      return Err(Error::InvalidProbability(self.probability));
    }

    Ok(())
  }
}
