use super::{Ascend, Comparator, Error, Options, SkipMap};

/// The builder to build [`SkipMap`].
#[derive(Debug, Clone, Copy)]
pub struct Builder<C = Ascend> {
  opts: Options,
  cmp: C,
}

impl Default for Builder {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Builder {
  /// Create a new `Builder` with default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      opts: Options::new(),
      cmp: Ascend,
    }
  }
}

impl<C> Builder<C> {
  /// Returns a new map builder with the new [`Comparator`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::{Builder, Descend};
  ///
  /// let mut map = Builder::new().with_comparator(Descend).build().unwrap();
  /// map.insert(1, "one");
  /// map.insert(2, "two");
  /// assert_eq!(map.front(), Some((&2, &"two")));
  /// ```
  #[inline]
  pub fn with_comparator<NC>(self, cmp: NC) -> Builder<NC> {
    Builder {
      cmp,
      opts: self.opts,
    }
  }

  /// Returns a new map builder with the new [`Options`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::{Builder, Options};
  ///
  /// let builder = Builder::new().with_options(Options::new().with_capacity(1024));
  /// assert_eq!(builder.options().capacity(), 1024);
  /// ```
  #[inline]
  pub const fn with_options(mut self, opts: Options) -> Self {
    self.opts = opts;
    self
  }

  /// Sets the number of levels in the sentinel column.
  ///
  /// Default is [`MAX_LEVEL`](crate::MAX_LEVEL). The maximum is
  /// [`MAX_LEVEL_LIMIT`](crate::MAX_LEVEL_LIMIT). The minimum is `1`, which
  /// degrades the map to a sorted linked list.
  ///
  /// ## Example
  ///
  /// ```
  /// use skiptower::Builder;
  ///
  /// let builder = Builder::new().with_max_level(8);
  /// ```
  #[inline]
  pub const fn with_max_level(mut self, max_level: usize) -> Self {
    self.opts.max_level = max_level;
    self
  }

  /// Sets the probability of promoting a tower one more level.
  ///
  /// Default is [`PROBABILITY`](crate::PROBABILITY).
  ///
  /// ## Example
  ///
  /// ```
  /// use skiptower::Builder;
  ///
  /// let builder = Builder::new().with_probability(0.25);
  /// ```
  #[inline]
  pub const fn with_probability(mut self, probability: f64) -> Self {
    self.opts.probability = probability;
    self
  }

  /// Sets how many node slots the arena reserves up front.
  ///
  /// Default is `0`.
  #[inline]
  pub const fn with_capacity(mut self, capacity: usize) -> Self {
    self.opts.capacity = capacity;
    self
  }

  /// Sets the seed of the tower height generator.
  ///
  /// Default is `None`, which seeds from the operating system.
  ///
  /// ## Example
  ///
  /// ```
  /// use skiptower::Builder;
  ///
  /// let builder = Builder::new().with_seed(Some(7));
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
    self.opts.seed = seed;
    self
  }

  /// Returns the options configured so far.
  #[inline]
  pub const fn options(&self) -> &Options {
    &self.opts
  }

  /// Returns the comparator configured so far.
  #[inline]
  pub const fn comparator(&self) -> &C {
    &self.cmp
  }

  /// Validates the options and builds an empty [`SkipMap`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skiptower::{Builder, Error};
  ///
  /// let map = Builder::new().with_max_level(4).build::<u64, u64>().unwrap();
  /// assert_eq!(map.max_level(), 4);
  ///
  /// let err = Builder::new().with_probability(1.0).build::<u64, u64>().unwrap_err();
  /// assert_eq!(err, Error::InvalidProbability(1.0));
  /// ```
  pub fn build<K, V>(self) -> Result<SkipMap<K, V, C>, Error>
  where
    C: Comparator<K>,
  {
    let Self { opts, cmp } = self;
    opts.validate()?;
    Ok(SkipMap::construct(opts, cmp))
  }
}
