//! A score leaderboard driven by random updates, keyed by score in a
//! [`SkipMap`]. Every map call happens under one lock.

use parking_lot::Mutex;
use rand::Rng;
use skiptower::{SkipMap, Snapshot};

/// Players created by [`Leaderboard::seeded`] and by joins score in this range.
pub const SCORE_RANGE: core::ops::Range<u32> = 100..1000;

/// Only used for testing
pub fn player(name: &str, score: u32) -> Player {
  Player {
    name: name.to_string(),
    score,
  }
}

/// A named score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
  /// Display name.
  pub name: String,
  /// Current score, also the player's key on the board.
  pub score: u32,
}

impl Player {
  fn random<R: Rng>(rng: &mut R) -> Self {
    Self {
      name: format!("Player-{:05x}", rng.random_range(0..0x10_0000u32)),
      score: rng.random_range(SCORE_RANGE),
    }
  }
}

/// One step of a recorded search, keys copied out of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLink {
  /// Score the step leaves, `None` for a sentinel.
  pub source: Option<u32>,
  /// Score the step reaches, `None` for a sentinel.
  pub target: Option<u32>,
  /// Level the step leaves from.
  pub level: usize,
}

/// The most recent search, kept for display after the board moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrace {
  /// The score that was searched for.
  pub key: u32,
  /// The steps the search took.
  pub links: Vec<TraceLink>,
}

/// What a visualizer draws: the level structure and the last search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visualization {
  /// The board's levels and edges.
  pub structure: Snapshot<u32>,
  /// The last search, if one is selected.
  pub path: Option<SearchTrace>,
}

/// What [`Leaderboard::simulate_step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// A new player joined.
  Joined(Player),
  /// A player left.
  Left(Player),
  /// A player's score changed.
  Rescored {
    /// The player with the new score.
    player: Player,
    /// The score before the change.
    from: u32,
  },
}

struct State {
  board: SkipMap<u32, Player>,
  players: Vec<Player>,
  last_search: Option<SearchTrace>,
}

/// Players ranked by score.
///
/// The board is keyed by score, so two players with the same score share a
/// slot and the later write wins. Removing a player removes whatever entry
/// holds its score.
pub struct Leaderboard {
  state: Mutex<State>,
}

impl Default for Leaderboard {
  fn default() -> Self {
    Self::new()
  }
}

impl Leaderboard {
  /// Creates an empty board.
  pub fn new() -> Self {
    Self::with_board(SkipMap::new())
  }

  /// Creates a board with `n` random players.
  pub fn seeded<R: Rng>(n: usize, rng: &mut R) -> Self {
    let board = Self::new();
    for _ in 0..n {
      board.join(Player::random(rng));
    }
    board
  }

  /// Creates an empty board on top of a preconfigured map.
  pub fn with_board(board: SkipMap<u32, Player>) -> Self {
    Self {
      state: Mutex::new(State {
        board,
        players: Vec::new(),
        last_search: None,
      }),
    }
  }

  /// Adds a player to the roster and the board.
  pub fn join(&self, player: Player) {
    let mut state = self.state.lock();
    state.board.insert(player.score, player.clone());
    state.players.push(player);
  }

  /// Returns the number of entries on the board.
  pub fn len(&self) -> usize {
    self.state.lock().board.len()
  }

  /// Returns `true` if the board is empty.
  pub fn is_empty(&self) -> bool {
    self.state.lock().board.is_empty()
  }

  /// Returns the number of players on the roster.
  pub fn roster_len(&self) -> usize {
    self.state.lock().players.len()
  }

  /// Returns the board's active height.
  pub fn height(&self) -> usize {
    self.state.lock().board.height()
  }

  /// Applies one random update: 10% a player joins, 10% a player leaves,
  /// otherwise a player's score moves by up to 50 either way, floored at 0.
  ///
  /// Returns `None` and does nothing when the roster is empty.
  pub fn simulate_step<R: Rng>(&self, rng: &mut R) -> Option<Action> {
    let mut state = self.state.lock();
    if state.players.is_empty() {
      return None;
    }

    let roll = rng.random_range(0..100);
    let action = if roll < 10 {
      let player = Player::random(rng);
      state.board.insert(player.score, player.clone());
      state.players.push(player.clone());
      Action::Joined(player)
    } else if roll < 20 {
      let idx = rng.random_range(0..state.players.len());
      let player = state.players.remove(idx);
      state.board.remove(&player.score);
      Action::Left(player)
    } else {
      let idx = rng.random_range(0..state.players.len());
      let from = state.players[idx].score;
      state.board.remove(&from);

      let delta = rng.random_range(-50..=50i64);
      let score = (i64::from(from) + delta).max(0) as u32;
      state.players[idx].score = score;

      let player = state.players[idx].clone();
      state.board.insert(score, player.clone());
      Action::Rescored { player, from }
    };

    tracing::debug!(?action, height = state.board.height(), "simulated update");
    Some(action)
  }

  /// Returns up to `n` players from the board, highest score first.
  pub fn top_players(&self, n: usize) -> Vec<Player> {
    let mut players: Vec<_> = {
      let state = self.state.lock();
      state.board.iter().map(|(_, p)| p.clone()).collect()
    };
    players.sort_by(|a, b| b.score.cmp(&a.score));
    players.truncate(n);
    players
  }

  /// Searches for `key` and keeps the trace for [`visualization`]. `None`
  /// clears the kept trace.
  ///
  /// [`visualization`]: Leaderboard::visualization
  pub fn perform_search(&self, key: Option<u32>) {
    let mut state = self.state.lock();
    let trace = key.map(|key| {
      let (_, path) = state.board.search(&key);
      SearchTrace {
        key,
        links: path
          .links()
          .map(|link| TraceLink {
            source: link.source.copied(),
            target: link.target.copied(),
            level: link.level,
          })
          .collect(),
      }
    });
    state.last_search = trace;
  }

  /// Returns the kept search trace.
  pub fn last_search(&self) -> Option<SearchTrace> {
    self.state.lock().last_search.clone()
  }

  /// Captures the board structure together with the kept search trace.
  pub fn visualization(&self) -> Visualization {
    let state = self.state.lock();
    Visualization {
      structure: state.board.snapshot(),
      path: state.last_search.clone(),
    }
  }
}
