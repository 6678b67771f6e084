use integration::{Action, Leaderboard};
use rand::{rngs::SmallRng, SeedableRng};

fn main() {
  let mut args = std::env::args().skip(1);
  let steps: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(50);
  let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);

  let mut rng = SmallRng::seed_from_u64(seed);
  let board = Leaderboard::seeded(100, &mut rng);
  println!(
    "seeded {} players, {} distinct scores, height {}",
    board.roster_len(),
    board.len(),
    board.height()
  );

  for step in 0..steps {
    match board.simulate_step(&mut rng) {
      Some(Action::Joined(p)) => println!("{step:>4}: {} joined with {}", p.name, p.score),
      Some(Action::Left(p)) => println!("{step:>4}: {} left at {}", p.name, p.score),
      Some(Action::Rescored { player, from }) => {
        println!("{step:>4}: {} {} -> {}", player.name, from, player.score)
      }
      None => break,
    }
  }

  board.perform_search(Some(500));
  let vis = board.visualization();
  println!(
    "height {}, {} nodes, {} links",
    vis.structure.height,
    vis.structure.nodes.len(),
    vis.structure.links.len()
  );
  if let Some(trace) = vis.path {
    println!("search for {} took {} steps", trace.key, trace.links.len());
  }

  for (rank, p) in board.top_players(10).iter().enumerate() {
    println!("{:>2}. {:<14} {}", rank + 1, p.name, p.score);
  }
}
