//! Monte Carlo Tree Search over the game tree.
//!
//! Each call to [`SearchEngine::iterate_search`] runs one iteration:
//! - descend from the root with UCB1, expanding one random untried move
//!   at the first node that is not fully expanded
//! - play a batch of random games from that node in parallel, one per
//!   configured playout slot
//! - add one play and the batch's win count to every node on the path
//!
//! The engine keeps its tree between moves. [`SearchEngine::update_starting_state`]
//! re-roots it at the position the real game reached, so earlier work is
//! reused when that position was already explored.

use log::{debug, info};

use crate::board::Color;
use crate::constants::{EXPLORATION, UNPLAYED_CONFIDENCE};
use crate::game::Game;
use crate::moves::Move;
use crate::playout::playout_batch;
use crate::tree::{Node, NodeId, Tree};

/// Runtime search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Random games per iteration. Defaults to the host's parallelism.
    pub playouts_per_iteration: usize,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Seed for the engine's generator; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            playouts_per_iteration: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            exploration: EXPLORATION,
            seed: None,
        }
    }
}

/// Statistics of one candidate move at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveStats {
    pub mv: Move,
    pub plays: u64,
    pub wins: u64,
    /// Fraction of this move's playouts won by the engine's color
    pub win_rate: f64,
}

/// Snapshot of the search, cheap to hand to another thread.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// The most played root move.
    pub best_move: Move,
    /// Plays recorded at the root over the tree's lifetime.
    pub simulations: u64,
    /// `wins / plays` of the best move, in `0..=N` for `N` playouts per
    /// iteration, or [`UNPLAYED_CONFIDENCE`] if it was never played.
    pub confidence: f64,
    /// Every expanded root move.
    pub moves: Vec<MoveStats>,
}

impl SearchResults {
    /// Fraction of the best move's playouts won, for display.
    pub fn best_win_rate(&self) -> f64 {
        self.moves
            .iter()
            .find(|m| m.mv == self.best_move)
            .map_or(0.0, |m| m.win_rate)
    }
}

/// UCB1 score of a child.
///
/// Unplayed children score infinity so they are always tried first.
pub fn ucb1(win_rate: f64, plays: u64, parent_plays: u64, exploration: f64) -> f64 {
    if plays == 0 {
        return f64::INFINITY;
    }
    win_rate + exploration * ((parent_plays as f64).ln() / plays as f64).sqrt()
}

/// Batch wins per play, in `0..=N`. Zero for an unplayed node.
fn wins_per_play(node: &Node) -> f64 {
    if node.plays() == 0 {
        return 0.0;
    }
    node.wins() as f64 / node.plays() as f64
}

/// MCTS engine playing for one color.
pub struct SearchEngine {
    tree: Tree,
    ai_color: Color,
    config: SearchConfig,
    rng: fastrand::Rng,
}

impl SearchEngine {
    /// Create an engine with the default configuration.
    pub fn new(game: Game, ai_color: Color) -> Self {
        Self::with_config(game, ai_color, SearchConfig::default())
    }

    pub fn with_config(game: Game, ai_color: Color, mut config: SearchConfig) -> Self {
        config.playouts_per_iteration = config.playouts_per_iteration.max(1);
        let rng = config.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Self {
            tree: Tree::new(game),
            ai_color,
            config,
            rng,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> &Node {
        self.tree.node(self.tree.root())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// False once every reachable leaf is terminal and fully expanded.
    pub fn has_unsimulated_plays(&self) -> bool {
        self.tree.has_unsimulated_plays(self.tree.root())
    }

    /// Run one select/expand, simulate, backpropagate iteration.
    ///
    /// Does nothing once the tree is exhausted.
    pub fn iterate_search(&mut self) {
        if !self.has_unsimulated_plays() {
            return;
        }

        let picked = self.tree_policy();
        let game = *self.tree.node(picked).game();

        // Seeds are drawn up front so the outcome does not depend on how the
        // batch is scheduled.
        let seeds: Vec<u64> = (0..self.config.playouts_per_iteration)
            .map(|_| self.rng.u64(..))
            .collect();
        let delta = playout_batch(&game, self.ai_color, &seeds);

        self.tree.backpropagate(picked, delta);
    }

    /// Move the root to `game`, keeping the matching subtree if it was
    /// already played, otherwise starting a fresh tree.
    pub fn update_starting_state(&mut self, game: Game) {
        let old_plays = self.root().plays();

        match self.tree.find_matching(&game) {
            Some(id) if self.tree.node(id).plays() > 0 => {
                let reused = self.tree.node(id).plays();
                info!(
                    "reusing subtree with {reused} of {old_plays} simulations ({}%)",
                    reused * 100 / old_plays.max(1)
                );
                self.tree.reroot(id);
            }
            _ => {
                debug!("no reusable subtree, starting a fresh search");
                self.tree = Tree::new(game);
            }
        }
    }

    /// Best move so far and the root's statistics.
    ///
    /// `None` until the root has at least one expanded child.
    pub fn results(&mut self) -> Option<SearchResults> {
        let best = self.best_move_child(self.tree.root())?;
        let best = self.tree.node(best);

        let confidence = if best.plays() == 0 {
            UNPLAYED_CONFIDENCE
        } else {
            wins_per_play(best)
        };

        let moves = self
            .root()
            .children()
            .iter()
            .map(|&id| self.tree.node(id))
            .filter_map(|child| {
                Some(MoveStats {
                    mv: child.mv()?,
                    plays: child.plays(),
                    wins: child.wins(),
                    win_rate: self.playout_win_rate(child),
                })
            })
            .collect();

        Some(SearchResults {
            best_move: best.mv()?,
            simulations: self.root().plays(),
            confidence,
            moves,
        })
    }

    /// Wins per playout. Every play of a node stands for a full batch of
    /// playouts, so this is `wins / plays` scaled down by the batch size.
    fn playout_win_rate(&self, node: &Node) -> f64 {
        wins_per_play(node) / self.config.playouts_per_iteration as f64
    }

    /// Descend to the node to simulate, expanding one new child on the way.
    fn tree_policy(&mut self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.node(current);
            let Some(color) = node.color_to_move() else {
                return current;
            };

            if node.all_moves_expanded() {
                current = self.best_child(current);
                continue;
            }

            let game = *node.game();
            let legal = game.all_moves(color);
            let unexpanded: Vec<Move> = legal
                .iter()
                .copied()
                .filter(|&mv| !self.tree.has_visited_move(current, mv))
                .collect();
            assert!(
                !unexpanded.is_empty(),
                "expandable node without an untried move"
            );

            let mv = unexpanded[self.rng.usize(..unexpanded.len())];
            let child = self.tree.add_child(current, game.apply_move(mv, color), mv);
            if self.tree.node(current).children().len() == legal.len() {
                self.tree.set_all_moves_expanded(current);
            }
            return child;
        }
    }

    /// Child with the highest UCB1 score. Ties go to the earliest child.
    fn best_child(&self, id: NodeId) -> NodeId {
        let node = self.tree.node(id);
        debug_assert!(node.plays() > 0, "UCB selection on an unplayed node");

        let mut best = node.children()[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in node.children() {
            let child = self.tree.node(child_id);
            let score = ucb1(
                wins_per_play(child),
                child.plays(),
                node.plays(),
                self.config.exploration,
            );
            if score > best_score {
                best = child_id;
                best_score = score;
            }
        }
        best
    }

    /// Most played child, ties broken by wins, then uniformly at random.
    ///
    /// `None` for a node without children.
    pub fn best_move_child(&mut self, id: NodeId) -> Option<NodeId> {
        let children = self.tree.node(id).children();
        let top = children
            .iter()
            .map(|&c| {
                let child = self.tree.node(c);
                (child.plays(), child.wins())
            })
            .max()?;

        let candidates: Vec<NodeId> = children
            .iter()
            .copied()
            .filter(|&c| {
                let child = self.tree.node(c);
                (child.plays(), child.wins()) == top
            })
            .collect();

        Some(candidates[self.rng.usize(..candidates.len())])
    }
}
