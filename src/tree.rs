//! Arena-backed search tree.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. A parent owns
//! its children through its `children` list; the `parent` link is a plain
//! index used only to walk upwards during backpropagation. Re-rooting copies
//! the kept subtree into a fresh arena so everything else is released.

use crate::board::Color;
use crate::game::Game;
use crate::moves::Move;

/// Stable handle of a node inside one [`Tree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A position in the search tree with its aggregated statistics.
#[derive(Debug, Clone)]
pub struct Node {
    game: Game,
    /// Move that led here from the parent; `None` for the root.
    mv: Option<Move>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Number of simulation batches that passed through this node
    plays: u64,
    /// Sum of winning playouts over those batches
    wins: u64,
    all_moves_expanded: bool,
}

impl Node {
    fn new(game: Game, mv: Option<Move>) -> Self {
        Self {
            game,
            mv,
            parent: None,
            children: Vec::new(),
            plays: 0,
            wins: 0,
            all_moves_expanded: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn all_moves_expanded(&self) -> bool {
        self.all_moves_expanded
    }

    /// The side to move in this node's position.
    pub fn color_to_move(&self) -> Option<Color> {
        self.game.current_color()
    }
}

pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// A tree holding only a root for `game`.
    pub fn new(game: Game) -> Self {
        Self {
            nodes: vec![Node::new(game, None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_visited_move(&self, id: NodeId, mv: Move) -> bool {
        self.node(id)
            .children
            .iter()
            .any(|&child| self.node(child).mv == Some(mv))
    }

    /// Attach a new child reached from `parent` by `mv`.
    pub fn add_child(&mut self, parent: NodeId, game: Game, mv: Move) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut child = Node::new(game, Some(mv));
        child.parent = Some(parent);
        self.nodes.push(child);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_all_moves_expanded(&mut self, id: NodeId) {
        self.nodes[id.0].all_moves_expanded = true;
    }

    /// Whether any simulation below `id` could still add information.
    ///
    /// Terminal positions never do. Otherwise a node that still has
    /// unexpanded moves (or no children yet) does, and a fully expanded
    /// node does iff one of its children does.
    pub fn has_unsimulated_plays(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.game.is_terminal() {
            return false;
        }
        if !node.all_moves_expanded || node.children.is_empty() {
            return true;
        }
        node.children
            .iter()
            .any(|&child| self.has_unsimulated_plays(child))
    }

    /// Add one play and `delta` wins to `id` and every ancestor up to the root.
    pub fn backpropagate(&mut self, id: NodeId, delta: u64) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.plays += 1;
            node.wins += delta;
            current = node.parent;
        }
    }

    /// Depth-first search for a node whose position equals `game`.
    ///
    /// Piece counts never decrease along a game, so a branch whose position
    /// already has more pieces than `game` is not searched.
    pub fn find_matching(&self, game: &Game) -> Option<NodeId> {
        self.find_matching_from(self.root, game)
    }

    fn find_matching_from(&self, id: NodeId, game: &Game) -> Option<NodeId> {
        let node = self.node(id);
        if node.game == *game {
            return Some(id);
        }
        if node.game.board().total_pieces() > game.board().total_pieces() {
            return None;
        }
        node.children
            .iter()
            .find_map(|&child| self.find_matching_from(child, game))
    }

    /// Make `id` the root and drop every node outside its subtree.
    ///
    /// Statistics inside the kept subtree are preserved. The new root has
    /// no parent and no move.
    pub fn reroot(&mut self, id: NodeId) {
        // Breadth-first order of the kept subtree, new root first
        let mut order = vec![id];
        let mut next = 0;
        while next < order.len() {
            let parent = order[next];
            order.extend_from_slice(&self.nodes[parent.0].children);
            next += 1;
        }

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = new;
        }

        let mut nodes: Vec<Node> = order
            .iter()
            .map(|&old| {
                let mut node = self.nodes[old.0].clone();
                node.parent = node.parent.map(|p| NodeId(remap[p.0]));
                for child in &mut node.children {
                    *child = NodeId(remap[child.0]);
                }
                node
            })
            .collect();

        nodes[0].parent = None;
        nodes[0].mv = None;
        self.nodes = nodes;
        self.root = NodeId(0);
    }
}
