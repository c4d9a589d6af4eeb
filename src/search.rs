//! Depth-bounded alpha-beta minimax over simulated positions.
//!
//! White (the engine) maximizes [`evaluate`], Black minimizes it. Every
//! branch works on its own copy of the board and capture tally, and the
//! search keeps no state between calls, so one [`Engine`] may serve many
//! requests at once.

use tracing::debug;

use crate::board::{Board, Color, Move};
use crate::constants::{DEFAULT_DEPTH, DEFAULT_KOMI};
use crate::eval::evaluate;
use crate::rules::{Captures, apply_move, generate_moves};

/// Immutable engine parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Plies searched below the current position, counting the engine's own
    /// move. [`Engine::new`] raises 0 to 1.
    pub depth: u8,
    pub komi: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            komi: DEFAULT_KOMI,
        }
    }
}

/// Outcome of a top-level search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub mv: Move,
    /// Minimax value of `mv`, from White's point of view.
    pub score: f64,
    /// Positions visited, the root's children included.
    pub nodes: u64,
}

/// A simulated position: board, prisoners, and the position one ply back
/// used for the ko check.
#[derive(Clone, Copy)]
struct Node {
    board: Board,
    captures: Captures,
    last: Option<Board>,
}

impl Node {
    /// Position after `color` plays `mv`. The current board becomes the
    /// ko reference for the reply.
    fn child(&self, mv: Move, color: Color) -> Node {
        let mut board = self.board;
        let mut captures = self.captures;
        apply_move(&mut board, &mut captures, mv, color);
        Node {
            board,
            captures,
            last: Some(self.board),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: EngineConfig {
                depth: config.depth.max(1),
                ..config
            },
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Choose White's move.
    ///
    /// Candidates are tried in generation order and the first one reaching
    /// the best value wins ties. Pass is always a candidate, so a move is
    /// always returned.
    pub fn select_best_move(
        &self,
        board: &Board,
        captures: &Captures,
        last: Option<&Board>,
    ) -> SearchResult {
        let root = Node {
            board: *board,
            captures: *captures,
            last: last.copied(),
        };
        let depth = self.config.depth.saturating_sub(1);
        let mut nodes = 0;
        let mut best = SearchResult {
            mv: Move::Pass,
            score: f64::NEG_INFINITY,
            nodes: 0,
        };

        for mv in generate_moves(&root.board, Color::White, root.last.as_ref()) {
            let child = root.child(mv, Color::White);
            let score = self.alpha_beta(&child, depth, best.score, f64::INFINITY, false, &mut nodes);
            if score > best.score {
                best.mv = mv;
                best.score = score;
            }
        }

        best.nodes = nodes;
        debug!(mv = %best.mv, score = best.score, nodes, "search finished");
        best
    }

    /// Minimax value of a position searched `depth` plies deep, with
    /// `maximizing` telling whether White is to move.
    pub fn value(
        &self,
        board: &Board,
        captures: &Captures,
        last: Option<&Board>,
        depth: u8,
        maximizing: bool,
    ) -> f64 {
        let node = Node {
            board: *board,
            captures: *captures,
            last: last.copied(),
        };
        let mut nodes = 0;
        self.alpha_beta(
            &node,
            depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            maximizing,
            &mut nodes,
        )
    }

    fn alpha_beta(
        &self,
        node: &Node,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        nodes: &mut u64,
    ) -> f64 {
        *nodes += 1;

        if depth == 0 {
            return evaluate(&node.board, &node.captures, self.config.komi);
        }

        let color = if maximizing { Color::White } else { Color::Black };
        let moves = generate_moves(&node.board, color, node.last.as_ref());

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for mv in moves {
                let child = node.child(mv, color);
                let eval = self.alpha_beta(&child, depth - 1, alpha, beta, false, nodes);
                best = best.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for mv in moves {
                let child = node.child(mv, color);
                let eval = self.alpha_beta(&child, depth - 1, alpha, beta, true, nodes);
                best = best.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
