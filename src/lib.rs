//! Baduk-AI: rules engine and alpha-beta move selection for 9x9 Go.
//!
//! The crate is stateless: every call takes a board, a capture tally, and
//! the previous position, and returns a move or a score. Transports call
//! into [`session`] (or drive the text [`protocol`]) with one request at a
//! time.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, wire codes, and engine defaults
//! - [`board`] - Board model, coordinates, and moves
//! - [`group`] - Stone group and liberty discovery
//! - [`rules`] - Captures, legality (suicide, ko), and move generation
//! - [`eval`] - Territory counting and static evaluation
//! - [`search`] - Alpha-beta minimax move selection
//! - [`session`] - Move and score request handling
//! - [`protocol`] - Line-oriented text protocol server
//!
//! ## Example
//!
//! ```
//! use baduk_ai::board::{Board, Color, Move};
//! use baduk_ai::rules::{Captures, apply_move};
//! use baduk_ai::search::{Engine, EngineConfig};
//!
//! let mut board = Board::new();
//! let mut captures = Captures::new();
//! let before = board;
//! apply_move(&mut board, &mut captures, Move::Place { row: 4, col: 4 }, Color::Black);
//!
//! let engine = Engine::new(EngineConfig::default());
//! let reply = engine.select_best_move(&board, &captures, Some(&before));
//! println!("White plays {}", reply.mv);
//! ```

pub mod board;
pub mod constants;
pub mod eval;
pub mod group;
pub mod protocol;
pub mod rules;
pub mod search;
pub mod session;
