//! Constants for board dimensions, wire codes, and engine defaults.
//!
//! The board is a flat row-major array of `N * N` cells with no padding;
//! neighbors are found by bounds-checking coordinates rather than by
//! sentinel cells around the edge.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Only 9x9 is supported.
pub const N: usize = 9;

/// Number of playable cells on the board.
pub const CELLS: usize = N * N;

// =============================================================================
// Wire Codes
// =============================================================================

/// Empty cell in the wire encoding.
pub const CODE_EMPTY: u8 = 0;

/// Black stone in the wire encoding.
pub const CODE_BLACK: u8 = 1;

/// White stone in the wire encoding.
pub const CODE_WHITE: u8 = 2;

/// Row/column sentinel marking a pass move.
pub const PASS_COORD: i32 = -1;

// =============================================================================
// Engine Defaults
// =============================================================================

/// Compensation points for White, who moves second.
pub const DEFAULT_KOMI: f64 = 6.5;

/// Search depth in plies: one AI move and one opponent reply.
pub const DEFAULT_DEPTH: u8 = 2;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Row/column offsets to the four orthogonal neighbors.
/// Order: North, South, West, East
pub const DELTA: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
