//! Request/response operations: apply a move and reply, or score a board.
//!
//! These are the pure core of the service. A transport decodes JSON into
//! the request types here, calls [`play`] or [`score`], and encodes the
//! result; nothing is kept between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{Board, Color, Move};
use crate::constants::{CELLS, CODE_BLACK, CODE_WHITE};
use crate::eval;
use crate::rules::{Captures, MoveError, try_play};
use crate::search::Engine;

/// Errors reported back to the caller. Nothing here is fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("board must have {expected} cells, got {found}")]
    BoardLength { expected: usize, found: usize },

    #[error("invalid cell value {value} at index {index}")]
    CellValue { index: usize, value: i64 },

    #[error("invalid player color {0}")]
    InvalidColor(i64),

    #[error("last board state must have {expected} cells, got {found}")]
    LastBoardLength { expected: usize, found: usize },

    #[error("unknown capture key \"{0}\"")]
    CaptureKey(String),

    #[error("invalid capture count {count} for \"{key}\"")]
    CaptureCount { key: String, count: i64 },

    #[error("Illegal move: {0}")]
    IllegalMove(#[from] MoveError),
}

impl SessionError {
    /// Whether the request was well formed but the move broke a rule.
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, SessionError::IllegalMove(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveRequest {
    pub board: Vec<i64>,
    pub player: i64,
    pub row: i32,
    pub col: i32,
    #[serde(default)]
    pub captures: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    pub last_board_state: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoveType {
    Play,
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveResponse {
    pub board: Vec<u8>,
    pub captures: BTreeMap<String, u32>,
    pub message: String,
    pub move_type: MoveType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreRequest {
    pub board: Vec<i64>,
    #[serde(default)]
    pub captures: Option<BTreeMap<String, i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreResponse {
    pub black_score: f64,
    pub white_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&SessionError> for ErrorResponse {
    fn from(err: &SessionError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Apply the player's move, then search and apply White's reply.
///
/// A black placement is validated against `LastBoardState` and rejected
/// with [`SessionError::IllegalMove`] if it breaks a rule. When the player
/// is White, no human move is applied and the engine simply moves.
///
/// The engine's ko reference is the board as it stood before the player's
/// action in this request, both during search and in the final re-check.
pub fn play(engine: &Engine, req: &MoveRequest) -> Result<MoveResponse, SessionError> {
    let mut board = decode_board(&req.board)?;
    let player = decode_color(req.player)?;
    let last = req
        .last_board_state
        .as_deref()
        .map(decode_last_board)
        .transpose()?
        .flatten();
    let mut captures = decode_captures(req.captures.as_ref())?;

    let before = board;
    let mv = Move::from_wire(req.row, req.col);

    if player == Color::Black {
        match mv {
            Move::Pass => info!("black passes"),
            Move::Place { .. } => {
                let placed = try_play(&board, mv, Color::Black, last.as_ref()).map_err(|err| {
                    warn!(%mv, %err, "rejected black move");
                    SessionError::IllegalMove(err)
                })?;
                board = placed.board;
                captures.credit(Color::Black, placed.captured);
                info!(%mv, captured = placed.captured, "black played");
            }
        }
    }

    let reply = engine.select_best_move(&board, &captures, Some(&before));

    let (message, move_type) = match reply.mv {
        Move::Pass => ("AI passes. Your turn.".to_string(), MoveType::Pass),
        mv => match try_play(&board, mv, Color::White, Some(&before)) {
            Ok(placed) => {
                board = placed.board;
                captures.credit(Color::White, placed.captured);
                info!(%mv, captured = placed.captured, score = reply.score, "white played");
                let (row, col) = mv.to_wire();
                (format!("AI played at ({row}, {col})."), MoveType::Play)
            }
            Err(err) => {
                warn!(%mv, %err, "search proposed an illegal move, passing instead");
                ("AI tried illegal move and passes.".to_string(), MoveType::Pass)
            }
        },
    };

    Ok(MoveResponse {
        board: board.to_codes(),
        captures: encode_captures(&captures),
        message,
        move_type,
    })
}

/// Score a board: territory plus prisoners, with komi added for White.
pub fn score(engine: &Engine, req: &ScoreRequest) -> Result<ScoreResponse, SessionError> {
    let board = decode_board(&req.board)?;
    let captures = decode_captures(req.captures.as_ref())?;
    let score = eval::score(&board, &captures, engine.config().komi);
    Ok(ScoreResponse {
        black_score: score.black,
        white_score: score.white,
    })
}

fn decode_cells(cells: &[i64]) -> Result<[Option<Color>; CELLS], SessionError> {
    let mut out = [None; CELLS];
    for (index, (&value, slot)) in cells.iter().zip(out.iter_mut()).enumerate() {
        *slot = match value {
            0 => None,
            v => Some(
                u8::try_from(v)
                    .ok()
                    .and_then(Color::from_code)
                    .ok_or(SessionError::CellValue { index, value })?,
            ),
        };
    }
    Ok(out)
}

/// Decode a row-major board of 0/1/2 codes.
pub fn decode_board(cells: &[i64]) -> Result<Board, SessionError> {
    if cells.len() != CELLS {
        return Err(SessionError::BoardLength {
            expected: CELLS,
            found: cells.len(),
        });
    }
    decode_cells(cells).map(Board::from_cells)
}

/// An empty snapshot means there is no previous position.
fn decode_last_board(cells: &[i64]) -> Result<Option<Board>, SessionError> {
    match cells.len() {
        0 => Ok(None),
        CELLS => decode_cells(cells).map(|c| Some(Board::from_cells(c))),
        found => Err(SessionError::LastBoardLength {
            expected: CELLS,
            found,
        }),
    }
}

fn decode_color(code: i64) -> Result<Color, SessionError> {
    u8::try_from(code)
        .ok()
        .and_then(Color::from_code)
        .ok_or(SessionError::InvalidColor(code))
}

/// Decode prisoners keyed by the code of the captured color.
pub fn decode_captures(map: Option<&BTreeMap<String, i64>>) -> Result<Captures, SessionError> {
    let (mut black_lost, mut white_lost) = (0, 0);
    for (key, &count) in map.into_iter().flatten() {
        let value = u32::try_from(count).map_err(|_| SessionError::CaptureCount {
            key: key.clone(),
            count,
        })?;
        match key.parse::<u8>().ok() {
            Some(CODE_BLACK) => black_lost = value,
            Some(CODE_WHITE) => white_lost = value,
            _ => return Err(SessionError::CaptureKey(key.clone())),
        }
    }
    Ok(Captures::from_lost(black_lost, white_lost))
}

/// Encode prisoners, leaving out colors with nothing captured.
pub fn encode_captures(captures: &Captures) -> BTreeMap<String, u32> {
    [Color::Black, Color::White]
        .into_iter()
        .filter(|&c| captures.lost(c) > 0)
        .map(|c| (c.code().to_string(), captures.lost(c)))
        .collect()
}
