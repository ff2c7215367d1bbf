//! Contracts for the external collaborators the shell drives.
//!
//! The control plane never looks inside a position: the board
//! representation, move generation, evaluation, the search tree walk, and
//! the hash table all live behind these seams.

use std::fmt;
use std::sync::Arc;

use crate::counter::NodeCounter;
use crate::sync::AbortToken;

/// Rules collaborator: positions, moves, introspection.
pub trait GameRules {
    type Position: Clone + Send + 'static;

    /// Canonical starting position.
    fn start_position(&self) -> Self::Position;

    /// Fixed endgame configuration used for quick testing.
    fn endgame_position(&self) -> Self::Position;

    /// Parse a caller-supplied encoded position string.
    fn decode_position(&self, text: &str) -> Result<Self::Position, PositionDecodeError>;

    /// Resolve a human-readable move token against `pos` and produce the
    /// successor position if the move is legal.
    fn apply_move(&self, pos: &Self::Position, token: &str) -> Result<Self::Position, MoveError>;

    /// Move tokens legal in `pos`.
    fn legal_moves(&self, pos: &Self::Position) -> Vec<String>;

    /// Human-readable rendering of `pos`.
    fn render(&self, pos: &Self::Position) -> String;

    /// Static evaluation from the side to move's point of view.
    fn evaluate(&self, pos: &Self::Position) -> i32;

    /// Move-count verification to `depth`.
    fn perft(&self, pos: &Self::Position, depth: u32) -> u64;
}

/// One bounded search of a single position.
///
/// The implementation walks the tree however it likes; it must poll `abort`
/// at its checkpoints and book explored nodes through `nodes`. When the
/// token fires mid-search the returned report carries whatever partial
/// principal variation exists.
pub trait SearchBackend<P>: Send + Sync {
    fn search(
        &self,
        pos: &P,
        depth: u32,
        alpha: i32,
        beta: i32,
        abort: &AbortToken,
        nodes: &NodeCounter,
    ) -> Result<SearchReport, SearchError>;
}

/// Shared handle to a search backend.
pub type SharedBackend<P> = Arc<dyn SearchBackend<P>>;

/// What one depth's search produced.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Principal variation, best move first. May be partial if the search
    /// was interrupted.
    pub pv: Vec<String>,
    /// Score of the variation from the side to move's point of view.
    pub score: i32,
}

/// Position-keyed cache collaborator; the shell only sizes and releases it.
pub trait HashTable: Send {
    /// Resize to roughly `mb` megabytes; returns the resulting byte
    /// footprint.
    fn resize(&mut self, mb: i64) -> usize;

    /// Release backing storage at shutdown.
    fn release(&mut self);
}

/// A caller-supplied encoded position string could not be parsed.
#[derive(Debug, Clone)]
pub struct PositionDecodeError(pub String);

impl fmt::Display for PositionDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad position string: {}", self.0)
    }
}

impl std::error::Error for PositionDecodeError {}

/// A move token was unparseable or illegal in the current position.
#[derive(Debug, Clone)]
pub enum MoveError {
    Unparseable(String),
    Illegal(String),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::Unparseable(tok) => write!(f, "unparseable move '{tok}'"),
            MoveError::Illegal(tok) => write!(f, "illegal move '{tok}'"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Search-level failure distinct from cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The position admits no legal move at all.
    NoLegalMove,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoLegalMove => write!(f, "no legal move"),
        }
    }
}

impl std::error::Error for SearchError {}
