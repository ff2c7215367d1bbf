//! Reference collaborators: a tiny take-away game.
//!
//! A pile of stones; players alternately remove one to three; taking the
//! last stone wins. Small enough to verify the shell end to end, yet it has
//! real legal/illegal moves, a perfect-play structure (multiples of four
//! lose), and a searchable tree. The core modules never depend on this.

use crate::counter::{BranchTally, NodeCounter};
use crate::coordinator::SCORE_INF;
use crate::game::{
    GameRules, HashTable, MoveError, PositionDecodeError, SearchBackend, SearchError,
    SearchReport,
};
use crate::sync::AbortToken;

/// Won/lost score, inside the search window.
const WIN_SCORE: i32 = 30_000;

/// Heuristic for non-terminal leaves: multiples of four lose to mirroring.
fn static_eval(stones: u32) -> i32 {
    if stones % 4 == 0 {
        -50
    } else {
        50
    }
}

/// Rules collaborator. A position is the number of stones left; the game is
/// symmetric, so the side to move is implicit.
pub struct NimRules {
    start_stones: u32,
}

impl NimRules {
    #[must_use]
    pub fn new(start_stones: u32) -> Self {
        NimRules { start_stones }
    }
}

impl Default for NimRules {
    fn default() -> Self {
        NimRules { start_stones: 21 }
    }
}

impl GameRules for NimRules {
    type Position = u32;

    fn start_position(&self) -> u32 {
        self.start_stones
    }

    fn endgame_position(&self) -> u32 {
        5
    }

    fn decode_position(&self, text: &str) -> Result<u32, PositionDecodeError> {
        text.parse::<u32>()
            .map_err(|_| PositionDecodeError(text.to_string()))
    }

    fn apply_move(&self, pos: &u32, token: &str) -> Result<u32, MoveError> {
        let take: u32 = token
            .parse()
            .map_err(|_| MoveError::Unparseable(token.to_string()))?;
        if take == 0 || take > 3 || take > *pos {
            return Err(MoveError::Illegal(token.to_string()));
        }
        Ok(pos - take)
    }

    fn legal_moves(&self, pos: &u32) -> Vec<String> {
        (1..=(*pos).min(3)).map(|t| t.to_string()).collect()
    }

    fn render(&self, pos: &u32) -> String {
        format!("pile: {} stone(s)", pos)
    }

    fn evaluate(&self, pos: &u32) -> i32 {
        if *pos == 0 {
            -WIN_SCORE
        } else {
            static_eval(*pos)
        }
    }

    fn perft(&self, pos: &u32, depth: u32) -> u64 {
        if depth == 0 || *pos == 0 {
            return 1;
        }
        (1..=(*pos).min(3))
            .map(|take| self.perft(&(pos - take), depth - 1))
            .sum()
    }
}

/// Negamax search backend over the take-away game.
///
/// Polls the abort token between sibling moves and books every visited node
/// through a branch tally committed when the pass returns.
#[derive(Default)]
pub struct NimSearch;

impl NimSearch {
    fn negamax(
        &self,
        stones: u32,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        abort: &AbortToken,
        tally: &mut BranchTally<'_>,
    ) -> (i32, Vec<String>) {
        tally.add(1);

        if stones == 0 {
            // Opponent took the last stone.
            return (-WIN_SCORE, Vec::new());
        }
        if depth == 0 {
            return (static_eval(stones), Vec::new());
        }

        let mut best_score = -SCORE_INF;
        let mut best_pv = Vec::new();

        for (i, take) in (1..=stones.min(3)).enumerate() {
            // Always finish the first move so a cancelled pass still has a
            // line to report.
            if i > 0 && abort.should_stop() {
                break;
            }

            let (child_score, child_pv) =
                self.negamax(stones - take, depth - 1, -beta, -alpha, abort, tally);
            let score = -child_score;

            if score > best_score {
                best_score = score;
                best_pv = Vec::with_capacity(child_pv.len() + 1);
                best_pv.push(take.to_string());
                best_pv.extend(child_pv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        (best_score, best_pv)
    }
}

impl SearchBackend<u32> for NimSearch {
    fn search(
        &self,
        pos: &u32,
        depth: u32,
        alpha: i32,
        beta: i32,
        abort: &AbortToken,
        nodes: &NodeCounter,
    ) -> Result<SearchReport, SearchError> {
        if *pos == 0 {
            return Err(SearchError::NoLegalMove);
        }
        let mut tally = nodes.tally();
        let (score, pv) = self.negamax(*pos, depth, alpha, beta, abort, &mut tally);
        tally.commit();
        Ok(SearchReport { pv, score })
    }
}

/// Hash-table collaborator that only tracks its footprint.
///
/// The take-away game has nothing worth caching, so this records the size
/// the shell asked for without committing memory. A real engine plugs its
/// transposition table in here.
pub struct ByteTable {
    bytes: usize,
}

impl ByteTable {
    #[must_use]
    pub fn new() -> Self {
        ByteTable { bytes: 0 }
    }
}

impl Default for ByteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HashTable for ByteTable {
    fn resize(&mut self, mb: i64) -> usize {
        self.bytes = usize::try_from(mb.max(0)).unwrap_or(0) * 1024 * 1024;
        self.bytes
    }

    fn release(&mut self) {
        self.bytes = 0;
    }
}
