//! Position history for one protocol session.
//!
//! An append-only-until-reset sequence of snapshots with a cursor at the
//! current position. The capacity bounds the maximum supported game length;
//! running past it means a misconfigured build, not bad input.

use crate::game::{GameRules, MoveError, PositionDecodeError};

/// How `reset` establishes the base position.
pub enum BasePosition<'a> {
    Start,
    Endgame,
    Encoded(&'a str),
}

/// Bounded position history plus cursor.
pub struct Session<R: GameRules> {
    snapshots: Vec<R::Position>,
    cursor: usize,
    capacity: usize,
}

impl<R: GameRules> Session<R> {
    /// Fresh session at the canonical start position.
    #[must_use]
    pub fn new(rules: &R, capacity: usize) -> Self {
        assert!(capacity > 0, "session capacity must be at least 1");
        let mut snapshots = Vec::with_capacity(capacity);
        snapshots.push(rules.start_position());
        Session { snapshots, cursor: 0, capacity }
    }

    /// Establish a new base position and rewind the cursor to 0.
    pub fn reset(&mut self, rules: &R, base: BasePosition<'_>) -> Result<(), PositionDecodeError> {
        let position = match base {
            BasePosition::Start => rules.start_position(),
            BasePosition::Endgame => rules.endgame_position(),
            BasePosition::Encoded(text) => rules.decode_position(text)?,
        };
        self.snapshots.clear();
        self.snapshots.push(position);
        self.cursor = 0;
        Ok(())
    }

    /// Apply one move token to the current position.
    ///
    /// Legal moves append the successor and advance the cursor; illegal or
    /// unparseable tokens leave the session untouched.
    ///
    /// # Panics
    /// When the history capacity is exhausted (fatal resource invariant).
    pub fn apply_move(&mut self, rules: &R, token: &str) -> Result<(), MoveError> {
        let next = rules.apply_move(self.current(), token)?;
        assert!(
            self.cursor + 1 < self.capacity,
            "game history capacity ({}) exceeded",
            self.capacity
        );
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(next);
        self.cursor += 1;
        Ok(())
    }

    /// The position at the cursor.
    #[must_use]
    pub fn current(&self) -> &R::Position {
        &self.snapshots[self.cursor]
    }

    /// Half-moves played from the base position.
    #[must_use]
    pub fn ply(&self) -> usize {
        self.cursor
    }
}
