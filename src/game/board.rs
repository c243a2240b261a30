//! 4x4 2048 board

use std::fmt;

use rand::{Rng, seq::IndexedRandom};

use crate::types::Action;

/// Board side length
pub const SIDE: usize = 4;
/// Number of cells
pub const CELLS: usize = SIDE * SIDE;

/// A 2048 board in row-major order. Cells hold tile values, 0 is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board([u32; CELLS]);

impl Board {
    /// A board with no tiles.
    pub const EMPTY: Board = Board([0; CELLS]);

    pub fn from_cells(cells: [u32; CELLS]) -> Self {
        Board(cells)
    }

    pub fn cells(&self) -> &[u32; CELLS] {
        &self.0
    }

    /// Indices of each line, ordered in the direction tiles travel.
    fn lines(action: Action) -> [[usize; SIDE]; SIDE] {
        let mut lines = [[0; SIDE]; SIDE];
        for (outer, line) in lines.iter_mut().enumerate() {
            for (inner, slot) in line.iter_mut().enumerate() {
                *slot = match action {
                    Action::Left => outer * SIDE + inner,
                    Action::Right => outer * SIDE + (SIDE - 1 - inner),
                    Action::Up => inner * SIDE + outer,
                    Action::Down => (SIDE - 1 - inner) * SIDE + outer,
                };
            }
        }
        lines
    }

    /// Slide and merge one line towards index 0, returning the merge score.
    ///
    /// Each tile merges at most once per move.
    fn compress_line(line: [u32; SIDE]) -> ([u32; SIDE], u32) {
        let tiles: Vec<u32> = line.into_iter().filter(|&v| v != 0).collect();
        let mut merged = [0; SIDE];
        let mut score = 0;
        let mut out = 0;
        let mut i = 0;
        while i < tiles.len() {
            if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
                let value = tiles[i] * 2;
                merged[out] = value;
                score += value;
                i += 2;
            } else {
                merged[out] = tiles[i];
                i += 1;
            }
            out += 1;
        }
        (merged, score)
    }

    /// Board after sliding in `action` (no tile spawn), with the merge score.
    pub fn shift(self, action: Action) -> (Board, u32) {
        let mut next = self;
        let mut score = 0;
        for indices in Self::lines(action) {
            let line = indices.map(|idx| self.0[idx]);
            let (compressed, line_score) = Self::compress_line(line);
            for (idx, value) in indices.into_iter().zip(compressed) {
                next.0[idx] = value;
            }
            score += line_score;
        }
        (next, score)
    }

    /// Whether sliding in `action` would change the board
    pub fn can_shift(self, action: Action) -> bool {
        self.shift(action).0 != self
    }

    /// Whether any move changes the board
    pub fn has_moves(self) -> bool {
        Action::ALL.into_iter().any(|action| self.can_shift(action))
    }

    pub fn count_empty(&self) -> usize {
        self.0.iter().filter(|&&v| v == 0).count()
    }

    pub fn highest_tile(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// A full board is returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Board {
        let empty: Vec<usize> = (0..CELLS).filter(|&idx| self.0[idx] == 0).collect();
        let mut next = self;
        if let Some(&idx) = empty.choose(rng) {
            next.0[idx] = if rng.random_range(0..10) < 9 { 2 } else { 4 };
        }
        next
    }
}

impl AsRef<[u32]> for Board {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.chunks(SIDE) {
            for cell in row {
                write!(f, "{cell:>6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
