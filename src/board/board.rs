//! Board structure with runtime side length

use sha2::{Digest, Sha256};

use super::{BoardError, Pos, Stone, BOARD_SIZE, MAX_BOARD_SIZE};

/// Game board: an N x N grid of trinary cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
}

impl Board {
    /// Empty standard 15x15 board
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    /// Empty board with a custom side length (at most `MAX_BOARD_SIZE`).
    pub fn with_size(size: usize) -> Self {
        debug_assert!(size > 0 && size <= MAX_BOARD_SIZE);
        Self {
            size,
            cells: vec![Stone::Empty; size * size],
        }
    }

    /// Build a board from rows of wire values (0 empty, 1 and 2 players).
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(BoardError::InvalidSize(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for &value in values {
                cells.push(Stone::try_from(value)?);
            }
        }

        Ok(Self { size, cells })
    }

    /// Rows of wire values, the inverse of `from_rows`
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|s| s.to_u8()).collect())
            .collect()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether signed coordinates fall on the board
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.cells[pos.to_index(self.size)]
    }

    /// Cell lookup with signed coordinates. `None` is the off-board sentinel.
    #[inline]
    pub fn cell(&self, row: i32, col: i32) -> Option<Stone> {
        if self.contains(row, col) {
            Some(self.cells[row as usize * self.size + col as usize])
        } else {
            None
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Place a stone without validation.
    /// Use `play` for externally supplied moves.
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        let idx = pos.to_index(self.size);
        self.cells[idx] = stone;
    }

    /// Remove a stone
    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        let idx = pos.to_index(self.size);
        self.cells[idx] = Stone::Empty;
    }

    /// Validated move: the cell must be on the board and empty.
    pub fn play(&mut self, pos: Pos, stone: Stone) -> Result<(), BoardError> {
        if stone == Stone::Empty {
            return Err(BoardError::EmptyStone);
        }
        let (row, col) = (pos.row as usize, pos.col as usize);
        if row >= self.size || col >= self.size {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        if !self.is_empty(pos) {
            return Err(BoardError::Occupied { row, col });
        }
        self.place_stone(pos, stone);
        Ok(())
    }

    /// Number of cells holding `stone`
    pub fn count(&self, stone: Stone) -> usize {
        self.cells.iter().filter(|&&s| s == stone).count()
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.cells.len() - self.count(Stone::Empty)
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.cells.iter().all(|&s| s == Stone::Empty)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&s| s != Stone::Empty)
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Pos> {
        self.stones_of(Stone::Empty)
    }

    /// Cells holding `stone`, row-major
    pub fn stones_of(&self, stone: Stone) -> Vec<Pos> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == stone)
            .map(|(idx, _)| Pos::from_index(idx, self.size))
            .collect()
    }

    /// Center cell (`size / 2` on both axes)
    #[inline]
    pub fn center(&self) -> Pos {
        let mid = (self.size / 2) as u8;
        Pos::new(mid, mid)
    }

    /// Lowercase hex SHA-256 of the board serialized as compact JSON rows.
    ///
    /// This is the opening-book key format: `[[0,0,...],[...],...]`.
    pub fn position_hash(&self) -> String {
        // Integer rows always serialize.
        let json = serde_json::to_vec(&self.to_rows()).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&json);
        hex::encode(hasher.finalize())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row
                .iter()
                .map(|s| match s {
                    Stone::Empty => '.',
                    Stone::Black => 'X',
                    Stone::White => 'O',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
