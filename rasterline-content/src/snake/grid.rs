//! Grid geometry

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid cell coordinates (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in a direction
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cell offset of one move (y grows downwards)
    pub fn offset(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Playfield dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Grid {
    /// Columns, border included
    pub cols: i16,
    /// Rows, border included
    pub rows: i16,
    /// Block edge in pixels
    pub block: u16,
}

impl Grid {
    /// Grid covering a frame of `width` x `height` pixels
    pub fn for_frame(width: u16, height: u16, block: u16) -> Option<Self> {
        if block == 0 {
            return None;
        }
        Some(Self {
            cols: i16::try_from(width / block).ok()?,
            rows: i16::try_from(height / block).ok()?,
            block,
        })
    }

    /// Check whether a cell is on (or beyond) the border ring
    pub fn is_border(&self, cell: Cell) -> bool {
        cell.x <= 0 || cell.x >= self.cols - 1 || cell.y <= 0 || cell.y >= self.rows - 1
    }

    /// Check whether a cell is inside the playable area
    pub fn is_interior(&self, cell: Cell) -> bool {
        !self.is_border(cell)
    }

    /// Number of playable columns and rows
    pub fn interior_size(&self) -> (i16, i16) {
        ((self.cols - 2).max(0), (self.rows - 2).max(0))
    }

    /// Pixel rectangle of a cell: (x, y, edge)
    pub fn cell_rect(&self, cell: Cell) -> (i32, i32, u32) {
        let block = self.block as i32;
        (cell.x as i32 * block, cell.y as i32 * block, self.block as u32)
    }
}
