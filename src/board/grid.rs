//! The checkerboard grid of squares.
//!
//! A grid is laid out from an anchor cell: the square at `(row, col)` is the
//! anchor region translated by `forward * (row * height) + right * (col * width)`.
//! Rows therefore advance away from the player who created the board and
//! columns advance to their right.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coordinate::{Coordinate, BOARD_SIZE};
use crate::geometry::{Orientation, Region};

/// Errors raised when grid parameters cannot describe a valid grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("grid dimensions {rows}x{cols} must each be between 1 and 8")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("square size {width}x{height} must be at least 1x1")]
    InvalidCellSize { width: u32, height: u32 },
}

/// Row and column count of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    rows: u8,
    cols: u8,
}

impl GridDimensions {
    /// Validates a row/column count. Every cell must be addressable by a
    /// [`Coordinate`], so both counts are limited to `1..=8`.
    pub fn new(rows: u32, cols: u32) -> Result<Self, GeometryError> {
        let valid = |n: u32| (1..=BOARD_SIZE as u32).contains(&n);
        if valid(rows) && valid(cols) {
            Ok(GridDimensions {
                rows: rows as u8,
                cols: cols as u8,
            })
        } else {
            Err(GeometryError::InvalidDimensions { rows, cols })
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.row() < self.rows && c.col() < self.cols
    }

    fn index(&self, c: Coordinate) -> Option<usize> {
        self.contains(c)
            .then(|| c.row() as usize * self.cols as usize + c.col() as usize)
    }
}

impl Default for GridDimensions {
    /// The standard 8x8 board.
    fn default() -> Self {
        GridDimensions {
            rows: BOARD_SIZE,
            cols: BOARD_SIZE,
        }
    }
}

/// Footprint of a single square in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSize {
    width: u32,
    height: u32,
}

impl CellSize {
    /// `width` runs along the board's right vector, `height` along forward.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidCellSize { width, height });
        }
        Ok(CellSize { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for CellSize {
    /// 3x3 block squares.
    fn default() -> Self {
        CellSize {
            width: 3,
            height: 3,
        }
    }
}

/// The two checkerboard colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SquareColor {
    Dark,
    Light,
}

impl SquareColor {
    /// Even `row + col` is dark, odd is light.
    pub fn of(c: Coordinate) -> SquareColor {
        if (c.row() + c.col()) % 2 == 0 {
            SquareColor::Dark
        } else {
            SquareColor::Light
        }
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    coordinate: Coordinate,
    region: Region,
    color: SquareColor,
}

impl Square {
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn color(&self) -> SquareColor {
        self.color
    }
}

/// Immutable rectangular array of squares plus the basis it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareGrid {
    dimensions: GridDimensions,
    cell_size: CellSize,
    orientation: Orientation,
    anchor: Region,
    /// Row-major.
    squares: Vec<Square>,
    bounds: Region,
}

impl SquareGrid {
    /// The region of the corner cell whose near corner sits at `anchor`.
    /// Squares are one block tall.
    pub fn anchor_cell(anchor: DVec3, orientation: &Orientation, cell_size: CellSize) -> Region {
        let far = anchor
            + orientation.forward() * cell_size.height as f64
            + orientation.right() * cell_size.width as f64
            + orientation.up();
        Region::from_corners(anchor, far)
    }

    /// Lays out every square by translating `anchor` along the basis.
    pub fn new(
        dimensions: GridDimensions,
        cell_size: CellSize,
        orientation: Orientation,
        anchor: Region,
    ) -> Self {
        let mut squares = Vec::with_capacity(dimensions.rows as usize * dimensions.cols as usize);
        let mut bounds = anchor;
        for coordinate in Coordinate::all().filter(|c| dimensions.contains(*c)) {
            let offset = orientation.forward()
                * (coordinate.row() as f64 * cell_size.height as f64)
                + orientation.right() * (coordinate.col() as f64 * cell_size.width as f64);
            let region = anchor.translate(offset);
            bounds = bounds.union(&region);
            squares.push(Square {
                coordinate,
                region,
                color: SquareColor::of(coordinate),
            });
        }
        SquareGrid {
            dimensions,
            cell_size,
            orientation,
            anchor,
            squares,
            bounds,
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    /// The corner cell region the grid was laid out from.
    pub fn anchor(&self) -> Region {
        self.anchor
    }

    /// Union of all square regions, computed once at construction.
    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn get(&self, c: Coordinate) -> Option<&Square> {
        self.dimensions.index(c).and_then(|i| self.squares.get(i))
    }

    /// Squares in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// The square whose region contains the world point `p`, if any.
    pub fn square_at(&self, p: DVec3) -> Option<&Square> {
        if !self.bounds.contains_point(p) {
            return None;
        }
        self.squares.iter().find(|s| s.region.contains_point(p))
    }
}
