//! Board assembly.
//!
//! A board is the grid wrapped in two nested borders: the inner border
//! around the squares and the frame around the inner border. Building one is
//! a pure function of the anchor, orientation and (sanitized) configuration.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::border::Border;
use super::coordinate::Coordinate;
use super::grid::SquareGrid;
use crate::config::BoardConfig;
use crate::geometry::{Orientation, Region};

/// Name of the world a board lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub String);

impl WorldId {
    pub fn new(name: impl Into<String>) -> Self {
        WorldId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable aggregate of a grid and its two borders.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    world: WorldId,
    anchor: DVec3,
    config: BoardConfig,
    grid: SquareGrid,
    inner_border: Border,
    frame: Border,
}

impl Board {
    pub fn world(&self) -> &WorldId {
        &self.world
    }

    /// The world point the board was anchored at.
    pub fn anchor(&self) -> DVec3 {
        self.anchor
    }

    /// The sanitized configuration the board was built from.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &SquareGrid {
        &self.grid
    }

    pub fn inner_border(&self) -> &Border {
        &self.inner_border
    }

    pub fn frame(&self) -> &Border {
        &self.frame
    }

    pub fn orientation(&self) -> &Orientation {
        self.grid.orientation()
    }

    /// Outermost extent of the board, i.e. the frame.
    pub fn bounds(&self) -> Region {
        self.frame.region()
    }

    pub fn center(&self) -> DVec3 {
        self.bounds().center()
    }

    /// Where a piece standing on `coordinate` is spawned: the square's
    /// center raised by one block. `None` if the grid has no such square.
    pub fn spawn_position(&self, coordinate: Coordinate) -> Option<DVec3> {
        self.grid
            .get(coordinate)
            .map(|s| s.region().center() + self.orientation().up())
    }

    /// The coordinate of the square containing a world point.
    pub fn square_at(&self, p: DVec3) -> Option<Coordinate> {
        self.grid.square_at(p).map(|s| s.coordinate())
    }
}

/// Builds boards from an anchor, an orientation and configuration.
pub struct BoardFactory;

impl BoardFactory {
    /// Creates a board. Never fails: the configuration is sanitized (a no-op
    /// for configuration that was already loaded through [`BoardConfig`]).
    pub fn create_board(
        world: WorldId,
        anchor: DVec3,
        orientation: Orientation,
        config: &BoardConfig,
    ) -> Board {
        let config = config.sanitized();
        let cell_size = config.squares.cell_size();
        let anchor_cell = SquareGrid::anchor_cell(anchor, &orientation, cell_size);
        let grid = SquareGrid::new(
            config.squares.dimensions(),
            cell_size,
            orientation,
            anchor_cell,
        );
        let inner_border = Border::new(grid.bounds(), config.inner_border.thickness);
        let frame = Border::new(inner_border.region(), config.frame.thickness);

        let board = Board {
            world,
            anchor,
            config,
            grid,
            inner_border,
            frame,
        };
        info!(
            world = %board.world,
            facing = board.orientation().facing().name(),
            center = ?board.center(),
            "board created"
        );
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Direction, ALL_DIRECTIONS};

    fn board(facing: Direction, config: &BoardConfig) -> Board {
        BoardFactory::create_board(
            WorldId::new("world"),
            DVec3::new(100.0, 70.0, 100.0),
            Orientation::from_direction(facing),
            config,
        )
    }

    #[test]
    fn borders_nest_strictly_outward() {
        for d in ALL_DIRECTIONS {
            let b = board(d, &BoardConfig::default());
            assert!(b.inner_border().region().strictly_contains_planar(&b.grid().bounds()));
            assert!(b.frame().region().strictly_contains_planar(&b.inner_border().region()));
            assert_eq!(b.frame().inside(), b.inner_border().region());
            assert_eq!(b.inner_border().inside(), b.grid().bounds());
        }
    }

    #[test]
    fn board_bounds_include_both_borders() {
        let mut config = BoardConfig::default();
        config.inner_border.thickness = 2;
        config.frame.thickness = 1;
        let b = board(Direction::North, &config);
        // 24 + 2 * (2 + 1) on each planar axis
        assert_eq!(b.bounds().planar_area(), 30.0 * 30.0);
    }

    #[test]
    fn zero_thickness_borders_collapse_onto_grid() {
        let mut config = BoardConfig::default();
        config.inner_border.thickness = 0;
        config.frame.thickness = 0;
        let b = board(Direction::West, &config);
        assert_eq!(b.bounds(), b.grid().bounds());
    }

    #[test]
    fn spawn_position_is_one_block_above_center() {
        let b = board(Direction::South, &BoardConfig::default());
        let a1 = Coordinate::parse("A1").unwrap();
        let square = b.grid().get(a1).unwrap();
        assert_eq!(
            b.spawn_position(a1),
            Some(square.region().center() + DVec3::Y)
        );
    }

    #[test]
    fn spawn_position_outside_small_grid_is_none() {
        let mut config = BoardConfig::default();
        config.squares.rows = 2;
        let b = board(Direction::North, &config);
        assert!(b.spawn_position(Coordinate::parse("A2").unwrap()).is_some());
        assert!(b.spawn_position(Coordinate::parse("A3").unwrap()).is_none());
    }

    #[test]
    fn creation_is_deterministic() {
        let config = BoardConfig::default();
        assert_eq!(board(Direction::East, &config), board(Direction::East, &config));
    }

    #[test]
    fn unsanitized_config_is_clamped() {
        let mut config = BoardConfig::default();
        config.squares.width = 0;
        let b = board(Direction::North, &config);
        assert_eq!(b.grid().cell_size().width(), 3);
        assert_eq!(b.config().squares.width, 3);
    }

    #[test]
    fn square_at_maps_back_to_coordinate() {
        let b = board(Direction::East, &BoardConfig::default());
        let e4 = Coordinate::parse("E4").unwrap();
        let center = b.grid().get(e4).unwrap().region().center();
        assert_eq!(b.square_at(center), Some(e4));
        assert_eq!(b.square_at(b.center() + DVec3::new(500.0, 0.0, 0.0)), None);
    }
}
