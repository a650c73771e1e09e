use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GridSize;
use crate::grid::Grid;
use crate::snake::{Position, Snake};

/// The single food item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Draws a uniformly random cell, ignoring whatever already occupies it.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Self {
        Self::new(Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        })
    }

    /// Draws uniformly among cells that pass the enabled filters.
    ///
    /// Returns `None` when every cell is excluded.
    #[must_use]
    pub fn spawn_on_free_cell<R: Rng + ?Sized>(
        rng: &mut R,
        grid: &Grid,
        snake: &Snake,
        avoid_obstacles: bool,
        avoid_snake: bool,
    ) -> Option<Self> {
        free_cells(grid, snake, avoid_obstacles, avoid_snake)
            .choose(rng)
            .copied()
            .map(Self::new)
    }
}

fn free_cells(grid: &Grid, snake: &Snake, avoid_obstacles: bool, avoid_snake: bool) -> Vec<Position> {
    let bounds = grid.size();
    let mut candidates = Vec::new();

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if avoid_obstacles && grid.is_obstacle(position) {
                continue;
            }
            if avoid_snake && snake.occupies(position) {
                continue;
            }
            candidates.push(position);
        }
    }

    candidates
}
