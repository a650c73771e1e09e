use rand::Rng;

use crate::config::GridSize;
use crate::snake::Position;

/// Contents of one board cell.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Tile {
    #[default]
    Empty,
    Obstacle,
}

/// Fixed-size board stored row-major in one contiguous buffer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Grid {
    size: GridSize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid with every cell empty.
    #[must_use]
    pub fn empty(size: GridSize) -> Self {
        Self {
            size,
            tiles: vec![Tile::Empty; size.total_cells()],
        }
    }

    /// Seeds every cell independently: obstacle with `obstacle_probability`,
    /// otherwise empty.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(size: GridSize, obstacle_probability: f64, rng: &mut R) -> Self {
        let tiles = (0..size.total_cells())
            .map(|_| {
                if rng.gen_bool(obstacle_probability) {
                    Tile::Obstacle
                } else {
                    Tile::Empty
                }
            })
            .collect();

        Self { size, tiles }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the tile at `(row, col)`. Callers keep both inside the grid.
    #[must_use]
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        self.tiles[self.index(row, col)]
    }

    /// Overwrites the tile at `(row, col)`. Callers keep both inside the grid.
    pub fn set_tile_at(&mut self, row: usize, col: usize, tile: Tile) {
        let index = self.index(row, col);
        self.tiles[index] = tile;
    }

    /// Tile under a position that is already wrapped into bounds.
    #[must_use]
    pub fn tile_at_position(&self, position: Position) -> Tile {
        debug_assert!(position.is_within_bounds(self.size));
        self.tile_at(position.y as usize, position.x as usize)
    }

    #[must_use]
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.tile_at_position(position) == Tile::Obstacle
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| **tile == Tile::Obstacle)
            .count()
    }

    /// Iterates rows top to bottom, each as a slice of tiles left to right.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(usize::from(self.size.width))
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < usize::from(self.size.height));
        debug_assert!(col < usize::from(self.size.width));
        row * usize::from(self.size.width) + col
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{Grid, Tile};
    use crate::config::GridSize;
    use crate::snake::Position;

    const SIZE: GridSize = GridSize {
        width: 16,
        height: 12,
    };

    #[test]
    fn generated_grid_has_one_tile_per_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = Grid::generate(SIZE, 0.04, &mut rng);

        assert_eq!(grid.rows().count(), 12);
        assert!(grid.rows().all(|row| row.len() == 16));
    }

    #[test]
    fn probability_extremes_fill_or_clear_the_board() {
        let mut rng = StdRng::seed_from_u64(5);

        let clear = Grid::generate(SIZE, 0.0, &mut rng);
        assert_eq!(clear.obstacle_count(), 0);

        let walled = Grid::generate(SIZE, 1.0, &mut rng);
        assert_eq!(walled.obstacle_count(), SIZE.total_cells());
    }

    #[test]
    fn same_seed_generates_same_grid() {
        let first = Grid::generate(SIZE, 0.3, &mut StdRng::seed_from_u64(99));
        let second = Grid::generate(SIZE, 0.3, &mut StdRng::seed_from_u64(99));

        assert_eq!(first, second);
    }

    #[test]
    fn tiles_are_addressed_row_major() {
        let mut grid = Grid::empty(SIZE);
        grid.set_tile_at(2, 5, Tile::Obstacle);

        assert_eq!(grid.tile_at(2, 5), Tile::Obstacle);
        assert_eq!(grid.tile_at(5, 2), Tile::Empty);
        assert!(grid.is_obstacle(Position { x: 5, y: 2 }));
        assert_eq!(grid.rows().nth(2).map(|row| row[5]), Some(Tile::Obstacle));
        assert_eq!(grid.obstacle_count(), 1);
    }
}
