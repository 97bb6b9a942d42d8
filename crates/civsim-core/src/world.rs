//! Food grid - dense occupancy array over the simulation plane.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Row-major grid of food units, indexed `[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl FoodGrid {
    /// Grid with no food anywhere.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major cells.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Flat index of an in-bounds cell.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Food at a cell (0 when out of bounds).
    pub fn food_at(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(0, |i| self.cells[i])
    }

    /// Set a cell's food quantity; out-of-bounds writes are ignored.
    pub fn set_food(&mut self, x: i32, y: i32, amount: u8) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = amount;
        }
    }

    /// Empty a cell.
    pub fn clear(&mut self, x: i32, y: i32) {
        self.set_food(x, y, 0);
    }

    /// Empty every listed flat index.
    pub fn clear_indices(&mut self, indices: &[usize]) {
        for &i in indices {
            if let Some(cell) = self.cells.get_mut(i) {
                *cell = 0;
            }
        }
    }

    /// Number of cells holding food.
    pub fn food_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Grow food on empty cells.
    ///
    /// One uniform draw per cell in row-major order, occupied or not, so the
    /// number of draws per tick depends only on the grid size.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, spawn_prob: f32, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            let spawn = rng.gen::<f32>() < spawn_prob;
            if *cell == 0 && spawn {
                *cell = 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = FoodGrid::new(4, 3);
        assert_eq!(grid.cells().len(), 12);
        assert_eq!(grid.food_count(), 0);
    }

    #[test]
    fn test_row_major_indexing() {
        let mut grid = FoodGrid::new(4, 3);
        grid.set_food(3, 1, 1);
        assert_eq!(grid.index(3, 1), Some(7));
        assert_eq!(grid.cells()[7], 1);
        assert_eq!(grid.food_at(3, 1), 1);
        assert_eq!(grid.food_at(1, 3), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = FoodGrid::new(2, 2);
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(0, 2), None);
        grid.set_food(5, 5, 1);
        assert_eq!(grid.food_count(), 0);
    }

    #[test]
    fn test_regenerate_probability_extremes() {
        let mut rng = create_rng(9);
        let mut grid = FoodGrid::new(10, 10);
        grid.regenerate(0.0, &mut rng);
        assert_eq!(grid.food_count(), 0);
        grid.regenerate(1.0, &mut rng);
        assert_eq!(grid.food_count(), 100);
        assert!(grid.cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn test_regenerate_keeps_existing_food() {
        let mut rng = create_rng(2);
        let mut grid = FoodGrid::new(3, 3);
        grid.set_food(1, 1, 3);
        grid.regenerate(0.5, &mut rng);
        assert_eq!(grid.food_at(1, 1), 3);
    }

    #[test]
    fn test_regenerate_rate() {
        let mut rng = create_rng(11);
        let mut grid = FoodGrid::new(100, 100);
        grid.regenerate(0.2, &mut rng);
        let frac = grid.food_count() as f32 / 10_000.0;
        assert!((frac - 0.2).abs() < 0.02, "spawned fraction {frac}");
    }

    #[test]
    fn test_clear() {
        let mut grid = FoodGrid::new(3, 3);
        grid.set_food(0, 0, 1);
        grid.set_food(2, 2, 1);
        grid.clear(0, 0);
        grid.clear_indices(&[8, 100]);
        assert_eq!(grid.food_count(), 0);
    }
}
