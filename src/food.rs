use std::collections::HashSet;

use rand::Rng;

use crate::grid::{Cell, GridSpace};

/// The single food item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FoodState {
    position: Cell,
}

impl FoodState {
    /// Places food at a fixed cell.
    #[must_use]
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    /// Spawns food on a random cell outside `forbidden`.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, grid: GridSpace, forbidden: &HashSet<Cell>) -> Self {
        Self {
            position: draw_free_cell(rng, grid, forbidden),
        }
    }

    /// Moves the food to a random cell outside `forbidden`.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid: GridSpace,
        forbidden: &HashSet<Cell>,
    ) {
        self.position = draw_free_cell(rng, grid, forbidden);
    }

    #[must_use]
    pub fn position(&self) -> Cell {
        self.position
    }
}

/// Rejection-samples a uniformly random cell until it is not forbidden.
///
/// # Panics
///
/// Panics when `forbidden` covers every cell of the grid.
fn draw_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSpace,
    forbidden: &HashSet<Cell>,
) -> Cell {
    let blocked = forbidden.iter().filter(|cell| grid.contains(**cell)).count();
    assert!(
        blocked < grid.total_cells(),
        "no free cells on the board ({}x{})",
        grid.width(),
        grid.height(),
    );

    loop {
        let candidate = Cell::new(
            rng.gen_range(0..i32::from(grid.width())),
            rng.gen_range(0..i32::from(grid.height())),
        );
        if !forbidden.contains(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::grid::{Cell, GridSpace};

    use super::FoodState;

    #[test]
    fn food_spawn_never_overlaps_forbidden_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridSpace::new(8, 6, 20);
        let forbidden: HashSet<Cell> = [Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
            .into_iter()
            .collect();

        let mut food = FoodState::spawn(&mut rng, grid, &forbidden);
        for _ in 0..100 {
            assert!(grid.contains(food.position()));
            assert!(!forbidden.contains(&food.position()));
            food.randomize(&mut rng, grid, &forbidden);
        }
    }

    #[test]
    fn last_free_cell_is_eventually_found() {
        let mut rng = StdRng::seed_from_u64(99);
        let grid = GridSpace::new(5, 4, 20);
        let free = Cell::new(3, 2);
        let forbidden: HashSet<Cell> = grid.cells().filter(|cell| *cell != free).collect();

        let mut food = FoodState::at(Cell::new(0, 0));
        food.randomize(&mut rng, grid, &forbidden);

        assert_eq!(food.position(), free);
    }

    #[test]
    fn placement_covers_the_free_area() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = GridSpace::new(3, 3, 20);
        let forbidden: HashSet<Cell> = [Cell::new(1, 1)].into_iter().collect();
        let mut food = FoodState::at(Cell::new(0, 0));

        let mut seen = HashSet::new();
        for _ in 0..500 {
            food.randomize(&mut rng, grid, &forbidden);
            seen.insert(food.position());
        }

        assert_eq!(seen.len(), 8);
    }

    #[test]
    #[should_panic(expected = "no free cells")]
    fn full_board_is_a_precondition_violation() {
        let mut rng = StdRng::seed_from_u64(2);
        let grid = GridSpace::new(2, 2, 20);
        let forbidden: HashSet<Cell> = grid.cells().collect();

        let _ = FoodState::spawn(&mut rng, grid, &forbidden);
    }
}
