use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Toroidal coordinate system: leaving one edge re-enters the opposite one.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSpace {
    width: u16,
    height: u16,
    cell_size: u16,
}

impl GridSpace {
    #[must_use]
    pub fn new(width: u16, height: u16, cell_size: u16) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cell_size,
        }
    }

    #[must_use]
    pub fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn cell_size(self) -> u16 {
        self.cell_size
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[must_use]
    pub fn center(self) -> Cell {
        Cell::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }

    /// Returns true when the cell lies inside the grid.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }

    /// Moves `cell` one step towards `direction`, wrapping on both axes.
    #[must_use]
    pub fn wrap(self, cell: Cell, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: wrap_axis(cell.x + dx, i32::from(self.width)),
            y: wrap_axis(cell.y + dy, i32::from(self.height)),
        }
    }

    /// Top-left pixel of the cell's square.
    #[must_use]
    pub fn to_pixels(self, cell: Cell) -> (i32, i32) {
        let size = i32::from(self.cell_size);
        (cell.x * size, cell.y * size)
    }

    /// Iterates over every cell, row by row.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    value.rem_euclid(upper_bound)
}
