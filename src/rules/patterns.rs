use crate::grid::Grid;
use crate::rules::CellState;

/// Small well-known patterns used to exercise the rule and the grid
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// A period-2 oscillator, vertical phase
    Blinker,
    /// A period-2 oscillator
    Toad,
    /// A still life
    Block,
    /// A diagonal spaceship
    Glider,
}

impl Pattern {
    /// Get the cells for a pattern anchored at position (x, y)
    pub fn cells(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        match self {
            Pattern::Blinker => vec![
                (x, y - 1), (x, y), (x, y + 1)
            ],
            Pattern::Toad => vec![
                (x - 1, y), (x, y), (x + 1, y),
                (x - 2, y + 1), (x - 1, y + 1), (x, y + 1)
            ],
            Pattern::Block => vec![
                (x, y), (x + 1, y),
                (x, y + 1), (x + 1, y + 1)
            ],
            Pattern::Glider => vec![
                (x, y + 1),
                (x + 1, y + 2),
                (x + 2, y), (x + 2, y + 1), (x + 2, y + 2)
            ],
        }
    }
}

/// Place a pattern on the interior of a grid; panics if any cell lands on the border
pub fn place_pattern_on_grid(grid: &mut Grid, pattern: Pattern, x: usize, y: usize) {
    for (cell_x, cell_y) in pattern.cells(x, y) {
        grid.set(cell_x, cell_y, CellState::Alive)
            .expect("pattern must fit inside the playable area");
    }
}

/// Coordinates of every alive interior cell, row-major
pub fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
    grid.interior()
        .filter(|&(x, y)| grid.state(x, y).is_alive())
        .collect()
}
