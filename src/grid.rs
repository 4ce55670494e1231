//! Cell grid with a one-cell ghost border.
//!
//! The playable area spans `x in 1..=width`, `y in 1..=height`. Row and
//! column 0 and `width + 1` / `height + 1` are permanently dead padding so
//! that every interior cell can read its eight neighbors without bounds
//! checks. Edges therefore behave as if surrounded by dead cells; nothing
//! wraps around.

use crate::config::GridDimensions;
use crate::rules::{next_state, CellState};

/// Moore neighborhood offsets, excluding the center
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    x: usize,
    y: usize,
    pixel: [f32; 2],
    pub state: CellState,
    pub hovered: bool,
}

impl Cell {
    /// Grid coordinates, border included
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Top-left corner in window pixels
    pub fn pixel_offset(&self) -> [f32; 2] {
        self.pixel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Coordinates outside the array, border included
    OutOfRange { x: usize, y: usize },
    /// Coordinates on the ghost border, which only ever holds dead cells
    Border { x: usize, y: usize },
    /// Linear index past the end of the array
    IndexOutOfRange { index: usize },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfRange { x, y } => write!(f, "cell ({}, {}) is outside the grid", x, y),
            GridError::Border { x, y } => write!(f, "cell ({}, {}) is a border cell", x, y),
            GridError::IndexOutOfRange { index } => {
                write!(f, "cell index {} is outside the grid", index)
            }
        }
    }
}

impl std::error::Error for GridError {}

pub struct Grid {
    width: usize,
    height: usize,
    stride: usize,
    cell_size: [f32; 2],
    cells: Vec<Cell>,
    // Next generation is written here in full before any cell is committed
    next: Vec<CellState>,
}

impl Grid {
    pub fn new(dims: &GridDimensions) -> Self {
        let stride = dims.width + 2;
        let rows = dims.height + 2;
        let cell_size = [dims.cell_width as f32, dims.cell_height as f32];

        let cells = (0..rows)
            .flat_map(|y| (0..stride).map(move |x| (x, y)))
            .map(|(x, y)| Cell {
                x,
                y,
                pixel: [
                    (x as f32 - 1.0) * cell_size[0],
                    (y as f32 - 1.0) * cell_size[1],
                ],
                state: CellState::Dead,
                hovered: false,
            })
            .collect::<Vec<_>>();

        log::debug!("Allocated {}x{} grid ({} cells with border)", dims.width, dims.height, cells.len());

        Self {
            width: dims.width,
            height: dims.height,
            stride,
            cell_size,
            next: vec![CellState::Dead; cells.len()],
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell size in pixels
    pub fn cell_size(&self) -> [f32; 2] {
        self.cell_size
    }

    /// Linear index of `(x, y)`, border included
    pub fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x > self.width + 1 || y > self.height + 1 {
            return Err(GridError::OutOfRange { x, y });
        }
        Ok(y * self.stride + x)
    }

    pub fn coords(&self, index: usize) -> Result<(usize, usize), GridError> {
        if index >= self.cells.len() {
            return Err(GridError::IndexOutOfRange { index });
        }
        Ok((index % self.stride, index / self.stride))
    }

    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        (1..=self.width).contains(&x) && (1..=self.height).contains(&y)
    }

    pub fn at(&self, x: usize, y: usize) -> Result<&Cell, GridError> {
        let idx = self.index(x, y)?;
        Ok(&self.cells[idx])
    }

    /// Mutable access to an interior cell. The border is read-only so it can
    /// never be brought to life through this handle.
    pub fn at_mut(&mut self, x: usize, y: usize) -> Result<&mut Cell, GridError> {
        let idx = self.interior_index(x, y)?;
        Ok(&mut self.cells[idx])
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// State at `(x, y)`; panics outside the array
    pub fn state(&self, x: usize, y: usize) -> CellState {
        match self.index(x, y) {
            Ok(idx) => self.cells[idx].state,
            Err(e) => panic!("grid invariant violated: {}", e),
        }
    }

    /// Set an interior cell; the border rejects writes
    pub fn set(&mut self, x: usize, y: usize, state: CellState) -> Result<(), GridError> {
        self.at_mut(x, y)?.state = state;
        Ok(())
    }

    /// Flip an interior cell between dead and alive, returning the new state
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<CellState, GridError> {
        let cell = self.at_mut(x, y)?;
        cell.state = cell.state.toggled();
        Ok(cell.state)
    }

    pub fn set_hovered(&mut self, index: usize, hovered: bool) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.hovered = hovered;
        }
    }

    /// Kill every interior cell
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.state = CellState::Dead;
        }
    }

    /// Number of alive cells among the eight neighbors of an interior cell.
    ///
    /// Panics when called on a border cell: the rule path only ever visits
    /// the interior, so a border center means a bug upstream.
    pub fn alive_neighbor_count(&self, x: usize, y: usize) -> u32 {
        assert!(
            self.is_interior(x, y),
            "neighbor count requested for non-interior cell ({}, {})",
            x,
            y
        );
        let center = y * self.stride + x;
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| {
                let offset = dy * self.stride as isize + dx;
                self.cells[(center as isize + offset) as usize].state
            })
            .filter(|state| state.is_alive())
            .count() as u32
    }

    /// Advance every interior cell by one generation.
    ///
    /// All next states are computed from the current generation first and
    /// committed afterwards, so no cell ever sees a neighbor that has
    /// already moved on.
    pub fn advance_generation(&mut self) {
        for y in 1..=self.height {
            for x in 1..=self.width {
                let idx = y * self.stride + x;
                let state = next_state(self.cells[idx].state, self.alive_neighbor_count(x, y));
                self.next[idx] = state;
            }
        }

        for y in 1..=self.height {
            let row = y * self.stride;
            for idx in row + 1..=row + self.width {
                self.cells[idx].state = self.next[idx];
            }
        }
    }

    /// Interior coordinates, row-major
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let width = self.width;
        (1..=self.height).flat_map(move |y| (1..=width).map(move |x| (x, y)))
    }

    pub fn interior_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.interior().map(move |(x, y)| &self.cells[y * self.stride + x])
    }

    /// Border coordinates, each visited once
    pub fn border(&self) -> impl Iterator<Item = (usize, usize)> {
        let (width, height) = (self.width, self.height);
        (0..height + 2)
            .flat_map(move |y| (0..width + 2).map(move |x| (x, y)))
            .filter(move |&(x, y)| x == 0 || y == 0 || x == width + 1 || y == height + 1)
    }

    pub fn live_count(&self) -> usize {
        self.interior_cells().filter(|cell| cell.state.is_alive()).count()
    }

    fn interior_index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        let idx = self.index(x, y)?;
        if !self.is_interior(x, y) {
            return Err(GridError::Border { x, y });
        }
        Ok(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::patterns::{alive_cells, place_pattern_on_grid, Pattern};

    fn grid(width: usize, height: usize) -> Grid {
        Grid::new(&GridDimensions { width, height, cell_width: 10, cell_height: 10 })
    }

    fn assert_border_dead(grid: &Grid) {
        for (x, y) in grid.border() {
            assert_eq!(grid.state(x, y), CellState::Dead, "border cell ({}, {}) came alive", x, y);
        }
    }

    #[test]
    fn new_grid_is_dead_with_border() {
        let g = grid(4, 3);
        assert_eq!(g.interior().count(), 12);
        assert_eq!(g.border().count(), 6 * 5 - 12);
        assert_eq!(g.live_count(), 0);
        assert_border_dead(&g);
    }

    #[test]
    fn positions_are_unique_and_pixel_offsets_follow_cell_size() {
        let g = grid(3, 2);
        let cell = g.at(1, 1).unwrap();
        assert_eq!(cell.position(), (1, 1));
        assert_eq!(cell.pixel_offset(), [0.0, 0.0]);

        let cell = g.at(3, 2).unwrap();
        assert_eq!(cell.position(), (3, 2));
        assert_eq!(cell.pixel_offset(), [20.0, 10.0]);

        let mut seen: Vec<_> = (0..5 * 4).map(|i| g.cell(i).unwrap().position()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn at_accepts_border_and_rejects_outside() {
        let g = grid(4, 3);
        assert!(g.at(0, 0).is_ok());
        assert!(g.at(5, 4).is_ok());
        assert_eq!(g.at(6, 0).unwrap_err(), GridError::OutOfRange { x: 6, y: 0 });
        assert_eq!(g.at(0, 5).unwrap_err(), GridError::OutOfRange { x: 0, y: 5 });
    }

    #[test]
    fn index_and_coords_agree() {
        let g = grid(4, 3);
        for (x, y) in g.interior().chain(g.border()) {
            let idx = g.index(x, y).unwrap();
            assert_eq!(g.coords(idx), Ok((x, y)));
        }
        assert_eq!(g.coords(6 * 5), Err(GridError::IndexOutOfRange { index: 30 }));
    }

    #[test]
    fn at_mut_reaches_interior_only() {
        let mut g = grid(4, 3);
        g.at_mut(2, 3).unwrap().state = CellState::Alive;
        assert_eq!(g.state(2, 3), CellState::Alive);

        assert_eq!(g.at_mut(0, 1).unwrap_err(), GridError::Border { x: 0, y: 1 });
        assert_eq!(g.at_mut(4, 4).unwrap_err(), GridError::Border { x: 4, y: 4 });
        assert_eq!(g.at_mut(7, 1).unwrap_err(), GridError::OutOfRange { x: 7, y: 1 });
        assert_border_dead(&g);
    }

    #[test]
    fn toggle_flips_interior_and_rejects_border() {
        let mut g = grid(4, 3);
        assert_eq!(g.toggle(2, 2), Ok(CellState::Alive));
        assert_eq!(g.state(2, 2), CellState::Alive);
        assert_eq!(g.toggle(2, 2), Ok(CellState::Dead));

        assert_eq!(g.toggle(0, 2), Err(GridError::Border { x: 0, y: 2 }));
        assert_eq!(g.toggle(5, 4), Err(GridError::Border { x: 5, y: 4 }));
        assert_eq!(g.toggle(9, 9), Err(GridError::OutOfRange { x: 9, y: 9 }));
        assert_border_dead(&g);
    }

    #[test]
    fn reset_kills_everything() {
        let mut g = grid(5, 5);
        place_pattern_on_grid(&mut g, Pattern::Glider, 1, 1);
        assert_eq!(g.live_count(), 5);
        g.reset();
        assert_eq!(g.live_count(), 0);
    }

    #[test]
    fn neighbor_count_in_corner_sees_only_interior() {
        let mut g = grid(3, 3);
        for (x, y) in g.interior().collect::<Vec<_>>() {
            g.set(x, y, CellState::Alive).unwrap();
        }
        assert_eq!(g.alive_neighbor_count(1, 1), 3);
        assert_eq!(g.alive_neighbor_count(2, 1), 5);
        assert_eq!(g.alive_neighbor_count(2, 2), 8);
    }

    #[test]
    fn neighbor_count_excludes_center() {
        let mut g = grid(3, 3);
        g.set(2, 2, CellState::Alive).unwrap();
        assert_eq!(g.alive_neighbor_count(2, 2), 0);
        assert_eq!(g.alive_neighbor_count(1, 1), 1);
    }

    #[test]
    #[should_panic(expected = "non-interior")]
    fn neighbor_count_on_border_panics() {
        grid(3, 3).alive_neighbor_count(0, 1);
    }

    #[test]
    fn block_is_still_life() {
        let mut g = grid(6, 6);
        place_pattern_on_grid(&mut g, Pattern::Block, 2, 2);
        let before = alive_cells(&g);
        g.advance_generation();
        assert_eq!(alive_cells(&g), before);
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut g = grid(5, 5);
        place_pattern_on_grid(&mut g, Pattern::Blinker, 3, 3);
        let vertical = alive_cells(&g);
        assert_eq!(vertical, vec![(3, 2), (3, 3), (3, 4)]);

        g.advance_generation();
        assert_eq!(alive_cells(&g), vec![(2, 3), (3, 3), (4, 3)]);

        g.advance_generation();
        assert_eq!(alive_cells(&g), vertical);
    }

    #[test]
    fn toad_oscillates_with_period_two() {
        let mut g = grid(8, 8);
        place_pattern_on_grid(&mut g, Pattern::Toad, 4, 4);
        let start = alive_cells(&g);
        g.advance_generation();
        assert_ne!(alive_cells(&g), start);
        assert_eq!(g.live_count(), 6);
        g.advance_generation();
        assert_eq!(alive_cells(&g), start);
    }

    #[test]
    fn glider_translates_diagonally_after_four_generations() {
        let mut g = grid(10, 10);
        place_pattern_on_grid(&mut g, Pattern::Glider, 2, 2);
        let start = alive_cells(&g);
        for _ in 0..4 {
            g.advance_generation();
        }
        let shifted: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        let mut moved = alive_cells(&g);
        moved.sort_by_key(|&(x, y)| (y, x));
        let mut expected = shifted;
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(moved, expected);
    }

    #[test]
    fn advance_is_local() {
        let mut with_far_cell = grid(20, 20);
        let mut without = grid(20, 20);
        place_pattern_on_grid(&mut with_far_cell, Pattern::Blinker, 3, 3);
        place_pattern_on_grid(&mut without, Pattern::Blinker, 3, 3);
        with_far_cell.set(18, 18, CellState::Alive).unwrap();

        with_far_cell.advance_generation();
        without.advance_generation();

        for y in 1..=6 {
            for x in 1..=6 {
                assert_eq!(with_far_cell.state(x, y), without.state(x, y), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn border_stays_dead_when_pattern_touches_edge() {
        let mut g = grid(4, 4);
        for (x, y) in g.interior().collect::<Vec<_>>() {
            if x == 1 || y == 1 || x == 4 || y == 4 {
                g.toggle(x, y).unwrap();
            }
        }
        for _ in 0..10 {
            g.advance_generation();
            assert_border_dead(&g);
        }
    }

    #[test]
    fn edge_blinker_does_not_wrap() {
        let mut g = grid(5, 5);
        // Horizontal line along the top edge
        for x in 2..=4 {
            g.set(x, 1, CellState::Alive).unwrap();
        }
        g.advance_generation();
        // Only the downward half of the vertical phase fits
        assert_eq!(alive_cells(&g), vec![(3, 1), (3, 2)]);
        assert_eq!(g.state(3, 5), CellState::Dead);
    }

    #[test]
    fn hover_flag_is_independent_of_state() {
        let mut g = grid(3, 3);
        let idx = g.index(2, 2).unwrap();
        g.set_hovered(idx, true);
        assert!(g.at(2, 2).unwrap().hovered);
        assert_eq!(g.state(2, 2), CellState::Dead);
        g.advance_generation();
        assert!(g.at(2, 2).unwrap().hovered);
    }
}
