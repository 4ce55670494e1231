//! Rules module for Conway's Game of Life simulation
//!
//! This module contains the cell state representation and the rule that
//! maps a cell and its alive-neighbor count to the next generation.

#[cfg(test)]
pub mod patterns;

/// Game of Life standard rules:
/// 1. Any live cell with fewer than two live neighbors dies (underpopulation)
/// 2. Any live cell with two or three live neighbors lives (survival)
/// 3. Any live cell with more than three live neighbors dies (overpopulation)
/// 4. Any dead cell with exactly three live neighbors becomes alive (reproduction)
pub const SURVIVAL_MIN: u32 = 2;
pub const SURVIVAL_MAX: u32 = 3;
pub const BIRTH_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }

    pub fn toggled(self) -> Self {
        match self {
            CellState::Dead => CellState::Alive,
            CellState::Alive => CellState::Dead,
        }
    }
}

/// Next-generation state of one cell. Pure; callers must pass a neighbor
/// count read from the current generation, never from a partially advanced one.
pub fn next_state(current: CellState, alive_neighbors: u32) -> CellState {
    match current {
        CellState::Alive if (SURVIVAL_MIN..=SURVIVAL_MAX).contains(&alive_neighbors) => {
            CellState::Alive
        }
        CellState::Dead if alive_neighbors == BIRTH_COUNT => CellState::Alive,
        _ => CellState::Dead,
    }
}
