use crate::config::GridDimensions;
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{Key as WinitKey, NamedKey},
};

/// Keys the sandbox cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

/// Platform-neutral input, as polled from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMotion { x: f64, y: f64 },
    ButtonDown,
    ButtonUp,
    KeyPress(Key),
    Quit,
}

/// Discrete actions consumed by the simulation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pointer now over the cell with this linear grid index
    PointerMoved(usize),
    ButtonDown,
    ButtonUp,
    ModeSwitchRequested,
    QuitRequested,
}

/// Maps raw input events onto grid cells and actions
#[derive(Debug, Clone)]
pub struct InputTranslator {
    cell_size: [f64; 2],
    // Array extent including the ghost border
    columns: usize,
    rows: usize,
    simulate_key: char,
}

impl InputTranslator {
    pub fn new(dims: &GridDimensions, simulate_key: char) -> Self {
        Self {
            cell_size: [dims.cell_width as f64, dims.cell_height as f64],
            columns: dims.width + 2,
            rows: dims.height + 2,
            simulate_key: simulate_key.to_ascii_lowercase(),
        }
    }

    pub fn simulate_key(&self) -> char {
        self.simulate_key
    }

    /// Grid coordinates under a window pixel position.
    ///
    /// Column and row 0 are the border, so pixel 0 lands on cell 1.
    /// Positions that map outside the array yield `None`.
    pub fn cell_at(&self, px: f64, py: f64) -> Option<(usize, usize)> {
        let x = ((px + self.cell_size[0]) / self.cell_size[0]).floor();
        let y = ((py + self.cell_size[1]) / self.cell_size[1]).floor();
        if !(x >= 0.0 && y >= 0.0) || x >= self.columns as f64 || y >= self.rows as f64 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    pub fn translate(&self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::PointerMotion { x, y } => match self.cell_at(x, y) {
                Some((cx, cy)) => Some(Action::PointerMoved(cy * self.columns + cx)),
                None => {
                    log::debug!("Ignoring pointer outside the grid at ({:.1}, {:.1})", x, y);
                    None
                }
            },
            InputEvent::ButtonDown => Some(Action::ButtonDown),
            InputEvent::ButtonUp => Some(Action::ButtonUp),
            InputEvent::KeyPress(Key::Escape) | InputEvent::Quit => Some(Action::QuitRequested),
            InputEvent::KeyPress(Key::Char(c)) if c.to_ascii_lowercase() == self.simulate_key => {
                Some(Action::ModeSwitchRequested)
            }
            InputEvent::KeyPress(_) => None,
        }
    }
}

/// Convert a winit window event into an [`InputEvent`].
///
/// Only the left mouse button and fresh (non-repeat) key presses are kept.
pub fn from_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::Quit),
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMotion {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::MouseInput { state, button, .. } => button_event(*button, *state),
        WindowEvent::KeyboardInput { event, .. }
            if event.state == ElementState::Pressed && !event.repeat =>
        {
            key_from_winit(&event.logical_key).map(InputEvent::KeyPress)
        }
        _ => None,
    }
}

pub fn button_event(button: MouseButton, state: ElementState) -> Option<InputEvent> {
    match (button, state) {
        (MouseButton::Left, ElementState::Pressed) => Some(InputEvent::ButtonDown),
        (MouseButton::Left, ElementState::Released) => Some(InputEvent::ButtonUp),
        _ => None,
    }
}

pub fn key_from_winit(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Character(s) => s.chars().next().map(|c| Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}
