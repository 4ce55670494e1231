use crate::grid::{Grid, GridError};
use crate::input::{Action, InputEvent, InputTranslator};
use crate::pacer::Pacer;
use crate::render::{HudStatus, RenderState, Renderer};
use std::fmt;
use std::time::Instant;

/// Interaction mode. Starts in `Edit`; once switched to `Simulate` it stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Edit,
    Simulate,
}

impl Mode {
    /// Transition taken on a mode-switch request
    pub fn on_switch_requested(self) -> Mode {
        match self {
            Mode::Edit => Mode::Simulate,
            Mode::Simulate => Mode::Simulate,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Edit => write!(f, "Edit"),
            Mode::Simulate => write!(f, "Simulate"),
        }
    }
}

/// Pointer bookkeeping, all in linear grid indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerTracking {
    pub previous_cell: Option<usize>,
    pub current_cell: Option<usize>,
    pub button_down: bool,
    // Suppresses repeated toggles while the button stays down over one cell
    pub last_toggled_cell: Option<usize>,
}

/// Everything the main loop mutates: grid, mode and pointer state
pub struct SimulationState {
    grid: Grid,
    mode: Mode,
    pointer: PointerTracking,
    pacer: Pacer,
    generation: u64,
    quit_requested: bool,
}

impl SimulationState {
    pub fn new(grid: Grid, pacer: Pacer) -> Self {
        Self {
            grid,
            mode: Mode::default(),
            pointer: PointerTracking::default(),
            pacer,
            generation: 0,
            quit_requested: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pointer(&self) -> PointerTracking {
        self.pointer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn status(&self, simulate_key: char) -> HudStatus {
        HudStatus {
            mode: self.mode,
            generation: self.generation,
            live_cells: self.grid.live_count(),
            grid_size: (self.grid.width(), self.grid.height()),
            simulate_key,
        }
    }

    /// Apply one translated input action. Hover tracking runs in every mode.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::PointerMoved(index) => {
                if let Some(previous) = self.pointer.current_cell {
                    self.grid.set_hovered(previous, false);
                }
                self.pointer.previous_cell = self.pointer.current_cell;
                self.pointer.current_cell = Some(index);
                self.grid.set_hovered(index, true);
            }
            Action::ButtonDown => {
                self.pointer.button_down = true;
                // A fresh press always toggles, even over the last toggled cell
                self.pointer.last_toggled_cell = None;
            }
            Action::ButtonUp => self.pointer.button_down = false,
            Action::ModeSwitchRequested => {
                let next = self.mode.on_switch_requested();
                if next != self.mode {
                    log::info!("Switching from {} to {} mode", self.mode, next);
                    self.mode = next;
                } else {
                    log::debug!("Already in {} mode", self.mode);
                }
            }
            Action::QuitRequested => {
                log::info!("Quit requested");
                self.quit_requested = true;
            }
        }
    }

    /// One loop iteration: apply every queued event, then run exactly one frame.
    ///
    /// A quit request among the events does not cut the frame short; callers
    /// check [`quit_requested`](Self::quit_requested) once this returns.
    pub fn process_frame<R, I>(
        &mut self,
        translator: &InputTranslator,
        events: I,
        renderer: &mut R,
    ) -> Result<(), R::Error>
    where
        R: Renderer + ?Sized,
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            if let Some(action) = translator.translate(event) {
                self.apply(action);
            }
        }

        // Overlay shows the state going into this frame
        renderer.set_status(self.status(translator.simulate_key()));
        self.frame(renderer)
    }

    /// Run one frame: the mode's work followed by drawing the grid
    pub fn frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        self.step();
        self.render(renderer)
    }

    /// The mode's per-frame work: paint under the pointer, or advance one paced generation
    fn step(&mut self) {
        match self.mode {
            Mode::Edit => self.edit(),
            Mode::Simulate => self.simulate(),
        }
    }

    fn edit(&mut self) {
        if !self.pointer.button_down {
            return;
        }
        let Some(current) = self.pointer.current_cell else {
            return;
        };
        if self.pointer.last_toggled_cell != Some(current) {
            if let Err(e) = self.toggle_index(current) {
                log::debug!("Not toggling: {}", e);
            }
        }
        self.pointer.last_toggled_cell = Some(current);
    }

    fn toggle_index(&mut self, index: usize) -> Result<(), GridError> {
        let (x, y) = self.grid.coords(index)?;
        let state = self.grid.toggle(x, y)?;
        log::trace!("Cell ({}, {}) is now {:?}", x, y, state);
        Ok(())
    }

    fn simulate(&mut self) {
        let started = Instant::now();
        self.grid.advance_generation();
        self.generation += 1;
        self.pacer.pace(started);
    }

    /// Draw every interior cell at its committed state
    fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), R::Error> {
        let [width, height] = self.grid.cell_size();
        renderer.begin_frame();
        for cell in self.grid.interior_cells() {
            let [x, y] = cell.pixel_offset();
            renderer.draw_cell(x, y, width, height, RenderState::from(cell));
        }
        renderer.end_frame()
    }
}
