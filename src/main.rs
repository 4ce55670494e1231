// Declare modules directly in the binary crate root
pub mod config;
pub mod gpu;
pub mod grid;
pub mod input;
pub mod pacer;
pub mod render;
pub mod rules;
pub mod state;

// Use types/functions from the declared modules
use crate::config::{Config, GridDimensions};
use crate::gpu::GpuRenderer;
use crate::grid::Grid;
use crate::input::{InputEvent, InputTranslator};
use crate::pacer::Pacer;
use crate::state::SimulationState;

use anyhow::Context as _;
use clap::Parser;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

async fn run(
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    config: Config,
    dims: GridDimensions,
    frame_budget: Duration,
) -> anyhow::Result<()> {
    let mut renderer = GpuRenderer::new(window, dims.width * dims.height).await?;
    let mut state = SimulationState::new(Grid::new(&dims), Pacer::new(frame_budget));
    let translator = InputTranslator::new(&dims, config.simulate_key);

    // Events polled from the window since the last frame
    let mut pending: Vec<InputEvent> = Vec::new();
    let fatal: Rc<RefCell<Option<wgpu::SurfaceError>>> = Rc::new(RefCell::new(None));
    let fatal_slot = fatal.clone();

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, ref event }
                if window_id == renderer.window.id() =>
            {
                renderer.handle_window_event(event);

                match event {
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(*new_size);
                    }
                    WindowEvent::RedrawRequested => {
                        match state.process_frame(&translator, pending.drain(..), &mut renderer) {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of GPU memory, shutting down.");
                                *fatal_slot.borrow_mut() = Some(wgpu::SurfaceError::OutOfMemory);
                                window_target.exit();
                                return;
                            }
                            Err(e) => {
                                // Lost/Outdated already reconfigured the surface
                                log::warn!("Skipping frame due to surface {:?}", e);
                            }
                        }

                        if state.quit_requested() {
                            log::info!("Exiting after {} generations.", state.generation());
                            window_target.exit();
                        }
                    }
                    other => {
                        if let Some(input) = input::from_window_event(other) {
                            pending.push(input);
                        }
                    }
                }
            }
            Event::AboutToWait => {
                renderer.window.request_redraw();
            }
            _ => (),
        }
    })?;

    let failure = fatal.borrow_mut().take();
    match failure {
        Some(e) => Err(e).context("Rendering failed"),
        None => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();
    let dims = config.validate().context("Invalid configuration")?;
    let frame_budget = config.frame_budget().context("Invalid configuration")?;
    log::info!(
        "Starting with a {}x{} grid of {}x{} px cells, at most {} generations/s",
        dims.width,
        dims.height,
        dims.cell_width,
        dims.cell_height,
        config.fps
    );

    let event_loop = EventLoop::new()?;

    let window = Arc::new(WindowBuilder::new()
        .with_title("Game Of Life")
        .with_inner_size(PhysicalSize::new(dims.window_width(), dims.window_height()))
        .with_resizable(false)
        .build(&event_loop)?);

    pollster::block_on(run(event_loop, window, config, dims, frame_budget))
}
