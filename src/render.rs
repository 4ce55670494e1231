use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;
use wgpu;

use crate::grid::Cell;
use crate::state::Mode;

// The alive-cell gradient spans this many pixels on each axis
pub const GRADIENT_EXTENT: [f32; 2] = [800.0, 800.0];
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };

/// How a single cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Dead,
    Alive,
    /// Under the pointer; wins over dead/alive
    Hovered,
}

impl RenderState {
    pub fn shader_code(self) -> u32 {
        match self {
            RenderState::Dead => 0,
            RenderState::Alive => 1,
            RenderState::Hovered => 2,
        }
    }
}

impl From<&Cell> for RenderState {
    fn from(cell: &Cell) -> Self {
        if cell.hovered {
            RenderState::Hovered
        } else if cell.state.is_alive() {
            RenderState::Alive
        } else {
            RenderState::Dead
        }
    }
}

/// Drawing backend used by the simulation; it receives geometry and state only.
pub trait Renderer {
    type Error;

    fn begin_frame(&mut self);
    fn draw_cell(&mut self, pixel_x: f32, pixel_y: f32, width: f32, height: f32, state: RenderState);
    fn end_frame(&mut self) -> Result<(), Self::Error>;

    /// Status for the overlay drawn with the next frame. Renderers without
    /// an overlay ignore it.
    fn set_status(&mut self, _status: HudStatus) {}
}

/// What the status overlay shows
#[derive(Debug, Clone, PartialEq)]
pub struct HudStatus {
    pub mode: Mode,
    pub generation: u64,
    pub live_cells: usize,
    pub grid_size: (usize, usize),
    pub simulate_key: char,
}

// Per-instance vertex data, one quad per cell
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CellInstance {
    pub offset: [f32; 2],
    pub size: [f32; 2],
    pub state: u32,
    pub _padding: u32,
}

impl CellInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Uint32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CellInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// Uniforms specific to rendering
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ViewParams {
    pub viewport: [f32; 2],
    pub gradient_extent: [f32; 2],
}

pub fn create_view_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("View Bind Group Layout"),
        entries: &[
            // ViewParams Uniform (Binding 0)
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ViewParams>() as u64),
                },
                count: None,
            },
        ],
    })
}

pub fn create_view_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view_param_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("View Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: view_param_buffer.as_entire_binding() },
        ],
    })
}

pub fn draw_hud(ctx: &egui::Context, hud: &HudStatus) {
    egui::Area::new(egui::Id::new("status_area"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(5.0, 5.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_rgba_unmultiplied(25, 25, 25, 180))
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.colored_label(egui::Color32::WHITE, format!("Mode: {}", hud.mode));
                    ui.colored_label(egui::Color32::WHITE, format!("Generation: {}", hud.generation));
                    ui.colored_label(egui::Color32::WHITE, format!("Live Cells: {}", hud.live_cells));
                    ui.colored_label(
                        egui::Color32::WHITE,
                        format!("Grid: {}x{}", hud.grid_size.0, hud.grid_size.1),
                    );
                    if hud.mode == Mode::Edit {
                        ui.colored_label(
                            egui::Color32::LIGHT_GRAY,
                            format!("Drag to paint, '{}' to simulate, Esc to quit", hud.simulate_key),
                        );
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridDimensions;
    use crate::grid::Grid;

    #[test]
    fn hovered_wins_over_alive() {
        let mut grid = Grid::new(&GridDimensions { width: 3, height: 3, cell_width: 4, cell_height: 4 });
        grid.toggle(2, 2).unwrap();
        assert_eq!(RenderState::from(grid.at(2, 2).unwrap()), RenderState::Alive);
        assert_eq!(RenderState::from(grid.at(1, 1).unwrap()), RenderState::Dead);

        let idx = grid.index(2, 2).unwrap();
        grid.set_hovered(idx, true);
        assert_eq!(RenderState::from(grid.at(2, 2).unwrap()), RenderState::Hovered);
    }

    #[test]
    fn shader_codes_are_distinct() {
        let codes = [RenderState::Dead, RenderState::Alive, RenderState::Hovered].map(RenderState::shader_code);
        assert_eq!(codes, [0, 1, 2]);
    }

    #[test]
    fn instance_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<CellInstance>(), 24);
        assert_eq!(std::mem::size_of::<ViewParams>(), 16);
        assert_eq!(CellInstance::layout().array_stride, 24);
    }
}
