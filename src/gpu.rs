use crate::render::{
    create_view_bind_group, create_view_bind_group_layout, draw_hud, CellInstance, HudStatus,
    RenderState, Renderer, ViewParams, CLEAR_COLOR, GRADIENT_EXTENT,
};
use crate::state::Mode;
use anyhow::{anyhow, Context as _};
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, event::WindowEvent, window::Window};
use std::sync::Arc;

// GUI Imports
use egui_winit::State as EguiWinitState;
use egui_wgpu::Renderer as EguiWgpuRenderer;
use egui::Context as EguiContext;

/// wgpu-backed [`Renderer`]: cells are drawn as instanced quads, with the
/// egui status overlay composited on top in the same pass.
pub struct GpuRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub window: Arc<Window>,

    render_pipeline: wgpu::RenderPipeline,
    view_param_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<CellInstance>,

    // GUI state
    egui_ctx: EguiContext,
    egui_winit_state: EguiWinitState,
    egui_renderer: EguiWgpuRenderer,
    hud: HudStatus,
}

impl GpuRenderer {
    /// `capacity` is the number of cells drawn per frame
    pub async fn new(window: Arc<Window>, capacity: usize) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("Initializing wgpu...");

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or_else(|| anyhow!("Failed to find an appropriate adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are written as-is, so prefer a non-sRGB target
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let view_param_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("View Parameters"),
            contents: bytemuck::bytes_of(&view_params(&config)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let instance_capacity = capacity.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cell Instance Buffer"),
            size: (instance_capacity * std::mem::size_of::<CellInstance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cell Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("cells.wgsl").into()),
        });

        let view_bind_group_layout = create_view_bind_group_layout(&device);
        let view_bind_group = create_view_bind_group(&device, &view_bind_group_layout, &view_param_buffer);
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&view_bind_group_layout],
            push_constant_ranges: &[],
        });
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cell Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[CellInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(config.format.into())],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        log::info!("Initializing egui...");
        let egui_ctx = EguiContext::default();
        let egui_winit_state = EguiWinitState::new(egui_ctx.clone(), egui_ctx.viewport_id(), &*window, None, None);
        let egui_renderer = EguiWgpuRenderer::new(&device, config.format, None, 1);
        log::info!("egui initialized.");

        log::info!("wgpu initialized successfully ({:?}, {}x{}).", config.format, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            window,
            render_pipeline,
            view_param_buffer,
            view_bind_group,
            instance_buffer,
            instance_capacity,
            instances: Vec::with_capacity(instance_capacity),
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            hud: HudStatus {
                mode: Mode::Edit,
                generation: 0,
                live_cells: 0,
                grid_size: (0, 0),
                simulate_key: 'a',
            },
        })
    }

    /// Feed a window event to the overlay. The overlay is view-only, so the
    /// event is never withheld from the simulation.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        let _ = self.egui_winit_state.on_window_event(&self.window, event);
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure();
            log::info!("Reconfigured surface to: {}x{}", self.config.width, self.config.height);
        } else {
            log::warn!("Ignoring resize to zero dimensions: {}x{}", new_size.width, new_size.height);
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.queue.write_buffer(&self.view_param_buffer, 0, bytemuck::bytes_of(&view_params(&self.config)));
    }
}

fn view_params(config: &wgpu::SurfaceConfiguration) -> ViewParams {
    ViewParams {
        viewport: [config.width as f32, config.height as f32],
        gradient_extent: GRADIENT_EXTENT,
    }
}

impl Renderer for GpuRenderer {
    type Error = wgpu::SurfaceError;

    fn begin_frame(&mut self) {
        self.instances.clear();
    }

    fn draw_cell(&mut self, pixel_x: f32, pixel_y: f32, width: f32, height: f32, state: RenderState) {
        if self.instances.len() == self.instance_capacity {
            log::warn!("Dropping cell at ({}, {}): instance buffer full", pixel_x, pixel_y);
            return;
        }
        self.instances.push(CellInstance {
            offset: [pixel_x, pixel_y],
            size: [width, height],
            state: state.shader_code(),
            _padding: 0,
        });
    }

    fn end_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output_frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {:?}, reconfiguring...", e);
                self.reconfigure();
                return Err(e);
            }
            Err(e) => {
                log::error!("Failed to acquire next swap chain texture: {:?}", e);
                return Err(e);
            }
        };
        let output_view = output_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));

        // --- Egui Frame and UI Definition ---
        let raw_input = self.egui_winit_state.take_egui_input(&self.window);
        let hud = self.hud.clone();
        let full_output = self.egui_ctx.run(raw_input, |ctx| draw_hud(ctx, &hud));
        self.egui_winit_state.handle_platform_output(&self.window, full_output.platform_output);
        let paint_jobs = self.egui_ctx.tessellate(full_output.shapes, self.window.scale_factor() as f32);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let egui_commands = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cell Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &output_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.view_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..self.instances.len() as u32);

            // Overlay on top of the cells
            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output_frame.present();
        Ok(())
    }

    fn set_status(&mut self, hud: HudStatus) {
        self.hud = hud;
    }
}
