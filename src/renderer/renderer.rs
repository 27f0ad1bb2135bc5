// renderer/renderer.rs
use crate::error::{BackendError, ColorParseError, RenderError};
use crate::math::{hex_to_rgba, radians, Color, Viewport};
use crate::renderer::backend::{
    BlendFactor, Capability, ClearFlags, GpuBuffer, GraphicsBackend, IndexFormat, Texture, Topology,
};
use crate::renderer::primitives::UnitGeometry;
use crate::renderer::shaders::{DrawUniforms, ProgramKind, ShaderProgram};
use crate::renderer::state::{Background, BlendMode, DrawState, RectMode};
use crate::renderer::MatrixStack;
use crate::settings::RenderSettings;
use crate::time::{FrameStats, Instant};

use glam::{Mat4, Vec3};

/// Immediate-mode drawing on top of a [`GraphicsBackend`].
///
/// The renderer owns its backend, two shader programs and the unit geometry
/// buffers; all of them are released exactly once, either by an explicit
/// [`release`](Self::release) or on drop.
pub struct Renderer<B: GraphicsBackend> {
    backend: B,
    matrices: MatrixStack,
    projection: Mat4,
    state: DrawState,
    blend: Option<BlendMode>,
    stroke_weight: Option<f32>,
    depth_test: bool,
    flat: ShaderProgram,
    textured: ShaderProgram,
    geometry: UnitGeometry,
    width: u32,
    height: u32,
    settings: RenderSettings,
    frame: FrameStats,
    released: bool,
}

impl<B: GraphicsBackend> Renderer<B> {
    pub fn new(mut backend: B, settings: RenderSettings) -> Result<Self, RenderError> {
        let flat = ShaderProgram::compile(&mut backend, ProgramKind::Flat)?;
        let textured = match ShaderProgram::compile(&mut backend, ProgramKind::Textured) {
            Ok(program) => program,
            Err(err) => {
                discard_program(&mut backend, flat);
                return Err(err.into());
            }
        };
        let geometry = match UnitGeometry::build(&mut backend) {
            Ok(geometry) => geometry,
            Err(err) => {
                discard_program(&mut backend, textured);
                discard_program(&mut backend, flat);
                return Err(err.into());
            }
        };

        let resolution = settings.resolution;
        let mut renderer = Self {
            backend,
            matrices: MatrixStack::new(),
            projection: Mat4::IDENTITY,
            state: DrawState::default(),
            blend: None,
            stroke_weight: None,
            depth_test: false,
            flat,
            textured,
            geometry,
            width: resolution.width,
            height: resolution.height,
            settings,
            frame: FrameStats::new(),
            released: false,
        };
        renderer.resize(resolution.width, resolution.height);
        renderer.defaults();

        log::debug!(
            "renderer created at {}x{}",
            renderer.width,
            renderer.height
        );
        Ok(renderer)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.state
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.frame
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_size(self.width as f32, self.height as f32)
    }

    pub fn model_view(&self) -> Mat4 {
        self.matrices.current()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn stack_depth(&self) -> usize {
        self.matrices.depth()
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.backend.viewport(0, 0, width, height);
        self.perspective();
    }

    // --- matrices -------------------------------------------------------

    pub fn push_matrix(&mut self) {
        self.matrices.push();
    }

    pub fn pop_matrix(&mut self) {
        self.matrices.pop();
    }

    pub fn origin(&mut self) {
        self.matrices.origin();
    }

    pub fn transform(&mut self, m: Mat4) {
        self.matrices.transform(m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.matrices.translate(x, y, z);
    }

    pub fn translate_xy(&mut self, x: f32, y: f32) {
        self.matrices.translate(x, y, 0.0);
    }

    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.matrices.rotate(angle, axis);
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.matrices.rotate_x(angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.matrices.rotate_y(angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.matrices.rotate_z(angle);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.matrices.scale(x, y, z);
    }

    /// Scales x and y with z set to 0, flattening depth. Anything drawn in 3D
    /// should call [`scale`](Self::scale) with all three axes instead.
    pub fn scale_xy(&mut self, x: f32, y: f32) {
        self.matrices.scale(x, y, 0.0);
    }

    /// Replaces the projection matrix.
    pub fn projection(&mut self, m: Mat4) {
        self.projection = m;
    }

    /// Perspective projection in which pixel coordinates on the z = 0 plane
    /// cover the viewport exactly, origin top-left, y down.
    pub fn perspective(&mut self) {
        self.projection = self.perspective_matrix();
    }

    pub fn perspective_matrix(&self) -> Mat4 {
        let w = self.width as f32;
        let h = self.height.max(1) as f32;
        let fov = radians(self.settings.fov_y_degrees);
        let eye = (h * 0.5) / (fov * 0.5).tan();

        Mat4::perspective_rh_gl(fov, w / h, eye / 10.0, eye * 10.0)
            * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
            * Mat4::from_translation(Vec3::new(-w * 0.5, -h * 0.5, -eye))
    }

    /// Orthographic projection mapping pixels directly, origin top-left, y down.
    pub fn ortho(&mut self) {
        let depth = self.settings.ortho_depth;
        self.projection = Mat4::orthographic_rh_gl(
            0.0,
            self.width as f32,
            self.height as f32,
            0.0,
            -depth,
            depth,
        );
    }

    // --- draw state -----------------------------------------------------

    pub fn tint(&mut self, color: &str) -> Result<(), ColorParseError> {
        self.state.tint = *hex_to_rgba(color)?;
        Ok(())
    }

    pub fn fill(&mut self, color: &str) -> Result<(), ColorParseError> {
        self.state.fill = *hex_to_rgba(color)?;
        Ok(())
    }

    pub fn stroke(&mut self, color: &str) -> Result<(), ColorParseError> {
        self.state.stroke = *hex_to_rgba(color)?;
        Ok(())
    }

    pub fn tint_color(&mut self, color: Color) {
        self.state.tint = color;
    }

    pub fn fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    pub fn stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    /// Textures are drawn unmodulated and fully opaque.
    pub fn no_tint(&mut self) {
        self.state.tint = Color::WHITE;
    }

    pub fn no_fill(&mut self) {
        self.state.fill = self.state.fill.with_alpha(0.0);
    }

    pub fn no_stroke(&mut self) {
        self.state.stroke = self.state.stroke.with_alpha(0.0);
    }

    pub fn stroke_weight(&mut self, weight: f32) {
        if self.stroke_weight == Some(weight) {
            log::trace!("stroke weight {} unchanged", weight);
            return;
        }
        self.backend.line_width(weight);
        self.stroke_weight = Some(weight);
    }

    pub fn blend_mode(&mut self, mode: BlendMode) {
        if self.blend == Some(mode) {
            log::trace!("blend mode {:?} unchanged", mode);
            return;
        }
        match mode {
            BlendMode::Alpha => {
                self.backend.set_capability(Capability::Blend, true);
                self.backend
                    .blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
            }
            BlendMode::Additive => {
                self.backend.set_capability(Capability::Blend, true);
                self.backend.blend_func(BlendFactor::SrcAlpha, BlendFactor::One);
            }
            BlendMode::Disabled => self.backend.set_capability(Capability::Blend, false),
        }
        self.blend = Some(mode);
    }

    pub fn depth_test(&mut self, enabled: bool) {
        self.backend.set_capability(Capability::DepthTest, enabled);
        self.depth_test = enabled;
    }

    pub fn rect_mode(&mut self, mode: RectMode) {
        self.state.rect_mode = mode;
    }

    pub fn image_mode(&mut self, mode: RectMode) {
        self.state.image_mode = mode;
    }

    /// Starting state for a frame.
    pub fn defaults(&mut self) {
        self.blend_mode(BlendMode::Alpha);
        self.depth_test(false);
        self.state.tint = Color::WHITE;
        self.state.fill = Color::WHITE;
        self.state.stroke = Color::BLACK;
        self.stroke_weight(self.settings.stroke_weight);
    }

    /// Clears color and depth to the given background.
    pub fn background(&mut self, background: impl Into<Background>) -> Result<(), ColorParseError> {
        let color = background.into().resolve()?;
        self.backend.clear_color(color);
        self.backend.clear(ClearFlags::COLOR | ClearFlags::DEPTH);
        Ok(())
    }

    // --- primitives -----------------------------------------------------

    /// Draws a single triangle from a transient buffer. Slow; meant for
    /// debugging rather than bulk geometry.
    pub fn triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) -> Result<(), BackendError> {
        let stroke = self.state.stroke;
        let fill = self.state.fill;
        if !stroke.is_visible() && !fill.is_visible() {
            return Ok(());
        }

        let data = [v0.to_array(), v1.to_array(), v2.to_array()];
        let buffer = self
            .backend
            .create_vertex_buffer(bytemuck::cast_slice(&data[..]), 3)?;

        self.push_matrix();
        if stroke.is_visible() {
            self.flat_pass(buffer, stroke);
            self.draw_vertices(Topology::LineLoop, buffer.num_items);
        }
        if fill.is_visible() {
            self.flat_pass(buffer, fill);
            self.draw_vertices(Topology::TriangleStrip, buffer.num_items);
        }
        self.pop_matrix();

        self.release_transient(buffer);
        Ok(())
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let stroke = self.state.stroke;
        let fill = self.state.fill;
        let outline = self.geometry.rect_outline;
        let body = self.geometry.rect_positions;
        let (x, y) = self.state.rect_mode.corner(x, y, w, h);

        self.push_matrix();
        self.translate(x, y, 0.0);
        self.scale(w, h, 1.0);
        if stroke.is_visible() {
            self.flat_pass(outline, stroke);
            self.draw_vertices(Topology::LineStrip, outline.num_items);
        }
        if fill.is_visible() {
            self.flat_pass(body, fill);
            self.draw_vertices(Topology::TriangleStrip, body.num_items);
        }
        self.pop_matrix();
    }

    /// Draws `texture` on the unit rectangle. Nothing is drawn, outline
    /// included, while the tint is fully transparent. `size` defaults to the
    /// texture's own dimensions; `tex_coords` follow the rectangle's
    /// triangle-strip vertex order and default to the full texture.
    pub fn image(
        &mut self,
        texture: &Texture,
        x: f32,
        y: f32,
        size: Option<(f32, f32)>,
        tex_coords: Option<&[[f32; 2]; 4]>,
    ) -> Result<(), BackendError> {
        let stroke = self.state.stroke;
        let tint = self.state.tint;
        if !tint.is_visible() {
            return Ok(());
        }

        let (w, h) = size.unwrap_or((texture.width as f32, texture.height as f32));
        let (x, y) = self.state.image_mode.corner(x, y, w, h);
        let outline = self.geometry.rect_outline;
        let body = self.geometry.rect_positions;

        let custom_uv = tex_coords
            .map(|uv| {
                self.backend
                    .create_vertex_buffer(bytemuck::cast_slice(uv.as_slice()), 2)
            })
            .transpose()?;
        let uv = custom_uv.unwrap_or(self.geometry.rect_tex_coords);

        self.push_matrix();
        self.translate(x, y, 0.0);
        self.scale(w, h, 1.0);
        if stroke.is_visible() {
            self.flat_pass(outline, stroke);
            self.draw_vertices(Topology::LineStrip, outline.num_items);
        }
        self.textured_pass(body, uv, texture, tint);
        self.draw_vertices(Topology::TriangleStrip, body.num_items);
        self.pop_matrix();

        if let Some(buffer) = custom_uv {
            self.release_transient(buffer);
        }
        Ok(())
    }

    /// Draws the unit cube scaled to `w x h x d`. With a texture the body is
    /// textured and gated on tint, otherwise it is flat and gated on fill.
    pub fn draw_box(&mut self, w: f32, h: f32, d: f32, texture: Option<&Texture>) {
        let stroke = self.state.stroke;
        let positions = self.geometry.cube_positions;
        let outline = self.geometry.cube_outline;
        let indices = self.geometry.cube_indices;

        self.push_matrix();
        self.scale(w, h, d);
        if stroke.is_visible() {
            self.flat_pass(positions, stroke);
            self.draw_indexed_vertices(Topology::Lines, &outline);
        }
        match texture {
            Some(texture) => {
                let tint = self.state.tint;
                if tint.is_visible() {
                    let uv = self.geometry.cube_tex_coords;
                    self.textured_pass(positions, uv, texture, tint);
                    self.draw_indexed_vertices(Topology::Triangles, &indices);
                }
            }
            None => {
                let fill = self.state.fill;
                if fill.is_visible() {
                    self.flat_pass(positions, fill);
                    self.draw_indexed_vertices(Topology::Triangles, &indices);
                }
            }
        }
        self.pop_matrix();
    }

    pub fn draw_vertices(&mut self, topology: Topology, count: u32) {
        self.backend.draw_arrays(topology, 0, count);
    }

    pub fn draw_indexed_vertices(&mut self, topology: Topology, indices: &GpuBuffer) {
        self.backend
            .draw_elements(topology, indices, indices.num_items, IndexFormat::Uint16);
    }

    fn flat_pass(&mut self, positions: GpuBuffer, color: Color) {
        let model_view = self.matrices.current();
        self.flat.bind_flat(
            &mut self.backend,
            &DrawUniforms {
                model_view: &model_view,
                projection: &self.projection,
                color,
                positions: &positions,
            },
        );
    }

    fn textured_pass(&mut self, positions: GpuBuffer, tex_coords: GpuBuffer, texture: &Texture, tint: Color) {
        let model_view = self.matrices.current();
        self.textured.bind_textured(
            &mut self.backend,
            &DrawUniforms {
                model_view: &model_view,
                projection: &self.projection,
                color: tint,
                positions: &positions,
            },
            &tex_coords,
            texture,
        );
    }

    fn release_transient(&mut self, buffer: GpuBuffer) {
        if let Err(err) = self.backend.delete_buffer(buffer.id) {
            log::warn!("failed to release transient buffer {:?}: {}", buffer.id, err);
        }
    }

    // --- frame ----------------------------------------------------------

    pub fn begin_frame(&mut self) {
        self.begin_frame_at(Instant::now());
    }

    /// Updates frame timing, then resets model-view to identity and the
    /// projection to the default perspective. Custom cameras must be set up
    /// again after this call.
    pub fn begin_frame_at(&mut self, now: Instant) {
        self.frame.tick_at(now);
        self.matrices.origin();
        self.perspective();
    }

    // --- teardown -------------------------------------------------------

    /// Releases geometry buffers, then programs. Runs once; later calls and
    /// the drop that follows are no-ops. Failures are logged and returned but
    /// never stop the remaining releases.
    pub fn release(&mut self) -> Vec<BackendError> {
        if self.released {
            return Vec::new();
        }
        self.released = true;

        let mut errors = Vec::new();
        for (name, buffer) in self.geometry.release_order() {
            if let Err(err) = self.backend.delete_buffer(buffer.id) {
                log::warn!("failed to release {}: {}", name, err);
                errors.push(err);
            }
        }
        for program in [self.textured, self.flat] {
            if let Err(err) = self.backend.delete_program(program.id) {
                log::warn!("failed to release {:?} program: {}", program.kind, err);
                errors.push(err);
            }
        }

        log::debug!("renderer released with {} error(s)", errors.len());
        errors
    }
}

fn discard_program<B: GraphicsBackend>(backend: &mut B, program: ShaderProgram) {
    if let Err(err) = backend.delete_program(program.id) {
        log::warn!("failed to release {:?} program: {}", program.kind, err);
    }
}

impl<B: GraphicsBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.release();
    }
}
