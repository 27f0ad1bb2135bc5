//! Contract with the underlying retained-mode graphics API.
//!
//! The renderer never talks to a driver directly. Anything that can compile a
//! program, hold buffers and issue draws (a GL context, a WebGL binding, the
//! in-memory [`RecordingBackend`](super::RecordingBackend)) implements
//! [`GraphicsBackend`].

use super::handle::{BufferId, ProgramId, TextureId};
use crate::error::BackendError;
use crate::math::Color;
use bitflags::bitflags;
use glam::Mat4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topology {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Index component width for indexed draws. Only 16-bit indices are used.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Capability {
    Blend,
    DepthTest,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// A backend buffer together with its layout.
///
/// `item_size` is the number of components per item (3 for positions, 2 for
/// texture coordinates, 1 for indices) and `num_items` the item count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GpuBuffer {
    pub id: BufferId,
    pub item_size: u32,
    pub num_items: u32,
}

/// A texture owned by the caller. Only its id and native size are needed here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

pub trait GraphicsBackend {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, BackendError>;
    fn use_program(&mut self, program: ProgramId);
    fn delete_program(&mut self, program: ProgramId) -> Result<(), BackendError>;

    fn bind_attribute(&mut self, program: ProgramId, name: &str, buffer: &GpuBuffer);
    fn bind_uniform_matrix(&mut self, program: ProgramId, name: &str, value: &Mat4);
    fn bind_uniform_vec4(&mut self, program: ProgramId, name: &str, value: [f32; 4]);
    fn bind_texture(&mut self, program: ProgramId, name: &str, texture: TextureId);

    fn create_vertex_buffer(&mut self, data: &[f32], item_size: u32)
        -> Result<GpuBuffer, BackendError>;
    fn create_index_buffer(&mut self, data: &[u16]) -> Result<GpuBuffer, BackendError>;
    fn delete_buffer(&mut self, buffer: BufferId) -> Result<(), BackendError>;

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32);
    fn draw_elements(
        &mut self,
        topology: Topology,
        indices: &GpuBuffer,
        count: u32,
        format: IndexFormat,
    );

    fn set_capability(&mut self, capability: Capability, enabled: bool);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn line_width(&mut self, width: f32);
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
    fn clear_color(&mut self, color: Color);
    fn clear(&mut self, flags: ClearFlags);
}

/// Lets a renderer borrow a backend the caller keeps owning.
impl<B: GraphicsBackend + ?Sized> GraphicsBackend for &mut B {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, BackendError> {
        (**self).compile_program(vertex_source, fragment_source)
    }

    fn use_program(&mut self, program: ProgramId) {
        (**self).use_program(program)
    }

    fn delete_program(&mut self, program: ProgramId) -> Result<(), BackendError> {
        (**self).delete_program(program)
    }

    fn bind_attribute(&mut self, program: ProgramId, name: &str, buffer: &GpuBuffer) {
        (**self).bind_attribute(program, name, buffer)
    }

    fn bind_uniform_matrix(&mut self, program: ProgramId, name: &str, value: &Mat4) {
        (**self).bind_uniform_matrix(program, name, value)
    }

    fn bind_uniform_vec4(&mut self, program: ProgramId, name: &str, value: [f32; 4]) {
        (**self).bind_uniform_vec4(program, name, value)
    }

    fn bind_texture(&mut self, program: ProgramId, name: &str, texture: TextureId) {
        (**self).bind_texture(program, name, texture)
    }

    fn create_vertex_buffer(
        &mut self,
        data: &[f32],
        item_size: u32,
    ) -> Result<GpuBuffer, BackendError> {
        (**self).create_vertex_buffer(data, item_size)
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<GpuBuffer, BackendError> {
        (**self).create_index_buffer(data)
    }

    fn delete_buffer(&mut self, buffer: BufferId) -> Result<(), BackendError> {
        (**self).delete_buffer(buffer)
    }

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) {
        (**self).draw_arrays(topology, first, count)
    }

    fn draw_elements(
        &mut self,
        topology: Topology,
        indices: &GpuBuffer,
        count: u32,
        format: IndexFormat,
    ) {
        (**self).draw_elements(topology, indices, count, format)
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        (**self).set_capability(capability, enabled)
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        (**self).blend_func(src, dst)
    }

    fn line_width(&mut self, width: f32) {
        (**self).line_width(width)
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        (**self).viewport(x, y, width, height)
    }

    fn clear_color(&mut self, color: Color) {
        (**self).clear_color(color)
    }

    fn clear(&mut self, flags: ClearFlags) {
        (**self).clear(flags)
    }
}
