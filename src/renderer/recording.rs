use super::backend::{
    BlendFactor, Capability, ClearFlags, GpuBuffer, GraphicsBackend, IndexFormat, Topology,
};
use super::handle::{BufferId, ProgramId, TextureId};
use crate::error::BackendError;
use crate::math::Color;
use glam::Mat4;
use std::collections::HashSet;

/// One call made against a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CompileProgram(ProgramId),
    UseProgram(ProgramId),
    DeleteProgram(ProgramId),
    BindAttribute { program: ProgramId, name: String, buffer: BufferId },
    BindUniformMatrix { program: ProgramId, name: String, value: Mat4 },
    BindUniformVec4 { program: ProgramId, name: String, value: [f32; 4] },
    BindTexture { program: ProgramId, name: String, texture: TextureId },
    CreateVertexBuffer { buffer: BufferId, data: Vec<f32>, item_size: u32 },
    CreateIndexBuffer { buffer: BufferId, data: Vec<u16> },
    DeleteBuffer(BufferId),
    DrawArrays { topology: Topology, first: u32, count: u32 },
    DrawElements { topology: Topology, indices: BufferId, count: u32, format: IndexFormat },
    SetCapability { capability: Capability, enabled: bool },
    BlendFunc { src: BlendFactor, dst: BlendFactor },
    LineWidth(f32),
    Viewport { x: i32, y: i32, width: u32, height: u32 },
    ClearColor(Color),
    Clear(ClearFlags),
}

impl Command {
    pub fn is_draw(&self) -> bool {
        matches!(self, Command::DrawArrays { .. } | Command::DrawElements { .. })
    }
}

/// Headless backend that records every call instead of talking to a GPU.
///
/// Object ids are handed out sequentially starting at 1. Programs and buffers
/// are tracked so that leaks and double releases are observable.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
    next_id: u32,
    live_programs: HashSet<ProgramId>,
    live_buffers: HashSet<BufferId>,
    fail_releases: bool,
    allocation_budget: Option<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `delete_*` call fail after recording it.
    pub fn fail_releases(&mut self, fail: bool) {
        self.fail_releases = fail;
    }

    /// Lets the next `count` buffer creations succeed and fails every one
    /// after that.
    pub fn fail_allocations_after(&mut self, count: usize) {
        self.allocation_budget = Some(count);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| c.is_draw())
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.len()
    }

    fn reserve_buffer(&mut self) -> Result<(), BackendError> {
        match self.allocation_budget.as_mut() {
            Some(0) => Err(BackendError::Allocation("allocation budget exhausted".into())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsBackend for RecordingBackend {
    fn compile_program(&mut self, vertex: &str, fragment: &str) -> Result<ProgramId, BackendError> {
        if vertex.trim().is_empty() || fragment.trim().is_empty() {
            return Err(BackendError::Compile("empty shader source".into()));
        }
        let id = ProgramId::new(self.allocate());
        self.live_programs.insert(id);
        self.commands.push(Command::CompileProgram(id));
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) {
        self.commands.push(Command::UseProgram(program));
    }

    fn delete_program(&mut self, program: ProgramId) -> Result<(), BackendError> {
        self.commands.push(Command::DeleteProgram(program));
        if self.fail_releases {
            return Err(BackendError::Release(format!("program {}", program.id())));
        }
        if !self.live_programs.remove(&program) {
            return Err(BackendError::Release(format!("unknown program {}", program.id())));
        }
        Ok(())
    }

    fn bind_attribute(&mut self, program: ProgramId, name: &str, buffer: &GpuBuffer) {
        self.commands.push(Command::BindAttribute {
            program,
            name: name.to_owned(),
            buffer: buffer.id,
        });
    }

    fn bind_uniform_matrix(&mut self, program: ProgramId, name: &str, value: &Mat4) {
        self.commands.push(Command::BindUniformMatrix {
            program,
            name: name.to_owned(),
            value: *value,
        });
    }

    fn bind_uniform_vec4(&mut self, program: ProgramId, name: &str, value: [f32; 4]) {
        self.commands.push(Command::BindUniformVec4 {
            program,
            name: name.to_owned(),
            value,
        });
    }

    fn bind_texture(&mut self, program: ProgramId, name: &str, texture: TextureId) {
        self.commands.push(Command::BindTexture {
            program,
            name: name.to_owned(),
            texture,
        });
    }

    fn create_vertex_buffer(
        &mut self,
        data: &[f32],
        item_size: u32,
    ) -> Result<GpuBuffer, BackendError> {
        if item_size == 0 || data.len() % item_size as usize != 0 {
            return Err(BackendError::Allocation(format!(
                "{} floats do not divide into items of {}",
                data.len(),
                item_size
            )));
        }
        self.reserve_buffer()?;
        let id = BufferId::new(self.allocate());
        self.live_buffers.insert(id);
        self.commands.push(Command::CreateVertexBuffer {
            buffer: id,
            data: data.to_vec(),
            item_size,
        });
        Ok(GpuBuffer {
            id,
            item_size,
            num_items: (data.len() / item_size as usize) as u32,
        })
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<GpuBuffer, BackendError> {
        self.reserve_buffer()?;
        let id = BufferId::new(self.allocate());
        self.live_buffers.insert(id);
        self.commands.push(Command::CreateIndexBuffer {
            buffer: id,
            data: data.to_vec(),
        });
        Ok(GpuBuffer {
            id,
            item_size: 1,
            num_items: data.len() as u32,
        })
    }

    fn delete_buffer(&mut self, buffer: BufferId) -> Result<(), BackendError> {
        self.commands.push(Command::DeleteBuffer(buffer));
        if self.fail_releases {
            return Err(BackendError::Release(format!("buffer {}", buffer.id())));
        }
        if !self.live_buffers.remove(&buffer) {
            return Err(BackendError::Release(format!("unknown buffer {}", buffer.id())));
        }
        Ok(())
    }

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) {
        self.commands.push(Command::DrawArrays {
            topology,
            first,
            count,
        });
    }

    fn draw_elements(
        &mut self,
        topology: Topology,
        indices: &GpuBuffer,
        count: u32,
        format: IndexFormat,
    ) {
        self.commands.push(Command::DrawElements {
            topology,
            indices: indices.id,
            count,
            format,
        });
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.commands.push(Command::SetCapability {
            capability,
            enabled,
        });
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.commands.push(Command::BlendFunc { src, dst });
    }

    fn line_width(&mut self, width: f32) {
        self.commands.push(Command::LineWidth(width));
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.commands.push(Command::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&mut self, color: Color) {
        self.commands.push(Command::ClearColor(color));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.commands.push(Command::Clear(flags));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_report_item_counts() {
        let mut backend = RecordingBackend::new();
        let vb = backend.create_vertex_buffer(&[0.0; 12], 3).unwrap();
        assert_eq!(vb.num_items, 4);
        let ib = backend.create_index_buffer(&[0, 1, 2]).unwrap();
        assert_eq!(ib.num_items, 3);
        assert_ne!(vb.id, ib.id);
        assert_eq!(backend.live_buffers(), 2);
    }

    #[test]
    fn ragged_vertex_data_is_rejected() {
        let mut backend = RecordingBackend::new();
        assert!(matches!(
            backend.create_vertex_buffer(&[0.0; 5], 3),
            Err(BackendError::Allocation(_))
        ));
    }

    #[test]
    fn allocation_budget_runs_out() {
        let mut backend = RecordingBackend::new();
        backend.fail_allocations_after(1);
        assert!(backend.create_index_buffer(&[0, 1, 2]).is_ok());
        assert!(matches!(
            backend.create_vertex_buffer(&[0.0; 3], 3),
            Err(BackendError::Allocation(_))
        ));
        assert_eq!(backend.live_buffers(), 1);
    }

    #[test]
    fn double_release_is_an_error() {
        let mut backend = RecordingBackend::new();
        let vb = backend.create_vertex_buffer(&[0.0; 3], 3).unwrap();
        assert!(backend.delete_buffer(vb.id).is_ok());
        assert!(backend.delete_buffer(vb.id).is_err());
    }

    #[test]
    fn failing_releases_are_still_recorded() {
        let mut backend = RecordingBackend::new();
        let program = backend.compile_program("void main() {}", "void main() {}").unwrap();
        backend.fail_releases(true);
        assert!(backend.delete_program(program).is_err());
        assert_eq!(backend.commands().last(), Some(&Command::DeleteProgram(program)));
    }
}
