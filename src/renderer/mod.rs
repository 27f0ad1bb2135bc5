pub mod backend;
pub mod handle;
pub mod matrix_stack;
pub mod primitives;
pub mod recording;
pub mod renderer;
pub mod shaders;
pub mod state;
pub mod vertex;

pub use backend::{
    BlendFactor, Capability, ClearFlags, GpuBuffer, GraphicsBackend, IndexFormat, Texture, Topology,
};
pub use handle::{BufferId, Handle, ProgramId, TextureId};
pub use matrix_stack::MatrixStack;
pub use primitives::UnitGeometry;
pub use recording::{Command, RecordingBackend};
pub use renderer::Renderer;
pub use shaders::{ProgramKind, ShaderProgram};
pub use state::{Background, BlendMode, DrawState, RectMode};
pub use vertex::Vertex;
