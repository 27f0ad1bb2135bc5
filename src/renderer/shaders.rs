use super::backend::{GpuBuffer, GraphicsBackend, Texture};
use super::handle::ProgramId;
use crate::error::BackendError;
use crate::math::Color;
use glam::Mat4;

pub const ATTR_POSITION: &str = "aVertexPosition";
pub const ATTR_TEXCOORD: &str = "aTextureCoord";
pub const UNIFORM_MODEL_VIEW: &str = "uMVMatrix";
pub const UNIFORM_PROJECTION: &str = "uPMatrix";
pub const UNIFORM_COLOR: &str = "uColor";
pub const UNIFORM_SAMPLER: &str = "uSampler";

const FLAT_VERTEX: &str = r#"
attribute vec3 aVertexPosition;
uniform mat4 uMVMatrix;
uniform mat4 uPMatrix;

void main(void) {
    gl_Position = uPMatrix * uMVMatrix * vec4(aVertexPosition, 1.0);
}
"#;

const FLAT_FRAGMENT: &str = r#"
precision mediump float;
uniform vec4 uColor;

void main(void) {
    gl_FragColor = uColor;
}
"#;

const TEXTURED_VERTEX: &str = r#"
attribute vec3 aVertexPosition;
attribute vec2 aTextureCoord;
uniform mat4 uMVMatrix;
uniform mat4 uPMatrix;
varying vec2 vTextureCoord;

void main(void) {
    gl_Position = uPMatrix * uMVMatrix * vec4(aVertexPosition, 1.0);
    vTextureCoord = aTextureCoord;
}
"#;

const TEXTURED_FRAGMENT: &str = r#"
precision mediump float;
uniform vec4 uColor;
uniform sampler2D uSampler;
varying vec2 vTextureCoord;

void main(void) {
    gl_FragColor = texture2D(uSampler, vTextureCoord) * uColor;
}
"#;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProgramKind {
    Flat,
    Textured,
}

impl ProgramKind {
    fn sources(self) -> (&'static str, &'static str) {
        match self {
            ProgramKind::Flat => (FLAT_VERTEX, FLAT_FRAGMENT),
            ProgramKind::Textured => (TEXTURED_VERTEX, TEXTURED_FRAGMENT),
        }
    }
}

/// Per-draw inputs shared by both built-in programs.
pub struct DrawUniforms<'a> {
    pub model_view: &'a Mat4,
    pub projection: &'a Mat4,
    pub color: Color,
    pub positions: &'a GpuBuffer,
}

/// One of the two built-in programs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub id: ProgramId,
    pub kind: ProgramKind,
}

impl ShaderProgram {
    pub fn compile<B: GraphicsBackend>(backend: &mut B, kind: ProgramKind) -> Result<Self, BackendError> {
        let (vertex, fragment) = kind.sources();
        let id = backend.compile_program(vertex, fragment)?;
        log::debug!("compiled {:?} program as {:?}", kind, id);
        Ok(Self { id, kind })
    }

    /// Activates the flat program with its matrices, color and positions.
    pub fn bind_flat<B: GraphicsBackend>(&self, backend: &mut B, uniforms: &DrawUniforms<'_>) {
        debug_assert_eq!(self.kind, ProgramKind::Flat);
        self.bind_common(backend, uniforms);
    }

    /// Activates the textured program; `color` in `uniforms` acts as a tint.
    pub fn bind_textured<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        uniforms: &DrawUniforms<'_>,
        tex_coords: &GpuBuffer,
        texture: &Texture,
    ) {
        debug_assert_eq!(self.kind, ProgramKind::Textured);
        self.bind_common(backend, uniforms);
        backend.bind_attribute(self.id, ATTR_TEXCOORD, tex_coords);
        backend.bind_texture(self.id, UNIFORM_SAMPLER, texture.id);
    }

    fn bind_common<B: GraphicsBackend>(&self, backend: &mut B, uniforms: &DrawUniforms<'_>) {
        backend.use_program(self.id);
        backend.bind_uniform_matrix(self.id, UNIFORM_MODEL_VIEW, uniforms.model_view);
        backend.bind_uniform_matrix(self.id, UNIFORM_PROJECTION, uniforms.projection);
        backend.bind_uniform_vec4(self.id, UNIFORM_COLOR, uniforms.color.to_array());
        backend.bind_attribute(self.id, ATTR_POSITION, uniforms.positions);
    }
}
