use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

/// Flat float data plus its component count, ready for
/// [`GraphicsBackend::create_vertex_buffer`](super::GraphicsBackend::create_vertex_buffer).
pub struct VertexData {
    pub data: Vec<f32>,
    pub item_size: u32,
}

impl Vertex {
    pub fn positions(vertices: &[Vertex]) -> VertexData {
        let pos: Vec<[f32; 3]> = vertices.iter().map(|v| v.pos).collect();
        VertexData {
            data: bytemuck::cast_slice::<[f32; 3], f32>(&pos).to_vec(),
            item_size: 3,
        }
    }

    pub fn tex_coords(vertices: &[Vertex]) -> VertexData {
        let uv: Vec<[f32; 2]> = vertices.iter().map(|v| v.uv).collect();
        VertexData {
            data: bytemuck::cast_slice::<[f32; 2], f32>(&uv).to_vec(),
            item_size: 2,
        }
    }
}

#[inline]
pub fn v(pos: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { pos, uv }
}
