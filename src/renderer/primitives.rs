//! Unit geometry shared by every `rect`, `image` and `draw_box` call.
//!
//! Both shapes have a corner at the origin: the rectangle spans `[0, 1]²` in
//! the z = 0 plane and the cube spans `[0, 1]³`. Callers reach any size or
//! position by composing translate and scale on the model-view matrix.

use super::backend::{GpuBuffer, GraphicsBackend};
use super::handle::BufferId;
use super::vertex::{v, Vertex};
use crate::error::BackendError;

/// Four vertices in triangle-strip order.
pub fn rect_mesh() -> Vec<Vertex> {
    vec![
        v([0.0, 0.0, 0.0], [0.0, 0.0]),
        v([1.0, 0.0, 0.0], [1.0, 0.0]),
        v([0.0, 1.0, 0.0], [0.0, 1.0]),
        v([1.0, 1.0, 0.0], [1.0, 1.0]),
    ]
}

/// Closed outline as a line strip: the first corner is repeated at the end.
pub fn rect_outline() -> Vec<f32> {
    vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0,
    ]
}

/// 24 vertices (4 per face) with per-face texture coordinates, and 36
/// triangle-list indices.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let faces: [[[f32; 3]; 4]; 6] = [
        // +X
        [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        // -X
        [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
        // +Y
        [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
        // -Y
        [[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0]],
        // +Z
        [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
        // -Z
        [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
    ];
    let uvs = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

    let verts = faces
        .iter()
        .flat_map(|face| face.iter().zip(uvs.iter()).map(|(p, uv)| v(*p, *uv)))
        .collect();

    let idx = (0..6u16)
        .flat_map(|f| {
            let o = f * 4;
            [o, o + 1, o + 2, o, o + 2, o + 3]
        })
        .collect();

    (verts, idx)
}

/// Line-list indices tracing the four edges of every cube face.
pub fn cube_outline_indices() -> Vec<u16> {
    (0..6u16)
        .flat_map(|f| {
            let o = f * 4;
            [o, o + 1, o + 1, o + 2, o + 2, o + 3, o + 3, o]
        })
        .collect()
}

/// Backend buffers for the unit shapes, created once per renderer.
#[derive(Debug)]
pub struct UnitGeometry {
    pub rect_positions: GpuBuffer,
    pub rect_tex_coords: GpuBuffer,
    pub rect_outline: GpuBuffer,
    pub cube_positions: GpuBuffer,
    pub cube_tex_coords: GpuBuffer,
    pub cube_indices: GpuBuffer,
    pub cube_outline: GpuBuffer,
}

impl UnitGeometry {
    /// Uploads every unit shape. If any upload fails, the buffers created so
    /// far are deleted before the error is returned.
    pub fn build<B: GraphicsBackend>(backend: &mut B) -> Result<Self, BackendError> {
        let mut created: Vec<BufferId> = Vec::new();
        let result = Self::upload(backend, &mut created);
        if result.is_err() {
            for id in created {
                if let Err(err) = backend.delete_buffer(id) {
                    log::warn!("failed to release partial unit geometry {:?}: {}", id, err);
                }
            }
        }
        result
    }

    fn upload<B: GraphicsBackend>(
        backend: &mut B,
        created: &mut Vec<BufferId>,
    ) -> Result<Self, BackendError> {
        let rect = rect_mesh();
        let rect_pos = Vertex::positions(&rect);
        let rect_uv = Vertex::tex_coords(&rect);
        let (cube, cube_idx) = cube_mesh();
        let cube_pos = Vertex::positions(&cube);
        let cube_uv = Vertex::tex_coords(&cube);

        let mut track = |buffer: Result<GpuBuffer, BackendError>| {
            buffer.inspect(|b| created.push(b.id))
        };

        Ok(Self {
            rect_positions: track(backend.create_vertex_buffer(&rect_pos.data, rect_pos.item_size))?,
            rect_tex_coords: track(backend.create_vertex_buffer(&rect_uv.data, rect_uv.item_size))?,
            rect_outline: track(backend.create_vertex_buffer(&rect_outline(), 3))?,
            cube_positions: track(backend.create_vertex_buffer(&cube_pos.data, cube_pos.item_size))?,
            cube_tex_coords: track(backend.create_vertex_buffer(&cube_uv.data, cube_uv.item_size))?,
            cube_indices: track(backend.create_index_buffer(&cube_idx))?,
            cube_outline: track(backend.create_index_buffer(&cube_outline_indices()))?,
        })
    }

    /// Buffers in release order: cube before rectangle, outlines and indices
    /// before the vertex data they index.
    pub fn release_order(&self) -> [(&'static str, &GpuBuffer); 7] {
        [
            ("cube outline", &self.cube_outline),
            ("cube indices", &self.cube_indices),
            ("cube texture coordinates", &self.cube_tex_coords),
            ("cube positions", &self.cube_positions),
            ("rect outline", &self.rect_outline),
            ("rect texture coordinates", &self.rect_tex_coords),
            ("rect positions", &self.rect_positions),
        ]
    }
}
