//! Static quad geometry.
//!
//! CPU space for the quad is pixels with the origin at the quad's centre and
//! +Y up. The vertex shader maps pixels to NDC with the viewport uniform.

use bytemuck::{Pod, Zeroable};

/// Number of vertices in the quad (triangle strip).
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// One vertex of the quad: position in pixels plus texture coordinate.
///
/// Layout is `repr(C)`: `position` at byte 0, `tex_coord` at byte 12, stride 20.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // tex_coord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Builds the quad for an image of `width` x `height` pixels.
///
/// Order is bottom-left, top-left, bottom-right, top-right so that a triangle
/// strip covers the quad. Texture coordinate (0, 0) is the image's top-left
/// corner and (1, 1) its bottom-right.
pub fn quad_vertices(width: u32, height: u32) -> [Vertex; 4] {
    let hw = width as f32 / 2.0;
    let hh = height as f32 / 2.0;

    [
        Vertex { position: [-hw, -hh, 0.0], tex_coord: [0.0, 1.0] },
        Vertex { position: [-hw, hh, 0.0], tex_coord: [0.0, 0.0] },
        Vertex { position: [hw, -hh, 0.0], tex_coord: [1.0, 1.0] },
        Vertex { position: [hw, hh, 0.0], tex_coord: [1.0, 0.0] },
    ]
}
