use bytemuck::{Pod, Zeroable};

/// Position (xyz) followed by a texture coordinate (uv).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

const fn vertex(x: f32, y: f32, u: f32, v: f32) -> Vertex {
    Vertex {
        position: [x, y, 0.0],
        tex_coord: [u, v],
    }
}

/// Which half of the window a quad covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Left,
    Right,
}

impl Pane {
    pub fn quad(self) -> &'static [Vertex; 4] {
        match self {
            Pane::Left => &QUADS[0],
            Pane::Right => &QUADS[1],
        }
    }
}

/// Fan order: top-left, bottom-left, bottom-right, top-right.
pub const QUADS: [[Vertex; 4]; 2] = [
    [
        vertex(-1.0, 1.0, 0.0, 1.0),
        vertex(-1.0, -1.0, 0.0, 0.0),
        vertex(0.0, -1.0, 1.0, 0.0),
        vertex(0.0, 1.0, 1.0, 1.0),
    ],
    [
        vertex(0.0, 1.0, 0.0, 1.0),
        vertex(0.0, -1.0, 0.0, 0.0),
        vertex(1.0, -1.0, 1.0, 0.0),
        vertex(1.0, 1.0, 1.0, 1.0),
    ],
];

/// wgpu has no fan topology; these indices spell the 4-vertex fan as a
/// triangle list.
pub const FAN_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}
