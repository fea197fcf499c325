use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Fullscreen quad vertex: clip-space position + texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2], // -1..1
    pub uv: [f32; 2],  // 0..1, v grows downward like wgpu texture rows
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(x: f32, y: f32, u: f32, w: f32) -> QuadVertex {
    QuadVertex { pos: [x, y], uv: [u, w] }
}

/// Two counter-clockwise triangles covering clip space exactly once.
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    v(-1.0,  1.0, 0.0, 0.0),
    v(-1.0, -1.0, 0.0, 1.0),
    v( 1.0, -1.0, 1.0, 1.0),

    v(-1.0,  1.0, 0.0, 0.0),
    v( 1.0, -1.0, 1.0, 1.0),
    v( 1.0,  1.0, 1.0, 0.0),
];

/// Number of vertices issued by every [`FullscreenQuad::draw`].
pub const QUAD_VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;

/// Static two-triangle screen-space mesh.
///
/// Uploaded once; `draw` uses whatever pipeline and texture bind group the
/// caller has already set on the pass.
pub struct FullscreenQuad {
    vbo: wgpu::Buffer,
}

impl FullscreenQuad {
    pub fn new(device: &wgpu::Device) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lantern fullscreen quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { vbo }
    }

    /// Non-indexed draw of the six quad vertices (2 triangles).
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
        0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
    }

    #[test]
    fn six_vertices_two_triangles() {
        assert_eq!(QUAD_VERTEX_COUNT, 6);
        assert_eq!(QUAD_VERTICES.chunks(3).count(), 2);
    }

    #[test]
    fn attributes_stay_in_range() {
        for vert in QUAD_VERTICES {
            assert!(vert.pos.iter().all(|c| (-1.0..=1.0).contains(c)));
            assert!(vert.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn triangles_cover_clip_space_exactly_once() {
        let mut total = 0.0;
        for tri in QUAD_VERTICES.chunks(3) {
            let area = signed_area(tri[0].pos, tri[1].pos, tri[2].pos);
            assert!(area > 0.0, "triangle wound clockwise");
            total += area;
        }
        // Clip space spans [-1, 1]^2.
        assert!((total - 4.0).abs() < 1e-6);
    }

    #[test]
    fn uv_maps_top_left_to_first_texel_row() {
        for vert in QUAD_VERTICES {
            let expected_u = vert.pos[0] * 0.5 + 0.5;
            let expected_v = 0.5 - vert.pos[1] * 0.5;
            assert_eq!(vert.uv, [expected_u, expected_v]);
        }
    }

    #[test]
    fn vertex_stride_is_four_floats() {
        assert_eq!(QuadVertex::layout().array_stride, 16);
    }
}
