use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::error::RenderError;

const OUTER_COLOR: [u8; 4] = [25, 25, 25, 255];
const INNER_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Ring geometry parameters.
///
/// Angles are in radians. When `end_angle - start_angle` is not a full turn the
/// result is an open arc; the builder never closes it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RingDesc {
    pub radius: f32,
    /// May equal or exceed `radius`; the ring is then degenerate or inverted.
    pub inner_radius: f32,
    pub subdivisions: u32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Default for RingDesc {
    fn default() -> Self {
        Self {
            radius: 1.0,
            inner_radius: 0.0,
            subdivisions: 24,
            start_angle: 0.0,
            end_angle: TAU,
        }
    }
}

impl RingDesc {
    pub fn new(radius: f32, inner_radius: f32, subdivisions: u32) -> Self {
        Self {
            radius,
            inner_radius,
            subdivisions,
            ..Self::default()
        }
    }

    pub fn with_angles(mut self, start_angle: f32, end_angle: f32) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    /// Builds the interleaved vertex list and triangle indices.
    ///
    /// Vertices come in outer/inner pairs, one pair per angle sample:
    ///
    /// ```text
    /// 0--2--4--6 ...   outer
    /// | /| /| /|
    /// |/ |/ |/ |
    /// 1--3--5--7 ...   inner
    /// ```
    ///
    /// Each subdivision `i` emits `(2i, 2i+1, 2i+2)` and `(2i+2, 2i+1, 2i+3)`.
    pub fn build(&self) -> Result<RingMesh, RenderError> {
        if self.subdivisions == 0 {
            return Err(RenderError::ZeroSubdivisions);
        }

        let steps = self.subdivisions;
        let sweep = self.end_angle - self.start_angle;

        let mut vertices = Vec::with_capacity(2 * (steps as usize + 1));
        for i in 0..=steps {
            let angle = self.start_angle + i as f32 * sweep / steps as f32;
            let (sin, cos) = angle.sin_cos();

            vertices.push(RingVertex::new([cos * self.radius, sin * self.radius], OUTER_COLOR));
            vertices.push(RingVertex::new(
                [cos * self.inner_radius, sin * self.inner_radius],
                INNER_COLOR,
            ));
        }

        let mut indices = Vec::with_capacity(6 * steps as usize);
        for i in 0..steps {
            let base = 2 * i;
            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base + 2, base + 1, base + 3]);
        }

        log::debug!(
            "built ring mesh: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Ok(RingMesh { vertices, indices })
    }
}

/// Indexed triangle list produced by [`RingDesc::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct RingMesh {
    pub vertices: Vec<RingVertex>,
    pub indices: Vec<u32>,
}

impl RingMesh {
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Mesh vertex layout (12 bytes):
///
///  offset 0  position  [f32; 2]  loc 0
///  offset 8  color     [u8; 4]   loc 1  (unorm)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RingVertex {
    pub position: [f32; 2],
    pub color: [u8; 4],
}

impl RingVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Unorm8x4   // color
    ];

    #[inline]
    pub const fn new(position: [f32; 2], color: [u8; 4]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RingVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
