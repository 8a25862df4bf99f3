//! Graphics backend seam.
//!
//! The renderer only talks to the GPU through [`Backend`]. Layout and usage
//! descriptions reuse wgpu's plain-data types so they can be built and inspected
//! without a device.
//!
//! Implementations:
//! - [`WgpuBackend`]: wgpu device + window surface
//! - `recording::RecordingBackend` (tests): logs every operation

#[cfg(test)]
pub(crate) mod recording;
mod wgpu_backend;

pub use wgpu_backend::WgpuBackend;

use crate::error::RenderError;

/// Clear color of the single render pass.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Pipeline creation parameters.
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'static str,
    pub shader_source: &'a str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub color_format: wgpu::TextureFormat,
    /// Ordered by vertex buffer slot.
    pub buffers: &'a [wgpu::VertexBufferLayout<'static>],
    pub front_face: wgpu::FrontFace,
}

/// One indexed, instanced draw inside a clearing render pass.
///
/// With `instance_count == 0` the pass only clears.
pub struct DrawCall<'a, B: Backend + ?Sized> {
    pub pipeline: &'a B::Pipeline,
    /// Bound to slots `0..vertex_buffers.len()` in order.
    pub vertex_buffers: &'a [&'a B::Buffer],
    /// Uint32 indices.
    pub index_buffer: &'a B::Buffer,
    pub index_count: u32,
    pub instance_count: u32,
    pub clear_color: wgpu::Color,
}

/// Capabilities and commands the renderer consumes.
///
/// Work is executed in submission order; no call blocks on GPU completion.
pub trait Backend {
    type Buffer;
    type Pipeline;

    /// Largest surface width/height the device accepts.
    fn max_surface_dimension(&self) -> u32;

    fn create_buffer(
        &mut self,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<Self::Buffer, RenderError>;

    fn write_buffer(
        &mut self,
        buffer: &Self::Buffer,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError>;

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<Self::Pipeline, RenderError>;

    /// Resizes the drawable surface. Dimensions are already clamped by the caller.
    fn configure_surface(&mut self, width: u32, height: u32);

    fn draw_indexed(&mut self, call: &DrawCall<'_, Self>) -> Result<(), RenderError>;
}

/// Backend buffer handle paired with its allocated size.
///
/// Every upload goes through [`SizedBuffer::upload`], which rejects writes that
/// do not cover the whole buffer.
#[derive(Debug)]
pub struct SizedBuffer<H> {
    label: &'static str,
    handle: H,
    size: u64,
}

impl<H> SizedBuffer<H> {
    pub fn create<B>(
        backend: &mut B,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<Self, RenderError>
    where
        B: Backend<Buffer = H> + ?Sized,
    {
        let handle = backend.create_buffer(label, size, usage)?;
        Ok(Self {
            label,
            handle,
            size,
        })
    }

    #[inline]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Writes `data` at offset 0. Fails with `BufferSizeMismatch` unless
    /// `data.len()` equals the allocated size.
    pub fn upload<B>(&self, backend: &mut B, data: &[u8]) -> Result<(), RenderError>
    where
        B: Backend<Buffer = H> + ?Sized,
    {
        let actual = data.len() as u64;
        if actual != self.size {
            return Err(RenderError::BufferSizeMismatch {
                label: self.label,
                expected: self.size,
                actual,
            });
        }
        backend.write_buffer(&self.handle, 0, data)
    }
}
