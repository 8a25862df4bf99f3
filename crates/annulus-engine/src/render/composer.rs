use rand::Rng;

use crate::backend::{Backend, CLEAR_COLOR, DrawCall, PipelineDesc, SizedBuffer};
use crate::config::SceneConfig;
use crate::error::RenderError;
use crate::random::RandomSource;

use super::instances::{InstanceBuffers, InstanceStore, ScaleInstance, StaticInstance};
use super::mesh::{RingMesh, RingVertex};
use super::resize::SurfaceState;

const RING_SHADER: &str = include_str!("shaders/ring.wgsl");

/// Vertex buffer layouts, in slot order: mesh, static instance, scale instance.
pub fn buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        RingVertex::layout(),
        StaticInstance::layout(),
        ScaleInstance::layout(),
    ]
}

/// Owns the ring mesh, instance data and pipeline; issues one instanced draw per frame.
pub struct FrameComposer<B: Backend> {
    pipeline: B::Pipeline,

    mesh_vbo: SizedBuffer<B::Buffer>,
    mesh_ibo: SizedBuffer<B::Buffer>,
    index_count: u32,

    store: InstanceStore,
    instances: InstanceBuffers<B>,
}

impl<B: Backend> FrameComposer<B> {
    /// Builds the mesh, generates the population and uploads all static data.
    ///
    /// Every upload is enqueued before any draw can reference it.
    pub fn new<R: Rng>(
        backend: &mut B,
        color_format: wgpu::TextureFormat,
        scene: &SceneConfig,
        src: &mut RandomSource<R>,
    ) -> Result<Self, RenderError> {
        let mesh = scene.ring.build()?;
        let (mesh_vbo, mesh_ibo) = upload_mesh(backend, &mesh)?;

        let store = InstanceStore::generate(scene.object_count, src);
        let instances = InstanceBuffers::initialize(backend, &store)?;

        let layouts = buffer_layouts();
        let pipeline = backend.create_pipeline(&PipelineDesc {
            label: "annulus ring pipeline",
            shader_source: RING_SHADER,
            vertex_entry: "vs",
            fragment_entry: "fs",
            color_format,
            buffers: &layouts,
            front_face: wgpu::FrontFace::Cw,
        })?;

        log::info!(
            "ring scene ready: {} objects, {} indices per ring",
            store.len(),
            mesh.index_count()
        );

        Ok(Self {
            pipeline,
            mesh_vbo,
            mesh_ibo,
            index_count: mesh.index_count(),
            store,
            instances,
        })
    }

    #[inline]
    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    #[inline]
    pub fn instance_count(&self) -> u32 {
        self.store.len() as u32
    }

    /// Rewrites the scale buffer for `surface`'s aspect ratio and draws every object.
    ///
    /// Either the full scale buffer is written and the draw is issued, or nothing
    /// reaches the backend past the failing step.
    pub fn render_frame(
        &mut self,
        backend: &mut B,
        surface: SurfaceState,
    ) -> Result<(), RenderError> {
        let aspect = surface.aspect()?;

        // An empty population still clears the surface; there is no scale data to write.
        if !self.store.is_empty() {
            let scales = self.store.compute_frame_scales(aspect);
            self.instances.scale_vbo.upload(backend, scales)?;
        }

        let vertex_buffers = [
            self.mesh_vbo.handle(),
            self.instances.static_vbo.handle(),
            self.instances.scale_vbo.handle(),
        ];

        backend.draw_indexed(&DrawCall {
            pipeline: &self.pipeline,
            vertex_buffers: &vertex_buffers,
            index_buffer: self.mesh_ibo.handle(),
            index_count: self.index_count,
            instance_count: self.instance_count(),
            clear_color: CLEAR_COLOR,
        })?;

        log::trace!(
            "drew {} rings at {}x{} (aspect {aspect:.3})",
            self.instance_count(),
            surface.width,
            surface.height
        );
        Ok(())
    }
}

fn upload_mesh<B: Backend>(
    backend: &mut B,
    mesh: &RingMesh,
) -> Result<(SizedBuffer<B::Buffer>, SizedBuffer<B::Buffer>), RenderError> {
    let vbo = SizedBuffer::create(
        backend,
        "annulus ring vbo",
        mesh.vertex_bytes().len() as u64,
        wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    )?;
    vbo.upload(backend, mesh.vertex_bytes())?;

    let ibo = SizedBuffer::create(
        backend,
        "annulus ring ibo",
        mesh.index_bytes().len() as u64,
        wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
    )?;
    ibo.upload(backend, mesh.index_bytes())?;

    Ok((vbo, ibo))
}
