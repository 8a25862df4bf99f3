//! Headless backend that records every command, for ordering assertions in tests.

use crate::error::RenderError;

use super::{Backend, DrawCall, PipelineDesc};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct BufferId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct PipelineId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    CreateBuffer {
        buffer: BufferId,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    },
    Write {
        buffer: BufferId,
        offset: u64,
        len: u64,
    },
    CreatePipeline {
        pipeline: PipelineId,
        strides: Vec<u64>,
    },
    ConfigureSurface {
        width: u32,
        height: u32,
    },
    Draw {
        pipeline: PipelineId,
        vertex_buffers: Vec<BufferId>,
        index_buffer: BufferId,
        index_count: u32,
        instance_count: u32,
    },
}

pub(crate) struct RecordingBackend {
    pub max_dimension: u32,
    /// When set, `draw_indexed` fails with this error instead of recording.
    pub fail_draws: Option<RenderError>,
    ops: Vec<Op>,
    next_id: u32,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            fail_draws: None,
            ops: Vec::new(),
            next_id: 0,
        }
    }
}

impl RecordingBackend {
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Backend for RecordingBackend {
    type Buffer = BufferId;
    type Pipeline = PipelineId;

    fn max_surface_dimension(&self) -> u32 {
        self.max_dimension
    }

    fn create_buffer(
        &mut self,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<BufferId, RenderError> {
        let buffer = BufferId(self.next_id());
        self.ops.push(Op::CreateBuffer {
            buffer,
            label,
            size,
            usage,
        });
        Ok(buffer)
    }

    fn write_buffer(
        &mut self,
        buffer: &BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        self.ops.push(Op::Write {
            buffer: *buffer,
            offset,
            len: data.len() as u64,
        });
        Ok(())
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<PipelineId, RenderError> {
        let pipeline = PipelineId(self.next_id());
        self.ops.push(Op::CreatePipeline {
            pipeline,
            strides: desc.buffers.iter().map(|b| b.array_stride).collect(),
        });
        Ok(pipeline)
    }

    fn configure_surface(&mut self, width: u32, height: u32) {
        self.ops.push(Op::ConfigureSurface { width, height });
    }

    fn draw_indexed(&mut self, call: &DrawCall<'_, Self>) -> Result<(), RenderError> {
        if let Some(err) = self.fail_draws.clone() {
            return Err(err);
        }
        self.ops.push(Op::Draw {
            pipeline: *call.pipeline,
            vertex_buffers: call.vertex_buffers.iter().map(|b| **b).collect(),
            index_buffer: *call.index_buffer,
            index_count: call.index_count,
            instance_count: call.instance_count,
        });
        Ok(())
    }
}
