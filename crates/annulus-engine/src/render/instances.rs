use bytemuck::{Pod, Zeroable};
use rand::Rng;

use crate::backend::{Backend, SizedBuffer};
use crate::error::RenderError;
use crate::random::RandomSource;

/// Placement range for object offsets, per axis.
pub const OFFSET_RANGE: (f32, f32) = (-0.9, 0.9);
/// Range of uniform base scales.
pub const SCALE_RANGE: (f32, f32) = (0.2, 0.5);

/// One member of the instanced population.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RingObject {
    pub color: [u8; 4],
    pub offset: [f32; 2],
    pub scale: f32,
}

impl RingObject {
    /// Draws color, offset and base scale, in that order.
    pub fn random<R: Rng>(src: &mut RandomSource<R>) -> Self {
        let color = [
            src.up_to(255.0) as u8,
            src.up_to(255.0) as u8,
            src.up_to(255.0) as u8,
            255,
        ];
        let offset = [
            src.range(OFFSET_RANGE.0, OFFSET_RANGE.1),
            src.range(OFFSET_RANGE.0, OFFSET_RANGE.1),
        ];
        let scale = src.range(SCALE_RANGE.0, SCALE_RANGE.1);

        Self {
            color,
            offset,
            scale,
        }
    }
}

// ── GPU layouts ───────────────────────────────────────────────────────────

/// Static instance layout (12 bytes), uploaded once:
///
///  offset 0  color   [u8; 4]   loc 2  (unorm)
///  offset 4  offset  [f32; 2]  loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StaticInstance {
    pub color: [u8; 4],
    pub offset: [f32; 2],
}

impl StaticInstance {
    pub const SIZE: u64 = std::mem::size_of::<StaticInstance>() as u64;

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        2 => Unorm8x4,  // color
        3 => Float32x2  // offset
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-frame instance layout (8 bytes), rewritten every frame:
///
///  offset 0  scale  [f32; 2]  loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ScaleInstance {
    pub scale: [f32; 2],
}

impl ScaleInstance {
    pub const SIZE: u64 = std::mem::size_of::<ScaleInstance>() as u64;

    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        4 => Float32x2 // scale
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Packs the immutable part of an object.
#[inline]
pub fn encode_static(object: &RingObject) -> [u8; 12] {
    bytemuck::cast(StaticInstance {
        color: object.color,
        offset: object.offset,
    })
}

/// Packs one effective `(x, y)` scale.
#[inline]
pub fn encode_scale(x: f32, y: f32) -> [u8; 8] {
    bytemuck::cast(ScaleInstance { scale: [x, y] })
}

// ── CPU store ─────────────────────────────────────────────────────────────

/// Fixed-size object population plus the scratch buffer refilled each frame.
#[derive(Debug, Clone)]
pub struct InstanceStore {
    objects: Vec<RingObject>,
    frame_scales: Vec<ScaleInstance>,
}

impl InstanceStore {
    pub fn generate<R: Rng>(count: usize, src: &mut RandomSource<R>) -> Self {
        let objects = (0..count).map(|_| RingObject::random(src)).collect();
        Self::from_objects(objects)
    }

    pub fn from_objects(objects: Vec<RingObject>) -> Self {
        let frame_scales = vec![ScaleInstance::zeroed(); objects.len()];
        Self {
            objects,
            frame_scales,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn objects(&self) -> &[RingObject] {
        &self.objects
    }

    pub fn static_bytes(&self) -> Vec<u8> {
        self.objects.iter().flat_map(encode_static).collect()
    }

    /// Refills the per-frame buffer with `(scale / aspect, scale)` for every object.
    ///
    /// Dividing X by the aspect ratio keeps rings round in non-square surfaces.
    pub fn compute_frame_scales(&mut self, aspect: f32) -> &[u8] {
        for (out, object) in self.frame_scales.iter_mut().zip(&self.objects) {
            out.scale = [object.scale / aspect, object.scale];
        }
        bytemuck::cast_slice(&self.frame_scales)
    }
}

// ── GPU buffers ───────────────────────────────────────────────────────────

/// Backend buffers holding the static and per-frame instance data.
pub struct InstanceBuffers<B: Backend> {
    pub static_vbo: SizedBuffer<B::Buffer>,
    pub scale_vbo: SizedBuffer<B::Buffer>,
}

impl<B: Backend> InstanceBuffers<B> {
    /// Allocates both buffers for `store.len()` objects and uploads the static data once.
    ///
    /// The scale buffer stays unwritten until the first frame.
    pub fn initialize(backend: &mut B, store: &InstanceStore) -> Result<Self, RenderError> {
        let count = store.len() as u64;

        let static_vbo = SizedBuffer::create(
            backend,
            "annulus static instance vbo",
            count * StaticInstance::SIZE,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )?;
        let scale_vbo = SizedBuffer::create(
            backend,
            "annulus scale instance vbo",
            count * ScaleInstance::SIZE,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )?;

        static_vbo.upload(backend, &store.static_bytes())?;
        log::info!("uploaded static instance data for {count} objects");

        Ok(Self {
            static_vbo,
            scale_vbo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Op, RecordingBackend};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn store(count: usize) -> InstanceStore {
        let mut src = RandomSource::from_rng(StdRng::seed_from_u64(7));
        InstanceStore::generate(count, &mut src)
    }

    #[test]
    fn layouts_match_backend_contract() {
        assert_eq!(StaticInstance::SIZE, 12);
        assert_eq!(ScaleInstance::SIZE, 8);

        let s = StaticInstance::layout();
        assert_eq!(s.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(
            s.attributes.iter().map(|a| (a.shader_location, a.offset)).collect::<Vec<_>>(),
            vec![(2, 0), (3, 4)]
        );

        let d = ScaleInstance::layout();
        assert_eq!(d.array_stride, 8);
        assert_eq!(d.attributes[0].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn encode_static_places_color_before_offset() {
        let object = RingObject {
            color: [1, 2, 3, 255],
            offset: [0.5, -0.25],
            scale: 0.3,
        };
        let bytes = encode_static(&object);
        assert_eq!(&bytes[0..4], &[1, 2, 3, 255]);
        assert_eq!(&bytes[4..8], &0.5f32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &(-0.25f32).to_ne_bytes());
    }

    #[test]
    fn encode_scale_is_x_then_y() {
        let bytes = encode_scale(0.125, 0.25);
        assert_eq!(&bytes[0..4], &0.125f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &0.25f32.to_ne_bytes());
    }

    #[test]
    fn generated_objects_respect_ranges() {
        let store = store(1000);
        for object in store.objects() {
            assert_eq!(object.color[3], 255);
            for v in object.offset {
                assert!((-0.9..0.9).contains(&v), "offset {v}");
            }
            assert!((0.2..0.5).contains(&object.scale), "scale {}", object.scale);
        }
    }

    #[test]
    fn static_bytes_are_twelve_per_object() {
        assert_eq!(store(100).static_bytes().len(), 1200);
    }

    #[test]
    fn frame_scales_divide_x_by_aspect() {
        let mut store = InstanceStore::from_objects(vec![RingObject {
            color: [0, 0, 0, 255],
            offset: [0.0, 0.0],
            scale: 0.4,
        }]);
        let bytes = store.compute_frame_scales(2.0).to_vec();
        assert_eq!(bytes, encode_scale(0.2, 0.4).to_vec());
    }

    #[test]
    fn frame_scales_are_pure() {
        let mut store = store(100);
        let a = store.compute_frame_scales(4.0 / 3.0).to_vec();
        let b = store.compute_frame_scales(4.0 / 3.0).to_vec();
        assert_eq!(a, b);
        assert_eq!(a.len(), 800);

        let other = store.compute_frame_scales(1.0).to_vec();
        assert_ne!(a, other);
        assert_eq!(store.compute_frame_scales(4.0 / 3.0), &a[..]);
    }

    #[test]
    fn initialize_sizes_buffers_and_uploads_static_once() {
        let mut backend = RecordingBackend::default();
        let store = store(100);
        let buffers = InstanceBuffers::initialize(&mut backend, &store).unwrap();

        assert_eq!(buffers.static_vbo.size(), 1200);
        assert_eq!(buffers.scale_vbo.size(), 800);

        let writes: Vec<_> = backend
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::Write { buffer, len, .. } => Some((*buffer, *len)),
                _ => None,
            })
            .collect();
        assert_eq!(writes, vec![(*buffers.static_vbo.handle(), 1200)]);
    }
}
