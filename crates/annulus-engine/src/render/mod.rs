//! Instanced ring rendering.
//!
//! Data flow:
//! - setup: `RingDesc` -> mesh buffers, `RandomSource` -> `InstanceStore` -> static buffer
//! - per frame: surface aspect -> scale buffer -> one indexed, instanced draw
//!
//! Geometry is in clip space (+Y up); no viewport uniform is involved.

mod composer;
mod field;
mod instances;
mod mesh;
mod resize;

pub use composer::{FrameComposer, buffer_layouts};
pub use field::RingField;
pub use instances::{
    InstanceBuffers, InstanceStore, OFFSET_RANGE, RingObject, SCALE_RANGE, ScaleInstance,
    StaticInstance, encode_scale, encode_static,
};
pub use mesh::{RingDesc, RingMesh, RingVertex};
pub use resize::{ResizeCoordinator, SurfaceState};
