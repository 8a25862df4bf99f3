//! Typed configuration with defaults. There is no CLI or config file.

use winit::dpi::LogicalSize;

use crate::logging::LoggingConfig;
use crate::render::RingDesc;

/// Everything the viewer needs to start.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub runtime: RuntimeConfig,
    pub backend: BackendConfig,
    pub scene: SceneConfig,
    pub logging: LoggingConfig,
}

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "annulus".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Initialization parameters for the wgpu backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// If unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: Some(wgpu::CompositeAlphaMode::Opaque),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Population and geometry of the rendered field.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Fixed for the lifetime of the scene.
    pub object_count: usize,
    pub ring: RingDesc,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            object_count: 100,
            ring: RingDesc::new(0.5, 0.25, 24),
        }
    }
}
