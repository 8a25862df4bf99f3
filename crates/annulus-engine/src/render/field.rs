use rand::Rng;

use crate::backend::Backend;
use crate::config::SceneConfig;
use crate::error::RenderError;
use crate::random::RandomSource;

use super::composer::FrameComposer;
use super::resize::{ResizeCoordinator, SurfaceState};

/// Frame composer driven by a resize coordinator.
///
/// Size notifications only queue a render; [`RingField::pump`] is the single
/// place that renders, consuming at most one request per call.
pub struct RingField<B: Backend> {
    composer: FrameComposer<B>,
    coordinator: ResizeCoordinator,
}

impl<B: Backend> RingField<B> {
    pub fn new<R: Rng>(
        backend: &mut B,
        color_format: wgpu::TextureFormat,
        scene: &SceneConfig,
        src: &mut RandomSource<R>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let composer = FrameComposer::new(backend, color_format, scene, src)?;
        let coordinator = ResizeCoordinator::new(&*backend, width, height);
        Ok(Self {
            composer,
            coordinator,
        })
    }

    #[inline]
    pub fn composer(&self) -> &FrameComposer<B> {
        &self.composer
    }

    #[inline]
    pub fn surface(&self) -> SurfaceState {
        self.coordinator.surface()
    }

    /// Forwards a surface size notification. Returns `true` if a render is now pending.
    pub fn resize(&mut self, backend: &mut B, width: u32, height: u32) -> bool {
        self.coordinator.handle_resize(backend, width, height)
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.coordinator.has_pending()
    }

    pub fn request_render(&mut self) {
        self.coordinator.request_render();
    }

    /// Renders the pending request, if any. Returns whether a frame was drawn.
    ///
    /// A recoverable failure drops the frame but leaves a request pending, so the
    /// next pump retries from unchanged state.
    pub fn pump(&mut self, backend: &mut B) -> Result<bool, RenderError> {
        let Some(surface) = self.coordinator.take_pending() else {
            return Ok(false);
        };
        if let Err(err) = self.composer.render_frame(backend, surface) {
            if !err.is_fatal() {
                self.coordinator.request_render();
            }
            return Err(err);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Op, RecordingBackend};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field(backend: &mut RecordingBackend, w: u32, h: u32) -> RingField<RecordingBackend> {
        let mut src = RandomSource::from_rng(StdRng::seed_from_u64(3));
        RingField::new(
            backend,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &SceneConfig::default(),
            &mut src,
            w,
            h,
        )
        .unwrap()
    }

    fn draws(backend: &RecordingBackend) -> usize {
        backend
            .ops()
            .iter()
            .filter(|op| matches!(op, Op::Draw { .. }))
            .count()
    }

    #[test]
    fn first_pump_renders_initial_frame() {
        let mut backend = RecordingBackend::default();
        let mut field = field(&mut backend, 800, 600);

        assert!(field.pump(&mut backend).unwrap());
        assert!(!field.pump(&mut backend).unwrap());
        assert_eq!(draws(&backend), 1);
    }

    #[test]
    fn burst_of_resizes_renders_once() {
        let mut backend = RecordingBackend::default();
        let mut field = field(&mut backend, 800, 600);
        field.pump(&mut backend).unwrap();
        backend.clear();

        assert!(field.resize(&mut backend, 900, 600));
        assert!(field.resize(&mut backend, 1000, 600));
        assert!(field.resize(&mut backend, 1100, 0));

        assert!(field.pump(&mut backend).unwrap());
        assert!(!field.pump(&mut backend).unwrap());
        assert_eq!(draws(&backend), 1);
        assert_eq!(field.surface(), SurfaceState::new(1100, 1));
        assert_eq!(
            backend.ops().iter().filter(|op| matches!(op, Op::ConfigureSurface { .. })).count(),
            3
        );
    }

    #[test]
    fn same_size_notification_is_ignored() {
        let mut backend = RecordingBackend::default();
        let mut field = field(&mut backend, 800, 600);
        field.pump(&mut backend).unwrap();
        backend.clear();

        assert!(!field.resize(&mut backend, 800, 600));
        assert!(!field.pump(&mut backend).unwrap());
        assert!(backend.ops().is_empty());
    }

    #[test]
    fn recoverable_failure_is_retried_on_next_pump() {
        let mut backend = RecordingBackend::default();
        let mut field = field(&mut backend, 800, 600);

        backend.fail_draws = Some(RenderError::BackendSubmission {
            reason: "lost".into(),
            recoverable: true,
        });
        assert!(field.pump(&mut backend).is_err());
        assert!(field.has_pending());

        backend.fail_draws = None;
        assert!(field.pump(&mut backend).unwrap());
        assert!(!field.pump(&mut backend).unwrap());
        assert_eq!(draws(&backend), 1);
        assert_eq!(field.composer().instance_count(), 100);
    }

    #[test]
    fn retry_after_failure_uses_latest_size() {
        let mut backend = RecordingBackend::default();
        let mut field = field(&mut backend, 800, 600);

        backend.fail_draws = Some(RenderError::BackendSubmission {
            reason: "outdated".into(),
            recoverable: true,
        });
        assert!(field.pump(&mut backend).is_err());
        field.resize(&mut backend, 1024, 768);

        backend.fail_draws = None;
        assert!(field.pump(&mut backend).unwrap());
        assert!(!field.has_pending());
        assert_eq!(field.surface(), SurfaceState::new(1024, 768));
    }

    #[test]
    fn fatal_failure_is_not_retried() {
        let mut backend = RecordingBackend::default();
        let mut field = field(&mut backend, 800, 600);

        backend.fail_draws = Some(RenderError::BackendSubmission {
            reason: "out of memory".into(),
            recoverable: false,
        });
        assert!(field.pump(&mut backend).unwrap_err().is_fatal());
        assert!(!field.has_pending());
        assert!(!field.pump(&mut backend).unwrap());
    }
}
