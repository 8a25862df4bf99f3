use crate::backend::Backend;
use crate::error::RenderError;

/// Drawable surface size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceState {
    pub width: u32,
    pub height: u32,
}

impl SurfaceState {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Clamps both dimensions to `[1, max_dimension]`.
    pub fn clamped(width: u32, height: u32, max_dimension: u32) -> Self {
        let max = max_dimension.max(1);
        Self {
            width: width.clamp(1, max),
            height: height.clamp(1, max),
        }
    }

    /// `width / height`; a zero height is a `DegenerateSurface`.
    pub fn aspect(self) -> Result<f32, RenderError> {
        if self.height == 0 {
            return Err(RenderError::DegenerateSurface {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.width as f32 / self.height as f32)
    }
}

/// Turns surface size notifications into render requests.
///
/// Holds a single pending-request slot: a notification that arrives before the
/// previous request was consumed replaces it (last resize wins).
#[derive(Debug)]
pub struct ResizeCoordinator {
    surface: SurfaceState,
    max_dimension: u32,
    pending: Option<SurfaceState>,
}

impl ResizeCoordinator {
    /// Starts with the given size (clamped) and a pending request for the first frame.
    pub fn new<B: Backend + ?Sized>(backend: &B, width: u32, height: u32) -> Self {
        let max_dimension = backend.max_surface_dimension();
        let surface = SurfaceState::clamped(width, height, max_dimension);
        Self {
            surface,
            max_dimension,
            pending: Some(surface),
        }
    }

    #[inline]
    pub fn surface(&self) -> SurfaceState {
        self.surface
    }

    #[inline]
    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies a size notification.
    ///
    /// Returns `true` when the clamped size changed; the backend surface is then
    /// reconfigured and a render is requested.
    pub fn handle_resize<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> bool {
        let next = SurfaceState::clamped(width, height, self.max_dimension);
        if next == self.surface {
            return false;
        }

        log::debug!(
            "surface resized {}x{} -> {}x{}",
            self.surface.width,
            self.surface.height,
            next.width,
            next.height
        );

        self.surface = next;
        backend.configure_surface(next.width, next.height);

        if self.pending.replace(next).is_some() {
            log::trace!("superseded pending render");
        }
        true
    }

    /// Requests a render of the current surface without a size change
    /// (e.g. the platform asked for a redraw).
    pub fn request_render(&mut self) {
        self.pending = Some(self.surface);
    }

    /// Takes the pending request, if any.
    #[inline]
    pub fn take_pending(&mut self) -> Option<SurfaceState> {
        self.pending.take()
    }
}
