use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::backend::WgpuBackend;
use crate::config::AppConfig;
use crate::error::RenderError;
use crate::random::RandomSource;
use crate::render::RingField;

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs the event loop until it closes or a fatal
    /// render error occurs.
    pub fn run(config: AppConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(anyhow::Error::new(err).context("renderer stopped")),
            None => Ok(()),
        }
    }
}

/// Backend plus the ring field rendering into it.
struct Renderer<'w> {
    backend: WgpuBackend<'w>,
    field: RingField<WgpuBackend<'w>>,
}

impl<'w> Renderer<'w> {
    fn new(window: &'w Window, config: &AppConfig) -> Result<Self, RenderError> {
        let mut backend = pollster::block_on(WgpuBackend::new(window, &config.backend))?;

        let format = backend.surface_format();
        let size = window.inner_size();
        let mut src = RandomSource::new();
        let field = RingField::new(
            &mut backend,
            format,
            &config.scene,
            &mut src,
            size.width,
            size.height,
        )?;

        Ok(Self { backend, field })
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        self.field.resize(&mut self.backend, width, height)
    }

    fn redraw(&mut self) -> Result<bool, RenderError> {
        // Platform-initiated redraws (expose, unminimize) render the current surface.
        if !self.field.has_pending() {
            self.field.request_render();
        }
        self.field.pump(&mut self.backend)
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[not_covariant]
    renderer: Renderer<'this>,
}

struct AppState {
    config: AppConfig,
    entry: Option<WindowEntry>,
    fatal: Option<RenderError>,
}

impl AppState {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            entry: None,
            fatal: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.runtime.title.clone())
            .with_inner_size(self.config.runtime.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let config = &self.config;
        let entry = WindowEntryTryBuilder {
            window,
            renderer_builder: |w| Renderer::new(w, config),
        }
        .try_build()
        .context("renderer initialization failed")?;

        Ok(entry)
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("fatal render error: {err}");
        self.fatal = Some(err);
        self.entry = None;
        event_loop.exit();
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        let Some(entry) = self.entry.as_mut() else { return };
        if entry.with_renderer_mut(|r| r.resize(width, height)) {
            entry.with_window(|w| w.request_redraw());
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                if let Some(render_err) = e.downcast_ref::<RenderError>() {
                    self.fatal = Some(render_err.clone());
                }
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // The scene is static; frames are only drawn on resize or platform redraw.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(size) = self
                    .entry
                    .as_ref()
                    .map(|e| e.with_window(|w| w.inner_size()))
                else {
                    return;
                };
                self.handle_resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                let Some(entry) = self.entry.as_mut() else { return };

                let result = entry.with_mut(|fields| {
                    fields.window.pre_present_notify();
                    fields.renderer.redraw()
                });

                match result {
                    Ok(_) => {}
                    Err(err) if err.is_fatal() => self.stop(event_loop, err),
                    Err(err) => {
                        log::warn!("frame dropped, retrying: {err}");
                        // The field kept the request pending; wake the loop to consume it.
                        entry.with_window(|w| w.request_redraw());
                    }
                }
            }

            _ => {}
        }
    }
}
