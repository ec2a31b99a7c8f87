use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::{GpuInit, RuntimeConfig, ViewerConfig};
use crate::error::SetupError;
use crate::input::platform::winit::GestureTracker;
use crate::input::GestureEvent;
use crate::render::{FrameOutcome, FrameRenderer, GpuResources};
use crate::transform::TransformState;

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs setup and drives frames until the window closes.
    ///
    /// Returns the setup error if setup fails, or an error if the surface
    /// becomes unrecoverable.
    pub fn run(runtime: RuntimeConfig, gpu_init: GpuInit, viewer: ViewerConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(runtime, gpu_init, viewer);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Window plus everything that lives exactly as long as it.
///
/// Drop order: GPU resources, then the window they borrow.
#[self_referencing]
struct WindowEntry {
    transform: TransformState,
    gestures: GestureTracker,
    renderer: FrameRenderer,

    window: Window,

    #[borrows(window)]
    #[covariant]
    resources: GpuResources<'this>,
}

struct AppState {
    runtime: RuntimeConfig,
    gpu_init: GpuInit,
    viewer: ViewerConfig,

    entry: Option<WindowEntry>,
    /// Scratch buffer reused across events.
    pending: Vec<GestureEvent>,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(runtime: RuntimeConfig, gpu_init: GpuInit, viewer: ViewerConfig) -> Self {
        Self {
            runtime,
            gpu_init,
            viewer,
            entry: None,
            pending: Vec::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.entry = None;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.runtime.title.clone())
            .with_inner_size(self.runtime.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        let gpu_init = self.gpu_init.clone();
        let viewer = &self.viewer;

        let entry = WindowEntryTryBuilder {
            transform: TransformState::new(),
            gestures: GestureTracker::new(),
            renderer: FrameRenderer::new(size.width, size.height, viewer.clear_color),
            window,
            resources_builder: |w| GpuResources::new(w, gpu_init, viewer),
        }
        .try_build()
        .map_err(|e: SetupError| anyhow::Error::new(e).context("viewer setup failed"))?;

        log::info!("viewer ready ({}x{} drawable)", size.width, size.height);
        Ok(entry)
    }

    fn resize(entry: &mut WindowEntry, new_size: PhysicalSize<u32>) {
        entry.with_mut(|fields| {
            fields.resources.gpu_mut().resize(new_size);
            fields.renderer.resize(new_size.width, new_size.height);
            fields.window.request_redraw();
        });
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
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces it to the display.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let pending = &mut self.pending;
        entry.with_mut(|fields| {
            fields.gestures.translate(&event, pending);
            for gesture in pending.drain(..) {
                fields.transform.apply(gesture);
            }
        });

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => Self::resize(entry, *new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                Self::resize(entry, new_size);
            }

            WindowEvent::RedrawRequested => {
                let outcome = entry.with_mut(|fields| {
                    fields.window.pre_present_notify();
                    fields.renderer.render(fields.resources, fields.transform)
                });

                if outcome == FrameOutcome::Fatal {
                    self.fail(event_loop, anyhow::anyhow!("presentation surface is unrecoverable"));
                }
            }

            _ => {}
        }
    }
}
