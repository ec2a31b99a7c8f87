use crate::device::{GpuFrame, SurfaceErrorAction};
use crate::transform::TransformState;
use crate::uniform::{self, Uniform};

use super::GpuResources;

/// GPU side of a frame, as seen by [`FrameRenderer`].
///
/// The seam lets the per-frame protocol run against a recording double in
/// tests; [`GpuResources`] is the real implementation.
pub trait RenderBackend {
    /// Acquired drawable plus whatever records into it.
    type Target;

    /// Acquires this tick's render target. `Err` means there is none.
    fn acquire_target(&mut self) -> Result<Self::Target, SurfaceErrorAction>;

    /// Overwrites the uniform buffer in place.
    fn write_uniform(&mut self, uniform: &Uniform);

    /// Clears, binds pipeline/vertex buffer/uniforms/texture, draws the
    /// strip, then submits and schedules presentation.
    fn draw_and_present(&mut self, target: Self::Target, clear: wgpu::Color);
}

/// Result of one tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// No render target this tick; nothing was written or submitted.
    Skipped,
    /// The surface cannot recover; the runtime should shut down.
    Fatal,
}

/// Drives one frame per display tick.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    viewport_size: [i32; 2],
    clear_color: wgpu::Color,
    frame_index: u64,
}

impl FrameRenderer {
    pub fn new(viewport_width: u32, viewport_height: u32, clear_color: wgpu::Color) -> Self {
        let mut renderer = Self {
            viewport_size: [0, 0],
            clear_color,
            frame_index: 0,
        };
        renderer.resize(viewport_width, viewport_height);
        renderer
    }

    /// Records the new drawable size for the next uniform block.
    ///
    /// Idempotent; no GPU resources are reallocated.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport_size = [
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        ];
    }

    pub fn viewport_size(&self) -> [i32; 2] {
        self.viewport_size
    }

    /// Number of frames presented so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Runs the frame protocol once.
    ///
    /// 1. snapshot the transform and pack the uniform block,
    /// 2. acquire the render target, or skip the whole tick,
    /// 3. overwrite the uniform buffer,
    /// 4. encode the draw, submit and present.
    pub fn render<B: RenderBackend>(&mut self, backend: &mut B, state: &TransformState) -> FrameOutcome {
        let uniform = uniform::pack(&state.current(), self.viewport_size);

        let target = match backend.acquire_target() {
            Ok(t) => t,
            Err(action) if action.is_fatal() => {
                log::error!("surface is unrecoverable ({action:?})");
                return FrameOutcome::Fatal;
            }
            Err(action) => {
                log::debug!("frame {} skipped ({action:?})", self.frame_index);
                return FrameOutcome::Skipped;
            }
        };

        backend.write_uniform(&uniform);
        backend.draw_and_present(target, self.clear_color);

        self.frame_index = self.frame_index.wrapping_add(1);
        FrameOutcome::Presented
    }
}

impl<'w> RenderBackend for GpuResources<'w> {
    type Target = GpuFrame;

    fn acquire_target(&mut self) -> Result<GpuFrame, SurfaceErrorAction> {
        match self.gpu().begin_frame() {
            Ok(frame) => Ok(frame),
            Err(err) => Err(self.gpu_mut().handle_surface_error(err)),
        }
    }

    fn write_uniform(&mut self, uniform: &Uniform) {
        GpuResources::write_uniform(self, uniform);
    }

    fn draw_and_present(&mut self, mut frame: GpuFrame, clear: wgpu::Color) {
        self.encode_draw(&mut frame.encoder, &frame.view, clear);
        self.gpu().present(frame);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec2, Vec3};

    use super::*;

    const GREY: wgpu::Color = wgpu::Color { r: 0.65, g: 0.65, b: 0.65, a: 1.0 };

    /// Records what the renderer asks of the GPU.
    struct RecordingBackend {
        next_acquire: Result<(), SurfaceErrorAction>,
        uniform_writes: Vec<Uniform>,
        submissions: usize,
        clears: Vec<wgpu::Color>,
    }

    impl RecordingBackend {
        fn ready() -> Self {
            Self {
                next_acquire: Ok(()),
                uniform_writes: Vec::new(),
                submissions: 0,
                clears: Vec::new(),
            }
        }

        fn failing(action: SurfaceErrorAction) -> Self {
            Self { next_acquire: Err(action), ..Self::ready() }
        }
    }

    impl RenderBackend for RecordingBackend {
        type Target = ();

        fn acquire_target(&mut self) -> Result<(), SurfaceErrorAction> {
            self.next_acquire
        }

        fn write_uniform(&mut self, uniform: &Uniform) {
            self.uniform_writes.push(*uniform);
        }

        fn draw_and_present(&mut self, _target: (), clear: wgpu::Color) {
            assert!(
                !self.uniform_writes.is_empty(),
                "uniform must be written before the draw is encoded"
            );
            self.submissions += 1;
            self.clears.push(clear);
        }
    }

    #[test]
    fn fresh_setup_draws_identity() {
        let mut r = FrameRenderer::new(800, 600, GREY);
        let mut backend = RecordingBackend::ready();

        assert_eq!(r.render(&mut backend, &TransformState::new()), FrameOutcome::Presented);

        assert_eq!(backend.submissions, 1);
        assert_eq!(backend.clears, vec![GREY]);
        let u = backend.uniform_writes[0];
        assert_eq!(u.viewport_size, [800, 600]);
        assert_eq!(u.model(), Mat4::IDENTITY);
        assert_eq!(u.view(), Mat4::IDENTITY);
    }

    #[test]
    fn each_frame_rewrites_uniform_with_latest_transform() {
        let mut r = FrameRenderer::new(100, 100, GREY);
        let mut backend = RecordingBackend::ready();
        let mut state = TransformState::new();

        r.render(&mut backend, &state);
        state.on_pan_begin();
        state.on_pan_update(Vec2::new(10.0, -4.0));
        r.render(&mut backend, &state);

        assert_eq!(backend.uniform_writes.len(), 2);
        assert_eq!(
            backend.uniform_writes[1].view(),
            Mat4::from_translation(Vec3::new(10.0, 4.0, 0.0))
        );
        assert_eq!(r.frame_index(), 2);
    }

    #[test]
    fn missing_target_skips_the_whole_frame() {
        let mut r = FrameRenderer::new(100, 100, GREY);
        let mut backend = RecordingBackend::failing(SurfaceErrorAction::SkipFrame);

        assert_eq!(r.render(&mut backend, &TransformState::new()), FrameOutcome::Skipped);
        assert_eq!(backend.submissions, 0);
        assert!(backend.uniform_writes.is_empty());
        assert_eq!(r.frame_index(), 0);
    }

    #[test]
    fn reconfigured_surface_skips_then_resumes() {
        let mut r = FrameRenderer::new(100, 100, GREY);
        let mut backend = RecordingBackend::failing(SurfaceErrorAction::Reconfigured);
        let state = TransformState::new();

        assert_eq!(r.render(&mut backend, &state), FrameOutcome::Skipped);
        backend.next_acquire = Ok(());
        assert_eq!(r.render(&mut backend, &state), FrameOutcome::Presented);
        assert_eq!(backend.submissions, 1);
        assert_eq!(backend.uniform_writes.len(), 1);
    }

    #[test]
    fn fatal_surface_error_is_reported() {
        let mut r = FrameRenderer::new(100, 100, GREY);
        let mut backend = RecordingBackend::failing(SurfaceErrorAction::Fatal);

        assert_eq!(r.render(&mut backend, &TransformState::new()), FrameOutcome::Fatal);
        assert_eq!(backend.submissions, 0);
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let mut r = FrameRenderer::new(100, 100, GREY);
        for _ in 0..5 {
            r.resize(1920, 1080);
            assert_eq!(r.viewport_size(), [1920, 1080]);
        }

        let mut backend = RecordingBackend::ready();
        r.render(&mut backend, &TransformState::new());
        assert_eq!(backend.uniform_writes[0].viewport_size, [1920, 1080]);
    }

    #[test]
    fn zoom_twice_compounds_in_model_matrix() {
        let mut r = FrameRenderer::new(100, 100, GREY);
        let mut backend = RecordingBackend::ready();
        let mut state = TransformState::new();

        state.on_zoom_begin();
        state.on_zoom_update(2.0);
        state.on_zoom_begin();
        state.on_zoom_update(1.5);
        r.render(&mut backend, &state);

        let model = backend.uniform_writes[0].model();
        assert_eq!(model, Mat4::from_scale(Vec3::new(3.0, 3.0, 1.0)));
    }
}
