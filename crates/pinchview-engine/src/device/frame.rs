/// One acquired drawable plus the command encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// drawable. Finish it with [`Gpu::present`](super::Gpu::present).
pub struct GpuFrame {
    /// The drawable; presented after submission.
    pub surface_texture: wgpu::SurfaceTexture,
    /// Render target view of the drawable.
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
