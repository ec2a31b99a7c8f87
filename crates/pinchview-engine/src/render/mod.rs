//! GPU rendering subsystem.
//!
//! [`GpuResources`] owns every GPU object and runs the setup protocol;
//! [`FrameRenderer`] runs the per-frame protocol against it.
//!
//! Convention:
//! - quad geometry is in image pixels, centred on the origin, +Y up
//! - the vertex shader converts to NDC using the viewport size uniform

mod frame;
mod resources;
pub mod shader;
pub mod texture;

pub use frame::{FrameOutcome, FrameRenderer, RenderBackend};
pub use resources::{
    GpuResources, QuadResources, BIND_GROUP_INDEX, SAMPLER_BINDING, TEXTURE_BINDING,
    UNIFORM_BINDING, VERTEX_BUFFER_SLOT,
};
pub use shader::ShaderSource;
pub use texture::TextureSource;
