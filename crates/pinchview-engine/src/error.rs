//! Setup error taxonomy.
//!
//! Every variant is fatal: the viewer cannot run without a device, a pipeline
//! and a texture. Steady-state surface problems are not errors; they are
//! reported as [`SurfaceErrorAction`](crate::device::SurfaceErrorAction) and
//! cost at most one skipped frame.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// The window surface could not be created or exposes no usable format.
    #[error("presentation surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// No compatible adapter, or the adapter refused to create a device.
    #[error("no compatible GPU device: {0}")]
    DeviceUnavailable(String),

    /// WGSL failed to parse or validate. `diagnostic` is the compiler output.
    #[error("shader `{label}` failed to compile:\n{diagnostic}")]
    ShaderCompilation { label: String, diagnostic: String },

    /// The shader compiled but cannot be linked into the render pipeline.
    #[error("render pipeline creation failed: {0}")]
    PipelineCreation(String),

    /// The texture asset is missing, unreadable or in an unsupported format.
    #[error("failed to load texture `{source_name}`: {reason}")]
    TextureLoad { source_name: String, reason: String },
}

pub type SetupResult<T> = std::result::Result<T, SetupError>;
