use std::borrow::Cow;

use wgpu::naga;

use crate::error::{SetupError, SetupResult};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

const BUILTIN_QUAD_WGSL: &str = include_str!("shaders/quad.wgsl");

/// A vertex+fragment stage pair in WGSL.
///
/// Any replacement must keep the bindings of the built-in shader: vertex
/// buffer at slot 0, `Uniforms` at group 0 binding 0, texture at binding 1,
/// sampler at binding 2, and the `vs_main` / `fs_main` entry points.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub label: String,
    pub wgsl: Cow<'static, str>,
}

impl ShaderSource {
    pub fn builtin() -> Self {
        Self {
            label: "quad.wgsl".to_string(),
            wgsl: Cow::Borrowed(BUILTIN_QUAD_WGSL),
        }
    }

    pub fn custom(label: impl Into<String>, wgsl: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            wgsl: Cow::Owned(wgsl.into()),
        }
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parses and validates `source` ahead of pipeline creation.
///
/// wgpu reports invalid modules through its uncaptured-error handler, which
/// panics by default. Running naga here turns the same diagnostics into a
/// [`SetupError`] instead.
pub fn validate(source: &ShaderSource) -> SetupResult<()> {
    let wgsl = source.wgsl.as_ref();

    let module = naga::front::wgsl::parse_str(wgsl).map_err(|e| SetupError::ShaderCompilation {
        label: source.label.clone(),
        diagnostic: e.emit_to_string(wgsl),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| SetupError::ShaderCompilation {
        label: source.label.clone(),
        diagnostic: e.emit_to_string(wgsl),
    })?;

    for (name, stage) in [
        (VERTEX_ENTRY, naga::ShaderStage::Vertex),
        (FRAGMENT_ENTRY, naga::ShaderStage::Fragment),
    ] {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage);
        if !found {
            return Err(SetupError::PipelineCreation(format!(
                "shader `{}` has no {stage:?} entry point `{name}`",
                source.label
            )));
        }
    }

    Ok(())
}
