//! Viewer configuration.

use std::path::PathBuf;

use winit::dpi::LogicalSize;

use crate::render::{ShaderSource, TextureSource};

pub use crate::device::GpuInit;

/// Background behind the quad.
pub const DEFAULT_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.65,
    g: 0.65,
    b: 0.65,
    a: 1.0,
};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "pinchview".to_string(),
            initial_size: LogicalSize::new(1280.0, 800.0),
        }
    }
}

/// What the viewer shows and how.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub texture: TextureSource,
    pub shader: ShaderSource,
    pub clear_color: wgpu::Color,
}

impl ViewerConfig {
    pub fn new(texture: TextureSource) -> Self {
        Self {
            texture,
            shader: ShaderSource::builtin(),
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(TextureSource::Path(path.into()))
    }

    pub fn with_shader(mut self, shader: ShaderSource) -> Self {
        self.shader = shader;
        self
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_builtin_shader_and_grey_background() {
        let cfg = ViewerConfig::from_path("photo.jpg");
        assert_eq!(cfg.shader.label, ShaderSource::builtin().label);
        assert_eq!(cfg.clear_color, DEFAULT_CLEAR_COLOR);
        assert_eq!(cfg.texture.name(), "photo.jpg");
    }

    #[test]
    fn builder_overrides_apply() {
        let cfg = ViewerConfig::from_path("photo.jpg")
            .with_shader(ShaderSource::custom("mine.wgsl", "// empty"))
            .with_clear_color(wgpu::Color::BLACK);
        assert_eq!(cfg.shader.label, "mine.wgsl");
        assert_eq!(cfg.clear_color, wgpu::Color::BLACK);
    }
}
