//! Per-frame uniform block.
//!
//! Byte layout (matches `Uniforms` in `render/shaders/quad.wgsl`):
//!
//! | offset | size | field          |
//! |--------|------|----------------|
//! | 0      | 8    | viewport_size  |
//! | 8      | 8    | padding        |
//! | 16     | 64   | model_matrix   |
//! | 80     | 64   | view_matrix    |
//!
//! Matrices are column-major, as WGSL reads them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::transform::Transform;

pub const VIEWPORT_SIZE_OFFSET: usize = 0;
pub const MODEL_MATRIX_OFFSET: usize = 16;
pub const VIEW_MATRIX_OFFSET: usize = 80;
pub const UNIFORM_SIZE: usize = 144;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniform {
    /// Drawable size in physical pixels.
    pub viewport_size: [i32; 2],
    pub _pad: [i32; 2], // mat4x4 needs 16-byte alignment
    pub model_matrix: [[f32; 4]; 4],
    pub view_matrix: [[f32; 4]; 4],
}

impl Uniform {
    /// Raw bytes in the documented layout, ready for `Queue::write_buffer`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model_matrix)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_matrix)
    }
}

/// Builds the uniform block for `transform` on a `viewport_size` drawable.
///
/// Rotation and scale act around the quad's own origin (model matrix); pan is
/// a separate view translation, so pan distance does not depend on zoom.
///
/// The gesture rotation is clockwise positive while `Mat4::from_rotation_z`
/// is counter-clockwise positive, hence the negation.
pub fn pack(transform: &Transform, viewport_size: [i32; 2]) -> Uniform {
    let model = Mat4::from_translation(Vec3::ZERO)
        * Mat4::from_rotation_z(-transform.rotation)
        * Mat4::from_scale(Vec3::new(transform.scale, transform.scale, 1.0));

    let view = Mat4::from_translation(transform.translation.extend(0.0));

    Uniform {
        viewport_size,
        _pad: [0; 2],
        model_matrix: model.to_cols_array_2d(),
        view_matrix: view.to_cols_array_2d(),
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec4};

    use super::*;
    use crate::transform::TransformState;

    fn approx_vec(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    fn f32_at(bytes: &[u8], offset: usize) -> f32 {
        f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn i32_at(bytes: &[u8], offset: usize) -> i32 {
        i32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn field_offsets_follow_gpu_alignment() {
        assert_eq!(std::mem::size_of::<Uniform>(), UNIFORM_SIZE);
        assert_eq!(std::mem::offset_of!(Uniform, viewport_size), VIEWPORT_SIZE_OFFSET);
        assert_eq!(std::mem::offset_of!(Uniform, model_matrix), MODEL_MATRIX_OFFSET);
        assert_eq!(std::mem::offset_of!(Uniform, view_matrix), VIEW_MATRIX_OFFSET);
    }

    #[test]
    fn bytes_land_at_documented_offsets() {
        let t = Transform { translation: Vec2::new(7.0, -3.0), scale: 2.0, rotation: 0.0 };
        let u = pack(&t, [800, 600]);
        let bytes = u.as_bytes();

        assert_eq!(bytes.len(), UNIFORM_SIZE);
        assert_eq!(i32_at(bytes, 0), 800);
        assert_eq!(i32_at(bytes, 4), 600);
        assert!(bytes[8..16].iter().all(|b| *b == 0));

        // model[0][0] is the x scale; view column 3 holds the translation.
        assert_eq!(f32_at(bytes, MODEL_MATRIX_OFFSET), 2.0);
        assert_eq!(f32_at(bytes, VIEW_MATRIX_OFFSET + 48), 7.0);
        assert_eq!(f32_at(bytes, VIEW_MATRIX_OFFSET + 52), -3.0);
        assert_eq!(f32_at(bytes, VIEW_MATRIX_OFFSET + 60), 1.0);
    }

    #[test]
    fn packing_is_deterministic() {
        let t = Transform { translation: Vec2::new(1.5, 2.5), scale: 0.75, rotation: 1.2 };
        let a = pack(&t, [1024, 768]);
        let b = pack(&t, [1024, 768]);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    // ── matrices ──────────────────────────────────────────────────────────

    #[test]
    fn identity_transform_gives_identity_matrices() {
        let u = pack(&TransformState::new().current(), [640, 480]);
        assert_eq!(u.model(), Mat4::IDENTITY);
        assert_eq!(u.view(), Mat4::IDENTITY);
    }

    #[test]
    fn clockwise_gesture_rotates_clockwise_on_screen() {
        let theta = std::f32::consts::FRAC_PI_2;
        let t = Transform { rotation: theta, ..Transform::IDENTITY };
        let u = pack(&t, [1, 1]);

        assert_eq!(u.model(), Mat4::from_rotation_z(-theta));
        // +X maps to -Y: a quarter turn clockwise with +Y up.
        let p = u.model() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx_vec(p, Vec4::new(0.0, -1.0, 0.0, 1.0)));
    }

    #[test]
    fn scale_leaves_z_untouched() {
        let t = Transform { scale: 3.0, ..Transform::IDENTITY };
        let p = pack(&t, [1, 1]).model() * Vec4::new(1.0, 2.0, 5.0, 1.0);
        assert!(approx_vec(p, Vec4::new(3.0, 6.0, 5.0, 1.0)));
    }

    #[test]
    fn pan_is_independent_of_zoom() {
        let base = Transform { translation: Vec2::new(10.0, 4.0), ..Transform::IDENTITY };
        let zoomed = Transform { scale: 5.0, ..base };

        assert_eq!(pack(&base, [1, 1]).view(), pack(&zoomed, [1, 1]).view());

        // The quad's centre lands on the pan offset regardless of zoom.
        let u = pack(&zoomed, [1, 1]);
        let centre = u.view() * u.model() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(approx_vec(centre, Vec4::new(10.0, 4.0, 0.0, 1.0)));
    }

    #[test]
    fn pan_gesture_translates_view() {
        let mut s = TransformState::new();
        s.on_pan_begin();
        s.on_pan_update(Vec2::new(10.0, -4.0));

        let u = pack(&s.current(), [1, 1]);
        assert_eq!(u.view(), Mat4::from_translation(Vec3::new(10.0, 4.0, 0.0)));
        assert_eq!(u.model(), Mat4::IDENTITY);
    }
}
