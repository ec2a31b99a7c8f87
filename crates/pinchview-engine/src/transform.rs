//! Gesture-driven view transform.
//!
//! Each axis (pan, zoom, rotate) keeps a baseline captured when its gesture
//! begins and a live value. Invariant: `live = baseline ⊕ delta-since-begin`,
//! where ⊕ is `+` for pan and rotate and `*` for zoom. Axes never touch each
//! other's state, so concurrent gestures compose.
//!
//! The state is single-writer (gesture callbacks) and single-reader (frame
//! start). Both run on the event-loop thread. [`TransformState::current`]
//! returns a `Copy` snapshot so a reader always sees all three axes from the
//! same instant.

use glam::Vec2;

use crate::input::{GestureEvent, GesturePhase};

/// Snapshot of the committed transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    /// View translation in pixels, +Y up.
    pub translation: Vec2,
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation in radians, clockwise positive (gesture convention).
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec2::ZERO,
        scale: 1.0,
        rotation: 0.0,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub struct TransformState {
    translation: Vec2,
    translation_base: Vec2,

    scale: f32,
    scale_base: f32,

    rotation: f32,
    rotation_base: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            translation_base: Vec2::ZERO,
            scale: 1.0,
            scale_base: 1.0,
            rotation: 0.0,
            rotation_base: 0.0,
        }
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pan_begin(&mut self) {
        self.translation_base = self.translation;
    }

    /// `delta` is the screen translation since the pan began (+Y down).
    ///
    /// Screen Y grows downwards while the view space grows upwards, so the Y
    /// component is subtracted.
    pub fn on_pan_update(&mut self, delta: Vec2) {
        self.translation = Vec2::new(
            self.translation_base.x + delta.x,
            self.translation_base.y - delta.y,
        );
    }

    pub fn on_zoom_begin(&mut self) {
        self.scale_base = self.scale;
    }

    /// `factor` is the magnification since the zoom began.
    pub fn on_zoom_update(&mut self, factor: f32) {
        self.scale = self.scale_base * factor;
    }

    pub fn on_rotate_begin(&mut self) {
        self.rotation_base = self.rotation;
    }

    /// `angle` is the clockwise rotation in radians since the rotation began.
    pub fn on_rotate_update(&mut self, angle: f32) {
        self.rotation = self.rotation_base + angle;
    }

    /// Routes a gesture event to the matching axis.
    ///
    /// `Ended` keeps the last committed value; the next `Began` snapshots it.
    pub fn apply(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Pan { phase, translation } => match phase {
                GesturePhase::Began => self.on_pan_begin(),
                GesturePhase::Changed => self.on_pan_update(translation),
                GesturePhase::Ended => {}
            },
            GestureEvent::Zoom { phase, factor } => match phase {
                GesturePhase::Began => self.on_zoom_begin(),
                GesturePhase::Changed => self.on_zoom_update(factor),
                GesturePhase::Ended => {}
            },
            GestureEvent::Rotate { phase, angle } => match phase {
                GesturePhase::Began => self.on_rotate_begin(),
                GesturePhase::Changed => self.on_rotate_update(angle),
                GesturePhase::Ended => {}
            },
        }
    }

    /// Latest committed values. Never blocks, never fails.
    pub fn current(&self) -> Transform {
        Transform {
            translation: self.translation,
            scale: self.scale,
            rotation: self.rotation,
        }
    }
}
