use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

use crate::input::{GestureEvent, GesturePhase};

/// Zoom applied per wheel line.
const WHEEL_ZOOM_STEP: f32 = 1.1;

/// Pixels of a high-precision wheel delta counted as one line.
const WHEEL_PIXELS_PER_LINE: f32 = 40.0;

/// Smallest per-event pinch multiplier; keeps the scale positive.
const MIN_PINCH_STEP: f32 = 0.05;

/// Turns winit window events into gesture events.
///
/// winit reports touchpad gestures as per-event increments. The transform
/// expects totals measured from the gesture start, so the tracker keeps one
/// running total per axis and resets it on `Started`.
///
/// Desktop fallbacks: a left-button drag is a pan and each wheel notch is a
/// complete (began, changed, ended) zoom gesture.
///
/// Each transform axis has one open gesture at a time. A touchpad pan
/// replaces a running drag, a press during a touchpad pan is ignored, and a
/// wheel notch during a pinch is folded into the pinch total.
#[derive(Debug)]
pub struct GestureTracker {
    /// Last cursor position in physical pixels.
    pointer_pos: Option<Vec2>,
    /// Cursor position when the left button went down.
    drag_origin: Option<Vec2>,

    touch_pan_active: bool,
    pinch_active: bool,

    pan_total: Vec2,
    zoom_total: f32,
    rotation_total: f32,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self {
            pointer_pos: None,
            drag_origin: None,
            touch_pan_active: false,
            pinch_active: false,
            pan_total: Vec2::ZERO,
            zoom_total: 1.0,
            rotation_total: 0.0,
        }
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates one window event, appending any resulting gestures to `out`.
    pub fn translate(&mut self, event: &WindowEvent, out: &mut Vec<GestureEvent>) {
        match event {
            WindowEvent::PanGesture { delta, phase, .. } => {
                out.push(self.touchpad_pan(*phase, Vec2::new(delta.x, delta.y)));
            }

            WindowEvent::PinchGesture { delta, phase, .. } => {
                out.push(self.touchpad_pinch(*phase, *delta as f32));
            }

            WindowEvent::RotationGesture { delta, phase, .. } => {
                out.push(self.touchpad_rotation(*phase, *delta));
            }

            WindowEvent::CursorMoved { position, .. } => {
                out.extend(self.pointer_moved(to_vec2(*position)));
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                out.extend(self.left_button(*state));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / WHEEL_PIXELS_PER_LINE,
                };
                self.wheel(lines, out);
            }

            // Losing the pointer mid-drag must not leave a pan half-open.
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                out.extend(self.end_drag());
            }

            _ => {}
        }
    }

    /// Accumulates a touchpad pan increment (pixels).
    pub fn touchpad_pan(&mut self, phase: TouchPhase, delta: Vec2) -> GestureEvent {
        match phase {
            // The Began below rebases on whatever the drag reached.
            TouchPhase::Started => {
                self.touch_pan_active = true;
                self.drag_origin = None;
            }
            TouchPhase::Ended | TouchPhase::Cancelled => self.touch_pan_active = false,
            TouchPhase::Moved => {}
        }

        let phase = self.accumulate(phase, |t| t.pan_total = Vec2::ZERO, |t| t.pan_total += delta);
        GestureEvent::Pan { phase, translation: self.pan_total }
    }

    /// Accumulates a touchpad pinch increment (positive magnifies).
    pub fn touchpad_pinch(&mut self, phase: TouchPhase, delta: f32) -> GestureEvent {
        self.pinch_active = matches!(phase, TouchPhase::Started | TouchPhase::Moved);

        let step = (1.0 + delta).max(MIN_PINCH_STEP);
        let phase = self.accumulate(phase, |t| t.zoom_total = 1.0, |t| t.zoom_total *= step);
        GestureEvent::Zoom { phase, factor: self.zoom_total }
    }

    /// Accumulates a touchpad rotation increment.
    ///
    /// winit reports degrees, counter-clockwise positive; the gesture stream
    /// carries radians, clockwise positive.
    pub fn touchpad_rotation(&mut self, phase: TouchPhase, delta_degrees: f32) -> GestureEvent {
        let step = -delta_degrees.to_radians();
        let phase = self.accumulate(
            phase,
            |t| t.rotation_total = 0.0,
            |t| t.rotation_total += step,
        );
        GestureEvent::Rotate { phase, angle: self.rotation_total }
    }

    fn accumulate(
        &mut self,
        phase: TouchPhase,
        reset: impl FnOnce(&mut Self),
        add: impl FnOnce(&mut Self),
    ) -> GesturePhase {
        match phase {
            TouchPhase::Started => {
                reset(self);
                GesturePhase::Began
            }
            TouchPhase::Moved => {
                add(self);
                GesturePhase::Changed
            }
            TouchPhase::Ended | TouchPhase::Cancelled => GesturePhase::Ended,
        }
    }

    fn pointer_moved(&mut self, pos: Vec2) -> Option<GestureEvent> {
        self.pointer_pos = Some(pos);
        let origin = self.drag_origin?;
        Some(GestureEvent::Pan {
            phase: GesturePhase::Changed,
            translation: pos - origin,
        })
    }

    fn left_button(&mut self, state: ElementState) -> Option<GestureEvent> {
        match state {
            ElementState::Pressed => {
                if self.touch_pan_active {
                    return None;
                }
                let origin = self.pointer_pos?;
                self.drag_origin = Some(origin);
                Some(GestureEvent::Pan {
                    phase: GesturePhase::Began,
                    translation: Vec2::ZERO,
                })
            }
            ElementState::Released => self.end_drag(),
        }
    }

    fn end_drag(&mut self) -> Option<GestureEvent> {
        let origin = self.drag_origin.take()?;
        let translation = self.pointer_pos.map_or(Vec2::ZERO, |p| p - origin);
        Some(GestureEvent::Pan {
            phase: GesturePhase::Ended,
            translation,
        })
    }

    fn wheel(&mut self, lines: f32, out: &mut Vec<GestureEvent>) {
        let factor = WHEEL_ZOOM_STEP.powf(lines);

        if self.pinch_active {
            self.zoom_total *= factor;
            out.push(GestureEvent::Zoom {
                phase: GesturePhase::Changed,
                factor: self.zoom_total,
            });
            return;
        }

        out.extend([
            GestureEvent::Zoom { phase: GesturePhase::Began, factor: 1.0 },
            GestureEvent::Zoom { phase: GesturePhase::Changed, factor },
            GestureEvent::Zoom { phase: GesturePhase::Ended, factor },
        ]);
    }
}

fn to_vec2(pos: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(pos.x as f32, pos.y as f32)
}
