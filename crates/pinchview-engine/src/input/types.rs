use glam::Vec2;

/// Lifecycle phase of a continuous gesture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GesturePhase {
    /// The gesture started; the receiver snapshots its baseline.
    Began,
    /// The gesture moved; the payload is the total since `Began`.
    Changed,
    /// The gesture finished or was cancelled; the last value stays committed.
    Ended,
}

/// Platform-agnostic gesture events.
///
/// Every payload is relative to the gesture start, not to the previous event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GestureEvent {
    /// Translation in screen pixels, +X right, +Y down.
    Pan { phase: GesturePhase, translation: Vec2 },

    /// Magnification factor; 1.0 is "no change".
    Zoom { phase: GesturePhase, factor: f32 },

    /// Rotation in radians, clockwise positive on screen.
    Rotate { phase: GesturePhase, angle: f32 },
}

impl GestureEvent {
    pub fn phase(&self) -> GesturePhase {
        match *self {
            GestureEvent::Pan { phase, .. }
            | GestureEvent::Zoom { phase, .. }
            | GestureEvent::Rotate { phase, .. } => phase,
        }
    }
}
