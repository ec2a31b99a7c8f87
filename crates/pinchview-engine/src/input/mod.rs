//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` turns window-system events into [`GestureEvent`]s whose
//! payloads are measured from the start of the gesture.

pub mod platform;
mod types;

pub use types::{GestureEvent, GesturePhase};
