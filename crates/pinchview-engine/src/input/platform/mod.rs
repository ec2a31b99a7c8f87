//! Platform adapters producing [`GestureEvent`](super::GestureEvent)s.

pub mod winit;
