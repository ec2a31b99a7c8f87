//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires input, transform and
//! rendering together on the event-loop thread.

mod runtime;

pub use runtime::Runtime;
pub use winit::dpi::LogicalSize;
