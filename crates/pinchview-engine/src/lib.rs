//! Pinchview engine crate.
//!
//! Owns the GPU resources, the gesture-driven view transform and the per-frame
//! render loop for a single textured quad.

pub mod config;
pub mod device;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod render;
pub mod transform;
pub mod uniform;
pub mod window;
