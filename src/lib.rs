//! Coil
//!
//! Window events fanned out to several consumers, a camera arbiter deciding
//! which camera receives raw input, a fly camera, and a shader helper.

/// winit platform bridge - native window, event pump and frame loop
pub mod app;

/// Cameras and input arbitration
pub mod camera;

/// Profile-based configuration
pub mod config;

/// Current rendering context tracking
pub mod context;

/// Error types and the operation status
pub mod error;

/// Global log sink
pub mod logging;

/// Shader program loading and uniforms
pub mod shader;

/// Frame timing
pub mod time;

/// Window wrapper, native callbacks and subscribers
pub mod window;

pub use error::{CoilError, Status};
