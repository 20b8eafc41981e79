//! Viewer engine: application wiring, model loading, camera and overlay
//! systems.

pub mod assets;
pub mod camera;
pub mod core;
pub mod scene;
pub mod systems;
