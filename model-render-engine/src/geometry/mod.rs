//! Pure measurement geometry, independent of the renderer.
//!
//! Everything in here is a total function over its inputs: triangle
//! sampling from raw vertex buffers, significant-edge extraction,
//! distance/extent/area primitives, and ray intersection used by the
//! screen-to-world picker. Renderer state never leaks in; the tools
//! layer feeds these routines and owns the resulting annotations.

/// Significant-edge extraction from triangle soup.
pub mod edges;

/// Error taxonomy for measurement routines.
pub mod error;

/// Distance, bounding extent, surface area and midpoint primitives.
pub mod measure;

/// Ray intersection routines backing the screen-to-world picker.
pub mod ray;

/// Triangle iteration over flat position and index buffers.
pub mod sampler;
