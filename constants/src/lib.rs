//! Shared tunables for the model viewer.
//!
//! Compile-time settings used by both the measurement subsystem and the
//! annotation rendering systems, kept in one crate so the engine and any
//! future preprocessing tools agree on them.

/// Edge significance filter and measurement parameters.
pub mod measurement;

/// Visual sizes and colours for annotation primitives.
pub mod render_settings;
