//! Model loading and derived model data.

pub mod model_info;
pub mod model_loader;
