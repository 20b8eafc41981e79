use thiserror::Error;

/// Failures surfaced by the measurement routines.
///
/// None of these are fatal to the viewer: callers degrade the dependent
/// display field and leave the rest of the interface usable. A pick ray
/// that hits nothing is not an error at all; the picker returns `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("no geometry to measure")]
    EmptyInput,
}
