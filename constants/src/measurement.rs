use bevy::prelude::*;

/// Maximum number of significant edges annotated at once.
pub const MAX_SIGNIFICANT_EDGES: usize = 12;

/// Edge length threshold as a fraction of the largest bounding dimension.
pub const EDGE_LENGTH_THRESHOLD_RATIO: f32 = 0.1;

/// An edge counts as axis-aligned when a direction component exceeds this.
/// cos(15 degrees).
pub const AXIS_ALIGNMENT_MIN_COS: f32 = 0.965_925_8;

/// Decimal places kept when building edge dedup keys. Absorbs float noise
/// between triangles that share a physical edge.
pub const EDGE_KEY_DECIMALS: i32 = 3;

/// Major axes tested by the alignment filter.
pub const MAJOR_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];
