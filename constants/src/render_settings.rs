use bevy::color::Srgba;

/// Measurement line thickness as a fraction of the largest bounding dimension.
pub const MEASURE_LINE_WIDTH_RATIO: f32 = 0.002;

/// Pick marker sphere radius as a fraction of the largest bounding dimension.
pub const MEASURE_MARKER_RADIUS_RATIO: f32 = 0.006;

/// Base font size for distance labels before the model-size step is applied.
pub const LABEL_FONT_SIZE: f32 = 16.0;

/// Label scale steps keyed by the model's largest bounding dimension.
/// Models below each threshold use the paired factor; larger models fall
/// through to [`LABEL_SCALE_DEFAULT`].
pub const LABEL_SCALE_STEPS: [(f32, f32); 3] = [(1.0, 2.0), (10.0, 1.0), (100.0, 0.5)];
pub const LABEL_SCALE_DEFAULT: f32 = 0.25;

pub const MEASURE_LINE_COLOUR: Srgba = Srgba {
    red: 1.0,
    green: 0.1,
    blue: 0.1,
    alpha: 1.0,
};

pub const MEASURE_MARKER_COLOUR: Srgba = Srgba {
    red: 1.0,
    green: 0.0,
    blue: 0.0,
    alpha: 1.0,
};

pub const PENDING_MARKER_COLOUR: Srgba = Srgba {
    red: 1.0,
    green: 1.0,
    blue: 0.2,
    alpha: 1.0,
};

pub const BOUNDING_BOX_COLOUR: Srgba = Srgba {
    red: 1.0,
    green: 1.0,
    blue: 0.0,
    alpha: 1.0,
};

pub const LABEL_BACKGROUND_COLOUR: Srgba = Srgba {
    red: 0.0,
    green: 0.0,
    blue: 0.0,
    alpha: 0.8,
};
