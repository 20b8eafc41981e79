use bevy::prelude::*;

use constants::render_settings::{
    LABEL_BACKGROUND_COLOUR, LABEL_FONT_SIZE, LABEL_SCALE_DEFAULT, LABEL_SCALE_STEPS,
    MEASURE_LINE_COLOUR, MEASURE_LINE_WIDTH_RATIO, MEASURE_MARKER_COLOUR,
    MEASURE_MARKER_RADIUS_RATIO,
};

use crate::geometry::measure::{distance, midpoint};
use crate::tools::bounding_box::BoundingBoxVisual;

/// What created an annotation. Lets toggles remove their own annotations
/// without disturbing the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    PointMeasure,
    Edge,
    BoundingBox,
}

/// A placed measurement: two world points, their distance, and the label
/// shown at the midpoint.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub id: u32,
    pub kind: AnnotationKind,
    pub start: Vec3,
    pub end: Vec3,
    pub distance: f32,
    pub label: String,
}

/// The active annotation set.
///
/// Every entry corresponds 1:1 to a group of rendered primitives tagged
/// with the same id; the two are always created and removed together, so
/// there is never an orphaned visual or an invisible measurement.
#[derive(Resource, Default)]
pub struct AnnotationSet {
    next_id: u32,
    active: Vec<Measurement>,
}

impl AnnotationSet {
    pub fn register(&mut self, kind: AnnotationKind, start: Vec3, end: Vec3) -> Measurement {
        let distance = distance(start, end);
        let measurement = Measurement {
            id: self.next_id,
            kind,
            start,
            end,
            distance,
            label: format_label(distance),
        };
        self.next_id += 1;
        self.active.push(measurement.clone());
        measurement
    }

    pub fn get(&self, id: u32) -> Option<&Measurement> {
        self.active.iter().find(|m| m.id == id)
    }

    /// Drop every annotation of one kind, returning the removed ids so the
    /// caller can despawn the matching primitive groups.
    pub fn remove_kind(&mut self, kind: AnnotationKind) -> Vec<u32> {
        let removed = self
            .active
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.id)
            .collect();
        self.active.retain(|m| m.kind != kind);
        removed
    }

    /// Drop every annotation, returning the removed ids.
    pub fn clear_all(&mut self) -> Vec<u32> {
        self.active.drain(..).map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.active.iter()
    }
}

/// Distance label text: two decimal places, metres.
pub fn format_label(distance: f32) -> String {
    format!("{distance:.2}m")
}

/// Label scale step keyed by the model's largest bounding dimension, so
/// labels stay legible across wildly different model scales without any
/// per-frame recomputation.
pub fn label_scale_factor(model_size: f32) -> f32 {
    for (limit, factor) in LABEL_SCALE_STEPS {
        if model_size < limit {
            return factor;
        }
    }
    LABEL_SCALE_DEFAULT
}

pub fn label_font_size(model_size: f32) -> f32 {
    LABEL_FONT_SIZE * label_scale_factor(model_size)
}

/// World-space primitive belonging to the annotation with the given id.
#[derive(Component)]
pub struct AnnotationVisual(pub u32);

/// Overlay label belonging to the annotation with the given id. Screen
/// position is synced from the measurement midpoint each frame.
#[derive(Component)]
pub struct AnnotationLabel(pub u32);

/// Marker shown at the first pick while a measurement awaits its second
/// point.
#[derive(Component)]
pub struct PendingStartMarker;

fn unlit_material(colour: impl Into<Color>) -> StandardMaterial {
    StandardMaterial {
        base_color: colour.into(),
        unlit: true,
        ..default()
    }
}

/// Spawn a marker sphere sized relative to the model.
pub fn spawn_marker(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    model_size: f32,
    colour: impl Into<Color>,
) -> Entity {
    let radius = (model_size * MEASURE_MARKER_RADIUS_RATIO).max(f32::EPSILON);
    commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(radius))),
            MeshMaterial3d(materials.add(unlit_material(colour))),
            Transform::from_translation(position),
        ))
        .id()
}

/// Spawn the primitive group for a measurement: endpoint markers, a line
/// rendered as a thin cuboid, and a midpoint distance label. Everything
/// is tagged with the measurement id so removal stays in lockstep with
/// the annotation set.
pub fn spawn_measurement_visuals(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    measurement: &Measurement,
    model_size: f32,
) {
    let offset = measurement.end - measurement.start;
    let width = (model_size * MEASURE_LINE_WIDTH_RATIO).max(f32::EPSILON);

    if let Ok(direction) = Dir3::new(offset) {
        let rotation = Quat::from_rotation_arc(Vec3::X, *direction);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(measurement.distance, width, width))),
            MeshMaterial3d(materials.add(unlit_material(MEASURE_LINE_COLOUR))),
            Transform::from_translation(midpoint(measurement.start, measurement.end))
                .with_rotation(rotation),
            AnnotationVisual(measurement.id),
        ));
    }

    for position in [measurement.start, measurement.end] {
        let marker = spawn_marker(
            commands,
            meshes,
            materials,
            position,
            model_size,
            MEASURE_MARKER_COLOUR,
        );
        commands.entity(marker).insert(AnnotationVisual(measurement.id));
    }

    commands.spawn((
        Text::new(measurement.label.clone()),
        TextFont {
            font_size: label_font_size(model_size),
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(LABEL_BACKGROUND_COLOUR.into()),
        Node {
            position_type: PositionType::Absolute,
            ..default()
        },
        AnnotationLabel(measurement.id),
    ));
}

/// Despawn the primitive groups for the given annotation ids.
pub fn despawn_by_ids(
    commands: &mut Commands,
    ids: &[u32],
    visuals: &Query<(Entity, &AnnotationVisual)>,
    labels: &Query<(Entity, &AnnotationLabel)>,
) {
    for (entity, visual) in visuals.iter() {
        if ids.contains(&visual.0) {
            commands.entity(entity).despawn();
        }
    }
    for (entity, label) in labels.iter() {
        if ids.contains(&label.0) {
            commands.entity(entity).despawn();
        }
    }
}

/// Remove every tracked primitive and empty the annotation set, including
/// any pending start marker and bounding-box wireframe. Returns how many
/// annotations were removed.
pub fn clear_all_annotations(
    commands: &mut Commands,
    annotations: &mut AnnotationSet,
    visuals: &Query<(Entity, &AnnotationVisual)>,
    labels: &Query<(Entity, &AnnotationLabel)>,
    pending: &Query<Entity, With<PendingStartMarker>>,
    box_visuals: &Query<Entity, With<BoundingBoxVisual>>,
) -> usize {
    let removed = annotations.clear_all();
    despawn_by_ids(commands, &removed, visuals, labels);
    for entity in pending.iter() {
        commands.entity(entity).despawn();
    }
    for entity in box_visuals.iter() {
        commands.entity(entity).despawn();
    }
    removed.len()
}

/// Keep each overlay label over its measurement midpoint, hiding labels
/// whose midpoint projects outside the viewport.
pub fn sync_annotation_labels(
    annotations: Res<AnnotationSet>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut labels: Query<(&AnnotationLabel, &mut Node)>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for (label, mut node) in &mut labels {
        let Some(measurement) = annotations.get(label.0) else {
            node.display = Display::None;
            continue;
        };
        let anchor = midpoint(measurement.start, measurement.end);
        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(position) => {
                node.display = Display::Flex;
                node.left = Val::Px(position.x);
                node.top = Val::Px(position.y);
            }
            Err(_) => {
                node.display = Display::None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_render_two_decimals_with_unit() {
        assert_eq!(format_label(5.0), "5.00m");
        assert_eq!(format_label(0.125), "0.13m");
        assert_eq!(format_label(1234.5678), "1234.57m");
    }

    #[test]
    fn label_scale_steps_follow_model_size() {
        assert_eq!(label_scale_factor(0.5), 2.0);
        assert_eq!(label_scale_factor(5.0), 1.0);
        assert_eq!(label_scale_factor(50.0), 0.5);
        assert_eq!(label_scale_factor(500.0), 0.25);
    }

    #[test]
    fn registered_measurements_carry_distance_and_label() {
        let mut set = AnnotationSet::default();
        let m = set.register(AnnotationKind::PointMeasure, Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(m.distance, 5.0);
        assert_eq!(m.label, "5.00m");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(m.id).unwrap().kind, AnnotationKind::PointMeasure);
    }

    #[test]
    fn remove_kind_only_touches_that_kind() {
        let mut set = AnnotationSet::default();
        set.register(AnnotationKind::Edge, Vec3::ZERO, Vec3::X);
        let kept = set.register(AnnotationKind::PointMeasure, Vec3::ZERO, Vec3::Y);
        set.register(AnnotationKind::Edge, Vec3::ZERO, Vec3::Z);

        let removed = set.remove_kind(AnnotationKind::Edge);
        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);
        assert!(set.get(kept.id).is_some());
    }

    #[test]
    fn clear_all_reports_every_removed_group() {
        let mut set = AnnotationSet::default();
        for i in 0..4 {
            set.register(AnnotationKind::PointMeasure, Vec3::ZERO, Vec3::X * i as f32);
        }
        let removed = set.clear_all();
        assert_eq!(removed.len(), 4);
        assert!(set.is_empty());
    }
}
