use bevy::prelude::*;

use constants::render_settings::{BOUNDING_BOX_COLOUR, MEASURE_LINE_WIDTH_RATIO};

use crate::geometry::measure::BoundingExtent;
use crate::tools::annotations::{
    despawn_by_ids, spawn_measurement_visuals, AnnotationKind, AnnotationLabel, AnnotationSet,
    AnnotationVisual,
};
use crate::tools::picking::PickableGeometry;

/// Wireframe segment of the bounding-box overlay. Removed as a group when
/// the overlay is toggled off or everything is cleared.
#[derive(Component)]
pub struct BoundingBoxVisual;

/// The twelve edges of an axis-aligned box.
pub fn box_edges(extent: &BoundingExtent) -> [(Vec3, Vec3); 12] {
    let (lo, hi) = (extent.min, extent.max);
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    [
        // Bottom rectangle.
        (corner(lo.x, lo.y, lo.z), corner(hi.x, lo.y, lo.z)),
        (corner(hi.x, lo.y, lo.z), corner(hi.x, lo.y, hi.z)),
        (corner(hi.x, lo.y, hi.z), corner(lo.x, lo.y, hi.z)),
        (corner(lo.x, lo.y, hi.z), corner(lo.x, lo.y, lo.z)),
        // Top rectangle.
        (corner(lo.x, hi.y, lo.z), corner(hi.x, hi.y, lo.z)),
        (corner(hi.x, hi.y, lo.z), corner(hi.x, hi.y, hi.z)),
        (corner(hi.x, hi.y, hi.z), corner(lo.x, hi.y, hi.z)),
        (corner(lo.x, hi.y, hi.z), corner(lo.x, hi.y, lo.z)),
        // Vertical struts.
        (corner(lo.x, lo.y, lo.z), corner(lo.x, hi.y, lo.z)),
        (corner(hi.x, lo.y, lo.z), corner(hi.x, hi.y, lo.z)),
        (corner(hi.x, lo.y, hi.z), corner(hi.x, hi.y, hi.z)),
        (corner(lo.x, lo.y, hi.z), corner(lo.x, hi.y, hi.z)),
    ]
}

/// Dimension measurements placed along the box: width, height and depth
/// on the near corner, repeated on the far corner so at least one set is
/// readable from any viewing angle.
pub fn dimension_edges(extent: &BoundingExtent) -> [(Vec3, Vec3); 6] {
    let (lo, hi) = (extent.min, extent.max);
    [
        (lo, Vec3::new(hi.x, lo.y, lo.z)),
        (lo, Vec3::new(lo.x, hi.y, lo.z)),
        (lo, Vec3::new(lo.x, lo.y, hi.z)),
        (Vec3::new(lo.x, hi.y, hi.z), hi),
        (Vec3::new(hi.x, lo.y, hi.z), hi),
        (Vec3::new(hi.x, hi.y, lo.z), hi),
    ]
}

/// Spawn the bounding-box overlay: a twelve-edge wireframe plus labelled
/// dimension measurements. Returns false when there is no extent to draw.
pub fn spawn_bounding_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    annotations: &mut AnnotationSet,
    geometry: &PickableGeometry,
) -> bool {
    let Some(extent) = geometry.extent else {
        warn!("No geometry loaded, nothing to box");
        return false;
    };
    let model_size = geometry.model_size();
    let width = (model_size * MEASURE_LINE_WIDTH_RATIO).max(f32::EPSILON);

    let material = materials.add(StandardMaterial {
        base_color: BOUNDING_BOX_COLOUR.into(),
        unlit: true,
        ..default()
    });
    for (start, end) in box_edges(&extent) {
        let offset = end - start;
        let Ok(direction) = Dir3::new(offset) else {
            // Degenerate axis, the box is flat along it.
            continue;
        };
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(offset.length(), width, width))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation((start + end) * 0.5)
                .with_rotation(Quat::from_rotation_arc(Vec3::X, *direction)),
            BoundingBoxVisual,
        ));
    }

    for (start, end) in dimension_edges(&extent) {
        let measurement = annotations.register(AnnotationKind::BoundingBox, start, end);
        spawn_measurement_visuals(commands, meshes, materials, &measurement, model_size);
    }
    true
}

/// Remove the overlay: the wireframe entities and the dimension
/// measurements with their primitive groups.
pub fn despawn_bounding_box(
    commands: &mut Commands,
    annotations: &mut AnnotationSet,
    box_visuals: &Query<Entity, With<BoundingBoxVisual>>,
    visuals: &Query<(Entity, &AnnotationVisual)>,
    labels: &Query<(Entity, &AnnotationLabel)>,
) {
    for entity in box_visuals.iter() {
        commands.entity(entity).despawn();
    }
    let removed = annotations.remove_kind(AnnotationKind::BoundingBox);
    despawn_by_ids(commands, &removed, visuals, labels);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn extent() -> BoundingExtent {
        BoundingExtent {
            min: Vec3::new(-1.0, 0.0, 2.0),
            max: Vec3::new(3.0, 5.0, 4.0),
        }
    }

    #[test]
    fn wireframe_has_twelve_distinct_edges() {
        let edges = box_edges(&extent());
        let mut keys: Vec<_> = edges
            .iter()
            .map(|(a, b)| {
                let (a, b) = (a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn wireframe_edges_stay_on_the_box_surface() {
        let extent = extent();
        for (a, b) in box_edges(&extent) {
            for p in [a, b] {
                assert!(extent.min.cmple(p).all() && extent.max.cmpge(p).all());
                // Corners only.
                assert!(p.x == extent.min.x || p.x == extent.max.x);
                assert!(p.y == extent.min.y || p.y == extent.max.y);
                assert!(p.z == extent.min.z || p.z == extent.max.z);
            }
        }
    }

    #[test]
    fn dimension_edges_measure_width_height_depth_twice() {
        let extent = extent();
        let size = extent.size();
        let mut lengths: Vec<f32> = dimension_edges(&extent)
            .iter()
            .map(|(a, b)| a.distance(*b))
            .collect();
        lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut expected = vec![size.x, size.x, size.y, size.y, size.z, size.z];
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (got, want) in lengths.iter().zip(&expected) {
            assert_relative_eq!(*got, *want);
        }
    }
}
