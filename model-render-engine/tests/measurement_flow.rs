//! End-to-end measurement flow over a synthetic model, exercising the
//! pure state layer the rendering systems are built on.

use bevy::prelude::*;

use model_render_engine::geometry::edges::significant_edges;
use model_render_engine::geometry::measure::triangle_extent;
use model_render_engine::geometry::ray::nearest_hit;
use model_render_engine::tools::annotations::{AnnotationKind, AnnotationSet};
use model_render_engine::tools::measure::{MeasureTool, MeasurementSession, PickOutcome};
use model_render_engine::tools::picking::PickableGeometry;

/// Axis-aligned cube triangle soup, side length `side`, min corner at the
/// origin.
fn cube_triangles(side: f32) -> Vec<[Vec3; 3]> {
    let c = |x: f32, y: f32, z: f32| Vec3::new(x, y, z) * side;
    let faces = [
        [c(0., 0., 0.), c(1., 0., 0.), c(1., 1., 0.), c(0., 1., 0.)],
        [c(0., 0., 1.), c(1., 0., 1.), c(1., 1., 1.), c(0., 1., 1.)],
        [c(0., 0., 0.), c(1., 0., 0.), c(1., 0., 1.), c(0., 0., 1.)],
        [c(0., 1., 0.), c(1., 1., 0.), c(1., 1., 1.), c(0., 1., 1.)],
        [c(0., 0., 0.), c(0., 1., 0.), c(0., 1., 1.), c(0., 0., 1.)],
        [c(1., 0., 0.), c(1., 1., 0.), c(1., 1., 1.), c(1., 0., 1.)],
    ];
    faces
        .iter()
        .flat_map(|[a, b, c, d]| [[*a, *b, *c], [*a, *c, *d]])
        .collect()
}

fn cube_geometry(side: f32) -> PickableGeometry {
    let triangles = cube_triangles(side);
    let extent = triangle_extent(&triangles).ok();
    PickableGeometry { triangles, extent }
}

#[test]
fn two_surface_picks_become_a_labelled_measurement() {
    let geometry = cube_geometry(2.0);
    let mut tool = MeasureTool::default();
    let mut annotations = AnnotationSet::default();
    tool.set_active(true);

    // Two rays onto the front face of the cube, one metre apart.
    let first = nearest_hit(
        Vec3::new(0.5, 0.5, 5.0),
        Vec3::NEG_Z,
        &geometry.triangles,
        geometry.extent.as_ref(),
    )
    .unwrap();
    let second = nearest_hit(
        Vec3::new(1.5, 0.5, 5.0),
        Vec3::NEG_Z,
        &geometry.triangles,
        geometry.extent.as_ref(),
    )
    .unwrap();
    assert_eq!(first.z, 2.0);
    assert_eq!(second.z, 2.0);

    assert_eq!(tool.handle_pick(first), PickOutcome::Started(first));
    let PickOutcome::Completed { start, end } = tool.handle_pick(second) else {
        panic!("second pick should complete the measurement");
    };

    let measurement = annotations.register(AnnotationKind::PointMeasure, start, end);
    assert_eq!(measurement.distance, 1.0);
    assert_eq!(measurement.label, "1.00m");
    assert_eq!(tool.session(), MeasurementSession::Idle);
}

#[test]
fn a_missed_pick_changes_nothing() {
    let geometry = cube_geometry(2.0);
    let hit = nearest_hit(
        Vec3::new(50.0, 50.0, 5.0),
        Vec3::NEG_Z,
        &geometry.triangles,
        geometry.extent.as_ref(),
    );
    assert!(hit.is_none());
}

#[test]
fn cube_edges_annotate_up_to_the_cap_with_equal_lengths() {
    let geometry = cube_geometry(10.0);
    let threshold = geometry.model_size() * 0.1;
    let edges = significant_edges(geometry.triangles.iter().copied(), threshold);

    // Every cube edge is axis-aligned and well above threshold; the quad
    // diagonals are not. Twelve unique edges survive.
    assert_eq!(edges.len(), 12);

    let mut annotations = AnnotationSet::default();
    for edge in &edges {
        let m = annotations.register(AnnotationKind::Edge, edge.start, edge.end);
        assert_eq!(m.label, "10.00m");
    }
    assert_eq!(annotations.len(), 12);

    let removed = annotations.remove_kind(AnnotationKind::Edge);
    assert_eq!(removed.len(), 12);
    assert!(annotations.is_empty());
}

#[test]
fn clearing_mid_measurement_discards_the_pending_start() {
    let mut tool = MeasureTool::default();
    tool.set_active(true);
    tool.handle_pick(Vec3::splat(1.0));
    assert!(matches!(
        tool.session(),
        MeasurementSession::AwaitingSecondPoint(_)
    ));

    // Deactivating with a point pending must request a full clear.
    assert!(tool.set_active(false));

    // The next activation starts from scratch.
    tool.set_active(true);
    assert_eq!(tool.session(), MeasurementSession::Idle);
    assert_eq!(
        tool.handle_pick(Vec3::ZERO),
        PickOutcome::Started(Vec3::ZERO)
    );
}

#[test]
fn mixed_annotation_kinds_clear_together() {
    let mut annotations = AnnotationSet::default();
    annotations.register(AnnotationKind::PointMeasure, Vec3::ZERO, Vec3::X);
    annotations.register(AnnotationKind::Edge, Vec3::ZERO, Vec3::Y);
    annotations.register(AnnotationKind::BoundingBox, Vec3::ZERO, Vec3::Z);

    let removed = annotations.clear_all();
    assert_eq!(removed.len(), 3);
    assert!(annotations.is_empty());

    // Ids are never reused after a clear.
    let next = annotations.register(AnnotationKind::PointMeasure, Vec3::ZERO, Vec3::X);
    assert!(!removed.contains(&next.id));
}
