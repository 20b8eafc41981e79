use bevy::prelude::*;

use constants::measurement::EDGE_LENGTH_THRESHOLD_RATIO;

use crate::geometry::edges::significant_edges;
use crate::tools::annotations::{spawn_measurement_visuals, AnnotationKind, AnnotationSet};
use crate::tools::picking::PickableGeometry;

/// Annotate the significant edges of the loaded model: long, axis-aligned
/// triangle edges, deduplicated and capped. Each surviving edge becomes a
/// regular measurement with a distance label. Returns how many edges were
/// annotated.
pub fn spawn_edge_annotations(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    annotations: &mut AnnotationSet,
    geometry: &PickableGeometry,
) -> usize {
    if geometry.triangles.is_empty() {
        warn!("No geometry loaded, nothing to annotate");
        return 0;
    }

    let model_size = geometry.model_size();
    let threshold = model_size * EDGE_LENGTH_THRESHOLD_RATIO;
    let edges = significant_edges(geometry.triangles.iter().copied(), threshold);

    for edge in &edges {
        let measurement = annotations.register(AnnotationKind::Edge, edge.start, edge.end);
        spawn_measurement_visuals(commands, meshes, materials, &measurement, model_size);
    }
    info!("Annotated {} significant edges", edges.len());
    edges.len()
}
